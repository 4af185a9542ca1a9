//! Configuration loading and management

use crate::core::auth::hash_password;
use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete configuration of the dashboard server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub server: ServerConfig,
    pub routes: RoutesConfig,
    pub search: SearchConfig,
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Route paths the dashboard redirects to and revalidates
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    pub dashboard: String,
    pub invoices: String,
    pub login: String,

    /// Paths starting with this prefix need a session
    pub protected_prefix: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            dashboard: "/dashboard".to_string(),
            invoices: "/dashboard/invoices".to_string(),
            login: "/login".to_string(),
            protected_prefix: "/dashboard".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before a search term is pushed to the URL
    pub debounce_ms: u64,

    pub items_per_page: u32,

    /// Most list pages kept in the page cache
    pub cache_capacity: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            items_per_page: 6,
            cache_capacity: 1_000,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub users: Vec<AuthUserConfig>,
}

/// A user allowed to sign in with email and password
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUserConfig {
    pub id: String,
    pub name: String,
    pub email: String,

    /// Hex SHA-256 digest of the password
    pub password_sha256: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Postgres connection URL; the in-memory store is used when absent
    pub url: Option<String>,
}

impl DashboardConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_string(),
            },
            _ => ConfigError::from(e),
        })?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let routes = [
            ("routes.dashboard", &self.routes.dashboard),
            ("routes.invoices", &self.routes.invoices),
            ("routes.login", &self.routes.login),
            ("routes.protected_prefix", &self.routes.protected_prefix),
        ];
        for (field, value) in routes {
            if !value.starts_with('/') {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.clone(),
                    message: "must be an absolute path".to_string(),
                });
            }
        }

        let prefix = &self.routes.protected_prefix;
        for (field, value) in [
            ("routes.dashboard", &self.routes.dashboard),
            ("routes.invoices", &self.routes.invoices),
        ] {
            if !value.starts_with(prefix.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.clone(),
                    message: format!("must be under routes.protected_prefix ({})", prefix),
                });
            }
        }
        if self.routes.login.starts_with(prefix.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "routes.login".to_string(),
                value: self.routes.login.clone(),
                message: format!("must not be under routes.protected_prefix ({})", prefix),
            });
        }

        if self.search.items_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.items_per_page".to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if let Some(user) = self
            .auth
            .users
            .iter()
            .find(|u| u.password_sha256.len() != 64 || hex::decode(&u.password_sha256).is_err())
        {
            return Err(ConfigError::InvalidValue {
                field: "auth.users.password_sha256".to_string(),
                value: user.email.clone(),
                message: "must be a hex SHA-256 digest".to_string(),
            });
        }

        Ok(())
    }

    /// Defaults plus the demo user (`user@nextmail.com` / `123456`)
    pub fn default_config() -> Self {
        Self {
            auth: AuthConfig {
                users: vec![AuthUserConfig {
                    id: "410544b2-4001-4271-9855-fec4b6a6442a".to_string(),
                    name: "User".to_string(),
                    email: "user@nextmail.com".to_string(),
                    password_sha256: hash_password("123456"),
                }],
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default_config();

        assert_eq!(config.search.debounce(), Duration::from_millis(300));
        assert_eq!(config.search.items_per_page, 6);
        assert_eq!(config.routes.invoices, "/dashboard/invoices");
        assert_eq!(config.auth.users.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_serialization() {
        let config = DashboardConfig::default_config();
        let yaml = serde_yaml::to_string(&config).unwrap();

        let parsed = DashboardConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed.auth.users.len(), config.auth.users.len());
        assert_eq!(parsed.routes.login, config.routes.login);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = DashboardConfig::from_yaml_str("search:\n  items_per_page: 10\n").unwrap();
        assert_eq!(config.search.items_per_page, 10);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_validate_rejects_relative_route() {
        let mut config = DashboardConfig::default_config();
        config.routes.invoices = "dashboard/invoices".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "routes.invoices"));
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = DashboardConfig::default_config();
        config.search.items_per_page = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_plaintext_password() {
        let mut config = DashboardConfig::default_config();
        config.auth.users[0].password_sha256 = "123456".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_dashboard_outside_protected_prefix() {
        let mut config = DashboardConfig::default_config();
        config.routes.protected_prefix = "/admin".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "routes.dashboard"));
    }

    #[test]
    fn test_validate_rejects_invoices_outside_protected_prefix() {
        let mut config = DashboardConfig::default_config();
        config.routes.invoices = "/invoices".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "routes.invoices"));
    }

    #[test]
    fn test_validate_rejects_protected_login() {
        let mut config = DashboardConfig::default_config();
        config.routes.login = "/dashboard/login".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "routes.login"));
    }
}
