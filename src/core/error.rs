//! Typed error handling for the dashboard
//!
//! Form actions never fail with these types: a rejected form comes back as a
//! [`FormState`](crate::core::validation::FormState) inside an
//! [`ActionOutcome`](crate::core::actions::ActionOutcome). The errors here
//! cover read endpoints, storage backends and configuration, and know how to
//! turn themselves into HTTP responses. Sign-in failures are classified into a
//! login message in [`crate::core::auth`] and never reach this layer.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: malformed request input (bad ids)
//! - [`StorageError`]: storage backend failures
//! - [`ConfigError`]: configuration parsing and validation
//!
//! # Example
//!
//! ```rust,ignore
//! use dashboard::prelude::*;
//!
//! match service.update(&id, changes).await {
//!     Ok(invoice) => println!("updated {}", invoice.id),
//!     Err(StorageError::NotFound { id }) => println!("invoice {} is gone", id),
//!     Err(e) => eprintln!("storage failure: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The main error type of the dashboard
#[derive(Debug)]
pub enum DashboardError {
    /// Malformed input
    Validation(ValidationError),

    /// Storage backend errors
    Storage(StorageError),

    /// Configuration errors
    Config(ConfigError),

    /// Anything unclassified
    Internal(String),
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::Validation(e) => write!(f, "{}", e),
            DashboardError::Storage(e) => write!(f, "{}", e),
            DashboardError::Config(e) => write!(f, "{}", e),
            DashboardError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DashboardError::Validation(e) => Some(e),
            DashboardError::Storage(e) => Some(e),
            DashboardError::Config(e) => Some(e),
            DashboardError::Internal(_) => None,
        }
    }
}

/// Error body for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl DashboardError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::Validation(_) => StatusCode::BAD_REQUEST,
            DashboardError::Storage(e) => e.status_code(),
            DashboardError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DashboardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            DashboardError::Validation(e) => e.error_code(),
            DashboardError::Storage(e) => e.error_code(),
            DashboardError::Config(_) => "CONFIG_ERROR",
            DashboardError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            DashboardError::Storage(StorageError::NotFound { id }) => {
                Some(serde_json::json!({ "id": id.to_string() }))
            }
            DashboardError::Validation(ValidationError::InvalidUuid { value }) => {
                Some(serde_json::json!({ "value": value }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        if self.status_code().is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        }
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Malformed request input outside of form actions
#[derive(Debug)]
pub enum ValidationError {
    /// Path or query id is not a UUID
    InvalidUuid { value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidUuid { value } => {
                write!(f, "Invalid UUID format: {}", value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvalidUuid { .. } => "INVALID_UUID",
        }
    }
}

impl From<ValidationError> for DashboardError {
    fn from(err: ValidationError) -> Self {
        DashboardError::Validation(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by storage backends
#[derive(Debug)]
pub enum StorageError {
    /// Could not reach the backend
    ConnectionError { backend: String, message: String },

    /// Statement failed
    QueryError { backend: String, message: String },

    /// No invoice with this id
    NotFound { id: Uuid },

    /// Foreign key, uniqueness or check constraint rejected the write
    ConstraintViolation { backend: String, message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ConnectionError { backend, message } => {
                write!(f, "Failed to connect to {}: {}", backend, message)
            }
            StorageError::QueryError { backend, message } => {
                write!(f, "{} query error: {}", backend, message)
            }
            StorageError::NotFound { id } => {
                write!(f, "Invoice with id '{}' not found", id)
            }
            StorageError::ConstraintViolation { backend, message } => {
                write!(f, "{} constraint violation: {}", backend, message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl StorageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StorageError::NotFound { .. } => StatusCode::NOT_FOUND,
            StorageError::ConstraintViolation { .. } => StatusCode::CONFLICT,
            StorageError::ConnectionError { .. } | StorageError::QueryError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::ConnectionError { .. } => "STORAGE_CONNECTION_ERROR",
            StorageError::QueryError { .. } => "STORAGE_QUERY_ERROR",
            StorageError::NotFound { .. } => "INVOICE_NOT_FOUND",
            StorageError::ConstraintViolation { .. } => "STORAGE_CONSTRAINT_VIOLATION",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

impl From<StorageError> for DashboardError {
    fn from(err: StorageError) -> Self {
        DashboardError::Storage(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// A value parsed but makes no sense
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for DashboardError {
    fn from(err: ConfigError) -> Self {
        DashboardError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

impl From<uuid::Error> for DashboardError {
    fn from(err: uuid::Error) -> Self {
        DashboardError::Validation(ValidationError::InvalidUuid {
            value: err.to_string(),
        })
    }
}

impl From<anyhow::Error> for DashboardError {
    fn from(err: anyhow::Error) -> Self {
        DashboardError::Internal(err.to_string())
    }
}

/// A specialized Result type for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;
