//! Credential sign-in and sessions
//!
//! Sign-in goes through a named [`AuthProvider`]. Failures are classified at
//! this boundary: known authentication failures become a message for the
//! login form, anything else is handed back to the caller untouched.

use crate::config::AuthUserConfig;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

/// Name the credentials provider is registered under
pub const CREDENTIALS_PROVIDER: &str = "credentials";

pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong.";

/// Submitted login form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// A signed-in user as seen by the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A live session, addressed by its bearer token
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: Uuid,
    pub user: User,
    pub created_at: DateTime<Utc>,
}

/// Classified authentication failures
#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad email/password, or credentials that fail the login schema
    #[error("invalid credentials")]
    CredentialsSignin,

    /// No provider registered under this name
    #[error("unknown sign-in provider '{0}'")]
    UnknownProvider(String),

    /// The provider itself failed
    #[error("sign-in provider failed: {0}")]
    Provider(String),
}

/// Everything `sign_in` can fail with
#[derive(Debug, Error)]
pub enum SignInError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Not an authentication failure; callers should not paper over it
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Trait for sign-in providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve credentials to a user. `Ok(None)` means the credentials were
    /// well-formed but do not match anyone.
    async fn authorize(&self, credentials: &Credentials) -> Result<Option<User>, AuthError>;
}

/// SHA-256 hex digest of a password, the format user records are stored in
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Email/password provider over a fixed user list
pub struct CredentialsProvider {
    users: Vec<AuthUserConfig>,
}

impl CredentialsProvider {
    pub fn new(users: Vec<AuthUserConfig>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl AuthProvider for CredentialsProvider {
    async fn authorize(&self, credentials: &Credentials) -> Result<Option<User>, AuthError> {
        let digest = hash_password(&credentials.password);
        Ok(self
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(&credentials.email) && u.password_sha256 == digest)
            .map(|u| User {
                id: u.id.clone(),
                name: u.name.clone(),
                email: u.email.clone(),
            }))
    }
}

/// In-memory session registry
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, user: User) -> Result<Session> {
        let session = Session {
            token: Uuid::new_v4(),
            user,
            created_at: Utc::now(),
        };
        self.sessions
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?
            .insert(session.token, session.clone());
        Ok(session)
    }

    pub fn get(&self, token: &Uuid) -> Option<Session> {
        self.sessions.read().ok()?.get(token).cloned()
    }

    /// Returns whether a session was removed
    pub fn remove(&self, token: &Uuid) -> Result<bool> {
        Ok(self
            .sessions
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?
            .remove(token)
            .is_some())
    }
}

/// Dispatches sign-in to named providers and opens sessions
#[derive(Clone)]
pub struct Authenticator {
    providers: HashMap<String, Arc<dyn AuthProvider>>,
    sessions: SessionStore,
}

impl Authenticator {
    pub fn new(sessions: SessionStore) -> Self {
        Self {
            providers: HashMap::new(),
            sessions,
        }
    }

    pub fn with_provider(mut self, name: impl Into<String>, provider: impl AuthProvider + 'static) -> Self {
        self.providers.insert(name.into(), Arc::new(provider));
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub async fn sign_in(
        &self,
        provider: &str,
        credentials: &Credentials,
    ) -> Result<Session, SignInError> {
        let handler = self
            .providers
            .get(provider)
            .ok_or_else(|| AuthError::UnknownProvider(provider.to_string()))?;

        if credentials.validate().is_err() {
            return Err(AuthError::CredentialsSignin.into());
        }

        let user = handler
            .authorize(credentials)
            .await?
            .ok_or(AuthError::CredentialsSignin)?;

        Ok(self.sessions.create(user)?)
    }
}

/// What the login form gets back
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    SignedIn(Session),
    Rejected(&'static str),
}

/// Sign in with the credentials provider.
///
/// Bad credentials and other authentication failures become a message;
/// errors that are not authentication failures are returned as `Err`.
pub async fn authenticate(
    authenticator: &Authenticator,
    credentials: &Credentials,
) -> Result<LoginOutcome> {
    match authenticator.sign_in(CREDENTIALS_PROVIDER, credentials).await {
        Ok(session) => {
            tracing::info!(user_id = %session.user.id, "signed in");
            Ok(LoginOutcome::SignedIn(session))
        }
        Err(SignInError::Auth(AuthError::CredentialsSignin)) => {
            tracing::info!("sign-in rejected: invalid credentials");
            Ok(LoginOutcome::Rejected(INVALID_CREDENTIALS))
        }
        Err(SignInError::Auth(e)) => {
            tracing::warn!(error = %e, "sign-in failed");
            Ok(LoginOutcome::Rejected(SOMETHING_WENT_WRONG))
        }
        Err(SignInError::Other(e)) => Err(e),
    }
}
