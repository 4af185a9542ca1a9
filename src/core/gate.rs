//! Access gate for dashboard routes
//!
//! The gate is a pure, total function of two small enums. [`decide`] is the
//! decision table: one match arm per combination, checked exhaustive by the
//! compiler.

use crate::core::auth::Session;

/// Whether the request carries a live session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPresence {
    Present,
    Absent,
}

impl SessionPresence {
    pub fn of(session: Option<&Session>) -> Self {
        match session {
            Some(_) => SessionPresence::Present,
            None => SessionPresence::Absent,
        }
    }
}

/// Whether a path needs a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Protected,
    Public,
}

/// What to do with a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    /// Send the client to the sign-in page
    DenyToLogin,
    /// Already signed in, send the client to the dashboard
    RedirectToDashboard,
}

/// A path is protected when it starts with `protected_prefix`
pub fn classify_path(path: &str, protected_prefix: &str) -> PathClass {
    if path.starts_with(protected_prefix) {
        PathClass::Protected
    } else {
        PathClass::Public
    }
}

pub fn decide(session: SessionPresence, path: PathClass) -> AccessDecision {
    match (session, path) {
        (SessionPresence::Present, PathClass::Protected) => AccessDecision::Allow,
        (SessionPresence::Absent, PathClass::Protected) => AccessDecision::DenyToLogin,
        (SessionPresence::Present, PathClass::Public) => AccessDecision::RedirectToDashboard,
        (SessionPresence::Absent, PathClass::Public) => AccessDecision::Allow,
    }
}

/// Gate a request path
pub fn authorize(session: Option<&Session>, path: &str, protected_prefix: &str) -> AccessDecision {
    decide(
        SessionPresence::of(session),
        classify_path(path, protected_prefix),
    )
}
