//! # Invoice Dashboard
//!
//! Server side of an invoice/customer dashboard.
//!
//! ## Features
//!
//! - **Form Mutation Pipeline**: validate → normalize → persist → revalidate → redirect,
//!   with every rejected form answered by a field-addressable [`FormState`](core::FormState)
//! - **Debounced Search**: keystrokes collapse into one URL replace per quiet period
//! - **Access Gate**: a four-row decision table over session presence and path class
//! - **Credential Sign-in**: named providers, classified failures, bearer-token sessions
//! - **Storage Backends**: in-memory by default, PostgreSQL behind the `postgres` feature
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dashboard::prelude::*;
//!
//! let store = InMemoryStore::with_customers([
//!     Customer::new("c1", "Lee Robinson", "lee@robinson.com"),
//! ]);
//!
//! ServerBuilder::new(DashboardConfig::default_config())
//!     .with_store(store)
//!     .serve()
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        actions::{ActionOutcome, InvoiceActions},
        auth::{
            AuthError, AuthProvider, Authenticator, Credentials, CredentialsProvider,
            LoginOutcome, Session, SessionStore, User, authenticate,
        },
        cache::{PageCache, PathRevalidator},
        error::{DashboardError, DashboardResult, StorageError},
        gate::{AccessDecision, authorize},
        invoice::{Customer, Invoice, InvoiceChanges, InvoicePage, InvoiceStatus, InvoiceSummary},
        search::{DebounceState, Debouncer, InMemoryLocation, Location, SearchBox, SearchParams},
        service::{CustomerService, InvoiceService},
        validation::{FieldErrors, FormState, InvoiceFormInput, validate_invoice_form},
    };

    // === Storage ===
    pub use crate::storage::InMemoryStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::{PostgresStore, ensure_schema};

    // === Config ===
    pub use crate::config::DashboardConfig;

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::NaiveDate;
    pub use uuid::Uuid;
}
