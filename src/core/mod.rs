//! Core module containing the dashboard's domain types and pipelines

pub mod actions;
pub mod auth;
pub mod cache;
pub mod error;
pub mod gate;
pub mod invoice;
pub mod search;
pub mod service;
pub mod validation;

pub use actions::{ActionOutcome, InvoiceActions};
pub use auth::{
    AuthError, AuthProvider, Authenticator, Credentials, CredentialsProvider, LoginOutcome,
    Session, SessionStore, SignInError, User,
};
pub use cache::{PageCache, PathRevalidator};
pub use error::{DashboardError, DashboardResult, StorageError};
pub use gate::{AccessDecision, PathClass, SessionPresence};
pub use invoice::{
    Customer, Invoice, InvoiceChanges, InvoiceForm, InvoiceListItem, InvoicePage, InvoiceStatus,
    InvoiceSummary,
};
pub use search::{Debouncer, SearchBox, SearchParams, SearchQuery};
pub use service::{CustomerService, InvoiceService};
pub use validation::{FieldErrors, FormState, InvoiceFormInput};
