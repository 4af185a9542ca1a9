//! Service traits for invoice and customer storage

use crate::core::error::StorageError;
use crate::core::invoice::{Customer, Invoice, InvoiceChanges, InvoicePage, InvoiceSummary};
use async_trait::async_trait;
use uuid::Uuid;

/// Storage for invoices
///
/// Implementations own row-level atomicity; callers address every write by
/// explicit id and never share mutable state.
#[async_trait]
pub trait InvoiceService: Send + Sync {
    /// Insert a new invoice. Fails with `ConstraintViolation` when the
    /// customer does not exist.
    async fn create(&self, invoice: Invoice) -> Result<Invoice, StorageError>;

    /// Get an invoice by id
    async fn get(&self, id: &Uuid) -> Result<Option<Invoice>, StorageError>;

    /// Replace customer, amount and status of an existing invoice.
    /// Fails with `NotFound` when no row matches.
    async fn update(&self, id: &Uuid, changes: InvoiceChanges) -> Result<Invoice, StorageError>;

    /// Delete an invoice. Returns whether a row was removed.
    async fn delete(&self, id: &Uuid) -> Result<bool, StorageError>;

    /// Case-insensitive search over customer name and email, amount, date
    /// and status, newest first. `page` is 1-based.
    async fn search(&self, query: &str, page: u32, per_page: u32)
    -> Result<InvoicePage, StorageError>;

    /// Counts and totals for the dashboard cards
    async fn summary(&self) -> Result<InvoiceSummary, StorageError>;
}

/// Read access to customers, plus seeding
#[async_trait]
pub trait CustomerService: Send + Sync {
    /// All customers ordered by name
    async fn list(&self) -> Result<Vec<Customer>, StorageError>;

    async fn get(&self, id: &str) -> Result<Option<Customer>, StorageError>;

    async fn insert(&self, customer: Customer) -> Result<Customer, StorageError>;
}
