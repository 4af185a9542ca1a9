//! In-memory invoice and customer storage for testing and development

use crate::core::error::StorageError;
use crate::core::invoice::{
    Customer, Invoice, InvoiceChanges, InvoiceListItem, InvoicePage, InvoiceStatus,
    InvoiceSummary, total_pages,
};
use crate::core::service::{CustomerService, InvoiceService};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

const BACKEND: &str = "memory";

/// In-memory store implementing both services
///
/// Uses RwLock for thread-safe access. Invoices reference customers the way
/// a foreign key would: inserting or updating an invoice with an unknown
/// customer is a constraint violation.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    invoices: Arc<RwLock<HashMap<Uuid, Invoice>>>,
    customers: Arc<RwLock<HashMap<String, Customer>>>,
}

fn poisoned(e: impl std::fmt::Display) -> StorageError {
    StorageError::QueryError {
        backend: BACKEND.to_string(),
        message: format!("Failed to acquire lock: {}", e),
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with customers
    pub fn with_customers(customers: impl IntoIterator<Item = Customer>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.customers.write() {
            map.extend(customers.into_iter().map(|c| (c.id.clone(), c)));
        }
        store
    }

    fn read_invoices(&self) -> Result<RwLockReadGuard<'_, HashMap<Uuid, Invoice>>, StorageError> {
        self.invoices.read().map_err(poisoned)
    }

    fn write_invoices(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<Uuid, Invoice>>, StorageError> {
        self.invoices.write().map_err(poisoned)
    }

    fn read_customers(
        &self,
    ) -> Result<RwLockReadGuard<'_, HashMap<String, Customer>>, StorageError> {
        self.customers.read().map_err(poisoned)
    }

    fn ensure_customer(&self, customer_id: &str) -> Result<(), StorageError> {
        if self.read_customers()?.contains_key(customer_id) {
            Ok(())
        } else {
            Err(StorageError::ConstraintViolation {
                backend: BACKEND.to_string(),
                message: format!("customer '{}' does not exist", customer_id),
            })
        }
    }
}

fn matches_query(item: &InvoiceListItem, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [
        item.name.to_lowercase(),
        item.email.to_lowercase(),
        item.amount.to_string(),
        item.date.to_string(),
        item.status.as_str().to_string(),
    ]
    .iter()
    .any(|haystack| haystack.contains(needle))
}

#[async_trait]
impl InvoiceService for InMemoryStore {
    async fn create(&self, invoice: Invoice) -> Result<Invoice, StorageError> {
        self.ensure_customer(&invoice.customer_id)?;

        let mut invoices = self.write_invoices()?;
        if invoices.contains_key(&invoice.id) {
            return Err(StorageError::ConstraintViolation {
                backend: BACKEND.to_string(),
                message: format!("invoice '{}' already exists", invoice.id),
            });
        }
        invoices.insert(invoice.id, invoice.clone());

        Ok(invoice)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Invoice>, StorageError> {
        Ok(self.read_invoices()?.get(id).cloned())
    }

    async fn update(&self, id: &Uuid, changes: InvoiceChanges) -> Result<Invoice, StorageError> {
        self.ensure_customer(&changes.customer_id)?;

        let mut invoices = self.write_invoices()?;
        let invoice = invoices
            .get_mut(id)
            .ok_or(StorageError::NotFound { id: *id })?;
        invoice.apply(&changes);

        Ok(invoice.clone())
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, StorageError> {
        Ok(self.write_invoices()?.remove(id).is_some())
    }

    async fn search(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<InvoicePage, StorageError> {
        let needle = query.trim().to_lowercase();
        let customers = self.read_customers()?;
        let invoices = self.read_invoices()?;

        let mut items: Vec<InvoiceListItem> = invoices
            .values()
            .filter_map(|invoice| {
                let customer = customers.get(&invoice.customer_id)?;
                Some(InvoiceListItem {
                    id: invoice.id,
                    customer_id: invoice.customer_id.clone(),
                    name: customer.name.clone(),
                    email: customer.email.clone(),
                    amount: invoice.amount,
                    status: invoice.status,
                    date: invoice.date,
                })
            })
            .filter(|item| matches_query(item, &needle))
            .collect();

        items.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

        let per_page = per_page.max(1);
        let page = page.max(1);
        let total = items.len() as u64;
        let offset = (page as usize - 1) * per_page as usize;

        Ok(InvoicePage {
            items: items.into_iter().skip(offset).take(per_page as usize).collect(),
            query: query.to_string(),
            page,
            total_pages: total_pages(total, per_page),
        })
    }

    async fn summary(&self) -> Result<InvoiceSummary, StorageError> {
        let customer_count = self.read_customers()?.len() as u64;
        let invoices = self.read_invoices()?;

        let mut summary = InvoiceSummary {
            invoice_count: invoices.len() as u64,
            customer_count,
            ..Default::default()
        };
        for invoice in invoices.values() {
            match invoice.status {
                InvoiceStatus::Paid => summary.total_paid += invoice.amount,
                InvoiceStatus::Pending => summary.total_pending += invoice.amount,
            }
        }

        Ok(summary)
    }
}

#[async_trait]
impl CustomerService for InMemoryStore {
    async fn list(&self) -> Result<Vec<Customer>, StorageError> {
        let mut customers: Vec<Customer> = self.read_customers()?.values().cloned().collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }

    async fn get(&self, id: &str) -> Result<Option<Customer>, StorageError> {
        Ok(self.read_customers()?.get(id).cloned())
    }

    async fn insert(&self, customer: Customer) -> Result<Customer, StorageError> {
        self.customers
            .write()
            .map_err(poisoned)?
            .insert(customer.id.clone(), customer.clone());
        Ok(customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn store() -> InMemoryStore {
        InMemoryStore::with_customers([
            Customer::new("c1", "Lee Robinson", "lee@robinson.com"),
            Customer::new("c2", "Delba de Oliveira", "delba@oliveira.com"),
        ])
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = store();
        let invoice = Invoice::new("c1", 1500, InvoiceStatus::Pending, day(1));

        let created = InvoiceService::create(&store, invoice.clone()).await.unwrap();
        assert_eq!(created, invoice);

        let fetched = InvoiceService::get(&store, &invoice.id).await.unwrap();
        assert_eq!(fetched, Some(invoice));
    }

    #[tokio::test]
    async fn test_create_with_unknown_customer_violates_constraint() {
        let store = store();
        let invoice = Invoice::new("nobody", 1500, InvoiceStatus::Pending, day(1));

        let err = InvoiceService::create(&store, invoice).await.unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_missing_invoice_is_not_found() {
        let store = store();
        let id = Uuid::new_v4();
        let err = store
            .update(
                &id,
                InvoiceChanges {
                    customer_id: "c1".to_string(),
                    amount: 1,
                    status: InvoiceStatus::Paid,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { id: missing } if missing == id));
    }

    #[tokio::test]
    async fn test_delete_reports_whether_removed() {
        let store = store();
        let invoice = Invoice::new("c1", 1500, InvoiceStatus::Pending, day(1));
        InvoiceService::create(&store, invoice.clone()).await.unwrap();

        assert!(store.delete(&invoice.id).await.unwrap());
        assert!(!store.delete(&invoice.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_search_filters_and_orders_newest_first() {
        let store = store();
        for (customer, amount, status, d) in [
            ("c1", 1000, InvoiceStatus::Paid, 1),
            ("c2", 2000, InvoiceStatus::Pending, 3),
            ("c1", 3000, InvoiceStatus::Pending, 2),
        ] {
            InvoiceService::create(&store, Invoice::new(customer, amount, status, day(d)))
                .await
                .unwrap();
        }

        let all = store.search("", 1, 10).await.unwrap();
        let dates: Vec<_> = all.items.iter().map(|i| i.date).collect();
        assert_eq!(dates, vec![day(3), day(2), day(1)]);

        let lee = store.search("LEE", 1, 10).await.unwrap();
        assert_eq!(lee.items.len(), 2);
        assert!(lee.items.iter().all(|i| i.name == "Lee Robinson"));

        let pending = store.search("pending", 1, 10).await.unwrap();
        assert_eq!(pending.items.len(), 2);

        let by_amount = store.search("2000", 1, 10).await.unwrap();
        assert_eq!(by_amount.items.len(), 1);
        assert_eq!(by_amount.items[0].email, "delba@oliveira.com");
    }

    #[tokio::test]
    async fn test_search_paginates() {
        let store = store();
        for d in 1..=7 {
            InvoiceService::create(&store, Invoice::new("c1", 100, InvoiceStatus::Paid, day(d)))
                .await
                .unwrap();
        }

        let first = store.search("", 1, 6).await.unwrap();
        assert_eq!(first.items.len(), 6);
        assert_eq!(first.total_pages, 2);

        let second = store.search("", 2, 6).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].date, day(1));

        let beyond = store.search("", 5, 6).await.unwrap();
        assert!(beyond.items.is_empty());
    }

    #[tokio::test]
    async fn test_summary_totals() {
        let store = store();
        InvoiceService::create(&store, Invoice::new("c1", 1000, InvoiceStatus::Paid, day(1)))
            .await
            .unwrap();
        InvoiceService::create(&store, Invoice::new("c2", 250, InvoiceStatus::Pending, day(1)))
            .await
            .unwrap();

        let summary = store.summary().await.unwrap();
        assert_eq!(summary.invoice_count, 2);
        assert_eq!(summary.customer_count, 2);
        assert_eq!(summary.total_paid, 1000);
        assert_eq!(summary.total_pending, 250);
    }

    #[tokio::test]
    async fn test_customers_listed_by_name() {
        let store = store();
        let names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Delba de Oliveira", "Lee Robinson"]);
    }
}
