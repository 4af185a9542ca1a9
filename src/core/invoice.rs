//! Invoice and customer records
//!
//! Amounts are always held as integer cents. Dollar values only exist while a
//! form is being coerced and when an invoice is handed back to an edit form.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Payment state of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    /// All accepted values, in the order a status picker shows them
    pub const ALL: [InvoiceStatus; 2] = [InvoiceStatus::Pending, InvoiceStatus::Paid];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    /// Exact, case-sensitive match
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            other => Err(format!("unknown invoice status '{}'", other)),
        }
    }
}

/// A persisted invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub customer_id: String,
    /// Amount in cents
    pub amount: i64,
    pub status: InvoiceStatus,
    /// Creation day, `YYYY-MM-DD` on the wire
    pub date: NaiveDate,
}

impl Invoice {
    /// Build a new invoice with a fresh id
    pub fn new(
        customer_id: impl Into<String>,
        amount: i64,
        status: InvoiceStatus,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id: customer_id.into(),
            amount,
            status,
            date,
        }
    }

    /// Apply an update. `id` and `date` never change.
    pub fn apply(&mut self, changes: &InvoiceChanges) {
        self.customer_id = changes.customer_id.clone();
        self.amount = changes.amount;
        self.status = changes.status;
    }
}

/// The mutable part of an invoice, already validated and in cents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceChanges {
    pub customer_id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
}

/// Invoice shaped for the edit form: amount back in dollars
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceForm {
    pub id: Uuid,
    #[serde(rename = "customerId")]
    pub customer_id: String,
    pub amount: f64,
    pub status: InvoiceStatus,
}

impl From<&Invoice> for InvoiceForm {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id,
            customer_id: invoice.customer_id.clone(),
            amount: cents_to_dollars(invoice.amount),
            status: invoice.status,
        }
    }
}

/// A customer an invoice can point at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Customer {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            image_url: None,
        }
    }
}

/// One row of the invoice table: invoice joined with its customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceListItem {
    pub id: Uuid,
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub amount: i64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// One page of a filtered invoice listing
#[derive(Debug, Clone, Serialize)]
pub struct InvoicePage {
    pub items: Vec<InvoiceListItem>,
    pub query: String,
    pub page: u32,
    pub total_pages: u32,
}

/// Dashboard cards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvoiceSummary {
    pub invoice_count: u64,
    pub customer_count: u64,
    /// Cents
    pub total_paid: i64,
    /// Cents
    pub total_pending: i64,
}

/// Convert a validated dollar amount into cents, rounding half away from zero
pub fn dollars_to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub fn cents_to_dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Current UTC day
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Number of pages needed to show `total` rows, at least one
pub fn total_pages(total: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    total.div_ceil(per_page).max(1) as u32
}
