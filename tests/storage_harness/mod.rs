//! Shared test harness for storage backend testing
//!
//! Provides fixed customers, an invoice factory and the
//! `invoice_service_tests!` contract suite.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod invoice_service_tests;

use chrono::NaiveDate;
use dashboard::core::invoice::{Customer, Invoice, InvoiceStatus};
use dashboard::core::service::CustomerService;

pub const LEE_ID: &str = "3958dc9e-742f-4377-85e9-fec4b6a6442a";
pub const RABBIT_ID: &str = "d6e15727-9fe1-4961-8c5b-ea44a9bd81aa";
/// Well-formed id that no customer has
pub const UNKNOWN_CUSTOMER_ID: &str = "00000000-0000-4000-8000-000000000000";

pub fn test_customers() -> Vec<Customer> {
    vec![
        Customer::new(LEE_ID, "Lee Robinson", "lee@robinson.com"),
        Customer::new(RABBIT_ID, "Evil Rabbit", "evil@rabbit.com"),
    ]
}

pub async fn seed_customers(service: &dyn CustomerService) {
    for customer in test_customers() {
        service.insert(customer).await.unwrap();
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn test_invoice(customer_id: &str, amount: i64, status: InvoiceStatus, date: NaiveDate) -> Invoice {
    Invoice::new(customer_id, amount, status, date)
}
