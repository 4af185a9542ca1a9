//! Invoice form validation
//!
//! Validation is field-addressable: every field is checked, and all failures
//! are reported together so the form can show them at once.

pub mod form;
pub mod validators;

pub use form::{FieldErrors, FormState, InvoiceFormInput};

use crate::core::invoice::{InvoiceChanges, InvoiceStatus, dollars_to_cents};

pub const CUSTOMER_REQUIRED: &str = "Please select a customer.";
pub const AMOUNT_NOT_A_NUMBER: &str = "Please enter a valid amount.";
pub const AMOUNT_TOO_SMALL: &str = "Please enter an amount greater than $0.";
pub const AMOUNT_TOO_LARGE: &str = "Please enter a smaller amount.";
pub const STATUS_REQUIRED: &str = "Please select an invoice status.";

/// Largest dollar amount whose cent value still fits an `i64`
const MAX_AMOUNT: f64 = (i64::MAX / 100) as f64;

/// Validate and normalize a raw invoice form.
///
/// On success the amount is already converted to cents.
pub fn validate_invoice_form(input: &InvoiceFormInput) -> Result<InvoiceChanges, FieldErrors> {
    let customer_id = validators::required(CUSTOMER_REQUIRED)(input.customer_id.as_deref());

    let amount = validators::coerce_number(AMOUNT_NOT_A_NUMBER)(input.amount.as_deref())
        .and_then(validators::greater_than(0.0, AMOUNT_TOO_SMALL))
        .and_then(validators::max_value(MAX_AMOUNT, AMOUNT_TOO_LARGE));

    let status = validators::one_of::<InvoiceStatus>(STATUS_REQUIRED)(input.status.as_deref());

    match (customer_id, amount, status) {
        (Ok(customer_id), Ok(amount), Ok(status)) => Ok(InvoiceChanges {
            customer_id,
            amount: dollars_to_cents(amount),
            status,
        }),
        (customer_id, amount, status) => {
            let mut errors = FieldErrors::new();
            if let Err(message) = customer_id {
                errors.entry(form::CUSTOMER_ID.to_string()).or_default().push(message);
            }
            if let Err(message) = amount {
                errors.entry(form::AMOUNT.to_string()).or_default().push(message);
            }
            if let Err(message) = status {
                errors.entry(form::STATUS.to_string()).or_default().push(message);
            }
            Err(errors)
        }
    }
}
