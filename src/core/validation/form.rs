//! Raw form input and the structured result of a rejected form

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Form field names as they appear on the wire
pub const CUSTOMER_ID: &str = "customerId";
pub const AMOUNT: &str = "amount";
pub const STATUS: &str = "status";

/// Field messages keyed by form field name, in form order
pub type FieldErrors = IndexMap<String, Vec<String>>;

/// Raw field bag submitted by the invoice form
///
/// Every field is optional: a form with no customer selected simply omits
/// `customerId`, and validation turns that into a field message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceFormInput {
    #[serde(rename = "customerId", default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl InvoiceFormInput {
    pub fn new(customer_id: &str, amount: &str, status: &str) -> Self {
        Self {
            customer_id: Some(customer_id.to_string()),
            amount: Some(amount.to_string()),
            status: Some(status.to_string()),
        }
    }
}

/// What a form gets back when an action does not go through
///
/// `errors` lets the form re-render a message next to each bad field while
/// keeping the rest of the input; `message` is the banner above the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub errors: FieldErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormState {
    /// Field errors plus a banner message
    pub fn invalid(errors: FieldErrors, message: impl Into<String>) -> Self {
        Self {
            errors,
            message: Some(message.into()),
        }
    }

    /// Banner message only
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            errors: FieldErrors::new(),
            message: Some(message.into()),
        }
    }

    pub fn has_field_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Messages for one field, empty when the field was fine
    pub fn field(&self, name: &str) -> &[String] {
        self.errors.get(name).map(Vec::as_slice).unwrap_or_default()
    }
}
