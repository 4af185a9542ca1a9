//! Invoice form actions
//!
//! Each action runs validate → normalize → persist → revalidate → redirect.
//! Nothing here returns an error: a rejected form, a missing invoice or a
//! failed write all come back as a [`FormState`] the form can render.
//!
//! A failed write is reported and stops the pipeline. The invoice list is
//! only revalidated, and the client only redirected, once the write has
//! actually happened.

use crate::core::cache::PathRevalidator;
use crate::core::error::StorageError;
use crate::core::invoice::{Invoice, today};
use crate::core::service::InvoiceService;
use crate::core::validation::{FormState, InvoiceFormInput, validate_invoice_form};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

pub const CREATE_MISSING_FIELDS: &str = "Missing Fields. Failed to Create Invoice.";
pub const UPDATE_MISSING_FIELDS: &str = "Missing Fields. Failed to Update Invoice.";
pub const CREATE_FAILED: &str = "Database Error: Failed to Create Invoice.";
pub const UPDATE_FAILED: &str = "Database Error: Failed to Update Invoice.";
pub const DELETE_FAILED: &str = "Database Error: Failed to Delete Invoice.";
pub const INVOICE_NOT_FOUND: &str = "Invoice not found.";
pub const DELETED: &str = "Deleted Invoice.";
pub const ALREADY_DELETED: &str = "Invoice already deleted.";

/// Result of a form action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Write done, send the client here
    Redirect(String),
    /// Write done, stay on the page
    Completed(FormState),
    /// Input rejected, nothing written
    Invalid(FormState),
    /// Target invoice does not exist
    NotFound(FormState),
    /// Storage refused the write
    Failed(FormState),
}

impl ActionOutcome {
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            ActionOutcome::Redirect(path) => Some(path),
            _ => None,
        }
    }

    pub fn state(&self) -> Option<&FormState> {
        match self {
            ActionOutcome::Redirect(_) => None,
            ActionOutcome::Completed(state)
            | ActionOutcome::Invalid(state)
            | ActionOutcome::NotFound(state)
            | ActionOutcome::Failed(state) => Some(state),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ActionOutcome::Redirect(_) => StatusCode::SEE_OTHER,
            ActionOutcome::Completed(_) => StatusCode::OK,
            ActionOutcome::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ActionOutcome::NotFound(_) => StatusCode::NOT_FOUND,
            ActionOutcome::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ActionOutcome {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ActionOutcome::Redirect(path) => Redirect::to(&path).into_response(),
            ActionOutcome::Completed(state)
            | ActionOutcome::Invalid(state)
            | ActionOutcome::NotFound(state)
            | ActionOutcome::Failed(state) => (status, Json(state)).into_response(),
        }
    }
}

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// The invoice mutation pipeline
#[derive(Clone)]
pub struct InvoiceActions {
    invoices: Arc<dyn InvoiceService>,
    revalidator: Arc<dyn PathRevalidator>,
    invoices_path: String,
    clock: Clock,
}

impl InvoiceActions {
    /// `invoices_path` is both the route revalidated after a write and the
    /// redirect target of create and update.
    pub fn new(
        invoices: Arc<dyn InvoiceService>,
        revalidator: Arc<dyn PathRevalidator>,
        invoices_path: impl Into<String>,
    ) -> Self {
        Self {
            invoices,
            revalidator,
            invoices_path: invoices_path.into(),
            clock: Arc::new(today),
        }
    }

    /// Replace the source of "today" used for new invoices
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn invoices_path(&self) -> &str {
        &self.invoices_path
    }

    fn finish_write(&self) -> ActionOutcome {
        self.revalidator.revalidate_path(&self.invoices_path);
        ActionOutcome::Redirect(self.invoices_path.clone())
    }

    pub async fn create(&self, input: &InvoiceFormInput) -> ActionOutcome {
        let changes = match validate_invoice_form(input) {
            Ok(changes) => changes,
            Err(errors) => {
                tracing::debug!(fields = ?errors.keys().collect::<Vec<_>>(), "create rejected");
                return ActionOutcome::Invalid(FormState::invalid(errors, CREATE_MISSING_FIELDS));
            }
        };

        let invoice = Invoice::new(changes.customer_id, changes.amount, changes.status, (self.clock)());

        match self.invoices.create(invoice).await {
            Ok(invoice) => {
                tracing::info!(invoice_id = %invoice.id, amount = invoice.amount, "invoice created");
                self.finish_write()
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to insert invoice");
                ActionOutcome::Failed(FormState::message(CREATE_FAILED))
            }
        }
    }

    pub async fn update(&self, id: &Uuid, input: &InvoiceFormInput) -> ActionOutcome {
        let changes = match validate_invoice_form(input) {
            Ok(changes) => changes,
            Err(errors) => {
                tracing::debug!(invoice_id = %id, fields = ?errors.keys().collect::<Vec<_>>(), "update rejected");
                return ActionOutcome::Invalid(FormState::invalid(errors, UPDATE_MISSING_FIELDS));
            }
        };

        match self.invoices.update(id, changes).await {
            Ok(invoice) => {
                tracing::info!(invoice_id = %invoice.id, amount = invoice.amount, "invoice updated");
                self.finish_write()
            }
            Err(StorageError::NotFound { .. }) => {
                tracing::warn!(invoice_id = %id, "update of unknown invoice");
                ActionOutcome::NotFound(FormState::message(INVOICE_NOT_FOUND))
            }
            Err(e) => {
                tracing::error!(invoice_id = %id, error = %e, "failed to update invoice");
                ActionOutcome::Failed(FormState::message(UPDATE_FAILED))
            }
        }
    }

    /// Delete never navigates. Deleting an id that is already gone still
    /// revalidates the list and reports success.
    pub async fn delete(&self, id: &Uuid) -> ActionOutcome {
        match self.invoices.delete(id).await {
            Ok(true) => {
                tracing::info!(invoice_id = %id, "invoice deleted");
                self.revalidator.revalidate_path(&self.invoices_path);
                ActionOutcome::Completed(FormState::message(DELETED))
            }
            Ok(false) => {
                tracing::warn!(invoice_id = %id, "delete of unknown invoice");
                self.revalidator.revalidate_path(&self.invoices_path);
                ActionOutcome::Completed(FormState::message(ALREADY_DELETED))
            }
            Err(e) => {
                tracing::error!(invoice_id = %id, error = %e, "failed to delete invoice");
                ActionOutcome::Failed(FormState::message(DELETE_FAILED))
            }
        }
    }
}
