//! HTTP handlers for the dashboard
//!
//! Form actions return an [`ActionOutcome`], which already knows its HTTP
//! shape. Read endpoints return JSON or a [`DashboardError`].

use axum::{
    Extension, Form, Json,
    extract::{Path, Query, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::DashboardConfig;
use crate::core::actions::{ActionOutcome, InvoiceActions};
use crate::core::auth::{Authenticator, Credentials, LoginOutcome, Session, User, authenticate};
use crate::core::cache::PageCache;
use crate::core::error::{DashboardError, DashboardResult, StorageError};
use crate::core::invoice::{Customer, InvoiceForm, InvoiceSummary};
use crate::core::search::{SearchParams, SearchQuery};
use crate::core::service::{CustomerService, InvoiceService};
use crate::core::validation::{FormState, InvoiceFormInput};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
    pub invoices: Arc<dyn InvoiceService>,
    pub customers: Arc<dyn CustomerService>,
    pub actions: InvoiceActions,
    pub cache: Arc<PageCache>,
    pub authenticator: Authenticator,
}

/// `Authorization: Bearer <token>` as a session token
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    Uuid::parse_str(token.trim()).ok()
}

fn parse_invoice_id(id: &str) -> DashboardResult<Uuid> {
    Ok(Uuid::parse_str(id)?)
}

// =============================================================================
// Public pages
// =============================================================================

pub async fn home(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "login": state.config.routes.login,
    }))
}

#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

/// Data the login page renders: where to go after signing in
pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<LoginPageQuery>,
) -> Json<Value> {
    let callback = safe_callback(query.callback_url.as_deref(), &state.config.routes.dashboard);
    Json(json!({ "callbackUrl": callback }))
}

/// Submitted login form
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: Uuid,
    pub user: User,
    #[serde(rename = "redirectTo")]
    pub redirect_to: String,
}

/// Only same-site absolute paths are followed after sign-in
fn safe_callback(callback: Option<&str>, fallback: &str) -> String {
    match callback {
        Some(url) if url.starts_with('/') && !url.starts_with("//") => url.to_string(),
        _ => fallback.to_string(),
    }
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> DashboardResult<Response> {
    let credentials = Credentials::new(form.email, form.password);
    match authenticate(&state.authenticator, &credentials).await? {
        LoginOutcome::SignedIn(session) => {
            let redirect_to = safe_callback(
                form.callback_url.as_deref(),
                &state.config.routes.dashboard,
            );
            Ok(Json(LoginResponse {
                token: session.token,
                user: session.user,
                redirect_to,
            })
            .into_response())
        }
        LoginOutcome::Rejected(message) => {
            Ok((StatusCode::UNAUTHORIZED, Json(FormState::message(message))).into_response())
        }
    }
}

/// Drop the caller's session, if any, and go back to the landing page
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> DashboardResult<Redirect> {
    if let Some(token) = bearer_token(&headers) {
        if state.authenticator.sessions().remove(&token)? {
            tracing::info!(%token, "signed out");
        }
    }
    Ok(Redirect::to("/"))
}

// =============================================================================
// Dashboard reads
// =============================================================================

#[derive(Debug, Serialize)]
pub struct DashboardOverview {
    pub user: User,
    #[serde(flatten)]
    pub summary: InvoiceSummary,
}

pub async fn overview(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> DashboardResult<Json<DashboardOverview>> {
    let summary = state.invoices.summary().await?;
    Ok(Json(DashboardOverview {
        user: session.user,
        summary,
    }))
}

pub async fn list_customers(State(state): State<AppState>) -> DashboardResult<Json<Vec<Customer>>> {
    Ok(Json(state.customers.list().await?))
}

/// Filtered, paginated invoice list, served from the page cache when fresh
///
/// Pages are cached under the normalized search, so unrelated query
/// parameters neither miss the cache nor add entries.
pub async fn list_invoices(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> DashboardResult<Json<Value>> {
    let path = state.config.routes.invoices.as_str();
    let request = SearchQuery::from_params(&SearchParams::parse(raw.as_deref().unwrap_or_default()));
    let variant = request.canonical();

    if let Some(page) = state.cache.get(path, &variant) {
        tracing::debug!(path, %variant, "page cache hit");
        return Ok(Json(page));
    }

    let generation = state.cache.generation();
    let page = state
        .invoices
        .search(
            &request.query,
            request.page,
            state.config.search.items_per_page,
        )
        .await?;

    let page = serde_json::to_value(page)
        .map_err(|e| DashboardError::Internal(format!("Failed to serialize invoice page: {}", e)))?;
    state
        .cache
        .insert_if_fresh(path, &variant, generation, page.clone());
    Ok(Json(page))
}

#[derive(Debug, Serialize)]
pub struct EditInvoiceResponse {
    pub invoice: InvoiceForm,
    pub customers: Vec<Customer>,
}

/// The invoice as the edit form shows it, plus the customers to pick from
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> DashboardResult<Json<EditInvoiceResponse>> {
    let id = parse_invoice_id(&id)?;
    let invoice = state
        .invoices
        .get(&id)
        .await?
        .ok_or(StorageError::NotFound { id })?;
    let customers = state.customers.list().await?;

    Ok(Json(EditInvoiceResponse {
        invoice: InvoiceForm::from(&invoice),
        customers,
    }))
}

// =============================================================================
// Form actions
// =============================================================================

pub async fn create_invoice(
    State(state): State<AppState>,
    Form(input): Form<InvoiceFormInput>,
) -> ActionOutcome {
    state.actions.create(&input).await
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(input): Form<InvoiceFormInput>,
) -> DashboardResult<ActionOutcome> {
    let id = parse_invoice_id(&id)?;
    Ok(state.actions.update(&id, &input).await)
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> DashboardResult<ActionOutcome> {
    let id = parse_invoice_id(&id)?;
    Ok(state.actions.delete(&id).await)
}
