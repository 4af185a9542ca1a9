//! Route table of the dashboard

use super::handlers::{
    AppState, create_invoice, delete_invoice, get_invoice, home, list_customers, list_invoices,
    login, login_page, logout, overview, update_invoice,
};
use super::middleware::access_gate;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Build the dashboard routes from the configured paths
///
/// Gated routes:
/// - GET / - Landing page
/// - GET /login, POST /login - Sign-in page and action
/// - GET {dashboard} - Summary cards
/// - GET {dashboard}/customers - Customer list
/// - GET {invoices}?query=&page= - Search list
/// - POST {invoices} - Create
/// - GET {invoices}/{id} - Edit form data
/// - POST {invoices}/{id} - Update
/// - DELETE {invoices}/{id}, POST {invoices}/{id}/delete - Delete
///
/// `POST /logout` bypasses the gate so a signed-in user can reach it.
pub fn build_dashboard_routes(state: AppState) -> Router {
    let routes = state.config.routes.clone();
    let invoice = format!("{}/{{id}}", routes.invoices);

    let gated = Router::new()
        .route("/", get(home))
        .route(&routes.login, get(login_page).post(login))
        .route(&routes.dashboard, get(overview))
        .route(&format!("{}/customers", routes.dashboard), get(list_customers))
        .route(&routes.invoices, get(list_invoices).post(create_invoice))
        .route(
            &invoice,
            get(get_invoice).post(update_invoice).delete(delete_invoice),
        )
        .route(&format!("{}/delete", invoice), post(delete_invoice))
        .layer(middleware::from_fn_with_state(state.clone(), access_gate));

    Router::new()
        .route("/logout", post(logout))
        .merge(gated)
        .with_state(state)
}
