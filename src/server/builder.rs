//! ServerBuilder for fluent API to build the dashboard server

use super::handlers::AppState;
use super::router::build_dashboard_routes;
use crate::config::DashboardConfig;
use crate::core::actions::InvoiceActions;
use crate::core::auth::{Authenticator, CREDENTIALS_PROVIDER, CredentialsProvider, SessionStore};
use crate::core::cache::PageCache;
use crate::core::service::{CustomerService, InvoiceService};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Builder for the dashboard HTTP server
///
/// # Example
///
/// ```ignore
/// let store = InMemoryStore::new();
/// let app = ServerBuilder::new(DashboardConfig::default_config())
///     .with_store(store)
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: DashboardConfig,
    invoices: Option<Arc<dyn InvoiceService>>,
    customers: Option<Arc<dyn CustomerService>>,
    authenticator: Option<Authenticator>,
    cache: Arc<PageCache>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new(config: DashboardConfig) -> Self {
        let cache = Arc::new(PageCache::with_capacity(config.search.cache_capacity));
        Self {
            config,
            invoices: None,
            customers: None,
            authenticator: None,
            cache,
            custom_routes: Vec::new(),
        }
    }

    /// Set the invoice service (required)
    pub fn with_invoice_service(mut self, service: impl InvoiceService + 'static) -> Self {
        self.invoices = Some(Arc::new(service));
        self
    }

    /// Set the customer service (required)
    pub fn with_customer_service(mut self, service: impl CustomerService + 'static) -> Self {
        self.customers = Some(Arc::new(service));
        self
    }

    /// Use one backend for both invoices and customers
    pub fn with_store<S>(self, store: S) -> Self
    where
        S: InvoiceService + CustomerService + Clone + 'static,
    {
        self.with_invoice_service(store.clone())
            .with_customer_service(store)
    }

    /// Replace the authenticator built from `auth.users`
    pub fn with_authenticator(mut self, authenticator: Authenticator) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Share a page cache with the caller (tests inspect it)
    pub fn with_page_cache(mut self, cache: Arc<PageCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Add routes outside the dashboard table, such as health checks
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Assemble the shared handler state
    pub fn build_state(&mut self) -> Result<AppState> {
        self.config.validate()?;

        let invoices = self.invoices.take().ok_or_else(|| {
            anyhow::anyhow!("InvoiceService is required. Call .with_invoice_service()")
        })?;
        let customers = self.customers.take().ok_or_else(|| {
            anyhow::anyhow!("CustomerService is required. Call .with_customer_service()")
        })?;

        let authenticator = self.authenticator.take().unwrap_or_else(|| {
            Authenticator::new(SessionStore::new()).with_provider(
                CREDENTIALS_PROVIDER,
                CredentialsProvider::new(self.config.auth.users.clone()),
            )
        });

        let actions = InvoiceActions::new(
            invoices.clone(),
            self.cache.clone(),
            self.config.routes.invoices.clone(),
        );

        Ok(AppState {
            config: Arc::new(self.config.clone()),
            invoices,
            customers,
            actions,
            cache: self.cache.clone(),
            authenticator,
        })
    }

    /// Build the final router
    pub fn build(mut self) -> Result<Router> {
        let state = self.build_state()?;
        let mut app = build_dashboard_routes(state);

        for custom_router in std::mem::take(&mut self.custom_routes) {
            app = app.merge(custom_router);
        }

        Ok(app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http())))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `server.bind` and stops on SIGTERM or Ctrl+C.
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.bind.clone();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
