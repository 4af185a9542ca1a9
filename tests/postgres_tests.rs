//! Integration tests for PostgresStore using the storage test harness.
//!
//! # Requirements
//!
//! - Docker must be running (testcontainers launches a PostgreSQL container)
//! - Feature flag `postgres` must be enabled
//!
//! # Running
//!
//! ```sh
//! cargo test --features postgres --test postgres_tests -- --test-threads=1
//! ```
//!
//! All tests share a single PostgreSQL container (via `OnceLock`). Each test
//! creates a fresh `PgPool` and truncates tables before running.

#![cfg(feature = "postgres")]

#[macro_use]
mod storage_harness;

use dashboard::storage::{PostgresStore, ensure_schema};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::OnceLock;
use storage_harness::*;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;

// ---------------------------------------------------------------------------
// Shared test environment (single container, fresh pool per test)
// ---------------------------------------------------------------------------

/// Holds the testcontainer handle (keeps it alive) and the connection URL.
///
/// Stored in a process-global `OnceLock` so the container outlives the
/// individual runtimes created by `#[tokio::test]`.
struct PgTestEnv {
    _container: testcontainers::ContainerAsync<Postgres>,
    connection_url: String,
}

static TEST_ENV: OnceLock<PgTestEnv> = OnceLock::new();

async fn init_pg_env() -> &'static PgTestEnv {
    if let Some(env) = TEST_ENV.get() {
        return env;
    }

    let container = Postgres::default()
        .start()
        .await
        .expect("Failed to start PostgreSQL container, is Docker running?");

    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(5432).await.unwrap();
    let url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let pool = PgPool::connect(&url)
        .await
        .expect("Failed to connect to PostgreSQL");
    ensure_schema(&pool).await.expect("Failed to create schema");
    pool.close().await;

    let _ = TEST_ENV.set(PgTestEnv {
        _container: container,
        connection_url: url,
    });
    TEST_ENV.get().unwrap()
}

/// Fresh pool bound to the current runtime
async fn pg_pool() -> PgPool {
    let env = init_pg_env().await;
    PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&env.connection_url)
        .await
        .expect("Failed to connect to PostgreSQL")
}

/// Create a fresh `PostgresStore` with empty tables.
async fn clean_pg_store() -> PostgresStore {
    let pool = pg_pool().await;
    sqlx::query("TRUNCATE invoices, customers CASCADE")
        .execute(&pool)
        .await
        .expect("Failed to truncate tables");
    PostgresStore::new(pool)
}

invoice_service_tests!(clean_pg_store().await);

#[tokio::test]
async fn test_ensure_schema_is_idempotent() {
    let store = clean_pg_store().await;
    ensure_schema(store.pool()).await.unwrap();
    ensure_schema(store.pool()).await.unwrap();
}

#[tokio::test]
async fn test_negative_amount_is_rejected_by_schema() {
    use dashboard::core::error::StorageError;
    use dashboard::core::invoice::InvoiceStatus;
    use dashboard::core::service::InvoiceService;

    let store = clean_pg_store().await;
    seed_customers(&store).await;

    let invoice = test_invoice(LEE_ID, -1, InvoiceStatus::Paid, day(2023, 1, 1));
    let err = InvoiceService::create(&store, invoice).await.unwrap_err();
    assert!(matches!(err, StorageError::ConstraintViolation { .. }), "{:?}", err);
}
