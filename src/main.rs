//! Invoice dashboard server
//!
//! Usage: `invoice-dashboard [config.yaml]`. Without a file the built-in
//! defaults are used. `POSTGRES_URL` overrides `database.url`; without any
//! database URL invoices live in memory.

use anyhow::Result;
use dashboard::prelude::*;
use tracing_subscriber::EnvFilter;

/// Customers created on first start so the invoice form has something to pick
fn demo_customers() -> Vec<Customer> {
    vec![
        Customer::new(
            "d6e15727-9fe1-4961-8c5b-ea44a9bd81aa",
            "Evil Rabbit",
            "evil@rabbit.com",
        ),
        Customer::new(
            "3958dc9e-712f-4377-85e9-fec4b6a6442a",
            "Delba de Oliveira",
            "delba@oliveira.com",
        ),
        Customer::new(
            "3958dc9e-742f-4377-85e9-fec4b6a6442a",
            "Lee Robinson",
            "lee@robinson.com",
        ),
        Customer::new(
            "76d65c26-f784-44a2-ac19-586678f7c2f2",
            "Michael Novotny",
            "michael@novotny.com",
        ),
    ]
}

async fn seed_customers(customers: &dyn CustomerService) -> Result<()> {
    if !customers.list().await?.is_empty() {
        return Ok(());
    }
    for customer in demo_customers() {
        customers.insert(customer).await?;
    }
    tracing::info!("seeded demo customers");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let mut config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(%path, "loading configuration");
            DashboardConfig::from_yaml_file(&path)?
        }
        None => DashboardConfig::default_config(),
    };
    if let Ok(url) = std::env::var("POSTGRES_URL") {
        config.database.url = Some(url);
    }
    config.validate()?;

    let builder = ServerBuilder::new(config.clone());

    let builder = match config.database.url.as_deref() {
        #[cfg(feature = "postgres")]
        Some(url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await?;
            ensure_schema(&pool).await?;
            let store = PostgresStore::new(pool);
            seed_customers(&store).await?;
            tracing::info!("using PostgreSQL storage");
            builder.with_store(store)
        }
        #[cfg(not(feature = "postgres"))]
        Some(_) => {
            anyhow::bail!("database.url is set but the binary was built without the `postgres` feature")
        }
        None => {
            let store = InMemoryStore::new();
            seed_customers(&store).await?;
            tracing::info!("using in-memory storage");
            builder.with_store(store)
        }
    };

    builder.serve().await
}
