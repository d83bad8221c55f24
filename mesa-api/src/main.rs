//! # Mesa API Server
//!
//! CRUD backend for restaurant operations: users, menus, tables, orders,
//! order-items, and invoices over HTTP, backed by a PostgreSQL document
//! store. Authentication issues and refreshes bearer token pairs; the
//! one non-trivial workflow is the order-to-invoice aggregation served
//! at `GET /invoice/:invoice_id`.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/mesa JWT_SECRET=... cargo run -p mesa-api
//! ```

use mesa_api::{
    app::{build_router, AppState},
    config::Config,
};
use mesa_shared::db::{migrations::run_migrations, pool::create_pool, store::Store};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mesa_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Mesa API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let pool = create_pool(config.database.clone()).await?;
    run_migrations(&pool).await?;

    let store = Store::new(pool, config.database.op_timeout());
    let state = AppState::new(store, config.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Server listening on http://{}", config.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
