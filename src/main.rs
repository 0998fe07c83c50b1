//! Payables API server binary

use std::sync::Arc;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use payables::config::AppConfig;
use payables::server::{AppState, build_router};
use payables::storage::{InMemoryStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("payables=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let store = make_store(&config).await?;

    let app = build_router(AppState { store })
        .layer(config.cors_layer()?)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn make_store(config: &AppConfig) -> Result<Arc<dyn Store>> {
    #[cfg(feature = "postgres")]
    if let Some(url) = &config.database_url {
        let store = payables::storage::PostgresStore::connect(url).await?;
        tracing::info!("using PostgreSQL storage backend");
        return Ok(Arc::new(store));
    }

    #[cfg(not(feature = "postgres"))]
    if config.database_url.is_some() {
        tracing::warn!(
            "DATABASE_URL is set but the 'postgres' feature is not enabled; using in-memory storage"
        );
    }

    tracing::info!("using in-memory storage backend");
    Ok(Arc::new(InMemoryStore::new()))
}
