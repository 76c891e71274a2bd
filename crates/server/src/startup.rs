use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::{AppConfig, StoreBackend};
use dotenvy::dotenv;
use migration::MigratorTrait;
use service::{
    runtime,
    storage::{DocumentStore, MemoryDocumentStore, SeaOrmDocumentStore, StorageAdapter, UnavailableDocumentStore},
    uploads::ImageStore,
    ListingService,
};
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::{AppState, DatabaseInfo};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_from_env();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Pick the document store; database trouble degrades to an unavailable store instead of failing.
pub async fn build_store(cfg: &AppConfig) -> Arc<dyn DocumentStore> {
    match cfg.store.backend {
        StoreBackend::Memory => {
            warn!(event = "store_memory", "using in-memory document store; listings are lost on restart");
            Arc::new(MemoryDocumentStore::new())
        }
        StoreBackend::Database if !cfg.database.is_configured() => {
            warn!(event = "store_unconfigured", "DATABASE_URL not set; listing routes will report storage errors");
            Arc::new(UnavailableDocumentStore::new("database not configured"))
        }
        StoreBackend::Database => match connect_and_migrate(cfg).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                error!(event = "store_connect_failed", error = %e, "database unavailable");
                Arc::new(UnavailableDocumentStore::new(format!("database connection failed: {e}")))
            }
        },
    }
}

async fn connect_and_migrate(cfg: &AppConfig) -> anyhow::Result<SeaOrmDocumentStore> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!(event = "migrations_applied", "database schema up to date");
    Ok(SeaOrmDocumentStore::new(db))
}

/// Construct the shared state from configuration and an already chosen store.
pub fn build_state(cfg: &AppConfig, store: Arc<dyn DocumentStore>) -> AppState {
    let images = ImageStore::new(&cfg.uploads.dir, cfg.uploads.public_prefix.clone());
    let listings = ListingService::new(StorageAdapter::new(store), images, cfg.collections.vehicle.clone());
    AppState { listings, database: DatabaseInfo::from_config(cfg) }
}

/// Everything needed to serve: upload directory, store, state and router.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    runtime::ensure_env(&cfg.uploads.dir)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    let store = build_store(cfg).await;
    let state = build_state(cfg, store);
    Ok(routes::build_router(state, build_cors(), &cfg.uploads))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}

/// Serve with an already loaded configuration until Ctrl+C.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;
    let addr = bind_addr(&cfg)?;
    info!(%addr, upload_dir = %cfg.uploads.dir, collection = %cfg.collections.vehicle, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Public entry: load `.env` and configuration, then run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();
    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    run_with_config(cfg).await
}
