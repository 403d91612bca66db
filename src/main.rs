//! Beredskap Server: community resource sharing and messaging.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use beredskap_api::{AppState, build_app};
use beredskap_cache::CacheManager;
use beredskap_core::config::{AppConfig, StoreBackend};
use beredskap_core::error::AppError;
use beredskap_database::{
    DatabasePool, MemoryMembershipGate, MemoryStore, PgMembershipGate, PgStore, Stores,
};
use beredskap_realtime::MessageHub;
use beredskap_service::Services;

const RETENTION_INTERVAL: Duration = Duration::from_secs(60 * 60);
const HUB_PRUNE_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[tokio::main]
async fn main() {
    let env = std::env::var("BEREDSKAP_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Beredskap v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Store ────────────────────────────────────────────
    let (stores, db_pool) = open_stores(&config).await?;

    // ── Step 2: Cache ────────────────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing cache...");
    let cache = CacheManager::new(&config.cache).await?;

    // ── Step 3: Services ─────────────────────────────────────────
    let hub = Arc::new(MessageHub::new(config.realtime.channel_buffer_size));
    let services = Services::new(
        stores,
        cache.clone(),
        Arc::clone(&hub),
        config.notifications.clone(),
        config.realtime.clone(),
    );

    // ── Step 4: Background tasks ─────────────────────────────────
    let retention = Arc::clone(&services.notifications).spawn_retention(RETENTION_INTERVAL);
    let prune_hub = Arc::clone(&hub);
    let pruner = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(HUB_PRUNE_INTERVAL);
        loop {
            ticker.tick().await;
            let dropped = prune_hub.prune();
            if dropped > 0 {
                tracing::debug!(dropped, "Pruned idle message channels");
            }
        }
    });

    // ── Step 5: HTTP server ──────────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(Arc::new(config), services, cache, hub);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Beredskap server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    retention.abort();
    pruner.abort();
    if let Some(pool) = db_pool {
        pool.close().await;
    }

    tracing::info!("Beredskap server stopped");
    Ok(())
}

/// Build the configured store backend.
async fn open_stores(config: &AppConfig) -> Result<(Stores, Option<DatabasePool>), AppError> {
    match config.database.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; state is lost on restart");
            let members = &config.database.memory_members;
            if members.is_empty() {
                tracing::warn!("No database.memory_members configured; every community call will be rejected");
            } else {
                tracing::info!(count = members.len(), "Loaded in-memory community members");
            }
            let stores = Stores::from_backend(
                Arc::new(MemoryStore::new()),
                Arc::new(MemoryMembershipGate::with_members(members)),
            );
            Ok((stores, None))
        }
        StoreBackend::Postgres => {
            tracing::info!("Connecting to database...");
            let db = DatabasePool::connect(&config.database).await?;

            if config.database.run_migrations {
                tracing::info!("Running database migrations...");
                beredskap_database::migration::run_migrations(db.pool()).await?;
                tracing::info!("Database migrations complete");
            }

            let stores = Stores::from_backend(
                Arc::new(PgStore::new(db.pool().clone())),
                Arc::new(PgMembershipGate::new(db.pool().clone())),
            );
            Ok((stores, Some(db)))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
