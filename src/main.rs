use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod aggregator;
mod config;
mod coordinator;
mod error;
mod handlers;
mod id;
mod middleware;
mod ops;
mod sample;
mod server;
mod store;

use aggregator::ReadAggregator;
use coordinator::WriteCoordinator;
use ops::OpsCollector;
use store::StorePool;

/// Shared application state available to every handler via `State<Arc<AppState>>`.
pub struct AppState {
    /// Write fan-out: first store acknowledgment wins.
    pub coordinator: WriteCoordinator,
    /// Read fan-out: union of every store that answers in time.
    pub aggregator: ReadAggregator,
    /// Per-store counters served by `GET /status`.
    pub ops: Arc<OpsCollector>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("m2r=info")),
        )
        .init();

    // ── 1. Resolve configuration ─────────────────────────────────
    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "refusing to start");
            std::process::exit(1);
        }
    };

    // ── 2. Connect every store — any endpoint failing is fatal ───
    let pool = match StorePool::connect(&config.store_urls).await {
        Ok(pool) => pool,
        Err(e) => {
            error!(error = %e, "refusing to start");
            std::process::exit(1);
        }
    };
    info!(stores = pool.len(), "connected to all stores");

    // ── 3. Build shared state ────────────────────────────────────
    let pool = Arc::new(pool);
    let ops = Arc::new(OpsCollector::new());
    let state = Arc::new(AppState {
        coordinator: WriteCoordinator::new(
            pool.clone(),
            config.write_timeout,
            ops.clone(),
        ),
        aggregator: ReadAggregator::new(
            pool,
            config.read_timeout,
            ops.clone(),
        ),
        ops,
    });

    // ── 4. Bind & serve ──────────────────────────────────────────
    let app = server::create_router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .expect("failed to bind listen port");

    info!(port = config.port, "listening");
    axum::serve(listener, app)
        .await
        .expect("server exited with error");
}
