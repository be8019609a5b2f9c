use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

mod chaos;
mod config;
mod error;
mod filter;
mod fixtures;
mod handlers;
mod models;

use crate::config::Config;
use crate::fixtures::Fixtures;

/// Shared application state — cheap to clone (fixtures live behind an Arc and
/// are never mutated after startup).
#[derive(Clone)]
pub struct AppState {
    pub fixtures: Arc<Fixtures>,
    pub chaos_max_delay: Duration,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored where env vars are injected)
    dotenv::dotenv().ok();

    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,hell_mock_api=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    // Fail fast: no partial startup without every fixture in memory.
    let fixtures = match Fixtures::load(&config.fixture_dir) {
        Ok(fixtures) => fixtures,
        Err(e) => {
            error!(error = %e, "Failed to load JSON fixtures");
            std::process::exit(1);
        }
    };
    info!("Hell JSON payloads loaded successfully 😈");

    let state = AppState {
        fixtures: Arc::new(fixtures),
        chaos_max_delay: config.chaos_max_delay,
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Mock API server running on http://{}", addr);
    info!(
        "Chaos quick-start: GET http://{}/api/chaos/product?delayMs=500&failRate=0.3",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Mock API server stopped");
    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        // ── Banner / health ─────────────────────────────────────────────────
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))

        // ── Core fixtures ───────────────────────────────────────────────────
        .route("/api/product/hell", get(handlers::fixtures::hell_product))
        .route("/api/outlet/hell", get(handlers::fixtures::hell_outlet))
        .route("/api/products/portal", get(handlers::fixtures::products_portal))

        // ── Outlets ─────────────────────────────────────────────────────────
        .route("/api/outlets/filter", post(handlers::outlets::filter_outlets))
        .route("/api/outlets/outletType", get(handlers::outlets::outlet_types))
        .route("/api/outlets/channel", get(handlers::outlets::channels))

        // ── Chaos ───────────────────────────────────────────────────────────
        .route("/api/chaos/product", get(handlers::chaos::chaos_product))
        .route("/api/chaos/outlet", get(handlers::chaos::chaos_outlet))

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining in-flight requests");
}
