//! Claims Billing API Server Binary
//!
//! # Usage
//!
//! ```bash
//! # In-memory store, simulated clearinghouse
//! cargo run --bin billing-api
//!
//! # Against PostgreSQL
//! BILLING_DATABASE_URL=postgres://... cargo run --bin billing-api
//! ```
//!
//! # Environment Variables
//!
//! * `BILLING_HOST` - Server host (default: 0.0.0.0)
//! * `BILLING_PORT` - Server port (default: 8080)
//! * `BILLING_DATABASE_URL` - PostgreSQL connection string; in-memory store when unset
//! * `BILLING_GATEWAY_TIMEOUT_MS` - Clearinghouse submission timeout (default: 30000)
//! * `BILLING_LOG_LEVEL` - trace, debug, info, warn, error (default: info)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_claims::{ClaimsStore, SimulatedGateway};
use infra_store::{create_pool, DatabaseConfig, InMemoryStore, PgClaimsStore};
use interface_api::{config::ApiConfig, create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().unwrap_or_default();
    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting Claims Billing API Server"
    );

    let store = build_store(&config).await?;
    // The simulated gateway stands in until a payer connection is configured.
    let gateway = Arc::new(SimulatedGateway::accepting());

    let state = AppState::new(store, gateway)
        .with_gateway_timeout(Duration::from_millis(config.gateway_timeout_ms));

    let app = create_router(state);
    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Picks the store adapter: PostgreSQL when a URL is configured, in-memory
/// otherwise.
async fn build_store(config: &ApiConfig) -> anyhow::Result<Arc<dyn ClaimsStore>> {
    match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let pool = create_pool(DatabaseConfig::new(url)).await?;
            sqlx::query("SELECT 1").execute(&pool).await?;
            tracing::info!("Database ready");
            Ok(Arc::new(PgClaimsStore::new(pool)))
        }
        None => {
            tracing::info!("No database configured, using in-memory store");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
