use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use portfolio_contact::config::Config;
use portfolio_contact::db::{self, PgSubmissionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.log_level)
        }))
        .init();

    tracing::info!("Starting portfolio contact API");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(config.database_connect_timeout)
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            tracing::error!("Database connection error: {e}");
            e
        })?;

    db::ensure_schema(&pool).await?;
    tracing::info!("Database connected");

    if config.recipients.is_empty() {
        tracing::warn!("No EMAIL_TO / EMAIL_USER configured, contact emails are disabled");
    }

    let addr = SocketAddr::new(config.host, config.port);
    let notifier = portfolio_contact::build_notifier(&config);
    let store = Arc::new(PgSubmissionStore::new(pool));
    let app = portfolio_contact::build_app(config, store, notifier);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
