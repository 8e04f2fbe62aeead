//! # subtrackd — subtrack daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`subtrack.toml`, `.env`, environment variables)
//! - Build and install the logging pipeline
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct the repository, the service and the axum router
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It only wires; subscription rules live in `subtrack-domain` and `subtrack-app`.

mod config;
mod logging;

use subtrack_adapter_http_axum::state::AppState;
use subtrack_adapter_storage_sqlite_sqlx::SqliteSubscriptionRepository;
use subtrack_app::services::subscription_service::SubscriptionService;

use crate::config::Config;
use crate::logging::Logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    Logging::from_config(&config.logging).install()?;

    // Database
    let db = subtrack_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .inspect_err(|err| tracing::error!(error = %err, "database initialization failed"))?;

    // Services
    let repo = SqliteSubscriptionRepository::new(db.pool().clone());
    let subscription_service = SubscriptionService::new(repo);

    // HTTP
    let app = subtrack_adapter_http_axum::router::build(AppState::new(subscription_service));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "subtrackd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received ctrl+c, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
