//! Gudang server — HTTP API over the inventory services.

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

use gudang_auth::{AuthError, ConfiguredMailer};
use gudang_db::{DbError, DbManager, run_migrations};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub use config::AppConfig;
pub use error::ApiError;
pub use state::AppState;

const DEFAULT_JWT_SECRET: &str = "your-secret-key";

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("database error: {0}")]
    Database(#[from] DbError),

    #[error("mail transport error: {0}")]
    Mail(#[from] AuthError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Connect, migrate and serve until ctrl-c.
pub async fn serve(config: AppConfig) -> Result<(), StartupError> {
    if config.auth.jwt_secret == DEFAULT_JWT_SECRET {
        warn!("JWT secret is the built-in default; set JWT_SECRET in production");
    }

    let db = DbManager::connect(&config.db_config()).await?;
    run_migrations(db.pool()).await?;

    let mailer = ConfiguredMailer::from_config(&config.smtp_config())?;
    let state = AppState::new(db.clone(), config.auth_config(), mailer);
    let app = routes::router(state, config.request_timeout());

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!(%address, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
