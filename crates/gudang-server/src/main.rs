//! Gudang server — application entry point.

use std::process::ExitCode;

use gudang_server::AppConfig;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "gudang=info,tower_http=info";

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .json()
        .init();

    tracing::info!("Starting gudang server...");

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = gudang_server::serve(config).await {
        tracing::error!(error = %e, "Server failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("gudang server stopped.");
    ExitCode::SUCCESS
}
