//! `qualidesk` server entry point.

use clap::Parser;
use qualidesk::config::ServerConfig;
use qualidesk::{server, telemetry};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = ServerConfig::parse();
    telemetry::init(&config.log_filter);
    server::run(config).await?;
    Ok(())
}
