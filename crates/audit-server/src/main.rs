//! Audit dashboard service - entry point.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use audit_server::config::DEFAULT_CONFIG_PATH;

/// Mock audit telemetry service with export endpoints
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via AUDIT_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // CLI arg > AUDIT_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("AUDIT_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let config = audit_server::AppConfig::load(&config_path)?;
    audit_telemetry::init_logging(&config.telemetry.log_level)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config_path = %config_path,
        "Starting audit dashboard service"
    );

    let app = audit_server::Application::new(config)?;
    app.run().await?;

    Ok(())
}
