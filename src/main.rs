//! Ratecast - Freight Rate Quoting Service
//!
//! # Usage
//!
//! ```bash
//! # Run with built-in demo tables
//! cargo run --release
//!
//! # Run against a custom config
//! cargo run --release -- --config ./ratecast.toml
//! ```
//!
//! # Environment Variables
//!
//! - `RATECAST_CONFIG`: Path to a TOML config file
//! - `RATECAST_CORS_ORIGINS`: Comma-separated allowed CORS origins
//! - `RUST_LOG`: Logging level (default: info)
//! - `RESET_DATA`: Set to "true" to wipe persisted ledger documents on
//!   startup (for testing)

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ratecast::api::{create_app, ApiState};
use ratecast::config::{self, RateConfig};
use ratecast::ledger::EventLedger;
use ratecast::market::MarketBoard;
use ratecast::pricing::RatePredictor;
use ratecast::tariff::RateBook;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "ratecast")]
#[command(about = "Freight rate quoting and booking analytics service")]
#[command(version)]
struct CliArgs {
    /// Override the server bind address (default: config, "0.0.0.0:8080")
    #[arg(short, long)]
    addr: Option<String>,

    /// Path to a TOML config file (skips the default search order)
    #[arg(short, long)]
    config: Option<String>,

    /// Directory for persisted ledger documents (default: config, "./data")
    #[arg(long)]
    data_dir: Option<String>,

    /// Wipe persisted ledger documents on startup.
    /// WARNING: This is destructive and cannot be undone!
    /// Can also be set via RESET_DATA=true environment variable.
    #[arg(long)]
    reset_data: bool,
}

// ============================================================================
// Data Reset
// ============================================================================

/// Check if a data reset is requested via CLI flag or environment variable.
fn should_reset_data(cli_flag: bool) -> bool {
    if cli_flag {
        return true;
    }
    if let Ok(val) = std::env::var("RESET_DATA") {
        let val_lower = val.to_lowercase();
        return val_lower == "true" || val_lower == "1" || val_lower == "yes";
    }
    false
}

/// Remove the data directory and all its contents.
fn reset_data_directory(dir: &str) -> Result<()> {
    let path = Path::new(dir);
    if !path.exists() {
        info!("Data directory does not exist, nothing to reset");
        return Ok(());
    }

    warn!("RESET_DATA detected — wiping persisted ledger documents");
    warn!("  Removing: {}", path.display());
    std::fs::remove_dir_all(path).context("Failed to remove data directory")?;
    warn!("  Data directory removed. Fresh documents will be created on startup.");

    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();

    let cfg = match &args.config {
        Some(path) => RateConfig::load_from_file(Path::new(path))
            .with_context(|| format!("failed to load config from {path}"))?,
        None => RateConfig::load(),
    };
    config::init(cfg);
    let cfg = config::get();
    info!("✓ Configuration loaded ({} routes)", cfg.tariff.routes.len());

    let data_dir = args.data_dir.clone().unwrap_or_else(|| cfg.data.dir.clone());
    if should_reset_data(args.reset_data) {
        reset_data_directory(&data_dir)?;
    }

    let ledger = EventLedger::open(&data_dir).context("failed to open event ledger")?;
    info!("✓ Event ledger ready at {}", data_dir);

    let state = ApiState {
        ledger: ledger.clone(),
        rate_book: Arc::new(RateBook::new(cfg.tariff.clone(), cfg.connectors.rms.clone())),
        market: Arc::new(MarketBoard::new(cfg.market.clone(), cfg.connectors.lci.clone())),
        predictor: Arc::new(RatePredictor::new(cfg.pricing.clone())),
    };
    let app = create_app(state);

    let addr = args.addr.clone().unwrap_or_else(|| cfg.server.addr.clone());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "ratecast listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Draining event ledger before exit");
    ledger.shutdown().await;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("failed to install Ctrl+C handler; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
