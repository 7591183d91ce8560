//! Production Report Binary
//!
//! Reads a JSON export of per-order stage timestamps, computes stage
//! statistics and forecasts the missing timestamps of open orders, then
//! prints the report as JSON on stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin production-report --features report-cli -- records.json [production.toml]
//! ```
//!
//! # Environment Variables
//!
//! - `PRODUCTION_CONFIG`: Config file path (default: `production.toml` search, then built-in defaults)
//! - `PRODUCTION_NOW`: Override "now", e.g. `11/03/2024 08:00:00`
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use shopfloor_rust::config::ProductionConfig;
use shopfloor_rust::models::Timestamp;
use shopfloor_rust::parsing::parse_records_file;
use shopfloor_rust::services::build_report;

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let records_path = args
        .next()
        .map(PathBuf::from)
        .context("Usage: production-report <records.json> [production.toml]")?;
    let config_path = args
        .next()
        .or_else(|| env::var("PRODUCTION_CONFIG").ok())
        .map(PathBuf::from);

    let config = load_config(config_path)?;
    let now = match env::var("PRODUCTION_NOW") {
        Ok(raw) => Timestamp::parse(&raw).context("Invalid PRODUCTION_NOW")?,
        Err(_) => Timestamp::new(chrono::Local::now().naive_local()),
    };

    info!("Loading records from {}", records_path.display());
    let records = parse_records_file(&records_path)?;
    info!("Loaded {} record(s)", records.len());

    let report = build_report(&records, &config, now).context("Failed to build report")?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<ProductionConfig> {
    if let Some(path) = path {
        info!("Loading configuration from {}", path.display());
        return ProductionConfig::from_file(&path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    match ProductionConfig::from_default_location() {
        Ok(config) => Ok(config),
        Err(e) => {
            warn!("{}; using built-in defaults", e);
            Ok(ProductionConfig::default())
        }
    }
}
