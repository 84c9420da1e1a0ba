//! # kitline-quote
//!
//! Command-line entry point: price a cart file or reprice a stored order.
//!
//! ```text
//! kitline-quote quote cart.json --pretty
//! kitline-quote --db ./kitline.db reprice 550e8400-e29b-41d4-a716-446655440000
//! ```

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kitline_db::Database;
use kitline_quote::{run, Cli, PricingService, QuoteConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut config = QuoteConfig::load().context("loading configuration")?;
    if let Some(db) = cli.db.clone() {
        config.database_path = db;
    }

    info!(
        db = %config.database_path.display(),
        shoe_unit_price = %config.shoe_unit_price,
        surcharges_on_untyped_products = config.surcharges_on_untyped_products,
        "Configuration loaded"
    );

    let db = Database::new(config.db_config())
        .await
        .context("opening database")?;
    let service = PricingService::new(db.clone(), config.pricing_options());

    let result = run(&cli.command, &service, cli.pretty).await;
    db.close().await;

    println!("{}", result?);
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout carries only the JSON result.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=kitline_core=trace` - Show pack matching decisions
/// - Default: INFO, debug for kitline crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kitline=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
