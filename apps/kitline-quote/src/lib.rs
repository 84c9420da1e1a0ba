//! # kitline-quote
//!
//! Caller layer for the Kitline pricing engine.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Quote Flow                                       │
//! │                                                                         │
//! │  cart.json / order id                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PricingService ──► load_snapshot (packs, shirt types, surcharges)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  expand_cart ──► PricingEngine::quote_snapshot ──► PriceBreakdown      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  orders.total_price_cents (repricing only)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod service;

pub use cli::{Cli, Command};
pub use config::{ConfigError, QuoteConfig};
pub use error::{QuoteError, QuoteResult};
pub use service::{AddedItem, PricingService};

use std::path::Path;

use kitline_core::CartLine;
use tracing::info;

/// Parses a storefront cart payload (a JSON array of cart lines).
pub fn parse_cart(json: &str) -> QuoteResult<Vec<CartLine>> {
    Ok(serde_json::from_str(json)?)
}

/// Reads a cart from a file, or from stdin when the path is `-`.
pub async fn read_cart(path: &Path) -> QuoteResult<Vec<CartLine>> {
    let json = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        tokio::task::spawn_blocking(move || {
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer).map(|_| buffer)
        })
        .await
        .map_err(|e| QuoteError::Io(std::io::Error::other(e)))??
    } else {
        tokio::fs::read_to_string(path).await?
    };
    parse_cart(&json)
}

/// Runs one CLI command and returns the JSON to print.
pub async fn run(command: &Command, service: &PricingService, pretty: bool) -> QuoteResult<String> {
    let breakdown = match command {
        Command::Quote { cart } => {
            let lines = read_cart(cart).await?;
            service.quote_cart(&lines).await?
        }
        Command::Reprice { order_id } => {
            let breakdown = service.reprice_order(order_id).await?;
            info!(order_id = %order_id, total = %breakdown.total, "Order total persisted");
            breakdown
        }
    };

    let json = if pretty {
        serde_json::to_string_pretty(&breakdown)?
    } else {
        serde_json::to_string(&breakdown)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitline_core::{Money, PricingOptions};
    use kitline_db::{Database, DbConfig};

    #[test]
    fn test_parse_cart_lenient_payload() {
        let lines = parse_cart(
            r#"[
                {"shirt_type_id": "3", "size": "M", "price": 20, "quantity": 2},
                {"product_id": 8, "product_type": "shoes", "price": "49.99"}
            ]"#,
        )
        .unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].item.shirt_type_id, Some(3));
        assert_eq!(lines[0].effective_quantity(), 2);
        assert_eq!(lines[1].item.price, Some(Money::from_cents(4999)));
        assert_eq!(lines[1].effective_quantity(), 1);
    }

    #[test]
    fn test_parse_cart_rejects_non_array() {
        assert!(matches!(parse_cart(r#"{"items": []}"#), Err(QuoteError::InvalidCart(_))));
    }

    #[tokio::test]
    async fn test_run_quote_from_file() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = PricingService::new(db, PricingOptions::default());

        let path = std::env::temp_dir().join(format!("kitline-cart-{}.json", std::process::id()));
        tokio::fs::write(&path, r#"[{"product_id": 1, "size": "M", "price": "12.50", "quantity": 2}]"#)
            .await
            .unwrap();

        let output = run(&Command::Quote { cart: path.clone() }, &service, false)
            .await
            .unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["total"], 2500);
        assert_eq!(value["groups"][0]["key"], "product:1:M");
    }

    #[tokio::test]
    async fn test_run_missing_cart_file() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = PricingService::new(db, PricingOptions::default());

        let command = Command::Quote {
            cart: "/nonexistent/kitline/cart.json".into(),
        };
        assert!(matches!(run(&command, &service, false).await, Err(QuoteError::Io(_))));
    }
}
