//! Quote service configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use kitline_core::{Money, PricingOptions};
use kitline_db::DbConfig;

/// Quote service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Unit price of every item in the shoes group
    pub shoe_unit_price: Money,

    /// Whether untyped catalog products accumulate surcharges regardless of
    /// their declared category
    pub surcharges_on_untyped_products: bool,

    /// Pool size
    pub db_max_connections: u32,
}

impl QuoteConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let shoe_cents: i64 = var("KITLINE_SHOE_PRICE_CENTS", "5000")
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("KITLINE_SHOE_PRICE_CENTS".to_string()))?;
        if shoe_cents < 0 {
            return Err(ConfigError::InvalidValue("KITLINE_SHOE_PRICE_CENTS".to_string()));
        }

        let config = QuoteConfig {
            database_path: PathBuf::from(var("KITLINE_DB_PATH", "./kitline.db")),

            shoe_unit_price: Money::from_cents(shoe_cents),

            surcharges_on_untyped_products: parse_flag(&var(
                "KITLINE_SURCHARGES_UNTYPED_PRODUCTS",
                "true",
            ))
            .ok_or_else(|| {
                ConfigError::InvalidValue("KITLINE_SURCHARGES_UNTYPED_PRODUCTS".to_string())
            })?,

            db_max_connections: var("KITLINE_DB_MAX_CONNECTIONS", "5")
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("KITLINE_DB_MAX_CONNECTIONS".to_string()))?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("KITLINE_DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Engine options derived from this configuration.
    pub fn pricing_options(&self) -> PricingOptions {
        PricingOptions {
            shoe_unit_price: self.shoe_unit_price,
            surcharges_on_untyped_products: self.surcharges_on_untyped_products,
        }
    }

    /// Database configuration derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.db_max_connections)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
