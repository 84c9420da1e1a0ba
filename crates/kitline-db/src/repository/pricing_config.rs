//! # Pricing Configuration Repository
//!
//! Named amounts administrators can edit: `patch_price`,
//! `personalization_price` and anything else the storefront needs.
//!
//! Rows are created on first upsert. A new key gets a display name derived
//! from the key (`patch_price` → "Patch price") and a generic description.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use kitline_core::validation::{validate_config_key, validate_price_cents};
use kitline_core::PricingConfigEntry;

/// Repository for pricing configuration rows.
#[derive(Debug, Clone)]
pub struct PricingConfigRepository {
    pool: SqlitePool,
}

impl PricingConfigRepository {
    /// Creates a new PricingConfigRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PricingConfigRepository { pool }
    }

    /// Lists all rows ordered by key.
    pub async fn list(&self) -> DbResult<Vec<PricingConfigEntry>> {
        let entries = sqlx::query_as::<_, PricingConfigEntry>(
            r#"
            SELECT key, name, price_cents, cost_price_cents, description, updated_at
            FROM pricing_config
            ORDER BY key
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = entries.len(), "Loaded pricing config");
        Ok(entries)
    }

    /// Gets one row by key.
    pub async fn get(&self, key: &str) -> DbResult<Option<PricingConfigEntry>> {
        let entry = sqlx::query_as::<_, PricingConfigEntry>(
            r#"
            SELECT key, name, price_cents, cost_price_cents, description, updated_at
            FROM pricing_config
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Sets the price (and optionally the cost price) of a key.
    ///
    /// Existing rows keep their name, description and, when `cost_price_cents`
    /// is `None`, their cost price. Keys must be snake_case and amounts
    /// non-negative.
    pub async fn upsert(
        &self,
        key: &str,
        price_cents: i64,
        cost_price_cents: Option<i64>,
    ) -> DbResult<PricingConfigEntry> {
        validate_config_key(key)?;
        validate_price_cents("price", price_cents)?;
        if let Some(cost) = cost_price_cents {
            validate_price_cents("cost price", cost)?;
        }

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO pricing_config (key, name, price_cents, cost_price_cents, description, updated_at)
            VALUES (?1, ?2, ?3, COALESCE(?4, 0), ?5, ?6)
            ON CONFLICT(key) DO UPDATE SET
                price_cents = excluded.price_cents,
                cost_price_cents = COALESCE(?4, pricing_config.cost_price_cents),
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(display_name(key))
        .bind(price_cents)
        .bind(cost_price_cents)
        .bind(format!("Configuration for {key}"))
        .bind(now)
        .execute(&self.pool)
        .await?;

        info!(key = %key, price_cents, "Pricing config updated");

        let entry = sqlx::query_as::<_, PricingConfigEntry>(
            r#"
            SELECT key, name, price_cents, cost_price_cents, description, updated_at
            FROM pricing_config
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }
}

/// "patch_price" → "Patch price".
fn display_name(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
