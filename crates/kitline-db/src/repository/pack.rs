//! # Pack Repository
//!
//! Quantity-discount packs and their requirement rows.
//!
//! ## Loading
//! ```text
//! packs (active, by id) ──┐
//!                         ├──► Vec<Pack { requirements }>
//! pack_items (by pack) ───┘
//! ```
//! Two queries in one read transaction, joined in memory, so a pricing
//! snapshot costs a fixed number of round trips regardless of catalog size
//! and never sees a pack without the requirement rows committed with it.

use std::collections::BTreeMap;

use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

use super::stored_count;
use crate::error::{DbError, DbResult};
use kitline_core::validation::validate_pack;
use kitline_core::{Pack, PackRequirement, ProductCategory};

#[derive(Debug, FromRow)]
struct PackRow {
    id: i64,
    name: String,
    price_cents: i64,
}

#[derive(Debug, FromRow)]
struct PackItemRow {
    pack_id: i64,
    product_type: ProductCategory,
    shirt_type_id: Option<i64>,
    quantity: i64,
}

/// Repository for pack database operations.
#[derive(Debug, Clone)]
pub struct PackRepository {
    pool: SqlitePool,
}

impl PackRepository {
    /// Creates a new PackRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PackRepository { pool }
    }

    /// Lists active packs with their requirements, ordered by id.
    pub async fn list_active(&self) -> DbResult<Vec<Pack>> {
        let mut tx = self.pool.begin().await?;

        let packs = sqlx::query_as::<_, PackRow>(
            r#"
            SELECT id, name, price_cents
            FROM packs
            WHERE is_active = 1
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let items = sqlx::query_as::<_, PackItemRow>(
            r#"
            SELECT pi.pack_id, pi.product_type, pi.shirt_type_id, pi.quantity
            FROM pack_items pi
            INNER JOIN packs p ON p.id = pi.pack_id
            WHERE p.is_active = 1
            ORDER BY pi.pack_id, pi.id
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut requirements: BTreeMap<i64, Vec<PackRequirement>> = BTreeMap::new();
        for item in items {
            requirements
                .entry(item.pack_id)
                .or_default()
                .push(PackRequirement {
                    category: item.product_type,
                    shirt_type_id: item.shirt_type_id,
                    quantity: stored_count("pack_items.quantity", item.quantity)?,
                });
        }

        let packs: Vec<Pack> = packs
            .into_iter()
            .map(|row| Pack {
                requirements: requirements.remove(&row.id).unwrap_or_default(),
                id: row.id,
                name: row.name,
                price_cents: row.price_cents,
            })
            .collect();

        debug!(count = packs.len(), "Loaded active packs");
        Ok(packs)
    }

    /// Inserts a pack and its requirements in one transaction.
    ///
    /// The pack's `id` is ignored; the returned pack carries the generated one.
    /// Invalid packs are rejected with [`DbError::Validation`] before any write.
    pub async fn insert(&self, pack: &Pack) -> DbResult<Pack> {
        validate_pack(pack)?;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO packs (name, price_cents)
            VALUES (?1, ?2)
            "#,
        )
        .bind(&pack.name)
        .bind(pack.price_cents)
        .execute(&mut *tx)
        .await?;

        let pack_id = result.last_insert_rowid();

        for requirement in &pack.requirements {
            sqlx::query(
                r#"
                INSERT INTO pack_items (pack_id, product_type, shirt_type_id, quantity)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(pack_id)
            .bind(requirement.category)
            .bind(requirement.shirt_type_id)
            .bind(i64::from(requirement.quantity))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(pack_id, name = %pack.name, price_cents = pack.price_cents, "Pack created");

        Ok(Pack {
            id: pack_id,
            ..pack.clone()
        })
    }

    /// Removes a pack from pricing without deleting its history.
    pub async fn deactivate(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("UPDATE packs SET is_active = 0 WHERE id = ?1 AND is_active = 1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Pack", id));
        }

        info!(pack_id = id, "Pack deactivated");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
