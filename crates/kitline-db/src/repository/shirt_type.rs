//! # Shirt Type Repository
//!
//! Shirt types are the bundle types packs are defined against. Their listed
//! price is the fallback unit price when no pack applies.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kitline_core::ShirtType;

/// Repository for shirt type database operations.
#[derive(Debug, Clone)]
pub struct ShirtTypeRepository {
    pool: SqlitePool,
}

impl ShirtTypeRepository {
    /// Creates a new ShirtTypeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShirtTypeRepository { pool }
    }

    /// Lists all shirt types ordered by name.
    pub async fn list(&self) -> DbResult<Vec<ShirtType>> {
        let shirt_types = sqlx::query_as::<_, ShirtType>(
            r#"
            SELECT id, name, price_cents, cost_price_cents
            FROM shirt_types
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = shirt_types.len(), "Loaded shirt types");
        Ok(shirt_types)
    }

    /// Gets a shirt type by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<ShirtType>> {
        let shirt_type = sqlx::query_as::<_, ShirtType>(
            r#"
            SELECT id, name, price_cents, cost_price_cents
            FROM shirt_types
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shirt_type)
    }

    /// Inserts a new shirt type and returns it with its generated ID.
    pub async fn insert(
        &self,
        name: &str,
        price_cents: i64,
        cost_price_cents: i64,
    ) -> DbResult<ShirtType> {
        debug!(name = %name, price_cents, "Inserting shirt type");

        let result = sqlx::query(
            r#"
            INSERT INTO shirt_types (name, price_cents, cost_price_cents)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(name)
        .bind(price_cents)
        .bind(cost_price_cents)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, name),
            other => other,
        })?;

        Ok(ShirtType {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            price_cents,
            cost_price_cents,
        })
    }

    /// Counts shirt types.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shirt_types")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
