//! # Order Repository
//!
//! Orders, their items and the persisted total.
//!
//! ## Repricing Flow
//! ```text
//! add_item / delete_item
//!        │
//!        ▼
//! list_items(order) ──► pricing engine ──► update_total(order, total)
//! ```
//! The repository never prices anything: the total written by
//! [`OrderRepository::update_total`] comes from the caller.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use super::{decode_string_list, encode_string_list, stored_count};
use crate::error::{DbError, DbResult};
use kitline_core::{Money, Order, OrderItem, ProductCategory};

/// Status of a freshly created order.
pub const PENDING_STATUS: &str = "pending";

/// Values for a new order item, already resolved against the catalog.
#[derive(Debug, Clone, Default)]
pub struct NewOrderItemRecord {
    pub product_id: Option<i64>,
    pub shirt_type_id: Option<i64>,
    pub category: ProductCategory,
    pub size: String,
    pub quantity: u32,
    pub player_name: Option<String>,
    pub number: Option<String>,
    pub patch_images: Vec<String>,
    pub cost_price_cents: i64,
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: String,
    product_id: Option<i64>,
    shirt_type_id: Option<i64>,
    product_type: ProductCategory,
    size: String,
    quantity: i64,
    player_name: Option<String>,
    numero: Option<String>,
    patch_images: String,
    cost_price_cents: i64,
    created_at: DateTime<Utc>,
}

impl OrderItemRow {
    fn into_item(self) -> DbResult<OrderItem> {
        Ok(OrderItem {
            quantity: stored_count("order_items.quantity", self.quantity)?,
            patch_images: decode_string_list("order_items.patch_images", &self.patch_images)?,
            id: self.id,
            order_id: self.order_id,
            product_id: self.product_id,
            shirt_type_id: self.shirt_type_id,
            category: self.product_type,
            size: self.size,
            player_name: self.player_name,
            number: self.numero,
            cost_price_cents: self.cost_price_cents,
            created_at: self.created_at,
        })
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Creates an empty pending order with a zero total.
    pub async fn create(&self) -> DbResult<Order> {
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            status: PENDING_STATUS.to_string(),
            total_price_cents: 0,
            created_at: now,
            updated_at: now,
        };

        debug!(order_id = %order.id, "Creating order");

        sqlx::query(
            r#"
            INSERT INTO orders (id, status, total_price_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&order.id)
        .bind(&order.status)
        .bind(order.total_price_cents)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets an order by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, status, total_price_cents, created_at, updated_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Lists the items of an order in insertion order.
    pub async fn list_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT
                id,
                order_id,
                product_id,
                shirt_type_id,
                product_type,
                size,
                quantity,
                player_name,
                numero,
                patch_images,
                cost_price_cents,
                created_at
            FROM order_items
            WHERE order_id = ?1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderItemRow::into_item).collect()
    }

    /// Adds an item to an order.
    ///
    /// Fails with `ForeignKeyViolation` when the order does not exist.
    pub async fn add_item(&self, order_id: &str, item: &NewOrderItemRecord) -> DbResult<OrderItem> {
        let now = Utc::now();
        let patch_images = encode_string_list("order_items.patch_images", &item.patch_images)?;

        debug!(
            order_id = %order_id,
            product_id = ?item.product_id,
            shirt_type_id = ?item.shirt_type_id,
            quantity = item.quantity,
            "Adding order item"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO order_items (
                order_id, product_id, shirt_type_id, product_type,
                size, quantity, player_name, numero,
                patch_images, cost_price_cents, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8,
                ?9, ?10, ?11
            )
            "#,
        )
        .bind(order_id)
        .bind(item.product_id)
        .bind(item.shirt_type_id)
        .bind(item.category)
        .bind(&item.size)
        .bind(i64::from(item.quantity))
        .bind(&item.player_name)
        .bind(&item.number)
        .bind(patch_images)
        .bind(item.cost_price_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(OrderItem {
            id: result.last_insert_rowid(),
            order_id: order_id.to_string(),
            product_id: item.product_id,
            shirt_type_id: item.shirt_type_id,
            category: item.category,
            size: item.size.clone(),
            quantity: item.quantity,
            player_name: item.player_name.clone(),
            number: item.number.clone(),
            patch_images: item.patch_images.clone(),
            cost_price_cents: item.cost_price_cents,
            created_at: now,
        })
    }

    /// Deletes one item of an order.
    pub async fn delete_item(&self, order_id: &str, item_id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM order_items WHERE id = ?1 AND order_id = ?2")
            .bind(item_id)
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order item", item_id));
        }

        debug!(order_id = %order_id, item_id, "Order item deleted");
        Ok(())
    }

    /// Persists a repriced total as the order's price of record.
    pub async fn update_total(&self, order_id: &str, total: Money) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                total_price_cents = ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(order_id)
        .bind(total.cents())
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        info!(order_id = %order_id, total = %total, "Order total updated");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
