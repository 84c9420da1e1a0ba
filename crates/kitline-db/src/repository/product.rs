//! # Product Repository
//!
//! Catalog products. `available_sizes` is stored as a JSON array; an empty
//! array means the product accepts any size.

use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use super::{decode_string_list, encode_string_list};
use crate::error::DbResult;
use kitline_core::{Product, ProductCategory};

/// Values for a new catalog product.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub cost_price_cents: i64,
    pub category: ProductCategory,
    pub shirt_type_id: Option<i64>,
    pub available_sizes: Vec<String>,
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price_cents: i64,
    cost_price_cents: i64,
    product_type: ProductCategory,
    shirt_type_id: Option<i64>,
    available_sizes: String,
}

impl ProductRow {
    fn into_product(self) -> DbResult<Product> {
        Ok(Product {
            available_sizes: decode_string_list("available_sizes", &self.available_sizes)?,
            id: self.id,
            name: self.name,
            price_cents: self.price_cents,
            cost_price_cents: self.cost_price_cents,
            category: self.product_type,
            shirt_type_id: self.shirt_type_id,
        })
    }
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT
                id,
                name,
                price_cents,
                cost_price_cents,
                product_type,
                shirt_type_id,
                available_sizes
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// Lists products ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT
                id,
                name,
                price_cents,
                cost_price_cents,
                product_type,
                shirt_type_id,
                available_sizes
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Inserts a new product and returns it with its generated ID.
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        debug!(name = %product.name, category = product.category.as_str(), "Inserting product");

        let sizes = encode_string_list("available_sizes", &product.available_sizes)?;

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                name, price_cents, cost_price_cents,
                product_type, shirt_type_id, available_sizes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.cost_price_cents)
        .bind(product.category)
        .bind(product.shirt_type_id)
        .bind(sizes)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            id: result.last_insert_rowid(),
            name: product.name.clone(),
            price_cents: product.price_cents,
            cost_price_cents: product.cost_price_cents,
            category: product.category,
            shirt_type_id: product.shirt_type_id,
            available_sizes: product.available_sizes.clone(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
