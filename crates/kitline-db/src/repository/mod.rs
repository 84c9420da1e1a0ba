//! # Repository Module
//!
//! Database repository implementations for Kitline.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PricingService                                                        │
//! │       │                                                                 │
//! │       │  db.packs().list_active()                                      │
//! │       ▼                                                                 │
//! │  PackRepository                                                        │
//! │  ├── list_active(&self)                                                │
//! │  ├── insert(&self, pack)                                               │
//! │  └── deactivate(&self, id)                                             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Queries are checked at runtime (`sqlx::query_as::<_, T>`) so the crate
//! builds without a database. JSON array columns are decoded in the row
//! structs of each repository.
//!
//! ## Available Repositories
//!
//! - [`ShirtTypeRepository`] - Shirt type catalog
//! - [`ProductRepository`] - Product catalog and sizes
//! - [`PackRepository`] - Packs and their requirements
//! - [`PricingConfigRepository`] - Surcharge prices and other named amounts
//! - [`OrderRepository`] - Orders, order items and totals

pub mod order;
pub mod pack;
pub mod pricing_config;
pub mod product;
pub mod shirt_type;

pub use order::OrderRepository;
pub use pack::PackRepository;
pub use pricing_config::PricingConfigRepository;
pub use product::ProductRepository;
pub use shirt_type::ShirtTypeRepository;

use crate::error::{DbError, DbResult};

/// Decodes a JSON string array column.
pub(crate) fn decode_string_list(column: &str, raw: &str) -> DbResult<Vec<String>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw).map_err(|e| DbError::invalid_column(column, e))
}

/// Encodes a string list for a JSON array column.
pub(crate) fn encode_string_list(column: &str, values: &[String]) -> DbResult<String> {
    serde_json::to_string(values).map_err(|e| DbError::invalid_column(column, e))
}

/// Converts a stored count to `u32`, rejecting negative or oversized values.
pub(crate) fn stored_count(column: &str, value: i64) -> DbResult<u32> {
    u32::try_from(value).map_err(|_| DbError::InvalidColumn {
        column: column.to_string(),
        message: format!("{value} is not a valid count"),
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_list_columns() {
        let encoded = encode_string_list("sizes", &["S".to_string(), "M".to_string()]).unwrap();
        assert_eq!(encoded, r#"["S","M"]"#);
        assert_eq!(decode_string_list("sizes", &encoded).unwrap(), vec!["S", "M"]);
        assert!(decode_string_list("sizes", "").unwrap().is_empty());
        assert!(decode_string_list("sizes", "S,M").is_err());
    }

    #[test]
    fn test_stored_count() {
        assert_eq!(stored_count("quantity", 3).unwrap(), 3);
        assert!(stored_count("quantity", -1).is_err());
    }
}
