//! # Quote Error Type
//!
//! Unified error type for the pricing caller layer.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PricingService operation                                               │
//! │         │                                                               │
//! │         ├── DbError (kitline-db)          ──┐                           │
//! │         ├── CoreError (kitline-core)        ├──► QuoteError             │
//! │         ├── ValidationError (kitline-core)  │        │                  │
//! │         └── cart file / JSON problems     ──┘        ▼                  │
//! │                                              anyhow at the CLI edge     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine itself never fails; every variant here comes from the code
//! around it.

use kitline_core::{CoreError, ValidationError};
use kitline_db::DbError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors reported by the pricing caller layer.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The order does not exist.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Catalog or order rule violation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Invalid input.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Database failure.
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    /// Configuration problem.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The cart payload could not be parsed.
    #[error("Invalid cart payload: {0}")]
    InvalidCart(#[from] serde_json::Error),

    /// The cart file could not be read.
    #[error("Cannot read cart: {0}")]
    Io(#[from] std::io::Error),
}

impl QuoteError {
    /// True for errors caused by the request rather than the system.
    pub fn is_client_error(&self) -> bool {
        match self {
            QuoteError::OrderNotFound(_)
            | QuoteError::Core(_)
            | QuoteError::Validation(_)
            | QuoteError::InvalidCart(_) => true,
            QuoteError::Db(DbError::NotFound { .. } | DbError::Validation(_)) => true,
            _ => false,
        }
    }
}

/// Result type for caller-layer operations.
pub type QuoteResult<T> = Result<T, QuoteError>;
