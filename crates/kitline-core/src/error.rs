//! # Error Types
//!
//! Domain-specific error types for kitline-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kitline-core errors (this file)                                       │
//! │  ├── CoreError        - Order and catalog rule violations              │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kitline-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  kitline-quote errors (app)                                            │
//! │  └── QuoteError       - What the caller layer reports                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pricing engine itself never returns an error: missing prices are
//! zero, unknown items land in the `other` group, and negative subtotals are
//! clamped. These errors belong to the code that builds the engine's inputs.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised while assembling an order.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Catalog product cannot be found.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Shirt type (pack bundle type) cannot be found.
    #[error("Shirt type not found: {0}")]
    ShirtTypeNotFound(i64),

    /// An order item names neither a catalog product nor a shirt type.
    #[error("Either a product or a shirt type is required")]
    MissingItemIdentity,

    /// Requested size is not offered for the product.
    ///
    /// ## When This Occurs
    /// - The product lists available sizes and the requested one is absent
    /// - No size was given for a product that lists sizes
    #[error("Invalid size '{size}'. Available sizes: {}", available.join(", "))]
    InvalidSize {
        size: String,
        available: Vec<String>,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, malformed config key).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_size_message_lists_sizes() {
        let err = CoreError::InvalidSize {
            size: "XXL".to_string(),
            available: vec!["S".to_string(), "M".to_string(), "L".to_string()],
        };
        assert_eq!(err.to_string(), "Invalid size 'XXL'. Available sizes: S, M, L");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "pack name".to_string(),
        };
        assert_eq!(err.to_string(), "pack name is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "size".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
