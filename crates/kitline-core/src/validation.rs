//! # Validation Module
//!
//! Input checks for the code that builds pricing inputs.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (lenient)                                    │
//! │  └── Unusable fields become "absent" instead of failing the cart        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Quantities, pack definitions, config keys, order ids              │
//! │  └── Runs before writes and before repricing                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL, CHECK and foreign key constraints                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pricing engine itself never validates: it prices whatever it is given.

use crate::error::ValidationError;
use crate::types::{CartLine, Pack};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ```rust
/// use kitline_core::validation::validate_quantity;
///
/// assert!(validate_quantity(5).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(1000).is_err());
/// ```
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(MAX_ITEM_QUANTITY),
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed.
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates every line of a posted cart.
///
/// Missing or zero quantities are accepted (they mean one unit); only
/// quantities above the per-line maximum are rejected.
pub fn validate_cart(lines: &[CartLine]) -> ValidationResult<()> {
    lines
        .iter()
        .try_for_each(|line| validate_quantity(line.effective_quantity()))
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a pack definition before it is stored.
///
/// ## Rules
/// - Name must not be empty (max 100 characters)
/// - At least one requirement
/// - Price must be non-negative
/// - Every requirement quantity must be positive
pub fn validate_pack(pack: &Pack) -> ValidationResult<()> {
    let name = pack.name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "pack name".to_string(),
        });
    }
    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "pack name".to_string(),
            max: 100,
        });
    }

    if pack.requirements.is_empty() {
        return Err(ValidationError::Required {
            field: "pack items".to_string(),
        });
    }

    validate_price_cents("pack price", pack.price_cents)?;

    for requirement in &pack.requirements {
        if requirement.quantity == 0 {
            return Err(ValidationError::MustBePositive {
                field: "pack item quantity".to_string(),
            });
        }
    }

    Ok(())
}

/// Validates a pricing configuration key.
///
/// Keys are lowercase snake_case, e.g. `patch_price`.
///
/// ```rust
/// use kitline_core::validation::validate_config_key;
///
/// assert!(validate_config_key("patch_price").is_ok());
/// assert!(validate_config_key("Patch Price").is_err());
/// ```
pub fn validate_config_key(key: &str) -> ValidationResult<()> {
    if key.is_empty() {
        return Err(ValidationError::Required {
            field: "key".to_string(),
        });
    }

    if key.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "key".to_string(),
            max: 64,
        });
    }

    if !key
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "key".to_string(),
            reason: "must contain only lowercase letters, digits, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Order Validators
// =============================================================================

/// Validates an order identifier (UUID).
pub fn validate_order_id(id: &str) -> ValidationResult<()> {
    uuid::Uuid::parse_str(id.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: "order id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;
    Ok(())
}

/// Validates a size label and returns it trimmed.
pub fn validate_size(size: &str) -> ValidationResult<String> {
    let size = size.trim();

    if size.is_empty() {
        return Err(ValidationError::Required {
            field: "size".to_string(),
        });
    }

    if size.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "size".to_string(),
            max: 20,
        });
    }

    Ok(size.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LineItem, PackRequirement, ProductCategory};

    fn pack() -> Pack {
        Pack {
            id: 1,
            name: "4+ Retro".to_string(),
            price_cents: 1500,
            requirements: vec![PackRequirement {
                category: ProductCategory::Tshirt,
                shirt_type_id: Some(1),
                quantity: 4,
            }],
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(matches!(
            validate_quantity(0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_quantity(1000),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_cart_treats_zero_as_one() {
        let lines = vec![
            CartLine {
                item: LineItem::default(),
                quantity: Some(0),
            },
            CartLine {
                item: LineItem::default(),
                quantity: None,
            },
        ];
        assert!(validate_cart(&lines).is_ok());

        let too_many = vec![CartLine {
            item: LineItem::default(),
            quantity: Some(5000),
        }];
        assert!(validate_cart(&too_many).is_err());
    }

    #[test]
    fn test_validate_pack() {
        assert!(validate_pack(&pack()).is_ok());

        let mut unnamed = pack();
        unnamed.name = "  ".to_string();
        assert!(validate_pack(&unnamed).is_err());

        let mut empty = pack();
        empty.requirements.clear();
        assert!(validate_pack(&empty).is_err());

        let mut negative = pack();
        negative.price_cents = -1;
        assert!(validate_pack(&negative).is_err());

        let mut zero_min = pack();
        zero_min.requirements[0].quantity = 0;
        assert!(validate_pack(&zero_min).is_err());
    }

    #[test]
    fn test_validate_config_key() {
        assert!(validate_config_key("personalization_price").is_ok());
        assert!(validate_config_key("").is_err());
        assert!(validate_config_key("patch-price").is_err());
        assert!(validate_config_key(&"k".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_order_id() {
        assert!(validate_order_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_order_id("order-1").is_err());
    }

    #[test]
    fn test_validate_size() {
        assert_eq!(validate_size(" XL ").unwrap(), "XL");
        assert!(validate_size("").is_err());
    }
}
