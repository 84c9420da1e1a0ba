//! # Domain Types
//!
//! Core domain types used throughout Kitline.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Pricing inputs                       Catalog / persistence             │
//! │  ─────────────────                    ──────────────────────            │
//! │  CartLine ──expand──► LineItem        ShirtType  (pack bundle type)     │
//! │                          │            Product    (catalog item)         │
//! │                          ▼            Pack ──► PackRequirement          │
//! │                    pricing engine     PricingConfigEntry                │
//! │                                       Order ──► OrderItem               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! The storefront posts carts as loosely typed JSON (`price` as a number or a
//! string, `numero` as a number or a string, ids sometimes quoted). Line item
//! fields deserialize leniently: anything unusable becomes "absent" instead
//! of failing the whole cart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::money::{lenient_decimal, Money};

// =============================================================================
// Product Category
// =============================================================================

/// Declared category of a product or line item.
///
/// Only `Shoes` changes classification. `Tshirt` matters when surcharges on
/// untyped catalog products are switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export, rename_all = "lowercase")]
pub enum ProductCategory {
    #[default]
    Tshirt,
    Shoes,
    Other,
}

impl ProductCategory {
    /// Returns the storage/wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Tshirt => "tshirt",
            ProductCategory::Shoes => "shoes",
            ProductCategory::Other => "other",
        }
    }

    /// Parses a category name. Unknown names map to `Other`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "tshirt" => ProductCategory::Tshirt,
            "shoes" => ProductCategory::Shoes,
            _ => ProductCategory::Other,
        }
    }
}

impl Serialize for ProductCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Null or missing categories fall back to the default (`tshirt`), the
/// storefront's default product type.
impl<'de> Deserialize<'de> for ProductCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name.map(|n| ProductCategory::parse(&n)).unwrap_or_default())
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One unit of a cart or order, as the pricing engine sees it.
///
/// Quantity is not a field: callers expand a cart line of quantity `n` into
/// `n` line items (see [`expand_cart`]). The classifier counts records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Catalog product reference.
    #[serde(default, with = "wire::lenient_id")]
    #[ts(type = "number | null")]
    pub product_id: Option<i64>,

    /// Shirt type (pack bundle type) reference.
    #[serde(default, with = "wire::lenient_id")]
    #[ts(type = "number | null")]
    pub shirt_type_id: Option<i64>,

    /// Declared category.
    #[serde(default, rename = "product_type")]
    pub category: ProductCategory,

    /// Size label ("S", "M", "XL", "10 anos", ...).
    #[serde(default, deserialize_with = "wire::text_or_empty")]
    pub size: String,

    /// Listed unit price. `None` when missing or non-numeric.
    #[serde(default, with = "lenient_decimal")]
    #[ts(type = "number | string | null")]
    pub price: Option<Money>,

    /// Attached patch image markers, one per patch.
    #[serde(default, rename = "patch_images", deserialize_with = "wire::list_or_empty")]
    pub patches: Vec<String>,

    /// Personalization: printed name.
    #[serde(default, deserialize_with = "wire::lenient_text")]
    pub player_name: Option<String>,

    /// Personalization: printed number.
    #[serde(default, rename = "numero", deserialize_with = "wire::lenient_text")]
    pub number: Option<String>,
}

impl LineItem {
    /// Listed price, zero when absent.
    #[inline]
    pub fn listed_price(&self) -> Money {
        self.price.unwrap_or_default()
    }

    /// Number of attached patches.
    #[inline]
    pub fn patch_count(&self) -> u32 {
        u32::try_from(self.patches.len()).unwrap_or(u32::MAX)
    }

    /// True when a non-blank name or a non-blank number is printed.
    ///
    /// Name and number together still count as one personalization.
    pub fn is_personalized(&self) -> bool {
        let filled = |field: &Option<String>| {
            field.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
        };
        filled(&self.player_name) || filled(&self.number)
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// A cart entry with a quantity, as posted by the storefront.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    #[serde(flatten)]
    pub item: LineItem,

    /// Units of this entry. Missing or zero means one.
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl CartLine {
    /// Quantity after applying the "missing or zero means one" rule.
    #[inline]
    pub fn effective_quantity(&self) -> u32 {
        match self.quantity {
            Some(0) | None => 1,
            Some(q) => q,
        }
    }
}

/// Expands cart lines into one line item per unit.
///
/// ```rust
/// use kitline_core::types::{expand_cart, CartLine, LineItem};
///
/// let line = CartLine {
///     item: LineItem { shirt_type_id: Some(1), ..Default::default() },
///     quantity: Some(3),
/// };
/// assert_eq!(expand_cart(&[line]).len(), 3);
/// ```
pub fn expand_cart(lines: &[CartLine]) -> Vec<LineItem> {
    lines
        .iter()
        .flat_map(|line| std::iter::repeat(&line.item).take(line.effective_quantity() as usize))
        .cloned()
        .collect()
}

// =============================================================================
// Catalog Types
// =============================================================================

/// A shirt type: the bundle type packs are defined against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ShirtType {
    pub id: i64,
    pub name: String,
    /// Listed unit price in cents, used when no pack applies.
    pub price_cents: i64,
    /// Supplier cost in cents (reporting only).
    pub cost_price_cents: i64,
}

impl ShirtType {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    pub cost_price_cents: i64,
    pub category: ProductCategory,
    /// Catalog products typed as a shirt type take part in packs.
    pub shirt_type_id: Option<i64>,
    /// Sizes on offer. Empty means any size is accepted.
    pub available_sizes: Vec<String>,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks a requested size against the sizes on offer.
    pub fn offers_size(&self, size: Option<&str>) -> bool {
        if self.available_sizes.is_empty() {
            return true;
        }
        size.map(|s| self.available_sizes.iter().any(|a| a == s))
            .unwrap_or(false)
    }
}

/// One requirement of a pack: a bundle type and a minimum quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PackRequirement {
    #[serde(default, rename = "product_type")]
    pub category: ProductCategory,
    pub shirt_type_id: Option<i64>,
    /// Minimum number of units for the pack to apply.
    pub quantity: u32,
}

/// A quantity-discount bundle.
///
/// With a single requirement, `price_cents` is a per-unit price that applies
/// to every unit of the group once the minimum quantity is reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Pack {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    #[serde(rename = "items")]
    pub requirements: Vec<PackRequirement>,
}

impl Pack {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the requirement of a single-type pack, `None` for
    /// multi-type packs (and packs without requirements).
    pub fn single_requirement(&self) -> Option<&PackRequirement> {
        match self.requirements.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

/// A row of the pricing configuration table.
///
/// Keys of interest to pricing: `patch_price`, `personalization_price` and
/// the legacy `name_price` / `number_price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PricingConfigEntry {
    pub key: String,
    pub name: String,
    pub price_cents: i64,
    pub cost_price_cents: i64,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Orders
// =============================================================================

/// An order header. Its total is the price of record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub status: String,
    pub total_price_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

/// A persisted order line. Carries a quantity, unlike [`LineItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: String,
    pub product_id: Option<i64>,
    pub shirt_type_id: Option<i64>,
    pub category: ProductCategory,
    pub size: String,
    pub quantity: u32,
    pub player_name: Option<String>,
    pub number: Option<String>,
    pub patch_images: Vec<String>,
    pub cost_price_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Builds the cart line the pricing engine will expand.
    pub fn cart_line(&self, listed_price: Option<Money>) -> CartLine {
        CartLine {
            item: LineItem {
                product_id: self.product_id,
                shirt_type_id: self.shirt_type_id,
                category: self.category,
                size: self.size.clone(),
                price: listed_price,
                patches: self.patch_images.clone(),
                player_name: self.player_name.clone(),
                number: self.number.clone(),
            },
            quantity: Some(self.quantity),
        }
    }
}

/// Request to add an item to an existing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewOrderItem {
    pub product_id: Option<i64>,
    pub shirt_type_id: Option<i64>,
    pub size: Option<String>,
    pub quantity: Option<u32>,
    pub player_name: Option<String>,
    #[serde(rename = "numero")]
    pub number: Option<String>,
    #[serde(default)]
    pub patch_images: Vec<String>,
}

// =============================================================================
// Lenient Wire Helpers
// =============================================================================

mod wire {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Text fields that the storefront sometimes sends as numbers.
    pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(text)) => Some(text),
            Some(Value::Number(number)) => Some(number.to_string()),
            Some(Value::Bool(flag)) => Some(flag.to_string()),
            _ => None,
        })
    }

    pub fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(lenient_text(deserializer)?.unwrap_or_default())
    }

    /// Non-array values count as "no entries".
    pub fn list_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Array(values)) => values
                .into_iter()
                .map(|v| match v {
                    Value::String(text) => text,
                    other => other.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    /// Ids arrive as numbers, numeric strings, empty strings or null.
    pub mod lenient_id {
        use super::*;
        use serde::Serializer;

        pub fn serialize<S>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(id) => serializer.serialize_i64(*id),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Ok(match Option::<Value>::deserialize(deserializer)? {
                Some(Value::Number(number)) => number.as_i64(),
                Some(Value::String(text)) => text.trim().parse().ok(),
                _ => None,
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
