//! # Line-Item Classifier
//!
//! Partitions expanded line items into groups by commercial identity.
//!
//! ## Key Precedence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  item has shirt_type_id?  ──yes──► bundle:<shirt_type_id>               │
//! │        │ no                         (even with a product_id: catalog    │
//! │        ▼                             products typed as a shirt type     │
//! │  item has product_id?     ──yes──►   take part in packs)                │
//! │        │ no                        product:<product_id>:<size>          │
//! │        ▼                                                                │
//! │  category == shoes?       ──yes──► shoes                                │
//! │        │ no                                                             │
//! │        ▼                                                                │
//! │  other                                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::money::Money;
use crate::types::{LineItem, ProductCategory};

/// Classification key of a group.
///
/// Ordered so that a [`GroupMap`] iterates deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    /// Items of one shirt type; packs apply.
    Bundle(i64),
    /// One catalog product in one size. Sizes are never merged.
    Product { product_id: i64, size: String },
    /// Shoes, priced at the configured shoe unit price.
    Shoes,
    /// Everything else, priced by summing listed prices.
    Other,
}

impl GroupKey {
    /// Resolves the key of a single line item. Total: every item gets one.
    pub fn for_item(item: &LineItem) -> Self {
        if let Some(shirt_type_id) = item.shirt_type_id {
            return GroupKey::Bundle(shirt_type_id);
        }
        if let Some(product_id) = item.product_id {
            return GroupKey::Product {
                product_id,
                size: item.size.clone(),
            };
        }
        if item.category == ProductCategory::Shoes {
            return GroupKey::Shoes;
        }
        GroupKey::Other
    }

    /// Only bundle and product groups accumulate customization surcharges.
    pub fn takes_surcharges(&self) -> bool {
        matches!(self, GroupKey::Bundle(_) | GroupKey::Product { .. })
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Bundle(id) => write!(f, "bundle:{}", id),
            GroupKey::Product { product_id, size } => write!(f, "product:{}:{}", product_id, size),
            GroupKey::Shoes => f.write_str("shoes"),
            GroupKey::Other => f.write_str("other"),
        }
    }
}

/// Per-group totals accumulated during one pricing call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupAggregate {
    /// Number of unit line items.
    pub count: u32,
    /// Sum of listed prices (missing prices count as zero).
    pub price_sum: Money,
    /// Attached patches across the group.
    pub patches: u32,
    /// Items with a printed name and/or number.
    pub personalized: u32,
}

impl GroupAggregate {
    fn absorb(&mut self, item: &LineItem, with_surcharges: bool) {
        self.count = self.count.saturating_add(1);
        self.price_sum += item.listed_price();

        if with_surcharges {
            self.patches = self.patches.saturating_add(item.patch_count());
            if item.is_personalized() {
                self.personalized = self.personalized.saturating_add(1);
            }
        }
    }
}

/// Groups produced by [`classify`].
pub type GroupMap = BTreeMap<GroupKey, GroupAggregate>;

/// Partitions line items into groups and accumulates their aggregates.
///
/// `surcharges_on_untyped_products` controls catalog products without a shirt
/// type: when `true` they accumulate surcharges whenever patches or a
/// personalization are present; when `false` only items declared as t-shirts
/// do. Shirt-type groups always accumulate.
pub fn classify(items: &[LineItem], surcharges_on_untyped_products: bool) -> GroupMap {
    let mut groups = GroupMap::new();

    for item in items {
        let key = GroupKey::for_item(item);
        let with_surcharges = match &key {
            GroupKey::Bundle(_) => true,
            GroupKey::Product { .. } => {
                surcharges_on_untyped_products || item.category == ProductCategory::Tshirt
            }
            GroupKey::Shoes | GroupKey::Other => false,
        };

        groups.entry(key).or_default().absorb(item, with_surcharges);
    }

    groups
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn shirt(shirt_type_id: i64, cents: i64) -> LineItem {
        LineItem {
            shirt_type_id: Some(shirt_type_id),
            size: "M".to_string(),
            price: Some(Money::from_cents(cents)),
            ..Default::default()
        }
    }

    fn product(product_id: i64, size: &str, cents: i64) -> LineItem {
        LineItem {
            product_id: Some(product_id),
            size: size.to_string(),
            price: Some(Money::from_cents(cents)),
            ..Default::default()
        }
    }

    #[test]
    fn test_key_precedence() {
        let mut typed_product = product(5, "L", 3000);
        typed_product.shirt_type_id = Some(2);
        assert_eq!(GroupKey::for_item(&typed_product), GroupKey::Bundle(2));

        assert_eq!(
            GroupKey::for_item(&product(5, "L", 3000)),
            GroupKey::Product {
                product_id: 5,
                size: "L".to_string()
            }
        );

        let shoes = LineItem {
            category: ProductCategory::Shoes,
            ..Default::default()
        };
        assert_eq!(GroupKey::for_item(&shoes), GroupKey::Shoes);

        let scarf = LineItem {
            category: ProductCategory::Other,
            ..Default::default()
        };
        assert_eq!(GroupKey::for_item(&scarf), GroupKey::Other);
        assert_eq!(GroupKey::for_item(&LineItem::default()), GroupKey::Other);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(GroupKey::Bundle(3).to_string(), "bundle:3");
        assert_eq!(
            GroupKey::Product {
                product_id: 12,
                size: "XL".to_string()
            }
            .to_string(),
            "product:12:XL"
        );
        assert_eq!(GroupKey::Shoes.to_string(), "shoes");
        assert_eq!(GroupKey::Other.to_string(), "other");
    }

    #[test]
    fn test_sizes_of_same_product_stay_apart() {
        let groups = classify(&[product(9, "M", 2500), product(9, "L", 2500)], true);
        assert_eq!(groups.len(), 2);
        assert!(groups.values().all(|g| g.count == 1));
    }

    #[test]
    fn test_accumulates_count_and_price_sum() {
        let mut free = shirt(1, 0);
        free.price = None;
        let groups = classify(&[shirt(1, 2000), shirt(1, 1800), free], true);

        let group = groups[&GroupKey::Bundle(1)];
        assert_eq!(group.count, 3);
        assert_eq!(group.price_sum, Money::from_cents(3800));
    }

    #[test]
    fn test_personalization_counted_once_per_item() {
        let mut both = shirt(1, 2000);
        both.player_name = Some("Rui Costa".to_string());
        both.number = Some("10".to_string());
        both.patches = vec!["liga.png".to_string(), "champions.png".to_string()];

        let mut blank = shirt(1, 2000);
        blank.player_name = Some("   ".to_string());

        let groups = classify(&[both, blank], true);
        let group = groups[&GroupKey::Bundle(1)];
        assert_eq!(group.personalized, 1);
        assert_eq!(group.patches, 2);
    }

    #[test]
    fn test_shoes_and_other_never_accumulate_surcharges() {
        let shoes = LineItem {
            category: ProductCategory::Shoes,
            player_name: Some("Name".to_string()),
            patches: vec!["x".to_string()],
            ..Default::default()
        };
        let other = LineItem {
            category: ProductCategory::Other,
            number: Some("7".to_string()),
            ..Default::default()
        };

        let groups = classify(&[shoes, other], true);
        assert!(groups.values().all(|g| g.patches == 0 && g.personalized == 0));
    }

    #[test]
    fn test_untyped_product_surcharge_gate() {
        let mut hoodie = product(4, "M", 4000);
        hoodie.category = ProductCategory::Other;
        hoodie.number = Some("7".to_string());

        let mut jersey = product(5, "M", 3000);
        jersey.number = Some("9".to_string());

        let permissive = classify(&[hoodie.clone(), jersey.clone()], true);
        assert!(permissive.values().all(|g| g.personalized == 1));

        let strict = classify(&[hoodie, jersey], false);
        let hoodie_key = GroupKey::Product {
            product_id: 4,
            size: "M".to_string(),
        };
        let jersey_key = GroupKey::Product {
            product_id: 5,
            size: "M".to_string(),
        };
        assert_eq!(strict[&hoodie_key].personalized, 0);
        assert_eq!(strict[&jersey_key].personalized, 1);
    }
}
