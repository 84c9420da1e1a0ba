//! # Order Pricing Engine
//!
//! Computes what a customer owes for a cart or order.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      One Pricing Call                                   │
//! │                                                                         │
//! │  Vec<LineItem> (one per unit)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  classify()            bundle:1 ×5   product:12:M ×1   shoes ×1         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BundleStrategy        bundle:1 → pack "4+" @ €15.00                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  aggregate()           subtotals (+ patches, personalization) → total   │
//! │                                                                         │
//! │  Inputs are a snapshot: packs, shirt type prices, surcharge prices.     │
//! │  Nothing is read or written while the call runs.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use std::collections::HashMap;
//! use kitline_core::money::Money;
//! use kitline_core::pricing::price;
//! use kitline_core::surcharge::SurchargeRules;
//! use kitline_core::types::{LineItem, Pack, PackRequirement, ProductCategory};
//!
//! let shirt = LineItem {
//!     shirt_type_id: Some(1),
//!     price: Some(Money::from_cents(2000)),
//!     ..Default::default()
//! };
//! let pack = Pack {
//!     id: 1,
//!     name: "4+ Retro".to_string(),
//!     price_cents: 1500,
//!     requirements: vec![PackRequirement {
//!         category: ProductCategory::Tshirt,
//!         shirt_type_id: Some(1),
//!         quantity: 4,
//!     }],
//! };
//!
//! let items = vec![shirt; 5];
//! let total = price(&items, &[pack], &HashMap::new(), Money::zero(), &SurchargeRules::default());
//! assert_eq!(total, Money::from_cents(7500));
//! ```

pub mod aggregate;
pub mod classify;
pub mod matcher;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::money::Money;
use crate::surcharge::SurchargeRules;
use crate::types::{LineItem, Pack, ShirtType};

pub use aggregate::{GroupQuote, PriceBreakdown, PriceSources};
pub use classify::{classify, GroupAggregate, GroupKey, GroupMap};
pub use matcher::{BundleResolution, BundleStrategy, CheapestSinglePack, PackMatch};

// =============================================================================
// Options
// =============================================================================

/// Engine settings that come from deployment configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingOptions {
    /// Unit price of every item in the `shoes` group.
    pub shoe_unit_price: Money,

    /// Whether catalog products without a shirt type pick up patch and
    /// personalization surcharges regardless of their declared category.
    pub surcharges_on_untyped_products: bool,
}

impl Default for PricingOptions {
    fn default() -> Self {
        PricingOptions {
            shoe_unit_price: Money::zero(),
            surcharges_on_untyped_products: true,
        }
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Everything a pricing call reads, fetched once by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingSnapshot {
    pub packs: Vec<Pack>,
    /// Shirt type id → listed unit price (fallback when no pack applies).
    pub shirt_type_prices: HashMap<i64, Money>,
    pub surcharges: SurchargeRules,
}

impl PricingSnapshot {
    /// Builds a snapshot from catalog rows.
    pub fn new(packs: Vec<Pack>, shirt_types: &[ShirtType], surcharges: SurchargeRules) -> Self {
        PricingSnapshot {
            packs,
            shirt_type_prices: shirt_types.iter().map(|t| (t.id, t.price())).collect(),
            surcharges,
        }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// The pricing engine: options plus a bundle resolution strategy.
///
/// Stateless between calls. Share one instance freely across threads.
#[derive(Debug, Clone)]
pub struct PricingEngine<S = CheapestSinglePack> {
    options: PricingOptions,
    strategy: S,
}

impl PricingEngine {
    /// Creates an engine with the default (cheapest single pack) strategy.
    pub fn new(options: PricingOptions) -> Self {
        PricingEngine {
            options,
            strategy: CheapestSinglePack,
        }
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        PricingEngine::new(PricingOptions::default())
    }
}

impl<S: BundleStrategy> PricingEngine<S> {
    /// Creates an engine with a custom bundle resolution strategy.
    pub fn with_strategy(options: PricingOptions, strategy: S) -> Self {
        PricingEngine { options, strategy }
    }

    pub fn options(&self) -> &PricingOptions {
        &self.options
    }

    /// Prices unit line items and returns the per-group breakdown.
    pub fn quote(
        &self,
        items: &[LineItem],
        packs: &[Pack],
        shirt_type_prices: &HashMap<i64, Money>,
        surcharges: &SurchargeRules,
    ) -> PriceBreakdown {
        let groups = classify(items, self.options.surcharges_on_untyped_products);
        let resolution = self.strategy.resolve(&groups, packs);

        let breakdown = aggregate::aggregate(
            &groups,
            PriceSources {
                resolution: &resolution,
                shirt_type_prices,
                shoe_unit_price: self.options.shoe_unit_price,
                surcharges,
            },
        );

        debug!(
            items = items.len(),
            groups = groups.len(),
            packs_applied = resolution.len(),
            total = %breakdown.total,
            "order priced"
        );

        breakdown
    }

    /// Prices unit line items against a snapshot.
    pub fn quote_snapshot(&self, items: &[LineItem], snapshot: &PricingSnapshot) -> PriceBreakdown {
        self.quote(
            items,
            &snapshot.packs,
            &snapshot.shirt_type_prices,
            &snapshot.surcharges,
        )
    }
}

/// Computes the order total with the default strategy.
///
/// `items` must already be expanded to one record per unit. The result is
/// never negative.
pub fn price(
    items: &[LineItem],
    packs: &[Pack],
    shirt_type_prices: &HashMap<i64, Money>,
    shoe_unit_price: Money,
    surcharges: &SurchargeRules,
) -> Money {
    let options = PricingOptions {
        shoe_unit_price,
        ..PricingOptions::default()
    };
    PricingEngine::new(options)
        .quote(items, packs, shirt_type_prices, surcharges)
        .total
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PackRequirement, ProductCategory};

    const X: i64 = 1;

    fn shirt_x(cents: i64) -> LineItem {
        LineItem {
            shirt_type_id: Some(X),
            size: "M".to_string(),
            price: Some(Money::from_cents(cents)),
            ..Default::default()
        }
    }

    fn pack_x(id: i64, min: u32, cents: i64) -> Pack {
        Pack {
            id,
            name: format!("{min}+ X"),
            price_cents: cents,
            requirements: vec![PackRequirement {
                category: ProductCategory::Tshirt,
                shirt_type_id: Some(X),
                quantity: min,
            }],
        }
    }

    fn total(items: &[LineItem], packs: &[Pack], surcharges: SurchargeRules) -> Money {
        price(items, packs, &HashMap::new(), Money::zero(), &surcharges)
    }

    fn total_of(items: &[LineItem], packs: &[Pack]) -> Money {
        total(items, packs, SurchargeRules::default())
    }

    #[test]
    fn scenario_a_no_packs_sums_listed_prices() {
        let items = vec![shirt_x(2000); 3];
        assert_eq!(total(&items, &[], SurchargeRules::default()), Money::from_cents(6000));
    }

    #[test]
    fn scenario_b_pack_price_applies_to_every_unit() {
        let items = vec![shirt_x(2000); 5];
        let packs = [pack_x(1, 4, 1500)];
        assert_eq!(total(&items, &packs, SurchargeRules::default()), Money::from_cents(7500));
    }

    #[test]
    fn scenario_c_below_threshold_pays_listed_prices() {
        let items = vec![shirt_x(2000), shirt_x(2200)];
        let packs = [pack_x(1, 3, 1500)];
        assert_eq!(total(&items, &packs, SurchargeRules::default()), Money::from_cents(4200));
    }

    #[test]
    fn scenario_d_patches_and_personalization() {
        let mut item = shirt_x(2000);
        item.patches = vec!["liga.png".to_string(), "champions.png".to_string()];
        item.player_name = Some("Figo".to_string());

        let surcharges = SurchargeRules {
            patch: Money::from_cents(200),
            personalization: Money::from_cents(300),
        };
        assert_eq!(total(&[item], &[], surcharges), Money::from_cents(2700));
    }

    #[test]
    fn scenario_e_sizes_of_one_product_priced_apart() {
        let medium = LineItem {
            product_id: Some(30),
            size: "M".to_string(),
            price: Some(Money::from_cents(2500)),
            ..Default::default()
        };
        let large = LineItem {
            size: "L".to_string(),
            ..medium.clone()
        };

        let breakdown = PricingEngine::default().quote(
            &[medium, large],
            &[],
            &HashMap::new(),
            &SurchargeRules::default(),
        );
        assert_eq!(breakdown.groups.len(), 2);
        assert!(breakdown.group("product:30:M").is_some());
        assert!(breakdown.group("product:30:L").is_some());
        assert_eq!(breakdown.total, Money::from_cents(5000));
    }

    #[test]
    fn test_threshold_one_below_and_at() {
        let packs = [pack_x(1, 4, 1000)];
        let below = vec![shirt_x(2000); 3];
        let at = vec![shirt_x(2000); 4];

        assert_eq!(total(&below, &packs, SurchargeRules::default()), Money::from_cents(6000));
        assert_eq!(total(&at, &packs, SurchargeRules::default()), Money::from_cents(4000));
    }

    #[test]
    fn test_cheapest_pack_regardless_of_catalog_order() {
        let items = vec![shirt_x(2000); 6];
        let forward = [pack_x(1, 2, 1000), pack_x(2, 5, 800)];
        let backward = [pack_x(2, 5, 800), pack_x(1, 2, 1000)];

        assert_eq!(total(&items, &forward, SurchargeRules::default()), Money::from_cents(4800));
        assert_eq!(total(&items, &backward, SurchargeRules::default()), Money::from_cents(4800));
    }

    #[test]
    fn test_personalization_difference_is_exact() {
        let surcharges = SurchargeRules {
            patch: Money::from_cents(250),
            personalization: Money::from_cents(375),
        };
        let plain = shirt_x(2000);
        let mut named = shirt_x(2000);
        named.number = Some("7".to_string());

        let plain_total = total(&[plain], &[], surcharges);
        let named_total = total(&[named], &[], surcharges);
        assert_eq!(named_total - plain_total, Money::from_cents(375));
    }

    #[test]
    fn test_deterministic() {
        let mut items = vec![shirt_x(2000); 4];
        items.push(LineItem {
            category: ProductCategory::Shoes,
            ..Default::default()
        });
        items.push(LineItem {
            category: ProductCategory::Other,
            price: Some(Money::from_cents(999)),
            ..Default::default()
        });
        let packs = [pack_x(1, 4, 1500), pack_x(2, 2, 1700)];
        let engine = PricingEngine::new(PricingOptions {
            shoe_unit_price: Money::from_cents(5000),
            surcharges_on_untyped_products: true,
        });

        let first = engine.quote(&items, &packs, &HashMap::new(), &SurchargeRules::default());
        let second = engine.quote(&items, &packs, &HashMap::new(), &SurchargeRules::default());
        assert_eq!(first, second);
        assert_eq!(first.total, Money::from_cents(4 * 1500 + 5000 + 999));
    }

    #[test]
    fn test_monotonic_without_pack() {
        let mut items = Vec::new();
        let mut previous = Money::zero();
        for _ in 0..6 {
            items.push(shirt_x(1800));
            let current = total(&items, &[], SurchargeRules::default());
            assert_eq!(current - previous, Money::from_cents(1800));
            previous = current;
        }
    }

    #[test]
    fn test_total_never_negative() {
        let items = vec![
            LineItem {
                category: ProductCategory::Other,
                price: Some(Money::from_cents(-10_000)),
                ..Default::default()
            },
            shirt_x(-500),
        ];
        let packs = [pack_x(1, 1, -300)];
        let total = total(&items, &packs, SurchargeRules::default());
        assert_eq!(total, Money::zero());
    }

    #[test]
    fn test_huge_listed_prices_saturate_instead_of_wrapping() {
        let lines: Vec<crate::types::CartLine> = serde_json::from_str(
            r#"[{"product_id": 1, "size": "M", "price": "90000000000000000", "quantity": 2}]"#,
        )
        .unwrap();
        let items = crate::types::expand_cart(&lines);
        assert_eq!(items.len(), 2);

        let total = total(&items, &[], SurchargeRules::default());
        assert_eq!(total, Money::from_cents(i64::MAX));

        let mut shirts = vec![shirt_x(i64::MAX); 3];
        shirts[0].patches = vec!["crest.png".to_string()];
        let packs = [pack_x(1, 2, i64::MAX)];
        assert_eq!(total_of(&shirts, &packs), Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_snapshot_fallback_to_shirt_type_price() {
        let shirt_types = [ShirtType {
            id: X,
            name: "Retro".to_string(),
            price_cents: 1900,
            cost_price_cents: 700,
        }];
        let snapshot = PricingSnapshot::new(vec![], &shirt_types, SurchargeRules::default());

        let mut unpriced = shirt_x(0);
        unpriced.price = None;
        let items = vec![unpriced; 2];

        let breakdown = PricingEngine::default().quote_snapshot(&items, &snapshot);
        assert_eq!(breakdown.total, Money::from_cents(3800));
    }

    #[derive(Debug)]
    struct NeverMatch;

    impl BundleStrategy for NeverMatch {
        fn resolve(&self, _groups: &GroupMap, _packs: &[Pack]) -> BundleResolution {
            BundleResolution::new()
        }
    }

    #[test]
    fn test_custom_strategy_plugs_in() {
        let items = vec![shirt_x(2000); 5];
        let packs = [pack_x(1, 4, 1500)];
        let engine = PricingEngine::with_strategy(PricingOptions::default(), NeverMatch);

        let breakdown = engine.quote(&items, &packs, &HashMap::new(), &SurchargeRules::default());
        assert_eq!(breakdown.total, Money::from_cents(10_000));
    }
}
