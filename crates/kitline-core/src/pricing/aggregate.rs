//! # Price Aggregator
//!
//! Turns groups, chosen packs and surcharge prices into group subtotals and
//! the order total.
//!
//! ## Group Pricing
//! ```text
//! ┌──────────────────────┬────────────────────────────────────┬────────────┐
//! │ group                │ base                               │ surcharges │
//! ├──────────────────────┼────────────────────────────────────┼────────────┤
//! │ bundle:<id>, matched │ count × pack unit price            │ yes        │
//! │ bundle:<id>, no pack │ price sum if > 0,                  │ yes        │
//! │                      │ else count × shirt type price      │            │
//! │ product:<id>:<size>  │ price sum                          │ yes        │
//! │ shoes                │ count × shoe unit price            │ no         │
//! │ other                │ price sum                          │ no         │
//! └──────────────────────┴────────────────────────────────────┴────────────┘
//!
//! surcharges = patches × patch price + personalized × personalization price
//! subtotal   = max(0, base + surcharges)
//! total      = Σ subtotal
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::classify::{GroupAggregate, GroupKey, GroupMap};
use super::matcher::{BundleResolution, PackMatch};
use crate::money::Money;
use crate::surcharge::SurchargeRules;

/// Priced view of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GroupQuote {
    /// Classification key, e.g. `bundle:3` or `product:12:M`.
    pub key: String,
    pub count: u32,
    pub base: Money,
    pub surcharges: Money,
    pub subtotal: Money,
    /// Pack that set the unit price, when one qualified.
    pub pack: Option<PackMatch>,
}

/// Priced breakdown of a whole cart or order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceBreakdown {
    pub groups: Vec<GroupQuote>,
    pub total: Money,
}

impl PriceBreakdown {
    /// Finds the quote of a group by its key text.
    pub fn group(&self, key: &str) -> Option<&GroupQuote> {
        self.groups.iter().find(|g| g.key == key)
    }
}

/// Price lookups the aggregator needs beyond the groups themselves.
#[derive(Debug, Clone, Copy)]
pub struct PriceSources<'a> {
    pub resolution: &'a BundleResolution,
    pub shirt_type_prices: &'a HashMap<i64, Money>,
    pub shoe_unit_price: Money,
    pub surcharges: &'a SurchargeRules,
}

/// Prices every group and sums the subtotals.
pub fn aggregate(groups: &GroupMap, sources: PriceSources<'_>) -> PriceBreakdown {
    let quotes: Vec<GroupQuote> = groups
        .iter()
        .map(|(key, group)| quote_group(key, group, sources))
        .collect();

    let total: Money = quotes.iter().map(|q| q.subtotal).sum();

    PriceBreakdown {
        groups: quotes,
        total,
    }
}

fn quote_group(key: &GroupKey, group: &GroupAggregate, sources: PriceSources<'_>) -> GroupQuote {
    let mut pack = None;

    let base = match key {
        GroupKey::Bundle(shirt_type_id) => match sources.resolution.get(shirt_type_id) {
            Some(matched) => {
                pack = Some(matched.clone());
                matched.unit_price.times(group.count)
            }
            None if group.price_sum.is_positive() => group.price_sum,
            None => sources
                .shirt_type_prices
                .get(shirt_type_id)
                .copied()
                .unwrap_or_default()
                .times(group.count),
        },
        GroupKey::Product { .. } | GroupKey::Other => group.price_sum,
        GroupKey::Shoes => sources.shoe_unit_price.times(group.count),
    };

    let surcharges = if key.takes_surcharges() {
        sources.surcharges.patch.times(group.patches)
            + sources.surcharges.personalization.times(group.personalized)
    } else {
        Money::zero()
    };

    GroupQuote {
        key: key.to_string(),
        count: group.count,
        base,
        surcharges,
        subtotal: (base + surcharges).clamp_non_negative(),
        pack,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn group(count: u32, sum_cents: i64) -> GroupAggregate {
        GroupAggregate {
            count,
            price_sum: Money::from_cents(sum_cents),
            ..Default::default()
        }
    }

    fn run(groups: &GroupMap, resolution: &BundleResolution, catalog: &HashMap<i64, Money>) -> PriceBreakdown {
        aggregate(
            groups,
            PriceSources {
                resolution,
                shirt_type_prices: catalog,
                shoe_unit_price: Money::from_cents(5000),
                surcharges: &SurchargeRules::default(),
            },
        )
    }

    #[test]
    fn test_bundle_without_pack_uses_catalog_when_sum_is_zero() {
        let groups: GroupMap = [(GroupKey::Bundle(2), group(3, 0))].into_iter().collect();
        let catalog = HashMap::from([(2, Money::from_cents(1700))]);

        let breakdown = run(&groups, &BundleResolution::new(), &catalog);
        assert_eq!(breakdown.total, Money::from_cents(5100));
        assert_eq!(breakdown.group("bundle:2").unwrap().pack, None);
    }

    #[test]
    fn test_bundle_without_pack_or_catalog_row_is_free() {
        let groups: GroupMap = [(GroupKey::Bundle(2), group(3, 0))].into_iter().collect();
        let breakdown = run(&groups, &BundleResolution::new(), &HashMap::new());
        assert_eq!(breakdown.total, Money::zero());
    }

    #[test]
    fn test_matched_pack_overrides_listed_prices() {
        let groups: GroupMap = [(GroupKey::Bundle(2), group(5, 10_000))].into_iter().collect();
        let resolution = BundleResolution::from([(
            2,
            PackMatch {
                pack_id: 1,
                pack_name: "4+".to_string(),
                unit_price: Money::from_cents(1500),
            },
        )]);

        let breakdown = run(&groups, &resolution, &HashMap::new());
        assert_eq!(breakdown.total, Money::from_cents(7500));
        assert_eq!(breakdown.groups[0].pack.as_ref().map(|p| p.pack_id), Some(1));
    }

    #[test]
    fn test_shoes_ignore_listed_prices_and_surcharges() {
        let mut shoes = group(2, 99_900);
        shoes.patches = 4;
        shoes.personalized = 2;
        let groups: GroupMap = [(GroupKey::Shoes, shoes)].into_iter().collect();

        let breakdown = run(&groups, &BundleResolution::new(), &HashMap::new());
        let quote = breakdown.group("shoes").unwrap();
        assert_eq!(quote.base, Money::from_cents(10_000));
        assert_eq!(quote.surcharges, Money::zero());
        assert_eq!(breakdown.total, Money::from_cents(10_000));
    }

    #[test]
    fn test_product_group_adds_surcharges() {
        let mut jersey = group(2, 5000);
        jersey.patches = 3;
        jersey.personalized = 1;
        let key = GroupKey::Product {
            product_id: 4,
            size: "S".to_string(),
        };
        let groups: GroupMap = [(key, jersey)].into_iter().collect();

        let breakdown = run(&groups, &BundleResolution::new(), &HashMap::new());
        let quote = breakdown.group("product:4:S").unwrap();
        assert_eq!(quote.surcharges, Money::from_cents(3 * 200 + 300));
        assert_eq!(quote.subtotal, Money::from_cents(5900));
    }

    #[test]
    fn test_negative_subtotal_clamped() {
        let groups: GroupMap = [
            (GroupKey::Other, group(1, -4000)),
            (
                GroupKey::Product {
                    product_id: 1,
                    size: "M".to_string(),
                },
                group(1, 2500),
            ),
        ]
        .into_iter()
        .collect();

        let breakdown = run(&groups, &BundleResolution::new(), &HashMap::new());
        assert_eq!(breakdown.group("other").unwrap().subtotal, Money::zero());
        assert_eq!(breakdown.total, Money::from_cents(2500));
    }

    #[test]
    fn test_empty_cart_totals_zero() {
        let breakdown = run(&GroupMap::new(), &BundleResolution::new(), &HashMap::new());
        assert!(breakdown.groups.is_empty());
        assert_eq!(breakdown.total, Money::zero());
    }
}
