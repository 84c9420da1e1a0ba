//! # Bundle Matcher
//!
//! Chooses which pack (if any) prices each shirt-type group.
//!
//! Resolution sits behind [`BundleStrategy`] so a different search (for
//! example one that also places multi-type packs) can be swapped in without
//! touching the classifier or the aggregator. The shipped strategy is
//! [`CheapestSinglePack`]: linear, deterministic, at most one pack per group.
//!
//! ## Threshold Semantics
//! ```text
//! Pack "4+ Retro" {shirt type 1, min 4, €15.00/unit}
//!
//!   group bundle:1, count 3  ──► 3 < 4   ──► not eligible
//!   group bundle:1, count 4  ──► 4 >= 4  ──► eligible, all 4 units at €15.00
//!   group bundle:1, count 9  ──► 9 >= 4  ──► eligible, all 9 units at €15.00
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;
use ts_rs::TS;

use super::classify::{GroupKey, GroupMap};
use crate::money::Money;
use crate::types::{Pack, ProductCategory};

/// The pack chosen for a group and the per-unit price it sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PackMatch {
    pub pack_id: i64,
    pub pack_name: String,
    pub unit_price: Money,
}

impl PackMatch {
    fn from_pack(pack: &Pack) -> Self {
        PackMatch {
            pack_id: pack.id,
            pack_name: pack.name.clone(),
            unit_price: pack.price(),
        }
    }
}

/// Chosen packs, keyed by shirt type id. Groups without an entry pay their
/// listed prices.
pub type BundleResolution = BTreeMap<i64, PackMatch>;

/// Strategy for resolving packs against the classified groups.
pub trait BundleStrategy: fmt::Debug + Send + Sync {
    fn resolve(&self, groups: &GroupMap, packs: &[Pack]) -> BundleResolution;
}

/// Picks, per shirt-type group, the cheapest single-type pack whose minimum
/// quantity the group reaches.
///
/// Multi-type packs and packs whose requirement is not a t-shirt are
/// skipped. Among qualifying packs the lowest per-unit
/// price wins regardless of catalog order or threshold size; equal prices
/// fall back to the lower pack id so the result never depends on ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheapestSinglePack;

impl CheapestSinglePack {
    /// Best pack for `count` units of one shirt type.
    ///
    /// ```rust
    /// use kitline_core::pricing::CheapestSinglePack;
    /// use kitline_core::types::{Pack, PackRequirement, ProductCategory};
    ///
    /// let pack = |id, min, cents| Pack {
    ///     id,
    ///     name: format!("{min}+"),
    ///     price_cents: cents,
    ///     requirements: vec![PackRequirement {
    ///         category: ProductCategory::Tshirt,
    ///         shirt_type_id: Some(1),
    ///         quantity: min,
    ///     }],
    /// };
    /// let packs = [pack(1, 3, 1000), pack(2, 5, 800)];
    ///
    /// assert_eq!(CheapestSinglePack::best_for(1, 2, &packs), None);
    /// assert_eq!(CheapestSinglePack::best_for(1, 4, &packs).map(|p| p.id), Some(1));
    /// assert_eq!(CheapestSinglePack::best_for(1, 5, &packs).map(|p| p.id), Some(2));
    /// ```
    pub fn best_for(shirt_type_id: i64, count: u32, packs: &[Pack]) -> Option<&Pack> {
        packs
            .iter()
            .filter(|pack| {
                pack.single_requirement()
                    .map(|req| {
                        req.category == ProductCategory::Tshirt
                            && req.shirt_type_id == Some(shirt_type_id)
                            && req.quantity <= count
                    })
                    .unwrap_or(false)
            })
            .min_by_key(|pack| (pack.price_cents, pack.id))
    }
}

impl BundleStrategy for CheapestSinglePack {
    fn resolve(&self, groups: &GroupMap, packs: &[Pack]) -> BundleResolution {
        groups
            .iter()
            .filter_map(|(key, group)| match key {
                GroupKey::Bundle(shirt_type_id) => {
                    let best = Self::best_for(*shirt_type_id, group.count, packs)?;
                    trace!(
                        shirt_type_id,
                        count = group.count,
                        pack_id = best.id,
                        unit_cents = best.price_cents,
                        "pack matched"
                    );
                    Some((*shirt_type_id, PackMatch::from_pack(best)))
                }
                _ => None,
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
