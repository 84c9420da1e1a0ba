//! # Surcharge Rules
//!
//! Per-unit prices for optional customizations, read from the pricing
//! configuration table once per pricing call.
//!
//! ## Configuration Keys
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  key                      → applies to                                  │
//! │  ───────────────────────    ─────────────────────────────────────────   │
//! │  patch_price              → every attached patch                        │
//! │  personalization_price    → every item with a printed name and/or no.   │
//! │  name_price / number_price→ personalization, ONLY when                  │
//! │                             personalization_price is not configured     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The snapshot is a plain value. Administrators may change the table while
//! quotes are being computed; each quote uses the snapshot it was given.

use serde::{Deserialize, Serialize};
use tracing::trace;
use ts_rs::TS;

use crate::money::Money;
use crate::types::PricingConfigEntry;

/// Default patch price when the configuration table has no row (€2.00).
pub const DEFAULT_PATCH_PRICE: Money = Money::from_cents(200);

/// Default personalization price when the configuration table has no row (€3.00).
pub const DEFAULT_PERSONALIZATION_PRICE: Money = Money::from_cents(300);

/// A surcharge category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SurchargeKind {
    /// An attached patch (one charge per patch).
    Patch,
    /// A printed name and/or number (one charge per item).
    Personalization,
}

impl SurchargeKind {
    /// Pricing configuration key holding this surcharge's price.
    pub const fn config_key(&self) -> &'static str {
        match self {
            SurchargeKind::Patch => "patch_price",
            SurchargeKind::Personalization => "personalization_price",
        }
    }

    /// Legacy keys that still feed this surcharge when its own key is absent.
    pub const fn legacy_keys(&self) -> &'static [&'static str] {
        match self {
            SurchargeKind::Patch => &[],
            SurchargeKind::Personalization => &["name_price", "number_price"],
        }
    }
}

/// Current surcharge prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SurchargeRules {
    pub patch: Money,
    pub personalization: Money,
}

impl Default for SurchargeRules {
    fn default() -> Self {
        SurchargeRules {
            patch: DEFAULT_PATCH_PRICE,
            personalization: DEFAULT_PERSONALIZATION_PRICE,
        }
    }
}

impl SurchargeRules {
    /// Builds rules from pricing configuration rows, starting from defaults.
    ///
    /// Unknown keys are ignored. A legacy key only applies when the primary
    /// key for the same surcharge is absent; if several legacy keys are
    /// present the last row wins.
    ///
    /// ```rust
    /// use chrono::Utc;
    /// use kitline_core::money::Money;
    /// use kitline_core::surcharge::SurchargeRules;
    /// use kitline_core::types::PricingConfigEntry;
    ///
    /// let row = |key: &str, cents| PricingConfigEntry {
    ///     key: key.to_string(),
    ///     name: key.to_string(),
    ///     price_cents: cents,
    ///     cost_price_cents: 0,
    ///     description: None,
    ///     updated_at: Utc::now(),
    /// };
    ///
    /// let rules = SurchargeRules::from_entries(&[row("patch_price", 250), row("name_price", 400)]);
    /// assert_eq!(rules.patch, Money::from_cents(250));
    /// assert_eq!(rules.personalization, Money::from_cents(400));
    /// ```
    pub fn from_entries(entries: &[PricingConfigEntry]) -> Self {
        let mut rules = SurchargeRules::default();

        for kind in [SurchargeKind::Patch, SurchargeKind::Personalization] {
            let primary = entries.iter().find(|e| e.key == kind.config_key());
            let chosen = primary.or_else(|| {
                entries
                    .iter()
                    .rev()
                    .find(|e| kind.legacy_keys().contains(&e.key.as_str()))
            });

            if let Some(entry) = chosen {
                trace!(key = %entry.key, cents = entry.price_cents, "surcharge price from config");
                rules.set(kind, Money::from_cents(entry.price_cents));
            }
        }

        rules
    }

    /// Price of one unit of the given surcharge.
    pub fn price_of(&self, kind: SurchargeKind) -> Money {
        match kind {
            SurchargeKind::Patch => self.patch,
            SurchargeKind::Personalization => self.personalization,
        }
    }

    fn set(&mut self, kind: SurchargeKind, price: Money) {
        match kind {
            SurchargeKind::Patch => self.patch = price,
            SurchargeKind::Personalization => self.personalization = price,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
