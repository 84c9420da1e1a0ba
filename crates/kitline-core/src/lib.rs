//! # kitline-core: Order Pricing Engine for Kitline
//!
//! This crate computes what a customer owes for a football-kit order. It is
//! pure: no database, no network, no clock reads on the pricing path.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kitline Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            kitline-quote (checkout + admin callers)             │   │
//! │  │    quote cart ──► add/remove order item ──► reprice order       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ snapshot + line items                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kitline-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ surcharge │  │   │
//! │  │   │ LineItem  │  │   Money   │  │ classify  │  │   rules   │  │   │
//! │  │   │   Pack    │  │  (cents)  │  │  packs    │  │  patches  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  kitline-db (Database Layer)                    │   │
//! │  │          catalog, packs, pricing config, orders                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, Pack, ShirtType, Order, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Classifier, bundle matcher, aggregator, engine
//! - [`surcharge`] - Patch and personalization prices
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use kitline_core::pricing::{PricingEngine, PricingOptions, PricingSnapshot};
//! use kitline_core::types::{expand_cart, CartLine};
//!
//! let cart: Vec<CartLine> = serde_json::from_str(
//!     r#"[{"product_id": 7, "size": "M", "price": "24.90", "quantity": 2}]"#,
//! ).unwrap();
//!
//! let engine = PricingEngine::new(PricingOptions::default());
//! let breakdown = engine.quote_snapshot(&expand_cart(&cart), &PricingSnapshot::default());
//!
//! assert_eq!(breakdown.total.cents(), 4980);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod surcharge;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{price, PriceBreakdown, PricingEngine, PricingOptions, PricingSnapshot};
pub use surcharge::SurchargeRules;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single cart line or order item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// Size recorded for an order item when none is given.
pub const DEFAULT_SIZE: &str = "M";
