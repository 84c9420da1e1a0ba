//! # kitline-db: Database Layer for Kitline
//!
//! SQLite persistence for everything the pricing engine reads and for the
//! orders whose totals it produces.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kitline Data Flow                                │
//! │                                                                         │
//! │  PricingService (kitline-quote)                                        │
//! │       │  snapshot reads            total writes                         │
//! │       ▼                                 ▲                               │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   kitline-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐   ┌───────────┐  │   │
//! │  │   │   Database    │    │    Repositories    │   │ Migrations│  │   │
//! │  │   │   (pool.rs)   │◄───│ shirt_types packs  │   │ (embedded)│  │   │
//! │  │   │  SqlitePool   │    │ products   orders  │   │           │  │   │
//! │  │   │               │    │ pricing_config     │   │           │  │   │
//! │  │   └───────────────┘    └────────────────────┘   └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kitline_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("kitline.db")).await?;
//! let packs = db.packs().list_active().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::order::{NewOrderItemRecord, OrderRepository};
pub use repository::pack::PackRepository;
pub use repository::pricing_config::PricingConfigRepository;
pub use repository::product::{NewProduct, ProductRepository};
pub use repository::shirt_type::ShirtTypeRepository;
