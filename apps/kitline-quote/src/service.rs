//! # Pricing Service
//!
//! The caller layer around the engine: fetch a snapshot, expand quantities,
//! price, and persist order totals.
//!
//! ## Order Item Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_order_item(order, request)                                         │
//! │     │                                                                   │
//! │     ├── product_id?     → load product, check size, inherit shirt type  │
//! │     ├── shirt_type_id?  → load shirt type                               │
//! │     └── neither         → MissingItemIdentity                           │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  insert item ──► reprice_order ──► persist total                        │
//! │                                                                         │
//! │  remove_order_item(order, item) ──► delete ──► reprice_order            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repricing always starts from every remaining item of the order; totals are
//! never adjusted incrementally.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use kitline_core::validation::{validate_cart, validate_order_id, validate_quantity, validate_size};
use kitline_core::{
    expand_cart, CartLine, CoreError, Money, NewOrderItem, Order, OrderItem, PriceBreakdown,
    PricingEngine, PricingOptions, PricingSnapshot, ProductCategory, SurchargeRules,
    DEFAULT_SIZE,
};
use kitline_db::{Database, NewOrderItemRecord};

use crate::error::{QuoteError, QuoteResult};

/// Result of adding an item to an order.
#[derive(Debug, Clone)]
pub struct AddedItem {
    pub item: OrderItem,
    pub total: Money,
}

/// Prices carts and orders against the current catalog.
#[derive(Debug, Clone)]
pub struct PricingService {
    db: Database,
    engine: PricingEngine,
}

impl PricingService {
    pub fn new(db: Database, options: PricingOptions) -> Self {
        PricingService {
            db,
            engine: PricingEngine::new(options),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Reads packs, shirt types and surcharge prices for one pricing call.
    ///
    /// A failing pricing-config read falls back to default surcharge prices;
    /// failing catalog reads are errors.
    pub async fn load_snapshot(&self) -> QuoteResult<PricingSnapshot> {
        let packs = self.db.packs().list_active().await?;
        let shirt_types = self.db.shirt_types().list().await?;

        let surcharges = match self.db.pricing_config().list().await {
            Ok(entries) => SurchargeRules::from_entries(&entries),
            Err(e) => {
                warn!(error = %e, "Pricing config unavailable, using default surcharges");
                SurchargeRules::default()
            }
        };

        debug!(
            packs = packs.len(),
            shirt_types = shirt_types.len(),
            patch = %surcharges.patch,
            personalization = %surcharges.personalization,
            "Pricing snapshot loaded"
        );

        Ok(PricingSnapshot::new(packs, &shirt_types, surcharges))
    }

    /// Prices a storefront cart (cart preview / checkout).
    pub async fn quote_cart(&self, lines: &[CartLine]) -> QuoteResult<PriceBreakdown> {
        validate_cart(lines)?;

        let snapshot = self.load_snapshot().await?;
        let items = expand_cart(lines);
        let breakdown = self.engine.quote_snapshot(&items, &snapshot);

        info!(lines = lines.len(), units = items.len(), total = %breakdown.total, "Cart quoted");
        Ok(breakdown)
    }

    /// Creates an empty order.
    pub async fn create_order(&self) -> QuoteResult<Order> {
        Ok(self.db.orders().create().await?)
    }

    /// Adds an item to an order and reprices it.
    ///
    /// The insert and the repricing are separate writes. If repricing fails
    /// the item stays stored and the order keeps its previous total until the
    /// next successful [`reprice_order`](Self::reprice_order).
    pub async fn add_order_item(
        &self,
        order_id: &str,
        request: &NewOrderItem,
    ) -> QuoteResult<AddedItem> {
        self.require_order(order_id).await?;

        let record = self.resolve_item(request).await?;
        let item = self.db.orders().add_item(order_id, &record).await?;
        let breakdown = self.reprice_order(order_id).await?;

        Ok(AddedItem {
            item,
            total: breakdown.total,
        })
    }

    /// Removes an item from an order and reprices it.
    ///
    /// Like [`add_order_item`](Self::add_order_item), a failed repricing
    /// leaves the deletion in place and the stored total stale.
    pub async fn remove_order_item(&self, order_id: &str, item_id: i64) -> QuoteResult<Money> {
        self.require_order(order_id).await?;
        self.db.orders().delete_item(order_id, item_id).await?;

        let breakdown = self.reprice_order(order_id).await?;
        Ok(breakdown.total)
    }

    /// Recomputes an order's total from all its items and persists it.
    pub async fn reprice_order(&self, order_id: &str) -> QuoteResult<PriceBreakdown> {
        self.require_order(order_id).await?;

        let snapshot = self.load_snapshot().await?;
        let items = self.db.orders().list_items(order_id).await?;

        let mut product_prices: HashMap<i64, Money> = HashMap::new();
        let mut lines = Vec::with_capacity(items.len());
        for item in &items {
            let product_price = match item.product_id {
                Some(product_id) => match product_prices.get(&product_id) {
                    Some(price) => *price,
                    None => {
                        let price = self
                            .db
                            .products()
                            .get_by_id(product_id)
                            .await?
                            .map(|p| p.price())
                            .unwrap_or_default();
                        product_prices.insert(product_id, price);
                        price
                    }
                },
                None => Money::zero(),
            };

            let listed = listed_price(product_price, item.shirt_type_id, &snapshot);
            lines.push(item.cart_line(Some(listed)));
        }

        let breakdown = self.engine.quote_snapshot(&expand_cart(&lines), &snapshot);
        self.db.orders().update_total(order_id, breakdown.total).await?;

        info!(order_id = %order_id, items = items.len(), total = %breakdown.total, "Order repriced");
        Ok(breakdown)
    }

    async fn require_order(&self, order_id: &str) -> QuoteResult<Order> {
        validate_order_id(order_id)?;
        self.db
            .orders()
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| QuoteError::OrderNotFound(order_id.to_string()))
    }

    /// Resolves a request against the catalog into a storable record.
    async fn resolve_item(&self, request: &NewOrderItem) -> QuoteResult<NewOrderItemRecord> {
        let quantity = match request.quantity {
            Some(0) | None => 1,
            Some(q) => q,
        };
        validate_quantity(quantity)?;

        let size = validate_size(request.size.as_deref().unwrap_or(DEFAULT_SIZE))?;

        let identity = (request.product_id, request.shirt_type_id);
        let (category, shirt_type_id, cost_price_cents) = match identity {
            (Some(product_id), requested_type) => {
                let product = self
                    .db
                    .products()
                    .get_by_id(product_id)
                    .await?
                    .ok_or(CoreError::ProductNotFound(product_id))?;

                if !product.offers_size(Some(&size)) {
                    return Err(CoreError::InvalidSize {
                        size,
                        available: product.available_sizes,
                    }
                    .into());
                }

                let shirt_type_id = requested_type.or(product.shirt_type_id);
                if let Some(id) = requested_type {
                    self.require_shirt_type(id).await?;
                }
                (product.category, shirt_type_id, product.cost_price_cents)
            }
            (None, Some(shirt_type_id)) => {
                let shirt_type = self.require_shirt_type(shirt_type_id).await?;
                (ProductCategory::Tshirt, Some(shirt_type_id), shirt_type.cost_price_cents)
            }
            (None, None) => return Err(CoreError::MissingItemIdentity.into()),
        };

        Ok(NewOrderItemRecord {
            product_id: request.product_id,
            shirt_type_id,
            category,
            size,
            quantity,
            player_name: request.player_name.clone(),
            number: request.number.clone(),
            patch_images: request.patch_images.clone(),
            cost_price_cents,
        })
    }

    async fn require_shirt_type(&self, id: i64) -> QuoteResult<kitline_core::ShirtType> {
        Ok(self
            .db
            .shirt_types()
            .get_by_id(id)
            .await?
            .ok_or(CoreError::ShirtTypeNotFound(id))?)
    }
}

/// Listed unit price of a stored order item: the product price when positive,
/// else the shirt type price, else zero.
fn listed_price(product_price: Money, shirt_type_id: Option<i64>, snapshot: &PricingSnapshot) -> Money {
    if product_price.is_positive() {
        return product_price;
    }
    shirt_type_id
        .and_then(|id| snapshot.shirt_type_prices.get(&id).copied())
        .unwrap_or_default()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kitline_core::{LineItem, Pack, PackRequirement};
    use kitline_db::{DbConfig, DbError, NewProduct};

    struct Fixture {
        service: PricingService,
        retro: i64,
        jersey: i64,
        jacket: i64,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let retro = db.shirt_types().insert("Retro", 2000, 800).await.unwrap();
        db.packs()
            .insert(&Pack {
                id: 0,
                name: "4+ Retro".to_string(),
                price_cents: 1500,
                requirements: vec![PackRequirement {
                    category: ProductCategory::Tshirt,
                    shirt_type_id: Some(retro.id),
                    quantity: 4,
                }],
            })
            .await
            .unwrap();

        let jersey = db
            .products()
            .insert(&NewProduct {
                name: "Benfica 1961 Home".to_string(),
                price_cents: 0,
                cost_price_cents: 800,
                category: ProductCategory::Tshirt,
                shirt_type_id: Some(retro.id),
                available_sizes: vec!["S".to_string(), "M".to_string(), "L".to_string()],
            })
            .await
            .unwrap();

        let jacket = db
            .products()
            .insert(&NewProduct {
                name: "Training Jacket".to_string(),
                price_cents: 4500,
                cost_price_cents: 2000,
                category: ProductCategory::Other,
                shirt_type_id: None,
                available_sizes: Vec::new(),
            })
            .await
            .unwrap();

        db.pricing_config().upsert("patch_price", 200, None).await.unwrap();
        db.pricing_config().upsert("personalization_price", 300, None).await.unwrap();

        Fixture {
            service: PricingService::new(
                db,
                PricingOptions {
                    shoe_unit_price: Money::from_cents(5000),
                    surcharges_on_untyped_products: true,
                },
            ),
            retro: retro.id,
            jersey: jersey.id,
            jacket: jacket.id,
        }
    }

    fn by_shirt_type(shirt_type_id: i64, quantity: u32) -> NewOrderItem {
        NewOrderItem {
            shirt_type_id: Some(shirt_type_id),
            quantity: Some(quantity),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_load_snapshot() {
        let f = fixture().await;
        let snapshot = f.service.load_snapshot().await.unwrap();

        assert_eq!(snapshot.packs.len(), 1);
        assert_eq!(snapshot.shirt_type_prices[&f.retro], Money::from_cents(2000));
        assert_eq!(snapshot.surcharges, SurchargeRules::default());
    }

    #[tokio::test]
    async fn test_snapshot_falls_back_when_config_unreadable() {
        let f = fixture().await;
        f.service
            .database()
            .pricing_config()
            .upsert("patch_price", 999, None)
            .await
            .unwrap();
        sqlx::query("DROP TABLE pricing_config")
            .execute(f.service.database().pool())
            .await
            .unwrap();

        let snapshot = f.service.load_snapshot().await.unwrap();
        assert_eq!(snapshot.surcharges, SurchargeRules::default());
        assert_eq!(snapshot.packs.len(), 1);
    }

    #[tokio::test]
    async fn test_quote_cart_expands_quantities() {
        let f = fixture().await;
        let lines = vec![CartLine {
            item: LineItem {
                shirt_type_id: Some(f.retro),
                price: Some(Money::from_cents(2000)),
                ..Default::default()
            },
            quantity: Some(5),
        }];

        let breakdown = f.service.quote_cart(&lines).await.unwrap();
        assert_eq!(breakdown.total, Money::from_cents(7500));
        let group = breakdown.group(&format!("bundle:{}", f.retro)).unwrap();
        assert_eq!(group.count, 5);
        assert!(group.pack.is_some());
    }

    #[tokio::test]
    async fn test_quote_cart_rejects_huge_quantity() {
        let f = fixture().await;
        let lines = vec![CartLine {
            item: LineItem::default(),
            quantity: Some(1000),
        }];
        let err = f.service.quote_cart(&lines).await.unwrap_err();
        assert!(matches!(err, QuoteError::Validation(_)));
    }

    #[tokio::test]
    async fn test_failed_reprice_keeps_item_and_previous_total() {
        let f = fixture().await;
        let order = f.service.create_order().await.unwrap();
        f.service
            .add_order_item(&order.id, &by_shirt_type(f.retro, 3))
            .await
            .unwrap();

        sqlx::query("DROP TABLE pack_items")
            .execute(f.service.database().pool())
            .await
            .unwrap();

        let err = f
            .service
            .add_order_item(&order.id, &by_shirt_type(f.retro, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::Db(_)));

        let orders = f.service.database().orders();
        assert_eq!(orders.list_items(&order.id).await.unwrap().len(), 2);
        let stored = orders.get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.total_price(), Money::from_cents(6000));
    }

    #[tokio::test]
    async fn test_add_items_reprices_order() {
        let f = fixture().await;
        let order = f.service.create_order().await.unwrap();

        let first = f
            .service
            .add_order_item(&order.id, &by_shirt_type(f.retro, 3))
            .await
            .unwrap();
        assert_eq!(first.total, Money::from_cents(6000));
        assert_eq!(first.item.size, DEFAULT_SIZE);

        // Fourth unit of the shirt type crosses the pack threshold.
        let second = f
            .service
            .add_order_item(&order.id, &by_shirt_type(f.retro, 1))
            .await
            .unwrap();
        assert_eq!(second.total, Money::from_cents(6000));

        let stored = f.service.database().orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.total_price(), Money::from_cents(6000));
    }

    #[tokio::test]
    async fn test_product_item_inherits_shirt_type_and_price() {
        let f = fixture().await;
        let order = f.service.create_order().await.unwrap();

        let request = NewOrderItem {
            product_id: Some(f.jersey),
            size: Some("L".to_string()),
            player_name: Some("Coluna".to_string()),
            patch_images: vec!["taca.png".to_string()],
            ..Default::default()
        };
        let added = f.service.add_order_item(&order.id, &request).await.unwrap();

        assert_eq!(added.item.shirt_type_id, Some(f.retro));
        // Product price is zero, so the shirt type price applies, plus surcharges.
        assert_eq!(added.total, Money::from_cents(2000 + 200 + 300));
    }

    #[tokio::test]
    async fn test_invalid_size_rejected() {
        let f = fixture().await;
        let order = f.service.create_order().await.unwrap();

        let request = NewOrderItem {
            product_id: Some(f.jersey),
            size: Some("XXL".to_string()),
            ..Default::default()
        };
        let err = f.service.add_order_item(&order.id, &request).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid size 'XXL'. Available sizes: S, M, L");
    }

    #[tokio::test]
    async fn test_unknown_references_rejected() {
        let f = fixture().await;
        let order = f.service.create_order().await.unwrap();

        let err = f
            .service
            .add_order_item(&order.id, &NewOrderItem::default())
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::Core(CoreError::MissingItemIdentity)));

        let err = f
            .service
            .add_order_item(&order.id, &by_shirt_type(999, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::Core(CoreError::ShirtTypeNotFound(999))));

        let request = NewOrderItem {
            product_id: Some(999),
            ..Default::default()
        };
        let err = f.service.add_order_item(&order.id, &request).await.unwrap_err();
        assert!(matches!(err, QuoteError::Core(CoreError::ProductNotFound(999))));
    }

    #[tokio::test]
    async fn test_unknown_order_rejected() {
        let f = fixture().await;

        let err = f
            .service
            .reprice_order("550e8400-e29b-41d4-a716-446655440000")
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::OrderNotFound(_)));

        let err = f.service.reprice_order("not-a-uuid").await.unwrap_err();
        assert!(matches!(err, QuoteError::Validation(_)));
    }

    #[tokio::test]
    async fn test_remove_item_reprices_remaining() {
        let f = fixture().await;
        let order = f.service.create_order().await.unwrap();

        f.service
            .add_order_item(&order.id, &by_shirt_type(f.retro, 4))
            .await
            .unwrap();
        let jacket = f
            .service
            .add_order_item(
                &order.id,
                &NewOrderItem {
                    product_id: Some(f.jacket),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(jacket.total, Money::from_cents(4 * 1500 + 4500));

        let total = f.service.remove_order_item(&order.id, jacket.item.id).await.unwrap();
        assert_eq!(total, Money::from_cents(6000));

        let err = f
            .service
            .remove_order_item(&order.id, jacket.item.id)
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::Db(DbError::NotFound { .. })));
    }

    #[test]
    fn test_listed_price_fallbacks() {
        let snapshot = PricingSnapshot {
            shirt_type_prices: HashMap::from([(1, Money::from_cents(1900))]),
            ..Default::default()
        };
        assert_eq!(listed_price(Money::from_cents(2500), Some(1), &snapshot).cents(), 2500);
        assert_eq!(listed_price(Money::zero(), Some(1), &snapshot).cents(), 1900);
        assert_eq!(listed_price(Money::zero(), Some(2), &snapshot), Money::zero());
        assert_eq!(listed_price(Money::zero(), None, &snapshot), Money::zero());
    }
}
