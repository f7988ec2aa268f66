//! Shopping cart with stock reconciliation.
//!
//! # Invariants
//!
//! - At most one line per product, in insertion order.
//! - Every line has `quantity >= 1`; a line is never stored at zero.
//! - `quantity <= live stock` is checked at the moment of each mutation. It is
//!   not re-checked when the catalog later reports lower stock.
//!
//! Each successful mutation is written to the cart's durable slot before the
//! operation returns. A failed write is logged and the in-memory cart stays
//! authoritative for the session.
//!
//! # Example
//!
//! ```rust,ignore
//! let catalog = CatalogAccessor::new(&config.catalog).load().await;
//! let mut store = CartStore::load(FileSlotStore::new(&config.data_dir));
//!
//! let product = catalog.get(&ProductId::new("1")).unwrap();
//! match store.add_item(product, 2, &catalog) {
//!     Ok(line) => Notice::added(&line.product, 2),
//!     Err(e) => Notice::from_cart_error(&e),
//! };
//! ```

mod notice;
mod persist;

pub use notice::{Notice, NoticeLevel};
pub use persist::{DecodeError, decode_cart, encode_cart};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use techsphere_core::{Product, ProductId};

use crate::catalog::StockOracle;
use crate::storage::SlotStore;

/// Name of the durable slot holding the cart.
pub const CART_SLOT: &str = "techsphere_cart";

/// Subtotal above which the loyalty discount applies.
pub const DISCOUNT_THRESHOLD: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

/// Flat loyalty discount amount.
pub const DISCOUNT_AMOUNT: Decimal = Decimal::from_parts(300, 0, 0, false, 0);

/// Stock conditions that reject a cart mutation.
///
/// These are recoverable: the cart is left unchanged and the caller surfaces
/// the condition as a [`Notice`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The product has no units left.
    #[error("{name} is out of stock")]
    OutOfStock { product_id: ProductId, name: String },

    /// The cart would hold more units than are available.
    #[error("insufficient stock for {product_id}: {in_cart} in cart + {requested} requested > {available} available")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        in_cart: u32,
        available: u32,
    },

    /// A quantity change would exceed the available stock.
    #[error("stock limit reached for {product_id}: {requested} > {available} available")]
    StockLimitReached {
        product_id: ProductId,
        requested: i64,
        available: u32,
    },

    /// Requested quantity must be at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,
}

// =============================================================================
// Cart
// =============================================================================

/// A product in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product as it was when first added.
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    fn new(product: Product, quantity: u32) -> Self {
        Self {
            product,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Product ID of this line.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price.line_total(self.quantity)
    }
}

/// Ordered cart lines, keyed by product ID.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from restored lines, enforcing the line invariants.
    ///
    /// Lines with zero quantity are dropped and only the first line per
    /// product is kept. Returns the cart and the number of lines discarded.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> (Self, usize) {
        let mut cart = Self::new();
        let mut discarded = 0;
        for line in lines {
            if line.quantity == 0 || cart.contains(line.product_id()) {
                discarded += 1;
                continue;
            }
            cart.lines.push(line);
        }
        (cart, discarded)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Line for a product, if present.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id() == product_id)
    }

    fn get_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_id() == product_id)
    }

    /// Whether the cart has a line for the product.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Quantity of a product currently in the cart (zero if absent).
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.get(product_id).map_or(0, |l| l.quantity)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Flat discount applied once the subtotal crosses a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountRule {
    /// Subtotal must be strictly greater than this.
    pub threshold: Decimal,
    pub amount: Decimal,
}

impl Default for DiscountRule {
    fn default() -> Self {
        Self {
            threshold: DISCOUNT_THRESHOLD,
            amount: DISCOUNT_AMOUNT,
        }
    }
}

impl DiscountRule {
    /// Discount for a subtotal; never larger than the subtotal itself.
    #[must_use]
    pub fn discount_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal > self.threshold {
            self.amount.min(subtotal)
        } else {
            Decimal::ZERO
        }
    }
}

/// Derived cart totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub item_count: u64,
}

// =============================================================================
// CartStore
// =============================================================================

/// Owns the cart, enforces stock invariants and persists every mutation.
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Cart,
    storage: S,
    discount: DiscountRule,
}

impl<S: SlotStore> CartStore<S> {
    /// Restore the cart from `storage`.
    ///
    /// A missing or unreadable slot yields an empty cart.
    #[must_use]
    pub fn load(storage: S) -> Self {
        let cart = persist::load(&storage, CART_SLOT);
        Self {
            cart,
            storage,
            discount: DiscountRule::default(),
        }
    }

    /// Replace the discount rule.
    #[must_use]
    pub const fn with_discount(mut self, discount: DiscountRule) -> Self {
        self.discount = discount;
        self
    }

    /// Current cart contents.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.cart.get(product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Add `quantity` units of `product`.
    ///
    /// Live stock comes from `oracle`; a product the catalog does not know is
    /// checked against the stock recorded in the given snapshot. A new line is
    /// appended at the end, an existing line is incremented.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`] if `quantity` is zero
    /// - [`CartError::OutOfStock`] if live stock is zero
    /// - [`CartError::InsufficientStock`] if the cart would exceed live stock
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: u32,
        oracle: &impl StockOracle,
    ) -> Result<CartLine, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let available = oracle.live_stock(&product.id).unwrap_or(product.stock);
        if available == 0 {
            return Err(CartError::OutOfStock {
                product_id: product.id.clone(),
                name: product.name.clone(),
            });
        }

        let in_cart = self.cart.quantity_of(&product.id);
        let requested_total = u64::from(in_cart) + u64::from(quantity);
        if requested_total > u64::from(available) {
            return Err(CartError::InsufficientStock {
                product_id: product.id.clone(),
                requested: quantity,
                in_cart,
                available,
            });
        }

        let line = if let Some(line) = self.cart.get_mut(&product.id) {
            line.quantity += quantity;
            line.clone()
        } else {
            let line = CartLine::new(product.clone(), quantity);
            self.cart.lines.push(line.clone());
            line
        };

        info!(
            product_id = %product.id,
            quantity = line.quantity,
            added = quantity,
            "Added to cart"
        );
        self.persist();
        Ok(line)
    }

    /// Remove the line for `product_id`. Removing an absent product is a no-op.
    ///
    /// Returns the removed line, if there was one.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Option<CartLine> {
        let position = self
            .cart
            .lines
            .iter()
            .position(|l| l.product_id() == product_id);
        let removed = position.map(|idx| self.cart.lines.remove(idx));

        if removed.is_some() {
            info!(product_id = %product_id, "Removed from cart");
        } else {
            debug!(product_id = %product_id, "Remove requested for product not in cart");
        }
        self.persist();
        removed
    }

    /// Change a line's quantity by `delta`.
    ///
    /// The resulting quantity is floored at 1; use [`CartStore::remove_item`]
    /// to delete a line. Returns `Ok(None)` without changes when the line is
    /// absent or the catalog does not know the product.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::StockLimitReached`] if the new quantity would
    /// exceed live stock. The line is left unchanged.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        delta: i64,
        oracle: &impl StockOracle,
    ) -> Result<Option<CartLine>, CartError> {
        let Some(available) = oracle.live_stock(product_id) else {
            debug!(product_id = %product_id, "Quantity update for product missing from catalog");
            return Ok(None);
        };
        let Some(line) = self.cart.get_mut(product_id) else {
            debug!(product_id = %product_id, "Quantity update for product not in cart");
            return Ok(None);
        };

        let requested = i64::from(line.quantity).saturating_add(delta);
        if requested > i64::from(available) {
            return Err(CartError::StockLimitReached {
                product_id: product_id.clone(),
                requested,
                available,
            });
        }

        // requested <= available, so it fits in u32 once floored at 1
        line.quantity = u32::try_from(requested.max(1)).unwrap_or(available);
        let line = line.clone();

        debug!(product_id = %product_id, quantity = line.quantity, delta, "Updated cart quantity");
        self.persist();
        Ok(Some(line))
    }

    /// Subtotal, discount and total. Pure.
    #[must_use]
    pub fn totals(&self) -> Totals {
        let subtotal = self.cart.subtotal();
        let discount = self.discount.discount_for(subtotal);
        Totals {
            subtotal,
            discount,
            total: subtotal - discount,
            item_count: self.cart.item_count(),
        }
    }

    /// Total units in the cart. Pure.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Empty the cart and delete its durable slot.
    pub fn clear(&mut self) {
        self.cart = Cart::new();
        persist::discard(&self.storage, CART_SLOT);
        info!("Cart cleared");
    }

    fn persist(&self) {
        persist::save(&self.storage, CART_SLOT, &self.cart);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use techsphere_core::{Category, Price};

    use super::*;
    use crate::catalog::Catalog;
    use crate::storage::{MemorySlotStore, StorageError};

    pub fn product(id: &str, price: u32, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            handle: None,
            name: format!("Product {id}"),
            category: Category::Gaming,
            price: Price::from_units(price),
            old_price: None,
            rating: 4.0,
            reviews: 10,
            image: String::new(),
            badge: None,
            description: String::new(),
            stock,
        }
    }

    fn store() -> CartStore<MemorySlotStore> {
        CartStore::load(MemorySlotStore::new())
    }

    /// Slot store whose writes always fail.
    struct FullDisk;

    impl SlotStore for FullDisk {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn write(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                source: std::io::Error::other("quota exceeded"),
            })
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_add_new_line() {
        let p = product("1", 100, 5);
        let catalog = Catalog::from_products(vec![p.clone()]);
        let mut store = store();

        let line = store.add_item(&p, 3, &catalog).unwrap();
        assert_eq!(line.quantity, 3);
        assert_eq!(store.cart().quantity_of(&p.id), 3);
        assert_eq!(store.item_count(), 3);
    }

    #[test]
    fn test_add_beyond_stock_is_rejected_and_cart_unchanged() {
        let p = product("1", 100, 5);
        let catalog = Catalog::from_products(vec![p.clone()]);
        let mut store = store();

        store.add_item(&p, 3, &catalog).unwrap();
        let err = store.add_item(&p, 3, &catalog).unwrap_err();

        assert_eq!(
            err,
            CartError::InsufficientStock {
                product_id: p.id.clone(),
                requested: 3,
                in_cart: 3,
                available: 5,
            }
        );
        assert_eq!(store.cart().quantity_of(&p.id), 3);
    }

    #[test]
    fn test_add_up_to_exact_stock_succeeds() {
        let p = product("1", 100, 5);
        let catalog = Catalog::from_products(vec![p.clone()]);
        let mut store = store();

        store.add_item(&p, 2, &catalog).unwrap();
        let line = store.add_item(&p, 3, &catalog).unwrap();
        assert_eq!(line.quantity, 5);
        assert_eq!(store.cart().len(), 1);
    }

    #[test]
    fn test_add_out_of_stock() {
        let p = product("3", 4299, 0);
        let catalog = Catalog::from_products(vec![p.clone()]);
        let mut store = store();

        let err = store.add_item(&p, 1, &catalog).unwrap_err();
        assert!(matches!(err, CartError::OutOfStock { .. }));
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_add_uses_live_stock_over_snapshot() {
        let snapshot = product("1", 100, 10);
        let live = product("1", 100, 2);
        let catalog = Catalog::from_products(vec![live]);
        let mut store = store();

        let err = store.add_item(&snapshot, 3, &catalog).unwrap_err();
        assert!(matches!(err, CartError::InsufficientStock { available: 2, .. }));
    }

    #[test]
    fn test_add_unknown_product_uses_snapshot_stock() {
        let p = product("99", 100, 2);
        let catalog = Catalog::from_products(vec![]);
        let mut store = store();

        assert!(store.add_item(&p, 2, &catalog).is_ok());
        assert!(store.add_item(&p, 1, &catalog).is_err());
    }

    #[test]
    fn test_add_zero_quantity_is_invalid() {
        let p = product("1", 100, 5);
        let catalog = Catalog::from_products(vec![p.clone()]);
        let mut store = store();
        assert_eq!(
            store.add_item(&p, 0, &catalog).unwrap_err(),
            CartError::InvalidQuantity
        );
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let a = product("a", 1, 9);
        let b = product("b", 1, 9);
        let c = product("c", 1, 9);
        let catalog = Catalog::from_products(vec![a.clone(), b.clone(), c.clone()]);
        let mut store = store();

        store.add_item(&b, 1, &catalog).unwrap();
        store.add_item(&a, 1, &catalog).unwrap();
        store.add_item(&c, 1, &catalog).unwrap();
        store.add_item(&b, 1, &catalog).unwrap();

        let ids: Vec<&str> = store
            .cart()
            .lines()
            .iter()
            .map(|l| l.product_id().as_str())
            .collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn test_remove_item() {
        let p = product("1", 100, 5);
        let catalog = Catalog::from_products(vec![p.clone()]);
        let mut store = store();
        store.add_item(&p, 1, &catalog).unwrap();

        let removed = store.remove_item(&p.id).unwrap();
        assert_eq!(removed.quantity, 1);
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let p = product("1", 100, 5);
        let catalog = Catalog::from_products(vec![p.clone()]);
        let mut store = store();
        store.add_item(&p, 2, &catalog).unwrap();
        let before = store.cart().clone();

        assert!(store.remove_item(&ProductId::new("nope")).is_none());
        assert_eq!(store.cart(), &before);
    }

    #[test]
    fn test_update_quantity_floors_at_one() {
        let p = product("1", 100, 5);
        let catalog = Catalog::from_products(vec![p.clone()]);
        let mut store = store();
        store.add_item(&p, 3, &catalog).unwrap();

        let line = store.update_quantity(&p.id, -1000, &catalog).unwrap().unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(store.cart().quantity_of(&p.id), 1);
    }

    #[test]
    fn test_update_quantity_beyond_stock_is_rejected() {
        let p = product("1", 100, 5);
        let catalog = Catalog::from_products(vec![p.clone()]);
        let mut store = store();
        store.add_item(&p, 3, &catalog).unwrap();

        let err = store.update_quantity(&p.id, 1000, &catalog).unwrap_err();
        assert!(matches!(
            err,
            CartError::StockLimitReached { requested: 1003, available: 5, .. }
        ));
        assert_eq!(store.cart().quantity_of(&p.id), 3);
    }

    #[test]
    fn test_update_quantity_within_stock() {
        let p = product("1", 100, 5);
        let catalog = Catalog::from_products(vec![p.clone()]);
        let mut store = store();
        store.add_item(&p, 3, &catalog).unwrap();

        assert_eq!(
            store.update_quantity(&p.id, 2, &catalog).unwrap().unwrap().quantity,
            5
        );
        assert_eq!(
            store.update_quantity(&p.id, -1, &catalog).unwrap().unwrap().quantity,
            4
        );
    }

    #[test]
    fn test_update_quantity_absent_line_is_noop() {
        let p = product("1", 100, 5);
        let catalog = Catalog::from_products(vec![p.clone()]);
        let mut store = store();
        assert_eq!(store.update_quantity(&p.id, 1, &catalog).unwrap(), None);
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_update_quantity_product_missing_from_catalog_is_noop() {
        let p = product("1", 100, 5);
        let catalog = Catalog::from_products(vec![p.clone()]);
        let mut store = store();
        store.add_item(&p, 2, &catalog).unwrap();

        let empty = Catalog::from_products(vec![]);
        assert_eq!(store.update_quantity(&p.id, 1, &empty).unwrap(), None);
        assert_eq!(store.line(&p.id).map(|l| l.quantity), Some(2));
    }

    #[test]
    fn test_totals_discount_threshold() {
        let mut store = store();
        let above = product("a", 5200, 1);
        let catalog = Catalog::from_products(vec![above.clone()]);
        store.add_item(&above, 1, &catalog).unwrap();

        let totals = store.totals();
        assert_eq!(totals.subtotal, Decimal::from(5200));
        assert_eq!(totals.discount, Decimal::from(300));
        assert_eq!(totals.total, Decimal::from(4900));

        let mut store = self::store();
        let below = product("b", 4800, 1);
        let catalog = Catalog::from_products(vec![below.clone()]);
        store.add_item(&below, 1, &catalog).unwrap();

        let totals = store.totals();
        assert_eq!(totals.discount, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::from(4800));
    }

    #[test]
    fn test_discount_requires_strictly_greater_subtotal() {
        let rule = DiscountRule::default();
        assert_eq!(rule.discount_for(Decimal::from(5000)), Decimal::ZERO);
        assert_eq!(rule.discount_for(Decimal::new(500_001, 2)), Decimal::from(300));
    }

    #[test]
    fn test_discount_never_exceeds_subtotal() {
        let rule = DiscountRule {
            threshold: Decimal::ZERO,
            amount: Decimal::from(300),
        };
        assert_eq!(rule.discount_for(Decimal::from(100)), Decimal::from(100));
    }

    #[test]
    fn test_custom_discount_rule() {
        let p = product("1", 1200, 5);
        let catalog = Catalog::from_products(vec![p.clone()]);
        let mut store = store().with_discount(DiscountRule {
            threshold: Decimal::from(1000),
            amount: Decimal::from(50),
        });
        store.add_item(&p, 1, &catalog).unwrap();

        let totals = store.totals();
        assert_eq!(totals.discount, Decimal::from(50));
        assert_eq!(totals.total, Decimal::from(1150));
    }

    #[test]
    fn test_totals_are_idempotent() {
        let a = product("a", 1999, 4);
        let b = product("b", 350, 10);
        let catalog = Catalog::from_products(vec![a.clone(), b.clone()]);
        let mut store = store();
        store.add_item(&a, 2, &catalog).unwrap();
        store.add_item(&b, 3, &catalog).unwrap();

        let first = store.totals();
        let second = store.totals();
        assert_eq!(first, second);
        assert_eq!(first.subtotal, Decimal::from(1999 * 2 + 350 * 3));
        assert_eq!(first.item_count, 5);
    }

    #[test]
    fn test_every_mutation_persists() {
        let slots = MemorySlotStore::new();
        let p = product("1", 100, 5);
        let catalog = Catalog::from_products(vec![p.clone()]);
        let mut store = CartStore::load(slots.clone());

        store.add_item(&p, 2, &catalog).unwrap();
        let restored = CartStore::load(slots.clone());
        assert_eq!(restored.cart().quantity_of(&p.id), 2);

        store.update_quantity(&p.id, 1, &catalog).unwrap();
        let restored = CartStore::load(slots.clone());
        assert_eq!(restored.cart().quantity_of(&p.id), 3);

        store.remove_item(&p.id);
        let restored = CartStore::load(slots);
        assert!(restored.cart().is_empty());
    }

    #[test]
    fn test_rejected_mutation_does_not_persist() {
        let slots = MemorySlotStore::new();
        let p = product("1", 100, 5);
        let catalog = Catalog::from_products(vec![p.clone()]);
        let mut store = CartStore::load(slots.clone());

        assert!(store.add_item(&p, 6, &catalog).is_err());
        assert!(slots.read(CART_SLOT).unwrap().is_none());
    }

    #[test]
    fn test_persistence_failure_keeps_memory_authoritative() {
        let p = product("1", 100, 5);
        let catalog = Catalog::from_products(vec![p.clone()]);
        let mut store = CartStore::load(FullDisk);

        let line = store.add_item(&p, 2, &catalog).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(store.cart().quantity_of(&p.id), 2);
    }

    #[test]
    fn test_clear_removes_slot() {
        let slots = MemorySlotStore::new();
        let p = product("1", 100, 5);
        let catalog = Catalog::from_products(vec![p.clone()]);
        let mut store = CartStore::load(slots.clone());
        store.add_item(&p, 1, &catalog).unwrap();

        store.clear();
        assert!(store.cart().is_empty());
        assert!(slots.read(CART_SLOT).unwrap().is_none());
    }

    #[test]
    fn test_from_lines_enforces_invariants() {
        let a = CartLine::new(product("a", 1, 5), 2);
        let zero = CartLine::new(product("z", 1, 5), 0);
        let dup = CartLine::new(product("a", 1, 5), 4);

        let (cart, discarded) = Cart::from_lines(vec![a, zero, dup]);
        assert_eq!(discarded, 2);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&ProductId::new("a")), 2);
    }
}
