//! # Cart
//!
//! The ordered list of line items and the three mutations the UI can make.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Mutations                                  │
//! │                                                                         │
//! │  add(descriptor)                                                       │
//! │    ├── id present ──► items[i].quantity += 1   (position unchanged)    │
//! │    └── id absent ───► items.push(item, quantity = 1)                   │
//! │                                                                         │
//! │  increment(id)                                                         │
//! │    ├── id present ──► items[i].quantity += 1                           │
//! │    └── id absent ───► Err(ProductNotInCart)                            │
//! │                                                                         │
//! │  decrement(id)                                                         │
//! │    ├── quantity > 1 ─► items[i].quantity -= 1                          │
//! │    ├── quantity == 1 ► items.remove(i)         (order preserved)       │
//! │    └── id absent ───► Err(ProductNotInCart)                            │
//! │                                                                         │
//! │  Every successful mutation bumps `revision` by one.                    │
//! │  A failed mutation leaves items AND revision untouched.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult};
use crate::types::{LineItem, ProductDescriptor};
use crate::validation::validate_descriptor;

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `id` (adding the same product increases quantity)
/// - Every quantity is >= 1
/// - Items stay in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<LineItem>,
    revision: u64,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Builds a cart from already validated items, at revision 0.
    ///
    /// Used for rehydration; see [`crate::snapshot::decode`].
    pub(crate) fn from_items(items: Vec<LineItem>) -> Self {
        Cart { items, revision: 0 }
    }

    /// Adds a product or increases its quantity if already present.
    ///
    /// ## Returns
    /// - `Ok(())` on success
    /// - `Err(CoreError::Validation)` if the descriptor is malformed
    /// - `Err(CoreError::QuantityOverflow)` if the quantity would overflow
    pub fn add(&mut self, descriptor: ProductDescriptor) -> CoreResult<()> {
        validate_descriptor(&descriptor)?;

        if let Some(item) = self.items.iter_mut().find(|i| i.id == descriptor.id) {
            item.quantity = bump(item)?;
        } else {
            self.items.push(LineItem::from_descriptor(descriptor));
        }

        self.revision += 1;
        Ok(())
    }

    /// Increases the quantity of an item already in the cart by one.
    pub fn increment(&mut self, id: &str) -> CoreResult<()> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| CoreError::ProductNotInCart(id.to_string()))?;

        item.quantity = bump(item)?;
        self.revision += 1;
        Ok(())
    }

    /// Decreases the quantity of an item by one, removing it at quantity 1.
    pub fn decrement(&mut self, id: &str) -> CoreResult<()> {
        let index = self
            .position(id)
            .ok_or_else(|| CoreError::ProductNotInCart(id.to_string()))?;

        // `position` just returned this index
        let item = &mut self.items[index];
        if item.quantity > 1 {
            item.quantity -= 1;
        } else {
            self.items.remove(index);
        }

        self.revision += 1;
        Ok(())
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Looks up an item by id.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities (what a cart badge shows).
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Number of successful mutations since this cart was created or rehydrated.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.id == id)
    }
}

fn bump(item: &LineItem) -> CoreResult<u32> {
    item.quantity
        .checked_add(1)
        .ok_or_else(|| CoreError::QuantityOverflow {
            id: item.id.clone(),
            max: u32::MAX,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str) -> ProductDescriptor {
        ProductDescriptor::new(id, format!("Product {}", id), format!("https://img/{}.png", id), 9.9)
    }

    fn ids(cart: &Cart) -> Vec<&str> {
        cart.items().iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_add_new_item_appends_with_quantity_one() {
        let mut cart = Cart::new();
        cart.add(product("a")).unwrap();
        cart.add(product("b")).unwrap();

        assert_eq!(ids(&cart), vec!["a", "b"]);
        assert_eq!(cart.get("b").unwrap().quantity, 1);
    }

    #[test]
    fn test_add_existing_item_increases_quantity_in_place() {
        let mut cart = Cart::new();
        cart.add(product("a")).unwrap();
        cart.add(product("b")).unwrap();
        cart.add(product("a")).unwrap();

        assert_eq!(ids(&cart), vec!["a", "b"]);
        assert_eq!(cart.get("a").unwrap().quantity, 2);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_increment_only_touches_target() {
        let mut cart = Cart::new();
        cart.add(product("a")).unwrap();
        cart.add(product("b")).unwrap();
        let before = cart.get("a").cloned();

        cart.increment("b").unwrap();

        assert_eq!(cart.get("b").unwrap().quantity, 2);
        assert_eq!(cart.get("a").cloned(), before);
    }

    #[test]
    fn test_decrement_above_one_keeps_item() {
        let mut cart = Cart::new();
        cart.add(product("a")).unwrap();
        cart.add(product("a")).unwrap();

        cart.decrement("a").unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("a").unwrap().quantity, 1);
    }

    #[test]
    fn test_decrement_at_one_removes_and_preserves_order() {
        let mut cart = Cart::new();
        for id in ["a", "b", "c"] {
            cart.add(product(id)).unwrap();
        }

        cart.decrement("b").unwrap();

        assert_eq!(ids(&cart), vec!["a", "c"]);
    }

    #[test]
    fn test_decrement_last_item_empties_cart() {
        let mut cart = Cart::new();
        cart.add(product("a")).unwrap();
        cart.decrement("a").unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_missing_id_is_reported_and_changes_nothing() {
        let mut cart = Cart::new();
        cart.add(product("a")).unwrap();
        let before = cart.clone();

        assert!(matches!(
            cart.increment("zzz"),
            Err(CoreError::ProductNotInCart(id)) if id == "zzz"
        ));
        assert!(matches!(
            cart.decrement("zzz"),
            Err(CoreError::ProductNotInCart(_))
        ));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_revision_counts_successful_mutations() {
        let mut cart = Cart::new();
        assert_eq!(cart.revision(), 0);

        cart.add(product("a")).unwrap();
        cart.increment("a").unwrap();
        cart.decrement("a").unwrap();
        let _ = cart.increment("missing");

        assert_eq!(cart.revision(), 3);
    }

    #[test]
    fn test_quantity_overflow() {
        let mut item = LineItem::from_descriptor(product("a"));
        item.quantity = u32::MAX;
        let mut cart = Cart::from_items(vec![item]);

        assert!(matches!(
            cart.increment("a"),
            Err(CoreError::QuantityOverflow { .. })
        ));
        assert!(cart.add(product("a")).is_err());
        assert_eq!(cart.get("a").unwrap().quantity, u32::MAX);
        assert_eq!(cart.revision(), 0);
    }

    #[test]
    fn test_add_rejects_blank_id() {
        let mut cart = Cart::new();
        let err = cart.add(ProductDescriptor::new("  ", "T", "u", 1.0)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_quantity() {
        let mut cart = Cart::new();
        cart.add(product("a")).unwrap();
        cart.add(product("a")).unwrap();
        cart.add(product("b")).unwrap();
        assert_eq!(cart.total_quantity(), 3);
    }
}
