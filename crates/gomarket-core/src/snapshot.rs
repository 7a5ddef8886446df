//! # Cart Snapshot
//!
//! The persisted form of a cart: one JSON array stored under one key.
//!
//! ## Storage Layout
//! ```text
//! key:   "@GoMarketplace:products"
//! value: [{"id":"a","title":"T","image_url":"u","price":1.0,"quantity":3}, ...]
//! ```
//!
//! The snapshot is a mirror of the in-memory cart. Revision numbers are not
//! stored; a rehydrated cart starts again at revision 0.

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::types::LineItem;
use crate::validation::validate_items;

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "GoMarketplace";

/// Builds the storage key for a namespace: `@<namespace>:products`.
pub fn storage_key(namespace: &str) -> String {
    format!("@{}:products", namespace)
}

/// Serializes cart items to the snapshot format.
pub fn encode(items: &[LineItem]) -> CoreResult<String> {
    serde_json::to_string(items).map_err(|e| CoreError::InvalidSnapshot {
        reason: e.to_string(),
    })
}

/// Parses and validates a snapshot into a cart at revision 0.
///
/// ## Errors
/// `InvalidSnapshot` if the text is not a JSON array of line items, or if
/// any item fails validation (empty id, zero quantity, duplicate id, ...).
pub fn decode(text: &str) -> CoreResult<Cart> {
    let items: Vec<LineItem> =
        serde_json::from_str(text).map_err(|e| CoreError::InvalidSnapshot {
            reason: e.to_string(),
        })?;

    validate_items(&items).map_err(|e| CoreError::InvalidSnapshot {
        reason: e.to_string(),
    })?;

    Ok(Cart::from_items(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductDescriptor;

    #[test]
    fn test_default_storage_key() {
        assert_eq!(storage_key(DEFAULT_NAMESPACE), "@GoMarketplace:products");
    }

    #[test]
    fn test_decode_integer_price_and_quantity() {
        let cart =
            decode(r#"[{"id":"a","title":"T","image_url":"u","price":1,"quantity":3}]"#).unwrap();

        assert_eq!(cart.len(), 1);
        let item = cart.get("a").unwrap();
        assert_eq!(item.quantity, 3);
        assert_eq!(item.price, 1.0);
        assert_eq!(item.title, "T");
        assert_eq!(cart.revision(), 0);
    }

    #[test]
    fn test_rehydration_is_idempotent() {
        let mut cart = Cart::new();
        cart.add(ProductDescriptor::new("a", "Shoes", "https://img/a", 120.5)).unwrap();
        cart.add(ProductDescriptor::new("b", "Socks", "https://img/b", 9.0)).unwrap();
        cart.add(ProductDescriptor::new("a", "Shoes", "https://img/a", 120.5)).unwrap();

        let first = encode(cart.items()).unwrap();
        let rehydrated = decode(&first).unwrap();
        assert_eq!(rehydrated.items(), cart.items());

        let second = encode(rehydrated.items()).unwrap();
        assert_eq!(first, second);
        assert_eq!(decode(&second).unwrap().items(), cart.items());
    }

    #[test]
    fn test_decode_empty_array() {
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode("{not json"),
            Err(CoreError::InvalidSnapshot { .. })
        ));
        assert!(matches!(
            decode(r#"{"id":"a"}"#),
            Err(CoreError::InvalidSnapshot { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_items() {
        let zero = r#"[{"id":"a","title":"T","image_url":"u","price":1,"quantity":0}]"#;
        assert!(matches!(decode(zero), Err(CoreError::InvalidSnapshot { .. })));

        let negative = r#"[{"id":"a","title":"T","image_url":"u","price":1,"quantity":-2}]"#;
        assert!(decode(negative).is_err());

        let dup = r#"[
            {"id":"a","title":"T","image_url":"u","price":1,"quantity":1},
            {"id":"a","title":"T","image_url":"u","price":1,"quantity":1}
        ]"#;
        assert!(decode(dup).is_err());
    }
}
