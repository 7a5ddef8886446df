//! # Domain Types
//!
//! Line items and the descriptors they are created from.
//!
//! ## Wire Shape
//! Field names match the persisted JSON snapshot exactly:
//! ```json
//! { "id": "a", "title": "T", "image_url": "u", "price": 1, "quantity": 3 }
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// Product Descriptor
// =============================================================================

/// A product as shown in the catalog, before it is in the cart.
///
/// This is a line item without a quantity; `Cart::add` takes one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDescriptor {
    /// Product identifier, unique within a cart.
    pub id: String,

    /// Display title.
    pub title: String,

    /// Image shown next to the item.
    pub image_url: String,

    /// Unit price as displayed. The cart never does arithmetic on it.
    pub price: f64,
}

impl ProductDescriptor {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        ProductDescriptor {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A cart entry: a product plus the selected quantity.
///
/// ## Invariants
/// - `quantity >= 1` while the item is in a cart
/// - `id` is unique within a cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    pub quantity: u32,
}

impl LineItem {
    /// Creates a line item with quantity 1 from a descriptor.
    pub fn from_descriptor(descriptor: ProductDescriptor) -> Self {
        LineItem {
            id: descriptor.id,
            title: descriptor.title,
            image_url: descriptor.image_url,
            price: descriptor.price,
            quantity: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_descriptor_starts_at_one() {
        let item = LineItem::from_descriptor(ProductDescriptor::new("a", "T", "u", 1.0));
        assert_eq!(item.quantity, 1);
        assert_eq!(item.id, "a");
    }

    #[test]
    fn test_line_item_json_field_names() {
        let item = LineItem::from_descriptor(ProductDescriptor::new("a", "T", "u", 1.0));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["image_url"], "u");
        assert_eq!(json["quantity"], 1);
    }
}
