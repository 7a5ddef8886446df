//! # Validation Module
//!
//! Input validation for cart operations and rehydrated snapshots.
//!
//! ## Validation Points
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Points                                  │
//! │                                                                         │
//! │  Cart::add(descriptor)                                                 │
//! │  └── validate_descriptor: id present, price finite and >= 0            │
//! │                                                                         │
//! │  Rehydration (snapshot::decode)                                        │
//! │  └── validate_items: every descriptor valid, quantity >= 1,            │
//! │                      ids unique                                        │
//! │                                                                         │
//! │  A single bad entry rejects the whole snapshot.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use gomarket_core::validation::validate_descriptor;
//! use gomarket_core::ProductDescriptor;
//!
//! assert!(validate_descriptor(&ProductDescriptor::new("a", "T", "u", 1.0)).is_ok());
//! assert!(validate_descriptor(&ProductDescriptor::new("", "T", "u", 1.0)).is_err());
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::{LineItem, ProductDescriptor};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a product id.
///
/// ## Rules
/// - Must not be empty or whitespace only
pub fn validate_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    Ok(())
}

/// Validates a displayed price.
///
/// ## Rules
/// - Must be finite (no NaN / infinity, which JSON cannot carry anyway)
/// - Must be non-negative; zero is allowed (free items)
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(ValidationError::InvalidNumber {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stored quantity.
pub fn validate_quantity(quantity: u32) -> ValidationResult<()> {
    if quantity == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates a descriptor passed to `Cart::add`.
pub fn validate_descriptor(descriptor: &ProductDescriptor) -> ValidationResult<()> {
    validate_id(&descriptor.id)?;
    validate_price(descriptor.price)?;
    Ok(())
}

/// Validates a full list of line items, e.g. a rehydrated snapshot.
pub fn validate_items(items: &[LineItem]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(items.len());

    for item in items {
        validate_id(&item.id)?;
        validate_price(item.price)?;
        validate_quantity(item.quantity)?;

        if !seen.insert(item.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: item.id.clone(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, quantity: u32) -> LineItem {
        LineItem {
            id: id.to_string(),
            title: "T".to_string(),
            image_url: "u".to_string(),
            price: 1.0,
            quantity,
        }
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("a").is_ok());
        assert!(validate_id("").is_err());
        assert!(validate_id("   ").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(19.99).is_ok());
        assert!(validate_price(-0.01).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_items_accepts_well_formed_list() {
        assert!(validate_items(&[item("a", 1), item("b", 3)]).is_ok());
        assert!(validate_items(&[]).is_ok());
    }

    #[test]
    fn test_validate_items_rejects_zero_quantity() {
        assert_eq!(
            validate_items(&[item("a", 0)]),
            Err(ValidationError::MustBePositive {
                field: "quantity".to_string()
            })
        );
    }

    #[test]
    fn test_validate_items_rejects_duplicate_ids() {
        assert_eq!(
            validate_items(&[item("a", 1), item("a", 2)]),
            Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: "a".to_string()
            })
        );
    }
}
