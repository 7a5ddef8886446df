//! # Error Types
//!
//! Domain-specific error types for gomarket-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  gomarket-core errors (this file)                                      │
//! │  ├── CoreError        - Cart rule violations, bad snapshots            │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  gomarket-storage errors                                               │
//! │  └── StorageError     - Key-value storage failures                     │
//! │                                                                         │
//! │  gomarket-cart errors                                                  │
//! │  └── CartError        - What UI consumers see (with ErrorCode)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CartError → UI                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart logic errors.
///
/// A failed operation never leaves the cart partially modified.
#[derive(Debug, Error)]
pub enum CoreError {
    /// `increment`/`decrement` targeted an id that is not in the cart.
    #[error("Product not in cart: {0}")]
    ProductNotInCart(String),

    /// Quantity would no longer fit in a `u32`.
    #[error("Quantity for {id} cannot exceed {max}")]
    QuantityOverflow { id: String, max: u32 },

    /// Persisted snapshot could not be parsed or failed validation.
    #[error("Invalid cart snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be a finite, non-negative number.
    #[error("{field} must be a finite, non-negative number")]
    InvalidNumber { field: String },

    /// Duplicate value (e.g., two snapshot entries with the same id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ProductNotInCart("sku-1".to_string());
        assert_eq!(err.to_string(), "Product not in cart: sku-1");

        let err = CoreError::QuantityOverflow {
            id: "a".to_string(),
            max: u32::MAX,
        };
        assert_eq!(err.to_string(), "Quantity for a cannot exceed 4294967295");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "id".to_string(),
        };
        assert_eq!(err.to_string(), "id is required");

        let err = ValidationError::Duplicate {
            field: "id".to_string(),
            value: "a".to_string(),
        };
        assert_eq!(err.to_string(), "id 'a' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
