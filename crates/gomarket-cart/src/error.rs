//! # Cart Error Type
//!
//! Unified error type for cart store operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Cart Store                         │
//! │                                                                         │
//! │  UI component                  CartHandle                               │
//! │  ────────────                  ──────────                               │
//! │                                                                         │
//! │  handle.increment("a")                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Store inactive? ────── CartError::Inactive ─────────────────┐  │  │
//! │  │         │                                                    │  │  │
//! │  │         ▼                                                    ▼  │  │
//! │  │  Cart rule broken? ──── CartError::Core(ProductNotInCart) ─► code()│  │
//! │  │         │                                                       │  │
//! │  │         ▼                                                       │  │
//! │  │  Success (write happens later on the writer task)               │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Write failures never surface here; they land in PersistenceStatus     │
//! │  and in `flush()`.                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use gomarket_core::CoreError;
use gomarket_storage::StorageError;
use serde::Serialize;
use thiserror::Error;

/// Errors returned by the cart store.
#[derive(Debug, Error)]
pub enum CartError {
    /// The store was shut down (or never opened) but a consumer used it.
    #[error("Cart store is not active")]
    Inactive,

    /// Cart rule violation or bad snapshot.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Direct storage failure (opening the database).
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be written after all retries.
    #[error("Cart could not be persisted: {0}")]
    Persistence(String),

    /// Invalid configuration value.
    #[error("Invalid cart configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// Internal error (writer task panicked, ...).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for cart store operations.
pub type CartResult<T> = Result<T, CartError>;

impl From<std::io::Error> for CartError {
    fn from(err: std::io::Error) -> Self {
        CartError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for CartError {
    fn from(err: toml::de::Error) -> Self {
        CartError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for CartError {
    fn from(err: toml::ser::Error) -> Self {
        CartError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// UI-facing report
// =============================================================================

/// Machine-readable error codes for the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Item not in cart
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Store used outside its lifetime
    Inactive,

    /// Cart state could not be written
    PersistenceError,

    /// Configuration problem
    ConfigError,

    /// Any other cart rule violation
    CartError,

    /// Internal error
    Internal,
}

/// What a UI receives when a cart call fails.
///
/// ```json
/// { "code": "NOT_FOUND", "message": "Product not in cart: a" }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl CartError {
    /// Classifies the error for the UI.
    pub fn code(&self) -> ErrorCode {
        match self {
            CartError::Inactive => ErrorCode::Inactive,
            CartError::Core(CoreError::ProductNotInCart(_)) => ErrorCode::NotFound,
            CartError::Core(CoreError::Validation(_)) => ErrorCode::ValidationError,
            CartError::Core(_) => ErrorCode::CartError,
            CartError::Storage(_) | CartError::Persistence(_) => ErrorCode::PersistenceError,
            CartError::InvalidConfig(_)
            | CartError::ConfigLoadFailed(_)
            | CartError::ConfigSaveFailed(_) => ErrorCode::ConfigError,
            CartError::Internal(_) => ErrorCode::Internal,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomarket_core::ValidationError;

    #[test]
    fn test_error_codes() {
        assert_eq!(CartError::Inactive.code(), ErrorCode::Inactive);
        assert_eq!(
            CartError::from(CoreError::ProductNotInCart("a".into())).code(),
            ErrorCode::NotFound
        );
        assert_eq!(
            CartError::from(CoreError::Validation(ValidationError::Required {
                field: "id".into()
            }))
            .code(),
            ErrorCode::ValidationError
        );
        assert_eq!(
            CartError::Persistence("disk full".into()).code(),
            ErrorCode::PersistenceError
        );
    }

    #[test]
    fn test_report_message_is_transparent_for_core_errors() {
        let report = CartError::from(CoreError::ProductNotInCart("a".into())).report();
        assert_eq!(report.message, "Product not in cart: a");
        assert_eq!(report.code, ErrorCode::NotFound);
    }
}
