//! # gomarket-cart: Cart Store for GoMarketplace
//!
//! Holds the session's cart in memory and mirrors it into key-value storage.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Store Data Flow                             │
//! │                                                                         │
//! │  UI ── handle.add_to_cart(p) ──► watch<Cart> ──► subscribers re-render │
//! │                                       │                                 │
//! │                                       │ changed()                       │
//! │                                       ▼                                 │
//! │                          PersistenceWriter (tokio task)                 │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │                 storage.set("@GoMarketplace:products", json)            │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │                        watch<PersistenceStatus> ──► UI warnings         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - `CartStore` lifecycle and the `CartHandle` consumers use
//! - [`persist`] - Background writer, retry policy and status
//! - [`config`] - Layered configuration (defaults, TOML, environment)
//! - [`error`] - Error type and UI-facing error codes
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use gomarket_cart::{CartConfig, CartStore};
//! use gomarket_core::ProductDescriptor;
//!
//! let config = CartConfig::load_or_default(None);
//! let store = CartStore::open_with_sqlite(&config).await?;
//!
//! let cart = store.handle();
//! cart.add_to_cart(ProductDescriptor::new("1234", "Cadeira", "https://...", 1400.0))?;
//! cart.flush().await?;
//!
//! store.shutdown().await?;
//! ```

pub mod config;
pub mod error;
pub mod persist;
pub mod store;

pub use config::{CartConfig, PersistenceSettings, StorageSettings};
pub use error::{CartError, CartResult, ErrorCode, ErrorReport};
pub use persist::{PersistenceStatus, RetryPolicy};
pub use store::{CartHandle, CartStore, RehydrationOutcome};
