//! # gomarket-core: Pure Cart Logic for GoMarketplace
//!
//! This crate holds the cart rules as pure functions with zero I/O
//! dependencies. Storage and the long-lived store live in sibling crates.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     GoMarketplace Cart Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI components                                │   │
//! │  │    Product list ──► Cart screen ──► Cart badge                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CartHandle                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 gomarket-cart (CartStore)                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ gomarket-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   cart    │  │ snapshot  │  │ validation│  │   │
//! │  │   │ LineItem  │  │   Cart    │  │  encode   │  │   rules   │  │   │
//! │  │   │Descriptor │  │ add/inc/  │  │  decode   │  │  checks   │  │   │
//! │  │   └───────────┘  │   dec     │  └───────────┘  └───────────┘  │   │
//! │  │                  └───────────┘                                 │   │
//! │  │   NO I/O • NO STORAGE • NO ASYNC • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                gomarket-storage (Key-Value Storage)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Line items and product descriptors
//! - [`cart`] - The ordered cart and its mutations
//! - [`snapshot`] - JSON snapshot format and the storage key
//! - [`validation`] - Input and snapshot validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use gomarket_core::{Cart, ProductDescriptor};
//!
//! let mut cart = Cart::new();
//! let shoes = ProductDescriptor::new("a", "Running shoes", "https://cdn/a.png", 199.9);
//!
//! cart.add(shoes.clone()).unwrap();
//! cart.add(shoes).unwrap();
//!
//! assert_eq!(cart.len(), 1);
//! assert_eq!(cart.get("a").unwrap().quantity, 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod snapshot;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use error::{CoreError, CoreResult, ValidationError};
pub use snapshot::{storage_key, DEFAULT_NAMESPACE};
pub use types::{LineItem, ProductDescriptor};
