//! # gomarket-storage: Key-Value Storage for GoMarketplace
//!
//! The durable side of the cart. Values are opaque strings addressed by
//! string keys; the cart snapshot is one such value.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        GoMarketplace Data Flow                          │
//! │                                                                         │
//! │  CartStore persistence writer                                          │
//! │       │  set("@GoMarketplace:products", "[...]")                       │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  gomarket-storage (THIS CRATE)                  │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────────┐   ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │KeyValueStorage │   │ SqliteStorage  │   │  Migrations  │  │   │
//! │  │   │   (trait)      │◄──│ (sqlite.rs)    │   │  (embedded)  │  │   │
//! │  │   │ get/set/remove │   │ MemoryStorage  │   │ 001_kv.sql   │  │   │
//! │  │   └────────────────┘   └────────────────┘   └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <app data dir>/gomarket.db  (table kv_store)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`kv`] - The `KeyValueStorage` trait
//! - [`sqlite`] - SQLite-backed storage and its configuration
//! - [`memory`] - In-process storage
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gomarket_storage::{KeyValueStorage, SqliteStorage, StorageConfig};
//!
//! let storage = SqliteStorage::new(StorageConfig::new("path/to/gomarket.db")).await?;
//! storage.set("@GoMarketplace:products", "[]").await?;
//! assert_eq!(storage.get("@GoMarketplace:products").await?.as_deref(), Some("[]"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod kv;
pub mod memory;
pub mod migrations;
pub mod sqlite;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StorageError, StorageResult};
pub use kv::KeyValueStorage;
pub use memory::MemoryStorage;
pub use sqlite::{SqliteStorage, StorageConfig};
