//! # Key-Value Storage Trait
//!
//! The boundary between the cart and whatever persists it.
//!
//! ```text
//! get(key)         -> Option<String>   None when the key was never set
//! set(key, value)  -> ()               overwrites
//! remove(key)      -> ()               no-op when absent
//! ```

use async_trait::async_trait;

use crate::error::StorageResult;

/// Durable storage addressed by string keys.
///
/// Values are opaque to the storage; callers own the format.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Reads the value stored under `key`.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Deletes `key`.
    async fn remove(&self, key: &str) -> StorageResult<()>;
}
