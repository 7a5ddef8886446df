//! # Cart Store
//!
//! The one cart of an app session, and the handle consumers use to reach it.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Store Lifecycle                            │
//! │                                                                         │
//! │  CartStore::open(storage, config)                                      │
//! │       │                                                                 │
//! │       ├── storage.get("@<ns>:products")                                │
//! │       │     ├── Some(valid JSON) ──► Restored                          │
//! │       │     ├── None ─────────────► Empty                              │
//! │       │     └── error / bad JSON ──► Recovered (empty cart, warn!)     │
//! │       │                                                                 │
//! │       └── spawn PersistenceWriter                                      │
//! │                                                                         │
//! │  store.handle() ──► CartHandle (Clone) ──► UI components               │
//! │       products / subscribe / add_to_cart / increment / decrement       │
//! │       persistence / flush                                              │
//! │                                                                         │
//! │  store.shutdown().await                                                │
//! │       ├── handles become inactive (CartError::Inactive)                │
//! │       ├── final write of unpersisted state                             │
//! │       └── writer task joined                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Mutations run synchronously against the `watch` channel that holds the
//! cart. Nothing awaits storage on the mutation path; the writer task picks
//! up the change afterwards.

use gomarket_core::{snapshot, Cart, CoreResult, LineItem, ProductDescriptor};
use gomarket_storage::{KeyValueStorage, SqliteStorage, StorageConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::CartConfig;
use crate::error::{CartError, CartResult};
use crate::persist::{PersistenceStatus, PersistenceWriter};

// =============================================================================
// Rehydration
// =============================================================================

/// What `open` found in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RehydrationOutcome {
    /// A stored cart was loaded.
    Restored { items: usize },

    /// Nothing was stored under the key.
    Empty,

    /// The stored cart could not be read or decoded; started empty.
    Recovered { reason: String },
}

impl RehydrationOutcome {
    pub fn is_recovered(&self) -> bool {
        matches!(self, RehydrationOutcome::Recovered { .. })
    }
}

async fn rehydrate(storage: &dyn KeyValueStorage, key: &str) -> (Cart, RehydrationOutcome) {
    match storage.get(key).await {
        Ok(Some(text)) => match snapshot::decode(&text) {
            Ok(cart) => {
                let items = cart.len();
                info!(key = %key, items, "Cart restored from storage");
                (cart, RehydrationOutcome::Restored { items })
            }
            Err(e) => {
                warn!(?e, key = %key, "Stored cart is invalid, starting empty");
                (
                    Cart::new(),
                    RehydrationOutcome::Recovered {
                        reason: e.to_string(),
                    },
                )
            }
        },
        Ok(None) => {
            debug!(key = %key, "No stored cart");
            (Cart::new(), RehydrationOutcome::Empty)
        }
        Err(e) => {
            warn!(?e, key = %key, "Could not read stored cart, starting empty");
            (
                Cart::new(),
                RehydrationOutcome::Recovered {
                    reason: e.to_string(),
                },
            )
        }
    }
}

// =============================================================================
// Shared State
// =============================================================================

struct Shared {
    /// Source of truth for the cart.
    cart: watch::Sender<Cart>,

    /// Published by the writer task.
    status: watch::Receiver<PersistenceStatus>,

    active: AtomicBool,
}

// =============================================================================
// CartStore
// =============================================================================

/// Owner of the cart and its persistence writer.
///
/// Create one per app session, hand [`CartHandle`]s to consumers, and call
/// [`CartStore::shutdown`] on exit. Dropping the store without `shutdown`
/// still deactivates the handles and lets the writer make its last write
/// in the background.
pub struct CartStore {
    shared: Arc<Shared>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    writer: Option<JoinHandle<()>>,
    rehydration: RehydrationOutcome,
}

impl CartStore {
    /// Rehydrates the cart from `storage` and starts the writer task.
    ///
    /// Must be called inside a tokio runtime.
    pub async fn open(storage: Arc<dyn KeyValueStorage>, config: &CartConfig) -> CartResult<Self> {
        config.validate()?;

        let key = config.storage_key();
        let (cart, rehydration) = rehydrate(storage.as_ref(), &key).await;

        let (cart_tx, cart_rx) = watch::channel(cart);
        let (status_tx, status_rx) = watch::channel(PersistenceStatus::default());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let writer = PersistenceWriter::new(
            storage,
            key.clone(),
            config.retry_policy(),
            cart_rx,
            status_tx,
            shutdown_rx,
        );
        let writer = tokio::spawn(writer.run());

        info!(key = %key, ?rehydration, "Cart store opened");

        Ok(CartStore {
            shared: Arc::new(Shared {
                cart: cart_tx,
                status: status_rx,
                active: AtomicBool::new(true),
            }),
            shutdown_tx: Some(shutdown_tx),
            writer: Some(writer),
            rehydration,
        })
    }

    /// Opens the SQLite file named by the config and the store on top of it.
    pub async fn open_with_sqlite(config: &CartConfig) -> CartResult<Self> {
        let path = config.database_path()?;
        let storage = SqliteStorage::new(StorageConfig::new(path)).await?;
        Self::open(Arc::new(storage), config).await
    }

    /// Returns a handle for consumers.
    pub fn handle(&self) -> CartHandle {
        CartHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// What was found in storage at open.
    pub fn rehydration(&self) -> &RehydrationOutcome {
        &self.rehydration
    }

    /// Deactivates every handle, writes any unpersisted state and stops the
    /// writer.
    ///
    /// A writer that is retrying a failed write makes one more attempt and
    /// stops. Returns `Persistence` when the final state could not be
    /// written.
    pub async fn shutdown(mut self) -> CartResult<()> {
        info!("Shutting down cart store");
        self.shared.active.store(false, Ordering::SeqCst);

        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(writer) = self.writer.take() {
            writer
                .await
                .map_err(|e| CartError::Internal(format!("Persistence writer failed: {}", e)))?;
        }

        let revision = self.shared.cart.borrow().revision();
        let status = self.shared.status.borrow().clone();
        if status.persisted_revision < revision {
            return Err(CartError::Persistence(status.last_error.unwrap_or_else(|| {
                format!("revision {} was not written", revision)
            })));
        }

        info!(revision, "Cart store stopped");
        Ok(())
    }
}

impl Drop for CartStore {
    fn drop(&mut self) {
        // The writer sees the dropped shutdown sender and stops on its own.
        self.shared.active.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// CartHandle
// =============================================================================

/// Consumer-facing access to the cart.
///
/// ## Example
/// ```rust,ignore
/// let handle = store.handle();
/// handle.add_to_cart(ProductDescriptor::new("a", "Chair", "https://...", 1400.0))?;
/// handle.increment("a")?;
/// assert_eq!(handle.products()?[0].quantity, 2);
/// ```
#[derive(Clone)]
pub struct CartHandle {
    shared: Arc<Shared>,
}

impl CartHandle {
    fn ensure_active(&self) -> CartResult<()> {
        if self.shared.active.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CartError::Inactive)
        }
    }

    /// True until the store is shut down or dropped.
    pub fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::SeqCst)
    }

    /// Current line items, in insertion order.
    pub fn products(&self) -> CartResult<Vec<LineItem>> {
        self.ensure_active()?;
        Ok(self.shared.cart.borrow().items().to_vec())
    }

    /// Snapshot of the whole cart, revision included.
    pub fn cart(&self) -> CartResult<Cart> {
        self.ensure_active()?;
        Ok(self.shared.cart.borrow().clone())
    }

    /// Receiver notified after every successful mutation.
    pub fn subscribe(&self) -> CartResult<watch::Receiver<Cart>> {
        self.ensure_active()?;
        Ok(self.shared.cart.subscribe())
    }

    /// Receiver of the writer's status, for durability warnings in the UI.
    pub fn persistence(&self) -> CartResult<watch::Receiver<PersistenceStatus>> {
        self.ensure_active()?;
        Ok(self.shared.status.clone())
    }

    /// Adds a product, or one more of it when already in the cart.
    pub fn add_to_cart(&self, descriptor: ProductDescriptor) -> CartResult<()> {
        let id = descriptor.id.clone();
        self.mutate(|cart| cart.add(descriptor))?;
        debug!(id = %id, "Product added to cart");
        Ok(())
    }

    /// Raises the quantity of a product already in the cart.
    pub fn increment(&self, id: &str) -> CartResult<()> {
        self.mutate(|cart| cart.increment(id))?;
        debug!(id = %id, "Cart quantity incremented");
        Ok(())
    }

    /// Lowers the quantity of a product, removing it at zero.
    pub fn decrement(&self, id: &str) -> CartResult<()> {
        self.mutate(|cart| cart.decrement(id))?;
        debug!(id = %id, "Cart quantity decremented");
        Ok(())
    }

    /// Applies `op` and notifies subscribers only when it succeeded.
    ///
    /// The active flag is read while the cart is locked for writing. A
    /// mutation either lands before the writer's final read at shutdown or
    /// fails with `Inactive`.
    fn mutate<F>(&self, op: F) -> CartResult<()>
    where
        F: FnOnce(&mut Cart) -> CoreResult<()>,
    {
        let mut outcome = Ok(());
        self.shared.cart.send_if_modified(|cart| {
            if !self.shared.active.load(Ordering::SeqCst) {
                outcome = Err(CartError::Inactive);
                return false;
            }
            match op(cart) {
                Ok(()) => true,
                Err(e) => {
                    outcome = Err(CartError::from(e));
                    false
                }
            }
        });

        outcome.map_err(|e| {
            debug!(?e, "Cart mutation rejected");
            e
        })
    }

    /// Waits until the cart as of this call is in storage.
    ///
    /// Returns `Persistence` once the writer gave up on that state. With
    /// `max_elapsed_secs = 0` this waits for as long as storage keeps
    /// failing.
    pub async fn flush(&self) -> CartResult<()> {
        self.ensure_active()?;

        let target = self.shared.cart.borrow().revision();
        let mut status_rx = self.shared.status.clone();

        let status = status_rx
            .wait_for(|status| {
                status.persisted_revision >= target
                    || status.failed_revision.map_or(false, |failed| failed >= target)
            })
            .await
            .map_err(|_| CartError::Inactive)?
            .clone();

        if status.persisted_revision >= target {
            Ok(())
        } else {
            Err(CartError::Persistence(
                status.last_error.unwrap_or_else(|| "write abandoned".into()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomarket_storage::MemoryStorage;

    fn product(id: &str) -> ProductDescriptor {
        ProductDescriptor::new(id, "T", "u", 1.0)
    }

    #[tokio::test]
    async fn test_lookup_miss_changes_nothing() {
        let store = CartStore::open(Arc::new(MemoryStorage::new()), &CartConfig::default())
            .await
            .unwrap();
        let handle = store.handle();
        handle.add_to_cart(product("a")).unwrap();

        let mut rx = handle.subscribe().unwrap();
        let before = handle.cart().unwrap();

        let err = handle.increment("missing").unwrap_err();
        assert_eq!(err.code(), crate::ErrorCode::NotFound);
        assert!(handle.decrement("missing").is_err());

        assert_eq!(handle.cart().unwrap(), before);
        assert!(!rx.has_changed().unwrap());
        store.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_drop_deactivates_handles() {
        let store = CartStore::open(Arc::new(MemoryStorage::new()), &CartConfig::default())
            .await
            .unwrap();
        let handle = store.handle();
        assert!(handle.is_active());

        drop(store);
        assert!(!handle.is_active());
        assert!(matches!(handle.products(), Err(CartError::Inactive)));
    }

    #[tokio::test]
    async fn test_mutation_checks_active_under_the_cart_lock() {
        let store = CartStore::open(Arc::new(MemoryStorage::new()), &CartConfig::default())
            .await
            .unwrap();
        let handle = store.handle();
        handle.add_to_cart(product("a")).unwrap();
        let mut rx = handle.subscribe().unwrap();

        // what shutdown does first, before the writer's final read
        store.shared.active.store(false, Ordering::SeqCst);

        let before = store.shared.cart.borrow().clone();
        assert!(matches!(handle.increment("a"), Err(CartError::Inactive)));
        assert!(matches!(handle.add_to_cart(product("b")), Err(CartError::Inactive)));
        assert_eq!(*store.shared.cart.borrow(), before);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let mut config = CartConfig::default();
        config.storage.namespace = String::new();
        let result = CartStore::open(Arc::new(MemoryStorage::new()), &config).await;
        assert!(matches!(result, Err(CartError::InvalidConfig(_))));
    }
}
