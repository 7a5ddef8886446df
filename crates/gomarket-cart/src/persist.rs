//! # Persistence Writer
//!
//! Background task that mirrors the cart into key-value storage.
//!
//! ## Write Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Persistence Writer Loop                              │
//! │                                                                         │
//! │  watch<Cart> changed ──┐                                                │
//! │                        ▼                                                │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  1. borrow_and_update() the CURRENT cart                        │   │
//! │  │  2. encode → JSON                                               │   │
//! │  │  3. storage.set(key, json)                                      │   │
//! │  │       ├── Ok  → status.persisted_revision = revision            │   │
//! │  │       └── Err → sleep(backoff), go to 1 with the newest cart    │   │
//! │  │                 backoff exhausted → status.failed_revision      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  shutdown ──► final write if the cart is ahead of storage, then exit   │
//! │               (also cuts a retry loop short after one more attempt)    │
//! │                                                                         │
//! │  One task does every write: writes can't reorder, and a burst of       │
//! │  mutations collapses into one write of the latest state.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use gomarket_core::{snapshot, Cart};
use gomarket_storage::KeyValueStorage;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tracing::{debug, error, info, warn};

// =============================================================================
// Retry Policy
// =============================================================================

/// How failed writes are retried.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the first retry.
    pub initial_backoff: Duration,

    /// Upper bound for a single delay.
    pub max_backoff: Duration,

    /// Give up on a write after this long. `None` retries forever.
    pub max_elapsed: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
            max_elapsed: Some(Duration::from_secs(30)),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self) -> ExponentialBackoff {
        let mut backoff = ExponentialBackoff {
            initial_interval: self.initial_backoff,
            max_interval: self.max_backoff,
            multiplier: 2.0,
            max_elapsed_time: self.max_elapsed,
            ..Default::default()
        };
        backoff.reset();
        backoff
    }
}

// =============================================================================
// Persistence Status
// =============================================================================

/// What the UI can show about durability.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PersistenceStatus {
    /// Latest cart revision known to be in storage.
    pub persisted_revision: u64,

    /// Failed attempts since the last successful write.
    pub consecutive_failures: u32,

    /// Message of the most recent failure, cleared by a successful write.
    pub last_error: Option<String>,

    /// Revision whose write gave up after exhausting retries.
    pub failed_revision: Option<u64>,
}

impl PersistenceStatus {
    /// True when the most recent write attempt succeeded.
    pub fn is_healthy(&self) -> bool {
        self.last_error.is_none()
    }
}

// =============================================================================
// Writer
// =============================================================================

pub(crate) struct PersistenceWriter {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    policy: RetryPolicy,
    cart_rx: watch::Receiver<Cart>,
    status_tx: watch::Sender<PersistenceStatus>,
    shutdown_rx: oneshot::Receiver<()>,
    /// Set once `shutdown_rx` has resolved; it must not be polled again.
    stopping: bool,
}

impl PersistenceWriter {
    pub(crate) fn new(
        storage: Arc<dyn KeyValueStorage>,
        key: String,
        policy: RetryPolicy,
        cart_rx: watch::Receiver<Cart>,
        status_tx: watch::Sender<PersistenceStatus>,
        shutdown_rx: oneshot::Receiver<()>,
    ) -> Self {
        PersistenceWriter {
            storage,
            key,
            policy,
            cart_rx,
            status_tx,
            shutdown_rx,
            stopping: false,
        }
    }

    /// Runs until shutdown is signalled (or the shutdown sender is dropped).
    pub(crate) async fn run(mut self) {
        info!(key = %self.key, "Persistence writer starting");

        while !self.stopping {
            tokio::select! {
                changed = self.cart_rx.changed() => {
                    if changed.is_err() {
                        debug!("Cart channel closed");
                        break;
                    }
                    self.persist_latest().await;
                }

                _ = &mut self.shutdown_rx => {
                    self.stopping = true;
                    if self.is_behind() {
                        debug!("Final write before shutdown");
                        self.persist_latest().await;
                    }
                }
            }
        }

        info!("Persistence writer stopped");
    }

    fn is_behind(&self) -> bool {
        self.cart_rx.borrow().revision() > self.status_tx.borrow().persisted_revision
    }

    /// Writes the newest cart, retrying with backoff.
    ///
    /// Every attempt re-reads the cart, so a retry never writes a state
    /// older than what the UI already shows. Once shutdown is requested the
    /// next failed attempt is the last one.
    async fn persist_latest(&mut self) {
        let mut backoff = self.policy.backoff();

        loop {
            let (revision, encoded) = {
                let cart = self.cart_rx.borrow_and_update();
                (cart.revision(), snapshot::encode(cart.items()))
            };

            let payload = match encoded {
                Ok(payload) => payload,
                Err(e) => {
                    error!(?e, revision, "Cart snapshot could not be encoded");
                    self.record_failure(revision, e.to_string(), true);
                    return;
                }
            };

            match self.storage.set(&self.key, &payload).await {
                Ok(()) => {
                    debug!(revision, bytes = payload.len(), "Cart persisted");
                    self.record_success(revision);
                    return;
                }
                Err(e) => match backoff.next_backoff() {
                    Some(delay) if !self.stopping => {
                        warn!(?e, revision, ?delay, "Cart write failed, retrying");
                        self.record_failure(revision, e.to_string(), false);

                        tokio::select! {
                            _ = tokio::time::sleep(delay) => {}
                            _ = &mut self.shutdown_rx => {
                                debug!(revision, "Shutdown during retry, one last attempt");
                                self.stopping = true;
                            }
                        }
                    }
                    _ => {
                        error!(?e, revision, stopping = self.stopping, "Cart write failed, giving up");
                        self.record_failure(revision, e.to_string(), true);
                        return;
                    }
                },
            }
        }
    }

    fn record_success(&self, revision: u64) {
        self.status_tx.send_modify(|status| {
            status.persisted_revision = status.persisted_revision.max(revision);
            status.consecutive_failures = 0;
            status.last_error = None;
            status.failed_revision = None;
        });
    }

    fn record_failure(&self, revision: u64, message: String, exhausted: bool) {
        self.status_tx.send_modify(|status| {
            status.consecutive_failures = status.consecutive_failures.saturating_add(1);
            status.last_error = Some(message);
            if exhausted {
                status.failed_revision = Some(revision);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_starts_at_initial_interval() {
        let policy = RetryPolicy {
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(40),
            max_elapsed: None,
        };
        let backoff = policy.backoff();
        assert_eq!(backoff.current_interval, Duration::from_millis(10));
        assert_eq!(backoff.max_elapsed_time, None);
    }

    #[test]
    fn test_status_health() {
        let mut status = PersistenceStatus::default();
        assert!(status.is_healthy());
        status.last_error = Some("disk full".into());
        assert!(!status.is_healthy());
    }
}
