//! Registry of live connections keyed by client identifier.
//!
//! Each registered connection is represented by the sending half of its
//! bounded outbound queue. Enqueueing is non-blocking (`try_send`), so a slow
//! or dead peer costs the fan-out one failed attempt instead of a stall.
//!
//! Registering an id that is already present replaces the previous entry
//! (last connect wins). The replaced connection keeps running but no longer
//! receives broadcasts.

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Outbound handle to one peer. The matching receiver is drained into the
/// peer's socket by the transport layer.
pub type Outbound = mpsc::Sender<String>;

/// Failure to enqueue a message for one recipient.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// The peer's writer has gone away.
    #[error("connection {0} is closed")]
    Closed(String),

    /// The peer's outbound queue is full.
    #[error("outbound queue full for connection {0}")]
    Backlogged(String),
}

/// Enqueue `text` on `channel` without waiting.
pub fn enqueue(client_id: &str, channel: &Outbound, text: String) -> Result<(), DeliveryError> {
    channel.try_send(text).map_err(|e| match e {
        mpsc::error::TrySendError::Full(_) => DeliveryError::Backlogged(client_id.to_string()),
        mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed(client_id.to_string()),
    })
}

/// Outcome of one fan-out pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FanOut {
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Default)]
pub struct ConnectionRegistry {
    connections: DashMap<String, Outbound>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `client_id`.
    ///
    /// Returns `true` if an existing connection was displaced.
    pub fn register(&self, client_id: &str, channel: Outbound) -> bool {
        let replaced = self
            .connections
            .insert(client_id.to_string(), channel)
            .is_some();
        if replaced {
            warn!(%client_id, "client id reconnected, previous connection replaced");
        } else {
            debug!(%client_id, "registered connection");
        }
        replaced
    }

    /// Remove the entry for `client_id` if present.
    ///
    /// Returns `true` if an entry was removed.
    pub fn deregister(&self, client_id: &str) -> bool {
        let removed = self.connections.remove(client_id).is_some();
        if removed {
            debug!(%client_id, "deregistered connection");
        }
        removed
    }

    /// Remove the entry for `client_id` only if it still holds `channel`.
    ///
    /// A session that was replaced by a newer connection under the same id
    /// uses this on teardown so it never evicts its replacement.
    pub fn release(&self, client_id: &str, channel: &Outbound) -> bool {
        let removed = self
            .connections
            .remove_if(client_id, |_, current| current.same_channel(channel))
            .is_some();
        if removed {
            debug!(%client_id, "released connection");
        } else {
            debug!(%client_id, "connection already replaced or removed, nothing to release");
        }
        removed
    }

    pub fn get(&self, client_id: &str) -> Option<Outbound> {
        self.connections.get(client_id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, client_id: &str) -> bool {
        self.connections.contains_key(client_id)
    }

    /// Apply `f` to every connection except `excluded_id`.
    ///
    /// A failure for one recipient is logged and counted; the remaining
    /// recipients are still visited. `f` runs while a shard lock is held and
    /// must not call back into the registry.
    pub fn for_each_except<F>(&self, excluded_id: &str, mut f: F) -> FanOut
    where
        F: FnMut(&str, &Outbound) -> Result<(), DeliveryError>,
    {
        let mut outcome = FanOut::default();
        for entry in self.connections.iter() {
            let client_id = entry.key();
            if client_id == excluded_id {
                continue;
            }
            match f(client_id, entry.value()) {
                Ok(()) => outcome.delivered += 1,
                Err(err) => {
                    warn!(%client_id, error = %err, "delivery failed, skipping recipient");
                    outcome.failed += 1;
                }
            }
        }
        outcome
    }

    /// Registered client ids, sorted.
    pub fn client_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .connections
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("connections", &self.connections.len())
            .finish()
    }
}
