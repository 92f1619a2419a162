//! In-process chat relay.
//!
//! - `registry` -- `ConnectionRegistry`, the live client-id -> outbound map
//! - `broadcast` -- `Broadcaster`, acknowledgment and fan-out
//! - `recorder` -- `ChatRecorder`, serialized and timestamped log writes
//! - `session` -- `Session`, the per-connection control loop
//!
//! [`Relay`] owns one of each and is created once at startup; sessions hold
//! an `Arc` to it.

pub mod broadcast;
pub mod recorder;
pub mod registry;
pub mod session;

use std::sync::Arc;

use confide_types::config::RelayConfig;
use confide_types::error::RepositoryError;
use confide_types::role::Role;

use crate::chat::ChatLog;

pub use broadcast::{Broadcaster, Delivery};
pub use recorder::ChatRecorder;
pub use registry::{ConnectionRegistry, DeliveryError, FanOut, Outbound};
pub use session::{Frame, Session, SessionState, SessionSummary};

pub struct Relay<L> {
    registry: Arc<ConnectionRegistry>,
    broadcaster: Broadcaster,
    recorder: ChatRecorder<L>,
    counselor_id: String,
    outbound_buffer: usize,
}

impl<L: ChatLog> Relay<L> {
    pub fn new(log: L, config: &RelayConfig) -> Self {
        Self::with_recorder(ChatRecorder::new(log), config)
    }

    /// Build a relay whose timestamps continue after the newest stored entry.
    pub async fn resume(log: L, config: &RelayConfig) -> Result<Self, RepositoryError> {
        Ok(Self::with_recorder(ChatRecorder::resume(log).await?, config))
    }

    fn with_recorder(recorder: ChatRecorder<L>, config: &RelayConfig) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        Self {
            broadcaster: Broadcaster::new(Arc::clone(&registry)),
            registry,
            recorder,
            counselor_id: config.counselor_id.clone(),
            outbound_buffer: config.outbound_buffer.max(1),
        }
    }

    /// Start a session for a peer whose transport handshake is in progress.
    pub fn connecting(self: &Arc<Self>, client_id: impl Into<String>) -> Session<L> {
        Session::new(Arc::clone(self), client_id.into())
    }

    pub fn role_for(&self, client_id: &str) -> Role {
        Role::for_client(client_id, &self.counselor_id)
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    pub fn recorder(&self) -> &ChatRecorder<L> {
        &self.recorder
    }

    pub(crate) fn outbound_buffer(&self) -> usize {
        self.outbound_buffer
    }
}

impl<L> std::fmt::Debug for Relay<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("connections", &self.registry.len())
            .field("counselor_id", &self.counselor_id)
            .finish()
    }
}
