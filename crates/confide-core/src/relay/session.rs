//! Per-connection control loop.
//!
//! A session moves through `Connecting -> Open -> Closed`:
//!
//! - **Connecting:** created while the transport handshake runs. Nothing is
//!   registered yet.
//! - **Open:** [`Session::open`] registers the connection and hands back the
//!   receiver the transport drains into the socket. [`Session::run`] then
//!   awaits inbound frames; each text frame is recorded to the chat log and,
//!   only if that succeeds, delivered.
//! - **Closed:** on a close frame, end of stream, or read error the session
//!   releases its registry slot and announces the departure.
//!
//! A message whose write fails is dropped (logged, not delivered, not
//! retried): delivery is at most once and never ahead of the log.

use std::fmt;
use std::sync::Arc;

use confide_types::role::Role;
use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::Instrument;

use super::Relay;
use super::registry::Outbound;
use crate::chat::ChatLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Open,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Connecting => write!(f, "connecting"),
            SessionState::Open => write!(f, "open"),
            SessionState::Closed => write!(f, "closed"),
        }
    }
}

/// Transport-neutral inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    /// The peer asked to close the connection.
    Close,
    /// Binary or control frames; ignored.
    Other,
}

/// What a finished session did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub client_id: String,
    pub role: Role,
    /// Messages recorded and delivered.
    pub relayed: usize,
    /// Messages dropped because the log write failed.
    pub dropped: usize,
}

pub struct Session<L> {
    relay: Arc<Relay<L>>,
    client_id: String,
    role: Role,
    outbound: Option<Outbound>,
    state: SessionState,
}

impl<L: ChatLog> Session<L> {
    pub(crate) fn new(relay: Arc<Relay<L>>, client_id: String) -> Self {
        let role = relay.role_for(&client_id);
        Self {
            relay,
            client_id,
            role,
            outbound: None,
            state: SessionState::Connecting,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Register the connection. Returns the receiving end of its outbound
    /// queue, which the transport writes to the peer.
    pub fn open(&mut self) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(self.relay.outbound_buffer());
        self.relay.registry().register(&self.client_id, tx.clone());
        self.outbound = Some(tx);
        self.state = SessionState::Open;
        tracing::info!(client_id = %self.client_id, role = %self.role, "client connected");
        rx
    }

    /// Process inbound frames until the peer disconnects, then tear down.
    ///
    /// Any stream error is treated as a disconnect.
    pub async fn run<S, E>(mut self, mut inbound: S) -> SessionSummary
    where
        S: Stream<Item = Result<Frame, E>> + Unpin,
        E: fmt::Display,
    {
        let span = tracing::info_span!("session", client_id = %self.client_id, role = %self.role);

        async move {
            let mut summary = SessionSummary {
                client_id: self.client_id.clone(),
                role: self.role,
                relayed: 0,
                dropped: 0,
            };

            let Some(outbound) = self.outbound.clone() else {
                tracing::warn!(state = %self.state, "session was never opened");
                self.state = SessionState::Closed;
                return summary;
            };

            while let Some(frame) = inbound.next().await {
                match frame {
                    Ok(Frame::Text(text)) => {
                        if self.handle_text(&outbound, &text).await {
                            summary.relayed += 1;
                        } else {
                            summary.dropped += 1;
                        }
                    }
                    Ok(Frame::Close) => break,
                    Ok(Frame::Other) => {}
                    Err(err) => {
                        tracing::debug!(error = %err, "inbound stream error, closing session");
                        break;
                    }
                }
            }

            drop(outbound);
            self.close();
            summary
        }
        .instrument(span)
        .await
    }

    /// Record then deliver one message. Returns `false` if it was dropped.
    async fn handle_text(&self, outbound: &Outbound, text: &str) -> bool {
        match self.relay.recorder().record(self.role, text).await {
            Ok(entry) => {
                tracing::debug!(entry_id = entry.id, "message recorded");
                self.relay
                    .broadcaster()
                    .deliver(&self.client_id, outbound, self.role, text);
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to record message, not delivering");
                false
            }
        }
    }

    fn close(&mut self) {
        if let Some(outbound) = self.outbound.take() {
            self.relay.registry().release(&self.client_id, &outbound);
        }
        self.state = SessionState::Closed;
        self.relay
            .broadcaster()
            .announce_departure(&self.client_id, self.role);
        tracing::info!("client disconnected");
    }
}
