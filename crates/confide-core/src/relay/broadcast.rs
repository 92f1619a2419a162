//! Fan-out of chat messages to registered connections.
//!
//! The sender gets a personal acknowledgment on its own channel; everyone
//! else gets the message annotated with the sender's role. The sender never
//! receives its own broadcast copy.

use std::sync::Arc;

use confide_types::role::Role;
use tracing::{debug, warn};

use super::registry::{ConnectionRegistry, FanOut, Outbound, enqueue};

/// Acknowledgment sent back to the author of a message.
pub fn ack_text(text: &str) -> String {
    format!("You wrote: {text}")
}

/// Copy of a message relayed to the other participants.
pub fn broadcast_text(role: Role, text: &str) -> String {
    format!("{role} says: {text}")
}

/// Notice sent to the remaining participants when someone disconnects.
pub fn departure_text(role: Role) -> String {
    format!("{role} has left the chat")
}

/// Result of delivering one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Whether the acknowledgment reached the sender's queue.
    pub acknowledged: bool,
    pub fan_out: FanOut,
}

#[derive(Debug, Clone)]
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Acknowledge `text` to its sender and relay it to every other connection.
    ///
    /// `sender` is the sender's own outbound channel. It is passed explicitly
    /// rather than looked up by id, so an acknowledgment always reaches the
    /// connection that wrote the message even after its id was taken over.
    pub fn deliver(&self, sender_id: &str, sender: &Outbound, role: Role, text: &str) -> Delivery {
        let acknowledged = match enqueue(sender_id, sender, ack_text(text)) {
            Ok(()) => true,
            Err(err) => {
                warn!(client_id = %sender_id, error = %err, "failed to acknowledge message");
                false
            }
        };

        let relayed = broadcast_text(role, text);
        let fan_out = self
            .registry
            .for_each_except(sender_id, |id, channel| enqueue(id, channel, relayed.clone()));

        debug!(
            client_id = %sender_id,
            delivered = fan_out.delivered,
            failed = fan_out.failed,
            "relayed message"
        );

        Delivery {
            acknowledged,
            fan_out,
        }
    }

    /// Tell every remaining connection that `departed_id` left.
    ///
    /// The departed connection is normally deregistered already; its id is
    /// still excluded so a newer connection holding the same id is not told
    /// that it left.
    pub fn announce_departure(&self, departed_id: &str, role: Role) -> FanOut {
        let notice = departure_text(role);
        let fan_out = self
            .registry
            .for_each_except(departed_id, |id, channel| enqueue(id, channel, notice.clone()));

        debug!(
            client_id = %departed_id,
            delivered = fan_out.delivered,
            "announced departure"
        );
        fan_out
    }
}
