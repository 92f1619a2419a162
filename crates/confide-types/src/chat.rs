//! Persisted chat log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message as stored in the log.
///
/// `client` holds the sender's role label, not its client identifier.
/// Entries are immutable; the only way to remove them is a bulk clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    /// Store-assigned id, increasing in insertion order.
    pub id: i64,
    pub client: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// An entry that has not been written to the log yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChatEntry {
    pub client: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl NewChatEntry {
    /// Attach the id assigned by the store.
    pub fn with_id(self, id: i64) -> ChatEntry {
        ChatEntry {
            id,
            client: self.client,
            message: self.message,
            timestamp: self.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_id_keeps_fields() {
        let timestamp = Utc::now();
        let entry = NewChatEntry {
            client: "Student".to_string(),
            message: String::new(),
            timestamp,
        }
        .with_id(7);

        assert_eq!(entry.id, 7);
        assert_eq!(entry.client, "Student");
        assert!(entry.message.is_empty());
        assert_eq!(entry.timestamp, timestamp);
    }

    #[test]
    fn test_chat_entry_serializes_flat() {
        let entry = ChatEntry {
            id: 1,
            client: "Counselor".to_string(),
            message: "hi".to_string(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["client"], "Counselor");
        assert_eq!(json["message"], "hi");
        assert!(json["timestamp"].is_string());
    }
}
