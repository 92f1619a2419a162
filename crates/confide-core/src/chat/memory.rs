//! In-memory `ChatLog` used by relay tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use confide_types::chat::{ChatEntry, NewChatEntry};
use confide_types::error::RepositoryError;

use super::ChatLog;

#[derive(Default)]
pub struct MemoryChatLog {
    entries: Mutex<Vec<ChatEntry>>,
    unavailable: AtomicBool,
}

impl MemoryChatLog {
    /// Seed the log with an existing entry stamped at `timestamp`.
    pub fn with_entry_at(timestamp: DateTime<Utc>) -> Self {
        let log = Self::default();
        log.entries.lock().unwrap().push(ChatEntry {
            id: 1,
            client: "Student".to_string(),
            message: "earlier".to_string(),
            timestamp,
        });
        log
    }

    /// Make every subsequent append fail with `RepositoryError::Connection`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Vec<ChatEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl ChatLog for MemoryChatLog {
    async fn append(&self, entry: &NewChatEntry) -> Result<ChatEntry, RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        let mut entries = self.entries.lock().unwrap();
        let id = entries.last().map_or(1, |last| last.id + 1);
        let stored = entry.clone().with_id(id);
        entries.push(stored.clone());
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<ChatEntry>, RepositoryError> {
        Ok(self.snapshot())
    }

    async fn clear_all(&self) -> Result<u64, RepositoryError> {
        let mut entries = self.entries.lock().unwrap();
        let removed = entries.len() as u64;
        entries.clear();
        Ok(removed)
    }

    async fn latest_timestamp(&self) -> Result<Option<DateTime<Utc>>, RepositoryError> {
        Ok(self.entries.lock().unwrap().last().map(|e| e.timestamp))
    }
}
