//! Serialized writes to the chat log.
//!
//! All appends go through one async write gate, which also assigns the entry
//! timestamp. Stamping under the gate makes timestamps non-decreasing in
//! insertion order even when several sessions write concurrently or the
//! wall clock steps backwards. Only the store write is gated; delivery
//! happens after the gate is released.

use chrono::{DateTime, SubsecRound, Utc};
use confide_types::chat::{ChatEntry, NewChatEntry};
use confide_types::error::RepositoryError;
use confide_types::role::Role;
use tokio::sync::Mutex;

use crate::chat::ChatLog;

/// Stored timestamps keep microsecond precision.
const TIMESTAMP_DIGITS: u16 = 6;

pub struct ChatRecorder<L> {
    log: L,
    /// Timestamp of the last entry written through this recorder.
    write_gate: Mutex<Option<DateTime<Utc>>>,
}

impl<L: ChatLog> ChatRecorder<L> {
    pub fn new(log: L) -> Self {
        Self {
            log,
            write_gate: Mutex::new(None),
        }
    }

    /// Create a recorder that continues after the newest entry already in `log`.
    pub async fn resume(log: L) -> Result<Self, RepositoryError> {
        let latest = log.latest_timestamp().await?;
        Ok(Self {
            log,
            write_gate: Mutex::new(latest),
        })
    }

    /// Stamp and append a message sent by a participant with `role`.
    pub async fn record(&self, role: Role, text: &str) -> Result<ChatEntry, RepositoryError> {
        let mut last = self.write_gate.lock().await;

        let now = Utc::now().trunc_subsecs(TIMESTAMP_DIGITS);
        let timestamp = match *last {
            Some(previous) if previous > now => previous,
            _ => now,
        };

        let entry = self
            .log
            .append(&NewChatEntry {
                client: role.to_string(),
                message: text.to_string(),
                timestamp,
            })
            .await?;

        *last = Some(entry.timestamp);
        Ok(entry)
    }

    pub async fn list_all(&self) -> Result<Vec<ChatEntry>, RepositoryError> {
        self.log.list_all().await
    }

    /// Delete every entry. Waits for in-flight appends to finish first.
    pub async fn clear_all(&self) -> Result<u64, RepositoryError> {
        let _gate = self.write_gate.lock().await;
        self.log.clear_all().await
    }

    pub fn log(&self) -> &L {
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::memory::MemoryChatLog;
    use chrono::Duration;
    use std::sync::Arc;

    #[tokio::test]
    async fn record_appends_role_and_text() {
        let recorder = ChatRecorder::new(MemoryChatLog::default());

        let entry = recorder.record(Role::Student, "hello").await.unwrap();

        assert_eq!(entry.client, "Student");
        assert_eq!(entry.message, "hello");
        assert_eq!(recorder.log().snapshot(), vec![entry]);
    }

    #[tokio::test]
    async fn record_accepts_empty_message() {
        let recorder = ChatRecorder::new(MemoryChatLog::default());
        let entry = recorder.record(Role::Counselor, "").await.unwrap();
        assert_eq!(entry.message, "");
        assert_eq!(entry.client, "Counselor");
    }

    #[tokio::test]
    async fn resume_never_stamps_before_existing_entries() {
        let future = Utc::now().trunc_subsecs(6) + Duration::hours(1);
        let recorder = ChatRecorder::resume(MemoryChatLog::with_entry_at(future))
            .await
            .unwrap();

        let entry = recorder.record(Role::Student, "late").await.unwrap();

        assert_eq!(entry.timestamp, future);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_records_are_monotonic_in_insertion_order() {
        let recorder = Arc::new(ChatRecorder::new(MemoryChatLog::default()));

        let mut writers = Vec::new();
        for i in 0..8 {
            let recorder = Arc::clone(&recorder);
            writers.push(tokio::spawn(async move {
                for j in 0..25 {
                    recorder
                        .record(Role::Student, &format!("{i}-{j}"))
                        .await
                        .unwrap();
                }
            }));
        }
        for writer in writers {
            writer.await.unwrap();
        }

        let entries = recorder.list_all().await.unwrap();
        assert_eq!(entries.len(), 200);
        for pair in entries.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
            assert!(pair[0].id < pair[1].id);
        }
    }

    #[tokio::test]
    async fn clear_all_empties_log() {
        let recorder = ChatRecorder::new(MemoryChatLog::default());
        for text in ["a", "b", "c"] {
            recorder.record(Role::Student, text).await.unwrap();
        }

        assert_eq!(recorder.clear_all().await.unwrap(), 3);
        assert!(recorder.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_append_is_surfaced() {
        let log = MemoryChatLog::default();
        log.set_unavailable(true);
        let recorder = ChatRecorder::new(log);

        let err = recorder.record(Role::Student, "lost").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Connection));
    }
}
