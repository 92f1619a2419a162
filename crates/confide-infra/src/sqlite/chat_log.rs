//! SQLite chat log implementation.
//!
//! Implements `ChatLog` from `confide-core` on the `conversations` table.
//! Timestamps are stored as RFC 3339 text with microsecond precision.

use chrono::{DateTime, SecondsFormat, Utc};
use confide_core::chat::ChatLog;
use confide_types::chat::{ChatEntry, NewChatEntry};
use confide_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatLog`.
pub struct SqliteChatLog {
    pool: DatabasePool,
}

impl SqliteChatLog {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ChatRow {
    id: i64,
    client: String,
    message: String,
    timestamp: String,
}

impl ChatRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            client: row.try_get("client")?,
            message: row.try_get("message")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_entry(self) -> Result<ChatEntry, RepositoryError> {
        Ok(ChatEntry {
            id: self.id,
            client: self.client,
            message: self.message,
            timestamp: parse_datetime(&self.timestamp)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn map_sqlx(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// ChatLog implementation
// ---------------------------------------------------------------------------

impl ChatLog for SqliteChatLog {
    async fn append(&self, entry: &NewChatEntry) -> Result<ChatEntry, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO conversations (client, message, timestamp) VALUES (?, ?, ?)",
        )
        .bind(&entry.client)
        .bind(&entry.message)
        .bind(format_datetime(&entry.timestamp))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx)?;

        Ok(entry.clone().with_id(result.last_insert_rowid()))
    }

    async fn list_all(&self) -> Result<Vec<ChatEntry>, RepositoryError> {
        let rows = sqlx::query("SELECT id, client, message, timestamp FROM conversations ORDER BY id")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_sqlx)?;

        rows.iter()
            .map(|row| {
                ChatRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_entry()
            })
            .collect()
    }

    async fn clear_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM conversations")
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx)?;

        tracing::info!(removed = result.rows_affected(), "cleared chat log");
        Ok(result.rows_affected())
    }

    async fn latest_timestamp(&self) -> Result<Option<DateTime<Utc>>, RepositoryError> {
        let row = sqlx::query("SELECT timestamp FROM conversations ORDER BY id DESC LIMIT 1")
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx)?;

        match row {
            Some(row) => {
                let raw: String = row
                    .try_get("timestamp")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(parse_datetime(&raw)?))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, SubsecRound};

    async fn test_log() -> SqliteChatLog {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        SqliteChatLog::new(DatabasePool::new(&url).await.unwrap())
    }

    fn new_entry(client: &str, message: &str, timestamp: DateTime<Utc>) -> NewChatEntry {
        NewChatEntry {
            client: client.to_string(),
            message: message.to_string(),
            timestamp,
        }
    }

    #[tokio::test]
    async fn test_append_and_list_roundtrip() {
        let log = test_log().await;
        let now = Utc::now().trunc_subsecs(6);

        let first = log.append(&new_entry("Student", "hello", now)).await.unwrap();
        let second = log
            .append(&new_entry("Counselor", "hi there", now + Duration::seconds(1)))
            .await
            .unwrap();
        assert!(first.id < second.id);

        let entries = log.list_all().await.unwrap();
        assert_eq!(entries, vec![first, second]);
        assert_eq!(entries[0].timestamp, now);
    }

    #[tokio::test]
    async fn test_empty_message_is_stored() {
        let log = test_log().await;
        log.append(&new_entry("Student", "", Utc::now())).await.unwrap();

        let entries = log.list_all().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "");
    }

    #[tokio::test]
    async fn test_list_all_empty() {
        let log = test_log().await;
        assert!(log.list_all().await.unwrap().is_empty());
        assert!(log.latest_timestamp().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_all() {
        let log = test_log().await;
        for i in 0..5 {
            log.append(&new_entry("Student", &format!("m{i}"), Utc::now()))
                .await
                .unwrap();
        }

        assert_eq!(log.clear_all().await.unwrap(), 5);
        assert!(log.list_all().await.unwrap().is_empty());
        assert_eq!(log.clear_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_latest_timestamp_is_last_appended() {
        let log = test_log().await;
        let base = Utc::now().trunc_subsecs(6);
        log.append(&new_entry("Student", "a", base)).await.unwrap();
        log.append(&new_entry("Student", "b", base + Duration::milliseconds(5)))
            .await
            .unwrap();

        let latest = log.latest_timestamp().await.unwrap();
        assert_eq!(latest, Some(base + Duration::milliseconds(5)));
    }

    #[test]
    fn test_datetime_format_roundtrip() {
        let now = Utc::now().trunc_subsecs(6);
        let formatted = format_datetime(&now);
        assert!(formatted.ends_with('Z'));
        assert_eq!(parse_datetime(&formatted).unwrap(), now);
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert!(matches!(
            parse_datetime("yesterday"),
            Err(RepositoryError::Query(_))
        ));
    }
}
