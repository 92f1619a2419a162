//! ChatLog trait definition.

use chrono::{DateTime, Utc};
use confide_types::chat::{ChatEntry, NewChatEntry};
use confide_types::error::RepositoryError;

/// Durable append-only log of chat entries.
///
/// Implementations live in confide-infra (e.g., `SqliteChatLog`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ChatLog: Send + Sync {
    /// Append an entry and return it with its store-assigned id.
    fn append(
        &self,
        entry: &NewChatEntry,
    ) -> impl std::future::Future<Output = Result<ChatEntry, RepositoryError>> + Send;

    /// All entries in insertion order.
    fn list_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ChatEntry>, RepositoryError>> + Send;

    /// Delete every entry. Returns how many were removed.
    fn clear_all(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Timestamp of the most recently appended entry, if any.
    fn latest_timestamp(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<DateTime<Utc>>, RepositoryError>> + Send;
}
