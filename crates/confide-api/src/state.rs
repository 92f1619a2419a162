//! Application state shared by the CLI and the HTTP server.
//!
//! AppState pins the generic [`Relay`] to the SQLite chat log and carries the
//! loaded configuration.

use std::path::PathBuf;
use std::sync::Arc;

use confide_core::relay::Relay;
use confide_infra::config::load_config;
use confide_infra::filesystem::{database_url, resolve_data_dir};
use confide_infra::sqlite::chat_log::SqliteChatLog;
use confide_infra::sqlite::pool::DatabasePool;
use confide_types::config::RelayConfig;

pub type ConcreteRelay = Relay<SqliteChatLog>;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<ConcreteRelay>,
    pub config: Arc<RelayConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize from the resolved data directory.
    pub async fn init() -> anyhow::Result<Self> {
        Self::open(resolve_data_dir()).await
    }

    /// Load config, open the database, and build the relay rooted at `data_dir`.
    pub async fn open(data_dir: PathBuf) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;
        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;
        let relay = Relay::resume(SqliteChatLog::new(db_pool), &config).await?;

        tracing::debug!(data_dir = %data_dir.display(), "application state ready");

        Ok(Self {
            relay: Arc::new(relay),
            config: Arc::new(config),
            data_dir,
        })
    }
}
