//! Infrastructure layer for Confide.
//!
//! Implements the `ChatLog` trait defined in `confide-core` on SQLite, and
//! resolves the data directory and `config.toml`.

pub mod config;
pub mod filesystem;
pub mod sqlite;
