//! Shared domain types for Confide.
//!
//! Chat entries, participant roles, relay configuration, and the error types
//! shared between the core relay and the storage layer.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod role;
