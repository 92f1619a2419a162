//! Relay logic and storage trait definitions for Confide.
//!
//! This crate defines the `ChatLog` port that the infrastructure layer
//! implements, plus the in-memory relay: connection registry, broadcast
//! engine, and the per-connection session loop. It depends only on
//! `confide-types` -- never on `confide-infra` or any database/IO crate.

pub mod chat;
pub mod relay;
