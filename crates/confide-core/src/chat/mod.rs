//! Chat log persistence abstractions.
//!
//! This module defines the `ChatLog` trait that the infrastructure layer
//! implements for the append-only message log.

pub mod log;

#[cfg(test)]
pub(crate) mod memory;

pub use log::ChatLog;
