//! Observability setup for Confide.

pub mod tracing_setup;
