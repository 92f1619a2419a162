//! HTTP and WebSocket layer for Confide.
//!
//! Axum-based: the chat page at `/`, the relay socket at `/ws/{client_id}`,
//! and a small JSON API at `/api/v1/` using the envelope response format.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
