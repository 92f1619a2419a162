//! HTTP request handlers.

pub mod chats;
pub mod connections;
pub mod page;
pub mod ws;
