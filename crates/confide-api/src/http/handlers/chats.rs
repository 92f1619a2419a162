//! Chat log HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/v1/chats - List every persisted entry in insertion order
//! - DELETE /api/v1/chats - Delete every persisted entry

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use uuid::Uuid;

use confide_types::chat::ChatEntry;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Body of a successful clear.
#[derive(Debug, Serialize)]
pub struct ClearedChats {
    pub message: &'static str,
    pub removed: u64,
}

/// GET /api/v1/chats - List all chat entries.
pub async fn list_chats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ChatEntry>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let entries = state.relay.recorder().list_all().await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(entries, request_id, elapsed).with_link("self", "/api/v1/chats"),
    ))
}

/// DELETE /api/v1/chats - Clear the chat log.
pub async fn clear_chats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ClearedChats>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let removed = state.relay.recorder().clear_all().await?;
    tracing::info!(removed, "chat log cleared via API");

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        ClearedChats {
            message: "All chats have been cleared.",
            removed,
        },
        request_id,
        elapsed,
    )))
}
