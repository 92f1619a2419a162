//! GET /api/v1/connections - Currently registered client ids.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use uuid::Uuid;

use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ConnectionsView {
    pub count: usize,
    pub client_ids: Vec<String>,
    pub counselor_online: bool,
}

pub async fn list_connections(State(state): State<AppState>) -> Json<ApiResponse<ConnectionsView>> {
    let start = Instant::now();
    let registry = state.relay.registry();

    let view = ConnectionsView {
        count: registry.len(),
        client_ids: registry.client_ids(),
        counselor_online: registry.contains(&state.config.counselor_id),
    };

    Json(ApiResponse::success(
        view,
        Uuid::now_v7().to_string(),
        start.elapsed().as_millis() as u64,
    ))
}
