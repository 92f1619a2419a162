//! Axum router configuration with middleware.
//!
//! - `/` serves the chat page and `/ws/{client_id}` the relay socket.
//! - JSON endpoints live under `/api/v1/`.
//! - Middleware: CORS, tracing.

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Chat log
        .route(
            "/chats",
            get(handlers::chats::list_chats).delete(handlers::chats::clear_chats),
        )
        // Live connections
        .route("/connections", get(handlers::connections::list_connections));

    Router::new()
        .route("/", get(handlers::page::chat_page))
        .route("/ws/{client_id}", get(handlers::ws::ws_handler))
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
