//! WebSocket endpoint bridging a peer's socket to a relay session.
//!
//! `GET /ws/{client_id}` upgrades the connection. The session is created
//! before the upgrade (connecting), registered once the socket is live
//! (open), and torn down when the peer goes away (closed).
//!
//! Each socket gets two halves:
//!
//! - **Writer:** a spawned task draining the session's outbound queue into
//!   the socket sink.
//! - **Reader:** the session loop itself, fed with the socket stream mapped
//!   to transport-neutral [`Frame`]s.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use confide_core::relay::{Frame, Session};
use confide_infra::sqlite::chat_log::SqliteChatLog;

use crate::state::AppState;

/// Upgrade an HTTP request to a relay session for `client_id`.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> impl IntoResponse {
    let session = state.relay.connecting(client_id);
    tracing::debug!(client_id = %session.client_id(), state = %session.state(), "upgrading connection");

    ws.on_failed_upgrade(|err| {
        tracing::warn!(error = %err, "WebSocket handshake failed");
    })
    .on_upgrade(move |socket| handle_ws_connection(socket, session))
}

async fn handle_ws_connection(socket: WebSocket, mut session: Session<SqliteChatLog>) {
    let outbound_rx = session.open();
    let (ws_sender, ws_receiver) = socket.split();

    let writer = tokio::spawn(forward_outbound(outbound_rx, ws_sender));

    let inbound = ws_receiver.map(|msg| msg.map(frame_from_message));
    let summary = session.run(inbound).await;

    // The session dropped its queue handle; the writer drains what is left and stops.
    if let Err(err) = writer.await {
        tracing::warn!(error = %err, "WebSocket writer task failed");
    }

    tracing::debug!(
        client_id = %summary.client_id,
        relayed = summary.relayed,
        dropped = summary.dropped,
        "WebSocket connection closed"
    );
}

/// Write queued texts to the socket until the queue closes or the peer is gone.
async fn forward_outbound(
    mut outbound_rx: mpsc::Receiver<String>,
    mut ws_sender: SplitSink<WebSocket, Message>,
) {
    while let Some(text) = outbound_rx.recv().await {
        if ws_sender.send(Message::Text(text.into())).await.is_err() {
            // Client disconnected
            break;
        }
    }
    let _ = ws_sender.close().await;
}

fn frame_from_message(msg: Message) -> Frame {
    match msg {
        Message::Text(text) => Frame::Text(text.as_str().to_owned()),
        Message::Close(_) => Frame::Close,
        // Binary, ping, pong (protocol frames are answered by axum/tungstenite)
        _ => Frame::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_frames_map_to_text() {
        assert_eq!(
            frame_from_message(Message::Text("hello".into())),
            Frame::Text("hello".to_string())
        );
    }

    #[test]
    fn close_frames_map_to_close() {
        assert_eq!(frame_from_message(Message::Close(None)), Frame::Close);
    }

    #[test]
    fn other_frames_are_ignored() {
        assert_eq!(frame_from_message(Message::Binary(vec![1, 2].into())), Frame::Other);
        assert_eq!(frame_from_message(Message::Ping(Vec::new().into())), Frame::Other);
        assert_eq!(frame_from_message(Message::Pong(Vec::new().into())), Frame::Other);
    }
}
