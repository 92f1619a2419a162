//! GET / - The browser chat client.
//!
//! A single static page: it asks for a client id, shows the role that id maps
//! to, opens `/ws/{id}` on the same host, and lists every frame it receives.

use axum::extract::State;
use axum::response::Html;

use crate::state::AppState;

const COUNSELOR_ID_PLACEHOLDER: &str = "__COUNSELOR_ID__";

const CHAT_PAGE: &str = r##"<!DOCTYPE html>
<html>
    <head>
        <title>Confide</title>
        <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.0.2/dist/css/bootstrap.min.css" rel="stylesheet">
    </head>
    <body>
        <div class="container mt-3">
            <h1>Confide</h1>
            <h2>Your Role: <span id="role"></span></h2>
            <form action="" onsubmit="sendMessage(event)">
                <input type="text" class="form-control" id="messageText" autocomplete="off" />
                <button class="btn btn-outline-primary mt-2">Send</button>
            </form>
            <ul id="messages" class="mt-5"></ul>
        </div>
        <script>
            const counselorId = __COUNSELOR_ID__;
            const clientId = prompt(`Enter your ID (${counselorId} for counselor):`) || "";
            document.querySelector("#role").textContent =
                clientId === counselorId ? "Counselor" : "Student";

            const scheme = location.protocol === "https:" ? "wss" : "ws";
            const ws = new WebSocket(`${scheme}://${location.host}/ws/${encodeURIComponent(clientId)}`);
            ws.onmessage = function(event) {
                const item = document.createElement("li");
                item.appendChild(document.createTextNode(event.data));
                document.getElementById("messages").appendChild(item);
            };

            function sendMessage(event) {
                const input = document.getElementById("messageText");
                ws.send(input.value);
                input.value = "";
                event.preventDefault();
            }
        </script>
    </body>
</html>
"##;

/// Render the page with `counselor_id` embedded as a JS string literal.
pub fn render_chat_page(counselor_id: &str) -> String {
    // `<` is escaped so the id can never close the script element.
    let literal = serde_json::to_string(counselor_id)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace('<', "\\u003c");
    CHAT_PAGE.replace(COUNSELOR_ID_PLACEHOLDER, &literal)
}

pub async fn chat_page(State(state): State<AppState>) -> Html<String> {
    Html(render_chat_page(&state.config.counselor_id))
}
