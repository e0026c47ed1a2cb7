//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.
//!
//! Each connection owns one quiz session (a fresh uuid); its record is
//! dropped when the socket closes.

use std::sync::Arc;

use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::logic::*;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "patterncoach_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  let session_id = Uuid::new_v4().to_string();
  info!(target: "patterncoach_backend", %session_id, "WebSocket connected");

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "patterncoach_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state, &session_id).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "patterncoach_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }

  state.sessions.clear(&session_id).await;
  info!(target: "patterncoach_backend", %session_id, "WebSocket disconnected");
}

#[instrument(level = "info", skip(state, session_id))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState, session_id: &str) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Scenario { pattern, difficulty, scene } => {
      let result = generate_scenario(state, pattern, difficulty, scene).await;
      ServerWsMessage::Scenario { result }
    }

    ClientWsMessage::Refactor { pattern, code } => {
      let result = generate_refactor(state, pattern, &code).await;
      ServerWsMessage::Refactor { result }
    }

    ClientWsMessage::QuizNext => {
      let result = next_quiz(state, session_id).await;
      tracing::info!(target: "quiz", %session_id, "WS quiz question served");
      ServerWsMessage::Quiz { result }
    }

    ClientWsMessage::QuizAnswer { selected } => {
      let result = submit_quiz_answer(state, session_id, &selected).await;
      ServerWsMessage::QuizResult { result }
    }
  }
}
