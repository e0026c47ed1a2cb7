//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(?body.pattern, ?body.difficulty, ?body.scene))]
pub async fn http_post_scenario(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ScenarioIn>,
) -> impl IntoResponse {
  let result = generate_scenario(&state, body.pattern, body.difficulty, body.scene).await;
  Json(result)
}

#[instrument(level = "info", skip(state, body), fields(?body.pattern, code_len = body.code.len()))]
pub async fn http_post_refactor(
  State(state): State<Arc<AppState>>,
  Json(body): Json<RefactorIn>,
) -> impl IntoResponse {
  let result = generate_refactor(&state, body.pattern, &body.code).await;
  Json(result)
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_quiz_next(
  State(state): State<Arc<AppState>>,
  Json(body): Json<QuizNextIn>,
) -> impl IntoResponse {
  // First call has no session id yet; mint one and hand it back in the DTO.
  let session_id = body.session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
  let result = next_quiz(&state, &session_id).await;
  info!(target: "quiz", %session_id, "HTTP quiz question served");
  Json(result)
}

#[instrument(level = "info", skip(state, body), fields(session_id = %body.session_id, selected = %body.selected))]
pub async fn http_post_quiz_answer(
  State(state): State<Arc<AppState>>,
  Json(body): Json<QuizAnswerIn>,
) -> impl IntoResponse {
  let result = submit_quiz_answer(&state, &body.session_id, &body.selected).await;
  Json(result)
}
