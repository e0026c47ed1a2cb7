//! Core flow behaviors shared by both HTTP and WebSocket handlers.
//!
//! Three flows, one generation capability:
//!   - scenario: prompt -> raw text, rendered as-is
//!   - refactor: prompt -> text split at the fixed section heading
//!   - quiz: prompt -> strict JSON -> QuizRecord in the session store
//!
//! Every failure is converted to a displayable outcome here; nothing below
//! the handlers ever panics on model misbehavior.

use tracing::{error, info, instrument, warn};

use crate::builders::{build_quiz_prompt, build_refactor_prompt, build_scenario_prompt};
use crate::decode::{decode_quiz_response, split_refactor_response};
use crate::domain::{Difficulty, Pattern, Scene};
use crate::protocol::{to_answer_out, to_quiz_out, QuizAnswerOut, QuizNextOut, RefactorOut, ScenarioOut};
use crate::state::AppState;
use crate::util::trunc_for_log;

fn generation_failed_message(detail: &str) -> String {
  format!("AI生成失败，请稍后重试。可能是API调用频率限制或内容安全策略导致。错误信息: {}", detail)
}

#[instrument(level = "info", skip(state), fields(?pattern, ?difficulty, ?scene))]
pub async fn generate_scenario(
  state: &AppState,
  pattern: Pattern,
  difficulty: Difficulty,
  scene: Scene,
) -> ScenarioOut {
  let prompt = build_scenario_prompt(&state.prompts, pattern, difficulty, scene);
  match state.openai.generate(&prompt).await {
    Ok(content) => {
      info!(target: "patterncoach_backend", content_len = content.len(), "Scenario generated");
      ScenarioOut::Ok { content }
    }
    Err(e) => {
      error!(target: "patterncoach_backend", error = %e, "Scenario generation failed");
      ScenarioOut::GenerationFailed { message: generation_failed_message(&e) }
    }
  }
}

#[instrument(level = "info", skip(state, code), fields(?pattern, code_len = code.len()))]
pub async fn generate_refactor(state: &AppState, pattern: Pattern, code: &str) -> RefactorOut {
  // Blank input is rejected before any generation call: a warning, not an error.
  if code.trim().is_empty() {
    warn!(target: "patterncoach_backend", "Refactor requested with blank source code");
    return RefactorOut::InputRequired { message: "请输入原始代码。".into() };
  }

  let prompt = build_refactor_prompt(&state.prompts, pattern, code);
  let text = match state.openai.generate(&prompt).await {
    Ok(t) => t,
    Err(e) => {
      error!(target: "patterncoach_backend", error = %e, "Refactor generation failed");
      return RefactorOut::GenerationFailed { message: generation_failed_message(&e) };
    }
  };

  match split_refactor_response(&text) {
    Ok(doc) => RefactorOut::Ok {
      original_code: code.to_string(),
      optimized_code: doc.optimized_code,
      explanation: doc.explanation,
    },
    Err(e) => {
      error!(target: "patterncoach_backend", reason = %e.reason, raw_preview = %trunc_for_log(&e.raw, 120), "Refactor reply failed to split");
      RefactorOut::FormatError {
        message: format!("AI返回格式有误，无法解析。（{}）", e.reason),
        raw: e.raw,
      }
    }
  }
}

/// Start or advance the quiz for one session. The previous record and any
/// selection are discarded before the generation call goes out, so stale
/// grading state can never leak into a new question.
#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn next_quiz(state: &AppState, session_id: &str) -> QuizNextOut {
  state.sessions.clear(session_id).await;

  let prompt = build_quiz_prompt(&state.prompts);
  let text = match state.openai.generate(&prompt).await {
    Ok(t) => t,
    Err(e) => {
      error!(target: "quiz", %session_id, error = %e, "Quiz generation failed");
      return QuizNextOut::GenerationFailed { message: generation_failed_message(&e) };
    }
  };

  match decode_quiz_response(&text) {
    Ok(record) => {
      info!(target: "quiz", %session_id, answer = %record.answer, option_count = record.options.len(), "Quiz decoded and installed");
      let out = to_quiz_out(session_id, &record);
      state.sessions.set(session_id, record).await;
      out
    }
    Err(e) => {
      error!(target: "quiz", %session_id, reason = %e.reason, raw_preview = %trunc_for_log(&e.raw, 120), "Quiz reply failed to decode");
      QuizNextOut::FormatError {
        message: format!("题目生成失败，AI返回的JSON格式错误，请重试。（{}）", e.reason),
        raw: e.raw,
      }
    }
  }
}

/// Grade a submitted selection. Pure and local: no generation call.
#[instrument(level = "info", skip(state), fields(%session_id, %selected))]
pub async fn submit_quiz_answer(state: &AppState, session_id: &str, selected: &str) -> QuizAnswerOut {
  match state.sessions.select(session_id, selected).await {
    Ok(grading) => {
      info!(target: "quiz", %session_id, correct = grading.correct, "Answer graded");
      to_answer_out(grading)
    }
    Err(message) => {
      warn!(target: "quiz", %session_id, %message, "Answer rejected");
      QuizAnswerOut::Error { message }
    }
  }
}
