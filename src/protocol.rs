//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Difficulty, Grading, Pattern, QuizOption, QuizRecord, Scene};

/// Messages the client can send over WebSocket. Each WS connection owns its
/// own quiz session, so quiz messages carry no session id.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Scenario {
        pattern: Pattern,
        difficulty: Difficulty,
        scene: Scene,
    },
    Refactor {
        pattern: Pattern,
        code: String,
    },
    QuizNext,
    QuizAnswer {
        selected: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Scenario { result: ScenarioOut },
    Refactor { result: RefactorOut },
    Quiz { result: QuizNextOut },
    QuizResult { result: QuizAnswerOut },
    Error { message: String },
}

/// Scenario flow outcome. The content is unstructured free text by design;
/// it is rendered as-is and never decoded.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScenarioOut {
    Ok { content: String },
    GenerationFailed { message: String },
}

/// Refactor flow outcome. On format errors the raw reply is always included
/// so the client can show what the model actually said.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefactorOut {
    Ok {
        #[serde(rename = "originalCode")]
        original_code: String,
        #[serde(rename = "optimizedCode")]
        optimized_code: String,
        explanation: String,
    },
    /// Blank input: a user warning, not an error. No generation call is made.
    InputRequired { message: String },
    GenerationFailed { message: String },
    FormatError { message: String, raw: String },
}

/// Quiz delivery. The answer key and explanations stay server-side until the
/// user submits a selection.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuizNextOut {
    Ok {
        #[serde(rename = "sessionId")]
        session_id: String,
        scene: String,
        question: String,
        options: Vec<QuizOption>,
    },
    GenerationFailed { message: String },
    FormatError { message: String, raw: String },
}

/// Grading result for a submitted selection.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuizAnswerOut {
    Ok {
        correct: bool,
        answer: String,
        #[serde(rename = "answerLabel")]
        answer_label: String,
        #[serde(rename = "correctExplanation")]
        correct_explanation: String,
        #[serde(rename = "wrongOptions")]
        wrong_options: Vec<WrongOptionOut>,
    },
    Error { message: String },
}

#[derive(Debug, Serialize)]
pub struct WrongOptionOut {
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Convert the internal record to the public quiz DTO (no answer leakage).
pub fn to_quiz_out(session_id: &str, record: &QuizRecord) -> QuizNextOut {
    QuizNextOut::Ok {
        session_id: session_id.to_string(),
        scene: record.scene.clone(),
        question: record.question.clone(),
        options: record.options.clone(),
    }
}

/// Convert a grading to the public answer DTO.
pub fn to_answer_out(grading: Grading) -> QuizAnswerOut {
    QuizAnswerOut::Ok {
        correct: grading.correct,
        answer: grading.answer,
        answer_label: grading.answer_label,
        correct_explanation: grading.correct_explanation,
        wrong_options: grading
            .wrong_options
            .into_iter()
            .map(|w| WrongOptionOut { key: w.key, label: w.label, explanation: w.explanation })
            .collect(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct ScenarioIn {
    pub pattern: Pattern,
    pub difficulty: Difficulty,
    pub scene: Scene,
}

#[derive(Debug, Deserialize)]
pub struct RefactorIn {
    pub pattern: Pattern,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct QuizNextIn {
    /// Omitted on the very first question; the server then mints a session id
    /// and returns it for subsequent calls.
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuizAnswerIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub selected: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_client_messages_parse_from_snake_case_tags() {
        let msg: ClientWsMessage = serde_json::from_str(
            r#"{"type":"scenario","pattern":"factory_method","difficulty":"beginner","scene":"e_commerce"}"#,
        )
        .expect("parse");
        match msg {
            ClientWsMessage::Scenario { pattern, difficulty, scene } => {
                assert_eq!(pattern, Pattern::FactoryMethod);
                assert_eq!(difficulty, Difficulty::Beginner);
                assert_eq!(scene, Scene::ECommerce);
            }
            other => panic!("unexpected message: {:?}", other),
        }

        let msg: ClientWsMessage =
            serde_json::from_str(r#"{"type":"quiz_answer","selected":"A"}"#).expect("parse");
        assert!(matches!(msg, ClientWsMessage::QuizAnswer { selected } if selected == "A"));
    }

    #[test]
    fn flow_outcomes_are_status_tagged() {
        let v = serde_json::to_value(RefactorOut::FormatError {
            message: "no marker".into(),
            raw: "raw text".into(),
        })
        .expect("serialize");
        assert_eq!(v["status"], "format_error");
        assert_eq!(v["raw"], "raw text");

        let v = serde_json::to_value(ScenarioOut::Ok { content: "文案".into() }).expect("serialize");
        assert_eq!(v["status"], "ok");
    }

    #[test]
    fn missing_wrong_explanations_are_omitted_from_the_wire() {
        let v = serde_json::to_value(QuizAnswerOut::Ok {
            correct: false,
            answer: "B".into(),
            answer_label: "单例模式".into(),
            correct_explanation: "解析".into(),
            wrong_options: vec![WrongOptionOut { key: "A".into(), label: "工厂方法模式".into(), explanation: None }],
        })
        .expect("serialize");
        assert!(v["wrongOptions"][0].get("explanation").is_none());
    }
}
