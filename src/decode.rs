//! Decoders for model output: the refactor-response splitter and the strict
//! quiz JSON decoder.
//!
//! Flow:
//! 1) The gateway hands back raw text exactly as the model produced it.
//! 2) `split_refactor_response` cuts it at the fixed section heading.
//! 3) `decode_quiz_response` strips incidental code fences, parses the JSON,
//!    and validates structure before a `QuizRecord` is ever constructed.
//!
//! Every failure returns `ParseError` carrying the raw text, so callers can
//! always show what the model actually said.

use serde_json::Value;

use crate::domain::{QuizOption, QuizRecord};

/// Section heading separating optimized code from its interpretation.
/// Must occur exactly once in a well-formed refactor reply.
pub const REFACTOR_SPLIT_MARKER: &str = "### 优化解读";

/// A decode failure: why, plus the unmodified model output for display.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
  pub reason: String,
  pub raw: String,
}

impl std::fmt::Display for ParseError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.reason)
  }
}

/// The two ordered regions of a refactor reply.
/// `optimized_code` + `explanation` reconstructs the source text exactly
/// (the marker stays at the head of `explanation`).
#[derive(Clone, Debug, PartialEq)]
pub struct SplitDocument {
  pub optimized_code: String,
  pub explanation: String,
}

/// Split a refactor reply at `REFACTOR_SPLIT_MARKER`.
///
/// Exactly one occurrence is required. Zero occurrences means the model
/// ignored the output format; more than one means the split point is
/// ambiguous. Both are reported as the same format error.
pub fn split_refactor_response(text: &str) -> Result<SplitDocument, ParseError> {
  let occurrences: Vec<usize> = text.match_indices(REFACTOR_SPLIT_MARKER).map(|(i, _)| i).collect();
  match occurrences.as_slice() {
    [at] => Ok(SplitDocument {
      optimized_code: text[..*at].to_string(),
      explanation: text[*at..].to_string(),
    }),
    [] => Err(ParseError {
      reason: format!("Reply does not contain the '{}' section heading.", REFACTOR_SPLIT_MARKER),
      raw: text.to_string(),
    }),
    many => Err(ParseError {
      reason: format!(
        "Reply contains the '{}' section heading {} times; expected exactly one.",
        REFACTOR_SPLIT_MARKER,
        many.len()
      ),
      raw: text.to_string(),
    }),
  }
}

/// Remove incidental Markdown code-fence markers around a JSON payload.
/// Models regularly wrap "strict JSON" replies in ```json fences despite
/// being told not to; the fence substrings are dropped wherever they appear.
pub fn strip_code_fences(text: &str) -> String {
  text
    .trim()
    .replace("```json", "")
    .replace("```", "")
    .trim()
    .to_string()
}

/// Decode a quiz reply into a `QuizRecord` with the selection unset.
///
/// Validation order: fence stripping, JSON syntax, presence of the five
/// top-level keys, field types, `explanation.correct`, and finally the
/// answer-membership invariant. Nothing partial ever escapes: either the
/// whole record decodes or the caller gets a `ParseError`.
pub fn decode_quiz_response(text: &str) -> Result<QuizRecord, ParseError> {
  let cleaned = strip_code_fences(text);

  let root: Value = serde_json::from_str(&cleaned).map_err(|e| ParseError {
    reason: format!("Invalid JSON: {}", e),
    raw: text.to_string(),
  })?;

  let obj = root.as_object().ok_or_else(|| ParseError {
    reason: "Incomplete structure: top level is not a JSON object.".into(),
    raw: text.to_string(),
  })?;

  for key in ["scene", "question", "options", "answer", "explanation"] {
    if !obj.contains_key(key) {
      return Err(ParseError {
        reason: format!("Incomplete structure: missing '{}' key.", key),
        raw: text.to_string(),
      });
    }
  }

  let field_str = |key: &str| -> Result<String, ParseError> {
    obj[key]
      .as_str()
      .map(|s| s.to_string())
      .ok_or_else(|| ParseError {
        reason: format!("Incomplete structure: '{}' is not a string.", key),
        raw: text.to_string(),
      })
  };

  let scene = field_str("scene")?;
  let question = field_str("question")?;
  let answer = field_str("answer")?;

  // serde_json's preserve_order map keeps the options in emission order.
  let options_obj = obj["options"].as_object().ok_or_else(|| ParseError {
    reason: "Incomplete structure: 'options' is not an object.".into(),
    raw: text.to_string(),
  })?;
  let mut options = Vec::with_capacity(options_obj.len());
  for (key, label) in options_obj {
    let label = label.as_str().ok_or_else(|| ParseError {
      reason: format!("Incomplete structure: option '{}' label is not a string.", key),
      raw: text.to_string(),
    })?;
    options.push(QuizOption { key: key.clone(), label: label.to_string() });
  }

  let explanation_obj = obj["explanation"].as_object().ok_or_else(|| ParseError {
    reason: "Incomplete structure: 'explanation' is not an object.".into(),
    raw: text.to_string(),
  })?;
  // Only string entries are kept; a malformed incorrect_* entry degrades to
  // omission later, but 'correct' itself is mandatory.
  let explanation: std::collections::HashMap<String, String> = explanation_obj
    .iter()
    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
    .collect();
  if !explanation.contains_key("correct") {
    return Err(ParseError {
      reason: "Incomplete structure: 'explanation.correct' is missing.".into(),
      raw: text.to_string(),
    });
  }

  if !options.iter().any(|o| o.key == answer) {
    return Err(ParseError {
      reason: format!("Answer key '{}' is not among the option keys.", answer),
      raw: text.to_string(),
    });
  }

  Ok(QuizRecord {
    scene,
    question,
    options,
    answer,
    explanation,
    selected: None,
  })
}
