//! Domain models: pattern/difficulty/scene choices and the quiz record.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Which creational pattern a flow is teaching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
  FactoryMethod,
  Singleton,
  Prototype,
}

impl Pattern {
  /// Display label used inside prompts and quiz options.
  pub fn label(&self) -> &'static str {
    match self {
      Pattern::FactoryMethod => "工厂方法模式",
      Pattern::Singleton => "单例模式",
      Pattern::Prototype => "原型模式",
    }
  }
}

/// Teaching difficulty for the scenario generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Beginner,
  Intermediate,
}

impl Difficulty {
  pub fn label(&self) -> &'static str {
    match self {
      Difficulty::Beginner => "入门",
      Difficulty::Intermediate => "进阶",
    }
  }
}

/// Business domain the generated scenario is set in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
  ECommerce,
  Logging,
  Payment,
}

impl Scene {
  pub fn label(&self) -> &'static str {
    match self {
      Scene::ECommerce => "电商",
      Scene::Logging => "日志",
      Scene::Payment => "支付",
    }
  }
}

/// One quiz choice: single-letter key plus its pattern label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
  pub key: String,
  pub label: String,
}

/// One decoded quiz question plus the user's (optional) answer selection.
///
/// Invariants (enforced at decode time): `answer` is one of the option keys;
/// option order is exactly the order the model emitted. `selected` is set at
/// most once per record; the record and its selection are always replaced
/// together.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizRecord {
  pub scene: String,
  pub question: String,
  pub options: Vec<QuizOption>,
  pub answer: String,
  pub explanation: HashMap<String, String>,
  pub selected: Option<String>,
}

/// Grading output derived from a recorded selection.
#[derive(Clone, Debug, PartialEq)]
pub struct Grading {
  pub correct: bool,
  pub answer: String,
  pub answer_label: String,
  pub correct_explanation: String,
  pub wrong_options: Vec<WrongOption>,
}

/// Review entry for one non-answer option. `explanation` is best-effort:
/// absent when the model supplied no matching `incorrect_*` entry.
#[derive(Clone, Debug, PartialEq)]
pub struct WrongOption {
  pub key: String,
  pub label: String,
  pub explanation: Option<String>,
}

impl QuizRecord {
  pub fn option_label(&self, key: &str) -> Option<&str> {
    self
      .options
      .iter()
      .find(|o| o.key == key)
      .map(|o| o.label.as_str())
  }

  /// Case-insensitive lookup of the explanation for a wrong option:
  /// `incorrect_<K uppercase>` first, then `incorrect_<K lowercase>`.
  pub fn explanation_for_wrong(&self, key: &str) -> Option<&str> {
    let upper = format!("incorrect_{}", key.to_uppercase());
    let lower = format!("incorrect_{}", key.to_lowercase());
    self
      .explanation
      .get(&upper)
      .or_else(|| self.explanation.get(&lower))
      .map(|s| s.as_str())
  }

  /// Record the user's selection and grade it. Pure and synchronous.
  ///
  /// The selection sticks: re-submitting the same key returns the same
  /// grading, a different key is rejected.
  pub fn select(&mut self, key: &str) -> Result<Grading, String> {
    if self.option_label(key).is_none() {
      return Err(format!("Unknown option key: {}", key));
    }
    match &self.selected {
      Some(prev) if prev != key => {
        return Err(format!("Answer already recorded as '{}'.", prev));
      }
      _ => {}
    }
    self.selected = Some(key.to_string());
    Ok(self.grade())
  }

  /// Derive the grading from the recorded selection. Callers must have set
  /// `selected` (via `select`); an unset selection grades as incorrect.
  fn grade(&self) -> Grading {
    let correct = self.selected.as_deref() == Some(self.answer.as_str());
    let answer_label = self.option_label(&self.answer).unwrap_or_default().to_string();
    let correct_explanation = self
      .explanation
      .get("correct")
      .cloned()
      .unwrap_or_default();

    let wrong_options = self
      .options
      .iter()
      .filter(|o| o.key != self.answer)
      .map(|o| WrongOption {
        key: o.key.clone(),
        label: o.label.clone(),
        explanation: self.explanation_for_wrong(&o.key).map(|s| s.to_string()),
      })
      .collect();

    Grading {
      correct,
      answer: self.answer.clone(),
      answer_label,
      correct_explanation,
      wrong_options,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record() -> QuizRecord {
    QuizRecord {
      scene: "系统需要全局唯一的配置中心。".into(),
      question: "最适合使用哪种设计模式？".into(),
      options: vec![
        QuizOption { key: "A".into(), label: "工厂方法模式".into() },
        QuizOption { key: "B".into(), label: "单例模式".into() },
        QuizOption { key: "C".into(), label: "原型模式".into() },
      ],
      answer: "B".into(),
      explanation: HashMap::from([
        ("correct".to_string(), "配置中心只应有一个实例。".to_string()),
        ("incorrect_A".to_string(), "这里没有一族产品需要创建。".to_string()),
        ("incorrect_c".to_string(), "没有复制已有对象的需求。".to_string()),
      ]),
      selected: None,
    }
  }

  #[test]
  fn selecting_the_answer_grades_correct() {
    let mut r = record();
    let g = r.select("B").expect("grading");
    assert!(g.correct);
    assert_eq!(g.answer, "B");
    assert_eq!(g.answer_label, "单例模式");
    assert_eq!(g.correct_explanation, "配置中心只应有一个实例。");
  }

  #[test]
  fn selecting_any_other_key_grades_incorrect() {
    let mut r = record();
    let g = r.select("A").expect("grading");
    assert!(!g.correct);
    assert_eq!(g.answer, "B");
  }

  #[test]
  fn wrong_option_lookup_tolerates_key_case() {
    let r = record();
    // incorrect_A stored uppercase, incorrect_c stored lowercase.
    assert_eq!(r.explanation_for_wrong("A"), Some("这里没有一族产品需要创建。"));
    assert_eq!(r.explanation_for_wrong("C"), Some("没有复制已有对象的需求。"));
  }

  #[test]
  fn missing_wrong_explanation_is_omitted_not_an_error() {
    let mut r = record();
    r.explanation.remove("incorrect_A");
    let g = r.select("C").expect("grading");
    let a = g.wrong_options.iter().find(|w| w.key == "A").expect("A entry");
    assert!(a.explanation.is_none());
    let c = g.wrong_options.iter().find(|w| w.key == "C").expect("C entry");
    assert_eq!(c.explanation.as_deref(), Some("没有复制已有对象的需求。"));
  }

  #[test]
  fn selection_is_recorded_at_most_once() {
    let mut r = record();
    r.select("A").expect("first selection");
    assert!(r.select("B").is_err());
    // Same key again is fine and yields the same grading.
    let g = r.select("A").expect("idempotent re-select");
    assert!(!g.correct);
  }

  #[test]
  fn unknown_option_key_is_rejected() {
    let mut r = record();
    assert!(r.select("D").is_err());
    assert_eq!(r.selected, None);
  }
}
