//! Prompt builders for the three teaching flows.
//!
//! Each builder is a pure function: typed choices in, deterministic prompt
//! string out. The templates themselves live in `config::Prompts` so they can
//! be overridden from TOML without touching code.

use crate::config::Prompts;
use crate::domain::{Difficulty, Pattern, Scene};
use crate::util::fill_template;

/// Compose the scenario-generator prompt ("teach me pattern X in scenario Y
/// at difficulty Z"). The reply is free text and rendered as-is.
pub fn build_scenario_prompt(
  prompts: &Prompts,
  pattern: Pattern,
  difficulty: Difficulty,
  scene: Scene,
) -> String {
  fill_template(
    &prompts.scenario_user_template,
    &[
      ("pattern", pattern.label()),
      ("scene", scene.label()),
      ("difficulty", difficulty.label()),
    ],
  )
}

/// Compose the refactor prompt for user-provided Java source. Callers must
/// reject blank `source_code` before ever building a prompt.
pub fn build_refactor_prompt(prompts: &Prompts, target_pattern: Pattern, source_code: &str) -> String {
  fill_template(
    &prompts.refactor_user_template,
    &[
      ("pattern", target_pattern.label()),
      ("source_code", source_code),
    ],
  )
}

/// Compose the quiz prompt. Fixed template, no parameters: the model picks
/// the scenario and shuffles which option key is correct.
pub fn build_quiz_prompt(prompts: &Prompts) -> String {
  prompts.quiz_user_template.clone()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scenario_prompt_embeds_all_three_labels() {
    let prompts = Prompts::default();
    let p = build_scenario_prompt(&prompts, Pattern::FactoryMethod, Difficulty::Beginner, Scene::Payment);
    assert!(p.contains("工厂方法模式"));
    assert!(p.contains("支付"));
    assert!(p.contains("入门"));
    assert!(!p.contains("{pattern}"));
  }

  #[test]
  fn refactor_prompt_embeds_pattern_and_source() {
    let prompts = Prompts::default();
    let code = "public class OrderService {}";
    let p = build_refactor_prompt(&prompts, Pattern::Singleton, code);
    assert!(p.contains("单例模式"));
    assert!(p.contains(code));
    assert!(!p.contains("{source_code}"));
  }

  #[test]
  fn quiz_prompt_is_constant() {
    let prompts = Prompts::default();
    assert_eq!(build_quiz_prompt(&prompts), build_quiz_prompt(&prompts));
    assert_eq!(build_quiz_prompt(&prompts), prompts.quiz_user_template);
  }

  #[test]
  fn builders_are_deterministic() {
    let prompts = Prompts::default();
    let a = build_scenario_prompt(&prompts, Pattern::Prototype, Difficulty::Intermediate, Scene::Logging);
    let b = build_scenario_prompt(&prompts, Pattern::Prototype, Difficulty::Intermediate, Scene::Logging);
    assert_eq!(a, b);
  }
}
