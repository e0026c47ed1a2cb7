//! Loading tutor configuration (prompt templates) from TOML.
//!
//! See `TutorConfig` and `Prompts` for the expected schema.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct TutorConfig {
  #[serde(default)]
  pub prompts: Prompts,
}

/// Prompt templates used by the three teaching flows. Defaults carry the
/// canonical Chinese teaching prompts; override them in TOML if you need to
/// tune tone/structure. Placeholders use `{key}` syntax (see `util::fill_template`).
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  /// Scenario generator. Placeholders: {pattern}, {scene}, {difficulty}.
  pub scenario_user_template: String,
  /// Refactor comparator. Placeholders: {pattern}, {source_code}.
  pub refactor_user_template: String,
  /// Quiz question generator. No placeholders; must demand strict JSON.
  pub quiz_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      scenario_user_template: r#"作为一名Java教学专家，请为我生成一个关于“{pattern}”的教学案例，要求如下：
1.  **业务场景**: 设定一个具体的“{scene}”领域的业务场景，难度为“{difficulty}”。场景描述要简洁，不超过150字。
2.  **有耦合问题的原始Java代码**: 提供一段符合Java 8规范的原始代码。这段代码要能体现出业务逻辑，但存在明显的设计问题（例如，违反开闭原则、对象创建复杂等），从而引出使用“{pattern}”的必要性。代码必须是完整的、可编译的。
3.  **模式触发点**: 在代码下方，用一两句话明确指出“为什么需要用这个模式？”。要一针见血，点出原始代码的痛点。

请严格按照以下格式输出，不要有任何多余的解释：
### 业务场景
[这里是业务场景描述]

### 原始Java代码
```java
// [这里是完整的Java代码]
```

### 模式触发点
[这里是模式触发点的说明]
"#
      .into(),

      refactor_user_template: r#"作为一名Java架构师，请对我提供的Java代码进行重构。要求如下：
1.  **目标**: 使用“{pattern}”来优化这段代码。
2.  **生成优化代码**: 提供完整的、优化后的Java代码。在关键的修改处，必须添加简短的中文注释，解释这行代码的作用。代码必须符合Java 8规范。
3.  **生成三句话优化解读**:
    - 第一句：明确指出解决了原始代码的什么痛点（例如，硬编码、高耦合等）。
    - 第二句：说明“{pattern}”的核心价值和作用是什么。
    - 第三句：提出一个启发性问题，引导学生思考模式带来的好处。例如：“如果后续新增XX，原始代码需要改哪里？优化代码为什么不用改？”

这是我的原始代码：
```java
{source_code}
```

请严格按照以下格式输出：
### 优化后的Java代码
```java
// [这里是带有关键注释的优化代码]
```

### 优化解读
- **解决痛点**: [第一句话]
- **模式价值**: [第二句话]
- **启发思考**: [第三句话]
"#
      .into(),

      quiz_user_template: r#"作为一名Java面试官，请为我出一道关于创建型设计模式（工厂方法、单例、原型）的选择题。
要求：
1.  场景描述: 描述一个常见的软件开发场景，其中隐含了某个设计问题。
2.  问题: 提出问题：“在这种情况下，最适合使用哪种设计模式来解决问题？”
3.  选项: 提供三个选项，一个是正确答案，另外两个是具有迷惑性的干扰项。
4.  答案与解析: 给出正确答案的键（例如A, B, C），并提供详细解析。解析需要解释为什么正确答案是合适的，以及为什么另外两个干扰项不合适。解析要通俗易懂。

请严格按照以下JSON格式输出，不要有任何多余的文字或代码块标记：
{
  "scene": "这里是场景描述...",
  "question": "在这种情况下，最适合使用哪种设计模式来解决问题？",
  "options": {
    "A": "工厂方法模式",
    "B": "单例模式",
    "C": "原型模式"
  },
  "answer": "A",
  "explanation": {
    "correct": "这里解释为什么A是正确的...",
    "incorrect_B": "这里解释为什么B是错误的...",
    "incorrect_C": "这里解释为什么C是错误的..."
  }
}
"#
      .into(),
    }
  }
}

/// Attempt to load `TutorConfig` from TUTOR_CONFIG_PATH. On any parsing/IO
/// error, returns None and the caller falls back to defaults.
pub fn load_tutor_config_from_env() -> Option<TutorConfig> {
  let path = std::env::var("TUTOR_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<TutorConfig>(&s) {
      Ok(cfg) => {
        info!(target: "patterncoach_backend", %path, "Loaded tutor config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "patterncoach_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "patterncoach_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_templates_carry_their_placeholders() {
    let p = Prompts::default();
    for key in ["{pattern}", "{scene}", "{difficulty}"] {
      assert!(p.scenario_user_template.contains(key), "scenario missing {key}");
    }
    for key in ["{pattern}", "{source_code}"] {
      assert!(p.refactor_user_template.contains(key), "refactor missing {key}");
    }
    // The quiz template is parameterless and demands strict JSON.
    assert!(!p.quiz_user_template.contains("{pattern}"));
    assert!(p.quiz_user_template.contains("\"answer\""));
  }

  #[test]
  fn refactor_template_demands_the_split_marker() {
    let p = Prompts::default();
    assert!(p.refactor_user_template.contains("### 优化解读"));
  }

  #[test]
  fn toml_override_replaces_templates() {
    let toml_src = r#"
[prompts]
scenario_user_template = "s {pattern} {scene} {difficulty}"
refactor_user_template = "r {pattern} {source_code}"
quiz_user_template = "q"
"#;
    let cfg: TutorConfig = toml::from_str(toml_src).expect("toml");
    assert_eq!(cfg.prompts.scenario_user_template, "s {pattern} {scene} {difficulty}");
    assert_eq!(cfg.prompts.quiz_user_template, "q");
  }
}
