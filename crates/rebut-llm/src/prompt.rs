//! Prompt construction.
//!
//! Pure string templating: no I/O, no validation. Language and complexity are
//! embedded verbatim; callers are expected to have validated them already.

use rebut_core::topic::{Complexity, Side};

/// Token ceiling for a full debate breakdown.
pub const DEBATE_MAX_TOKENS: u32 = 4000;
/// Token ceiling for rebuttal and counter-argument lists.
pub const LIST_MAX_TOKENS: u32 = 1000;

const DEBATE_SYSTEM: &str = "You are an expert debate coach who provides \
  comprehensive analysis of debate topics with well-structured arguments and \
  rebuttals.";

const REBUTTAL_SYSTEM: &str =
  "You are an expert debate coach specializing in creating effective rebuttals.";

const COUNTER_SYSTEM: &str = "You are an expert debater specializing in \
  identifying weaknesses in arguments and creating effective counter-arguments.";

/// A system + user instruction pair, plus the completion budget it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
  pub system:     String,
  pub user:       String,
  pub max_tokens: u32,
}

/// Ask for a full breakdown of `topic` as a five-key JSON object.
pub fn debate_prompt(topic: &str, language: &str, complexity: Complexity) -> Prompt {
  let user = format!(
    r#"Generate comprehensive debate points on the topic: "{topic}"

LANGUAGE: {language}
COMPLEXITY: {complexity}

In your response, provide:
1. At least 5 compelling points for the proposition side
2. At least 5 compelling points for the opposition side
3. At least 3 potential rebuttals for the proposition side
4. At least 3 potential rebuttals for the opposition side
5. IMPORTANT: You must include at least 5 pieces of supporting evidence with reliable sources

Return your response as a single JSON object with exactly this structure and no other text:
{{
  "proposition": ["point1", "point2", ...],
  "opposition": ["point1", "point2", ...],
  "propositionRebuttals": ["rebuttal1", "rebuttal2", ...],
  "oppositionRebuttals": ["rebuttal1", "rebuttal2", ...],
  "evidence": [{{"point": "...", "sources": ["source1", "source2", ...]}}, ...],
  "language": "{language}"
}}"#
  );

  Prompt {
    system: DEBATE_SYSTEM.to_owned(),
    user,
    max_tokens: DEBATE_MAX_TOKENS,
  }
}

/// Ask for `count` extra rebuttals on behalf of `side`.
pub fn rebuttal_prompt(topic: &str, side: Side, count: u8, language: &str) -> Prompt {
  let user = format!(
    r#"Generate {count} additional rebuttal points for the "{side}" side of the debate topic: "{topic}".

Make these rebuttals strong, concise, and focused on countering the main arguments of the opposing side.

PROVIDE ALL CONTENT IN THE {language} LANGUAGE.

Return only the array of rebuttals in JSON format:
["rebuttal1", "rebuttal2", ...]

Make sure the output is properly formatted JSON that can be parsed."#
  );

  Prompt {
    system: REBUTTAL_SYSTEM.to_owned(),
    user,
    max_tokens: LIST_MAX_TOKENS,
  }
}

/// Ask for `count` counter-arguments against `argument`, optionally framed by
/// the debate `topic` it came from.
pub fn counter_argument_prompt(
  argument: &str,
  topic: Option<&str>,
  count: u8,
  language: &str,
) -> Prompt {
  let context = topic
    .map(|t| format!(" for the debate topic \"{t}\""))
    .unwrap_or_default();

  let user = format!(
    r#"Generate {count} effective counter-arguments against the following argument{context}:

"{argument}"

Make these counter-arguments strong, logical, and focused on weaknesses in the original argument.

PROVIDE ALL CONTENT IN THE {language} LANGUAGE.

Return only the array of counter-arguments in JSON format:
["counter1", "counter2", ...]

Make sure the output is properly formatted JSON that can be parsed."#
  );

  Prompt {
    system: COUNTER_SYSTEM.to_owned(),
    user,
    max_tokens: LIST_MAX_TOKENS,
  }
}
