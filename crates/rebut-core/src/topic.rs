//! Generation request types: what the caller asks the model to argue about.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Default output language when the caller does not name one.
pub const DEFAULT_LANGUAGE: &str = "english";

/// How sophisticated the generated arguments should be.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Complexity {
  Beginner,
  #[default]
  Intermediate,
  Advanced,
  Expert,
}

/// Which side of the motion a rebuttal is written for.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Side {
  Proposition,
  Opposition,
}

/// A validated request to generate a full set of debate points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DebateTopicRequest {
  pub topic:      String,
  pub language:   String,
  pub complexity: Complexity,
}

impl DebateTopicRequest {
  /// Build a request with the default language and complexity.
  pub fn new(topic: impl Into<String>) -> Self {
    Self {
      topic:      topic.into(),
      language:   DEFAULT_LANGUAGE.to_owned(),
      complexity: Complexity::default(),
    }
  }
}
