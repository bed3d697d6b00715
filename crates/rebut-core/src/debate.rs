//! Debate content and saved debate records.
//!
//! A [`DebatePoint`] is what the model produces for a topic. A [`Debate`] is a
//! [`DebatePoint`] that has been saved by a user, together with the
//! store-assigned identity and timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Generated content ───────────────────────────────────────────────────────

/// A supporting claim and the sources that back it.
///
/// Every evidence item owns its own source list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
  pub point:   String,
  pub sources: Vec<String>,
}

/// Structured argument content for a single topic.
///
/// All five list fields are required on deserialisation; a payload missing
/// any of them is rejected rather than defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebatePoint {
  pub proposition:           Vec<String>,
  pub opposition:            Vec<String>,
  pub proposition_rebuttals: Vec<String>,
  pub opposition_rebuttals:  Vec<String>,
  pub evidence:              Vec<Evidence>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub language:              Option<String>,
}

impl DebatePoint {
  /// Reject evidence items that cite nothing.
  pub fn check_evidence(&self) -> Result<()> {
    match self.evidence.iter().position(|e| e.sources.is_empty()) {
      Some(index) => Err(Error::EmptySources(index)),
      None => Ok(()),
    }
  }
}

// ─── Saved debates ───────────────────────────────────────────────────────────

/// A saved debate. Created once, never updated; removed only by deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debate {
  /// Store-assigned; unique and monotonically increasing.
  pub id:         i64,
  pub topic:      String,
  pub points:     DebatePoint,
  /// Not checked against the user table.
  pub user_id:    Option<i64>,
  pub language:   Option<String>,
  pub format:     Option<String>,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::DebateStore::create_debate`].
/// `id` and `created_at` are always set by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDebate {
  pub topic:    String,
  pub points:   DebatePoint,
  pub user_id:  Option<i64>,
  pub language: Option<String>,
  pub format:   Option<String>,
}

impl NewDebate {
  /// Convenience constructor with all optional fields unset.
  pub fn new(topic: impl Into<String>, points: DebatePoint) -> Self {
    Self {
      topic: topic.into(),
      points,
      user_id: None,
      language: None,
      format: None,
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn debate_point_uses_camel_case_keys() {
    let value = json!({
      "proposition": ["a"],
      "opposition": ["b"],
      "propositionRebuttals": [],
      "oppositionRebuttals": [],
      "evidence": [{ "point": "p", "sources": ["s"] }]
    });
    let point: DebatePoint = serde_json::from_value(value.clone()).unwrap();
    assert_eq!(point.proposition, vec!["a"]);
    assert_eq!(point.evidence[0].sources, vec!["s"]);
    assert_eq!(serde_json::to_value(&point).unwrap(), value);
  }

  #[test]
  fn missing_list_field_is_rejected() {
    let value = json!({
      "proposition": ["a"],
      "propositionRebuttals": [],
      "oppositionRebuttals": [],
      "evidence": []
    });
    let err = serde_json::from_value::<DebatePoint>(value).unwrap_err();
    assert!(err.to_string().contains("opposition"), "{err}");
  }

  #[test]
  fn evidence_without_sources_fails_check() {
    let point = DebatePoint {
      proposition:           vec![],
      opposition:            vec![],
      proposition_rebuttals: vec![],
      opposition_rebuttals:  vec![],
      evidence:              vec![
        Evidence { point: "ok".into(), sources: vec!["src".into()] },
        Evidence { point: "bare".into(), sources: vec![] },
      ],
      language:              None,
    };
    assert!(matches!(point.check_evidence(), Err(Error::EmptySources(1))));
  }
}
