//! Request payload validation.
//!
//! Bodies are first deserialised into loose structs (every field optional),
//! then checked field by field. All violations are collected and reported
//! together in a single 400.

use std::str::FromStr;

use crate::error::ApiError;

/// Accumulates constraint violations for one payload.
#[derive(Debug, Default)]
pub struct Validator {
  issues: Vec<String>,
}

impl Validator {
  pub fn new() -> Self {
    Self::default()
  }

  fn issue(&mut self, field: &str, message: impl AsRef<str>) {
    self.issues.push(format!("{} at \"{field}\"", message.as_ref()));
  }

  /// Require `value` to be present.
  pub fn required<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
      self.issue(field, "Required");
    }
    value
  }

  /// Require `value` to be between `min` and `max` characters long.
  pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) {
    let len = value.chars().count();
    if len < min {
      self.issue(field, format!("String must contain at least {min} character(s)"));
    } else if len > max {
      self.issue(field, format!("String must contain at most {max} character(s)"));
    }
  }

  /// [`Self::length`] for an optional field; absent values pass.
  pub fn length_opt(&mut self, field: &str, value: Option<&str>, min: usize, max: usize) {
    if let Some(v) = value {
      self.length(field, v, min, max);
    }
  }

  /// Require `value` to lie in `min..=max`.
  pub fn range(&mut self, field: &str, value: i64, min: i64, max: i64) {
    if value < min {
      self.issue(field, format!("Number must be greater than or equal to {min}"));
    } else if value > max {
      self.issue(field, format!("Number must be less than or equal to {max}"));
    }
  }

  /// Parse `value` as one of a fixed set of lowercase variants.
  pub fn one_of<T: FromStr>(&mut self, field: &str, value: &str, allowed: &[&str]) -> Option<T> {
    match value.parse::<T>() {
      Ok(parsed) => Some(parsed),
      Err(_) => {
        let expected = allowed
          .iter()
          .map(|a| format!("'{a}'"))
          .collect::<Vec<_>>()
          .join(" | ");
        self.issue(
          field,
          format!("Invalid enum value. Expected {expected}, received '{value}'"),
        );
        None
      }
    }
  }

  /// Record a free-form violation.
  pub fn invalid(&mut self, field: &str, message: impl AsRef<str>) {
    self.issue(field, message);
  }

  /// Like [`Self::finish`], but hand back the checked fields on success.
  ///
  /// `fields` is normally the `zip` of the [`Self::required`] results, which
  /// is only `None` when a violation has already been recorded.
  pub fn finish_with<T>(self, fields: Option<T>) -> Result<T, ApiError> {
    self.finish()?;
    fields.ok_or_else(|| ApiError::Validation("Validation error".to_owned()))
  }

  /// `Ok(())` if nothing was recorded, otherwise a combined validation error.
  pub fn finish(self) -> Result<(), ApiError> {
    if self.issues.is_empty() {
      Ok(())
    } else {
      Err(ApiError::Validation(format!(
        "Validation error: {}",
        self.issues.join("; ")
      )))
    }
  }
}

#[cfg(test)]
mod tests {
  use rebut_core::topic::Complexity;

  use super::*;

  fn message(v: Validator) -> String {
    match v.finish() {
      Err(ApiError::Validation(m)) => m,
      other => panic!("expected validation error, got {other:?}"),
    }
  }

  #[test]
  fn clean_payload_passes() {
    let mut v = Validator::new();
    v.length("topic", "Nuclear power", 3, 200);
    v.range("count", 3, 1, 5);
    assert!(v.finish().is_ok());
  }

  #[test]
  fn issues_are_collected_in_order() {
    let mut v = Validator::new();
    v.length("topic", "ab", 3, 200);
    v.range("count", 9, 1, 5);
    v.required::<String>("side", None);
    assert_eq!(
      message(v),
      "Validation error: String must contain at least 3 character(s) at \"topic\"; \
       Number must be less than or equal to 5 at \"count\"; Required at \"side\""
    );
  }

  #[test]
  fn length_counts_characters_not_bytes() {
    let mut v = Validator::new();
    v.length("language", "日本", 2, 30);
    assert!(v.finish().is_ok());
  }

  #[test]
  fn one_of_reports_allowed_values() {
    let mut v = Validator::new();
    let parsed: Option<Complexity> =
      v.one_of("complexity", "moderate", &["beginner", "expert"]);
    assert!(parsed.is_none());
    assert!(message(v).contains("Expected 'beginner' | 'expert', received 'moderate'"));
  }
}
