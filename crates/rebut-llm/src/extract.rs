//! Best-effort recovery of JSON from model output.
//!
//! Generation models asked for JSON frequently answer with near-JSON: prose
//! around the payload, markdown fences, bare object keys, single-quoted
//! strings, trailing commas. [`recover`] tries progressively looser readings
//! of the text before giving up:
//!
//! 1. the whole text, as-is;
//! 2. the first balanced `{…}` / `[…]` span;
//! 3. that span after [`repair`].
//!
//! This is a heuristic, not a parser. It never guesses at missing content: a
//! syntactically valid payload that lacks a required field is a
//! [`ExtractError::Shape`] failure.

use rebut_core::debate::DebatePoint;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ExtractError;

// ─── Target shapes ───────────────────────────────────────────────────────────

/// A structure the model can be asked to produce.
pub trait Shape: DeserializeOwned {
  /// Delimiters of the top-level JSON value (`{}` or `[]`).
  const OPEN: char;
  const CLOSE: char;
  /// Human-readable name used in error messages.
  const NAME: &'static str;

  /// Structural constraints beyond what deserialisation enforces.
  fn check(&self) -> Result<(), String> {
    Ok(())
  }
}

impl Shape for DebatePoint {
  const OPEN: char = '{';
  const CLOSE: char = '}';
  const NAME: &'static str = "object";

  fn check(&self) -> Result<(), String> {
    self.check_evidence().map_err(|e| e.to_string())
  }
}

impl Shape for Vec<String> {
  const OPEN: char = '[';
  const CLOSE: char = ']';
  const NAME: &'static str = "array";
}

// ─── Recovery ────────────────────────────────────────────────────────────────

/// Extract a value of shape `S` from free-form model output.
pub fn recover<S: Shape>(text: &str) -> Result<S, ExtractError> {
  let text = text.trim();
  let mut mismatch = None;

  match read::<S>(text) {
    Reading::Parsed(parsed) => return Ok(parsed),
    Reading::Mismatch(m) => mismatch = Some(m),
    Reading::Syntax(_) => {}
  }

  let Some(span) = balanced_span(text, S::OPEN, S::CLOSE) else {
    return Err(match mismatch {
      Some(m) => ExtractError::Shape(m),
      None => ExtractError::NoJson(S::NAME),
    });
  };

  tracing::debug!(shape = S::NAME, "model output is not bare JSON; extracting");
  let repaired = repair(span);
  let mut syntax = None;
  for candidate in [span, repaired.as_str()] {
    match read::<S>(candidate) {
      Reading::Parsed(parsed) => return Ok(parsed),
      Reading::Mismatch(m) => mismatch = Some(m),
      Reading::Syntax(e) => syntax = Some(e),
    }
  }

  // A payload that parsed but did not fit is the more useful diagnosis.
  Err(match (mismatch, syntax) {
    (Some(m), _) => ExtractError::Shape(m),
    (None, Some(e)) => ExtractError::Unrepairable(e),
    (None, None) => ExtractError::NoJson(S::NAME),
  })
}

/// Outcome of reading one candidate string.
enum Reading<S> {
  Parsed(S),
  /// Valid JSON of the wrong shape.
  Mismatch(String),
  /// Not JSON at all.
  Syntax(serde_json::Error),
}

fn read<S: Shape>(candidate: &str) -> Reading<S> {
  let value: Value = match serde_json::from_str(candidate) {
    Ok(v) => v,
    Err(e) => return Reading::Syntax(e),
  };
  match serde_json::from_value::<S>(value) {
    Ok(parsed) => match parsed.check() {
      Ok(()) => Reading::Parsed(parsed),
      Err(m) => Reading::Mismatch(m),
    },
    Err(e) => Reading::Mismatch(e.to_string()),
  }
}

/// Locate the first balanced `open…close` span in `text`.
///
/// Delimiters inside double-quoted strings are ignored. If the text is
/// truncated and never balances, fall back to the span from the first `open`
/// to the last `close`.
pub fn balanced_span(text: &str, open: char, close: char) -> Option<&str> {
  let start = text.find(open)?;
  let mut depth = 0usize;
  let mut in_string = false;
  let mut escaped = false;

  for (i, c) in text[start..].char_indices() {
    if in_string {
      if escaped {
        escaped = false;
      } else if c == '\\' {
        escaped = true;
      } else if c == '"' {
        in_string = false;
      }
      continue;
    }

    if c == '"' {
      in_string = true;
    } else if c == open {
      depth += 1;
    } else if c == close {
      depth -= 1;
      if depth == 0 {
        return Some(&text[start..start + i + c.len_utf8()]);
      }
    }
  }

  let end = text.rfind(close)?;
  (end > start).then(|| &text[start..end + close.len_utf8()])
}

// ─── Repair ──────────────────────────────────────────────────────────────────

/// Apply light syntactic fixes to near-JSON.
///
/// - quote bare object keys: `{proposition: [...]}` → `{"proposition": [...]}`
/// - double-quote single-quoted strings: `'text'` → `"text"`
/// - drop trailing commas before `}` / `]`
///
/// Double-quoted strings are copied through untouched, so their contents are
/// never mistaken for keys, quotes or commas.
pub fn repair(text: &str) -> String {
  let chars: Vec<char> = text.chars().collect();
  let mut out = String::with_capacity(text.len() + 16);
  // Last non-whitespace character emitted outside a string.
  let mut last = None;
  let mut i = 0;

  while i < chars.len() {
    let c = chars[i];
    match c {
      '"' => {
        let end = string_end(&chars, i);
        out.extend(&chars[i..end]);
        last = Some('"');
        i = end;
      }
      '\'' => {
        let end = string_end(&chars, i);
        requote(&chars[i + 1..end], &mut out);
        last = Some('"');
        i = end;
      }
      ',' if matches!(next_significant(&chars, i + 1), Some('}' | ']')) => {
        i += 1;
      }
      c if is_key_start(c) && matches!(last, Some('{' | ',')) => {
        let end = i + chars[i..].iter().take_while(|&&c| is_key_char(c)).count();
        let key = &chars[i..end];
        if next_significant(&chars, end) == Some(':') {
          out.push('"');
          out.extend(key);
          out.push('"');
        } else {
          out.extend(key);
        }
        last = key.last().copied();
        i = end;
      }
      c => {
        out.push(c);
        if !c.is_whitespace() {
          last = Some(c);
        }
        i += 1;
      }
    }
  }
  out
}

/// Index just past the string literal opening at `start`, or the end of input
/// if it is never closed.
fn string_end(chars: &[char], start: usize) -> usize {
  let quote = chars[start];
  let mut escaped = false;
  for (offset, &c) in chars[start + 1..].iter().enumerate() {
    if escaped {
      escaped = false;
    } else if c == '\\' {
      escaped = true;
    } else if c == quote {
      return start + offset + 2;
    }
  }
  chars.len()
}

/// Write the rest of a single-quoted literal (everything after the opening
/// quote; the closing quote may be missing) as a double-quoted JSON string.
fn requote(literal: &[char], out: &mut String) {
  let body = match literal.split_last() {
    Some(('\'', body)) => body,
    _ => literal,
  };
  out.push('"');
  let mut chars = body.iter().peekable();
  while let Some(&c) = chars.next() {
    match c {
      '\\' if chars.peek() == Some(&&'\'') => {
        out.push('\'');
        chars.next();
      }
      '\\' => {
        out.push('\\');
        if let Some(&next) = chars.next() {
          out.push(next);
        }
      }
      '"' => out.push_str("\\\""),
      c => out.push(c),
    }
  }
  out.push('"');
}

fn next_significant(chars: &[char], from: usize) -> Option<char> {
  chars[from..].iter().copied().find(|c| !c.is_whitespace())
}

fn is_key_start(c: char) -> bool {
  c.is_ascii_alphabetic() || c == '_'
}

fn is_key_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '_'
}
