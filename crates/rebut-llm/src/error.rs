//! Error types for the model gateway.

use thiserror::Error;

/// Why text returned by the model could not be turned into the expected shape.
#[derive(Debug, Error)]
pub enum ExtractError {
  #[error("no JSON {0} found in model output")]
  NoJson(&'static str),

  #[error("model output is not valid JSON after repair: {0}")]
  Unrepairable(#[source] serde_json::Error),

  #[error("model output does not match the expected shape: {0}")]
  Shape(String),
}

/// A failed generation.
#[derive(Debug, Error)]
pub enum GatewayError {
  /// Every attempt was answered with HTTP 429.
  #[error("upstream rate limit still in effect after {attempts} attempts")]
  RateLimited { attempts: u32 },

  /// Any other non-success status.
  #[error("upstream returned {status}: {body}")]
  Upstream { status: u16, body: String },

  #[error("malformed model response: {0}")]
  MalformedResponse(String),

  #[error("transport error: {0}")]
  Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<ExtractError> for GatewayError {
  fn from(e: ExtractError) -> Self {
    GatewayError::MalformedResponse(e.to_string())
  }
}

impl GatewayError {
  pub fn is_rate_limited(&self) -> bool {
    matches!(self, GatewayError::RateLimited { .. })
  }
}
