//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure leaves the API as `{"message": "..."}`. Internal detail
//! (upstream bodies, store errors) is logged, never returned.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use rebut_llm::GatewayError;
use serde_json::json;
use thiserror::Error;

const RATE_LIMITED_MESSAGE: &str =
  "API rate limit reached. Please try again in a few seconds.";
const INTERNAL_MESSAGE: &str =
  "An unexpected error occurred. Please try again later.";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  NotFound(String),

  /// Generation of `what` (e.g. "debate points") failed upstream.
  #[error("failed to generate {what}: {source}")]
  Generation {
    what:   &'static str,
    #[source]
    source: GatewayError,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn generation(what: &'static str) -> impl FnOnce(GatewayError) -> Self {
    move |source| ApiError::Generation { what, source }
  }

  pub fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    ApiError::Store(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Generation { what, source } => {
        tracing::error!(error = %source, "error generating {what}");
        let message = if source.is_rate_limited() {
          RATE_LIMITED_MESSAGE.to_owned()
        } else {
          format!("Failed to generate {what} from AI service")
        };
        (StatusCode::INTERNAL_SERVER_ERROR, message)
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store error");
        (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_owned())
      }
    };
    (status, Json(json!({ "message": message }))).into_response()
  }
}

// ─── Extractor rejections ────────────────────────────────────────────────────

impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self {
    ApiError::Validation(format!("Validation error: {}", r.body_text()))
  }
}

impl From<PathRejection> for ApiError {
  fn from(r: PathRejection) -> Self {
    ApiError::Validation(format!("Validation error: {}", r.body_text()))
  }
}

impl From<QueryRejection> for ApiError {
  fn from(r: QueryRejection) -> Self {
    ApiError::Validation(format!("Validation error: {}", r.body_text()))
  }
}
