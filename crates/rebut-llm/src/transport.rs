//! Wire types and transports for an OpenAI-compatible chat-completion API.
//!
//! [`ChatTransport`] is the seam between the gateway's retry/recovery logic
//! and the network: it sends one request and hands back the raw status and
//! body, without interpreting either.

use std::{future::Future, time::Duration};

use reqwest::{Client, header::RETRY_AFTER};
use serde::{Deserialize, Serialize};

// ─── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  System,
  User,
  Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub role:    Role,
  pub content: String,
}

/// Body of `POST {base_url}/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
  pub model:       String,
  pub messages:    Vec<ChatMessage>,
  pub temperature: f32,
  pub max_tokens:  u32,
}

// ─── Response ────────────────────────────────────────────────────────────────

/// An uninterpreted upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
  pub status:      u16,
  /// Parsed from the `Retry-After` header when it holds a number of seconds.
  pub retry_after: Option<Duration>,
  pub body:        String,
}

impl RawResponse {
  pub fn new(status: u16, body: impl Into<String>) -> Self {
    Self {
      status,
      retry_after: None,
      body: body.into(),
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Sends a single chat-completion request.
///
/// Implementations must not retry; the gateway owns retry policy.
pub trait ChatTransport: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn send<'a>(
    &'a self,
    request: &'a ChatRequest,
  ) -> impl Future<Output = Result<RawResponse, Self::Error>> + Send + 'a;
}

// ─── HTTP transport ──────────────────────────────────────────────────────────

/// [`ChatTransport`] over HTTPS with bearer authentication.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpTransport {
  client:   Client,
  endpoint: String,
  api_key:  String,
}

impl HttpTransport {
  /// `base_url` is the API root, e.g. `https://api.groq.com/openai/v1`.
  /// `timeout` bounds each individual request.
  pub fn new(
    base_url: &str,
    api_key: impl Into<String>,
    timeout: Duration,
  ) -> Result<Self, reqwest::Error> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self {
      client,
      endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
      api_key: api_key.into(),
    })
  }
}

impl ChatTransport for HttpTransport {
  type Error = reqwest::Error;

  async fn send(&self, request: &ChatRequest) -> Result<RawResponse, reqwest::Error> {
    tracing::debug!(
      endpoint = %self.endpoint,
      model = %request.model,
      max_tokens = request.max_tokens,
      "sending chat completion request"
    );

    let response = self
      .client
      .post(&self.endpoint)
      .bearer_auth(&self.api_key)
      .json(request)
      .send()
      .await?;

    let status = response.status().as_u16();
    let retry_after = response
      .headers()
      .get(RETRY_AFTER)
      .and_then(|v| v.to_str().ok())
      .and_then(|s| s.trim().parse::<u64>().ok())
      .map(Duration::from_secs);
    let body = response.text().await?;

    tracing::debug!(status, bytes = body.len(), "chat completion response");
    Ok(RawResponse {
      status,
      retry_after,
      body,
    })
  }
}
