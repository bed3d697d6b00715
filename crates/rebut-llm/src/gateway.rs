//! The model gateway: send a prompt, survive rate limits, recover structure.

use std::{sync::LazyLock, time::Duration};

use rebut_core::{
  debate::DebatePoint,
  topic::{DebateTopicRequest, Side},
};
use regex::Regex;
use serde::Deserialize;

use crate::{
  GatewayError,
  extract::{self, Shape},
  prompt::{self, Prompt},
  transport::{ChatMessage, ChatRequest, ChatTransport, RawResponse, Role},
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Tunables for [`Gateway`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
  pub model:           String,
  pub temperature:     f32,
  /// Extra attempts after a 429; a rate-limited call is tried
  /// `max_retries + 1` times in total.
  pub max_retries:     u32,
  /// Wait used when a 429 carries no usable hint.
  pub default_backoff: Duration,
  /// Upper bound on any single wait, whatever the upstream asks for.
  pub max_backoff:     Duration,
}

impl Default for GatewayConfig {
  fn default() -> Self {
    Self {
      model:           "llama3-8b-8192".to_owned(),
      temperature:     0.7,
      max_retries:     2,
      default_backoff: Duration::from_secs(3),
      max_backoff:     Duration::from_secs(60),
    }
  }
}

// ─── Upstream envelope ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CompletionResponse {
  choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
  message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
  content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
  error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
  #[serde(default)]
  message: String,
}

// ─── Gateway ─────────────────────────────────────────────────────────────────

/// Obtains structured debate content from a chat-completion service.
pub struct Gateway<T> {
  transport: T,
  config:    GatewayConfig,
}

impl<T: ChatTransport> Gateway<T> {
  pub fn new(transport: T, config: GatewayConfig) -> Self {
    Self { transport, config }
  }

  pub fn config(&self) -> &GatewayConfig {
    &self.config
  }

  /// Generate a full set of debate points for `request`.
  ///
  /// The returned `language` falls back to the requested one when the model
  /// leaves it out.
  pub async fn generate_debate(
    &self,
    request: &DebateTopicRequest,
  ) -> Result<DebatePoint, GatewayError> {
    let prompt =
      prompt::debate_prompt(&request.topic, &request.language, request.complexity);
    let mut points: DebatePoint = self.generate(&prompt).await?;
    if points.language.is_none() {
      points.language = Some(request.language.clone());
    }
    Ok(points)
  }

  /// Generate `count` additional rebuttals for `side` of `topic`.
  pub async fn generate_rebuttals(
    &self,
    topic: &str,
    side: Side,
    count: u8,
    language: &str,
  ) -> Result<Vec<String>, GatewayError> {
    let prompt = prompt::rebuttal_prompt(topic, side, count, language);
    self.generate(&prompt).await
  }

  /// Generate `count` counter-arguments against `argument`.
  pub async fn generate_counter_arguments(
    &self,
    argument: &str,
    topic: Option<&str>,
    count: u8,
    language: &str,
  ) -> Result<Vec<String>, GatewayError> {
    let prompt = prompt::counter_argument_prompt(argument, topic, count, language);
    self.generate(&prompt).await
  }

  /// Send `prompt` and recover a value of shape `S` from the reply.
  pub async fn generate<S: Shape>(&self, prompt: &Prompt) -> Result<S, GatewayError> {
    let content = self.complete(prompt).await?;
    extract::recover::<S>(&content).map_err(|e| {
      tracing::error!(error = %e, raw = %content, "unusable model output");
      GatewayError::from(e)
    })
  }

  /// Send `prompt`, retrying on 429 up to the configured budget, and return
  /// the assistant message text.
  pub async fn complete(&self, prompt: &Prompt) -> Result<String, GatewayError> {
    let request = ChatRequest {
      model:       self.config.model.clone(),
      messages:    vec![
        ChatMessage { role: Role::System, content: prompt.system.clone() },
        ChatMessage { role: Role::User, content: prompt.user.clone() },
      ],
      temperature: self.config.temperature,
      max_tokens:  prompt.max_tokens,
    };

    let mut attempts = 0u32;
    loop {
      attempts += 1;
      let response = self
        .transport
        .send(&request)
        .await
        .map_err(|e| GatewayError::Transport(Box::new(e)))?;

      match response.status {
        200..=299 => return completion_text(&response.body),
        429 if attempts <= self.config.max_retries => {
          let wait = self.backoff(&response);
          tracing::warn!(
            attempt = attempts,
            wait_secs = wait.as_secs(),
            "rate limited by upstream; retrying"
          );
          tokio::time::sleep(wait).await;
        }
        429 => {
          tracing::error!(attempts, "rate limit retries exhausted");
          return Err(GatewayError::RateLimited { attempts });
        }
        status => {
          tracing::error!(status, body = %response.body, "upstream error");
          return Err(GatewayError::Upstream {
            status,
            body: response.body,
          });
        }
      }
    }
  }

  /// How long to wait before retrying a 429: the hint in the error message,
  /// else the `Retry-After` header, else the configured default. Never longer
  /// than `max_backoff`.
  fn backoff(&self, response: &RawResponse) -> Duration {
    retry_hint(&response.body)
      .or(response.retry_after)
      .unwrap_or(self.config.default_backoff)
      .min(self.config.max_backoff)
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

static TRY_AGAIN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)try again in ([0-9]+(?:\.[0-9]+)?)s").expect("valid regex")
});

/// Parse a "try again in N s" hint from a 429 body, rounded up to whole
/// seconds.
///
/// The body is usually `{"error": {"message": ...}}`; anything else is
/// searched as plain text.
pub fn retry_hint(body: &str) -> Option<Duration> {
  let message = serde_json::from_str::<ErrorEnvelope>(body)
    .map(|e| e.error.message)
    .unwrap_or_else(|_| body.to_owned());

  let caps = TRY_AGAIN.captures(&message)?;
  let secs: f64 = caps[1].parse().ok()?;
  Some(Duration::from_secs(secs.ceil() as u64))
}

/// Pull `choices[0].message.content` out of a success body.
fn completion_text(body: &str) -> Result<String, GatewayError> {
  let envelope: CompletionResponse = serde_json::from_str(body).map_err(|e| {
    GatewayError::MalformedResponse(format!("undecodable completion envelope: {e}"))
  })?;

  envelope
    .choices
    .into_iter()
    .next()
    .and_then(|c| c.message.content)
    .ok_or_else(|| GatewayError::MalformedResponse("completion has no content".to_owned()))
}
