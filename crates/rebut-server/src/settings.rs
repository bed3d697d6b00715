//! Runtime configuration, deserialised from `config.toml` and `REBUT_*`
//! environment variables.

use std::time::Duration;

use rebut_llm::GatewayConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  /// Root of the OpenAI-compatible API.
  pub api_base_url:         String,
  pub model:                String,
  /// Upper bound on a single upstream request.
  pub request_timeout_secs: u64,
  /// Extra attempts after an upstream 429.
  pub max_retries:          u32,
  /// Longest single wait between rate-limited attempts.
  pub max_backoff_secs:     u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 "127.0.0.1".to_string(),
      port:                 5000,
      api_base_url:         "https://api.groq.com/openai/v1".to_string(),
      model:                "llama3-8b-8192".to_string(),
      request_timeout_secs: 120,
      max_retries:          2,
      max_backoff_secs:     60,
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs)
  }

  pub fn gateway(&self) -> GatewayConfig {
    GatewayConfig {
      model: self.model.clone(),
      max_retries: self.max_retries,
      max_backoff: Duration::from_secs(self.max_backoff_secs),
      ..GatewayConfig::default()
    }
  }
}
