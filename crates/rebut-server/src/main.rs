//! rebut server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), layers `REBUT_*`
//! environment variables over it, and serves the debate API over HTTP.
//!
//! ```text
//! GROQ_API_KEY=... cargo run -p rebut-server --bin server -- --config config.toml
//! ```

mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use rebut_api::AppState;
use rebut_llm::{Gateway, HttpTransport};
use rebut_store_memory::MemoryStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Rebut debate server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Bearer key for the chat-completion API.
  #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
  api_key: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("REBUT"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let api_key = cli.api_key.unwrap_or_else(|| {
    tracing::warn!("GROQ_API_KEY is not set; generation requests will be rejected upstream");
    String::new()
  });

  // Build application state.
  let transport = HttpTransport::new(
    &server_cfg.api_base_url,
    api_key,
    server_cfg.request_timeout(),
  )
  .context("failed to build HTTP client")?;
  let gateway = Gateway::new(transport, server_cfg.gateway());
  let state = AppState::new(MemoryStore::new(), gateway);

  let app = rebut_api::router(state).layer(TraceLayer::new_for_http());
  let address = server_cfg.address();

  tracing::info!(model = %server_cfg.model, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
