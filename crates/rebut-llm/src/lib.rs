//! Model-facing half of Rebut.
//!
//! Builds prompts, sends them to an OpenAI-compatible chat-completion
//! endpoint, and recovers structured debate content from the free text that
//! comes back.
//!
//! # Quick start
//!
//! ```no_run
//! use rebut_core::topic::DebateTopicRequest;
//! use rebut_llm::{Gateway, GatewayConfig, HttpTransport};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new(
//!   "https://api.groq.com/openai/v1",
//!   std::env::var("GROQ_API_KEY")?,
//!   std::time::Duration::from_secs(120),
//! )?;
//! let gateway = Gateway::new(transport, GatewayConfig::default());
//! let points = gateway
//!   .generate_debate(&DebateTopicRequest::new("Should AI be regulated?"))
//!   .await?;
//! println!("{} proposition points", points.proposition.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod extract;
pub mod gateway;
pub mod prompt;
pub mod transport;

pub use error::{ExtractError, GatewayError};
pub use extract::Shape;
pub use gateway::{Gateway, GatewayConfig};
pub use prompt::Prompt;
pub use transport::{ChatMessage, ChatRequest, ChatTransport, HttpTransport, RawResponse, Role};
