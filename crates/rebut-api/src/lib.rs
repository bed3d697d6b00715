//! JSON REST API for Rebut.
//!
//! Exposes an axum [`Router`] backed by any [`DebateStore`] and any
//! [`ChatTransport`]. TLS, auth, and listener concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = rebut_api::router(AppState::new(store, gateway));
//! axum::serve(listener, app).await?;
//! ```

pub mod cache;
pub mod debates;
pub mod error;
pub mod generate;
pub mod validate;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post},
};
use rebut_core::store::DebateStore;
use rebut_llm::{ChatTransport, Gateway};
use serde_json::{Value, json};

pub use cache::GenerationCache;
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S, T> {
  pub store:   Arc<S>,
  pub gateway: Arc<Gateway<T>>,
  pub cache:   Arc<GenerationCache>,
}

impl<S, T> AppState<S, T> {
  /// State with an empty generation cache.
  pub fn new(store: S, gateway: Gateway<T>) -> Self {
    Self {
      store:   Arc::new(store),
      gateway: Arc::new(gateway),
      cache:   Arc::new(GenerationCache::new()),
    }
  }
}

// Derived `Clone` would require `S: Clone, T: Clone`.
impl<S, T> Clone for AppState<S, T> {
  fn clone(&self) -> Self {
    Self {
      store:   self.store.clone(),
      gateway: self.gateway.clone(),
      cache:   self.cache.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the `/api` routes for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, T>(state: AppState<S, T>) -> Router<()>
where
  S: DebateStore + 'static,
  T: ChatTransport + 'static,
{
  Router::new()
    // Generation
    .route("/debate", post(generate::debate::<S, T>))
    .route("/rebuttals", post(generate::rebuttals::<S, T>))
    .route("/counter-arguments", post(generate::counter_arguments::<S, T>))
    // Saved debates
    .route("/debates", get(debates::list::<S, T>).post(debates::create::<S, T>))
    .route("/debates/search", get(debates::search::<S, T>))
    .route(
      "/debates/{id}",
      get(debates::get_one::<S, T>).delete(debates::delete_one::<S, T>),
    )
    .with_state(state)
}

/// Full application router: the API under `/api` plus `/health`.
pub fn router<S, T>(state: AppState<S, T>) -> Router<()>
where
  S: DebateStore + 'static,
  T: ChatTransport + 'static,
{
  Router::new()
    .route("/health", get(health))
    .nest("/api", api_router(state))
}

async fn health() -> Json<Value> {
  Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests;
