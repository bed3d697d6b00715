//! The `DebateStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `rebut-store-memory`).
//! Higher layers (`rebut-api`, `rebut-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  debate::{Debate, NewDebate},
  user::{NewUser, User},
};

/// Abstraction over a Rebut storage backend.
///
/// Each method is atomic on its own; there is no isolation across calls, so
/// a debate listed by one call may already be gone by the next.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait DebateStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Debates ───────────────────────────────────────────────────────────

  /// Retrieve a debate by id. Returns `None` if not found.
  fn get_debate(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Debate>, Self::Error>> + Send + '_;

  /// List debates saved by `user_id`. `None` lists every debate, unfiltered.
  fn get_debates_by_user_id(
    &self,
    user_id: Option<i64>,
  ) -> impl Future<Output = Result<Vec<Debate>, Self::Error>> + Send + '_;

  /// Persist a new debate. The store assigns `id` and `created_at`, and
  /// fills `language` with `"english"` when absent.
  fn create_debate(
    &self,
    input: NewDebate,
  ) -> impl Future<Output = Result<Debate, Self::Error>> + Send + '_;

  /// Remove a debate. Returns `true` iff a record existed and was removed.
  fn delete_debate(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// List every debate in id order.
  fn get_all_debates(
    &self,
  ) -> impl Future<Output = Result<Vec<Debate>, Self::Error>> + Send + '_;

  /// Case-insensitive substring match against the debate topic only.
  fn search_debates<'a>(
    &'a self,
    query: &'a str,
  ) -> impl Future<Output = Result<Vec<Debate>, Self::Error>> + Send + 'a;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Retrieve a user by exact username. Returns `None` if not found.
  fn get_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Create a user with empty preferences. Fails if the username is taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;
}
