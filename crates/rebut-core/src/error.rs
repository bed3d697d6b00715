//! Error types for `rebut-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("username already taken: {0:?}")]
  UsernameTaken(String),

  #[error("evidence item {0} has no sources")]
  EmptySources(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
