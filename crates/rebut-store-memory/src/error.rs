//! Error type for `rebut-store-memory`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] rebut_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
