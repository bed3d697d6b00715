//! In-process backend for the Rebut debate store.
//!
//! Records live in ordered maps behind a single async lock and last only for
//! the lifetime of the process.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::MemoryStore;
