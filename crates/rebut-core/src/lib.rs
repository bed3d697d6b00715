//! Core types and trait definitions for Rebut.
//!
//! This crate is deliberately free of HTTP and model-provider dependencies.
//! All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod debate;
pub mod error;
pub mod store;
pub mod topic;
pub mod user;

pub use error::{Error, Result};
