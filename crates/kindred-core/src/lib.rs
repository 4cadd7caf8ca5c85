//! Core types and trait definitions for the Kindred family-tree service.
//!
//! This crate is deliberately free of HTTP, database and graph dependencies.
//! All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod notification;
pub mod person;
pub mod relationship;
pub mod store;

pub use error::{Error, Result};
pub use person::PersonId;
