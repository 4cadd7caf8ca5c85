//! Family-relationship graph and perspective engine.
//!
//! Given the people of a family tree and the relationships between them, the
//! engine answers "who is `target` to `viewpoint`?" with a label, a distance
//! and the connecting path.
//!
//! Layers, leaf-first:
//!
//! - [`entity::EntityStore`]: in-memory people and relationships.
//! - [`graph::Graph`]: typed, directional adjacency built from the store.
//! - [`resolve`]: bounded BFS plus [`label`] composition.
//! - [`cache::PerspectiveCache`]: memoised results, invalidated per person.
//! - [`engine::PerspectiveEngine`]: the facade callers hold.
//!
//! Everything here is synchronous and performs no I/O.

pub mod cache;
pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod graph;
pub mod label;
pub mod resolve;

pub use config::EngineConfig;
pub use engine::PerspectiveEngine;
pub use error::{Error, Result};
pub use resolve::{Perspective, Resolution, ResolveOptions};
