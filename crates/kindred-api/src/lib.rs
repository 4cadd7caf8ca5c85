//! JSON REST API for Kindred.
//!
//! Exposes an axum [`Router`] backed by any [`kindred_core::store::FamilyStore`]
//! plus a shared [`PerspectiveEngine`]. Auth, TLS, and transport concerns are
//! the caller's responsibility.
//!
//! Every mutating handler holds the engine lock across "write to store, then
//! update engine", so a perspective read never sees a result computed before
//! the write landed.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", kindred_api::api_router(state))
//! ```

pub mod error;
pub mod extract;
pub mod graph;
pub mod notifications;
pub mod perspectives;
pub mod persons;
pub mod relationships;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use kindred_core::store::FamilyStore;
use kindred_graph::PerspectiveEngine;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:  Arc<S>,
  pub engine: Arc<Mutex<PerspectiveEngine>>,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>, engine: PerspectiveEngine) -> Self {
    Self { store, engine: Arc::new(Mutex::new(engine)) }
  }
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), engine: Arc::clone(&self.engine) }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: FamilyStore + 'static,
{
  Router::new()
    // People
    .route("/persons", get(persons::list::<S>).post(persons::create::<S>))
    .route("/persons/{id}", get(persons::get_one::<S>).put(persons::update::<S>))
    .route("/persons/{id}/perspectives", get(perspectives::explore::<S>))
    // Relationships
    .route(
      "/relationships",
      get(relationships::list::<S>).post(relationships::create::<S>),
    )
    .route(
      "/relationships/{id}",
      get(relationships::get_one::<S>).delete(relationships::delete_one::<S>),
    )
    .route("/relationships/{id}/end", post(relationships::end_one::<S>))
    // Perspectives
    .route("/perspectives", get(perspectives::resolve_one::<S>))
    // Graph maintenance
    .route("/graph", get(graph::status::<S>))
    .route("/graph/rebuild", post(graph::rebuild::<S>))
    // Notifications
    .route("/notifications", get(notifications::list::<S>))
    .route("/notifications/{id}/read", post(notifications::mark_read::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
