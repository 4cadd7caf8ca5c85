//! API error type and [`axum::response::IntoResponse`] implementation.

use std::error::Error as StdError;

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn StdError + Send + Sync>),

  #[error("engine error: {0}")]
  Engine(#[from] kindred_graph::Error),

  /// The request could not be extracted (body, query string or path).
  #[error("rejected request: {message}")]
  Rejected { status: StatusCode, message: String },
}

macro_rules! from_rejection {
  ($($rejection:ty),+) => {$(
    impl From<$rejection> for ApiError {
      fn from(rejection: $rejection) -> Self {
        Self::Rejected { status: rejection.status(), message: rejection.body_text() }
      }
    }
  )+};
}

from_rejection!(JsonRejection, PathRejection, QueryRejection);

impl ApiError {
  /// Wrap a backend error. Domain refusals from `kindred-core` anywhere in
  /// the source chain keep their meaning; everything else is a 500.
  pub fn store<E>(err: E) -> Self
  where
    E: StdError + Send + Sync + 'static,
  {
    let mut source: Option<&(dyn StdError + 'static)> = Some(&err);
    while let Some(e) = source {
      if let Some(core) = e.downcast_ref::<kindred_core::Error>() {
        use kindred_core::Error as Core;
        let message = core.to_string();
        match core {
          Core::PersonNotFound(_)
          | Core::RelationshipNotFound(_)
          | Core::NotificationNotFound(_) => return Self::NotFound(message),
          Core::AlreadyEnded(_) => return Self::Conflict(message),
          Core::SelfRelationship(_) => return Self::BadRequest(message),
          Core::UnknownVariant { .. } | Core::Serialization(_) => break,
        }
      }
      source = e.source();
    }
    Self::Store(Box::new(err))
  }

  fn status(&self) -> StatusCode {
    use kindred_graph::Error as Engine;
    match self {
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::Conflict(_) => StatusCode::CONFLICT,
      Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
      Self::Rejected { status, .. } => *status,
      Self::Engine(e) => match e {
        Engine::UnknownPerson(_) | Engine::UnknownRelationship(_) => StatusCode::NOT_FOUND,
        Engine::SelfRelationship(_) | Engine::DataIntegrity { .. } => StatusCode::BAD_REQUEST,
        Engine::KindChanged { .. }
        | Engine::DuplicatePerson(_)
        | Engine::DuplicateRelationship(_) => StatusCode::CONFLICT,
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = match &self {
      ApiError::NotFound(m) | ApiError::BadRequest(m) | ApiError::Conflict(m) => m.clone(),
      ApiError::Store(e) => e.to_string(),
      ApiError::Engine(e) => e.to_string(),
      ApiError::Rejected { message, .. } => message.clone(),
    };
    if status.is_server_error() {
      tracing::error!(error = %message, "request failed");
    }
    (status, Json(json!({ "error": message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;

  #[derive(Debug, Error)]
  #[error("backend: {0}")]
  struct Wrapper(#[source] kindred_core::Error);

  #[test]
  fn core_refusals_survive_wrapping() {
    let id = Uuid::new_v4();
    let err = ApiError::store(Wrapper(kindred_core::Error::AlreadyEnded(id)));
    assert_eq!(err.status(), StatusCode::CONFLICT);

    let err = ApiError::store(Wrapper(kindred_core::Error::PersonNotFound(id)));
    assert!(matches!(err, ApiError::NotFound(_)));
  }

  #[test]
  fn opaque_backend_errors_are_internal() {
    let err = ApiError::store(std::io::Error::other("disk on fire"));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[test]
  fn engine_errors_map_by_kind() {
    let err = ApiError::from(kindred_graph::Error::UnknownPerson(Uuid::new_v4()));
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
  }
}
