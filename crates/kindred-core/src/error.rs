//! Error types for `kindred-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("person not found: {0}")]
  PersonNotFound(Uuid),

  #[error("relationship not found: {0}")]
  RelationshipNotFound(Uuid),

  #[error("notification not found: {0}")]
  NotificationNotFound(Uuid),

  #[error("relationship {0} is already ended")]
  AlreadyEnded(Uuid),

  #[error("a person cannot be related to themselves ({0})")]
  SelfRelationship(Uuid),

  #[error("unknown {field} value: {value:?}")]
  UnknownVariant { field: &'static str, value: String },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
