//! Error type for `kindred-graph`.
//!
//! "No relationship path" is not an error; see
//! [`Resolution::NotConnected`](crate::Resolution::NotConnected).

use kindred_core::{PersonId, relationship::RelationshipKind};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// A relationship points at a person the graph does not know.
  #[error("relationship {relationship} references unknown person {person}")]
  DataIntegrity { relationship: Uuid, person: PersonId },

  #[error("relationship {0} relates a person to themselves")]
  SelfRelationship(Uuid),

  #[error("relationship {0} appears more than once")]
  DuplicateRelationship(Uuid),

  #[error("person {0} appears more than once")]
  DuplicatePerson(PersonId),

  /// A query named a person missing from the current graph.
  #[error("unknown person: {0}")]
  UnknownPerson(PersonId),

  #[error("unknown relationship: {0}")]
  UnknownRelationship(Uuid),

  #[error("relationship {id} cannot change kind from {from:?} to {to:?}")]
  KindChanged {
    id:   Uuid,
    from: RelationshipKind,
    to:   RelationshipKind,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
