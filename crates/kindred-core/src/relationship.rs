//! Relationship records between two people.
//!
//! Relationships are undirected in storage. The only asymmetric kind is
//! [`RelationshipKind::ParentChild`], where `person_a` is always the parent.
//! Ending a relationship clears `is_active` instead of deleting the record, so
//! past marriages stay queryable.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};
use uuid::Uuid;

use crate::person::PersonId;

/// The stored kind of a relationship. Immutable once created.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RelationshipKind {
  /// `person_a` is the parent of `person_b`.
  ParentChild,
  Spouse,
  Sibling,
  Partner,
}

impl RelationshipKind {
  /// Spouses and partners are subject to the one-active-union rule.
  pub fn is_union(self) -> bool { matches!(self, Self::Spouse | Self::Partner) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
  pub id:         Uuid,
  pub person_a:   PersonId,
  pub person_b:   PersonId,
  pub kind:       RelationshipKind,
  pub is_active:  bool,
  /// Start of the validity window (e.g. marriage date).
  pub started_on: Option<NaiveDate>,
  /// End of the validity window (e.g. divorce date).
  pub ended_on:   Option<NaiveDate>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Relationship {
  pub fn touches(&self, person: PersonId) -> bool {
    self.person_a == person || self.person_b == person
  }

  /// The person on the other end, if `person` is one of the endpoints.
  pub fn other(&self, person: PersonId) -> Option<PersonId> {
    if self.person_a == person {
      Some(self.person_b)
    } else if self.person_b == person {
      Some(self.person_a)
    } else {
      None
    }
  }
}

// ─── NewRelationship ─────────────────────────────────────────────────────────

/// Input to [`crate::store::FamilyStore::add_relationship`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRelationship {
  pub person_a:   PersonId,
  pub person_b:   PersonId,
  pub kind:       RelationshipKind,
  #[serde(default)]
  pub started_on: Option<NaiveDate>,
}

impl NewRelationship {
  pub fn new(person_a: PersonId, person_b: PersonId, kind: RelationshipKind) -> Self {
    Self { person_a, person_b, kind, started_on: None }
  }

  /// An active relationship with the given identity and timestamps.
  pub fn into_relationship(self, id: Uuid, at: DateTime<Utc>) -> Relationship {
    Relationship {
      id,
      person_a: self.person_a,
      person_b: self.person_b,
      kind: self.kind,
      is_active: true,
      started_on: self.started_on,
      ended_on: None,
      created_at: at,
      updated_at: at,
    }
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn kind_string_forms_agree() {
    assert_eq!(RelationshipKind::ParentChild.as_ref(), "parent_child");
    assert_eq!(
      RelationshipKind::from_str("partner").unwrap(),
      RelationshipKind::Partner
    );
    assert_eq!(
      serde_json::to_string(&RelationshipKind::ParentChild).unwrap(),
      "\"parent_child\""
    );
  }

  #[test]
  fn other_endpoint() {
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let rel = NewRelationship::new(a, b, RelationshipKind::Sibling)
      .into_relationship(Uuid::new_v4(), Utc::now());
    assert_eq!(rel.other(a), Some(b));
    assert_eq!(rel.other(b), Some(a));
    assert_eq!(rel.other(c), None);
    assert!(rel.is_active);
  }
}
