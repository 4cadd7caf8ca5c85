//! A member of a family tree.
//!
//! People are created and edited by external collaborators (forms, imports).
//! The perspective engine only ever reads them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};
use uuid::Uuid;

/// Identifier of a [`Person`].
pub type PersonId = Uuid;

// ─── Gender ──────────────────────────────────────────────────────────────────

/// Sex/gender category; only used to pick gendered relationship labels.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  AsRefStr,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
  #[default]
  Other,
}

// ─── Person ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:               PersonId,
  pub given_name:       String,
  pub family_name:      String,
  pub middle_name:      Option<String>,
  pub gender:           Gender,
  pub birth_date:       Option<NaiveDate>,
  pub death_date:       Option<NaiveDate>,
  pub is_alive:         bool,
  pub birth_place:      Option<String>,
  pub current_location: Option<String>,
  pub occupation:       Option<String>,
  pub bio:              Option<String>,
  pub tags:             Vec<String>,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}

impl Person {
  /// "Given Middle Family", skipping empty parts.
  pub fn full_name(&self) -> String {
    [
      Some(self.given_name.as_str()),
      self.middle_name.as_deref(),
      Some(self.family_name.as_str()),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
  }
}

// ─── NewPerson ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::FamilyStore::add_person`] and
/// [`crate::store::FamilyStore::update_person`]. Timestamps and the id are
/// assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPerson {
  pub given_name:       String,
  pub family_name:      String,
  #[serde(default)]
  pub middle_name:      Option<String>,
  #[serde(default)]
  pub gender:           Gender,
  #[serde(default)]
  pub birth_date:       Option<NaiveDate>,
  #[serde(default)]
  pub death_date:       Option<NaiveDate>,
  #[serde(default = "default_alive")]
  pub is_alive:         bool,
  #[serde(default)]
  pub birth_place:      Option<String>,
  #[serde(default)]
  pub current_location: Option<String>,
  #[serde(default)]
  pub occupation:       Option<String>,
  #[serde(default)]
  pub bio:              Option<String>,
  #[serde(default)]
  pub tags:             Vec<String>,
}

fn default_alive() -> bool { true }

impl NewPerson {
  /// Convenience constructor with all optional fields set to their defaults.
  pub fn new(
    given_name: impl Into<String>,
    family_name: impl Into<String>,
    gender: Gender,
  ) -> Self {
    Self {
      given_name: given_name.into(),
      family_name: family_name.into(),
      middle_name: None,
      gender,
      birth_date: None,
      death_date: None,
      is_alive: true,
      birth_place: None,
      current_location: None,
      occupation: None,
      bio: None,
      tags: Vec::new(),
    }
  }

  /// Materialise into a [`Person`] with the given identity and timestamps.
  pub fn into_person(
    self,
    id: PersonId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
  ) -> Person {
    Person {
      id,
      given_name: self.given_name,
      family_name: self.family_name,
      middle_name: self.middle_name,
      gender: self.gender,
      birth_date: self.birth_date,
      death_date: self.death_date,
      is_alive: self.is_alive,
      birth_place: self.birth_place,
      current_location: self.current_location,
      occupation: self.occupation,
      bio: self.bio,
      tags: self.tags,
      created_at,
      updated_at,
    }
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn full_name_skips_missing_middle_name() {
    let now = Utc::now();
    let mut person = NewPerson::new("John", "Smith", Gender::Male)
      .into_person(Uuid::new_v4(), now, now);
    assert_eq!(person.full_name(), "John Smith");

    person.middle_name = Some("Henry".into());
    assert_eq!(person.full_name(), "John Henry Smith");
  }

  #[test]
  fn gender_string_forms_agree() {
    assert_eq!(Gender::Female.as_ref(), "female");
    assert_eq!(Gender::from_str("other").unwrap(), Gender::Other);
    assert_eq!(serde_json::to_string(&Gender::Male).unwrap(), "\"male\"");
  }

  #[test]
  fn new_person_body_defaults() {
    let body: NewPerson =
      serde_json::from_str(r#"{"given_name":"Sarah","family_name":"Smith"}"#)
        .unwrap();
    assert!(body.is_alive);
    assert_eq!(body.gender, Gender::Other);
    assert!(body.tags.is_empty());
  }
}
