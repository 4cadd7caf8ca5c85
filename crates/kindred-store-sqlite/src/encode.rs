//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, calendar dates are `YYYY-MM-DD`, UUIDs are
//! hyphenated lowercase strings and enum kinds use their snake_case names.
//! Tags and notification payloads are stored as compact JSON.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use kindred_core::{
  notification::{Notification, NotificationPayload},
  person::{Gender, Person},
  relationship::{Relationship, RelationshipKind},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

fn decode_opt_date(s: Option<String>) -> Result<Option<NaiveDate>> {
  s.as_deref().map(decode_date).transpose()
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn decode_gender(s: &str) -> Result<Gender> {
  Gender::from_str(s).map_err(|_| {
    kindred_core::Error::UnknownVariant { field: "gender", value: s.to_owned() }.into()
  })
}

pub fn decode_kind(s: &str) -> Result<RelationshipKind> {
  RelationshipKind::from_str(s).map_err(|_| {
    kindred_core::Error::UnknownVariant { field: "relationship kind", value: s.to_owned() }
      .into()
  })
}

// ─── Tags ────────────────────────────────────────────────────────────────────

pub fn encode_tags(tags: &[String]) -> Result<String> { Ok(serde_json::to_string(tags)?) }

pub fn decode_tags(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

pub const PERSON_COLUMNS: &str = "person_id, given_name, family_name, middle_name, gender, \
                                  birth_date, death_date, is_alive, birth_place, \
                                  current_location, occupation, bio, tags, created_at, \
                                  updated_at";

/// Raw values read directly from a `persons` row.
pub struct RawPerson {
  pub person_id:        String,
  pub given_name:       String,
  pub family_name:      String,
  pub middle_name:      Option<String>,
  pub gender:           String,
  pub birth_date:       Option<String>,
  pub death_date:       Option<String>,
  pub is_alive:         bool,
  pub birth_place:      Option<String>,
  pub current_location: Option<String>,
  pub occupation:       Option<String>,
  pub bio:              Option<String>,
  pub tags:             String,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawPerson {
  /// Columns in [`PERSON_COLUMNS`] order.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:        row.get(0)?,
      given_name:       row.get(1)?,
      family_name:      row.get(2)?,
      middle_name:      row.get(3)?,
      gender:           row.get(4)?,
      birth_date:       row.get(5)?,
      death_date:       row.get(6)?,
      is_alive:         row.get(7)?,
      birth_place:      row.get(8)?,
      current_location: row.get(9)?,
      occupation:       row.get(10)?,
      bio:              row.get(11)?,
      tags:             row.get(12)?,
      created_at:       row.get(13)?,
      updated_at:       row.get(14)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:               decode_uuid(&self.person_id)?,
      given_name:       self.given_name,
      family_name:      self.family_name,
      middle_name:      self.middle_name,
      gender:           decode_gender(&self.gender)?,
      birth_date:       decode_opt_date(self.birth_date)?,
      death_date:       decode_opt_date(self.death_date)?,
      is_alive:         self.is_alive,
      birth_place:      self.birth_place,
      current_location: self.current_location,
      occupation:       self.occupation,
      bio:              self.bio,
      tags:             decode_tags(&self.tags)?,
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
    })
  }
}

pub const RELATIONSHIP_COLUMNS: &str = "relationship_id, person_a, person_b, kind, is_active, \
                                        started_on, ended_on, created_at, updated_at";

/// Raw values read directly from a `relationships` row.
pub struct RawRelationship {
  pub relationship_id: String,
  pub person_a:        String,
  pub person_b:        String,
  pub kind:            String,
  pub is_active:       bool,
  pub started_on:      Option<String>,
  pub ended_on:        Option<String>,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawRelationship {
  /// Columns in [`RELATIONSHIP_COLUMNS`] order.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      relationship_id: row.get(0)?,
      person_a:        row.get(1)?,
      person_b:        row.get(2)?,
      kind:            row.get(3)?,
      is_active:       row.get(4)?,
      started_on:      row.get(5)?,
      ended_on:        row.get(6)?,
      created_at:      row.get(7)?,
      updated_at:      row.get(8)?,
    })
  }

  pub fn into_relationship(self) -> Result<Relationship> {
    Ok(Relationship {
      id:         decode_uuid(&self.relationship_id)?,
      person_a:   decode_uuid(&self.person_a)?,
      person_b:   decode_uuid(&self.person_b)?,
      kind:       decode_kind(&self.kind)?,
      is_active:  self.is_active,
      started_on: decode_opt_date(self.started_on)?,
      ended_on:   decode_opt_date(self.ended_on)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

pub const NOTIFICATION_COLUMNS: &str =
  "notification_id, user_id, title, message, kind, data_json, is_read, created_at";

/// Raw values read directly from a `notifications` row.
pub struct RawNotification {
  pub notification_id: String,
  pub user_id:         String,
  pub title:           String,
  pub message:         String,
  pub kind:            String,
  pub data_json:       String,
  pub is_read:         bool,
  pub created_at:      String,
}

impl RawNotification {
  /// Columns in [`NOTIFICATION_COLUMNS`] order.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      notification_id: row.get(0)?,
      user_id:         row.get(1)?,
      title:           row.get(2)?,
      message:         row.get(3)?,
      kind:            row.get(4)?,
      data_json:       row.get(5)?,
      is_read:         row.get(6)?,
      created_at:      row.get(7)?,
    })
  }

  pub fn into_notification(self) -> Result<Notification> {
    let data: serde_json::Value = serde_json::from_str(&self.data_json)?;
    Ok(Notification {
      id:         decode_uuid(&self.notification_id)?,
      user_id:    self.user_id,
      title:      self.title,
      message:    self.message,
      payload:    NotificationPayload::from_parts(&self.kind, data)?,
      is_read:    self.is_read,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_use_iso_calendar_form() {
    let d = NaiveDate::from_ymd_opt(1987, 3, 9).unwrap();
    assert_eq!(encode_date(d), "1987-03-09");
    assert_eq!(decode_date("1987-03-09").unwrap(), d);
    assert!(matches!(decode_date("09/03/1987"), Err(Error::DateParse(_))));
  }

  #[test]
  fn unknown_kind_names_the_field() {
    let err = decode_kind("cousin").unwrap_err();
    assert!(matches!(
      err,
      Error::Core(kindred_core::Error::UnknownVariant { field: "relationship kind", .. })
    ));
    assert_eq!(decode_gender("female").unwrap(), Gender::Female);
  }
}
