//! [`SqliteStore`]: the SQLite implementation of [`FamilyStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use kindred_core::{
  notification::{NewNotification, Notification},
  person::{NewPerson, Person, PersonId},
  relationship::{NewRelationship, Relationship},
  store::FamilyStore,
};

use crate::{
  Error,
  Result,
  encode::{
    NOTIFICATION_COLUMNS,
    PERSON_COLUMNS,
    RELATIONSHIP_COLUMNS,
    RawNotification,
    RawPerson,
    RawRelationship,
    encode_date,
    encode_dt,
    encode_tags,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Kindred family store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn person_exists(&self, id: PersonId) -> Result<bool> {
    let id_str = encode_uuid(id);
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM persons WHERE person_id = ?1",
              rusqlite::params![id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  /// Write every column of `person` under its id.
  async fn write_person(&self, person: &Person, insert: bool) -> Result<()> {
    let sql = if insert {
      "INSERT INTO persons (
         person_id, given_name, family_name, middle_name, gender,
         birth_date, death_date, is_alive, birth_place,
         current_location, occupation, bio, tags, created_at, updated_at
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
    } else {
      "UPDATE persons SET
         given_name = ?2, family_name = ?3, middle_name = ?4, gender = ?5,
         birth_date = ?6, death_date = ?7, is_alive = ?8, birth_place = ?9,
         current_location = ?10, occupation = ?11, bio = ?12, tags = ?13,
         created_at = ?14, updated_at = ?15
       WHERE person_id = ?1"
    };

    let id_str           = encode_uuid(person.id);
    let given_name       = person.given_name.clone();
    let family_name      = person.family_name.clone();
    let middle_name      = person.middle_name.clone();
    let gender           = person.gender.as_ref().to_owned();
    let birth_date       = person.birth_date.map(encode_date);
    let death_date       = person.death_date.map(encode_date);
    let is_alive         = person.is_alive;
    let birth_place      = person.birth_place.clone();
    let current_location = person.current_location.clone();
    let occupation       = person.occupation.clone();
    let bio              = person.bio.clone();
    let tags             = encode_tags(&person.tags)?;
    let created_at       = encode_dt(person.created_at);
    let updated_at       = encode_dt(person.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          sql,
          rusqlite::params![
            id_str,
            given_name,
            family_name,
            middle_name,
            gender,
            birth_date,
            death_date,
            is_alive,
            birth_place,
            current_location,
            occupation,
            bio,
            tags,
            created_at,
            updated_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch_notification(&self, id: Uuid) -> Result<Option<Notification>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawNotification> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE notification_id = ?1"
              ),
              rusqlite::params![id_str],
              RawNotification::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawNotification::into_notification).transpose()
  }
}

// ─── FamilyStore impl ────────────────────────────────────────────────────────

impl FamilyStore for SqliteStore {
  type Error = Error;

  // ── People ────────────────────────────────────────────────────────────

  async fn add_person(&self, input: NewPerson) -> Result<Person> {
    let now = Utc::now();
    let person = input.into_person(Uuid::new_v4(), now, now);
    self.write_person(&person, true).await?;
    tracing::debug!(person = %person.id, "person added");
    Ok(person)
  }

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE person_id = ?1"),
              rusqlite::params![id_str],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn list_persons(&self) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {PERSON_COLUMNS} FROM persons ORDER BY rowid"))?;
        let rows = stmt
          .query_map([], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn update_person(&self, id: PersonId, input: NewPerson) -> Result<Person> {
    let existing = self
      .get_person(id)
      .await?
      .ok_or(kindred_core::Error::PersonNotFound(id))?;

    let person = input.into_person(id, existing.created_at, Utc::now());
    self.write_person(&person, false).await?;
    Ok(person)
  }

  // ── Relationships ─────────────────────────────────────────────────────

  async fn add_relationship(&self, input: NewRelationship) -> Result<Relationship> {
    if input.person_a == input.person_b {
      return Err(kindred_core::Error::SelfRelationship(input.person_a).into());
    }
    for person in [input.person_a, input.person_b] {
      if !self.person_exists(person).await? {
        return Err(kindred_core::Error::PersonNotFound(person).into());
      }
    }

    let rel = input.into_relationship(Uuid::new_v4(), Utc::now());

    let id_str     = encode_uuid(rel.id);
    let a_str      = encode_uuid(rel.person_a);
    let b_str      = encode_uuid(rel.person_b);
    let kind_str   = rel.kind.as_ref().to_owned();
    let started_on = rel.started_on.map(encode_date);
    let at_str     = encode_dt(rel.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO relationships (
             relationship_id, person_a, person_b, kind, is_active,
             started_on, ended_on, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, 1, ?5, NULL, ?6, ?6)",
          rusqlite::params![id_str, a_str, b_str, kind_str, started_on, at_str],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(relationship = %rel.id, kind = rel.kind.as_ref(), "relationship added");
    Ok(rel)
  }

  async fn get_relationship(&self, id: Uuid) -> Result<Option<Relationship>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawRelationship> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {RELATIONSHIP_COLUMNS} FROM relationships WHERE relationship_id = ?1"
              ),
              rusqlite::params![id_str],
              RawRelationship::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRelationship::into_relationship).transpose()
  }

  async fn list_relationships(&self, include_inactive: bool) -> Result<Vec<Relationship>> {
    let raws: Vec<RawRelationship> = self
      .conn
      .call(move |conn| {
        let filter = if include_inactive { "" } else { "WHERE is_active = 1" };
        let mut stmt = conn.prepare(&format!(
          "SELECT {RELATIONSHIP_COLUMNS} FROM relationships {filter} ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map([], RawRelationship::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRelationship::into_relationship).collect()
  }

  async fn end_relationship(
    &self,
    id: Uuid,
    ended_on: Option<NaiveDate>,
  ) -> Result<Relationship> {
    let mut rel = self
      .get_relationship(id)
      .await?
      .ok_or(kindred_core::Error::RelationshipNotFound(id))?;
    if !rel.is_active {
      return Err(kindred_core::Error::AlreadyEnded(id).into());
    }

    rel.is_active = false;
    rel.ended_on = ended_on;
    rel.updated_at = Utc::now();

    let id_str       = encode_uuid(id);
    let ended_on_str = rel.ended_on.map(encode_date);
    let at_str       = encode_dt(rel.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE relationships
           SET is_active = 0, ended_on = ?2, updated_at = ?3
           WHERE relationship_id = ?1",
          rusqlite::params![id_str, ended_on_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(relationship = %id, "relationship ended");
    Ok(rel)
  }

  async fn delete_relationship(&self, id: Uuid) -> Result<Relationship> {
    let rel = self
      .get_relationship(id)
      .await?
      .ok_or(kindred_core::Error::RelationshipNotFound(id))?;

    let id_str = encode_uuid(id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM relationships WHERE relationship_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(rel)
  }

  // ── Notifications ─────────────────────────────────────────────────────

  async fn record_notification(&self, input: NewNotification) -> Result<Notification> {
    let notification = Notification {
      id:         Uuid::new_v4(),
      user_id:    input.user_id,
      title:      input.title,
      message:    input.message,
      payload:    input.payload,
      is_read:    false,
      created_at: Utc::now(),
    };

    let id_str    = encode_uuid(notification.id);
    let user_id   = notification.user_id.clone();
    let title     = notification.title.clone();
    let message   = notification.message.clone();
    let kind      = notification.payload.kind().to_owned();
    let data_json = notification.payload.to_json()?.to_string();
    let at_str    = encode_dt(notification.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO notifications (
             notification_id, user_id, title, message, kind, data_json, is_read, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
          rusqlite::params![id_str, user_id, title, message, kind, data_json, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(notification)
  }

  async fn list_notifications<'a>(
    &'a self,
    user_id: Option<&'a str>,
    unread_only: bool,
  ) -> Result<Vec<Notification>> {
    let user_id = user_id.map(str::to_owned);

    let raws: Vec<RawNotification> = self
      .conn
      .call(move |conn| {
        let mut conds: Vec<&'static str> = vec![];
        if user_id.is_some() {
          conds.push("user_id = ?1");
        }
        if unread_only {
          conds.push("is_read = 0");
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT {NOTIFICATION_COLUMNS} FROM notifications
           {where_clause}
           ORDER BY created_at DESC, rowid DESC"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = if user_id.is_some() {
          stmt
            .query_map(rusqlite::params![user_id], RawNotification::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          stmt
            .query_map([], RawNotification::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawNotification::into_notification).collect()
  }

  async fn mark_notification_read(&self, id: Uuid) -> Result<Notification> {
    let id_str = encode_uuid(id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE notifications SET is_read = 1 WHERE notification_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(kindred_core::Error::NotificationNotFound(id).into());
    }
    self
      .fetch_notification(id)
      .await?
      .ok_or_else(|| kindred_core::Error::NotificationNotFound(id).into())
  }
}
