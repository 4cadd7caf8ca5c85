//! The `FamilyStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `kindred-store-sqlite`).
//! Higher layers (`kindred-api`, `kindred-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  notification::{NewNotification, Notification},
  person::{NewPerson, Person, PersonId},
  relationship::{NewRelationship, Relationship},
};

/// Abstraction over a Kindred storage backend.
///
/// Relationships are never updated in place except to end them; their kind
/// and endpoints are fixed at creation.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait FamilyStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── People ────────────────────────────────────────────────────────────

  /// Create and persist a new person.
  fn add_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// List all people in creation order.
  fn list_persons(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Replace the editable fields of an existing person.
  fn update_person(
    &self,
    id: PersonId,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  // ── Relationships ─────────────────────────────────────────────────────

  /// Create an active relationship. Both people must exist and differ.
  fn add_relationship(
    &self,
    input: NewRelationship,
  ) -> impl Future<Output = Result<Relationship, Self::Error>> + Send + '_;

  fn get_relationship(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Relationship>, Self::Error>> + Send + '_;

  /// List relationships in creation order. Ended ones are included only when
  /// `include_inactive` is set.
  fn list_relationships(
    &self,
    include_inactive: bool,
  ) -> impl Future<Output = Result<Vec<Relationship>, Self::Error>> + Send + '_;

  /// Mark a relationship as ended (divorce, separation). The record is kept.
  ///
  /// Returns an error if the relationship is already ended.
  fn end_relationship(
    &self,
    id: Uuid,
    ended_on: Option<NaiveDate>,
  ) -> impl Future<Output = Result<Relationship, Self::Error>> + Send + '_;

  /// Remove a relationship that was recorded in error. Returns the removed
  /// record.
  fn delete_relationship(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Relationship, Self::Error>> + Send + '_;

  // ── Notifications ─────────────────────────────────────────────────────

  fn record_notification(
    &self,
    input: NewNotification,
  ) -> impl Future<Output = Result<Notification, Self::Error>> + Send + '_;

  /// Notifications newest first, optionally restricted to one recipient and
  /// to unread ones.
  fn list_notifications<'a>(
    &'a self,
    user_id: Option<&'a str>,
    unread_only: bool,
  ) -> impl Future<Output = Result<Vec<Notification>, Self::Error>> + Send + 'a;

  fn mark_notification_read(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Notification, Self::Error>> + Send + '_;
}
