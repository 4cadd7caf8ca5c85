//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use kindred_core::{
  notification::{NewNotification, NotificationPayload},
  person::{Gender, NewPerson, Person},
  relationship::{NewRelationship, RelationshipKind},
  store::FamilyStore,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn person(s: &SqliteStore, given: &str) -> Person {
  s.add_person(NewPerson::new(given, "Smith", Gender::Other))
    .await
    .unwrap()
}

fn core_err(err: Error) -> kindred_core::Error {
  match err {
    Error::Core(e) => e,
    other => panic!("expected a core error, got {other:?}"),
  }
}

// ─── People ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_person() {
  let s = store().await;

  let mut input = NewPerson::new("Sarah", "Smith", Gender::Female);
  input.middle_name = Some("Jane".into());
  input.birth_date = NaiveDate::from_ymd_opt(1985, 6, 15);
  input.tags = vec!["founder".into()];
  let added = s.add_person(input).await.unwrap();

  let fetched = s.get_person(added.id).await.unwrap().unwrap();
  assert_eq!(fetched.full_name(), "Sarah Jane Smith");
  assert_eq!(fetched.gender, Gender::Female);
  assert_eq!(fetched.birth_date, NaiveDate::from_ymd_opt(1985, 6, 15));
  assert_eq!(fetched.tags, vec!["founder".to_owned()]);
  assert!(fetched.is_alive);
}

#[tokio::test]
async fn get_person_missing_returns_none() {
  let s = store().await;
  assert!(s.get_person(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_persons_in_creation_order() {
  let s = store().await;
  let a = person(&s, "A").await;
  let b = person(&s, "B").await;
  let c = person(&s, "C").await;

  let ids: Vec<Uuid> = s.list_persons().await.unwrap().iter().map(|p| p.id).collect();
  assert_eq!(ids, vec![a.id, b.id, c.id]);
}

#[tokio::test]
async fn update_person_keeps_identity() {
  let s = store().await;
  let original = person(&s, "John").await;

  let mut input = NewPerson::new("John", "Smith", Gender::Male);
  input.occupation = Some("Engineer".into());
  let updated = s.update_person(original.id, input).await.unwrap();

  assert_eq!(updated.id, original.id);
  assert_eq!(updated.created_at, original.created_at);
  assert!(updated.updated_at >= original.updated_at);

  let fetched = s.get_person(original.id).await.unwrap().unwrap();
  assert_eq!(fetched.gender, Gender::Male);
  assert_eq!(fetched.occupation.as_deref(), Some("Engineer"));
}

#[tokio::test]
async fn update_missing_person_fails() {
  let s = store().await;
  let ghost = Uuid::new_v4();
  let err = s
    .update_person(ghost, NewPerson::new("X", "Y", Gender::Other))
    .await
    .unwrap_err();
  assert!(matches!(core_err(err), kindred_core::Error::PersonNotFound(id) if id == ghost));
}

// ─── Relationships ───────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_list_relationships() {
  let s = store().await;
  let a = person(&s, "A").await;
  let b = person(&s, "B").await;

  let mut input = NewRelationship::new(a.id, b.id, RelationshipKind::Spouse);
  input.started_on = NaiveDate::from_ymd_opt(2010, 5, 1);
  let rel = s.add_relationship(input).await.unwrap();
  assert!(rel.is_active);

  let fetched = s.get_relationship(rel.id).await.unwrap().unwrap();
  assert_eq!(fetched, rel);

  let all = s.list_relationships(false).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].kind, RelationshipKind::Spouse);
}

#[tokio::test]
async fn relationship_requires_existing_distinct_people() {
  let s = store().await;
  let a = person(&s, "A").await;
  let ghost = Uuid::new_v4();

  let err = s
    .add_relationship(NewRelationship::new(a.id, ghost, RelationshipKind::Sibling))
    .await
    .unwrap_err();
  assert!(matches!(core_err(err), kindred_core::Error::PersonNotFound(id) if id == ghost));

  let err = s
    .add_relationship(NewRelationship::new(a.id, a.id, RelationshipKind::Sibling))
    .await
    .unwrap_err();
  assert!(matches!(core_err(err), kindred_core::Error::SelfRelationship(_)));

  assert!(s.list_relationships(true).await.unwrap().is_empty());
}

#[tokio::test]
async fn ending_keeps_the_record() {
  let s = store().await;
  let a = person(&s, "A").await;
  let b = person(&s, "B").await;
  let rel = s
    .add_relationship(NewRelationship::new(a.id, b.id, RelationshipKind::Spouse))
    .await
    .unwrap();

  let divorced = NaiveDate::from_ymd_opt(2020, 1, 31);
  let ended = s.end_relationship(rel.id, divorced).await.unwrap();
  assert!(!ended.is_active);
  assert_eq!(ended.ended_on, divorced);

  assert!(s.list_relationships(false).await.unwrap().is_empty());
  let all = s.list_relationships(true).await.unwrap();
  assert_eq!(all.len(), 1);
  assert!(!all[0].is_active);
  assert_eq!(all[0].ended_on, divorced);

  let err = s.end_relationship(rel.id, None).await.unwrap_err();
  assert!(matches!(core_err(err), kindred_core::Error::AlreadyEnded(id) if id == rel.id));
}

#[tokio::test]
async fn delete_removes_the_record() {
  let s = store().await;
  let a = person(&s, "A").await;
  let b = person(&s, "B").await;
  let rel = s
    .add_relationship(NewRelationship::new(a.id, b.id, RelationshipKind::ParentChild))
    .await
    .unwrap();

  let removed = s.delete_relationship(rel.id).await.unwrap();
  assert_eq!(removed.id, rel.id);
  assert!(s.get_relationship(rel.id).await.unwrap().is_none());

  let err = s.delete_relationship(rel.id).await.unwrap_err();
  assert!(matches!(core_err(err), kindred_core::Error::RelationshipNotFound(_)));
}

// ─── Notifications ───────────────────────────────────────────────────────────

fn relationship_note(user: &str, a: Uuid, b: Uuid) -> NewNotification {
  NewNotification {
    user_id: user.into(),
    title:   "New relationship".into(),
    message: "A family connection was added".into(),
    payload: NotificationPayload::Relationship {
      relationship_id: Uuid::new_v4(),
      member_ids:      [a, b],
      added_by:        "user2".into(),
    },
  }
}

#[tokio::test]
async fn notifications_round_trip_with_payload() {
  let s = store().await;
  let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

  let recorded = s.record_notification(relationship_note("user1", a, b)).await.unwrap();
  let listed = s.list_notifications(None, false).await.unwrap();
  assert_eq!(listed, vec![recorded]);
  assert_eq!(listed[0].payload.kind(), "relationship");
}

#[tokio::test]
async fn notifications_filter_and_mark_read() {
  let s = store().await;
  let first = s
    .record_notification(relationship_note("user1", Uuid::new_v4(), Uuid::new_v4()))
    .await
    .unwrap();
  let second = s
    .record_notification(NewNotification {
      user_id: "user1".into(),
      title:   "Event".into(),
      message: "Reunion".into(),
      payload: NotificationPayload::Event { event_id: Uuid::new_v4() },
    })
    .await
    .unwrap();
  s.record_notification(relationship_note("user9", Uuid::new_v4(), Uuid::new_v4()))
    .await
    .unwrap();

  let mine = s.list_notifications(Some("user1"), false).await.unwrap();
  let ids: Vec<Uuid> = mine.iter().map(|n| n.id).collect();
  assert_eq!(ids, vec![second.id, first.id]);

  let read = s.mark_notification_read(first.id).await.unwrap();
  assert!(read.is_read);

  let unread = s.list_notifications(Some("user1"), true).await.unwrap();
  assert_eq!(unread.len(), 1);
  assert_eq!(unread[0].id, second.id);
  assert_eq!(s.list_notifications(None, true).await.unwrap().len(), 2);

  let err = s.mark_notification_read(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(core_err(err), kindred_core::Error::NotificationNotFound(_)));
}
