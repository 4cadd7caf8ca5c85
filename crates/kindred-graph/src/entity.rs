//! In-memory entity store: the engine's copy of people and relationships.
//!
//! Both maps preserve insertion order. Graph construction walks them in that
//! order, which is what makes BFS tie-breaking reproducible.

use indexmap::IndexMap;
use kindred_core::{
  PersonId,
  person::Person,
  relationship::Relationship,
};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct EntityStore {
  persons:       IndexMap<PersonId, Person>,
  relationships: IndexMap<Uuid, Relationship>,
}

impl EntityStore {
  /// Build a store from full collections, rejecting repeated ids.
  pub fn from_records(
    persons: impl IntoIterator<Item = Person>,
    relationships: impl IntoIterator<Item = Relationship>,
  ) -> Result<Self> {
    let mut store = Self::default();
    for person in persons {
      let id = person.id;
      if store.persons.insert(id, person).is_some() {
        return Err(Error::DuplicatePerson(id));
      }
    }
    for rel in relationships {
      let id = rel.id;
      if store.relationships.insert(id, rel).is_some() {
        return Err(Error::DuplicateRelationship(id));
      }
    }
    Ok(store)
  }

  // ── People ────────────────────────────────────────────────────────────

  pub fn person(&self, id: PersonId) -> Option<&Person> { self.persons.get(&id) }

  pub fn contains_person(&self, id: PersonId) -> bool {
    self.persons.contains_key(&id)
  }

  pub fn persons(&self) -> impl Iterator<Item = &Person> { self.persons.values() }

  pub fn person_ids(&self) -> impl Iterator<Item = PersonId> + '_ {
    self.persons.keys().copied()
  }

  /// Insert or replace a person. An update keeps the original position.
  pub fn upsert_person(&mut self, person: Person) -> Option<Person> {
    self.persons.insert(person.id, person)
  }

  // ── Relationships ─────────────────────────────────────────────────────

  pub fn relationship(&self, id: Uuid) -> Option<&Relationship> {
    self.relationships.get(&id)
  }

  pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
    self.relationships.values()
  }

  /// Every relationship (active or not) with `person` as an endpoint.
  pub fn relationships_of(
    &self,
    person: PersonId,
  ) -> impl Iterator<Item = &Relationship> {
    self.relationships.values().filter(move |r| r.touches(person))
  }

  /// Insert or replace a relationship. An update keeps the original position.
  pub fn upsert_relationship(&mut self, rel: Relationship) -> Option<Relationship> {
    self.relationships.insert(rel.id, rel)
  }

  pub fn remove_relationship(&mut self, id: Uuid) -> Option<Relationship> {
    self.relationships.shift_remove(&id)
  }

  pub fn len_persons(&self) -> usize { self.persons.len() }

  pub fn len_relationships(&self) -> usize { self.relationships.len() }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use kindred_core::{
    person::{Gender, NewPerson},
    relationship::{NewRelationship, RelationshipKind},
  };

  use super::*;

  fn person(name: &str) -> Person {
    let now = Utc::now();
    NewPerson::new(name, "Smith", Gender::Other).into_person(Uuid::new_v4(), now, now)
  }

  #[test]
  fn duplicate_person_is_rejected() {
    let p = person("John");
    let err = EntityStore::from_records([p.clone(), p.clone()], []).unwrap_err();
    assert!(matches!(err, Error::DuplicatePerson(id) if id == p.id));
  }

  #[test]
  fn update_keeps_insertion_position() {
    let (a, b, c) = (person("A"), person("B"), person("C"));
    let r1 = NewRelationship::new(a.id, b.id, RelationshipKind::Sibling)
      .into_relationship(Uuid::new_v4(), Utc::now());
    let r2 = NewRelationship::new(b.id, c.id, RelationshipKind::Sibling)
      .into_relationship(Uuid::new_v4(), Utc::now());
    let mut store =
      EntityStore::from_records([a.clone(), b.clone(), c], [r1.clone(), r2.clone()])
        .unwrap();

    let mut ended = r1.clone();
    ended.is_active = false;
    assert!(store.upsert_relationship(ended).is_some());

    let order: Vec<Uuid> = store.relationships().map(|r| r.id).collect();
    assert_eq!(order, vec![r1.id, r2.id]);
    assert_eq!(store.relationships_of(a.id).count(), 1);
    assert_eq!(store.relationships_of(b.id).count(), 2);

    store.remove_relationship(r1.id);
    assert_eq!(store.len_relationships(), 1);
  }
}
