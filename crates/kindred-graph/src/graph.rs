//! Relationship graph builder.
//!
//! Turns the flat relationship list into per-person adjacency lists of typed,
//! directional edges. An edge stored under person X names the role its
//! neighbour plays for X: `(P, ParentOf)` in C's list means "P is C's parent".

use std::collections::{HashMap, VecDeque};

use kindred_core::{
  PersonId,
  person::{Gender, Person},
  relationship::{Relationship, RelationshipKind},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Edges ───────────────────────────────────────────────────────────────────

/// The role a neighbour plays relative to the person whose list holds the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
  ParentOf,
  ChildOf,
  SpouseOf,
  PartnerOf,
  SiblingOf,
}

impl EdgeKind {
  pub fn is_union(self) -> bool { matches!(self, Self::SpouseOf | Self::PartnerOf) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
  pub to:              PersonId,
  pub kind:            EdgeKind,
  pub relationship_id: Uuid,
  /// `false` for edges that only live in the historical set.
  pub active:          bool,
}

/// Where a relationship sits in the graph, for change detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
  pub person_a: PersonId,
  pub person_b: PersonId,
  pub active:   bool,
}

// ─── Violations ──────────────────────────────────────────────────────────────

/// A business rule broken by the input data. Reported, never corrected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Violation {
  /// More than one active spouse/partner relationship for one person.
  MultipleActiveUnions {
    person:        PersonId,
    relationships: Vec<Uuid>,
  },
}

// ─── Graph ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Graph {
  adjacency:  HashMap<PersonId, Vec<Edge>>,
  historical: HashMap<PersonId, Vec<Edge>>,
  genders:    HashMap<PersonId, Gender>,
  endpoints:  HashMap<Uuid, Endpoints>,
  violations: Vec<Violation>,
  /// Connected-component label per person over active edges only.
  components: HashMap<PersonId, usize>,
  /// Same, over active and historical edges together.
  components_historical: HashMap<PersonId, usize>,
}

impl Graph {
  /// Build the adjacency structure. Fails on the first dangling, repeated or
  /// reflexive relationship.
  pub fn build<'a>(
    persons: impl IntoIterator<Item = &'a Person>,
    relationships: impl IntoIterator<Item = &'a Relationship>,
  ) -> Result<Self> {
    let mut graph = Self::default();
    let mut order = Vec::new();
    for person in persons {
      order.push(person.id);
      graph.adjacency.entry(person.id).or_default();
      graph.genders.insert(person.id, person.gender);
    }

    let mut unions: HashMap<PersonId, Vec<Uuid>> = HashMap::new();

    for rel in relationships {
      if graph.endpoints.contains_key(&rel.id) {
        return Err(Error::DuplicateRelationship(rel.id));
      }
      if rel.person_a == rel.person_b {
        return Err(Error::SelfRelationship(rel.id));
      }
      for person in [rel.person_a, rel.person_b] {
        if !graph.genders.contains_key(&person) {
          return Err(Error::DataIntegrity { relationship: rel.id, person });
        }
      }

      graph.endpoints.insert(rel.id, Endpoints {
        person_a: rel.person_a,
        person_b: rel.person_b,
        active:   rel.is_active,
      });

      let (a_sees_b, b_sees_a) = match rel.kind {
        RelationshipKind::ParentChild => (EdgeKind::ChildOf, EdgeKind::ParentOf),
        RelationshipKind::Spouse => (EdgeKind::SpouseOf, EdgeKind::SpouseOf),
        RelationshipKind::Sibling => (EdgeKind::SiblingOf, EdgeKind::SiblingOf),
        RelationshipKind::Partner => (EdgeKind::PartnerOf, EdgeKind::PartnerOf),
      };

      let target = if rel.is_active {
        &mut graph.adjacency
      } else {
        &mut graph.historical
      };
      target.entry(rel.person_a).or_default().push(Edge {
        to:              rel.person_b,
        kind:            a_sees_b,
        relationship_id: rel.id,
        active:          rel.is_active,
      });
      target.entry(rel.person_b).or_default().push(Edge {
        to:              rel.person_a,
        kind:            b_sees_a,
        relationship_id: rel.id,
        active:          rel.is_active,
      });

      if rel.is_active && rel.kind.is_union() {
        unions.entry(rel.person_a).or_default().push(rel.id);
        unions.entry(rel.person_b).or_default().push(rel.id);
      }
    }

    // Walk people in input order so violations come out deterministically.
    for &person in &order {
      if let Some(ids) = unions.remove(&person)
        && ids.len() > 1
      {
        tracing::warn!(
          %person,
          count = ids.len(),
          "person has more than one active spouse/partner"
        );
        graph
          .violations
          .push(Violation::MultipleActiveUnions { person, relationships: ids });
      }
    }

    graph.components = graph.label_components(&order, false);
    graph.components_historical = graph.label_components(&order, true);

    tracing::debug!(
      persons = graph.adjacency.len(),
      relationships = graph.endpoints.len(),
      "relationship graph built"
    );
    Ok(graph)
  }

  fn label_components(
    &self,
    order: &[PersonId],
    include_historical: bool,
  ) -> HashMap<PersonId, usize> {
    let mut labels = HashMap::with_capacity(order.len());
    for (component, &root) in order.iter().enumerate() {
      if labels.contains_key(&root) {
        continue;
      }
      labels.insert(root, component);
      let mut queue = VecDeque::from([root]);
      while let Some(person) = queue.pop_front() {
        for edge in self.edges(person, include_historical) {
          if !labels.contains_key(&edge.to) {
            labels.insert(edge.to, component);
            queue.push_back(edge.to);
          }
        }
      }
    }
    labels
  }

  /// Whether any path links `a` and `b`, regardless of length.
  pub fn same_component(&self, a: PersonId, b: PersonId, include_historical: bool) -> bool {
    let labels = if include_historical {
      &self.components_historical
    } else {
      &self.components
    };
    match (labels.get(&a), labels.get(&b)) {
      (Some(x), Some(y)) => x == y,
      _ => false,
    }
  }

  pub fn contains(&self, person: PersonId) -> bool { self.genders.contains_key(&person) }

  pub fn gender(&self, person: PersonId) -> Option<Gender> {
    self.genders.get(&person).copied()
  }

  /// Active edges of `person` in insertion order, followed by historical ones
  /// when requested.
  pub fn edges(
    &self,
    person: PersonId,
    include_historical: bool,
  ) -> impl Iterator<Item = &Edge> + '_ {
    let active: &[Edge] =
      self.adjacency.get(&person).map(Vec::as_slice).unwrap_or_default();
    let past: &[Edge] = if include_historical {
      self.historical.get(&person).map(Vec::as_slice).unwrap_or_default()
    } else {
      &[]
    };
    active.iter().chain(past)
  }

  pub fn endpoints(&self, relationship: Uuid) -> Option<Endpoints> {
    self.endpoints.get(&relationship).copied()
  }

  pub fn violations(&self) -> &[Violation] { &self.violations }

  pub fn person_count(&self) -> usize { self.genders.len() }
}
