//! [`PerspectiveEngine`]: the facade that owns entities, graph and cache.
//!
//! All mutation goes through `&mut self`. Callers sharing an engine across
//! tasks must serialise access (the HTTP layer holds one async mutex across
//! "write to store, then update engine"), so no read can observe a result
//! computed before the change.

use kindred_core::{
  PersonId,
  person::Person,
  relationship::Relationship,
};
use uuid::Uuid;

use crate::{
  EngineConfig,
  Error,
  Result,
  cache::{CacheKey, CacheStats, PerspectiveCache},
  entity::EntityStore,
  graph::{Endpoints, Graph, Violation},
  resolve::{self, ResolveOptions, Resolution},
};

#[derive(Debug, Default)]
pub struct PerspectiveEngine {
  config:   EngineConfig,
  entities: EntityStore,
  graph:    Graph,
  cache:    PerspectiveCache,
}

impl PerspectiveEngine {
  /// An engine with no people.
  pub fn new(config: EngineConfig) -> Self {
    Self { config, ..Self::default() }
  }

  /// Build an engine from full collections.
  pub fn with_records(
    config: EngineConfig,
    persons: Vec<Person>,
    relationships: Vec<Relationship>,
  ) -> Result<Self> {
    let mut engine = Self::new(config);
    engine.rebuild_graph(persons, relationships)?;
    Ok(engine)
  }

  pub fn config(&self) -> &EngineConfig { &self.config }

  pub fn entities(&self) -> &EntityStore { &self.entities }

  /// Direct access for callers that mutate records themselves. They must call
  /// [`Self::on_relationship_changed`] afterwards.
  pub fn entities_mut(&mut self) -> &mut EntityStore { &mut self.entities }

  pub fn graph(&self) -> &Graph { &self.graph }

  pub fn violations(&self) -> &[Violation] { self.graph.violations() }

  pub fn cache_stats(&self) -> CacheStats { self.cache.stats() }

  // ── Rebuild ───────────────────────────────────────────────────────────

  /// Replace every record and rebuild from scratch. On failure the previous
  /// records, graph and cache stay in effect.
  pub fn rebuild_graph(
    &mut self,
    persons: Vec<Person>,
    relationships: Vec<Relationship>,
  ) -> Result<()> {
    let entities = EntityStore::from_records(persons, relationships)?;
    let graph = Graph::build(entities.persons(), entities.relationships())?;

    tracing::info!(
      persons = entities.len_persons(),
      relationships = entities.len_relationships(),
      violations = graph.violations().len(),
      "relationship graph rebuilt"
    );

    self.entities = entities;
    self.graph = graph;
    self.cache.invalidate_all();
    Ok(())
  }

  // ── Queries ───────────────────────────────────────────────────────────

  /// How `target` relates to `viewpoint`, over active relationships only.
  pub fn resolve_perspective(
    &mut self,
    viewpoint: PersonId,
    target: PersonId,
  ) -> Result<Resolution> {
    self.resolve_perspective_with(viewpoint, target, ResolveOptions::default())
  }

  pub fn resolve_perspective_with(
    &mut self,
    viewpoint: PersonId,
    target: PersonId,
    options: ResolveOptions,
  ) -> Result<Resolution> {
    let key = CacheKey { viewpoint, target, options };
    let graph = &self.graph;
    let config = &self.config;
    self
      .cache
      .get_or_resolve(key, || resolve::resolve(graph, viewpoint, target, options, config))
  }

  /// Resolve `viewpoint` against every other person. Related people come
  /// first by distance, then those beyond the search horizon, then the
  /// unconnected; ties keep entity order.
  pub fn perspectives_from(
    &mut self,
    viewpoint: PersonId,
    options: ResolveOptions,
  ) -> Result<Vec<Resolution>> {
    if !self.graph.contains(viewpoint) {
      return Err(Error::UnknownPerson(viewpoint));
    }
    let targets: Vec<PersonId> = self
      .entities
      .person_ids()
      .filter(|id| *id != viewpoint)
      .collect();

    let mut out = targets
      .into_iter()
      .map(|target| self.resolve_perspective_with(viewpoint, target, options))
      .collect::<Result<Vec<_>>>()?;

    out.sort_by_key(|res| match res {
      Resolution::Related(p) => (0, p.distance),
      Resolution::BeyondHorizon { horizon, .. } => (1, *horizon),
      Resolution::NotConnected { .. } => (2, 0),
    });
    Ok(out)
  }

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Insert or update a person. Labels may depend on gender, so results
  /// that involve the person are dropped.
  pub fn upsert_person(&mut self, person: Person) -> Result<()> {
    let id = person.id;
    self.entities.upsert_person(person);
    self.graph = Graph::build(self.entities.persons(), self.entities.relationships())?;
    self.cache.invalidate(id);
    Ok(())
  }

  /// Validated insert or update of a relationship, followed by
  /// [`Self::on_relationship_changed`].
  pub fn put_relationship(&mut self, rel: Relationship) -> Result<()> {
    if rel.person_a == rel.person_b {
      return Err(Error::SelfRelationship(rel.id));
    }
    for person in [rel.person_a, rel.person_b] {
      if !self.entities.contains_person(person) {
        return Err(Error::DataIntegrity { relationship: rel.id, person });
      }
    }
    if let Some(existing) = self.entities.relationship(rel.id)
      && existing.kind != rel.kind
    {
      return Err(Error::KindChanged {
        id:   rel.id,
        from: existing.kind,
        to:   rel.kind,
      });
    }

    let id = rel.id;
    self.entities.upsert_relationship(rel);
    self.on_relationship_changed(id)
  }

  /// Delete a relationship outright (as opposed to ending it).
  pub fn remove_relationship(&mut self, id: Uuid) -> Result<Relationship> {
    let removed = self
      .entities
      .remove_relationship(id)
      .ok_or(Error::UnknownRelationship(id))?;
    self.on_relationship_changed(id)?;
    Ok(removed)
  }

  /// Bring the graph and cache in line with the entity store after
  /// relationship `relationship_id` was created, updated or deleted.
  ///
  /// Both endpoints (before and after the change) are invalidated. A change
  /// that adds connectivity can shorten paths that touch neither endpoint, so
  /// it clears the whole cache instead. If the entity store no longer forms a
  /// valid graph the previous graph is kept and the error returned.
  pub fn on_relationship_changed(&mut self, relationship_id: Uuid) -> Result<()> {
    let before = self.graph.endpoints(relationship_id);
    let graph = Graph::build(self.entities.persons(), self.entities.relationships())?;
    let after = graph.endpoints(relationship_id);
    self.graph = graph;

    if adds_connectivity(before, after) {
      self.cache.invalidate_all();
      tracing::debug!(relationship = %relationship_id, "relationship added, cache cleared");
      return Ok(());
    }

    let mut dropped = 0;
    for ep in [before, after].into_iter().flatten() {
      dropped += self.cache.invalidate(ep.person_a);
      dropped += self.cache.invalidate(ep.person_b);
    }
    // Historical walks and unresolved results can change without touching
    // either endpoint's cached paths.
    dropped += self
      .cache
      .invalidate_where(|key, res| key.options.include_historical || !res.is_related());

    tracing::debug!(relationship = %relationship_id, dropped, "relationship changed");
    Ok(())
  }
}

fn adds_connectivity(before: Option<Endpoints>, after: Option<Endpoints>) -> bool {
  match (before, after) {
    (_, None) => false,
    (None, Some(after)) => after.active,
    (Some(before), Some(after)) => {
      after.active
        && (!before.active
          || before.person_a != after.person_a
          || before.person_b != after.person_b)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ep(active: bool) -> Endpoints {
    Endpoints { person_a: Uuid::nil(), person_b: Uuid::max(), active }
  }

  #[test]
  fn connectivity_changes() {
    assert!(adds_connectivity(None, Some(ep(true))));
    assert!(!adds_connectivity(None, Some(ep(false))));
    assert!(adds_connectivity(Some(ep(false)), Some(ep(true))));
    assert!(!adds_connectivity(Some(ep(true)), Some(ep(false))));
    assert!(!adds_connectivity(Some(ep(true)), None));
    assert!(!adds_connectivity(Some(ep(true)), Some(ep(true))));
  }
}
