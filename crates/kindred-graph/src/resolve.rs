//! Perspective resolution: bounded breadth-first search plus labeling.
//!
//! Neighbours are expanded in adjacency order and a person is claimed by the
//! first edge that reaches it. Together with insertion-ordered adjacency lists
//! this makes the chosen path reproducible when several shortest paths exist.

use std::collections::{HashMap, HashSet, VecDeque};

use kindred_core::{PersonId, person::Gender};
use serde::Serialize;
use uuid::Uuid;

use crate::{
  EngineConfig,
  Error,
  Result,
  graph::{Edge, EdgeKind, Graph},
  label,
};

// ─── Query options ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ResolveOptions {
  /// Also walk ended relationships (after the active ones).
  pub include_historical: bool,
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// One hop of a resolved path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PathStep {
  pub kind:            EdgeKind,
  pub relationship_id: Uuid,
  /// The hop uses an ended relationship.
  pub historical:      bool,
}

impl From<&Edge> for PathStep {
  fn from(edge: &Edge) -> Self {
    Self {
      kind:            edge.kind,
      relationship_id: edge.relationship_id,
      historical:      !edge.active,
    }
  }
}

/// The relationship of `target` as seen from `viewpoint`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Perspective {
  /// Derived from the ordered pair and query mode, so recomputation yields
  /// the same id.
  pub id:        Uuid,
  pub viewpoint: PersonId,
  pub target:    PersonId,
  pub label:     String,
  /// Number of edges on `path`.
  pub distance:  usize,
  /// Viewpoint to target, inclusive.
  pub path:      Vec<PersonId>,
  pub steps:     Vec<PathStep>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  Related(Perspective),
  /// The search hit its depth bound before finding the target.
  BeyondHorizon {
    viewpoint: PersonId,
    target:    PersonId,
    horizon:   usize,
  },
  /// No path exists: separate family branches.
  NotConnected {
    viewpoint: PersonId,
    target:    PersonId,
  },
}

impl Resolution {
  pub fn perspective(&self) -> Option<&Perspective> {
    match self {
      Self::Related(p) => Some(p),
      _ => None,
    }
  }

  pub fn is_related(&self) -> bool { matches!(self, Self::Related(_)) }

  pub fn is_connected(&self) -> bool { !matches!(self, Self::NotConnected { .. }) }

  pub fn viewpoint(&self) -> PersonId {
    match self {
      Self::Related(p) => p.viewpoint,
      Self::BeyondHorizon { viewpoint, .. } | Self::NotConnected { viewpoint, .. } => {
        *viewpoint
      }
    }
  }

  pub fn target(&self) -> PersonId {
    match self {
      Self::Related(p) => p.target,
      Self::BeyondHorizon { target, .. } | Self::NotConnected { target, .. } => *target,
    }
  }

  pub fn distance(&self) -> Option<usize> { self.perspective().map(|p| p.distance) }

  pub fn label(&self) -> Option<&str> {
    match self {
      Self::Related(p) => Some(&p.label),
      Self::BeyondHorizon { .. } => Some(label::DISTANT_LABEL),
      Self::NotConnected { .. } => None,
    }
  }

  /// People this result depends on: the path when there is one, otherwise
  /// just the two endpoints.
  pub fn members(&self) -> Vec<PersonId> {
    match self {
      Self::Related(p) => p.path.clone(),
      _ => vec![self.viewpoint(), self.target()],
    }
  }
}

// ─── Resolver ────────────────────────────────────────────────────────────────

fn perspective_id(viewpoint: PersonId, target: PersonId, options: ResolveOptions) -> Uuid {
  let mut name = Vec::with_capacity(33);
  name.extend_from_slice(viewpoint.as_bytes());
  name.extend_from_slice(target.as_bytes());
  name.push(u8::from(options.include_historical));
  Uuid::new_v5(&Uuid::NAMESPACE_OID, &name)
}

/// Resolve how `target` relates to `viewpoint` in `graph`.
///
/// Errors only when either person is missing from the graph. A target in
/// another component is a normal [`Resolution::NotConnected`]; one in the same
/// component but past `max_search_hops` is [`Resolution::BeyondHorizon`].
pub fn resolve(
  graph: &Graph,
  viewpoint: PersonId,
  target: PersonId,
  options: ResolveOptions,
  config: &EngineConfig,
) -> Result<Resolution> {
  for person in [viewpoint, target] {
    if !graph.contains(person) {
      return Err(Error::UnknownPerson(person));
    }
  }

  if viewpoint == target {
    return Ok(Resolution::Related(Perspective {
      id: perspective_id(viewpoint, target, options),
      viewpoint,
      target,
      label: label::SELF_LABEL.to_owned(),
      distance: 0,
      path: vec![viewpoint],
      steps: Vec::new(),
    }));
  }

  if !graph.same_component(viewpoint, target, options.include_historical) {
    return Ok(Resolution::NotConnected { viewpoint, target });
  }

  // Same component from here on: a miss can only come from the depth bound.
  let horizon = config.max_search_hops;
  let mut came_from: HashMap<PersonId, (PersonId, PathStep)> = HashMap::new();
  let mut visited: HashSet<PersonId> = HashSet::from([viewpoint]);
  let mut queue: VecDeque<(PersonId, usize)> = VecDeque::from([(viewpoint, 0)]);

  while let Some((person, depth)) = queue.pop_front() {
    if depth >= horizon {
      continue;
    }

    for edge in graph.edges(person, options.include_historical) {
      if !visited.insert(edge.to) {
        continue;
      }
      came_from.insert(edge.to, (person, PathStep::from(edge)));
      if edge.to == target {
        let (path, steps) = walk_back(&came_from, viewpoint, target);
        return Ok(Resolution::Related(label_path(
          graph, viewpoint, target, path, steps, options, config,
        )));
      }
      queue.push_back((edge.to, depth + 1));
    }
  }

  tracing::debug!(%viewpoint, %target, horizon, "search stopped at depth bound");
  Ok(Resolution::BeyondHorizon { viewpoint, target, horizon })
}

fn walk_back(
  came_from: &HashMap<PersonId, (PersonId, PathStep)>,
  viewpoint: PersonId,
  target: PersonId,
) -> (Vec<PersonId>, Vec<PathStep>) {
  let mut path = vec![target];
  let mut steps = Vec::new();
  let mut cursor = target;
  while cursor != viewpoint {
    let Some(&(prev, step)) = came_from.get(&cursor) else { break };
    steps.push(step);
    path.push(prev);
    cursor = prev;
  }
  path.reverse();
  steps.reverse();
  (path, steps)
}

fn label_path(
  graph: &Graph,
  viewpoint: PersonId,
  target: PersonId,
  path: Vec<PersonId>,
  steps: Vec<PathStep>,
  options: ResolveOptions,
  config: &EngineConfig,
) -> Perspective {
  let gender = graph.gender(target).unwrap_or(Gender::Other);
  let kinds: Vec<EdgeKind> = steps.iter().map(|s| s.kind).collect();
  let mut text = label::compose(&kinds, gender, config);
  if steps.iter().any(|s| s.historical) {
    text = label::former(text, &kinds, gender, config);
  }

  Perspective {
    id: perspective_id(viewpoint, target, options),
    viewpoint,
    target,
    label: text,
    distance: steps.len(),
    path,
    steps,
  }
}
