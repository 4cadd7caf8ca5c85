//! Memoised perspective results.
//!
//! Keys are ordered: "Son" from one side is "Father" from the other. Besides
//! the entries themselves the cache keeps a reverse index from each person to
//! the keys whose result depends on them, so [`PerspectiveCache::invalidate`]
//! does not scan the whole map.
//!
//! There is no eviction policy; size is bounded by family size squared.

use std::collections::{HashMap, HashSet};

use kindred_core::PersonId;
use serde::Serialize;

use crate::{Result, resolve::{ResolveOptions, Resolution}};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
  pub viewpoint: PersonId,
  pub target:    PersonId,
  pub options:   ResolveOptions,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
  pub entries: usize,
  pub hits:    u64,
  pub misses:  u64,
}

#[derive(Debug, Default)]
pub struct PerspectiveCache {
  entries: HashMap<CacheKey, Resolution>,
  members: HashMap<PersonId, HashSet<CacheKey>>,
  hits:    u64,
  misses:  u64,
}

impl PerspectiveCache {
  pub fn new() -> Self { Self::default() }

  /// Return the cached result for `key`, computing and storing it with
  /// `compute` on a miss. Errors are not cached.
  pub fn get_or_resolve(
    &mut self,
    key: CacheKey,
    compute: impl FnOnce() -> Result<Resolution>,
  ) -> Result<Resolution> {
    if let Some(hit) = self.entries.get(&key) {
      self.hits += 1;
      tracing::trace!(viewpoint = %key.viewpoint, target = %key.target, "perspective cache hit");
      return Ok(hit.clone());
    }
    self.misses += 1;
    let resolution = compute()?;
    self.insert(key, resolution.clone());
    Ok(resolution)
  }

  pub fn get(&self, key: &CacheKey) -> Option<&Resolution> { self.entries.get(key) }

  pub fn insert(&mut self, key: CacheKey, resolution: Resolution) {
    self.remove(&key);
    for person in resolution.members() {
      self.members.entry(person).or_default().insert(key);
    }
    self.entries.insert(key, resolution);
  }

  /// Drop every entry whose path includes `person`. Returns how many were
  /// dropped.
  pub fn invalidate(&mut self, person: PersonId) -> usize {
    let Some(keys) = self.members.remove(&person) else { return 0 };
    keys.iter().filter(|key| self.remove(key)).count()
  }

  /// Drop every entry matching `predicate`.
  pub fn invalidate_where(
    &mut self,
    predicate: impl Fn(&CacheKey, &Resolution) -> bool,
  ) -> usize {
    let doomed: Vec<CacheKey> = self
      .entries
      .iter()
      .filter(|(key, res)| predicate(key, res))
      .map(|(key, _)| *key)
      .collect();
    doomed.iter().filter(|key| self.remove(key)).count()
  }

  pub fn invalidate_all(&mut self) {
    self.entries.clear();
    self.members.clear();
  }

  fn remove(&mut self, key: &CacheKey) -> bool {
    let Some(old) = self.entries.remove(key) else { return false };
    for person in old.members() {
      if let Some(keys) = self.members.get_mut(&person) {
        keys.remove(key);
        if keys.is_empty() {
          self.members.remove(&person);
        }
      }
    }
    true
  }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }

  pub fn stats(&self) -> CacheStats {
    CacheStats { entries: self.entries.len(), hits: self.hits, misses: self.misses }
  }
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;
  use crate::resolve::Perspective;

  fn key(viewpoint: PersonId, target: PersonId) -> CacheKey {
    CacheKey { viewpoint, target, options: ResolveOptions::default() }
  }

  fn related(path: Vec<PersonId>) -> Resolution {
    Resolution::Related(Perspective {
      id:        Uuid::new_v4(),
      viewpoint: path[0],
      target:    *path.last().unwrap(),
      label:     "Test".into(),
      distance:  path.len() - 1,
      path,
      steps:     Vec::new(),
    })
  }

  #[test]
  fn miss_then_hit() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let mut cache = PerspectiveCache::new();
    let mut calls = 0;

    for _ in 0..2 {
      cache
        .get_or_resolve(key(a, b), || {
          calls += 1;
          Ok(related(vec![a, b]))
        })
        .unwrap();
    }

    assert_eq!(calls, 1);
    assert_eq!(cache.stats(), CacheStats { entries: 1, hits: 1, misses: 1 });
  }

  #[test]
  fn ordered_keys_are_distinct() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let mut cache = PerspectiveCache::new();
    cache.insert(key(a, b), related(vec![a, b]));
    assert!(cache.get(&key(b, a)).is_none());
  }

  #[test]
  fn invalidate_drops_paths_through_person() {
    let (a, b, c, d) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let mut cache = PerspectiveCache::new();
    cache.insert(key(a, c), related(vec![a, b, c]));
    cache.insert(key(a, d), related(vec![a, d]));
    cache.insert(key(c, d), Resolution::NotConnected { viewpoint: c, target: d });

    assert_eq!(cache.invalidate(b), 1);
    assert!(cache.get(&key(a, c)).is_none());
    assert!(cache.get(&key(a, d)).is_some());

    // Unresolved entries depend on their endpoints.
    assert_eq!(cache.invalidate(d), 2);
    assert!(cache.is_empty());
    assert_eq!(cache.invalidate(a), 0);
  }

  #[test]
  fn invalidate_where_and_all() {
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let mut cache = PerspectiveCache::new();
    cache.insert(key(a, b), related(vec![a, b]));
    cache.insert(key(a, c), Resolution::NotConnected { viewpoint: a, target: c });

    assert_eq!(cache.invalidate_where(|_, res| !res.is_related()), 1);
    assert_eq!(cache.len(), 1);

    cache.invalidate_all();
    assert!(cache.is_empty());
    assert_eq!(cache.invalidate(a), 0);
  }

  #[test]
  fn errors_are_not_cached() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let mut cache = PerspectiveCache::new();
    let err = cache.get_or_resolve(key(a, b), || Err(crate::Error::UnknownPerson(b)));
    assert!(err.is_err());
    assert!(cache.is_empty());
  }
}
