//! Tunables for the perspective engine.

use serde::Deserialize;

/// Engine settings. Every field has a default so a config file may omit the
/// whole `[engine]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
  /// Paths longer than this are labeled "Distant relative (N steps)".
  pub max_label_hops:  usize,
  /// BFS never expands past this depth.
  pub max_search_hops: usize,
  /// Pick "Brother"/"Sister" over "Sibling" based on the target's gender.
  pub gendered_labels: bool,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self { max_label_hops: 4, max_search_hops: 6, gendered_labels: false }
  }
}
