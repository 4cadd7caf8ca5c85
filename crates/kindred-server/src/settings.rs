//! Server configuration: a TOML file layered under `KINDRED_*` environment
//! variables.
//!
//! ```toml
//! host       = "0.0.0.0"
//! port       = 8080
//! store_path = "~/.local/share/kindred/kindred.db"
//!
//! [engine]
//! max_label_hops  = 4
//! max_search_hops = 6
//! gendered_labels = true
//! ```
//!
//! Nested keys use a double underscore in the environment, e.g.
//! `KINDRED_ENGINE__GENDERED_LABELS=true`.

use std::path::{Path, PathBuf};

use config::{ConfigError, Environment, File, Source};
use kindred_graph::EngineConfig;
use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub engine:     EngineConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_owned(),
      port:       8080,
      store_path: PathBuf::from("~/.local/share/kindred/kindred.db"),
      engine:     EngineConfig::default(),
    }
  }
}

impl ServerConfig {
  /// Read `path` (missing is fine) and apply environment overrides.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::from_source(File::from(path).required(false))
  }

  fn from_source(file: impl Source + Send + Sync + 'static) -> Result<Self, ConfigError> {
    config::Config::builder()
      .add_source(file)
      .add_source(
        Environment::with_prefix("KINDRED")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use config::FileFormat;

  use super::*;

  #[test]
  fn partial_file_keeps_defaults() {
    let toml = r#"
      port = 9000

      [engine]
      gendered_labels = true
    "#;
    let cfg = ServerConfig::from_source(File::from_str(toml, FileFormat::Toml)).unwrap();
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.host, "127.0.0.1");
    assert!(cfg.engine.gendered_labels);
    assert_eq!(cfg.engine.max_search_hops, 6);
    assert_eq!(cfg.address(), "127.0.0.1:9000");
  }

  #[test]
  fn missing_file_is_not_an_error() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/kindred.toml")).unwrap();
    assert_eq!(cfg.engine, EngineConfig::default());
  }

  #[test]
  fn tilde_is_expanded_only_at_the_start() {
    let plain = Path::new("/var/lib/kindred.db");
    assert_eq!(expand_tilde(plain), plain);
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expand_tilde(Path::new("~/k.db")), PathBuf::from(home).join("k.db"));
    }
  }
}
