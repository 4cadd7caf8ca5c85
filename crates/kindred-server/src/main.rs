//! kindred server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, loads every person and relationship into the perspective
//! engine, and serves the JSON API under `/api`.

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::Router;
use clap::Parser;
use kindred_api::ApiState;
use kindred_core::store::FamilyStore as _;
use kindred_graph::PerspectiveEngine;
use kindred_store_sqlite::SqliteStore;
use settings::{ServerConfig, expand_tilde};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Kindred family-tree server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to read config from {:?}", cli.config))?;

  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // The engine sees ended relationships too; historical queries walk them.
  let persons = store.list_persons().await.context("failed to load people")?;
  let relationships = store
    .list_relationships(true)
    .await
    .context("failed to load relationships")?;
  let engine = PerspectiveEngine::with_records(server_cfg.engine, persons, relationships)
    .context("failed to build relationship graph")?;

  let state = ApiState::new(Arc::new(store), engine);
  let app = Router::new().nest("/api", kindred_api::api_router(state));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
