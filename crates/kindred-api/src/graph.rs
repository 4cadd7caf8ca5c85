//! Handlers for `/graph` maintenance endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/graph` | Sizes, rule violations and cache counters |
//! | `POST` | `/graph/rebuild` | Reload every record from the store |

use axum::extract::State;
use kindred_core::store::FamilyStore;
use kindred_graph::{PerspectiveEngine, cache::CacheStats, graph::Violation};
use serde::Serialize;

use crate::{ApiState, error::ApiError, extract::Json};

#[derive(Debug, Serialize)]
pub struct GraphStatus {
  pub persons:       usize,
  pub relationships: usize,
  pub violations:    Vec<Violation>,
  pub cache:         CacheStats,
}

impl From<&PerspectiveEngine> for GraphStatus {
  fn from(engine: &PerspectiveEngine) -> Self {
    Self {
      persons:       engine.entities().len_persons(),
      relationships: engine.entities().len_relationships(),
      violations:    engine.violations().to_vec(),
      cache:         engine.cache_stats(),
    }
  }
}

/// `GET /graph`
pub async fn status<S>(State(state): State<ApiState<S>>) -> Json<GraphStatus>
where
  S: FamilyStore,
{
  let engine = state.engine.lock().await;
  Json(GraphStatus::from(&*engine))
}

/// `POST /graph/rebuild`: on failure the previous graph stays in effect.
pub async fn rebuild<S>(State(state): State<ApiState<S>>) -> Result<Json<GraphStatus>, ApiError>
where
  S: FamilyStore,
{
  let mut engine = state.engine.lock().await;
  let persons = state.store.list_persons().await.map_err(ApiError::store)?;
  let relationships = state
    .store
    .list_relationships(true)
    .await
    .map_err(ApiError::store)?;
  engine.rebuild_graph(persons, relationships)?;
  Ok(Json(GraphStatus::from(&*engine)))
}
