//! Handlers for perspective queries.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/perspectives` | `?viewpoint=<id>&target=<id>[&include_historical=true]` |
//! | `GET`  | `/persons/:id/perspectives` | `[?filter=all\|close\|distant][&q=...][&include_historical=true]` |

use axum::extract::State;
use kindred_core::{PersonId, store::FamilyStore};
use kindred_graph::{Resolution, ResolveOptions};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  ApiState,
  error::ApiError,
  extract::{Json, Path, Query},
};

// ─── Response body ───────────────────────────────────────────────────────────

/// Wire form of a [`Resolution`].
///
/// Related: `connected`, `label`, `distance`, `path`. Beyond the search
/// horizon: `connected`, `label`, `horizon`. Unconnected: `connected: false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerspectiveBody {
  pub connected: bool,
  pub viewpoint: PersonId,
  pub target:    PersonId,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:        Option<Uuid>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label:     Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub distance:  Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub path:      Option<Vec<PersonId>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub horizon:   Option<usize>,
}

impl From<&Resolution> for PerspectiveBody {
  fn from(res: &Resolution) -> Self {
    let mut body = Self {
      connected: res.is_connected(),
      viewpoint: res.viewpoint(),
      target:    res.target(),
      id:        None,
      label:     res.label().map(str::to_owned),
      distance:  res.distance(),
      path:      None,
      horizon:   None,
    };
    match res {
      Resolution::Related(p) => {
        body.id = Some(p.id);
        body.path = Some(p.path.clone());
      }
      Resolution::BeyondHorizon { horizon, .. } => body.horizon = Some(*horizon),
      Resolution::NotConnected { .. } => {}
    }
    body
  }
}

// ─── Single pair ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResolveParams {
  pub viewpoint:          PersonId,
  pub target:             PersonId,
  #[serde(default)]
  pub include_historical: bool,
}

/// `GET /perspectives?viewpoint=<id>&target=<id>`
pub async fn resolve_one<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ResolveParams>,
) -> Result<Json<PerspectiveBody>, ApiError>
where
  S: FamilyStore,
{
  let options = ResolveOptions { include_historical: params.include_historical };
  let res = state
    .engine
    .lock()
    .await
    .resolve_perspective_with(params.viewpoint, params.target, options)?;
  Ok(Json(PerspectiveBody::from(&res)))
}

// ─── Explorer ────────────────────────────────────────────────────────────────

/// Distance bucket for the explorer listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
  #[default]
  All,
  /// Within two steps.
  Close,
  /// More than two steps, including people past the search horizon.
  Distant,
}

impl Filter {
  fn keeps(self, res: &Resolution) -> bool {
    match (self, res) {
      (Self::All, _) => true,
      (Self::Close, Resolution::Related(p)) => p.distance <= 2,
      (Self::Distant, Resolution::Related(p)) => p.distance > 2,
      (Self::Distant, Resolution::BeyondHorizon { .. }) => true,
      _ => false,
    }
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct ExploreParams {
  #[serde(default)]
  pub filter:             Filter,
  /// Case-insensitive substring of the label.
  pub q:                  Option<String>,
  #[serde(default)]
  pub include_historical: bool,
}

/// `GET /persons/:id/perspectives`: everyone as seen from `id`, nearest
/// first.
pub async fn explore<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<PersonId>,
  Query(params): Query<ExploreParams>,
) -> Result<Json<Vec<PerspectiveBody>>, ApiError>
where
  S: FamilyStore,
{
  let options = ResolveOptions { include_historical: params.include_historical };
  let all = state.engine.lock().await.perspectives_from(id, options)?;

  let needle = params.q.as_deref().map(str::to_lowercase).filter(|q| !q.is_empty());
  let bodies = all
    .iter()
    .filter(|res| params.filter.keeps(res))
    .filter(|res| match &needle {
      Some(q) => res.label().is_some_and(|l| l.to_lowercase().contains(q)),
      None => true,
    })
    .map(PerspectiveBody::from)
    .collect();
  Ok(Json(bodies))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unconnected_body_is_minimal() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let body = PerspectiveBody::from(&Resolution::NotConnected { viewpoint: a, target: b });
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json["connected"], false);
    assert!(json.get("label").is_none());
    assert!(json.get("distance").is_none());
  }

  #[test]
  fn horizon_body_names_the_bound() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let res = Resolution::BeyondHorizon { viewpoint: a, target: b, horizon: 6 };
    let json = serde_json::to_value(PerspectiveBody::from(&res)).unwrap();
    assert_eq!(json["connected"], true);
    assert_eq!(json["label"], "Distant relative");
    assert_eq!(json["horizon"], 6);
    assert!(json.get("path").is_none());
  }

  #[test]
  fn filters_bucket_by_distance() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let far = Resolution::BeyondHorizon { viewpoint: a, target: b, horizon: 6 };
    let none = Resolution::NotConnected { viewpoint: a, target: b };
    assert!(Filter::Distant.keeps(&far));
    assert!(!Filter::Close.keeps(&far));
    assert!(!Filter::Close.keeps(&none));
    assert!(!Filter::Distant.keeps(&none));
    assert!(Filter::All.keeps(&none));
  }
}
