//! Handlers for `/relationships` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/relationships` | Optional `?include_inactive=true` |
//! | `POST`   | `/relationships` | Body: [`CreateBody`]; 201; records a notification |
//! | `GET`    | `/relationships/:id` | 404 if not found |
//! | `POST`   | `/relationships/:id/end` | Body: `{"ended_on":"YYYY-MM-DD"}`; the date may be omitted |
//! | `DELETE` | `/relationships/:id` | 204 |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::NaiveDate;
use kindred_core::{
  notification::{NewNotification, NotificationPayload},
  relationship::{NewRelationship, Relationship},
  store::FamilyStore,
};
use kindred_graph::PerspectiveEngine;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  ApiState,
  error::ApiError,
  extract::{Json, Path, Query},
};

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Also return ended relationships. Default `false`.
  #[serde(default)]
  pub include_inactive: bool,
}

/// `GET /relationships[?include_inactive=true]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Relationship>>, ApiError>
where
  S: FamilyStore,
{
  let rels = state
    .store
    .list_relationships(params.include_inactive)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(rels))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /relationships`.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  #[serde(flatten)]
  pub relationship: NewRelationship,
  /// Who recorded the relationship. Defaults to `"system"`.
  pub added_by:     Option<String>,
  /// Recipient of the notification. Defaults to `added_by`.
  pub notify:       Option<String>,
}

/// `POST /relationships`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FamilyStore,
{
  let CreateBody { relationship, added_by, notify } = body;
  if relationship.person_a == relationship.person_b {
    return Err(ApiError::BadRequest("a person cannot be related to themselves".into()));
  }

  let mut engine = state.engine.lock().await;
  let rel = state
    .store
    .add_relationship(relationship)
    .await
    .map_err(ApiError::store)?;
  engine.put_relationship(rel.clone())?;

  let added_by = added_by.unwrap_or_else(|| "system".to_owned());
  let notification = NewNotification {
    user_id: notify.unwrap_or_else(|| added_by.clone()),
    title:   "New Family Connection".to_owned(),
    message: connection_message(&engine, &rel),
    payload: NotificationPayload::Relationship {
      relationship_id: rel.id,
      member_ids:      [rel.person_a, rel.person_b],
      added_by,
    },
  };
  drop(engine);

  state
    .store
    .record_notification(notification)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(relationship = %rel.id, kind = rel.kind.as_ref(), "relationship created");
  Ok((StatusCode::CREATED, Json(rel)))
}

fn connection_message(engine: &PerspectiveEngine, rel: &Relationship) -> String {
  let name = |id: Uuid| {
    engine
      .entities()
      .person(id)
      .map(|p| p.full_name())
      .unwrap_or_else(|| id.to_string())
  };
  format!(
    "A new family connection was added: {} and {} ({})",
    name(rel.person_a),
    name(rel.person_b),
    rel.kind.as_ref().replace('_', "/"),
  )
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /relationships/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Relationship>, ApiError>
where
  S: FamilyStore,
{
  let rel = state
    .store
    .get_relationship(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("relationship {id} not found")))?;
  Ok(Json(rel))
}

// ─── End ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EndBody {
  pub ended_on: Option<NaiveDate>,
}

/// `POST /relationships/:id/end`: the record stays, marked inactive. The body
/// may be left out entirely.
pub async fn end_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  body: Option<Json<EndBody>>,
) -> Result<Json<Relationship>, ApiError>
where
  S: FamilyStore,
{
  let ended_on = body.and_then(|Json(body)| body.ended_on);
  let mut engine = state.engine.lock().await;
  let rel = state
    .store
    .end_relationship(id, ended_on)
    .await
    .map_err(ApiError::store)?;
  engine.put_relationship(rel.clone())?;
  Ok(Json(rel))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /relationships/:id`: for records entered in error.
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: FamilyStore,
{
  let mut engine = state.engine.lock().await;
  state
    .store
    .delete_relationship(id)
    .await
    .map_err(ApiError::store)?;
  engine.remove_relationship(id)?;
  Ok(StatusCode::NO_CONTENT)
}
