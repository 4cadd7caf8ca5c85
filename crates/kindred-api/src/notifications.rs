//! Handlers for `/notifications` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/notifications` | Newest first; optional `?user_id=...&unread_only=true` |
//! | `POST` | `/notifications/:id/read` | Returns the updated notification |

use axum::extract::State;
use kindred_core::{notification::Notification, store::FamilyStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  ApiState,
  error::ApiError,
  extract::{Json, Path, Query},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub user_id:     Option<String>,
  #[serde(default)]
  pub unread_only: bool,
}

/// `GET /notifications`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Notification>>, ApiError>
where
  S: FamilyStore,
{
  let notifications = state
    .store
    .list_notifications(params.user_id.as_deref(), params.unread_only)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(notifications))
}

/// `POST /notifications/:id/read`
pub async fn mark_read<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Notification>, ApiError>
where
  S: FamilyStore,
{
  let notification = state
    .store
    .mark_notification_read(id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(notification))
}
