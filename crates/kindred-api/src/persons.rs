//! Handlers for `/persons` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/persons` | Creation order |
//! | `POST` | `/persons` | Body: [`NewPerson`]; returns 201 + stored person |
//! | `GET`  | `/persons/:id` | 404 if not found |
//! | `PUT`  | `/persons/:id` | Body: [`NewPerson`]; replaces editable fields |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use kindred_core::{
  person::{NewPerson, Person, PersonId},
  store::FamilyStore,
};

use crate::{
  ApiState,
  error::ApiError,
  extract::{Json, Path},
};

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /persons`
pub async fn list<S>(State(state): State<ApiState<S>>) -> Result<Json<Vec<Person>>, ApiError>
where
  S: FamilyStore,
{
  let persons = state.store.list_persons().await.map_err(ApiError::store)?;
  Ok(Json(persons))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /persons`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewPerson>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FamilyStore,
{
  if body.given_name.trim().is_empty() {
    return Err(ApiError::BadRequest("given_name must not be empty".into()));
  }

  let mut engine = state.engine.lock().await;
  let person = state.store.add_person(body).await.map_err(ApiError::store)?;
  engine.upsert_person(person.clone())?;
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /persons/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<PersonId>,
) -> Result<Json<Person>, ApiError>
where
  S: FamilyStore,
{
  let person = state
    .store
    .get_person(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(person))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /persons/:id`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<PersonId>,
  Json(body): Json<NewPerson>,
) -> Result<Json<Person>, ApiError>
where
  S: FamilyStore,
{
  let mut engine = state.engine.lock().await;
  let person = state.store.update_person(id, body).await.map_err(ApiError::store)?;
  engine.upsert_person(person.clone())?;
  Ok(Json(person))
}
