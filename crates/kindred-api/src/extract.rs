//! Request extractors whose rejections render as [`ApiError`] JSON bodies.
//!
//! Drop-in replacements for axum's `Json`, `Path` and `Query`. Handlers
//! import these instead, so a malformed body, query string or path id gets
//! the same `{"error": ...}` shape as every other failure.

use axum::{
  extract::{FromRequest, FromRequestParts, OptionalFromRequest, Request},
  response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::ApiError;

/// JSON request body, or JSON response.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
  fn into_response(self) -> Response { axum::Json(self.0).into_response() }
}

/// A request without a JSON `Content-Type` yields `None`.
impl<T, S> OptionalFromRequest<S> for Json<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
    let body = <axum::Json<T> as OptionalFromRequest<S>>::from_request(req, state).await?;
    Ok(body.map(|axum::Json(value)| Json(value)))
  }
}

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);
