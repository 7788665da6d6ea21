//! Handlers for `/comments` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/comments/:movie_id` | Body: `{"body":"..."}`; login required; returns 201 + movie |
//! | `DELETE` | `/comments/delete/:movie_id/:comment_id` | Author only; returns 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use marquee_core::{movie::NewComment, resource::comments, store::MovieStore};
use serde_json::json;

use crate::{caller::Caller, error::ApiError};

/// `POST /comments/:movie_id`
pub async fn append<S>(
  State(store): State<Arc<S>>,
  Caller(ctx): Caller,
  Path(movie_id): Path<String>,
  body: Result<Json<NewComment>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MovieStore,
{
  let Json(body) = body?;
  let (movie, _comment) =
    comments::append(store.as_ref(), &ctx, &movie_id, body).await?;
  Ok((StatusCode::CREATED, Json(json!({ "movie": movie }))))
}

/// `DELETE /comments/delete/:movie_id/:comment_id`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Caller(ctx): Caller,
  Path((movie_id, comment_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError>
where
  S: MovieStore,
{
  comments::remove(store.as_ref(), &ctx, &movie_id, &comment_id).await?;
  Ok(StatusCode::NO_CONTENT)
}
