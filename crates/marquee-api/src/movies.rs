//! Handlers for `/movies` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/movies` | All movies, owners and comment authors resolved |
//! | `GET`    | `/movies/mine` | Only the caller's movies |
//! | `POST`   | `/movies` | Body: [`MovieInput`]; login required; returns 201 |
//! | `GET`    | `/movies/:id` | 404 if not found |
//! | `PUT`    | `/movies/:id` | Body: [`MoviePatch`]; owner only; returns 204 |
//! | `DELETE` | `/movies/:id` | Owner only; returns 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use marquee_core::{
  movie::{MovieInput, MoviePatch},
  resource::movies::{self, ListScope},
  store::MovieStore,
};
use serde_json::json;

use crate::{caller::Caller, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /movies`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Caller(ctx): Caller,
) -> Result<impl IntoResponse, ApiError>
where
  S: MovieStore,
{
  let movies = movies::list(store.as_ref(), &ctx, ListScope::All).await?;
  Ok(Json(json!({ "movies": movies })))
}

/// `GET /movies/mine`
pub async fn mine<S>(
  State(store): State<Arc<S>>,
  Caller(ctx): Caller,
) -> Result<impl IntoResponse, ApiError>
where
  S: MovieStore,
{
  let movies = movies::list(store.as_ref(), &ctx, ListScope::Mine).await?;
  Ok(Json(json!({ "movies": movies })))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /movies/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MovieStore,
{
  let movie = movies::get_one(store.as_ref(), &id).await?;
  Ok(Json(json!({ "movie": movie })))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /movies` — returns 201 + the stored movie.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Caller(ctx): Caller,
  body: Result<Json<MovieInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MovieStore,
{
  let Json(body) = body?;
  let movie = movies::create(store.as_ref(), &ctx, body).await?;
  Ok((StatusCode::CREATED, Json(json!({ "movie": movie }))))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /movies/:id` — returns 204 on success.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Caller(ctx): Caller,
  Path(id): Path<String>,
  patch: Result<Json<MoviePatch>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
  S: MovieStore,
{
  let Json(patch) = patch?;
  movies::update(store.as_ref(), &ctx, &id, patch).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /movies/:id` — returns 204 on success.
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Caller(ctx): Caller,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: MovieStore,
{
  movies::delete(store.as_ref(), &ctx, &id).await?;
  Ok(StatusCode::NO_CONTENT)
}
