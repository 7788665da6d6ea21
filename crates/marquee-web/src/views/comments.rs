//! Comment form handlers. Both redirect back to the parent movie.

use axum::{
  Form,
  extract::{Path, State, rejection::FormRejection},
  response::Redirect,
};
use marquee_api::Caller;
use marquee_core::{movie::NewComment, resource::comments, store::MovieStore};

use super::ViewError;
use crate::AppState;

/// `POST /comments/:movie_id`
pub async fn append<S>(
  State(state): State<AppState<S>>,
  Caller(ctx): Caller,
  Path(movie_id): Path<String>,
  input: Result<Form<NewComment>, FormRejection>,
) -> Result<Redirect, ViewError>
where
  S: MovieStore + Clone + 'static,
{
  let Form(input) = input?;
  let (movie, _) =
    comments::append(state.store.as_ref(), &ctx, &movie_id, input).await?;
  Ok(Redirect::to(&format!("/movies/{}", movie.movie_id)))
}

/// `DELETE /comments/delete/:movie_id/:comment_id`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  Caller(ctx): Caller,
  Path((movie_id, comment_id)): Path<(String, String)>,
) -> Result<Redirect, ViewError>
where
  S: MovieStore + Clone + 'static,
{
  let movie =
    comments::remove(state.store.as_ref(), &ctx, &movie_id, &comment_id)
      .await?;
  Ok(Redirect::to(&format!("/movies/{}", movie.movie_id)))
}
