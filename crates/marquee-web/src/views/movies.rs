//! Rendered `/movies` pages and form handlers.

use axum::{
  Form,
  extract::{Path, State, rejection::FormRejection},
  response::{Html, Redirect},
};
use marquee_api::Caller;
use marquee_core::{
  movie::{MovieInput, MoviePatch, coerce_flag},
  resource::movies::{self, ListScope},
  store::MovieStore,
};
use serde::Deserialize;

use super::{ViewError, page_context};
use crate::AppState;

/// Fields posted by the new/edit forms. The rating arrives as a checkbox.
#[derive(Debug, Default, Deserialize)]
pub struct MovieForm {
  pub name:        Option<String>,
  pub genre:       Option<String>,
  pub is_pg_rated: Option<String>,
}

impl MovieForm {
  fn into_input(self) -> MovieInput {
    MovieInput {
      is_pg_rated: coerce_flag(self.is_pg_rated.as_deref()),
      name:        self.name.unwrap_or_default(),
      genre:       self.genre.unwrap_or_default(),
    }
  }

  /// An unchecked box is omitted by the browser, so the rating is always
  /// part of the patch.
  fn into_patch(self) -> MoviePatch {
    MoviePatch {
      is_pg_rated: Some(coerce_flag(self.is_pg_rated.as_deref())),
      name:        self.name,
      genre:       self.genre,
    }
  }
}

async fn render_list<S>(
  state: &AppState<S>,
  caller: &marquee_core::auth::AuthContext,
  scope: ListScope,
) -> Result<Html<String>, ViewError>
where
  S: MovieStore + Clone + 'static,
{
  let list = movies::list(state.store.as_ref(), caller, scope).await?;
  let mut page = page_context(caller);
  page.insert("movies", &list);
  page.insert("mine", &(scope == ListScope::Mine));
  Ok(state.views.render("movies/index.html", &page)?)
}

/// `GET /movies`
pub async fn index<S>(
  State(state): State<AppState<S>>,
  Caller(ctx): Caller,
) -> Result<Html<String>, ViewError>
where
  S: MovieStore + Clone + 'static,
{
  render_list(&state, &ctx, ListScope::All).await
}

/// `GET /movies/mine`
pub async fn mine<S>(
  State(state): State<AppState<S>>,
  Caller(ctx): Caller,
) -> Result<Html<String>, ViewError>
where
  S: MovieStore + Clone + 'static,
{
  render_list(&state, &ctx, ListScope::Mine).await
}

/// `GET /movies/new`
pub async fn new_form<S>(
  State(state): State<AppState<S>>,
  Caller(ctx): Caller,
) -> Result<Html<String>, ViewError>
where
  S: MovieStore + Clone + 'static,
{
  ctx.require_login()?;
  Ok(state.views.render("movies/new.html", &page_context(&ctx))?)
}

/// `GET /movies/:id`
pub async fn show<S>(
  State(state): State<AppState<S>>,
  Caller(ctx): Caller,
  Path(id): Path<String>,
) -> Result<Html<String>, ViewError>
where
  S: MovieStore + Clone + 'static,
{
  let movie = movies::get_one(state.store.as_ref(), &id).await?;
  let mut page = page_context(&ctx);
  page.insert("movie", &movie);
  Ok(state.views.render("movies/show.html", &page)?)
}

/// `GET /movies/:id/edit` — owner only.
pub async fn edit_form<S>(
  State(state): State<AppState<S>>,
  Caller(ctx): Caller,
  Path(id): Path<String>,
) -> Result<Html<String>, ViewError>
where
  S: MovieStore + Clone + 'static,
{
  let movie = movies::get_one(state.store.as_ref(), &id).await?;
  ctx.check(movie.owner.user_id)?;
  let mut page = page_context(&ctx);
  page.insert("movie", &movie);
  Ok(state.views.render("movies/edit.html", &page)?)
}

/// `POST /movies` — redirects to the new movie.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Caller(ctx): Caller,
  form: Result<Form<MovieForm>, FormRejection>,
) -> Result<Redirect, ViewError>
where
  S: MovieStore + Clone + 'static,
{
  let Form(form) = form?;
  let movie = movies::create(state.store.as_ref(), &ctx, form.into_input()).await?;
  Ok(Redirect::to(&format!("/movies/{}", movie.movie_id)))
}

/// `PUT /movies/:id` — redirects back to the movie.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Caller(ctx): Caller,
  Path(id): Path<String>,
  form: Result<Form<MovieForm>, FormRejection>,
) -> Result<Redirect, ViewError>
where
  S: MovieStore + Clone + 'static,
{
  let Form(form) = form?;
  let movie =
    movies::update(state.store.as_ref(), &ctx, &id, form.into_patch()).await?;
  Ok(Redirect::to(&format!("/movies/{}", movie.movie_id)))
}

/// `DELETE /movies/:id` — redirects to the list.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Caller(ctx): Caller,
  Path(id): Path<String>,
) -> Result<Redirect, ViewError>
where
  S: MovieStore + Clone + 'static,
{
  movies::delete(state.store.as_ref(), &ctx, &id).await?;
  Ok(Redirect::to("/movies"))
}
