//! Movie resource handler: list, show, create, update, delete.

use chrono::Utc;
use tracing::info;

use super::{load_movie, persist};
use crate::{
  Error, Result,
  auth::AuthContext,
  movie::{Movie, MovieInput, MoviePatch},
  store::MovieStore,
  view::{MovieView, populate},
};

/// Which movies [`list`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListScope {
  #[default]
  All,
  /// Only movies owned by the caller. Empty for an anonymous caller.
  Mine,
}

/// All movies (or the caller's), with owners and comment authors resolved.
pub async fn list<S: MovieStore>(
  store: &S,
  ctx: &AuthContext,
  scope: ListScope,
) -> Result<Vec<MovieView>> {
  let movies = match scope {
    ListScope::All => store.list_movies(None).await.map_err(Error::store)?,
    ListScope::Mine => match ctx.user_id.filter(|_| ctx.logged_in) {
      Some(owner) => store
        .list_movies(Some(owner))
        .await
        .map_err(Error::store)?,
      None => Vec::new(),
    },
  };
  populate(store, movies).await.map_err(Error::store)
}

/// One movie by id, with its comment authors resolved.
pub async fn get_one<S: MovieStore>(store: &S, id: &str) -> Result<MovieView> {
  let movie = load_movie(store, id).await?;
  let mut views = populate(store, vec![movie])
    .await
    .map_err(Error::store)?;
  views
    .pop()
    .ok_or_else(|| Error::MovieNotFound(id.to_owned()))
}

/// Create a movie owned by the caller.
pub async fn create<S: MovieStore>(
  store: &S,
  ctx: &AuthContext,
  input: MovieInput,
) -> Result<Movie> {
  let owner = ctx.require_login()?;
  input.validate()?;
  let movie = store
    .insert_movie(input.owned_by(owner))
    .await
    .map_err(Error::store)?;
  info!(movie_id = %movie.movie_id, %owner, "movie created");
  Ok(movie)
}

/// Apply a partial update. Only the owner may do this.
///
/// A caller without a session gets [`Error::Unauthenticated`] (401 in the
/// JSON binding); a logged-in caller who is not the owner gets
/// [`Error::Forbidden`] (403). Both bindings report the same outcome.
pub async fn update<S: MovieStore>(
  store: &S,
  ctx: &AuthContext,
  id: &str,
  patch: MoviePatch,
) -> Result<Movie> {
  let mut movie = load_movie(store, id).await?;
  ctx.check(movie.owner)?;
  patch.validate()?;

  movie.apply(patch);
  movie.updated_at = Utc::now();
  persist(store, &movie).await?;
  info!(movie_id = %movie.movie_id, "movie updated");
  Ok(movie)
}

/// Delete a movie and every comment on it. Only the owner may do this.
///
/// Rejects exactly like [`update`]: no session is
/// [`Error::Unauthenticated`], someone else's movie is [`Error::Forbidden`].
pub async fn delete<S: MovieStore>(
  store: &S,
  ctx: &AuthContext,
  id: &str,
) -> Result<()> {
  let movie = load_movie(store, id).await?;
  ctx.check(movie.owner)?;

  let deleted = store
    .delete_movie(movie.movie_id)
    .await
    .map_err(Error::store)?;
  if !deleted {
    return Err(Error::MovieNotFound(id.to_owned()));
  }
  info!(movie_id = %movie.movie_id, "movie deleted");
  Ok(())
}
