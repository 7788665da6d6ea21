//! The ownership-gated resource handlers.
//!
//! Each operation takes the store, the caller's [`AuthContext`] and the ids
//! exactly as the caller supplied them. Authorization is always decided
//! before anything is written, and every call ends in exactly one `Ok` or
//! `Err`.
//!
//! [`AuthContext`]: crate::auth::AuthContext

pub mod comments;
pub mod movies;

use uuid::Uuid;

use crate::{Error, Result, movie::Movie, store::MovieStore};

/// Parse a caller-supplied id. Anything that is not a UUID cannot name a
/// stored document, so it is reported as not found.
fn parse_id(raw: &str) -> Option<Uuid> { Uuid::parse_str(raw.trim()).ok() }

/// Load a movie by its raw id or fail with [`Error::MovieNotFound`].
async fn load_movie<S: MovieStore>(store: &S, raw_id: &str) -> Result<Movie> {
  let not_found = || Error::MovieNotFound(raw_id.to_owned());
  let id = parse_id(raw_id).ok_or_else(not_found)?;
  store
    .get_movie(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(not_found)
}

/// Persist a modified movie, treating a concurrent delete as not found.
async fn persist<S: MovieStore>(store: &S, movie: &Movie) -> Result<()> {
  let saved = store.save_movie(movie).await.map_err(Error::store)?;
  if !saved {
    return Err(Error::MovieNotFound(movie.movie_id.to_string()));
  }
  Ok(())
}
