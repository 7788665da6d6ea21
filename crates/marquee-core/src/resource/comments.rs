//! Comment subresource handler: append to and remove from a movie.
//!
//! Comments are reached only through their parent. Both operations load the
//! movie, change its comment sequence in memory, and save the whole document
//! back.

use chrono::Utc;
use tracing::info;

use super::{load_movie, parse_id, persist};
use crate::{
  Error, Result,
  auth::AuthContext,
  movie::{Comment, Movie, NewComment},
  store::MovieStore,
};

/// Append a comment authored by the caller. Returns the saved parent and the
/// new comment.
pub async fn append<S: MovieStore>(
  store: &S,
  ctx: &AuthContext,
  movie_id: &str,
  input: NewComment,
) -> Result<(Movie, Comment)> {
  let author = ctx.require_login()?;
  input.validate()?;

  let mut movie = load_movie(store, movie_id).await?;
  let comment = movie.comments.push(author, input).clone();
  movie.updated_at = Utc::now();
  persist(store, &movie).await?;

  info!(
    movie_id = %movie.movie_id,
    comment_id = %comment.comment_id,
    "comment added"
  );
  Ok((movie, comment))
}

/// Remove a comment. Only its author may do this.
pub async fn remove<S: MovieStore>(
  store: &S,
  ctx: &AuthContext,
  movie_id: &str,
  comment_id: &str,
) -> Result<Movie> {
  ctx.require_login()?;

  let mut movie = load_movie(store, movie_id).await?;
  let not_found = || Error::CommentNotFound {
    movie_id:   movie_id.to_owned(),
    comment_id: comment_id.to_owned(),
  };
  let cid = parse_id(comment_id).ok_or_else(not_found)?;
  let author = movie.comments.get(cid).ok_or_else(not_found)?.author;
  ctx.check(author)?;

  movie.comments.remove(cid);
  movie.updated_at = Utc::now();
  persist(store, &movie).await?;

  info!(movie_id = %movie.movie_id, comment_id = %cid, "comment removed");
  Ok(movie)
}
