//! Error types for `marquee-core`.

use thiserror::Error;

/// The outcome of a rejected resource operation.
///
/// Ids in the not-found variants are kept as the caller supplied them; they
/// may not even parse as UUIDs.
#[derive(Debug, Error)]
pub enum Error {
  #[error("you must be logged in to do that")]
  Unauthenticated,

  #[error("you are not allowed to modify this resource")]
  Forbidden,

  #[error("movie not found: {0}")]
  MovieNotFound(String),

  #[error("comment {comment_id} not found on movie {movie_id}")]
  CommentNotFound {
    movie_id:   String,
    comment_id: String,
  },

  #[error("invalid input: {0}")]
  Invalid(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error from a [`crate::store::MovieStore`].
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  /// True for the two not-found variants.
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::MovieNotFound(_) | Self::CommentNotFound { .. })
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
