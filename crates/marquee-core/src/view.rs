//! Read models with owner and author ids resolved to public profiles.
//!
//! Views are never stored; they are assembled on read from a movie plus the
//! users it references.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{movie::Movie, store::MovieStore, user::Profile};

/// A comment with its author resolved.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
  pub comment_id: Uuid,
  pub author:     Profile,
  pub body:       String,
  pub created_at: DateTime<Utc>,
}

/// A movie with its owner and comment authors resolved.
#[derive(Debug, Clone, Serialize)]
pub struct MovieView {
  pub movie_id:    Uuid,
  pub name:        String,
  pub genre:       String,
  pub is_pg_rated: bool,
  pub owner:       Profile,
  pub comments:    Vec<CommentView>,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

impl MovieView {
  fn build(movie: Movie, profiles: &HashMap<Uuid, Profile>) -> Self {
    let lookup = |id: Uuid| {
      profiles
        .get(&id)
        .cloned()
        .unwrap_or_else(|| Profile::unresolved(id))
    };
    Self {
      movie_id:    movie.movie_id,
      owner:       lookup(movie.owner),
      comments:    movie
        .comments
        .iter()
        .map(|c| CommentView {
          comment_id: c.comment_id,
          author:     lookup(c.author),
          body:       c.body.clone(),
          created_at: c.created_at,
        })
        .collect(),
      name:        movie.name,
      genre:       movie.genre,
      is_pg_rated: movie.is_pg_rated,
      created_at:  movie.created_at,
      updated_at:  movie.updated_at,
    }
  }
}

/// Resolve every owner and comment author referenced by `movies`.
///
/// Each distinct user is fetched once.
pub async fn populate<S: MovieStore>(
  store: &S,
  movies: Vec<Movie>,
) -> Result<Vec<MovieView>, S::Error> {
  let ids: BTreeSet<Uuid> = movies
    .iter()
    .flat_map(|m| {
      std::iter::once(m.owner).chain(m.comments.iter().map(|c| c.author))
    })
    .collect();

  let mut profiles = HashMap::with_capacity(ids.len());
  for id in ids {
    if let Some(user) = store.get_user(id).await? {
      profiles.insert(id, user.profile());
    }
  }

  Ok(
    movies
      .into_iter()
      .map(|m| MovieView::build(m, &profiles))
      .collect(),
  )
}
