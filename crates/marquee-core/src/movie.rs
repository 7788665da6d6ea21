//! Movie documents and their embedded comments.
//!
//! A movie is the only top-level document. Comments live inside it, in
//! insertion order, and have no identity outside their parent: every comment
//! operation starts by loading the movie that holds it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Comment ─────────────────────────────────────────────────────────────────

/// A comment embedded in a [`Movie`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id: Uuid,
  /// The user who posted the comment. Set from the session; never changes.
  pub author:     Uuid,
  pub body:       String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::resource::comments::append`]. The author is not part of
/// the input; it always comes from the caller's session.
#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
  pub body: String,
}

impl NewComment {
  pub fn new(body: impl Into<String>) -> Self { Self { body: body.into() } }

  pub(crate) fn validate(&self) -> Result<()> {
    if self.body.trim().is_empty() {
      return Err(Error::Invalid("comment body is required".into()));
    }
    Ok(())
  }
}

// ─── Comments ────────────────────────────────────────────────────────────────

/// The ordered comment sequence owned by a movie, addressable by comment id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Comments(Vec<Comment>);

impl Comments {
  pub fn get(&self, comment_id: Uuid) -> Option<&Comment> {
    self.0.iter().find(|c| c.comment_id == comment_id)
  }

  pub fn contains(&self, comment_id: Uuid) -> bool {
    self.get(comment_id).is_some()
  }

  /// Append a comment authored by `author`, assigning it a fresh id.
  pub fn push(&mut self, author: Uuid, input: NewComment) -> &Comment {
    self.0.push(Comment {
      comment_id: Uuid::new_v4(),
      author,
      body: input.body,
      created_at: Utc::now(),
    });
    &self.0[self.0.len() - 1]
  }

  /// Remove and return the comment with `comment_id`, if present.
  pub fn remove(&mut self, comment_id: Uuid) -> Option<Comment> {
    let idx = self.0.iter().position(|c| c.comment_id == comment_id)?;
    Some(self.0.remove(idx))
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Comment> { self.0.iter() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl From<Vec<Comment>> for Comments {
  fn from(v: Vec<Comment>) -> Self { Self(v) }
}

impl<'a> IntoIterator for &'a Comments {
  type Item = &'a Comment;
  type IntoIter = std::slice::Iter<'a, Comment>;

  fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

// ─── Movie ───────────────────────────────────────────────────────────────────

/// A stored movie document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
  pub movie_id:    Uuid,
  pub name:        String,
  pub genre:       String,
  pub is_pg_rated: bool,
  /// The user who created the movie. Immutable after creation.
  pub owner:       Uuid,
  pub comments:    Comments,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

impl Movie {
  /// Overwrite the fields present in `patch`; everything else is retained.
  pub fn apply(&mut self, patch: MoviePatch) {
    if let Some(name) = patch.name {
      self.name = name;
    }
    if let Some(genre) = patch.genre {
      self.genre = genre;
    }
    if let Some(flag) = patch.is_pg_rated {
      self.is_pg_rated = flag;
    }
  }
}

/// Input to [`crate::store::MovieStore::insert_movie`].
/// `movie_id` and the timestamps are always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewMovie {
  pub name:        String,
  pub genre:       String,
  pub is_pg_rated: bool,
  pub owner:       Uuid,
}

/// The caller-supplied part of a new movie. Any `owner` field in a request
/// payload never reaches this type.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieInput {
  pub name:        String,
  #[serde(default)]
  pub genre:       String,
  #[serde(default, alias = "isPgRated")]
  pub is_pg_rated: bool,
}

impl MovieInput {
  pub(crate) fn validate(&self) -> Result<()> {
    validate_name(&self.name)
  }

  /// Attach the owner and produce the store input.
  pub fn owned_by(self, owner: Uuid) -> NewMovie {
    NewMovie {
      name: self.name,
      genre: self.genre,
      is_pg_rated: self.is_pg_rated,
      owner,
    }
  }
}

/// A partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoviePatch {
  pub name:        Option<String>,
  pub genre:       Option<String>,
  #[serde(alias = "isPgRated")]
  pub is_pg_rated: Option<bool>,
}

impl MoviePatch {
  pub(crate) fn validate(&self) -> Result<()> {
    match &self.name {
      Some(name) => validate_name(name),
      None => Ok(()),
    }
  }
}

fn validate_name(name: &str) -> Result<()> {
  if name.trim().is_empty() {
    return Err(Error::Invalid("movie name is required".into()));
  }
  Ok(())
}

/// Interpret an HTML checkbox value. Browsers send `"on"` for a checked box
/// and omit the field otherwise.
pub fn coerce_flag(value: Option<&str>) -> bool {
  matches!(
    value.map(str::trim).map(str::to_ascii_lowercase).as_deref(),
    Some("on" | "true" | "1" | "yes")
  )
}
