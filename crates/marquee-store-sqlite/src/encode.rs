//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. The embedded comment
//! sequence is stored as compact JSON. UUIDs are stored as hyphenated
//! lowercase strings.

use chrono::{DateTime, Utc};
use marquee_core::{
  movie::{Comments, Movie},
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Comments ─────────────────────────────────────────────────────────────────

pub fn encode_comments(comments: &Comments) -> Result<String> {
  Ok(serde_json::to_string(comments)?)
}

pub fn decode_comments(s: &str) -> Result<Comments> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching the field order of [`RawMovie`].
pub const MOVIE_COLUMNS: &str = "movie_id, owner_id, name, genre, is_pg_rated, \
                                 comments_json, created_at, updated_at";

/// Raw values read directly from a `movies` row.
pub struct RawMovie {
  pub movie_id:      String,
  pub owner_id:      String,
  pub name:          String,
  pub genre:         String,
  pub is_pg_rated:   bool,
  pub comments_json: String,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawMovie {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      movie_id:      row.get(0)?,
      owner_id:      row.get(1)?,
      name:          row.get(2)?,
      genre:         row.get(3)?,
      is_pg_rated:   row.get(4)?,
      comments_json: row.get(5)?,
      created_at:    row.get(6)?,
      updated_at:    row.get(7)?,
    })
  }

  pub fn into_movie(self) -> Result<Movie> {
    Ok(Movie {
      movie_id:    decode_uuid(&self.movie_id)?,
      owner:       decode_uuid(&self.owner_id)?,
      name:        self.name,
      genre:       self.genre,
      is_pg_rated: self.is_pg_rated,
      comments:    decode_comments(&self.comments_json)?,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// Column list matching the field order of [`RawUser`].
pub const USER_COLUMNS: &str = "user_id, username, password_hash, created_at";

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub username:      String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      username:      row.get(1)?,
      password_hash: row.get(2)?,
      created_at:    row.get(3)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      username:      self.username,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
