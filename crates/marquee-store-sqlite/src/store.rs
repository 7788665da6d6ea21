//! [`SqliteStore`] — the SQLite implementation of [`MovieStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{ErrorCode, OptionalExtension as _};
use uuid::Uuid;

use marquee_core::{
  movie::{Comments, Movie, NewMovie},
  store::MovieStore,
  user::{NewUser, User},
};

use crate::{
  Error, Result,
  encode::{
    MOVIE_COLUMNS, RawMovie, RawUser, USER_COLUMNS, encode_comments, encode_dt,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Marquee store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn query_user(
    &self,
    column: &'static str,
    value: String,
  ) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![value], RawUser::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
  )
}

// ─── MovieStore impl ─────────────────────────────────────────────────────────

impl MovieStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<Option<User>> {
    let user = User {
      user_id:       Uuid::new_v4(),
      username:      input.username,
      password_hash: input.password_hash,
      created_at:    Utc::now(),
    };

    let id_str   = encode_uuid(user.user_id);
    let name     = user.username.clone();
    let hash     = user.password_hash.clone();
    let at_str   = encode_dt(user.created_at);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO users (user_id, username, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, hash, at_str],
        ) {
          Ok(_) => Ok(true),
          Err(e) if is_unique_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(inserted.then_some(user))
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    self.query_user("user_id", encode_uuid(id)).await
  }

  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
    self.query_user("username", username.to_owned()).await
  }

  // ── Movies ────────────────────────────────────────────────────────────────

  async fn insert_movie(&self, input: NewMovie) -> Result<Movie> {
    let now = Utc::now();
    let movie = Movie {
      movie_id:    Uuid::new_v4(),
      name:        input.name,
      genre:       input.genre,
      is_pg_rated: input.is_pg_rated,
      owner:       input.owner,
      comments:    Comments::default(),
      created_at:  now,
      updated_at:  now,
    };

    let id_str       = encode_uuid(movie.movie_id);
    let owner_str    = encode_uuid(movie.owner);
    let name         = movie.name.clone();
    let genre        = movie.genre.clone();
    let is_pg_rated  = movie.is_pg_rated;
    let comments_str = encode_comments(&movie.comments)?;
    let at_str       = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO movies (
             movie_id, owner_id, name, genre, is_pg_rated,
             comments_json, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
          rusqlite::params![
            id_str,
            owner_str,
            name,
            genre,
            is_pg_rated,
            comments_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(movie)
  }

  async fn get_movie(&self, id: Uuid) -> Result<Option<Movie>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawMovie> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE movie_id = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawMovie::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMovie::into_movie).transpose()
  }

  async fn list_movies(&self, owner: Option<Uuid>) -> Result<Vec<Movie>> {
    let owner_str = owner.map(encode_uuid);

    let raws: Vec<RawMovie> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(o) = owner_str {
          let sql = format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE owner_id = ?1 ORDER BY seq"
          );
          let mut stmt = conn.prepare(&sql)?;
          stmt
            .query_map(rusqlite::params![o], RawMovie::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies ORDER BY seq");
          let mut stmt = conn.prepare(&sql)?;
          stmt
            .query_map([], RawMovie::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMovie::into_movie).collect()
  }

  async fn save_movie(&self, movie: &Movie) -> Result<bool> {
    let id_str       = encode_uuid(movie.movie_id);
    let name         = movie.name.clone();
    let genre        = movie.genre.clone();
    let is_pg_rated  = movie.is_pg_rated;
    let comments_str = encode_comments(&movie.comments)?;
    let at_str       = encode_dt(movie.updated_at);

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE movies
             SET name = ?2, genre = ?3, is_pg_rated = ?4,
                 comments_json = ?5, updated_at = ?6
           WHERE movie_id = ?1",
          rusqlite::params![id_str, name, genre, is_pg_rated, comments_str, at_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn delete_movie(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM movies WHERE movie_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }
}
