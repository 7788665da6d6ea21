//! The `MovieStore` trait.
//!
//! Implemented by storage backends (e.g. `marquee-store-sqlite`). The
//! resource handlers and both HTTP bindings depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  movie::{Movie, NewMovie},
  user::{NewUser, User},
};

/// Abstraction over a document store holding movies (with their embedded
/// comments) and users.
///
/// Writes are whole-document: [`MovieStore::save_movie`] replaces the stored
/// movie, comments included. Concurrent read-modify-write cycles on the same
/// movie are not serialised; the last save wins.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait MovieStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create a user. Returns `None` if the username is already taken; the
  /// check and the insert are a single step in the backend.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn find_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Movies ────────────────────────────────────────────────────────────

  /// Persist a new movie with no comments. The id and timestamps are
  /// assigned by the store.
  fn insert_movie(
    &self,
    input: NewMovie,
  ) -> impl Future<Output = Result<Movie, Self::Error>> + Send + '_;

  /// Retrieve a movie by id. Returns `None` if not found.
  fn get_movie(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Movie>, Self::Error>> + Send + '_;

  /// List movies in creation order, optionally only those owned by `owner`.
  fn list_movies(
    &self,
    owner: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<Movie>, Self::Error>> + Send + '_;

  /// Replace the stored document for `movie.movie_id`. The owner column is
  /// never rewritten. Returns `false` if no such movie exists.
  fn save_movie<'a>(
    &'a self,
    movie: &'a Movie,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Delete a movie and its embedded comments. Returns `false` if no such
  /// movie exists.
  fn delete_movie(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
