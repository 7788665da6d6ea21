//! JSON REST binding for Marquee.
//!
//! Exposes an axum [`Router`] backed by any [`marquee_core::store::MovieStore`].
//! The caller's identity is read from an
//! [`AuthContext`](marquee_core::auth::AuthContext) request extension; the
//! session layer that puts it there is the embedding server's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! Router::new()
//!   .merge(marquee_api::api_router(store.clone()))
//!   .layer(session_layer)
//! ```

pub mod caller;
pub mod comments;
pub mod error;
pub mod movies;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use marquee_core::store::MovieStore;

pub use caller::Caller;
pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: MovieStore + 'static,
{
  Router::new()
    // Movies
    .route("/movies", get(movies::list::<S>).post(movies::create::<S>))
    .route("/movies/mine", get(movies::mine::<S>))
    .route(
      "/movies/{id}",
      get(movies::get_one::<S>)
        .put(movies::update::<S>)
        .delete(movies::delete::<S>),
    )
    // Comments
    .route("/comments/{movie_id}", post(comments::append::<S>))
    .route(
      "/comments/delete/{movie_id}/{comment_id}",
      delete(comments::remove::<S>),
    )
    .with_state(store)
}

#[cfg(test)]
mod tests;
