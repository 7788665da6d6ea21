//! The [`Caller`] extractor.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use marquee_core::auth::AuthContext;

/// The identity of the current request.
///
/// Reads the [`AuthContext`] that the session layer placed in the request
/// extensions. A request that passed through no session layer, or carried no
/// valid session, is anonymous.
#[derive(Debug, Clone, Default)]
pub struct Caller(pub AuthContext);

impl<S> FromRequestParts<S> for Caller
where
  S: Send + Sync,
{
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    Ok(Caller(
      parts
        .extensions
        .get::<AuthContext>()
        .cloned()
        .unwrap_or_default(),
    ))
  }
}
