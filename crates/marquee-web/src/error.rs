//! Error types and axum `IntoResponse` implementation.
//!
//! The JSON profile renders an [`Error`] directly. The views profile wraps it
//! in [`crate::views::ViewError`], which turns it into a redirect instead.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use marquee_api::ApiError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid username or password")]
  InvalidCredentials,
  #[error("username already taken: {0}")]
  UsernameTaken(String),
  #[error("invalid input: {0}")]
  Invalid(String),
  #[error("password hashing failed: {0}")]
  PasswordHash(String),
  #[error("template error: {0}")]
  Template(#[from] tera::Error),
  #[error(transparent)]
  Resource(#[from] marquee_core::Error),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

/// A body that does not parse is the caller's fault, never a 422 from axum.
impl From<JsonRejection> for Error {
  fn from(rejection: JsonRejection) -> Self {
    Self::Invalid(rejection.body_text())
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match self {
      Error::Resource(e) => return ApiError::from(e).into_response(),
      Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
      Error::UsernameTaken(_) => StatusCode::CONFLICT,
      Error::Invalid(_) => StatusCode::BAD_REQUEST,
      Error::PasswordHash(_) | Error::Template(_) | Error::Store(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    let message = self.to_string();
    if status.is_server_error() {
      tracing::error!(%status, error = %message, "request failed");
    } else {
      tracing::warn!(%status, error = %message, "request rejected");
    }
    (status, Json(json!({ "error": message }))).into_response()
  }
}
