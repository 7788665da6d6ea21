//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<marquee_core::Error> for ApiError {
  fn from(err: marquee_core::Error) -> Self {
    use marquee_core::Error as E;
    let message = err.to_string();
    match err {
      E::Unauthenticated => ApiError::Unauthorized(message),
      E::Forbidden => ApiError::Forbidden(message),
      E::MovieNotFound(_) | E::CommentNotFound { .. } => {
        ApiError::NotFound(message)
      }
      E::Invalid(_) => ApiError::BadRequest(message),
      E::Store(e) => ApiError::Store(e),
    }
  }
}

/// Malformed or mistyped bodies answer with the usual 400 envelope instead
/// of axum's plain-text rejection.
impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = match &self {
      ApiError::Unauthorized(m)
      | ApiError::Forbidden(m)
      | ApiError::NotFound(m)
      | ApiError::BadRequest(m) => m.clone(),
      ApiError::Store(e) => e.to_string(),
    };
    if status.is_server_error() {
      tracing::error!(%status, error = %message, "request failed");
    } else {
      tracing::warn!(%status, error = %message, "request rejected");
    }
    (status, Json(json!({ "error": message }))).into_response()
  }
}
