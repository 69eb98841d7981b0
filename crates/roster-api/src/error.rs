//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("forbidden")]
  Forbidden,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  /// A store read failed. The cause is logged, not sent to the client.
  #[error("fetch failed: {0}")]
  FetchFailed(#[source] BoxError),

  /// A store write failed. The cause is logged, not sent to the client.
  #[error("write failed: {0}")]
  WriteFailed(#[source] BoxError),
}

impl ApiError {
  pub fn fetch(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::FetchFailed(Box::new(e))
  }

  pub fn write(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::WriteFailed(Box::new(e))
  }
}

impl From<roster_core::Error> for ApiError {
  fn from(e: roster_core::Error) -> Self {
    use roster_core::Error as E;
    match e {
      E::FetchFailed(_) | E::Serialization(_) => Self::fetch(e),
      E::WriteFailed(_) => Self::write(e),
      E::UnknownField(_) | E::UnknownRole(_) | E::UnknownReferenceKind(_) => {
        Self::BadRequest(e.to_string())
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_owned()),
      ApiError::Forbidden => (StatusCode::FORBIDDEN, "forbidden".to_owned()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::FetchFailed(e) => {
        tracing::error!(error = %e, "store read failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "failed to load".to_owned())
      }
      ApiError::WriteFailed(e) => {
        tracing::error!(error = %e, "store write failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "failed to save".to_owned())
      }
    };

    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Bearer, Basic realm=\"roster\""),
      );
    }
    res
  }
}
