//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// Cache failures are deliberately absent: the read cache degrades to direct
/// store access and never fails a request (see [`crate::cache`]).
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  Validation(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("unauthorized")]
  Unauthorized,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<faro_core::Error> for ApiError {
  fn from(e: faro_core::Error) -> Self {
    match e {
      faro_core::Error::Validation(m) => ApiError::Validation(m),
      faro_core::Error::IncidentNotFound(id) => {
        ApiError::NotFound(format!("incident {id} not found"))
      }
      faro_core::Error::Serialization(e) => ApiError::Store(Box::new(e)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Unauthorized => {
        (StatusCode::UNAUTHORIZED, "unauthorized".to_string())
      }
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
