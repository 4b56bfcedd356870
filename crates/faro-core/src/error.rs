//! Error types for `faro-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A submission body is missing a field or carries one of the wrong shape.
  /// Validation failures never mutate state.
  #[error("invalid submission: {0}")]
  Validation(String),

  #[error("incident not found: {0}")]
  IncidentNotFound(i64),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
