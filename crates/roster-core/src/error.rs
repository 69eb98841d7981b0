//! Error types for `roster-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Settings or a student record could not be retrieved from the store.
  #[error("fetch failed: {0}")]
  FetchFailed(String),

  /// A toggle or default-initialisation write did not reach the store.
  #[error("write failed: {0}")]
  WriteFailed(String),

  /// A settings row named a field outside the recognized set.
  #[error("unknown privacy field: {0:?}")]
  UnknownField(String),

  #[error("unknown role: {0:?}")]
  UnknownRole(String),

  #[error("unknown reference kind: {0:?}")]
  UnknownReferenceKind(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
