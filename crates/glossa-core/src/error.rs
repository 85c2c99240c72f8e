//! Error types for `glossa-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Merging two messages that do not share an id. Always a caller bug.
  #[error(
    "you can only merge messages with the same id: expected {expected:?}, \
     got {actual:?}"
  )]
  IdMismatch { expected: String, actual: String },

  #[error("there is no domain with name {0:?}")]
  DomainNotFound(String),

  #[error("message {id:?} not found in domain {domain:?}")]
  MessageNotFound { id: String, domain: String },

  #[error("message of domain {actual:?} cannot join collection {expected:?}")]
  DomainMismatch { expected: String, actual: String },

  #[error("unknown workflow state: {0:?}")]
  UnknownState(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
