//! Error types for the glossa-xliff codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("xml error: {0}")]
  Xml(String),

  #[error("<{element}> is missing the {attribute:?} attribute")]
  MissingAttribute {
    element:   &'static str,
    attribute: &'static str,
  },

  #[error("invalid {attribute:?} value: {value:?}")]
  InvalidAttribute {
    attribute: &'static str,
    value:     String,
  },

  #[error("core error: {0}")]
  Core(#[from] glossa_core::Error),
}

impl Error {
  pub(crate) fn xml(err: impl std::fmt::Display) -> Self {
    Self::Xml(err.to_string())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
