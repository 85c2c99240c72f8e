//! Error types for the update pipeline.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid configuration: {0}")]
  InvalidConfiguration(String),

  #[error("i/o error on {path:?}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("malformed scan file {path:?}: {source}")]
  Scan {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("malformed translation file {path:?}: {source}")]
  Xliff {
    path:   PathBuf,
    #[source]
    source: glossa_xliff::Error,
  },

  #[error("catalogue error: {0}")]
  Core(#[from] glossa_core::Error),
}

impl Error {
  pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
    let path = path.into();
    move |source| Self::Io { path, source }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
