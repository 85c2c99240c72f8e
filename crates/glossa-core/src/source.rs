//! Source references: where in application code a message was found.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A location in a source file or template.
///
/// Two references are equal iff path, line and column all match; an unknown
/// line only equals another unknown line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceReference {
  path:   String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  line:   Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  column: Option<u32>,
}

impl SourceReference {
  pub fn new(
    path: impl Into<String>,
    line: Option<u32>,
    column: Option<u32>,
  ) -> Self {
    Self {
      path: path.into(),
      line,
      column,
    }
  }

  /// A reference to a whole file, without position.
  pub fn file(path: impl Into<String>) -> Self { Self::new(path, None, None) }

  pub fn path(&self) -> &str { &self.path }

  pub fn line(&self) -> Option<u32> { self.line }

  pub fn column(&self) -> Option<u32> { self.column }
}

impl fmt::Display for SourceReference {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.path)?;
    if let Some(line) = self.line {
      write!(f, " on line {line}")?;
      if let Some(column) = self.column {
        write!(f, " at column {column}")?;
      }
    }
    Ok(())
  }
}
