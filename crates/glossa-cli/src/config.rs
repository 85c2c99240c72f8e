//! Update configuration.
//!
//! Deserialised by the binary from `glossa.toml` plus `GLOSSA_*` environment
//! variables, then checked once with [`UpdateConfig::validate`].

use std::{collections::BTreeSet, path::PathBuf};

use glossa_core::UpdateOptions;
use serde::Deserialize;

use crate::{Error, Result};

/// Output formats the update pipeline can write.
pub const SUPPORTED_FORMATS: &[&str] = &["xlf", "xliff"];

pub fn is_supported_format(format: &str) -> bool {
  SUPPORTED_FORMATS.contains(&format)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
  /// Directory holding `domain.locale.format` files; created if missing.
  pub translations_dir:       PathBuf,
  pub locale:                 String,
  /// Directories holding extractor output (`*.json` scan files).
  pub scan_dirs:              Vec<PathBuf>,
  pub domains:                BTreeSet<String>,
  pub ignored_domains:        BTreeSet<String>,
  /// Forces the format of every written file.
  pub output_format:          Option<String>,
  /// Format for domains that have no file yet.
  pub default_output_format:  String,
  pub use_icu_message_format: bool,
  pub keep_old_messages:      bool,
  pub source_language:        String,
}

impl Default for UpdateConfig {
  fn default() -> Self {
    Self {
      translations_dir:       PathBuf::new(),
      locale:                 String::new(),
      scan_dirs:              Vec::new(),
      domains:                BTreeSet::new(),
      ignored_domains:        BTreeSet::new(),
      output_format:          None,
      default_output_format:  "xlf".to_string(),
      use_icu_message_format: false,
      keep_old_messages:      false,
      source_language:        "en".to_string(),
    }
  }
}

impl UpdateConfig {
  /// Reject unusable settings and create the translations directory.
  pub fn validate(&self) -> Result<()> {
    if self.locale.trim().is_empty() {
      return Err(invalid("the locale must not be empty"));
    }
    if self.translations_dir.as_os_str().is_empty() {
      return Err(invalid("the translations directory must not be empty"));
    }
    if self.scan_dirs.is_empty() {
      return Err(invalid("at least one scan directory is required"));
    }
    if let Some(missing) = self.scan_dirs.iter().find(|dir| !dir.is_dir()) {
      return Err(invalid(format!(
        "scan directory {} does not exist",
        missing.display()
      )));
    }
    for format in self
      .output_format
      .iter()
      .chain(std::iter::once(&self.default_output_format))
    {
      if !is_supported_format(format) {
        return Err(invalid(format!(
          "unsupported output format {format:?} (supported: {})",
          SUPPORTED_FORMATS.join(", ")
        )));
      }
    }

    if !self.translations_dir.is_dir() {
      tracing::info!(
        "creating translations directory {}",
        self.translations_dir.display()
      );
      std::fs::create_dir_all(&self.translations_dir)
        .map_err(Error::io(&self.translations_dir))?;
    }
    Ok(())
  }

  pub fn update_options(&self) -> UpdateOptions {
    UpdateOptions {
      keep_old_messages: self.keep_old_messages,
      domains:           self.domains.clone(),
      ignored_domains:   self.ignored_domains.clone(),
    }
  }
}

fn invalid(reason: impl Into<String>) -> Error {
  Error::InvalidConfiguration(reason.into())
}
