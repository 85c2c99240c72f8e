//! Glossa update tool.
//!
//! Discovers the translation files of one locale, folds the JSON scan files
//! written by extractors into a single catalogue, reconciles the two and
//! writes the result back as XLIFF.

pub mod config;
pub mod error;
pub mod files;
pub mod scan;
pub mod updater;

pub use config::UpdateConfig;
pub use error::{Error, Result};
pub use updater::{UpdateReport, Updater};
