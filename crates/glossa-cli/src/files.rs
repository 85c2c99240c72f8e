//! Translation file discovery.
//!
//! Files are named `domain[+intl-icu].locale.format` and live directly in the
//! translations directory.

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
  sync::LazyLock,
};

use indexmap::IndexMap;
use regex::Regex;

use crate::{Error, Result, config::is_supported_format};

pub const ICU_SUFFIX: &str = "+intl-icu";

static FILE_NAME: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^(?P<domain>[^.]+?)(?P<icu>\+intl-icu)?\.(?P<locale>[^.]+)\.(?P<format>[^.]+)$",
  )
  .expect("translation file pattern is valid")
});

/// Whether `domain` can be part of a translation file name that
/// [`find_translation_files`] will find again, inside the translations
/// directory.
pub fn is_valid_domain(domain: &str) -> bool {
  !domain.is_empty()
    && !domain.ends_with(ICU_SUFFIX)
    && !domain.contains(['.', '/', '\\', '\0'])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationFile {
  pub format: String,
  pub path:   PathBuf,
  /// Whether the name carries the `+intl-icu` suffix.
  pub icu:    bool,
}

impl TranslationFile {
  /// The file a domain of `locale` is written to.
  pub fn for_domain(
    dir: &Path,
    domain: &str,
    locale: &str,
    format: &str,
    icu: bool,
  ) -> Self {
    let suffix = if icu { ICU_SUFFIX } else { "" };
    Self {
      format: format.to_string(),
      path: dir.join(format!("{domain}{suffix}.{locale}.{format}")),
      icu,
    }
  }
}

/// Domain → locale → file, domains ordered case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct TranslationFiles(IndexMap<String, BTreeMap<String, TranslationFile>>);

impl TranslationFiles {
  pub fn get(&self, domain: &str, locale: &str) -> Option<&TranslationFile> {
    self.0.get(domain)?.get(locale)
  }

  pub fn domains(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  pub fn len(&self) -> usize { self.0.values().map(BTreeMap::len).sum() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Record `file`. When a domain and locale already have a file, one in a
  /// supported format is preferred, then the first one seen.
  fn insert(&mut self, domain: String, locale: String, file: TranslationFile) {
    let locales = self.0.entry(domain).or_default();
    match locales.get(&locale) {
      Some(current)
        if is_supported_format(&current.format)
          || !is_supported_format(&file.format) =>
      {
        tracing::warn!(
          "ignoring {}: {} already holds this domain and locale",
          file.path.display(),
          current.path.display()
        );
      }
      _ => {
        locales.insert(locale, file);
      }
    }
  }
}

/// Scan `dir` (non-recursively) for translation files.
pub fn find_translation_files(dir: &Path) -> Result<TranslationFiles> {
  let mut names = Vec::new();
  for entry in std::fs::read_dir(dir).map_err(Error::io(dir))? {
    let entry = entry.map_err(Error::io(dir))?;
    let path = entry.path();
    if !path.is_file() {
      continue;
    }
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
      names.push((name.to_string(), path.clone()));
    }
  }
  names.sort();

  let mut files = TranslationFiles::default();
  for (name, path) in names {
    let Some(caps) = FILE_NAME.captures(&name) else {
      tracing::debug!("skipping {name}: not a translation file");
      continue;
    };
    let file = TranslationFile {
      format: caps["format"].to_string(),
      path,
      icu: caps.name("icu").is_some(),
    };
    files.insert(caps["domain"].to_string(), caps["locale"].to_string(), file);
  }

  files
    .0
    .sort_by(|a, _, b, _| a.to_lowercase().cmp(&b.to_lowercase()));
  Ok(files)
}
