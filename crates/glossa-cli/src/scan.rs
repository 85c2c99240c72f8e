//! Scan collection.
//!
//! Extractors write their findings as JSON scan files. Each file becomes a
//! partial catalogue; partial catalogues are merged one by one into the
//! scanned catalogue.

use std::path::{Path, PathBuf};

use glossa_core::{Message, MessageCatalogue};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, files::is_valid_domain};

/// The on-disk shape of one extractor run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScanFile {
  pub messages: Vec<Message>,
}

impl ScanFile {
  pub fn read(path: &Path) -> Result<Self> {
    let raw = std::fs::read_to_string(path).map_err(Error::io(path))?;
    serde_json::from_str(&raw).map_err(|source| Error::Scan {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Messages whose domain cannot name a translation file are dropped.
  pub fn into_catalogue(self) -> MessageCatalogue {
    let mut catalogue = MessageCatalogue::new();
    for message in self.messages {
      if !is_valid_domain(message.domain()) {
        tracing::warn!(
          "skipping {:?}: domain {:?} cannot be used in a file name",
          message.id(),
          message.domain()
        );
        continue;
      }
      catalogue.add(message);
    }
    catalogue
  }
}

/// `*.json` files directly inside `dir`, sorted by name.
fn scan_files(dir: &Path) -> Result<Vec<PathBuf>> {
  let mut paths = Vec::new();
  for entry in std::fs::read_dir(dir).map_err(Error::io(dir))? {
    let path = entry.map_err(Error::io(dir))?.path();
    if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
      paths.push(path);
    }
  }
  paths.sort();
  Ok(paths)
}

/// Merge every scan file found in `dirs` into one catalogue.
pub fn collect(dirs: &[PathBuf]) -> Result<MessageCatalogue> {
  let mut scanned = MessageCatalogue::new();
  for dir in dirs {
    for path in scan_files(dir)? {
      let partial = ScanFile::read(&path)?.into_catalogue();
      tracing::debug!(
        "merging {} message(s) from {}",
        partial.len(),
        path.display()
      );
      scanned.merge(partial)?;
    }
  }
  Ok(scanned)
}

#[cfg(test)]
mod tests {
  use glossa_core::{DEFAULT_DOMAIN, SourceReference};

  use super::*;

  fn write(dir: &Path, name: &str, body: &str) {
    std::fs::write(dir.join(name), body).unwrap();
  }

  #[test]
  fn partial_scans_merge_into_one_catalogue() {
    let dir = tempfile::tempdir().unwrap();
    write(
      dir.path(),
      "a.json",
      r#"{"messages": [
        {"id": "greeting", "description": "Hello",
         "sources": [{"path": "a.twig", "line": 3}]},
        {"id": "required", "domain": "validators"}
      ]}"#,
    );
    write(
      dir.path(),
      "b.json",
      r#"{"messages": [
        {"id": "greeting", "sources": [{"path": "b.rs"}]}
      ]}"#,
    );
    write(dir.path(), "ignored.txt", "not json");

    let cat = collect(&[dir.path().to_path_buf()]).unwrap();
    assert_eq!(cat.len(), 2);

    let greeting = cat.get("greeting", DEFAULT_DOMAIN).unwrap();
    assert!(greeting.is_new());
    assert_eq!(greeting.description(), Some("Hello"));
    assert_eq!(greeting.sources(), &[
      SourceReference::new("a.twig", Some(3), None),
      SourceReference::file("b.rs"),
    ]);
    assert!(cat.contains("required", "validators"));
  }

  #[test]
  fn unusable_domains_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    write(
      dir.path(),
      "a.json",
      r#"{"messages": [
        {"id": "escape", "domain": "../outside"},
        {"id": "dotted", "domain": "admin.forms"},
        {"id": "kept", "domain": "admin"}
      ]}"#,
    );
    let cat = collect(&[dir.path().to_path_buf()]).unwrap();
    assert_eq!(cat.domain_names().collect::<Vec<_>>(), ["admin"]);
    assert_eq!(cat.len(), 1);
  }

  #[test]
  fn malformed_scan_file_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "broken.json", "{\"messages\": 3}");
    let err = collect(&[dir.path().to_path_buf()]).unwrap_err();
    match err {
      Error::Scan { path, .. } => assert!(path.ends_with("broken.json")),
      other => panic!("expected scan error, got {other:?}"),
    }
  }

  #[test]
  fn scan_file_round_trips_through_json() {
    let file = ScanFile {
      messages: vec![Message::new("a").described("A")],
    };
    let json = serde_json::to_string(&file).unwrap();
    let back: ScanFile = serde_json::from_str(&json).unwrap();
    assert_eq!(back.messages, file.messages);
  }
}
