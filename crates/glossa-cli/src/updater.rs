//! The update pipeline: load persisted files, collect scans, reconcile, write.

use std::path::PathBuf;

use chrono::Utc;
use glossa_core::{ChangeSet, MessageCatalogue, reconcile};
use glossa_xliff::DumpOptions;

use crate::{
  Error, Result,
  config::{UpdateConfig, is_supported_format},
  files::{TranslationFile, TranslationFiles, find_translation_files},
  scan,
};

/// What an update did, or would do in a dry run.
#[derive(Debug, Clone, Default)]
pub struct UpdateReport {
  pub changes: ChangeSet,
  /// Files written, or that would have been written.
  pub files:   Vec<PathBuf>,
}

pub struct Updater {
  config: UpdateConfig,
  files:  TranslationFiles,
}

impl Updater {
  /// Validate `config` and discover the existing translation files.
  pub fn new(config: UpdateConfig) -> Result<Self> {
    config.validate()?;
    let files = find_translation_files(&config.translations_dir)?;
    tracing::debug!(
      "found {} translation file(s) in {}",
      files.len(),
      config.translations_dir.display()
    );
    Ok(Self { config, files })
  }

  pub fn config(&self) -> &UpdateConfig { &self.config }

  /// The persisted catalogue of the configured locale.
  ///
  /// Files in formats this tool cannot read are skipped with a warning.
  pub fn existing_catalogue(&self) -> Result<MessageCatalogue> {
    let locale = &self.config.locale;
    let mut existing = MessageCatalogue::with_locale(locale.clone());
    for domain in self.files.domains() {
      let Some(file) = self.files.get(domain, locale) else {
        continue;
      };
      if !is_supported_format(&file.format) {
        tracing::warn!(
          "skipping {}: format {:?} is not supported",
          file.path.display(),
          file.format
        );
        continue;
      }
      tracing::debug!("loading {}", file.path.display());
      let xml =
        std::fs::read_to_string(&file.path).map_err(Error::io(&file.path))?;
      let loaded =
        glossa_xliff::load(&xml, domain).map_err(|source| Error::Xliff {
          path: file.path.clone(),
          source,
        })?;
      existing.merge(loaded)?;
    }
    Ok(existing)
  }

  pub fn scanned_catalogue(&self) -> Result<MessageCatalogue> {
    scan::collect(&self.config.scan_dirs)
  }

  /// Run the whole update; nothing is written when `dry_run` is set.
  pub fn process(&self, dry_run: bool) -> Result<UpdateReport> {
    let existing = self.existing_catalogue()?;
    let scanned = self.scanned_catalogue()?;
    tracing::info!(
      "{} existing and {} scanned message(s) for locale {}",
      existing.len(),
      scanned.len(),
      self.config.locale
    );

    let update = reconcile(&scanned, &existing, &self.config.update_options())?;
    let mut catalogue = update.catalogue;
    catalogue.set_locale(Some(self.config.locale.clone()));

    let options = DumpOptions {
      source_language: self.config.source_language.clone(),
      date:            Some(Utc::now()),
    };

    let mut report = UpdateReport {
      changes: update.changes,
      files:   Vec::new(),
    };
    for domain in catalogue.domain_names() {
      let target = self.output_file(domain);
      let xml = glossa_xliff::dump(&catalogue, domain, &options).map_err(
        |source| Error::Xliff {
          path: target.path.clone(),
          source,
        },
      )?;
      if dry_run {
        tracing::info!("would write {}", target.path.display());
      } else {
        std::fs::write(&target.path, xml).map_err(Error::io(&target.path))?;
        tracing::info!("wrote {}", target.path.display());
      }
      report.files.push(target.path);
    }
    Ok(report)
  }

  /// Where `domain` is written: the existing file when its format is
  /// writable, otherwise a new file in the configured format.
  fn output_file(&self, domain: &str) -> TranslationFile {
    let cfg = &self.config;
    let existing = self.files.get(domain, &cfg.locale);
    let format = cfg
      .output_format
      .as_deref()
      .or_else(|| {
        existing
          .map(|f| f.format.as_str())
          .filter(|f| is_supported_format(f))
      })
      .unwrap_or(&cfg.default_output_format);
    let icu = existing.map_or(cfg.use_icu_message_format, |f| f.icu);
    TranslationFile::for_domain(
      &cfg.translations_dir,
      domain,
      &cfg.locale,
      format,
      icu,
    )
  }
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use glossa_core::{DEFAULT_DOMAIN, Message, MessageKey, WorkflowState};

  use super::*;

  struct Fixture {
    _dir:         tempfile::TempDir,
    translations: PathBuf,
    scan:         PathBuf,
  }

  fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let translations = dir.path().join("translations");
    let scan = dir.path().join("scan");
    std::fs::create_dir_all(&translations).unwrap();
    std::fs::create_dir_all(&scan).unwrap();
    Fixture {
      _dir: dir,
      translations,
      scan,
    }
  }

  fn config(f: &Fixture) -> UpdateConfig {
    UpdateConfig {
      translations_dir: f.translations.clone(),
      locale: "fr".into(),
      scan_dirs: vec![f.scan.clone()],
      ..UpdateConfig::default()
    }
  }

  fn persist(path: &Path, messages: Vec<Message>) {
    let mut cat = MessageCatalogue::with_locale("fr");
    let domain = messages[0].domain().to_string();
    for m in messages {
      cat.add(m);
    }
    let xml = glossa_xliff::dump(&cat, &domain, &DumpOptions::default()).unwrap();
    std::fs::write(path, xml).unwrap();
  }

  fn key(domain: &str, id: &str) -> MessageKey {
    MessageKey {
      domain: domain.into(),
      id:     id.into(),
    }
  }

  #[test]
  fn greeting_keeps_translation_and_gains_new_messages() {
    let f = fixture();
    let mut bonjour = Message::xliff("greeting", DEFAULT_DOMAIN)
      .described("Hello")
      .translated("Bonjour");
    bonjour.set_state(Some(WorkflowState::Translated));
    persist(
      &f.translations.join("messages.fr.xlf"),
      vec![bonjour, Message::xliff("gone", DEFAULT_DOMAIN).translated("Parti")],
    );
    std::fs::write(
      f.scan.join("scan.json"),
      r#"{"messages": [
        {"id": "greeting", "description": "Hello", "sources": [{"path": "home.twig", "line": 4}]},
        {"id": "farewell", "description": "Goodbye"}
      ]}"#,
    )
    .unwrap();

    let updater = Updater::new(config(&f)).unwrap();
    let report = updater.process(false).unwrap();

    assert_eq!(report.changes.added, vec![key(DEFAULT_DOMAIN, "farewell")]);
    assert_eq!(report.changes.deleted, vec![key(DEFAULT_DOMAIN, "gone")]);
    assert_eq!(report.files, vec![f.translations.join("messages.fr.xlf")]);

    let updated = updater.existing_catalogue().unwrap();
    let greeting = updated.get("greeting", DEFAULT_DOMAIN).unwrap();
    assert_eq!(greeting.translated_text(), Some("Bonjour"));
    assert_eq!(greeting.description(), Some("Hello"));
    assert!(!greeting.is_new());
    assert_eq!(greeting.sources().len(), 1);
    assert_eq!(greeting.sources()[0].line(), Some(4));

    let farewell = updated.get("farewell", DEFAULT_DOMAIN).unwrap();
    assert!(farewell.is_new());
    assert_eq!(farewell.translated_text(), Some("Goodbye"));
    assert!(!updated.contains("gone", DEFAULT_DOMAIN));
  }

  #[test]
  fn dry_run_writes_nothing() {
    let f = fixture();
    std::fs::write(
      f.scan.join("scan.json"),
      r#"{"messages": [{"id": "title", "domain": "admin"}]}"#,
    )
    .unwrap();

    let updater = Updater::new(config(&f)).unwrap();
    let report = updater.process(true).unwrap();
    assert_eq!(report.files, vec![f.translations.join("admin.fr.xlf")]);
    assert!(!report.files[0].exists());
  }

  #[test]
  fn new_domains_follow_icu_setting_and_existing_names_are_kept() {
    let f = fixture();
    persist(&f.translations.join("validators+intl-icu.fr.xliff"), vec![
      Message::xliff("required", "validators"),
    ]);
    std::fs::write(
      f.scan.join("scan.json"),
      r#"{"messages": [
        {"id": "required", "domain": "validators"},
        {"id": "title", "domain": "admin"},
        {"id": "title", "domain": "forms"}
      ]}"#,
    )
    .unwrap();

    let cfg = UpdateConfig {
      use_icu_message_format: true,
      ignored_domains: ["forms".to_string()].into(),
      ..config(&f)
    };
    let report = Updater::new(cfg).unwrap().process(false).unwrap();
    assert_eq!(report.files, vec![
      f.translations.join("validators+intl-icu.fr.xliff"),
      f.translations.join("admin+intl-icu.fr.xlf"),
    ]);
    assert!(!f.translations.join("forms.fr.xlf").exists());
  }

  #[test]
  fn unsupported_existing_files_are_skipped() {
    let f = fixture();
    std::fs::write(f.translations.join("messages.fr.yml"), "a: b").unwrap();
    let updater = Updater::new(config(&f)).unwrap();
    assert!(updater.existing_catalogue().unwrap().is_empty());
  }

  #[test]
  fn broken_translation_file_names_the_file() {
    let f = fixture();
    std::fs::write(f.translations.join("messages.fr.xlf"), "<xliff><file></xliff>")
      .unwrap();
    let updater = Updater::new(config(&f)).unwrap();
    match updater.existing_catalogue().unwrap_err() {
      Error::Xliff { path, .. } => assert!(path.ends_with("messages.fr.xlf")),
      other => panic!("expected xliff error, got {other:?}"),
    }
  }
}
