//! Update reconciliation: fold a fresh scan into the persisted catalogue.
//!
//! The persisted message is the one kept: it carries the translator's work.
//! The scanned message only refreshes its sources and fills in what is
//! missing (see [`Message::merge_scanned`]).

use std::{collections::BTreeSet, fmt};

use crate::{Result, catalogue::MessageCatalogue, message::Message};

/// Which domains an update touches, and what happens to vanished messages.
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
  /// Keep persisted messages that the scan no longer finds.
  pub keep_old_messages: bool,
  /// When non-empty, only these domains are updated.
  pub domains:           BTreeSet<String>,
  /// Domains that are never touched.
  pub ignored_domains:   BTreeSet<String>,
}

impl UpdateOptions {
  pub fn selects(&self, domain: &str) -> bool {
    !self.ignored_domains.contains(domain)
      && (self.domains.is_empty() || self.domains.contains(domain))
  }
}

/// A message address: domain plus id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageKey {
  pub domain: String,
  pub id:     String,
}

impl MessageKey {
  fn of(message: &Message) -> Self {
    Self {
      domain: message.domain().to_string(),
      id:     message.id().to_string(),
    }
  }
}

impl fmt::Display for MessageKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.domain, self.id)
  }
}

/// Messages that appear in the scan but not on disk, and the reverse.
///
/// Deleted messages are listed even when `keep_old_messages` retained them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
  pub added:   Vec<MessageKey>,
  pub deleted: Vec<MessageKey>,
}

impl ChangeSet {
  pub fn is_empty(&self) -> bool {
    self.added.is_empty() && self.deleted.is_empty()
  }
}

/// The outcome of [`reconcile`].
#[derive(Debug, Clone)]
pub struct Update {
  pub catalogue: MessageCatalogue,
  pub changes:   ChangeSet,
}

/// Reconcile `scanned` with `existing` for every selected domain.
///
/// Selected domains of `existing` are present in the result even when they
/// end up empty, so their files get rewritten.
pub fn reconcile(
  scanned: &MessageCatalogue,
  existing: &MessageCatalogue,
  options: &UpdateOptions,
) -> Result<Update> {
  let locale = existing.locale().or(scanned.locale()).map(str::to_string);
  let mut catalogue = MessageCatalogue::new();
  catalogue.set_locale(locale);
  let mut changes = ChangeSet::default();

  for collection in scanned.domains().filter(|c| options.selects(c.domain())) {
    catalogue.domain_or_insert(collection.domain());
    for message in collection.messages() {
      if existing.has(message) {
        let mut persisted = existing.get(message.id(), message.domain())?.clone();
        persisted.merge_scanned(message)?;
        catalogue.set(persisted, true);
      } else {
        changes.added.push(MessageKey::of(message));
        catalogue.add(message.clone());
      }
    }
  }

  for collection in existing.domains().filter(|c| options.selects(c.domain())) {
    catalogue.domain_or_insert(collection.domain());
    for message in collection.messages() {
      if scanned.has(message) {
        continue;
      }
      changes.deleted.push(MessageKey::of(message));
      if options.keep_old_messages {
        catalogue.add(message.clone());
      }
    }
  }

  Ok(Update { catalogue, changes })
}
