//! MessageCatalogue: all extracted messages of one locale, by domain.
//!
//! A message id only identifies a message within its domain; the same id may
//! appear in several domains without colliding.

use indexmap::IndexMap;

use crate::{
  Error, Result, collection::MessageCollection, message::Message,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCatalogue {
  locale:  Option<String>,
  domains: IndexMap<String, MessageCollection>,
}

impl MessageCatalogue {
  pub fn new() -> Self { Self::default() }

  pub fn with_locale(locale: impl Into<String>) -> Self {
    Self {
      locale:  Some(locale.into()),
      domains: IndexMap::new(),
    }
  }

  pub fn locale(&self) -> Option<&str> { self.locale.as_deref() }

  pub fn set_locale(&mut self, locale: Option<String>) { self.locale = locale; }

  /// Add `message` to its domain; an existing message with the same id wins.
  pub fn add(&mut self, message: Message) {
    self.domain_or_insert(message.domain()).insert(message, false);
  }

  /// Like [`Self::add`], but replaces an existing message when `force` is
  /// set.
  pub fn set(&mut self, message: Message, force: bool) {
    self.domain_or_insert(message.domain()).insert(message, force);
  }

  pub fn get(&self, id: &str, domain: &str) -> Result<&Message> {
    self.domain(domain)?.get(id)
  }

  pub fn get_mut(&mut self, id: &str, domain: &str) -> Result<&mut Message> {
    self.domain_mut(domain)?.get_mut(id)
  }

  /// Whether a message with the same domain and id is present.
  pub fn has(&self, message: &Message) -> bool {
    self.contains(message.id(), message.domain())
  }

  pub fn contains(&self, id: &str, domain: &str) -> bool {
    self
      .domains
      .get(domain)
      .is_some_and(|collection| collection.has(id))
  }

  pub fn has_domain(&self, domain: &str) -> bool {
    self.domains.contains_key(domain)
  }

  pub fn domain(&self, domain: &str) -> Result<&MessageCollection> {
    self
      .domains
      .get(domain)
      .ok_or_else(|| Error::DomainNotFound(domain.to_string()))
  }

  pub fn domain_mut(&mut self, domain: &str) -> Result<&mut MessageCollection> {
    self
      .domains
      .get_mut(domain)
      .ok_or_else(|| Error::DomainNotFound(domain.to_string()))
  }

  /// The collection for `domain`, created empty if missing.
  pub fn domain_or_insert(&mut self, domain: &str) -> &mut MessageCollection {
    self
      .domains
      .entry(domain.to_string())
      .or_insert_with(|| MessageCollection::new(domain))
  }

  /// Collections in the order their domains were first used.
  pub fn domains(&self) -> impl Iterator<Item = &MessageCollection> {
    self.domains.values()
  }

  pub fn domain_names(&self) -> impl Iterator<Item = &str> {
    self.domains.keys().map(String::as_str)
  }

  /// Every message, domain by domain.
  pub fn messages(&self) -> impl Iterator<Item = &Message> {
    self.domains.values().flat_map(MessageCollection::messages)
  }

  /// Total number of messages across all domains.
  pub fn len(&self) -> usize {
    self.domains.values().map(MessageCollection::len).sum()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  /// Merge another scan result into this one, domain by domain.
  pub fn merge(&mut self, other: MessageCatalogue) -> Result<()> {
    for (name, collection) in other.domains {
      self.domain_or_insert(&name).merge(collection)?;
    }
    Ok(())
  }

  /// Backfill this scan result from a persisted catalogue.
  ///
  /// Only messages present in both take part; nothing is added.
  pub fn merge_existing(&mut self, existing: &MessageCatalogue) -> Result<()> {
    for (name, collection) in &mut self.domains {
      let Some(theirs) = existing.domains.get(name) else {
        continue;
      };
      for message in collection.messages_mut() {
        if let Ok(persisted) = theirs.get(message.id()) {
          message.merge_existing(persisted)?;
        }
      }
    }
    Ok(())
  }

  /// Refresh this persisted catalogue from a scan result.
  ///
  /// Shared messages go through [`Message::merge_scanned`]; scanned messages
  /// unknown here are added.
  pub fn merge_scanned(&mut self, scanned: MessageCatalogue) -> Result<()> {
    for (name, collection) in scanned.domains {
      let mine = self.domain_or_insert(&name);
      for message in collection.into_messages() {
        if mine.has(message.id()) {
          mine.get_mut(message.id())?.merge_scanned(&message)?;
        } else {
          mine.insert(message, false);
        }
      }
    }
    Ok(())
  }
}
