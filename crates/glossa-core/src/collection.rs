//! MessageCollection: the messages of a single domain.

use indexmap::IndexMap;

use crate::{Error, Result, message::Message};

/// An id-keyed, insertion-ordered set of messages sharing one domain.
///
/// A collection only knows its domain name; the owning
/// [`MessageCatalogue`](crate::catalogue::MessageCatalogue) looks it up by
/// that name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCollection {
  domain:   String,
  messages: IndexMap<String, Message>,
}

impl MessageCollection {
  pub fn new(domain: impl Into<String>) -> Self {
    Self {
      domain:   domain.into(),
      messages: IndexMap::new(),
    }
  }

  pub fn domain(&self) -> &str { &self.domain }

  pub fn len(&self) -> usize { self.messages.len() }

  pub fn is_empty(&self) -> bool { self.messages.is_empty() }

  /// Messages in insertion order.
  pub fn messages(&self) -> impl Iterator<Item = &Message> {
    self.messages.values()
  }

  pub fn ids(&self) -> impl Iterator<Item = &str> {
    self.messages.keys().map(String::as_str)
  }

  /// Insert `message` unless its id is already taken; the first add wins.
  pub fn add(&mut self, message: Message) -> Result<()> {
    self.ensure_domain(&message)?;
    self.insert(message, false);
    Ok(())
  }

  /// Insert `message`, replacing an existing one with the same id only when
  /// `force` is set.
  pub fn set(&mut self, message: Message, force: bool) -> Result<()> {
    self.ensure_domain(&message)?;
    self.insert(message, force);
    Ok(())
  }

  pub fn has(&self, id: &str) -> bool { self.messages.contains_key(id) }

  pub fn get(&self, id: &str) -> Result<&Message> {
    self.messages.get(id).ok_or_else(|| self.not_found(id))
  }

  pub fn get_mut(&mut self, id: &str) -> Result<&mut Message> {
    if !self.has(id) {
      return Err(self.not_found(id));
    }
    Ok(&mut self.messages[id])
  }

  /// Merge every message of `other` into this collection.
  ///
  /// Shared ids go through [`Message::merge`]; the rest are appended in
  /// `other`'s order.
  pub fn merge(&mut self, other: MessageCollection) -> Result<()> {
    if other.domain != self.domain {
      return Err(Error::DomainMismatch {
        expected: self.domain.clone(),
        actual:   other.domain,
      });
    }
    for (id, message) in other.messages {
      match self.messages.get_mut(&id) {
        Some(mine) => mine.merge(&message)?,
        None => {
          self.messages.insert(id, message);
        }
      }
    }
    Ok(())
  }

  pub(crate) fn messages_mut(&mut self) -> impl Iterator<Item = &mut Message> {
    self.messages.values_mut()
  }

  pub(crate) fn into_messages(self) -> impl Iterator<Item = Message> {
    self.messages.into_values()
  }

  /// Insert without checking the domain; the catalogue routes by domain.
  pub(crate) fn insert(&mut self, message: Message, force: bool) {
    if force || !self.has(message.id()) {
      self.messages.insert(message.id().to_string(), message);
    }
  }

  fn ensure_domain(&self, message: &Message) -> Result<()> {
    if message.domain() == self.domain {
      Ok(())
    } else {
      Err(Error::DomainMismatch {
        expected: self.domain.clone(),
        actual:   message.domain().to_string(),
      })
    }
  }

  fn not_found(&self, id: &str) -> Error {
    Error::MessageNotFound {
      id:     id.to_string(),
      domain: self.domain.clone(),
    }
  }
}
