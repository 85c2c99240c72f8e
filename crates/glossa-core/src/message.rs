//! Message: a single translatable unit and its merge rules.
//!
//! Three merges exist, picked by what the two operands represent:
//!
//! | operation           | `self`            | `incoming`        |
//! |---------------------|-------------------|-------------------|
//! | [`Message::merge`]  | scan result       | another scan site |
//! | [`Message::merge_existing`] | scan result | persisted message |
//! | [`Message::merge_scanned`]  | persisted message | scan result |
//!
//! Meaning and description propagate whenever the incoming value is present,
//! even when it is the empty string. Translated text only propagates when it
//! is a non-empty string.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  format::{MessageFormat, Note, WorkflowState, XliffMeta},
  source::SourceReference,
};

/// Domain used when none is given.
pub const DEFAULT_DOMAIN: &str = "messages";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MessageRecord")]
pub struct Message {
  id:              String,
  domain:          String,
  new:             bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  translated_text: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  meaning:         Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  description:     Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  sources:         Vec<SourceReference>,
  format:          MessageFormat,
}

impl Message {
  /// A fresh plain message in the default domain.
  pub fn new(id: impl Into<String>) -> Self {
    Self::with_domain(id, DEFAULT_DOMAIN)
  }

  pub fn with_domain(id: impl Into<String>, domain: impl Into<String>) -> Self {
    Self {
      id:              id.into(),
      domain:          domain.into(),
      new:             true,
      translated_text: None,
      meaning:         None,
      description:     None,
      sources:         Vec::new(),
      format:          MessageFormat::Plain,
    }
  }

  /// A fresh XLIFF message; its state starts as `new`, mirroring the flag.
  pub fn xliff(id: impl Into<String>, domain: impl Into<String>) -> Self {
    let mut message = Self::with_domain(id, domain);
    message.format = MessageFormat::Xliff(XliffMeta {
      state: Some(WorkflowState::New),
      ..XliffMeta::default()
    });
    message
  }

  // ── Builders ──────────────────────────────────────────────────────────

  pub fn described(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  pub fn meaning_of(mut self, meaning: impl Into<String>) -> Self {
    self.meaning = Some(meaning.into());
    self
  }

  pub fn translated(mut self, text: impl Into<String>) -> Self {
    self.translated_text = Some(text.into());
    self
  }

  pub fn found_at(mut self, source: SourceReference) -> Self {
    self.add_source(source);
    self
  }

  pub fn marked_new(mut self, new: bool) -> Self {
    self.set_new(new);
    self
  }

  // ── Accessors ─────────────────────────────────────────────────────────

  pub fn id(&self) -> &str { &self.id }

  pub fn domain(&self) -> &str { &self.domain }

  pub fn is_new(&self) -> bool { self.new }

  pub fn translated_text(&self) -> Option<&str> {
    self.translated_text.as_deref()
  }

  pub fn meaning(&self) -> Option<&str> { self.meaning.as_deref() }

  pub fn description(&self) -> Option<&str> { self.description.as_deref() }

  pub fn sources(&self) -> &[SourceReference] { &self.sources }

  pub fn format(&self) -> &MessageFormat { &self.format }

  /// The XLIFF metadata, if this is an XLIFF message.
  pub fn xliff_meta(&self) -> Option<&XliffMeta> {
    match &self.format {
      MessageFormat::Xliff(meta) => Some(meta),
      MessageFormat::Plain => None,
    }
  }

  /// The text to show in a translation file:
  /// 1. the translated text,
  /// 2. the description (new messages only),
  /// 3. the id (new messages only),
  /// 4. the empty string.
  pub fn display_text(&self) -> &str {
    match (&self.translated_text, self.new) {
      (Some(text), _) => text.as_str(),
      (None, true) => self.description.as_deref().unwrap_or(&self.id),
      (None, false) => "",
    }
  }

  /// The string to translate from: the description, falling back to the id.
  pub fn source_text(&self) -> &str {
    match self.description.as_deref() {
      Some(desc) if !desc.is_empty() => desc,
      _ => self.id.as_str(),
    }
  }

  /// Whether a real translation exists. Unlike [`Self::display_text`] this
  /// never falls back to the description or id.
  pub fn has_translation(&self) -> bool {
    self.translated_text.as_deref().is_some_and(|t| !t.is_empty())
  }

  pub fn has_source(&self, source: &SourceReference) -> bool {
    self.sources.contains(source)
  }

  pub fn is_approved(&self) -> bool {
    self.xliff_meta().is_some_and(XliffMeta::is_approved)
  }

  pub fn state(&self) -> Option<WorkflowState> {
    self.xliff_meta().and_then(XliffMeta::state)
  }

  pub fn notes(&self) -> &[Note] {
    self.xliff_meta().map(XliffMeta::notes).unwrap_or_default()
  }

  /// Whether extraction may overwrite description, meaning and translation.
  /// Plain messages are always writable.
  pub fn is_writable(&self) -> bool {
    self.xliff_meta().is_none_or(XliffMeta::is_writable)
  }

  // ── Mutators ──────────────────────────────────────────────────────────

  /// Append `source` unless an equal reference is already recorded.
  pub fn add_source(&mut self, source: SourceReference) -> &mut Self {
    if !self.has_source(&source) {
      self.sources.push(source);
    }
    self
  }

  /// Replace all sources; duplicates in `sources` are dropped.
  pub fn set_sources(&mut self, sources: Vec<SourceReference>) -> &mut Self {
    self.sources.clear();
    for source in sources {
      self.add_source(source);
    }
    self
  }

  pub fn set_meaning(&mut self, meaning: Option<String>) -> &mut Self {
    self.meaning = meaning;
    self
  }

  pub fn set_description(&mut self, description: Option<String>) -> &mut Self {
    self.description = description;
    self
  }

  pub fn set_translated_text(&mut self, text: Option<String>) -> &mut Self {
    self.translated_text = text;
    self
  }

  /// Set the `new` flag. On XLIFF messages `true` forces the state to `new`;
  /// `false` clears the state only if it was `new`.
  pub fn set_new(&mut self, new: bool) -> &mut Self {
    if let MessageFormat::Xliff(meta) = &mut self.format {
      if new {
        meta.state = Some(WorkflowState::New);
      } else if meta.state == Some(WorkflowState::New) {
        meta.state = None;
      }
    }
    self.new = new;
    self
  }

  /// Set the XLIFF state; the `new` flag follows whether it is `new`.
  ///
  /// Attaching XLIFF metadata to a plain message turns it into an XLIFF
  /// message.
  pub fn set_state(&mut self, state: Option<WorkflowState>) -> &mut Self {
    self.update_xliff_meta(|meta| meta.state = state);
    self.new = state == Some(WorkflowState::New);
    self
  }

  /// See [`Self::set_state`] on plain messages.
  pub fn set_approved(&mut self, approved: bool) -> &mut Self {
    self.update_xliff_meta(|meta| meta.approved = approved);
    self
  }

  /// See [`Self::set_state`] on plain messages.
  pub fn set_notes(&mut self, notes: Vec<Note>) -> &mut Self {
    self.update_xliff_meta(|meta| meta.notes = notes);
    self
  }

  /// See [`Self::set_state`] on plain messages.
  pub fn add_note(&mut self, note: Note) -> &mut Self {
    self.update_xliff_meta(|meta| meta.notes.push(note));
    self
  }

  fn update_xliff_meta(&mut self, update: impl FnOnce(&mut XliffMeta)) {
    match &mut self.format {
      MessageFormat::Xliff(meta) => update(meta),
      MessageFormat::Plain => {
        let mut meta = XliffMeta {
          state: self.new.then_some(WorkflowState::New),
          ..XliffMeta::default()
        };
        update(&mut meta);
        self.format = MessageFormat::Xliff(meta);
      }
    }
  }

  // ── Merging ───────────────────────────────────────────────────────────

  /// Fold another extraction site of the same message into this one.
  ///
  /// Do not use this for messages of an existing catalogue; use
  /// [`Self::merge_existing`] or [`Self::merge_scanned`] instead.
  pub fn merge(&mut self, incoming: &Message) -> Result<()> {
    self.ensure_same_id(incoming)?;

    if self.xliff_meta().is_none() {
      if let Some(meaning) = &incoming.meaning {
        self.meaning = Some(meaning.clone());
      }
      if let Some(desc) = &incoming.description {
        self.description = Some(desc.clone());
        // The translation belongs to the old description.
        self.translated_text = None;
        if incoming.has_translation() {
          self.translated_text = incoming.translated_text.clone();
        }
      }
      self.union_sources(incoming);
      self.set_new(incoming.new);
      return Ok(());
    }

    self.union_sources(incoming);
    let old_desc = self.description.clone();
    if self.is_writable() {
      self.absorb_authored(incoming);
    }
    self.sync_format_meta(incoming, old_desc);
    Ok(())
  }

  /// Backfill this freshly scanned message from a persisted one.
  ///
  /// Sources are left alone; the persisted message's sites are stale.
  pub fn merge_existing(&mut self, incoming: &Message) -> Result<()> {
    self.ensure_same_id(incoming)?;

    let old_desc = self.description.clone();
    if self.is_writable() {
      self.absorb_authored(incoming);
    }
    if self.xliff_meta().is_some() {
      self.sync_format_meta(incoming, old_desc);
    }
    Ok(())
  }

  /// Refresh this persisted message from a freshly scanned one.
  ///
  /// The scanned sources replace ours wholesale. Meaning, description and
  /// translation are only filled in where this message has none.
  pub fn merge_scanned(&mut self, incoming: &Message) -> Result<()> {
    self.ensure_same_id(incoming)?;

    self.set_sources(incoming.sources.clone());

    let old_desc = self.description.clone();
    if self.is_writable() {
      if self.meaning.is_none() {
        self.meaning = incoming.meaning.clone();
      }
      if self.description.is_none() {
        self.description = incoming.description.clone();
      }
      if self.display_text().is_empty() {
        let text = incoming.display_text();
        if !text.is_empty() {
          self.translated_text = Some(text.to_string());
        }
      }
    }
    if self.xliff_meta().is_some() {
      self.sync_format_meta(incoming, old_desc);
    }
    Ok(())
  }

  fn ensure_same_id(&self, incoming: &Message) -> Result<()> {
    if self.id == incoming.id {
      Ok(())
    } else {
      Err(Error::IdMismatch {
        expected: self.id.clone(),
        actual:   incoming.id.clone(),
      })
    }
  }

  fn union_sources(&mut self, incoming: &Message) {
    for source in &incoming.sources {
      self.add_source(source.clone());
    }
  }

  /// Overwrite meaning, description, flag and translation from `incoming`.
  fn absorb_authored(&mut self, incoming: &Message) {
    if let Some(meaning) = &incoming.meaning {
      self.meaning = Some(meaning.clone());
    }
    if let Some(desc) = &incoming.description {
      self.description = Some(desc.clone());
    }
    self.set_new(incoming.new);
    if incoming.has_translation() {
      self.translated_text = incoming.translated_text.clone();
    }
  }

  /// After a description change the workflow metadata of this message no
  /// longer applies: take the incoming one, or revoke approval.
  fn sync_format_meta(&mut self, incoming: &Message, old_desc: Option<String>) {
    if old_desc == self.description {
      return;
    }
    match incoming.xliff_meta() {
      Some(meta) => {
        let meta = meta.clone();
        self.set_state(meta.state);
        self.set_approved(meta.approved);
        self.set_notes(meta.notes);
      }
      None => {
        self.set_approved(false);
      }
    }
  }
}

/// Deserialization shape of [`Message`]; normalises sources and the
/// state/flag pairing on the way in.
#[derive(Deserialize)]
struct MessageRecord {
  id:              String,
  #[serde(default = "default_domain")]
  domain:          String,
  #[serde(default = "default_new")]
  new:             bool,
  #[serde(default)]
  translated_text: Option<String>,
  #[serde(default)]
  meaning:         Option<String>,
  #[serde(default)]
  description:     Option<String>,
  #[serde(default)]
  sources:         Vec<SourceReference>,
  #[serde(default)]
  format:          MessageFormat,
}

fn default_domain() -> String { DEFAULT_DOMAIN.to_string() }

fn default_new() -> bool { true }

impl From<MessageRecord> for Message {
  fn from(record: MessageRecord) -> Self {
    let mut message = Message::with_domain(record.id, record.domain);
    message.translated_text = record.translated_text;
    message.meaning = record.meaning;
    message.description = record.description;
    message.set_sources(record.sources);
    match record.format {
      MessageFormat::Plain => {
        message.set_new(record.new);
      }
      MessageFormat::Xliff(meta) => {
        message.set_state(meta.state);
        message.set_approved(meta.approved);
        message.set_notes(meta.notes);
      }
    }
    message
  }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
