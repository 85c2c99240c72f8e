//! Format-specific message metadata.
//!
//! A [`Message`](crate::message::Message) is either plain or carries the
//! metadata of the file format it was loaded from. Only XLIFF is modelled
//! today: approval, the `state` of the target, and translator notes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{Error, Result};

// ─── Format tag ──────────────────────────────────────────────────────────────

/// The variant tag of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageFormat {
  /// Freshly extracted, or loaded from a format without workflow metadata.
  #[default]
  Plain,
  Xliff(XliffMeta),
}

// ─── XLIFF ───────────────────────────────────────────────────────────────────

/// Values of the XLIFF 1.2 `target/@state` attribute.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  EnumString,
  AsRefStr,
  Serialize,
  Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowState {
  New,
  Translated,
  NeedsTranslation,
  NeedsReviewTranslation,
  NeedsAdaptation,
  NeedsReviewAdaptation,
  #[strum(serialize = "needs-l10n")]
  #[serde(rename = "needs-l10n")]
  NeedsL10n,
  #[strum(serialize = "needs-review-l10n")]
  #[serde(rename = "needs-review-l10n")]
  NeedsReviewL10n,
  Final,
  SignedOff,
}

impl WorkflowState {
  /// Parse the attribute value used in XLIFF files.
  pub fn parse(value: &str) -> Result<Self> {
    Self::from_str(value).map_err(|_| Error::UnknownState(value.to_string()))
  }
}

/// A translator note (`<note from="...">text</note>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
  pub text: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub from: Option<String>,
}

impl Note {
  pub fn new(text: impl Into<String>, from: Option<String>) -> Self {
    Self {
      text: text.into(),
      from,
    }
  }
}

/// Metadata preserved from an XLIFF `trans-unit`.
///
/// The `state` is kept in step with the owning message's `new` flag by
/// [`Message`](crate::message::Message); it is therefore only mutable
/// through the message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XliffMeta {
  #[serde(default)]
  pub(crate) approved: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub(crate) state:    Option<WorkflowState>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub(crate) notes:    Vec<Note>,
}

impl XliffMeta {
  pub fn is_approved(&self) -> bool { self.approved }

  pub fn state(&self) -> Option<WorkflowState> { self.state }

  pub fn has_state(&self) -> bool { self.state.is_some() }

  pub fn notes(&self) -> &[Note] { &self.notes }

  pub fn has_notes(&self) -> bool { !self.notes.is_empty() }

  /// Translator-authored content may be overwritten by extraction only while
  /// the unit is unapproved and has not progressed past `new`.
  pub fn is_writable(&self) -> bool {
    !self.approved
      && matches!(self.state, None | Some(WorkflowState::New))
  }
}
