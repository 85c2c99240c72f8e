//! XLIFF writer.

use std::io::Cursor;

use chrono::{DateTime, SecondsFormat, Utc};
use glossa_core::{Message, MessageCatalogue, WorkflowState};
use quick_xml::{
  Writer,
  events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use sha2::{Digest, Sha256};

use crate::{Error, NS_GLOSSA, NS_XLIFF, Result};

const HEADER_NOTE: &str = "The source node in most cases contains the sample \
                           message as written by the developer. If it looks \
                           like a dot-delimited string such as \
                           \"form.label.firstname\", then the developer has \
                           not provided a default message.";

/// Settings for [`dump`].
#[derive(Debug, Clone)]
pub struct DumpOptions {
  /// Value of `file/@source-language`.
  pub source_language: String,
  /// Value of `file/@date`; omitted when `None`.
  pub date:            Option<DateTime<Utc>>,
}

impl Default for DumpOptions {
  fn default() -> Self {
    Self {
      source_language: "en".to_string(),
      date:            None,
    }
  }
}

/// The `trans-unit/@id` of a message: hex SHA-256 of its id.
pub fn unit_id(message_id: &str) -> String {
  hex::encode(Sha256::digest(message_id.as_bytes()))
}

/// Render `domain` of `catalogue` as an XLIFF 1.2 document.
///
/// The target of a unit is the message's display text, so a new message
/// without translation shows its description (or id) to the translator.
pub fn dump(
  catalogue: &MessageCatalogue,
  domain: &str,
  options: &DumpOptions,
) -> Result<String> {
  let collection = catalogue.domain(domain)?;
  let mut w = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 4);

  w.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
    .map_err(Error::xml)?;

  let mut root = BytesStart::new("xliff");
  root.push_attribute(("xmlns", NS_XLIFF));
  root.push_attribute(("xmlns:glossa", NS_GLOSSA));
  root.push_attribute(("version", "1.2"));
  write_start(&mut w, root)?;

  let mut file = BytesStart::new("file");
  file.push_attribute(("source-language", options.source_language.as_str()));
  if let Some(locale) = catalogue.locale() {
    file.push_attribute(("target-language", locale));
  }
  file.push_attribute(("datatype", "plaintext"));
  file.push_attribute(("original", "not.available"));
  let date = options
    .date
    .map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true));
  if let Some(date) = &date {
    file.push_attribute(("date", date.as_str()));
  }
  write_start(&mut w, file)?;

  write_start(&mut w, BytesStart::new("header"))?;
  let mut tool = BytesStart::new("tool");
  tool.push_attribute(("tool-id", "glossa"));
  tool.push_attribute(("tool-name", "glossa"));
  tool.push_attribute(("tool-version", env!("CARGO_PKG_VERSION")));
  w.write_event(Event::Empty(tool)).map_err(Error::xml)?;
  write_text_elem(&mut w, BytesStart::new("note"), HEADER_NOTE)?;
  write_end(&mut w, "header")?;

  write_start(&mut w, BytesStart::new("body"))?;
  for message in collection.messages() {
    write_unit(&mut w, message)?;
  }
  write_end(&mut w, "body")?;

  write_end(&mut w, "file")?;
  write_end(&mut w, "xliff")?;

  let bytes = w.into_inner().into_inner();
  String::from_utf8(bytes).map_err(Error::xml)
}

fn write_unit(w: &mut Writer<Cursor<Vec<u8>>>, message: &Message) -> Result<()> {
  let id = unit_id(message.id());
  let mut unit = BytesStart::new("trans-unit");
  unit.push_attribute(("id", id.as_str()));
  unit.push_attribute(("resname", message.id()));
  if message.is_approved() {
    unit.push_attribute(("approved", "yes"));
  }
  let extradata = message.meaning().map(|m| format!("Meaning: {m}"));
  if let Some(extradata) = &extradata {
    unit.push_attribute(("extradata", extradata.as_str()));
  }
  write_start(w, unit)?;

  write_text_elem(w, BytesStart::new("source"), message.source_text())?;

  let mut target = BytesStart::new("target");
  let state = match message.state() {
    Some(state) => Some(state),
    None if message.xliff_meta().is_none() && message.is_new() => {
      Some(WorkflowState::New)
    }
    None => None,
  };
  let state = state.map(|s| s.to_string());
  if let Some(state) = &state {
    target.push_attribute(("state", state.as_str()));
  }
  write_text_elem(w, target, message.display_text())?;

  for source in message.sources() {
    let line = source.line().map(|l| l.to_string());
    let column = source.column().map(|c| c.to_string());
    let mut reference = BytesStart::new("glossa:reference-file");
    if let Some(line) = &line {
      reference.push_attribute(("line", line.as_str()));
    }
    if let Some(column) = &column {
      reference.push_attribute(("column", column.as_str()));
    }
    write_text_elem(w, reference, source.path())?;
  }

  for note in message.notes() {
    let mut elem = BytesStart::new("note");
    if let Some(from) = &note.from {
      elem.push_attribute(("from", from.as_str()));
    }
    write_text_elem(w, elem, &note.text)?;
  }

  write_end(w, "trans-unit")
}

// ─── XML writer helpers ──────────────────────────────────────────────────────

fn write_start(w: &mut Writer<Cursor<Vec<u8>>>, elem: BytesStart<'_>) -> Result<()> {
  w.write_event(Event::Start(elem)).map_err(Error::xml)
}

fn write_end(w: &mut Writer<Cursor<Vec<u8>>>, tag: &str) -> Result<()> {
  w.write_event(Event::End(BytesEnd::new(tag))).map_err(Error::xml)
}

fn write_text_elem(
  w: &mut Writer<Cursor<Vec<u8>>>,
  elem: BytesStart<'_>,
  text: &str,
) -> Result<()> {
  let tag = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
  write_start(w, elem)?;
  w.write_event(Event::Text(BytesText::new(text)))
    .map_err(Error::xml)?;
  write_end(w, &tag)
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use glossa_core::{DEFAULT_DOMAIN, Message, MessageCatalogue};

  use super::*;

  fn render(cat: &MessageCatalogue) -> String {
    dump(cat, DEFAULT_DOMAIN, &DumpOptions::default()).unwrap()
  }

  #[test]
  fn unit_id_is_sha256_hex() {
    assert_eq!(
      unit_id("abc"),
      "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
  }

  #[test]
  fn header_carries_languages_and_date() {
    let mut cat = MessageCatalogue::with_locale("de");
    cat.add(Message::new("a"));
    let options = DumpOptions {
      source_language: "en".into(),
      date:            Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
    };
    let xml = dump(&cat, DEFAULT_DOMAIN, &options).unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    assert!(xml.contains("source-language=\"en\""), "{xml}");
    assert!(xml.contains("target-language=\"de\""), "{xml}");
    assert!(xml.contains("date=\"2024-01-02T03:04:05Z\""), "{xml}");
    assert!(xml.contains("tool-id=\"glossa\""), "{xml}");
  }

  #[test]
  fn new_plain_message_shows_description_as_new_target() {
    let mut cat = MessageCatalogue::new();
    cat.add(Message::new("form.title").described("Title"));
    let xml = render(&cat);
    assert!(xml.contains("resname=\"form.title\""), "{xml}");
    assert!(xml.contains("<source>Title</source>"), "{xml}");
    assert!(xml.contains("<target state=\"new\">Title</target>"), "{xml}");
    assert!(!xml.contains("target-language"), "{xml}");
  }

  #[test]
  fn text_is_escaped() {
    let mut cat = MessageCatalogue::new();
    cat.add(Message::new("a").described("1 < 2 & \"x\"").marked_new(false));
    let xml = render(&cat);
    assert!(xml.contains("<source>1 &lt; 2 &amp; "), "{xml}");
  }

  #[test]
  fn unknown_domain_is_an_error() {
    let err = dump(&MessageCatalogue::new(), "nope", &DumpOptions::default())
      .unwrap_err();
    assert!(matches!(err, Error::Core(glossa_core::Error::DomainNotFound(_))));
  }
}
