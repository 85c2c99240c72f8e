//! XLIFF reader.
//!
//! A hand-written event loop over `quick-xml`; only the parts of XLIFF 1.2
//! that map onto a message are read, everything else is skipped.

use glossa_core::{
  Message, MessageCatalogue, Note, SourceReference, WorkflowState,
};
use quick_xml::{
  Reader,
  events::{BytesStart, Event},
};

use crate::{Error, Result};

/// Parse an XLIFF document holding messages of `domain`.
///
/// Every unit becomes an XLIFF message. Units are not new unless their target
/// says `state="new"`. The catalogue locale is the file's `target-language`.
pub fn load(xml: &str, domain: &str) -> Result<MessageCatalogue> {
  let mut reader = Reader::from_str(xml);
  let mut catalogue = MessageCatalogue::new();

  let mut unit: Option<Unit> = None;
  let mut field: Option<Field> = None;
  let mut text = String::new();
  // Open elements inside the current `<trans-unit>`; fields are its direct
  // children only.
  let mut depth = 0usize;

  loop {
    match reader.read_event().map_err(Error::xml)? {
      Event::Start(ref e) => match unit.as_mut() {
        Some(_) => {
          if depth == 0 {
            field = Field::start(e.local_name().as_ref(), e)?;
            text.clear();
          }
          depth += 1;
        }
        None => match e.local_name().as_ref() {
          b"file" => {
            if let Some(locale) = attr(e, b"target-language")? {
              catalogue.set_locale(Some(locale));
            }
          }
          b"trans-unit" => {
            unit = Some(Unit::start(e)?);
            depth = 0;
          }
          _ => {}
        },
      },
      Event::Empty(ref e) => match unit.as_mut() {
        // `<target/>` and friends: a field with empty content.
        Some(current) if depth == 0 => {
          if let Some(empty) = Field::start(e.local_name().as_ref(), e)? {
            current.finish_field(empty, String::new())?;
          }
        }
        Some(_) => {}
        None => {
          if e.local_name().as_ref() == b"trans-unit" {
            catalogue.add(Unit::start(e)?.into_message(domain)?);
          }
        }
      },
      Event::Text(ref e) => {
        if field.is_some() {
          text.push_str(&e.unescape().map_err(Error::xml)?);
        }
      }
      Event::CData(ref e) => {
        if field.is_some() {
          text.push_str(&String::from_utf8_lossy(e));
        }
      }
      Event::End(_) => {
        let Some(current) = unit.as_mut() else {
          continue;
        };
        if depth == 0 {
          // `</trans-unit>`
          if let Some(done) = unit.take() {
            catalogue.add(done.into_message(domain)?);
          }
          continue;
        }
        depth -= 1;
        if depth == 0 {
          if let Some(done) = field.take() {
            current.finish_field(done, std::mem::take(&mut text))?;
          }
        }
      }
      Event::Eof => break,
      _ => {}
    }
  }

  Ok(catalogue)
}

/// A child element of `<trans-unit>` whose text is being collected.
enum Field {
  Source,
  Target {
    state: Option<WorkflowState>,
  },
  Note {
    from: Option<String>,
  },
  Reference {
    line:   Option<u32>,
    column: Option<u32>,
  },
}

impl Field {
  fn start(local: &[u8], e: &BytesStart<'_>) -> Result<Option<Self>> {
    let field = match local {
      b"source" => Field::Source,
      b"target" => Field::Target {
        state: attr(e, b"state")?
          .map(|s| WorkflowState::parse(&s))
          .transpose()?,
      },
      b"note" => Field::Note {
        from: attr(e, b"from")?,
      },
      b"reference-file" => Field::Reference {
        line:   number_attr(e, b"line", "line")?,
        column: number_attr(e, b"column", "column")?,
      },
      _ => return Ok(None),
    };
    Ok(Some(field))
  }
}

/// Everything read from one `<trans-unit>` so far.
#[derive(Default)]
struct Unit {
  resname:   Option<String>,
  id:        Option<String>,
  approved:  bool,
  extradata: Option<String>,
  source:    Option<String>,
  target:    Option<String>,
  state:     Option<WorkflowState>,
  notes:     Vec<Note>,
  sources:   Vec<SourceReference>,
}

impl Unit {
  fn start(e: &BytesStart<'_>) -> Result<Self> {
    Ok(Self {
      resname: attr(e, b"resname")?,
      id: attr(e, b"id")?,
      approved: attr(e, b"approved")?.as_deref() == Some("yes"),
      extradata: attr(e, b"extradata")?,
      ..Self::default()
    })
  }

  fn finish_field(&mut self, field: Field, text: String) -> Result<()> {
    match field {
      Field::Source => self.source = Some(text),
      Field::Target { state } => {
        self.target = Some(text);
        self.state = state;
      }
      Field::Note { from } => self.notes.push(Note::new(text, from)),
      Field::Reference { line, column } => {
        self.sources.push(SourceReference::new(text, line, column));
      }
    }
    Ok(())
  }

  fn into_message(self, domain: &str) -> Result<Message> {
    let id = self.resname.or(self.id).ok_or(Error::MissingAttribute {
      element:   "trans-unit",
      attribute: "resname",
    })?;

    let mut message = Message::xliff(id.clone(), domain);
    message.set_new(false);
    if let Some(state) = self.state {
      message.set_state(Some(state));
    }
    if let Some(source) = self.source.filter(|s| *s != id) {
      message.set_description(Some(source));
    }
    let meaning = self
      .extradata
      .as_deref()
      .and_then(|x| x.strip_prefix("Meaning: "))
      .map(str::to_string);
    message
      .set_meaning(meaning)
      .set_translated_text(self.target)
      .set_sources(self.sources)
      .set_notes(self.notes)
      .set_approved(self.approved);
    Ok(message)
  }
}

// ─── Attribute helpers ───────────────────────────────────────────────────────

fn attr(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
  for attribute in e.attributes() {
    let attribute = attribute.map_err(Error::xml)?;
    if attribute.key.local_name().as_ref() == name {
      let value = attribute.unescape_value().map_err(Error::xml)?;
      return Ok(Some(value.into_owned()));
    }
  }
  Ok(None)
}

fn number_attr(
  e: &BytesStart<'_>,
  name: &[u8],
  label: &'static str,
) -> Result<Option<u32>> {
  attr(e, name)?
    .map(|value| {
      value.parse().map_err(|_| Error::InvalidAttribute {
        attribute: label,
        value,
      })
    })
    .transpose()
}

// ─── Tests ────────────────────────────────────────────────────────────────────
