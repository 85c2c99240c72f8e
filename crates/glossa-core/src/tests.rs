//! Catalogue-level scenarios.

use crate::{
  Error, Message, MessageCatalogue, Note, SourceReference, WorkflowState,
  message::DEFAULT_DOMAIN,
};

fn src(path: &str, line: u32) -> SourceReference {
  SourceReference::new(path, Some(line), None)
}

// ─── Lookup ──────────────────────────────────────────────────────────────────

#[test]
fn domains_are_created_lazily() {
  let mut cat = MessageCatalogue::new();
  assert!(!cat.has_domain(DEFAULT_DOMAIN));
  assert!(cat.is_empty());

  cat.add(Message::new("a"));
  assert!(cat.has_domain(DEFAULT_DOMAIN));
  assert_eq!(cat.len(), 1);
}

#[test]
fn same_id_in_two_domains_does_not_collide() {
  let mut cat = MessageCatalogue::new();
  cat.add(Message::new("x").described("plain"));
  cat.add(Message::with_domain("x", "validators").described("validator"));

  let a = cat.get("x", DEFAULT_DOMAIN).unwrap();
  let b = cat.get("x", "validators").unwrap();
  assert_ne!(a, b);
  assert_eq!(a.description(), Some("plain"));
  assert_eq!(b.description(), Some("validator"));
  assert_eq!(cat.domain_names().collect::<Vec<_>>(), ["messages", "validators"]);
}

#[test]
fn missing_lookups_fail() {
  let mut cat = MessageCatalogue::new();
  assert!(matches!(
    cat.domain("validators"),
    Err(Error::DomainNotFound(ref d)) if d == "validators"
  ));
  assert!(matches!(
    cat.get("x", "validators"),
    Err(Error::DomainNotFound(_))
  ));

  cat.add(Message::new("a"));
  assert!(matches!(
    cat.get("x", DEFAULT_DOMAIN),
    Err(Error::MessageNotFound { ref id, .. }) if id == "x"
  ));
  assert!(!cat.has(&Message::new("x")));
  assert!(cat.has(&Message::new("a")));
}

#[test]
fn add_keeps_first_and_set_can_force() {
  let mut cat = MessageCatalogue::new();
  cat.add(Message::new("a").described("one"));
  cat.add(Message::new("a").described("two"));
  assert_eq!(cat.get("a", DEFAULT_DOMAIN).unwrap().description(), Some("one"));

  cat.set(Message::new("a").described("three"), false);
  assert_eq!(cat.get("a", DEFAULT_DOMAIN).unwrap().description(), Some("one"));

  cat.set(Message::new("a").described("four"), true);
  assert_eq!(cat.get("a", DEFAULT_DOMAIN).unwrap().description(), Some("four"));
}

// ─── Merging ─────────────────────────────────────────────────────────────────

#[test]
fn merge_folds_partial_scans_serially() {
  let mut target = MessageCatalogue::new();
  for (file, line) in [("a.rs", 1), ("b.rs", 7), ("a.rs", 1)] {
    let mut partial = MessageCatalogue::new();
    partial.add(Message::new("title").found_at(src(file, line)));
    partial.add(Message::with_domain(format!("{file}.only"), "files"));
    target.merge(partial).unwrap();
  }

  let title = target.get("title", DEFAULT_DOMAIN).unwrap();
  assert_eq!(title.sources(), &[src("a.rs", 1), src("b.rs", 7)]);
  assert_eq!(target.domain("files").unwrap().len(), 2);
}

#[test]
fn merge_existing_backfills_from_persisted_catalogue() {
  let mut scanned = MessageCatalogue::new();
  scanned.add(Message::new("greeting").described("Hello"));
  scanned.add(Message::new("farewell").described("Bye"));

  let mut existing = MessageCatalogue::with_locale("fr");
  existing.add(
    Message::new("greeting")
      .described("Hello")
      .translated("Bonjour")
      .marked_new(false),
  );
  existing.add(Message::new("unused").translated("Inutile").marked_new(false));

  scanned.merge_existing(&existing).unwrap();

  let greeting = scanned.get("greeting", DEFAULT_DOMAIN).unwrap();
  assert_eq!(greeting.translated_text(), Some("Bonjour"));
  assert_eq!(greeting.description(), Some("Hello"));
  assert!(!greeting.is_new());

  assert!(scanned.get("farewell", DEFAULT_DOMAIN).unwrap().is_new());
  assert!(!scanned.contains("unused", DEFAULT_DOMAIN));
}

#[test]
fn merge_scanned_protects_reviewed_units() {
  let mut existing = MessageCatalogue::with_locale("de");
  let mut reviewed = Message::xliff("save", DEFAULT_DOMAIN)
    .described("Save")
    .translated("Speichern")
    .found_at(src("old.twig", 1));
  reviewed
    .set_state(Some(WorkflowState::SignedOff))
    .add_note(Note::new("approved by legal", Some("legal".into())));
  existing.add(reviewed);

  let mut scanned = MessageCatalogue::new();
  scanned.add(
    Message::new("save")
      .described("Save changes")
      .found_at(src("form.twig", 12)),
  );
  scanned.add(Message::with_domain("new_button", "admin"));

  existing.merge_scanned(scanned).unwrap();

  let save = existing.get("save", DEFAULT_DOMAIN).unwrap();
  assert_eq!(save.description(), Some("Save"));
  assert_eq!(save.translated_text(), Some("Speichern"));
  assert_eq!(save.state(), Some(WorkflowState::SignedOff));
  assert_eq!(save.notes().len(), 1);
  assert_eq!(save.sources(), &[src("form.twig", 12)]);
  assert!(existing.contains("new_button", "admin"));
  assert_eq!(existing.locale(), Some("de"));
}

#[test]
fn messages_iterate_in_domain_then_insertion_order() {
  let mut cat = MessageCatalogue::new();
  cat.add(Message::new("b"));
  cat.add(Message::with_domain("z", "validators"));
  cat.add(Message::new("a"));

  let ids: Vec<_> = cat.messages().map(Message::id).collect();
  assert_eq!(ids, ["b", "a", "z"]);
}
