//! XLIFF 1.2 codec for Glossa.
//!
//! Converts between XLIFF documents and [`glossa_core`] catalogues. One file
//! holds one domain of one locale. Workflow metadata (`approved`,
//! `target/@state`, `<note>`) survives a load/dump cycle; source locations
//! are stored as `<glossa:reference-file>` extension elements.
//!
//! # Quick start
//!
//! ```no_run
//! use glossa_xliff::{DumpOptions, dump, load};
//!
//! let xml = std::fs::read_to_string("messages.fr.xlf").unwrap();
//! let catalogue = load(&xml, "messages").unwrap();
//! let out = dump(&catalogue, "messages", &DumpOptions::default()).unwrap();
//! ```

mod dump;
pub mod error;
mod load;

pub use dump::{DumpOptions, dump, unit_id};
pub use error::{Error, Result};
pub use load::load;

pub const NS_XLIFF: &str = "urn:oasis:names:tc:xliff:document:1.2";
pub const NS_GLOSSA: &str = "urn:glossa:xliff-extensions";
