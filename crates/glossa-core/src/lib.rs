//! Message model and merge engine for Glossa.
//!
//! Reconciles freshly extracted messages with those of existing translation
//! files. Pure and synchronous; reading and writing files is left to
//! `glossa-xliff` and the CLI.

pub mod catalogue;
pub mod collection;
pub mod error;
pub mod format;
pub mod message;
pub mod source;
pub mod update;

pub use catalogue::MessageCatalogue;
pub use collection::MessageCollection;
pub use error::{Error, Result};
pub use format::{MessageFormat, Note, WorkflowState, XliffMeta};
pub use message::{DEFAULT_DOMAIN, Message};
pub use source::SourceReference;
pub use update::{ChangeSet, MessageKey, Update, UpdateOptions, reconcile};

#[cfg(test)]
mod tests;
