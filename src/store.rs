//! Flat-file persistence for vocabulary, settings, and documents.
//!
//! Every JSON document is read and written wholesale. The pipeline only sees
//! the narrow traits at the bottom of this module, never file paths.

mod documents;
mod json;
mod settings;
mod vocabulary;

pub use documents::DocumentFolders;
pub use json::{read_json, write_json};
pub use settings::SettingsStore;
pub use vocabulary::VocabularyStore;

use crate::error::StorageError;
use crate::models::Document;

/// Supplies documents that have not produced an output yet.
pub trait DocumentSource {
    /// Names of pending documents, sorted.
    fn pending(&self) -> Result<Vec<String>, StorageError>;

    /// Reads one document fully into memory.
    fn read(&self, name: &str) -> Result<Document, StorageError>;
}

/// Persists rendered output artifacts keyed by document name.
pub trait OutputSink {
    /// Writes `text` under `name`, replacing any existing artifact.
    fn write(&self, name: &str, text: &str) -> Result<(), StorageError>;
}
