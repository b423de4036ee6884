use std::path::{Path, PathBuf};

use tracing::debug;

use super::json::{read_json, write_json};
use crate::error::StorageError;
use crate::models::{Tag, Vocabulary};

/// Vocabulary persisted as a `tags.json` mapping of canonical name to tag record.
///
/// Every call loads the file fresh; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct VocabularyStore {
    path: PathBuf,
}

impl VocabularyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes an empty vocabulary if the file does not exist yet.
    pub fn ensure_exists(&self) -> Result<(), StorageError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "creating empty vocabulary");
            self.save(&Vocabulary::new())?;
        }
        Ok(())
    }

    /// Loads the full vocabulary.
    ///
    /// # Errors
    ///
    /// Fails if the file is unreadable or malformed.
    pub fn load(&self) -> Result<Vocabulary, StorageError> {
        read_json(&self.path)
    }

    /// Writes the full vocabulary, replacing the file.
    pub fn save(&self, vocabulary: &Vocabulary) -> Result<(), StorageError> {
        write_json(&self.path, vocabulary)
    }

    /// Inserts or overwrites the tag `name` with `variants`.
    ///
    /// No check is made against variants of other tags.
    ///
    /// # Errors
    ///
    /// `StorageError::EmptyTagName` for an empty or whitespace-only name, or a
    /// storage error from the load/save round trip.
    pub fn upsert(&self, name: &str, variants: Vec<String>) -> Result<Tag, StorageError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::EmptyTagName);
        }

        let mut vocabulary = self.load()?;
        let tag = Tag::with_variants(name, variants);
        vocabulary.upsert(tag.clone());
        self.save(&vocabulary)?;

        debug!(tag = name, variants = tag.variants().len(), "upserted tag");
        Ok(tag)
    }

    /// Removes the tag `name`, trimmed the same way `upsert` trims it.
    /// Returns whether it existed.
    pub fn delete(&self, name: &str) -> Result<bool, StorageError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::EmptyTagName);
        }

        let mut vocabulary = self.load()?;
        if vocabulary.remove(name).is_none() {
            return Ok(false);
        }
        self.save(&vocabulary)?;

        debug!(tag = name, "deleted tag");
        Ok(true)
    }
}
