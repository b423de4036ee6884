//! On-disk workspace layout.
//!
//! ```text
//! <root>/
//!   inputs/         uploaded .txt documents
//!   outputs/        tagged artifacts, same names as inputs
//!   tags.json       vocabulary
//!   settings.json   model connection and prompt template
//! ```

use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::models::{Settings, Vocabulary};
use crate::store::{DocumentFolders, SettingsStore, VocabularyStore};

pub const INPUTS_DIR: &str = "inputs";
pub const OUTPUTS_DIR: &str = "outputs";
pub const TAGS_FILE: &str = "tags.json";
pub const SETTINGS_FILE: &str = "settings.json";

/// A workspace root and the stores living under it.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    documents: DocumentFolders,
    vocabulary: VocabularyStore,
    settings: SettingsStore,
}

impl Workspace {
    /// Opens the workspace at `root`, creating the directories and default
    /// JSON files that do not exist yet.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| StorageError::io(&root, e))?;

        let workspace = Self {
            documents: DocumentFolders::new(root.join(INPUTS_DIR), root.join(OUTPUTS_DIR)),
            vocabulary: VocabularyStore::new(root.join(TAGS_FILE)),
            settings: SettingsStore::new(root.join(SETTINGS_FILE)),
            root,
        };
        workspace.documents.ensure_exists()?;
        workspace.vocabulary.ensure_exists()?;
        workspace.settings.ensure_exists()?;
        Ok(workspace)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn documents(&self) -> &DocumentFolders {
        &self.documents
    }

    pub fn vocabulary(&self) -> &VocabularyStore {
        &self.vocabulary
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Loads settings and vocabulary fresh, as a batch needs them at start.
    pub fn load_batch_inputs(&self) -> Result<(Settings, Vocabulary), StorageError> {
        Ok((self.settings.load()?, self.vocabulary.load()?))
    }
}
