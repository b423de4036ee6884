use std::path::{Path, PathBuf};

use tracing::info;

use super::json::{read_json, write_json};
use crate::error::StorageError;
use crate::models::Settings;

/// Settings persisted as a single `settings.json` record.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes default settings if the file does not exist yet.
    pub fn ensure_exists(&self) -> Result<(), StorageError> {
        if !self.path.exists() {
            self.save(&Settings::default())?;
            info!(path = %self.path.display(), "created default settings");
        }
        Ok(())
    }

    /// Loads the settings record. Missing fields take their defaults.
    pub fn load(&self) -> Result<Settings, StorageError> {
        read_json(&self.path)
    }

    /// Writes the full settings record.
    pub fn save(&self, settings: &Settings) -> Result<(), StorageError> {
        write_json(&self.path, settings)
    }
}
