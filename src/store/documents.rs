use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{DocumentSource, OutputSink};
use crate::error::StorageError;
use crate::models::Document;

/// Extension an input file must have to be accepted.
const ACCEPTED_EXTENSION: &str = ".txt";

/// Paired `inputs/` and `outputs/` directories.
///
/// A document is pending while `inputs/` has it and `outputs/` has no file of
/// the same name. Outputs are never reprocessed, even when the vocabulary or
/// prompt changes later.
#[derive(Debug, Clone)]
pub struct DocumentFolders {
    inputs: PathBuf,
    outputs: PathBuf,
}

impl DocumentFolders {
    pub fn new(inputs: impl Into<PathBuf>, outputs: impl Into<PathBuf>) -> Self {
        Self {
            inputs: inputs.into(),
            outputs: outputs.into(),
        }
    }

    pub fn inputs_dir(&self) -> &Path {
        &self.inputs
    }

    pub fn outputs_dir(&self) -> &Path {
        &self.outputs
    }

    /// Creates both directories if missing.
    pub fn ensure_exists(&self) -> Result<(), StorageError> {
        for dir in [&self.inputs, &self.outputs] {
            std::fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;
        }
        Ok(())
    }

    /// Copies a `.txt` file into `inputs/` under its file name.
    ///
    /// Returns the stored name, or `None` when the file was skipped for not
    /// being a `.txt` file. An existing input of the same name is overwritten.
    pub fn add_file(&self, source: &Path) -> Result<Option<String>, StorageError> {
        let Some(name) = source.file_name().and_then(|n| n.to_str()) else {
            return Err(StorageError::InvalidDocumentName(
                source.display().to_string(),
            ));
        };
        if !name.ends_with(ACCEPTED_EXTENSION) {
            warn!(file = %source.display(), "skipping non-.txt file");
            return Ok(None);
        }

        let target = self.inputs.join(name);
        if target.exists() && same_file(source, &target)? {
            debug!(name, "input already in place");
            return Ok(Some(name.to_string()));
        }
        std::fs::copy(source, &target).map_err(|e| StorageError::io(source, e))?;
        debug!(name, "added input document");
        Ok(Some(name.to_string()))
    }

    /// Names of all output artifacts, sorted.
    pub fn list_outputs(&self) -> Result<Vec<String>, StorageError> {
        list_file_names(&self.outputs)
    }

    /// Reads an output artifact.
    pub fn read_output(&self, name: &str) -> Result<String, StorageError> {
        let path = self.outputs.join(validate_name(name)?);
        if !path.is_file() {
            return Err(StorageError::NotFound(name.to_string()));
        }
        std::fs::read_to_string(&path).map_err(|e| StorageError::io(&path, e))
    }

    /// Deletes an output artifact, which makes its input pending again.
    ///
    /// Returns whether an artifact was removed.
    pub fn delete_output(&self, name: &str) -> Result<bool, StorageError> {
        let path = self.outputs.join(validate_name(name)?);
        if !path.is_file() {
            return Ok(false);
        }
        std::fs::remove_file(&path).map_err(|e| StorageError::io(&path, e))?;
        debug!(name, "deleted output");
        Ok(true)
    }
}

impl DocumentSource for DocumentFolders {
    fn pending(&self) -> Result<Vec<String>, StorageError> {
        let done: HashSet<String> = list_file_names(&self.outputs)?.into_iter().collect();
        Ok(list_file_names(&self.inputs)?
            .into_iter()
            .filter(|name| !done.contains(name))
            .collect())
    }

    fn read(&self, name: &str) -> Result<Document, StorageError> {
        let path = self.inputs.join(validate_name(name)?);
        let text = std::fs::read_to_string(&path).map_err(|e| StorageError::io(&path, e))?;
        Ok(Document::new(name, text))
    }
}

impl OutputSink for DocumentFolders {
    fn write(&self, name: &str, text: &str) -> Result<(), StorageError> {
        let path = self.outputs.join(validate_name(name)?);
        std::fs::write(&path, text).map_err(|e| StorageError::io(&path, e))
    }
}

/// Copying a file onto itself truncates it before the read.
fn same_file(a: &Path, b: &Path) -> Result<bool, StorageError> {
    let a = std::fs::canonicalize(a).map_err(|e| StorageError::io(a, e))?;
    let b = std::fs::canonicalize(b).map_err(|e| StorageError::io(b, e))?;
    Ok(a == b)
}

/// Accepts only plain file names so a document name can never escape its folder.
fn validate_name(name: &str) -> Result<&str, StorageError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if invalid {
        return Err(StorageError::InvalidDocumentName(name.to_string()));
    }
    Ok(name)
}

/// Regular files directly in `dir`, by name, sorted. Non-UTF-8 names are skipped.
fn list_file_names(dir: &Path) -> Result<Vec<String>, StorageError> {
    let entries = std::fs::read_dir(dir).map_err(|e| StorageError::io(dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StorageError::io(dir, e))?;
        let is_file = entry
            .file_type()
            .map_err(|e| StorageError::io(entry.path(), e))?
            .is_file();
        if !is_file {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}
