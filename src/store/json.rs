use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::error::StorageError;

/// Reads and parses a whole JSON document.
///
/// # Errors
///
/// `StorageError::Io` if the file cannot be read, `StorageError::Malformed`
/// if it does not parse as `T`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let content = std::fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
    serde_json::from_str(&content).map_err(|source| StorageError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `value` as pretty JSON, replacing the file atomically.
///
/// The data goes to a temp file in the same directory which is then renamed
/// over `path`. Non-ASCII text is written literally.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let mut content = serde_json::to_string_pretty(value).map_err(StorageError::Serialize)?;
    content.push('\n');

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StorageError::io(dir, e))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| StorageError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| StorageError::io(path, e.error))?;
    Ok(())
}
