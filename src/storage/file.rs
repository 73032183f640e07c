//! File-based backend implementation for native platforms.

use super::{Backend, StorageError, StorageResult, STATE_FILE_NAME};
use std::fs;
use std::path::{Path, PathBuf};

/// File-based backend storing the offset snapshot as one JSON file.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Create a backend writing to the given file, creating parent
    /// directories if needed.
    pub fn new(path: PathBuf) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::Io(format!("failed to create storage directory: {e}"))
                })?;
            }
        }
        Ok(Self { path })
    }

    /// Create a backend in the default location.
    ///
    /// On Unix: `~/.local/share/slidekit/placements.json`
    /// On Windows: `%LOCALAPPDATA%\slidekit\placements.json`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("could not determine home directory".to_string()))?;
        Self::new(base.join("slidekit").join(STATE_FILE_NAME))
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Backend for FileBackend {
    fn read(&self) -> StorageResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&self.path)
            .map(Some)
            .map_err(|e| StorageError::Io(format!("failed to read {}: {e}", self.path.display())))
    }

    fn write(&self, payload: &str) -> StorageResult<()> {
        fs::write(&self.path, payload)
            .map_err(|e| StorageError::Io(format!("failed to write {}: {e}", self.path.display())))
    }
}
