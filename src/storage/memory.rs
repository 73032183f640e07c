//! In-memory backend implementation.

use super::{Backend, StorageError, StorageResult};
use std::sync::RwLock;

/// In-memory backend for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryBackend {
    payload: RwLock<Option<String>>,
}

impl MemoryBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently stored payload, for inspection in tests.
    pub fn contents(&self) -> Option<String> {
        self.payload.read().ok().and_then(|p| p.clone())
    }
}

impl Backend for MemoryBackend {
    fn read(&self) -> StorageResult<Option<String>> {
        let payload = self
            .payload
            .read()
            .map_err(|e| StorageError::Other(format!("lock error: {e}")))?;
        Ok(payload.clone())
    }

    fn write(&self, payload: &str) -> StorageResult<()> {
        let mut slot = self
            .payload
            .write()
            .map_err(|e| StorageError::Other(format!("lock error: {e}")))?;
        *slot = Some(payload.to_string());
        Ok(())
    }
}
