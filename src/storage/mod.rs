//! Persistent offset storage.
//!
//! Offsets are kept as one nested mapping `slide index -> shape id ->
//! {dx, dy}` and written as a single JSON snapshot on every mutation, so the
//! persisted state is never more than one pointer sample behind the screen.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryBackend;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileBackend;

use crate::shape::ShapeId;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// File name used by file backends; the single fixed storage key.
pub const STATE_FILE_NAME: &str = "placements.json";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A durable key-value medium holding the serialized offset state under one
/// fixed key.
///
/// Backends are synchronous on purpose: every mutation of the store is
/// flushed before the originating input event returns, so the persisted
/// snapshot stays crash-consistent with the last completed drag move.
pub trait Backend: Send + Sync {
    /// Read the stored payload, `None` if nothing was ever written.
    fn read(&self) -> StorageResult<Option<String>>;

    /// Replace the stored payload with a full snapshot.
    fn write(&self, payload: &str) -> StorageResult<()>;
}

/// A per-shape drag delta. Absent entries are implicitly zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.dx, self.dy)
    }
}

impl From<Vec2> for Offset {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Offsets for one slide, keyed by shape id.
pub type SlideOffsets = BTreeMap<ShapeId, Offset>;

type OffsetState = BTreeMap<usize, SlideOffsets>;

/// The persisted mapping from (slide, shape) to drag offset.
///
/// Loaded once at startup; an absent, unreadable or malformed payload
/// yields an empty store and is never surfaced to the caller. Every
/// mutation synchronously flushes the entire state; a failed flush is
/// logged and the in-memory state stays authoritative.
pub struct OffsetStore {
    state: OffsetState,
    backend: Box<dyn Backend>,
}

impl OffsetStore {
    /// Open the store, loading whatever state the backend holds.
    pub fn open(backend: Box<dyn Backend>) -> Self {
        let state = match backend.read() {
            Ok(Some(payload)) => match serde_json::from_str(&payload) {
                Ok(state) => state,
                Err(err) => {
                    log::warn!("malformed persisted offsets, starting empty: {err}");
                    OffsetState::new()
                }
            },
            Ok(None) => OffsetState::new(),
            Err(err) => {
                log::warn!("could not read persisted offsets, starting empty: {err}");
                OffsetState::new()
            }
        };
        Self { state, backend }
    }

    /// Ephemeral store for tests and hosts without durable storage.
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryBackend::new()))
    }

    /// Stored offset for a (slide, shape) pair, if any.
    pub fn get(&self, slide: usize, shape: &str) -> Option<Offset> {
        self.state.get(&slide).and_then(|m| m.get(shape)).copied()
    }

    /// Stored offset, or zero for absent entries.
    pub fn offset_or_default(&self, slide: usize, shape: &str) -> Offset {
        self.get(slide, shape).unwrap_or(Offset::ZERO)
    }

    /// All offsets stored for a slide.
    pub fn slide_offsets(&self, slide: usize) -> Option<&SlideOffsets> {
        self.state.get(&slide)
    }

    /// Whether nothing is stored at all.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Upsert the offset for a (slide, shape) pair and persist immediately.
    pub fn set(&mut self, slide: usize, shape: &str, dx: f64, dy: f64) {
        self.state
            .entry(slide)
            .or_default()
            .insert(shape.to_string(), Offset::new(dx, dy));
        self.flush();
    }

    /// Remove every entry for a slide and persist. Entries under other
    /// slides are untouched.
    pub fn reset_slide(&mut self, slide: usize) {
        self.state.remove(&slide);
        self.flush();
    }

    fn flush(&self) {
        match serde_json::to_string(&self.state) {
            Ok(payload) => {
                if let Err(err) = self.backend.write(&payload) {
                    log::warn!("failed to persist offsets: {err}");
                }
            }
            Err(err) => log::warn!("failed to serialize offsets: {err}"),
        }
    }
}
