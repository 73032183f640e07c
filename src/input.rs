//! Input event types for the single-pointer interaction stream.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer event, positions in device coordinates.
///
/// The engine handles one pointer stream; cancel is treated exactly like
/// release, with no rollback of in-progress movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
    Cancel,
}

/// Keyboard navigation shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavKey {
    /// Left arrow: previous slide.
    Left,
    /// Right arrow: next slide.
    Right,
}
