//! Interactive overlay engine for illustrated slide decks.
//!
//! A deck is an ordered set of slides, each a static illustration with a
//! layer of shapes on top. A subset of those shapes can be dragged with a
//! pointer; their displacement from the authored position is persisted per
//! slide and shape and survives restarts. The crate is headless: it owns
//! deck state, hit-testing, the drag state machine, and persistence, while
//! a host layer supplies pointer/keyboard events and renders placements.
//!
//! The main pieces:
//!
//! - [`Deck`]: slides, the active-slide index, and clamped navigation
//! - [`markup`]: slide fragment ingestion into [`Shape`]s
//! - [`classify`]: deriving drag eligibility from an [`AllowList`]
//! - [`Interaction`]: the single-pointer drag state machine
//! - [`OffsetStore`]: persisted per-(slide, shape) drag offsets
//! - [`Viewport`] / [`Placement`]: device-to-slide mapping and the
//!   composed transform a renderer applies to each shape

pub mod classify;
pub mod deck;
pub mod input;
pub mod interaction;
pub mod markup;
pub mod shape;
pub mod slide;
pub mod storage;
pub mod transform;

pub use classify::{classify, AllowList};
pub use deck::{Deck, NavControls};
pub use input::{NavKey, PointerEvent};
pub use interaction::{DragSession, Interaction};
pub use markup::MarkupError;
pub use shape::{Shape, ShapeId};
pub use slide::Slide;
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileBackend;
pub use storage::{Backend, MemoryBackend, Offset, OffsetStore};
pub use transform::{compose_placement, Placement, Viewport};
