//! The pointer interaction state machine.
//!
//! Two states, Idle and Dragging, with a single active pointer. While a
//! drag is running this component is the only writer of the offset store:
//! every move recomputes the shape's placement and writes the new offset
//! through synchronously, so an unexpected termination loses at most the
//! in-flight pointer sample.

use crate::deck::Deck;
use crate::input::PointerEvent;
use crate::shape::ShapeId;
use crate::storage::OffsetStore;
use crate::transform::Viewport;
use kurbo::{Point, Vec2};

/// The state of an in-progress drag: which shape on which slide, plus the
/// pointer position and offset captured at pick-up. Exists only between
/// pointer-down and pointer-up/cancel.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Slide the dragged shape lives on.
    pub slide: usize,
    /// The dragged shape.
    pub shape: ShapeId,
    /// Pointer position in slide-local space at drag start.
    pub start_local: Point,
    /// The shape's offset at drag start.
    pub start_offset: Vec2,
}

/// Single-instance drag controller holding the optional session.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    session: Option<DragSession>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// The current session, if any.
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Drag-visual marker: whether this particular shape is being dragged.
    pub fn is_dragging_shape(&self, id: &str) -> bool {
        self.session.as_ref().is_some_and(|s| s.shape == id)
    }

    /// Route a pointer event through the state machine.
    pub fn handle_pointer_event(
        &mut self,
        event: PointerEvent,
        deck: &mut Deck,
        offsets: &mut OffsetStore,
        viewport: &Viewport,
    ) {
        match event {
            PointerEvent::Down { position } => {
                self.pointer_down(deck, offsets, viewport, position);
            }
            PointerEvent::Move { position } => {
                self.pointer_move(deck, offsets, viewport, position);
            }
            // Cancel is handled identically to release: the last persisted
            // offset stands, nothing is rolled back.
            PointerEvent::Up { .. } | PointerEvent::Cancel => self.pointer_up(),
        }
    }

    /// Idle → Dragging, if the pointer lands on a draggable shape of the
    /// active slide. Returns whether a session started.
    ///
    /// On pick-up the shape is raised to the top of its slide's paint
    /// order, and the stored offset (zero if absent) becomes the session
    /// baseline. Once a session exists, all further pointer events route
    /// to it regardless of where the pointer is, matching the pointer
    /// capture semantics the host is expected to provide.
    pub fn pointer_down(
        &mut self,
        deck: &mut Deck,
        offsets: &OffsetStore,
        viewport: &Viewport,
        position: Point,
    ) -> bool {
        if self.session.is_some() {
            // Single active pointer; a second down is ignored.
            return false;
        }

        let local = viewport.screen_to_local(position);
        let slide = deck.active_slide_mut();
        // The topmost hit decides: a non-draggable shape covering a
        // draggable one swallows the press.
        let id = match slide.shape_at_point(local) {
            Some(shape) if shape.draggable => shape.id.clone(),
            _ => return false,
        };

        slide.bring_to_front(&id);
        let start_offset = offsets.offset_or_default(slide.index, &id).to_vec2();
        if let Some(shape) = slide.shape_mut(&id) {
            shape.offset = start_offset;
        }

        log::debug!("drag start: slide {} shape {id}", slide.index);
        self.session = Some(DragSession {
            slide: slide.index,
            shape: id,
            start_local: local,
            start_offset,
        });
        true
    }

    /// Dragging → Dragging: recompute the offset from the baseline, apply
    /// the new placement, and persist, all within this call.
    pub fn pointer_move(
        &mut self,
        deck: &mut Deck,
        offsets: &mut OffsetStore,
        viewport: &Viewport,
        position: Point,
    ) {
        let Some(session) = &self.session else {
            return;
        };

        let local = viewport.screen_to_local(position);
        let offset = session.start_offset + (local - session.start_local);

        if let Some(shape) = deck
            .slide_mut(session.slide)
            .and_then(|slide| slide.shape_mut(&session.shape))
        {
            shape.offset = offset;
        }
        offsets.set(session.slide, &session.shape, offset.x, offset.y);
    }

    /// Dragging → Idle. The last persisted offset stands.
    pub fn pointer_up(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!("drag end: slide {} shape {}", session.slide, session.shape);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;
    use crate::slide::Slide;
    use crate::storage::Offset;

    fn shape(id: &str, draggable: bool) -> Shape {
        let mut shape = Shape::new(id, Point::new(100.0, 50.0), 40.0, 40.0);
        shape.candidate = draggable;
        shape.draggable = draggable;
        shape
    }

    fn deck_with(shapes: Vec<Shape>) -> Deck {
        let mut slide = Slide::new(0);
        for s in shapes {
            slide.add_shape(s);
        }
        Deck::new(vec![slide])
    }

    #[test]
    fn test_drag_stores_offset_and_moves_shape() {
        // Scenario: base (100, 50), size 40x40, pointer picks the shape up
        // at (110, 60) and moves by (+20, -5).
        let mut deck = deck_with(vec![shape("sid7", true)]);
        let mut offsets = OffsetStore::in_memory();
        let viewport = Viewport::identity();
        let mut interaction = Interaction::new();

        let started =
            interaction.pointer_down(&mut deck, &offsets, &viewport, Point::new(110.0, 60.0));
        assert!(started);
        assert!(interaction.is_dragging_shape("sid7"));

        interaction.pointer_move(&mut deck, &mut offsets, &viewport, Point::new(130.0, 55.0));

        assert_eq!(offsets.get(1, "sid7"), Some(Offset::new(20.0, -5.0)));
        let placement = deck.active_slide().shape("sid7").unwrap().placement();
        assert_eq!(placement.translation, Vec2::new(120.0, 45.0));

        interaction.pointer_up();
        assert!(!interaction.is_dragging());
        // The last persisted offset stands after release.
        assert_eq!(offsets.get(1, "sid7"), Some(Offset::new(20.0, -5.0)));
    }

    #[test]
    fn test_down_on_non_draggable_shape_is_ignored() {
        let mut deck = deck_with(vec![shape("fixed", false)]);
        let offsets = OffsetStore::in_memory();
        let viewport = Viewport::identity();
        let mut interaction = Interaction::new();

        let started =
            interaction.pointer_down(&mut deck, &offsets, &viewport, Point::new(110.0, 60.0));
        assert!(!started);
        assert!(!interaction.is_dragging());
    }

    #[test]
    fn test_down_on_empty_space_is_ignored() {
        let mut deck = deck_with(vec![shape("sid7", true)]);
        let offsets = OffsetStore::in_memory();
        let viewport = Viewport::identity();
        let mut interaction = Interaction::new();

        assert!(!interaction.pointer_down(&mut deck, &offsets, &viewport, Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_move_without_session_is_ignored() {
        let mut deck = deck_with(vec![shape("sid7", true)]);
        let mut offsets = OffsetStore::in_memory();
        let viewport = Viewport::identity();
        let mut interaction = Interaction::new();

        interaction.pointer_move(&mut deck, &mut offsets, &viewport, Point::new(130.0, 55.0));
        assert!(offsets.is_empty());
    }

    #[test]
    fn test_second_pointer_down_is_ignored() {
        let mut deck = deck_with(vec![shape("a", true), shape("b", true)]);
        let offsets = OffsetStore::in_memory();
        let viewport = Viewport::identity();
        let mut interaction = Interaction::new();

        assert!(interaction.pointer_down(&mut deck, &offsets, &viewport, Point::new(110.0, 60.0)));
        let first = interaction.session().cloned();
        assert!(!interaction.pointer_down(&mut deck, &offsets, &viewport, Point::new(110.0, 60.0)));
        assert_eq!(interaction.session().cloned(), first);
    }

    #[test]
    fn test_cancel_behaves_like_release() {
        let mut deck = deck_with(vec![shape("sid7", true)]);
        let mut offsets = OffsetStore::in_memory();
        let viewport = Viewport::identity();
        let mut interaction = Interaction::new();

        interaction.handle_pointer_event(
            PointerEvent::Down {
                position: Point::new(110.0, 60.0),
            },
            &mut deck,
            &mut offsets,
            &viewport,
        );
        interaction.handle_pointer_event(
            PointerEvent::Move {
                position: Point::new(130.0, 55.0),
            },
            &mut deck,
            &mut offsets,
            &viewport,
        );
        interaction.handle_pointer_event(
            PointerEvent::Cancel,
            &mut deck,
            &mut offsets,
            &viewport,
        );

        assert!(!interaction.is_dragging());
        // No rollback on cancel: the moved-to offset is kept.
        assert_eq!(offsets.get(1, "sid7"), Some(Offset::new(20.0, -5.0)));
    }

    #[test]
    fn test_pickup_raises_shape_to_front() {
        let mut deck = deck_with(vec![shape("under", true), shape("over", true)]);
        let offsets = OffsetStore::in_memory();
        let viewport = Viewport::identity();
        let mut interaction = Interaction::new();

        // Both shapes overlap fully; the press lands on "over".
        assert!(interaction.pointer_down(&mut deck, &offsets, &viewport, Point::new(110.0, 60.0)));
        assert!(interaction.is_dragging_shape("over"));

        interaction.pointer_up();
        // Dragging "over" again after raising "under" manually.
        deck.active_slide_mut().bring_to_front("under");
        assert!(interaction.pointer_down(&mut deck, &offsets, &viewport, Point::new(110.0, 60.0)));
        assert!(interaction.is_dragging_shape("under"));
    }

    #[test]
    fn test_drag_resumes_from_stored_offset() {
        let mut deck = deck_with(vec![shape("sid7", true)]);
        let mut offsets = OffsetStore::in_memory();
        offsets.set(1, "sid7", 10.0, 10.0);
        deck.active_slide_mut().apply_offsets(&offsets);
        let viewport = Viewport::identity();
        let mut interaction = Interaction::new();

        // The shape now sits at (110, 60); grab it there and move +5 on x.
        assert!(interaction.pointer_down(&mut deck, &offsets, &viewport, Point::new(120.0, 70.0)));
        interaction.pointer_move(&mut deck, &mut offsets, &viewport, Point::new(125.0, 70.0));
        assert_eq!(offsets.get(1, "sid7"), Some(Offset::new(15.0, 10.0)));
    }

    #[test]
    fn test_unresolved_frame_does_not_corrupt_baseline() {
        let mut deck = deck_with(vec![shape("sid7", true)]);
        let mut offsets = OffsetStore::in_memory();
        let viewport = Viewport::identity();
        let mut interaction = Interaction::new();

        assert!(interaction.pointer_down(&mut deck, &offsets, &viewport, Point::new(110.0, 60.0)));

        // The container loses layout mid-drag. The lost frame maps to the
        // origin, but every frame recomputes from the pick-up baseline, so
        // the next resolved sample lands exactly where it would have anyway.
        let lost = Viewport::unresolved();
        interaction.pointer_move(&mut deck, &mut offsets, &viewport, Point::new(111.0, 60.0));
        let before = offsets.get(1, "sid7");
        interaction.pointer_move(&mut deck, &mut offsets, &lost, Point::new(500.0, 500.0));
        interaction.pointer_move(&mut deck, &mut offsets, &viewport, Point::new(111.0, 60.0));
        assert_eq!(offsets.get(1, "sid7"), before);
    }
}
