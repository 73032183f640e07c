//! One slide: its shape tree, paint order and activity flag.

use crate::shape::{Shape, ShapeId};
use crate::storage::OffsetStore;
use kurbo::Point;
use std::collections::HashMap;

/// One page of content. Exactly one slide in a deck is active at a time.
#[derive(Debug, Clone)]
pub struct Slide {
    /// 1-based index, stable for the session.
    pub index: usize,
    /// Whether this slide is currently visible.
    pub active: bool,
    /// All shapes on the slide, keyed by id.
    shapes: HashMap<ShapeId, Shape>,
    /// Paint order (back to front).
    z_order: Vec<ShapeId>,
}

impl Slide {
    /// Create an empty slide with the given 1-based index.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            active: false,
            shapes: HashMap::new(),
            z_order: Vec::new(),
        }
    }

    /// Add a shape on top of the paint order. A shape with the same id
    /// replaces the previous one.
    pub fn add_shape(&mut self, shape: Shape) {
        let id = shape.id.clone();
        if self.shapes.insert(id.clone(), shape).is_none() {
            self.z_order.push(id);
        }
    }

    /// Number of shapes on the slide.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the slide has no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Get a shape by id.
    pub fn shape(&self, id: &str) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// Get a mutable reference to a shape by id.
    pub fn shape_mut(&mut self, id: &str) -> Option<&mut Shape> {
        self.shapes.get_mut(id)
    }

    /// Shapes in paint order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Mutable iteration over all shapes, in no particular order.
    pub fn shapes_mut(&mut self) -> impl Iterator<Item = &mut Shape> {
        self.shapes.values_mut()
    }

    /// Raise a shape to the top of the paint order.
    pub fn bring_to_front(&mut self, id: &str) {
        if let Some(pos) = self.z_order.iter().position(|sid| sid == id) {
            let sid = self.z_order.remove(pos);
            self.z_order.push(sid);
        }
    }

    /// Topmost shape whose placed bounds contain the given slide-local
    /// point, scanning front to back.
    pub fn shape_at_point(&self, point: Point) -> Option<&Shape> {
        self.z_order
            .iter()
            .rev()
            .filter_map(|id| self.shapes.get(id))
            .find(|shape| shape.hit_test(point))
    }

    /// Re-derive every draggable shape's offset from the store. Idempotent;
    /// shapes without a stored entry snap back to their base placement.
    pub fn apply_offsets(&mut self, offsets: &OffsetStore) {
        let index = self.index;
        for shape in self.shapes.values_mut() {
            if shape.draggable {
                shape.offset = offsets.offset_or_default(index, &shape.id).to_vec2();
            }
        }
    }
}
