//! The positionable shape entity within a slide.

use crate::transform::{compose_placement, Placement};
use kurbo::{Point, Rect, Size, Vec2};

/// Stable shape identifier, unique within its slide.
///
/// Identifiers are authored in the slide markup and are required to stay
/// stable across sessions; persisted offsets are keyed by them.
pub type ShapeId = String;

/// One positionable visual group within a slide.
///
/// Base position, size, rotation, the structural `candidate` marker and the
/// embedded image references are fixed for the session. Only the derived
/// `draggable` flag (set once by the classifier) and the applied `offset`
/// change after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Stable identifier from the markup (`data-sid`).
    pub id: ShapeId,
    /// Base position in the slide's local coordinate space.
    pub base: Point,
    /// Bounding width.
    pub width: f64,
    /// Bounding height.
    pub height: f64,
    /// Fixed rotation in degrees, about the shape's own center.
    pub rotation: f64,
    /// Structural marker: the markup flagged this shape as an interactivity
    /// candidate. Immutable input to the classifier.
    pub candidate: bool,
    /// Derived eligibility: candidate whose content matches the allow-list.
    pub draggable: bool,
    /// Resource identifiers of images embedded in the shape's content.
    pub image_refs: Vec<String>,
    /// Currently applied drag offset.
    pub offset: Vec2,
}

impl Shape {
    /// Create a shape at its base position with no rotation.
    pub fn new(id: impl Into<ShapeId>, base: Point, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            base,
            width,
            height,
            rotation: 0.0,
            candidate: false,
            draggable: false,
            image_refs: Vec::new(),
            offset: Vec2::ZERO,
        }
    }

    /// Bounding size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The shape's current placement: translation by `base + offset`, then
    /// the fixed rotation about the shape's center.
    pub fn placement(&self) -> Placement {
        compose_placement(self.base, self.offset, self.size(), self.rotation)
    }

    /// Geometric center in slide-local space. Invariant under the fixed
    /// rotation, since that rotation pivots on the center itself.
    pub fn center(&self) -> Point {
        (self.base.to_vec2() + self.offset + Vec2::new(self.width / 2.0, self.height / 2.0))
            .to_point()
    }

    /// Axis-aligned bounds of the placed (translated and rotated) shape.
    pub fn bounds(&self) -> Rect {
        self.placement()
            .to_affine()
            .transform_rect_bbox(Rect::from_origin_size(Point::ZERO, self.size()))
    }

    /// Whether a slide-local point falls inside the placed shape.
    pub fn hit_test(&self, point: Point) -> bool {
        // Map the point into the shape's local frame; the placement affine
        // is always invertible (translation and rotation only).
        let local = self.placement().to_affine().inverse() * point;
        local.x >= 0.0 && local.x <= self.width && local.y >= 0.0 && local.y <= self.height
    }
}
