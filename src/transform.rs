//! Coordinate transforms between device space and slide-local space, and
//! placement composition for positioned shapes.

use kurbo::{Affine, Point, Size, Vec2};

/// The screen transform of a slide container.
///
/// Maps slide-local coordinates to device coordinates. A viewport may be
/// unresolved when the container is not currently laid out; in that case
/// pointer mapping falls back to the origin instead of failing, which at
/// worst produces a single no-op drag frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    screen_transform: Option<Affine>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::identity()
    }
}

impl Viewport {
    /// Viewport whose local space coincides with device space.
    pub fn identity() -> Self {
        Self {
            screen_transform: Some(Affine::IDENTITY),
        }
    }

    /// Viewport with an arbitrary local-to-screen transform.
    pub fn from_screen_transform(transform: Affine) -> Self {
        Self {
            screen_transform: Some(transform),
        }
    }

    /// Viewport for a container panned by `offset` and scaled by `zoom`.
    pub fn from_pan_zoom(offset: Vec2, zoom: f64) -> Self {
        Self::from_screen_transform(Affine::translate(offset) * Affine::scale(zoom))
    }

    /// Viewport for a container that has no resolvable screen transform.
    pub fn unresolved() -> Self {
        Self {
            screen_transform: None,
        }
    }

    /// Whether pointer coordinates can currently be mapped into local space.
    pub fn is_resolved(&self) -> bool {
        self.invertible_transform().is_some()
    }

    fn invertible_transform(&self) -> Option<Affine> {
        self.screen_transform
            .filter(|t| t.determinant().abs() > f64::EPSILON)
    }

    /// Map a device-space pointer coordinate into slide-local space.
    ///
    /// Returns the origin when the viewport is unresolved or its transform
    /// is singular.
    pub fn screen_to_local(&self, screen_point: Point) -> Point {
        match self.invertible_transform() {
            Some(t) => t.inverse() * screen_point,
            None => Point::ZERO,
        }
    }

    /// Map a slide-local coordinate to device space.
    pub fn local_to_screen(&self, local_point: Point) -> Point {
        match self.invertible_transform() {
            Some(t) => t * local_point,
            None => Point::ZERO,
        }
    }
}

/// The composed transform applied to a shape for rendering.
///
/// Translation by the shape's base position plus its current offset,
/// followed by rotation about the shape's own geometric center. The pivot
/// is always `(width / 2, height / 2)` in the shape's local frame, so the
/// apparent rotation center never moves while the shape is dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Slide-local translation (`base + offset`).
    pub translation: Vec2,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Rotation pivot in the shape's local frame.
    pub pivot: Point,
}

impl Placement {
    /// The affine form of this placement for rendering surfaces.
    pub fn to_affine(&self) -> Affine {
        let translate = Affine::translate(self.translation);
        if self.rotation == 0.0 {
            translate
        } else {
            translate * Affine::rotate_about(self.rotation.to_radians(), self.pivot)
        }
    }
}

/// Compose a shape's placement from its fixed base position, mutable
/// offset, size and fixed rotation. Pure; no side effects.
pub fn compose_placement(base: Point, delta: Vec2, size: Size, rotation: f64) -> Placement {
    Placement {
        translation: base.to_vec2() + delta,
        rotation,
        pivot: Point::new(size.width / 2.0, size.height / 2.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_maps_pointer_unchanged() {
        let viewport = Viewport::identity();
        let p = viewport.screen_to_local(Point::new(100.0, 200.0));
        assert!((p.x - 100.0).abs() < f64::EPSILON);
        assert!((p.y - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pan_zoom_mapping() {
        let viewport = Viewport::from_pan_zoom(Vec2::new(50.0, 100.0), 2.0);
        let p = viewport.screen_to_local(Point::new(150.0, 300.0));
        assert!((p.x - 50.0).abs() < 1e-10);
        assert!((p.y - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_roundtrip_mapping() {
        let viewport = Viewport::from_pan_zoom(Vec2::new(-30.0, 12.5), 1.5);
        let original = Point::new(123.0, 456.0);
        let back = viewport.local_to_screen(viewport.screen_to_local(original));
        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_unresolved_viewport_falls_back_to_origin() {
        let viewport = Viewport::unresolved();
        assert!(!viewport.is_resolved());
        assert_eq!(viewport.screen_to_local(Point::new(40.0, 40.0)), Point::ZERO);
    }

    #[test]
    fn test_singular_transform_falls_back_to_origin() {
        let viewport = Viewport::from_screen_transform(Affine::scale(0.0));
        assert!(!viewport.is_resolved());
        assert_eq!(viewport.screen_to_local(Point::new(40.0, 40.0)), Point::ZERO);
    }

    #[test]
    fn test_pivot_is_center_regardless_of_offset() {
        let size = Size::new(40.0, 60.0);
        for delta in [
            Vec2::ZERO,
            Vec2::new(20.0, -5.0),
            Vec2::new(-300.0, 1000.0),
        ] {
            let placement = compose_placement(Point::new(10.0, 10.0), delta, size, 30.0);
            assert_eq!(placement.pivot, Point::new(20.0, 30.0));
        }
    }

    #[test]
    fn test_zero_rotation_is_pure_translation() {
        let placement = compose_placement(
            Point::new(100.0, 50.0),
            Vec2::new(20.0, -5.0),
            Size::new(40.0, 40.0),
            0.0,
        );
        assert_eq!(placement.to_affine(), Affine::translate(Vec2::new(120.0, 45.0)));
    }

    #[test]
    fn test_rotation_preserves_center() {
        // The shape's geometric center must land in the same spot whether
        // or not the fixed rotation is applied.
        let size = Size::new(40.0, 40.0);
        let base = Point::new(100.0, 50.0);
        let delta = Vec2::new(7.0, 13.0);
        let center = Point::new(size.width / 2.0, size.height / 2.0);

        let flat = compose_placement(base, delta, size, 0.0).to_affine() * center;
        let turned = compose_placement(base, delta, size, 137.0).to_affine() * center;
        assert!((flat.x - turned.x).abs() < 1e-10);
        assert!((flat.y - turned.y).abs() < 1e-10);
    }
}
