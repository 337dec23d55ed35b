/// SIMD-accelerated math types re-exported from [`glam`].
///
/// Geometry written into quad buffers uses [`Vec3`] positions and [`Vec2`] UVs;
/// emitters place quads with an [`Affine2`] transform.
///
/// ```
/// use batchmesh_core::math::{Affine2, Vec2};
///
/// let transform = Affine2::from_translation(Vec2::new(10.0, 20.0));
/// assert_eq!(transform.transform_point2(Vec2::ZERO), Vec2::new(10.0, 20.0));
/// ```
///
/// [`glam`]: https://docs.rs/glam
pub mod fast {
    pub use glam::*;
}

pub use fast::*;

static_assertions::assert_eq_size!(glam::Vec2, [f32; 2]);
static_assertions::assert_eq_size!(glam::Vec3, [f32; 3]);

/// An axis-aligned rectangle in `f32` units.
///
/// Used both for local quad extents and for UV sub-regions of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The full `0..1` UV range.
    pub const UNIT: Rect = Rect::new(0.0, 0.0, 1.0, 1.0);

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    /// Corners in quad vertex order: top-left, top-right, bottom-left, bottom-right.
    ///
    /// This order matches the `{0, 1, 2, 2, 1, 3}` index template.
    pub fn corners(&self) -> [Vec2; 4] {
        let min = self.min();
        let max = self.max();
        [
            Vec2::new(min.x, min.y),
            Vec2::new(max.x, min.y),
            Vec2::new(min.x, max.y),
            Vec2::new(max.x, max.y),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_corners_order() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(
            rect.corners(),
            [
                Vec2::new(1.0, 2.0),
                Vec2::new(4.0, 2.0),
                Vec2::new(1.0, 6.0),
                Vec2::new(4.0, 6.0),
            ]
        );
    }

    #[test]
    fn test_unit_rect() {
        assert_eq!(Rect::UNIT.min(), Vec2::ZERO);
        assert_eq!(Rect::UNIT.max(), Vec2::ONE);
    }
}
