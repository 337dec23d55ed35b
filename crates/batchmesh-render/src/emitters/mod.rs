//! Ready-made [`Renderable`](crate::Renderable)s for the two quad producers of an
//! animation player: bitmaps and glyph runs.
//!
//! Both cache their own dirtiness. When a flush reaches them and the slot under the
//! buffer cursor still carries their tag from an earlier frame, they skip the slot
//! instead of rewriting identical vertices, so an unchanged frame uploads nothing.

mod bitmap;
mod glyph_run;

pub use bitmap::BitmapRenderable;
pub use glyph_run::{Glyph, GlyphRunRenderable};

use batchmesh_core::color::Color;
use batchmesh_core::math::{Affine2, Rect};

use crate::quad_buffer::Quad;

/// Multiplicative and additive color applied to every vertex of an emitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTransform {
    pub multiply: Color,
    pub add: Color,
}

impl ColorTransform {
    pub const IDENTITY: ColorTransform = ColorTransform {
        multiply: Color::WHITE,
        add: Color::TRANSPARENT,
    };

    /// Apply `self` after `parent`.
    pub fn concat(&self, parent: &ColorTransform) -> ColorTransform {
        ColorTransform {
            multiply: self.multiply.multiply(parent.multiply),
            add: Color::rgba(
                self.add.r * parent.multiply.r + parent.add.r,
                self.add.g * parent.multiply.g + parent.add.g,
                self.add.b * parent.multiply.b + parent.add.b,
                self.add.a * parent.multiply.a + parent.add.a,
            ),
        }
    }
}

impl Default for ColorTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Place `local` through `transform` at `depth` and texture it with `uv`.
pub(crate) fn build_quad(
    local: &Rect,
    uv: &Rect,
    transform: &Affine2,
    depth: f32,
    color: &ColorTransform,
) -> Quad {
    let corners = local.corners();
    let positions = corners.map(|corner| transform.transform_point2(corner).extend(depth));

    Quad {
        positions,
        uvs: uv.corners(),
        tint: color.multiply.to_color32(),
        additional: color.add.rgb_vec3(),
    }
}
