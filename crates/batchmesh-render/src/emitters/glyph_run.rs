use parking_lot::Mutex;

use batchmesh_core::math::{Affine2, Rect};

use super::{ColorTransform, build_quad};
use crate::quad_buffer::{QuadBuffer, QuadStamp, QuadTag};
use crate::renderable::Renderable;

/// One glyph of a run: where it sits in the run's space and where it lives in the atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub rect: Rect,
    pub uv: Rect,
}

struct GlyphRunState {
    glyphs: Vec<Glyph>,
    /// Stamp of each glyph's last write, parallel to `glyphs`
    last_writes: Vec<Option<QuadStamp>>,
    transform: Affine2,
    depth: f32,
    color: ColorTransform,
    dirty: bool,
}

/// A run of glyphs sharing one transform and color, emitting one quad per glyph.
///
/// Every slot the run writes carries the run's tag. Each glyph remembers the stamp of its
/// own last write, so a clean run skips only the slots still holding that exact glyph and
/// rewrites the rest, including after a reorder that shifted the run.
pub struct GlyphRunRenderable {
    tag: QuadTag,
    state: Mutex<GlyphRunState>,
}

impl GlyphRunRenderable {
    pub fn new(tag: QuadTag, glyphs: Vec<Glyph>) -> Self {
        Self {
            tag,
            state: Mutex::new(GlyphRunState {
                last_writes: vec![None; glyphs.len()],
                glyphs,
                transform: Affine2::IDENTITY,
                depth: 0.0,
                color: ColorTransform::IDENTITY,
                dirty: true,
            }),
        }
    }

    pub fn tag(&self) -> QuadTag {
        self.tag
    }

    /// Quads this run declares on submit. An empty run contributes none.
    pub fn quad_count(&self) -> usize {
        self.state.lock().glyphs.len()
    }

    /// Replace the glyphs. The caller must submit with the new [`quad_count`](Self::quad_count).
    pub fn set_glyphs(&self, glyphs: Vec<Glyph>) {
        let mut state = self.state.lock();
        if state.glyphs != glyphs {
            state.last_writes = vec![None; glyphs.len()];
            state.glyphs = glyphs;
            state.dirty = true;
        }
    }

    pub fn set_transform(&self, transform: Affine2) {
        let mut state = self.state.lock();
        if state.transform != transform {
            state.transform = transform;
            state.dirty = true;
        }
    }

    pub fn set_depth(&self, depth: f32) {
        let mut state = self.state.lock();
        if state.depth != depth {
            state.depth = depth;
            state.dirty = true;
        }
    }

    pub fn set_color_transform(&self, color: ColorTransform) {
        let mut state = self.state.lock();
        if state.color != color {
            state.color = color;
            state.dirty = true;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.state.lock().dirty
    }
}

impl Renderable for GlyphRunRenderable {
    fn emit_quads(&self, buffer: &mut QuadBuffer) {
        let mut state = self.state.lock();
        let GlyphRunState {
            glyphs,
            last_writes,
            transform,
            depth,
            color,
            dirty,
        } = &mut *state;

        for (glyph, last_write) in glyphs.iter().zip(last_writes.iter_mut()) {
            let unchanged =
                !*dirty && last_write.is_some_and(|stamp| buffer.slot_stamp() == Some(stamp));
            if unchanged {
                buffer.skip_quad();
                continue;
            }
            let quad = build_quad(&glyph.rect, &glyph.uv, transform, *depth, color);
            *last_write = Some(buffer.write_quad(&quad, self.tag));
        }

        *dirty = false;
    }
}
