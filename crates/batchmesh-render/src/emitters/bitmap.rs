use parking_lot::Mutex;

use batchmesh_core::math::{Affine2, Rect};

use super::{ColorTransform, build_quad};
use crate::quad_buffer::{QuadBuffer, QuadStamp, QuadTag};
use crate::renderable::Renderable;

struct BitmapState {
    local: Rect,
    uv: Rect,
    transform: Affine2,
    depth: f32,
    color: ColorTransform,
    dirty: bool,
    /// Stamp of the last quad this bitmap wrote, wherever that was
    last_write: Option<QuadStamp>,
}

/// A single textured quad.
///
/// `tag` identifies the bitmap in [`QuadBuffer::tag_at`]. Slot reuse is decided by the
/// stamp of the bitmap's last write, so a bitmap that moved to another surface or slot
/// always rewrites.
pub struct BitmapRenderable {
    tag: QuadTag,
    state: Mutex<BitmapState>,
}

impl BitmapRenderable {
    /// A bitmap covering `local` (in its own space) sampling `uv` of its texture.
    pub fn new(tag: QuadTag, local: Rect, uv: Rect) -> Self {
        Self {
            tag,
            state: Mutex::new(BitmapState {
                local,
                uv,
                transform: Affine2::IDENTITY,
                depth: 0.0,
                color: ColorTransform::IDENTITY,
                dirty: true,
                last_write: None,
            }),
        }
    }

    pub fn tag(&self) -> QuadTag {
        self.tag
    }

    /// Quads this bitmap declares on submit.
    pub fn quad_count(&self) -> usize {
        1
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

    pub fn set_uv(&self, uv: Rect) {
        let mut state = self.state.lock();
        if state.uv != uv {
            state.uv = uv;
            state.dirty = true;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.state.lock().dirty
    }
}

impl Renderable for BitmapRenderable {
    fn emit_quads(&self, buffer: &mut QuadBuffer) {
        let mut state = self.state.lock();

        let unchanged = !state.dirty
            && state
                .last_write
                .is_some_and(|stamp| buffer.slot_stamp() == Some(stamp));
        if unchanged {
            buffer.skip_quad();
            return;
        }

        let quad = build_quad(&state.local, &state.uv, &state.transform, state.depth, &state.color);
        state.last_write = Some(buffer.write_quad(&quad, self.tag));
        state.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use batchmesh_core::math::{Vec2, Vec3};

    fn bitmap() -> BitmapRenderable {
        BitmapRenderable::new(QuadTag(5), Rect::new(0.0, 0.0, 4.0, 4.0), Rect::UNIT)
    }

    #[test]
    fn test_first_emit_writes() {
        let bitmap = bitmap();
        let mut buffer = QuadBuffer::new();
        buffer.allocate(1);

        bitmap.emit_quads(&mut buffer);

        assert_eq!(buffer.cursor(), 1);
        assert_eq!(buffer.tag_at(0), Some(QuadTag(5)));
        assert_eq!(buffer.vertices()[3], Vec3::new(4.0, 4.0, 0.0));
        assert!(!bitmap.is_dirty());
    }

    #[test]
    fn test_unchanged_bitmap_skips_its_slot() {
        let bitmap = bitmap();
        let mut buffer = QuadBuffer::new();
        buffer.allocate(1);
        bitmap.emit_quads(&mut buffer);
        buffer.take_modified();

        buffer.rewind();
        bitmap.emit_quads(&mut buffer);

        assert_eq!(buffer.cursor(), 1);
        assert!(!buffer.is_modified());
    }

    #[test]
    fn test_moved_bitmap_rewrites() {
        let bitmap = bitmap();
        let mut buffer = QuadBuffer::new();
        buffer.allocate(1);
        bitmap.emit_quads(&mut buffer);
        buffer.take_modified();

        bitmap.set_transform(Affine2::from_translation(Vec2::new(1.0, 0.0)));
        buffer.rewind();
        bitmap.emit_quads(&mut buffer);

        assert!(buffer.is_modified());
        assert_eq!(buffer.vertices()[0], Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_slot_left_behind_is_rewritten() {
        let bitmap = bitmap();
        let mut old = QuadBuffer::new();
        let mut new = QuadBuffer::new();
        old.allocate(1);
        new.allocate(1);

        bitmap.emit_quads(&mut old);
        bitmap.set_transform(Affine2::from_translation(Vec2::new(100.0, 0.0)));
        bitmap.emit_quads(&mut new);

        // Clean again, but `old` still holds the quad from before the move
        old.rewind();
        old.take_modified();
        bitmap.emit_quads(&mut old);

        assert!(old.is_modified());
        assert_eq!(old.vertices()[0], Vec3::new(100.0, 0.0, 0.0));
    }

    #[test]
    fn test_foreign_slot_is_overwritten() {
        let bitmap = bitmap();
        let other = BitmapRenderable::new(QuadTag(6), Rect::UNIT, Rect::UNIT);
        let mut buffer = QuadBuffer::new();
        buffer.allocate(1);
        other.emit_quads(&mut buffer);
        buffer.take_modified();

        buffer.rewind();
        bitmap.emit_quads(&mut buffer);
        buffer.take_modified();

        // bitmap is clean now, but the slot belongs to someone else
        buffer.rewind();
        other.emit_quads(&mut buffer);
        buffer.rewind();
        bitmap.emit_quads(&mut buffer);

        assert_eq!(buffer.tag_at(0), Some(QuadTag(5)));
    }
}
