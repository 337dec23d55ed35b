//! Flat, preallocated geometry storage for a fixed number of quads.
//!
//! A [`QuadBuffer`] holds four vertices and six indices per quad. The index topology
//! is computed once per allocation and never touched again; emitters only write
//! vertex attributes and a back-reference tag through [`QuadBuffer::write_quad`].
//!
//! Every write also receives a [`QuadStamp`] that no other write, in any buffer, ever
//! shares. An emitter that remembers the stamp of its last write can later tell whether
//! the slot under the cursor still holds exactly that quad.
//!
//! ```
//! use batchmesh_render::{Quad, QuadBuffer, QuadTag};
//!
//! let mut buffer = QuadBuffer::new();
//! buffer.allocate(2);
//! assert_eq!(&buffer.indices()[6..], &[4, 5, 6, 6, 5, 7]);
//!
//! buffer.write_quad(&Quad::default(), QuadTag(7));
//! assert_eq!(buffer.cursor(), 1);
//! assert_eq!(buffer.tag_at(0), Some(QuadTag(7)));
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use batchmesh_core::color::Color32;
use batchmesh_core::math::{Vec2, Vec3};
use batchmesh_core::profiling::profile_function;
use batchmesh_test_utils::GeometryData;

/// Vertices per quad.
pub const QUAD_VERTICES: usize = 4;

/// Indices per quad.
pub const QUAD_INDICES: usize = 6;

/// Triangle index template for one quad, relative to the quad's first vertex.
pub const QUAD_INDEX_TEMPLATE: [u32; QUAD_INDICES] = [0, 1, 2, 2, 1, 3];

/// Back-reference from a quad to the renderable that wrote it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuadTag(pub u32);

/// Identity of a single quad write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuadStamp(u64);

static NEXT_STAMP: AtomicU64 = AtomicU64::new(1);

impl QuadStamp {
    fn next() -> Self {
        QuadStamp(NEXT_STAMP.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy)]
struct SlotOwner {
    tag: QuadTag,
    stamp: QuadStamp,
}

/// One quad's worth of vertex attributes.
///
/// Vertices are ordered top-left, top-right, bottom-left, bottom-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub positions: [Vec3; QUAD_VERTICES],
    pub uvs: [Vec2; QUAD_VERTICES],
    /// Multiplicative tint, shared by all four vertices.
    pub tint: Color32,
    /// Additive color, shared by all four vertices.
    pub additional: Vec3,
}

impl Default for Quad {
    fn default() -> Self {
        Self {
            positions: [Vec3::ZERO; QUAD_VERTICES],
            uvs: [Vec2::ZERO; QUAD_VERTICES],
            tint: Color32::WHITE,
            additional: Vec3::ZERO,
        }
    }
}

/// Geometry storage for exactly [`quad_capacity`](QuadBuffer::quad_capacity) quads.
#[derive(Debug, Default)]
pub struct QuadBuffer {
    vertices: Vec<Vec3>,
    uvs: Vec<Vec2>,
    indices: Vec<u32>,
    colors: Vec<Color32>,
    additional_colors: Vec<Vec3>,
    slots: Vec<Option<SlotOwner>>,
    /// Write cursor, in quads
    index: usize,
    modified: bool,
    initialized: bool,
}

impl QuadBuffer {
    /// Create an unallocated buffer. Nothing can be written until [`allocate`](Self::allocate).
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)size every array to hold exactly `quads` quads.
    ///
    /// Previous contents, tags and stamps are discarded, the cursor is reset and the buffer is
    /// marked modified. The index topology is rebuilt from [`QUAD_INDEX_TEMPLATE`].
    pub fn allocate(&mut self, quads: usize) {
        profile_function!();
        let vertex_count = quads * QUAD_VERTICES;

        self.vertices = vec![Vec3::ZERO; vertex_count];
        self.uvs = vec![Vec2::ZERO; vertex_count];
        self.colors = vec![Color32::TRANSPARENT; vertex_count];
        self.additional_colors = vec![Vec3::ZERO; vertex_count];
        self.slots = vec![None; quads];

        self.indices = Vec::with_capacity(quads * QUAD_INDICES);
        for quad in 0..quads {
            let base = (quad * QUAD_VERTICES) as u32;
            self.indices
                .extend(QUAD_INDEX_TEMPLATE.iter().map(|offset| base + offset));
        }

        self.index = 0;
        self.modified = true;
        self.initialized = true;
    }

    /// Reset the write cursor without touching contents.
    pub fn rewind(&mut self) {
        self.index = 0;
    }

    /// Write one quad at the cursor and advance, returning the stamp of this write.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is already at capacity. A renderable writing more quads
    /// than were reserved would otherwise overwrite its neighbours.
    pub fn write_quad(&mut self, quad: &Quad, tag: QuadTag) -> QuadStamp {
        assert!(
            self.index < self.quad_capacity(),
            "Quad write at {} exceeds buffer capacity {}",
            self.index,
            self.quad_capacity()
        );

        let base = self.index * QUAD_VERTICES;
        let range = base..base + QUAD_VERTICES;
        self.vertices[range.clone()].copy_from_slice(&quad.positions);
        self.uvs[range.clone()].copy_from_slice(&quad.uvs);
        self.colors[range.clone()].fill(quad.tint);
        self.additional_colors[range].fill(quad.additional);
        let stamp = QuadStamp::next();
        self.slots[self.index] = Some(SlotOwner { tag, stamp });

        self.index += 1;
        self.modified = true;
        stamp
    }

    /// Advance the cursor past one quad, keeping whatever it currently holds.
    ///
    /// Emitters use this when [`slot_stamp`](Self::slot_stamp) matches the stamp of their
    /// last write and their geometry has not changed since.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is already at capacity.
    pub fn skip_quad(&mut self) {
        assert!(
            self.index < self.quad_capacity(),
            "Quad skip at {} exceeds buffer capacity {}",
            self.index,
            self.quad_capacity()
        );
        self.index += 1;
    }

    /// Stamp of the write that filled the slot under the cursor, if any.
    pub fn slot_stamp(&self) -> Option<QuadStamp> {
        self.slots.get(self.index).copied().flatten().map(|owner| owner.stamp)
    }

    /// Tag of the renderable that last wrote quad `quad`.
    pub fn tag_at(&self, quad: usize) -> Option<QuadTag> {
        self.slots.get(quad).copied().flatten().map(|owner| owner.tag)
    }

    /// Capacity in quads.
    pub fn quad_capacity(&self) -> usize {
        self.slots.len()
    }

    /// Write cursor, in quads.
    pub fn cursor(&self) -> usize {
        self.index
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Force a re-upload on the next flush.
    pub fn mark_modified(&mut self) {
        self.modified = true;
    }

    /// Clear the modified flag, returning its previous value.
    pub fn take_modified(&mut self) -> bool {
        std::mem::replace(&mut self.modified, false)
    }

    /// Whether [`allocate`](Self::allocate) has run at least once.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn colors(&self) -> &[Color32] {
        &self.colors
    }

    pub fn additional_colors(&self) -> &[Vec3] {
        &self.additional_colors
    }

    /// Borrow every array for a single batched upload.
    pub fn geometry(&self) -> GeometryData<'_> {
        GeometryData {
            vertices: &self.vertices,
            uvs: &self.uvs,
            indices: &self.indices,
            colors: &self.colors,
            additional_colors: &self.additional_colors,
        }
    }

    /// Size in bytes of one full upload of this buffer.
    pub fn upload_size(&self) -> usize {
        bytemuck::cast_slice::<Vec3, u8>(&self.vertices).len()
            + bytemuck::cast_slice::<Vec2, u8>(&self.uvs).len()
            + bytemuck::cast_slice::<u32, u8>(&self.indices).len()
            + bytemuck::cast_slice::<Color32, u8>(&self.colors).len()
            + bytemuck::cast_slice::<Vec3, u8>(&self.additional_colors).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_at(x: f32) -> Quad {
        Quad {
            positions: [
                Vec3::new(x, 0.0, 0.0),
                Vec3::new(x + 1.0, 0.0, 0.0),
                Vec3::new(x, 1.0, 0.0),
                Vec3::new(x + 1.0, 1.0, 0.0),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_new_buffer_is_unallocated() {
        let buffer = QuadBuffer::new();
        assert!(!buffer.is_initialized());
        assert_eq!(buffer.quad_capacity(), 0);
        assert!(!buffer.is_modified());
    }

    #[test]
    fn test_allocate_sizes_arrays() {
        let mut buffer = QuadBuffer::new();
        buffer.allocate(3);

        assert!(buffer.is_initialized());
        assert!(buffer.is_modified());
        assert_eq!(buffer.quad_capacity(), 3);
        assert_eq!(buffer.vertices().len(), 12);
        assert_eq!(buffer.uvs().len(), 12);
        assert_eq!(buffer.colors().len(), 12);
        assert_eq!(buffer.additional_colors().len(), 12);
        assert_eq!(buffer.indices().len(), 18);
    }

    #[test]
    fn test_index_topology() {
        let mut buffer = QuadBuffer::new();
        buffer.allocate(5);

        for (i, chunk) in buffer.indices().chunks(QUAD_INDICES).enumerate() {
            let b = (i * 4) as u32;
            assert_eq!(chunk, &[b, b + 1, b + 2, b + 2, b + 1, b + 3]);
        }
    }

    #[test]
    fn test_allocate_zero_quads() {
        let mut buffer = QuadBuffer::new();
        buffer.allocate(0);

        assert!(buffer.is_initialized());
        assert_eq!(buffer.quad_capacity(), 0);
        assert!(buffer.indices().is_empty());
        assert_eq!(buffer.slot_stamp(), None);
    }

    #[test]
    fn test_write_quad_advances_and_tags() {
        let mut buffer = QuadBuffer::new();
        buffer.allocate(2);
        buffer.take_modified();

        let first = buffer.write_quad(&quad_at(0.0), QuadTag(10));
        let second = buffer.write_quad(&quad_at(5.0), QuadTag(11));

        assert_ne!(first, second);
        assert_eq!(buffer.cursor(), 2);
        assert!(buffer.is_modified());
        assert_eq!(buffer.tag_at(0), Some(QuadTag(10)));
        assert_eq!(buffer.tag_at(1), Some(QuadTag(11)));
        assert_eq!(buffer.vertices()[4], Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(buffer.colors()[7], Color32::WHITE);
    }

    #[test]
    fn test_skip_quad_keeps_contents() {
        let mut buffer = QuadBuffer::new();
        buffer.allocate(1);
        let stamp = buffer.write_quad(&quad_at(2.0), QuadTag(1));
        buffer.take_modified();
        buffer.rewind();

        assert_eq!(buffer.slot_stamp(), Some(stamp));
        buffer.skip_quad();

        assert_eq!(buffer.cursor(), 1);
        assert!(!buffer.is_modified());
        assert_eq!(buffer.vertices()[0], Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_reallocate_clears_tags() {
        let mut buffer = QuadBuffer::new();
        buffer.allocate(1);
        buffer.write_quad(&quad_at(0.0), QuadTag(3));

        buffer.allocate(1);
        assert_eq!(buffer.cursor(), 0);
        assert_eq!(buffer.slot_stamp(), None);
        assert_eq!(buffer.tag_at(0), None);
    }

    #[test]
    fn test_stamps_are_unique_across_buffers() {
        let mut a = QuadBuffer::new();
        let mut b = QuadBuffer::new();
        a.allocate(1);
        b.allocate(1);

        let in_a = a.write_quad(&quad_at(0.0), QuadTag(1));
        let in_b = b.write_quad(&quad_at(0.0), QuadTag(1));

        b.rewind();
        assert_ne!(b.slot_stamp(), Some(in_a));
        assert_eq!(b.slot_stamp(), Some(in_b));
    }

    #[test]
    #[should_panic(expected = "exceeds buffer capacity")]
    fn test_write_past_capacity_panics() {
        let mut buffer = QuadBuffer::new();
        buffer.allocate(1);
        buffer.write_quad(&Quad::default(), QuadTag(0));
        buffer.write_quad(&Quad::default(), QuadTag(0));
    }

    #[test]
    fn test_upload_size() {
        let mut buffer = QuadBuffer::new();
        buffer.allocate(1);
        // 4 * (12 + 8 + 4 + 12) vertex bytes + 6 * 4 index bytes
        assert_eq!(buffer.upload_size(), 4 * 36 + 24);
    }
}
