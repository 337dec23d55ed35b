//! The capability a drawable object needs to take part in batching.

use std::sync::Arc;

use crate::quad_buffer::QuadBuffer;

/// Something that writes quads into a shared [`QuadBuffer`].
///
/// A renderable is submitted with a declared quad count. When its surface flushes,
/// `emit_quads` is called with the buffer cursor positioned at the renderable's first
/// slot, and it must write (or skip) exactly that many quads using
/// [`QuadBuffer::write_quad`] / [`QuadBuffer::skip_quad`].
pub trait Renderable: Send + Sync {
    fn emit_quads(&self, buffer: &mut QuadBuffer);
}

/// Shared reference to a renderable held by a surface for one frame.
pub type RenderableRef = Arc<dyn Renderable>;
