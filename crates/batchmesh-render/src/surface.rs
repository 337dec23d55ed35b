//! One combined-mesh draw unit: a quad buffer, a host drawable and a material slot.

use std::sync::Arc;

use batchmesh_core::profiling::profile_function;
use batchmesh_test_utils::{DisplayProvider, DrawableHandle, GeometryHandle, MaterialId};

use crate::descriptor::BatchAllocatorDescriptor;
use crate::error::{BatchError, BatchResult};
use crate::quad_buffer::QuadBuffer;
use crate::renderable::RenderableRef;

/// A renderable accepted for the current frame with its declared quad count.
struct SurfaceEntry {
    renderable: RenderableRef,
    quads: usize,
}

/// What a [`BatchSurface::flush`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushReport {
    /// The quad buffer was resized to fit this frame's quads.
    pub reallocated: bool,
    /// Geometry was pushed to the host.
    pub uploaded: bool,
    /// Bytes pushed to the host (0 when nothing was uploaded).
    pub uploaded_bytes: usize,
}

/// A pooled combined mesh bound to at most one material.
///
/// Surfaces are created once and recycled across frames: [`disable`](Self::disable)
/// hides the host drawable but keeps the quad buffer and renderable storage alive.
/// A surface's per-frame renderable list is reset lazily, the first time it accepts
/// a renderable with a new frame stamp.
pub struct BatchSurface {
    provider: Arc<dyn DisplayProvider>,
    index: usize,
    drawable: DrawableHandle,
    geometry: GeometryHandle,
    buffer: QuadBuffer,
    material: Option<MaterialId>,
    /// Backing storage; only the first `renderer_count` entries belong to this frame
    renderers: Vec<SurfaceEntry>,
    renderer_count: usize,
    quad_count: usize,
    /// Frame stamp of the last accepted renderable, `None` when empty
    update_count: Option<u64>,
    active: bool,
}

impl BatchSurface {
    /// Create the host drawable and geometry for surface `index` of a pool.
    ///
    /// The drawable starts hidden with no material and an unallocated quad buffer.
    pub fn initialize(
        provider: Arc<dyn DisplayProvider>,
        descriptor: &BatchAllocatorDescriptor,
        index: usize,
    ) -> BatchResult<Self> {
        let name = descriptor.drawable_name(index);
        let drawable = provider.create_drawable(&name)?;
        let geometry = match provider.create_geometry(&descriptor.label) {
            Ok(geometry) => geometry,
            Err(err) => {
                provider.destroy_drawable(drawable);
                return Err(err.into());
            }
        };

        provider.bind_geometry(drawable, Some(geometry));
        provider.apply_render_state(drawable, &descriptor.render_state());

        tracing::debug!("Created batch surface '{}'", name);

        Ok(Self {
            provider,
            index,
            drawable,
            geometry,
            buffer: QuadBuffer::new(),
            material: None,
            renderers: Vec::new(),
            renderer_count: 0,
            quad_count: 0,
            update_count: None,
            active: false,
        })
    }

    /// Record `renderable` for the frame stamped `update_count`.
    ///
    /// The first call with a new stamp discards the previous frame's list.
    pub fn accept_renderable(&mut self, renderable: RenderableRef, quads: usize, update_count: u64) {
        if self.update_count != Some(update_count) {
            self.update_count = Some(update_count);
            self.renderer_count = 0;
            self.quad_count = 0;
        }

        let entry = SurfaceEntry { renderable, quads };
        let i = self.renderer_count;
        if i < self.renderers.len() {
            self.renderers[i] = entry;
        } else {
            self.renderers.push(entry);
        }

        self.renderer_count += 1;
        self.quad_count += quads;
    }

    /// Bind `material`. Rebinding forces a geometry upload on the next flush.
    pub fn set_material(&mut self, material: MaterialId) {
        if self.material == Some(material) {
            return;
        }

        self.material = Some(material);
        self.provider.set_material(self.drawable, Some(material));
        self.buffer.mark_modified();
    }

    /// Hide the surface and forget this frame's renderables, keeping all storage.
    pub fn disable(&mut self) {
        tracing::trace!("Disabling batch surface {}", self.index);

        self.update_count = None;
        self.renderer_count = 0;
        self.quad_count = 0;
        self.material = None;

        self.provider.set_material(self.drawable, None);
        self.provider.clear_geometry(self.geometry);
        self.provider.set_drawable_active(self.drawable, false);
        self.active = false;

        // The host copy is gone; whatever is rendered here next must be re-sent.
        self.buffer.mark_modified();
    }

    /// Show the surface, rebuild its quads from this frame's renderables and upload
    /// them if anything changed.
    ///
    /// The quad buffer is resized to exactly this frame's quad count before any
    /// renderable writes into it.
    pub fn flush(&mut self) -> BatchResult<FlushReport> {
        profile_function!();
        let mut report = FlushReport::default();

        if !self.active {
            self.provider.set_drawable_active(self.drawable, true);
            self.active = true;
        }

        if !self.buffer.is_initialized() || self.buffer.quad_capacity() != self.quad_count {
            tracing::trace!(
                "Surface {} quad buffer {} -> {} quads",
                self.index,
                self.buffer.quad_capacity(),
                self.quad_count
            );
            self.buffer.allocate(self.quad_count);
            report.reallocated = true;
        } else {
            self.buffer.rewind();
        }

        for entry in &self.renderers[..self.renderer_count] {
            let start = self.buffer.cursor();
            entry.renderable.emit_quads(&mut self.buffer);
            let emitted = self.buffer.cursor() - start;

            if emitted != entry.quads {
                return Err(BatchError::QuadCountMismatch {
                    surface: self.index,
                    declared: entry.quads,
                    emitted,
                });
            }
        }

        if self.buffer.take_modified() {
            self.provider.clear_geometry(self.geometry);
            self.provider
                .upload_geometry(self.geometry, &self.buffer.geometry());
            self.provider.recompute_bounds(self.geometry);

            report.uploaded = true;
            report.uploaded_bytes = self.buffer.upload_size();
        }

        Ok(report)
    }

    /// Position of this surface in its pool.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn drawable(&self) -> DrawableHandle {
        self.drawable
    }

    pub fn geometry(&self) -> GeometryHandle {
        self.geometry
    }

    pub fn buffer(&self) -> &QuadBuffer {
        &self.buffer
    }

    /// Bound material; `None` while disabled.
    pub fn material(&self) -> Option<MaterialId> {
        self.material
    }

    /// Renderables accepted in the current frame.
    pub fn renderer_count(&self) -> usize {
        self.renderer_count
    }

    /// Quads declared by renderables accepted in the current frame.
    pub fn quad_count(&self) -> usize {
        self.quad_count
    }

    /// Length of the renderable storage, a high-water mark across frames.
    pub fn renderer_storage(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for BatchSurface {
    fn drop(&mut self) {
        tracing::debug!("Releasing batch surface {}", self.index);

        self.provider.set_material(self.drawable, None);
        self.provider.bind_geometry(self.drawable, None);
        self.provider.destroy_geometry(self.geometry);
        self.provider.destroy_drawable(self.drawable);
    }
}
