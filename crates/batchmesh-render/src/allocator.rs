//! Frame-by-frame assignment of renderables to batch surfaces.
//!
//! Every frame runs one cycle:
//!
//! | Phase | Call | Effect |
//! |-------|------|--------|
//! | Begin | [`BatchAllocator::begin_cycle`] | Resolve delegation, stamp the frame, forget the current surface |
//! | Submit | [`BatchAllocator::submit`] (0..N times, draw order) | Assign the renderable to the current surface, moving to the next one when the material changes |
//! | End | [`BatchAllocator::end_cycle`] | Flush surfaces used this frame, disable the ones only the previous frame used |
//!
//! Assignment is greedy and single pass. A material change relative to the
//! *immediately preceding* submission always opens a new surface, so `M1, M2, M1`
//! needs three surfaces. Callers that want fewer draw calls group their submissions
//! by material.
//!
//! ```
//! use std::sync::Arc;
//! use batchmesh_render::*;
//! use batchmesh_test_utils::{MaterialId, MockDisplayProvider};
//!
//! struct Nothing;
//! impl Renderable for Nothing {
//!     fn emit_quads(&self, _buffer: &mut QuadBuffer) {}
//! }
//!
//! let provider = Arc::new(MockDisplayProvider::new());
//! let mut allocator =
//!     BatchAllocator::new(provider, BatchAllocatorDescriptor::labeled("demo")).unwrap();
//!
//! let frame = FrameContext::new(1);
//! allocator.begin_cycle(&frame);
//! allocator.submit(Arc::new(Nothing), 0, MaterialId(1)).unwrap();
//! allocator.submit(Arc::new(Nothing), 0, MaterialId(2)).unwrap();
//! allocator.end_cycle(&frame).unwrap();
//!
//! assert_eq!(allocator.used_surfaces(), Some(1));
//! ```

use std::sync::Arc;

use batchmesh_core::profiling::profile_function;
use batchmesh_test_utils::{DisplayProvider, MaterialId};
use parking_lot::Mutex;

use crate::context::RenderContext;
use crate::descriptor::BatchAllocatorDescriptor;
use crate::error::{BatchError, BatchResult};
use crate::pool::BatchPool;
use crate::renderable::RenderableRef;
use crate::stats::BatchStats;
use crate::surface::BatchSurface;

/// An allocator shared between a parent context and the children delegating to it.
///
/// The parent must not hold the lock while its children submit.
pub type SharedBatchAllocator = Arc<Mutex<BatchAllocator>>;

/// Owns a [`BatchPool`] and runs the per-frame begin/submit/end protocol over it.
pub struct BatchAllocator {
    pool: BatchPool,
    /// Frame stamp of the cycle in progress
    update_count: u64,
    /// Resolved at `begin_cycle`, consulted by `submit` and `end_cycle`
    parent: Option<SharedBatchAllocator>,
    stats: BatchStats,
}

impl BatchAllocator {
    /// Create an allocator and, unless the descriptor is attaching, its first surface.
    pub fn new(
        provider: Arc<dyn DisplayProvider>,
        descriptor: BatchAllocatorDescriptor,
    ) -> BatchResult<Self> {
        let attaching = descriptor.attaching;
        let mut pool = BatchPool::new(provider, descriptor);
        if !attaching {
            pool.grow()?;
        }

        Ok(Self {
            pool,
            update_count: 0,
            parent: None,
            stats: BatchStats::default(),
        })
    }

    /// Wrap in a [`SharedBatchAllocator`] so nested contexts can delegate to it.
    pub fn into_shared(self) -> SharedBatchAllocator {
        Arc::new(Mutex::new(self))
    }

    /// Start a cycle for `context`.
    ///
    /// If the context has a parent allocator, this allocator delegates the whole cycle
    /// to it and leaves its own pool untouched. Each delegated `submit` locks the parent
    /// for the duration of that one call, so the host must lock the parent per call
    /// (`parent.lock().submit(..)`) and never hold its guard across a child's cycle.
    pub fn begin_cycle(&mut self, context: &dyn RenderContext) {
        profile_function!();
        self.parent = context.parent_allocator();
        if self.parent.is_some() {
            return;
        }

        self.update_count = context.update_count();
        self.pool.set_current(None);
        self.stats = BatchStats::default();
    }

    /// Queue `renderable` with `quad_count` quads under `material`, in draw order.
    ///
    /// Fails only if a new surface was needed and the host could not create it.
    pub fn submit(
        &mut self,
        renderable: RenderableRef,
        quad_count: usize,
        material: MaterialId,
    ) -> BatchResult<()> {
        if let Some(parent) = &self.parent {
            return parent.lock().submit(renderable, quad_count, material);
        }

        profile_function!();
        let index = match self.pool.current() {
            None => 0,
            Some(current) if self.pool[current].material() != Some(material) => current + 1,
            Some(current) => current,
        };

        if self.pool.current() != Some(index) {
            self.pool.ensure(index)?;
            self.pool.set_current(Some(index));
            self.pool[index].set_material(material);
        }

        self.pool[index].accept_renderable(renderable, quad_count, self.update_count);

        self.stats.submissions += 1;
        self.stats.quads += quad_count as u64;
        Ok(())
    }

    /// Finish the cycle: flush every surface used this frame and disable the trailing
    /// surfaces that only the previous frame needed.
    ///
    /// A frame with no submissions disables everything the previous frame used.
    ///
    /// If a surface fails to flush, the cycle is abandoned: every surface used by this or
    /// the previous frame is disabled, so nothing half-built stays visible, and the error
    /// is returned.
    pub fn end_cycle(&mut self, context: &dyn RenderContext) -> BatchResult<()> {
        if self.parent.is_some() {
            return Ok(());
        }

        profile_function!();
        if context.update_count() != self.update_count {
            return Err(BatchError::InvariantViolation(format!(
                "cycle began at frame {} but ended at frame {}",
                self.update_count,
                context.update_count()
            )));
        }

        let previous_end = self.pool.previous().map_or(0, |previous| previous + 1);

        match self.pool.current() {
            None => {
                let disabled = self.pool.disable_range(0..previous_end);
                self.stats.surfaces_disabled = disabled as u32;
            }
            Some(used) => {
                for index in 0..=used {
                    let report = match self.pool[index].flush() {
                        Ok(report) => report,
                        Err(err) => {
                            self.abandon_cycle((used + 1).max(previous_end));
                            return Err(err);
                        }
                    };

                    self.stats.surfaces_active += 1;
                    if report.reallocated {
                        self.stats.reallocations += 1;
                    }
                    if report.uploaded {
                        self.stats.uploads += 1;
                        self.stats.uploaded_bytes += report.uploaded_bytes as u64;
                    }
                }

                let disabled = self.pool.disable_range(used + 1..previous_end);
                self.stats.surfaces_disabled = disabled as u32;
            }
        }

        tracing::trace!(
            "Frame {} used {:?} surfaces (previous {:?}), {} disabled",
            self.update_count,
            self.pool.current().map(|used| used + 1),
            self.pool.previous().map(|previous| previous + 1),
            self.stats.surfaces_disabled
        );

        self.pool.commit();
        Ok(())
    }

    fn abandon_cycle(&mut self, end: usize) {
        tracing::warn!(
            "Abandoning frame {} of '{}', disabling {} surfaces",
            self.update_count,
            self.pool.descriptor().label,
            end
        );

        let disabled = self.pool.disable_range(0..end);
        self.stats.surfaces_active = 0;
        self.stats.surfaces_disabled = disabled as u32;
        self.pool.set_current(None);
        self.pool.commit();
    }

    /// Whether the cycle in progress is routed to a parent allocator.
    pub fn is_delegating(&self) -> bool {
        self.parent.is_some()
    }

    /// Frame stamp of the last cycle this allocator ran itself.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Surfaces ever created by this allocator.
    pub fn surface_count(&self) -> usize {
        self.pool.len()
    }

    pub fn surface(&self, index: usize) -> Option<&BatchSurface> {
        self.pool.get(index)
    }

    /// Highest surface index used by the last completed cycle.
    pub fn used_surfaces(&self) -> Option<usize> {
        self.pool.previous()
    }

    /// Surface currently receiving submissions.
    pub fn current_surface(&self) -> Option<usize> {
        self.pool.current()
    }

    /// Counters for the cycle in progress, or the last one once `end_cycle` returned.
    pub fn stats(&self) -> BatchStats {
        self.stats
    }

    pub fn descriptor(&self) -> &BatchAllocatorDescriptor {
        self.pool.descriptor()
    }
}

impl Drop for BatchAllocator {
    fn drop(&mut self) {
        if self.pool.is_empty() {
            return;
        }
        tracing::debug!(
            "Tearing down batch allocator '{}' ({} surfaces)",
            self.pool.descriptor().label,
            self.pool.len()
        );
    }
}
