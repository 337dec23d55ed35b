//! Per-frame context seen by the allocator.

use crate::allocator::SharedBatchAllocator;

/// The render context driving one allocator's cycles.
///
/// A context nested inside another (a child animation attached to a parent) reports
/// the parent's allocator, and the child's whole cycle is routed into the parent's
/// pool instead of its own.
pub trait RenderContext {
    /// Monotonically increasing frame counter.
    fn update_count(&self) -> u64;

    /// Allocator of the logical parent context, if there is one that batches.
    fn parent_allocator(&self) -> Option<SharedBatchAllocator> {
        None
    }
}

/// Plain [`RenderContext`] for hosts that track frames themselves.
///
/// ```
/// use batchmesh_render::{FrameContext, RenderContext};
///
/// let mut frame = FrameContext::new(1);
/// frame.advance();
/// assert_eq!(frame.update_count(), 2);
/// assert!(frame.parent_allocator().is_none());
/// ```
#[derive(Clone, Default)]
pub struct FrameContext {
    pub update_count: u64,
    pub parent: Option<SharedBatchAllocator>,
}

impl FrameContext {
    pub fn new(update_count: u64) -> Self {
        Self {
            update_count,
            parent: None,
        }
    }

    /// Context for a child that delegates to `parent`.
    pub fn nested(update_count: u64, parent: SharedBatchAllocator) -> Self {
        Self {
            update_count,
            parent: Some(parent),
        }
    }

    /// Move to the next frame.
    pub fn advance(&mut self) {
        self.update_count += 1;
    }
}

impl RenderContext for FrameContext {
    fn update_count(&self) -> u64 {
        self.update_count
    }

    fn parent_allocator(&self) -> Option<SharedBatchAllocator> {
        self.parent.clone()
    }
}
