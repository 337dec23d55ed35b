//! Append-only collection of batch surfaces reused across frames.

use std::sync::Arc;

use batchmesh_test_utils::DisplayProvider;

use crate::descriptor::BatchAllocatorDescriptor;
use crate::error::BatchResult;
use crate::surface::BatchSurface;

/// Ordered batch surfaces plus the high-water marks of the current and previous frame.
///
/// Surfaces are only ever appended. Index `n` keeps the same host drawable for the
/// lifetime of the pool.
pub struct BatchPool {
    provider: Arc<dyn DisplayProvider>,
    descriptor: BatchAllocatorDescriptor,
    surfaces: Vec<BatchSurface>,
    /// Highest surface index selected in the frame being built
    current: Option<usize>,
    /// Highest surface index used by the last completed frame
    previous: Option<usize>,
}

impl BatchPool {
    /// Create an empty pool. No host objects are created until [`grow`](Self::grow).
    pub fn new(provider: Arc<dyn DisplayProvider>, descriptor: BatchAllocatorDescriptor) -> Self {
        Self {
            provider,
            descriptor,
            surfaces: Vec::new(),
            current: None,
            previous: None,
        }
    }

    /// Append one surface, returning its index.
    pub fn grow(&mut self) -> BatchResult<usize> {
        let index = self.surfaces.len();
        let surface = BatchSurface::initialize(self.provider.clone(), &self.descriptor, index)?;
        self.surfaces.push(surface);

        tracing::debug!(
            "Batch pool '{}' grew to {} surfaces",
            self.descriptor.label,
            self.surfaces.len()
        );
        Ok(index)
    }

    /// Make sure a surface exists at `index`, growing as needed.
    pub fn ensure(&mut self, index: usize) -> BatchResult<()> {
        while self.surfaces.len() <= index {
            self.grow()?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BatchSurface> {
        self.surfaces.get(index)
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn set_current(&mut self, index: Option<usize>) {
        self.current = index;
    }

    pub fn previous(&self) -> Option<usize> {
        self.previous
    }

    /// Promote the current frame's high-water mark to "previous".
    pub fn commit(&mut self) {
        self.previous = self.current;
    }

    /// Disable surfaces in `range`, returning how many were disabled.
    pub fn disable_range(&mut self, range: std::ops::Range<usize>) -> usize {
        let end = range.end.min(self.surfaces.len());
        let start = range.start.min(end);
        for surface in &mut self.surfaces[start..end] {
            surface.disable();
        }
        end - start
    }

    pub fn descriptor(&self) -> &BatchAllocatorDescriptor {
        &self.descriptor
    }
}

impl std::ops::Index<usize> for BatchPool {
    type Output = BatchSurface;

    fn index(&self, index: usize) -> &BatchSurface {
        &self.surfaces[index]
    }
}

impl std::ops::IndexMut<usize> for BatchPool {
    fn index_mut(&mut self, index: usize) -> &mut BatchSurface {
        &mut self.surfaces[index]
    }
}
