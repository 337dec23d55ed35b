//! Shared fixtures for the allocator integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use batchmesh_render::{
    BatchAllocator, BatchAllocatorDescriptor, Quad, QuadBuffer, QuadTag, Renderable,
};
use batchmesh_test_utils::MockDisplayProvider;
use parking_lot::Mutex;

/// Writes a fixed number of quads and records where the cursor was each time.
pub struct Recorder {
    pub tag: QuadTag,
    pub quads: usize,
    pub starts: Mutex<Vec<usize>>,
}

impl Recorder {
    pub fn new(tag: u32, quads: usize) -> Arc<Self> {
        Arc::new(Self {
            tag: QuadTag(tag),
            quads,
            starts: Mutex::new(Vec::new()),
        })
    }

    pub fn emits(&self) -> usize {
        self.starts.lock().len()
    }
}

impl Renderable for Recorder {
    fn emit_quads(&self, buffer: &mut QuadBuffer) {
        self.starts.lock().push(buffer.cursor());
        for _ in 0..self.quads {
            buffer.write_quad(&Quad::default(), self.tag);
        }
    }
}

pub fn mock_allocator(label: &str) -> (Arc<MockDisplayProvider>, BatchAllocator) {
    let mock = Arc::new(MockDisplayProvider::new());
    let allocator = BatchAllocator::new(mock.clone(), BatchAllocatorDescriptor::labeled(label))
        .expect("mock provider creates surfaces");
    (mock, allocator)
}
