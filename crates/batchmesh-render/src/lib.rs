//! batchmesh render - Batched quad meshes for 2D animation playback
//!
//! Turns a draw-ordered stream of quad-emitting renderables into as few dynamic
//! meshes as possible. Each mesh holds one material; consecutive submissions sharing
//! a material share a mesh.
//!
//! - [`QuadBuffer`]: exact-size vertex, UV, color and index arrays for N quads
//! - [`BatchSurface`]: one drawable plus its geometry, material and renderer list
//! - [`BatchPool`]: grow-only surface storage with current/previous high-water marks
//! - [`BatchAllocator`]: the per-frame begin/submit/end protocol, with delegation to a parent
//!
//! The display backend sits behind [`DisplayProvider`]; tests and examples use the
//! mock from `batchmesh-test-utils`.
//!
//! ## Examples
//!
//! ```bash
//! cargo run --package batchmesh-render --example frame_cycle
//! ```

pub mod allocator;
pub mod context;
pub mod descriptor;
pub mod emitters;
pub mod error;
pub mod pool;
pub mod quad_buffer;
pub mod renderable;
pub mod stats;
pub mod surface;

// Re-export main types
pub use allocator::{BatchAllocator, SharedBatchAllocator};
pub use context::{FrameContext, RenderContext};
pub use descriptor::BatchAllocatorDescriptor;
pub use emitters::{BitmapRenderable, ColorTransform, Glyph, GlyphRunRenderable};
pub use error::{BatchError, BatchResult};
pub use pool::BatchPool;
pub use quad_buffer::{
    QUAD_INDEX_TEMPLATE, QUAD_INDICES, QUAD_VERTICES, Quad, QuadBuffer, QuadTag,
};
pub use renderable::{Renderable, RenderableRef};
pub use stats::BatchStats;
pub use surface::{BatchSurface, FlushReport};

// Re-export the display seam so callers need only this crate
pub use batchmesh_test_utils::{
    DisplayError, DisplayProvider, DrawableHandle, GeometryHandle, GeometryData, MaterialId,
    RenderState,
};
