//! Drives a few frames of a small scene through a mock display and logs what the
//! allocator did each frame.
//!
//! ```bash
//! RUST_LOG=batchmesh_render=trace cargo run --package batchmesh-render --example frame_cycle
//! ```

use std::sync::Arc;

use batchmesh_core::logging;
use batchmesh_core::math::{Affine2, Rect, Vec2};
use batchmesh_core::profiling::{ProfilingBackend, init_profiling, new_frame};
use batchmesh_render::{
    BatchAllocator, BatchAllocatorDescriptor, BatchResult, BitmapRenderable, FrameContext, Glyph,
    GlyphRunRenderable, MaterialId, QuadTag,
};
use batchmesh_test_utils::MockDisplayProvider;

const SPRITES: MaterialId = MaterialId(1);
const FONT: MaterialId = MaterialId(2);

fn main() -> BatchResult<()> {
    logging::init();
    init_profiling(ProfilingBackend::PuffinHttp);

    let provider = Arc::new(MockDisplayProvider::new());
    let mut allocator = BatchAllocator::new(
        provider.clone(),
        BatchAllocatorDescriptor {
            sorting_layer_name: Some("UI".to_string()),
            ..BatchAllocatorDescriptor::labeled("demo")
        },
    )?;

    let background = Arc::new(BitmapRenderable::new(
        QuadTag(1),
        Rect::new(0.0, 0.0, 256.0, 128.0),
        Rect::UNIT,
    ));
    let hero = Arc::new(BitmapRenderable::new(
        QuadTag(2),
        Rect::new(0.0, 0.0, 32.0, 32.0),
        Rect::new(0.0, 0.0, 0.25, 0.25),
    ));
    let label = Arc::new(GlyphRunRenderable::new(
        QuadTag(3),
        (0..5)
            .map(|i| Glyph {
                rect: Rect::new(i as f32 * 10.0, 100.0, 10.0, 14.0),
                uv: Rect::new(i as f32 / 16.0, 0.0, 1.0 / 16.0, 1.0 / 16.0),
            })
            .collect(),
    ));

    let mut frame = FrameContext::new(0);
    for _ in 0..6 {
        new_frame();
        frame.advance();

        hero.set_transform(Affine2::from_translation(Vec2::new(
            frame.update_count as f32 * 4.0,
            48.0,
        )));

        allocator.begin_cycle(&frame);
        allocator.submit(background.clone(), background.quad_count(), SPRITES)?;
        allocator.submit(hero.clone(), hero.quad_count(), SPRITES)?;
        // The label disappears on the last two frames
        if frame.update_count <= 4 {
            allocator.submit(label.clone(), label.quad_count(), FONT)?;
        }
        allocator.end_cycle(&frame)?;

        let stats = allocator.stats();
        tracing::info!(
            "frame {}: {} submissions, {} quads, {} surfaces active, {} disabled, {} uploads ({} bytes)",
            frame.update_count,
            stats.submissions,
            stats.quads,
            stats.surfaces_active,
            stats.surfaces_disabled,
            stats.uploads,
            stats.uploaded_bytes
        );
    }

    tracing::info!(
        "{} surfaces pooled, {} drawables shown",
        allocator.surface_count(),
        provider.active_drawables()
    );

    Ok(())
}
