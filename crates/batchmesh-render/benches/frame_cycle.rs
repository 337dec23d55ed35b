//! Benchmarks for the per-frame begin/submit/end cycle

use std::sync::Arc;

use batchmesh_core::math::{Affine2, Rect, Vec2};
use batchmesh_render::{
    BatchAllocator, BatchAllocatorDescriptor, BitmapRenderable, FrameContext, MaterialId, QuadTag,
};
use batchmesh_test_utils::MockDisplayProvider;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

fn bitmaps(count: usize) -> Vec<Arc<BitmapRenderable>> {
    (0..count)
        .map(|i| {
            Arc::new(BitmapRenderable::new(
                QuadTag(i as u32),
                Rect::new(0.0, 0.0, 32.0, 32.0),
                Rect::UNIT,
            ))
        })
        .collect()
}

fn run_frame(
    allocator: &mut BatchAllocator,
    frame: &FrameContext,
    bitmaps: &[Arc<BitmapRenderable>],
    materials: u64,
) {
    allocator.begin_cycle(frame);
    for (i, bitmap) in bitmaps.iter().enumerate() {
        let material = MaterialId(i as u64 * materials / bitmaps.len() as u64);
        allocator
            .submit(bitmap.clone(), bitmap.quad_count(), material)
            .unwrap();
    }
    allocator.end_cycle(frame).unwrap();
}

fn bench_static_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("static_frames");

    for size in [10, 100, 1000] {
        group.throughput(Throughput::Elements(size as u64));

        let provider = Arc::new(MockDisplayProvider::new());
        let mut allocator =
            BatchAllocator::new(provider, BatchAllocatorDescriptor::labeled("bench")).unwrap();
        let bitmaps = bitmaps(size);
        let mut frame = FrameContext::new(0);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                frame.advance();
                run_frame(&mut allocator, &frame, black_box(&bitmaps), 4);
            });
        });
    }

    group.finish();
}

fn bench_animated_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("animated_frames");

    for size in [10, 100, 1000] {
        group.throughput(Throughput::Elements(size as u64));

        let provider = Arc::new(MockDisplayProvider::new());
        let mut allocator =
            BatchAllocator::new(provider, BatchAllocatorDescriptor::labeled("bench")).unwrap();
        let bitmaps = bitmaps(size);
        let mut frame = FrameContext::new(0);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                frame.advance();
                let offset = Vec2::new(frame.update_count as f32, 0.0);
                for bitmap in &bitmaps {
                    bitmap.set_transform(Affine2::from_translation(offset));
                }
                run_frame(&mut allocator, &frame, black_box(&bitmaps), 4);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_static_frames, bench_animated_frames);
criterion_main!(benches);
