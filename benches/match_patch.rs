//! Patch matching benchmarks.
//! Run: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fidelitty::{match_patch, Context, GlyphDictionary, PixelPatch};

fn gradient(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 31 + i / 7) % 256) as u8).collect()
}

fn bench_single_patch(c: &mut Criterion) {
    let bytes = gradient(4 * 8 * 3);
    let patch = PixelPatch::standalone(&bytes).expect("patch sized input");
    let dictionary = GlyphDictionary::standard();

    c.bench_function("match_patch_gradient", |b| {
        b.iter(|| black_box(match_patch(black_box(&patch), dictionary)));
    });
}

fn bench_full_grid(c: &mut Criterion) {
    let mut context = Context::new(1).expect("context");
    let handle = context
        .create_render_pipeline(160, 48)
        .expect("pipeline");
    let input = context
        .pipeline_mut(handle)
        .expect("pipeline")
        .input_surface_mut()
        .expect("input surface");
    let fill = gradient(input.len());
    input.copy_from_slice(&fill);

    let mut group = c.benchmark_group("execute_all");
    group.sample_size(20);
    group.bench_function("grid_160x48", |b| {
        b.iter(|| {
            context.execute_all(handle).expect("dispatch");
            context.wait(handle).expect("execution");
        });
    });
    group.finish();
}

criterion_group!(benches, bench_single_patch, bench_full_grid);
criterion_main!(benches);
