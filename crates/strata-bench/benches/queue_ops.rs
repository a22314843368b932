//! Criterion benchmarks for filling, sorting, dispatching, and merging
//! render queues.

use std::hint::black_box;
use std::thread;

use criterion::{criterion_group, criterion_main, Criterion};
use crossbeam_channel::bounded;
use strata_bench::{
    fill_queue, generate_scene, reference_profile, render_frame, stress_profile, NullStream,
};
use strata_core::RenderParameters;
use strata_queue::RenderQueue;

/// Benchmark: one full 10K-draw frame (reset, fill, sort, dispatch).
fn bench_frame_10k(c: &mut Criterion) {
    let profile = reference_profile();
    let objects = generate_scene(&profile, 42);
    let view = RenderParameters::default();
    let mut queue = RenderQueue::with_config(profile.queue_config()).unwrap();

    // Warm up: grow the arena to its steady-state size.
    fill_queue(&mut queue, &view, &objects).unwrap();

    c.bench_function("frame_10k", |b| {
        b.iter(|| {
            queue.reset();
            fill_queue(&mut queue, &view, &objects).unwrap();
            let mut cmd = NullStream::default();
            render_frame(&mut queue, &mut cmd);
            black_box(cmd.draws);
        });
    });
}

/// Benchmark: one full 200K-draw frame.
fn bench_frame_200k(c: &mut Criterion) {
    let profile = stress_profile();
    let objects = generate_scene(&profile, 42);
    let view = RenderParameters::default();
    let mut queue = RenderQueue::with_config(profile.queue_config()).unwrap();
    fill_queue(&mut queue, &view, &objects).unwrap();

    c.bench_function("frame_200k", |b| {
        b.iter(|| {
            queue.reset();
            fill_queue(&mut queue, &view, &objects).unwrap();
            let mut cmd = NullStream::default();
            render_frame(&mut queue, &mut cmd);
            black_box(cmd.draws);
        });
    });
}

/// Benchmark: dispatch alone over an already sorted 10K-draw queue.
fn bench_dispatch_10k(c: &mut Criterion) {
    let profile = reference_profile();
    let objects = generate_scene(&profile, 7);
    let mut queue = RenderQueue::with_config(profile.queue_config()).unwrap();
    fill_queue(&mut queue, &RenderParameters::default(), &objects).unwrap();
    queue.sort();

    c.bench_function("dispatch_10k", |b| {
        b.iter(|| {
            let mut cmd = NullStream::default();
            for category in strata_core::QueueCategory::ALL {
                queue.dispatch(category, &mut cmd, None);
            }
            black_box(cmd.instances);
        });
    });
}

/// Benchmark: four worker threads fill queues; one thread merges, sorts,
/// and dispatches.
fn bench_parallel_merge_10k(c: &mut Criterion) {
    const WORKERS: usize = 4;
    let profile = reference_profile();
    let objects = generate_scene(&profile, 9);
    let chunk = objects.len().div_ceil(WORKERS);
    let mut merged = RenderQueue::with_config(profile.queue_config()).unwrap();

    c.bench_function("parallel_merge_10k", |b| {
        b.iter(|| {
            let (tx, rx) = bounded(WORKERS);
            thread::scope(|s| {
                for (index, part) in objects.chunks(chunk).enumerate() {
                    let tx = tx.clone();
                    let config = profile.queue_config();
                    s.spawn(move || {
                        let mut queue = RenderQueue::with_config(config).unwrap();
                        fill_queue(&mut queue, &RenderParameters::default(), part).unwrap();
                        tx.send((index, queue)).unwrap();
                    });
                }
            });
            drop(tx);

            let mut parts: Vec<_> = rx.iter().collect();
            parts.sort_by_key(|(index, _)| *index);
            merged.reset();
            for (_, part) in &parts {
                merged.combine_render_info(part).unwrap();
            }
            let mut cmd = NullStream::default();
            render_frame(&mut merged, &mut cmd);
            black_box(cmd.draws);
        });
    });
}

criterion_group!(
    benches,
    bench_frame_10k,
    bench_frame_200k,
    bench_dispatch_10k,
    bench_parallel_merge_10k
);
criterion_main!(benches);
