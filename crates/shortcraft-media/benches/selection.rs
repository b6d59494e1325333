//! Segment Selection Benchmarks
//!
//! Measures the scoring and selection pipeline on synthetic timelines.
//!
//! # Running Benchmarks
//! ```bash
//! cargo bench --package shortcraft-media --bench selection
//! ```
//!
//! # Metrics Measured
//! - Partition + score + select latency per timeline
//! - Selection latency as candidate count grows
//! - Frame activity scoring throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

use shortcraft_media::activity::FrameBuffer;
use shortcraft_media::analyzer::analyze_timeline;
use shortcraft_media::selection::{select_segments, SelectionOptions};
use shortcraft_media::signals::WindowSignals;
use shortcraft_models::{ScoredWindow, SignalScores, TargetDuration, Window};

/// Evenly spaced candidates with a sawtooth score profile.
fn synthetic_candidates(count: usize) -> Vec<ScoredWindow> {
    (0..count)
        .map(|i| {
            let start = i as f64 * 3.0;
            let face = 0.2 + 0.7 * ((i % 7) as f64 / 6.0);
            ScoredWindow::new(
                Window::new(start, start + 3.0),
                SignalScores::new(face, 0.5, 0.5),
            )
        })
        .collect()
}

fn bench_analyze_timeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_timeline");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    let durations = [30.0, 120.0, 600.0, 3600.0];

    for duration in durations {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("full_pipeline", format!("{}s", duration as u64)),
            &duration,
            |b, &duration| {
                b.iter(|| {
                    let mut rng = StdRng::seed_from_u64(42);
                    let result = analyze_timeline(
                        black_box(duration),
                        TargetDuration::S30,
                        &SelectionOptions::default(),
                        |_| WindowSignals::empty(),
                        &mut rng,
                    );
                    black_box(result)
                })
            },
        );
    }

    group.finish();
}

fn bench_select_segments(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_segments");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    let candidate_counts = [5, 10, 50, 200];

    for count in candidate_counts {
        let candidates = synthetic_candidates(count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::new("greedy", format!("{}_candidates", count)),
            &candidates,
            |b, candidates| {
                b.iter(|| {
                    let result = select_segments(
                        black_box(candidates),
                        TargetDuration::S30,
                        &SelectionOptions::default(),
                    );
                    black_box(result)
                })
            },
        );
    }

    group.finish();
}

fn bench_activity_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("activity_score");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    let resolutions = [(64u32, 64u32), (640, 360), (1920, 1080)];

    for (width, height) in resolutions {
        let luma: Vec<u8> = (0..width as usize * height as usize)
            .map(|i| ((i * 7) % 256) as u8)
            .collect();
        let frame = FrameBuffer::from_luma(width, height, luma).unwrap();

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("sampled_grid", format!("{}x{}", width, height)),
            &frame,
            |b, frame| {
                b.iter(|| {
                    let score = black_box(frame).activity_score();
                    black_box(score)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_analyze_timeline,
    bench_select_segments,
    bench_activity_score,
);

criterion_main!(benches);
