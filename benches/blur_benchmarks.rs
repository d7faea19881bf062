//! Performance benchmarks for the blur check
//!
//! Run with: cargo bench
//!
//! The check runs on every shutter press, so a 1080p frame should stay
//! well inside a single UI frame budget.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ecolumina_capture::testing::{noise_frame, uniform_rgba_frame};
use ecolumina_capture::{BlurDetector, CaptureGate, CaptureMode};
use std::time::Duration;

fn bench_blur_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("Blur Detection");
    group.measurement_time(Duration::from_secs(10));

    let detector = BlurDetector::default();
    for (width, height) in [(640, 480), (1280, 720), (1920, 1080)] {
        let frame = noise_frame(1, width, height);
        group.throughput(Throughput::Bytes(frame.data.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("is_blurry", format!("{}x{}", width, height)),
            &frame,
            |b, frame| b.iter(|| detector.is_blurry(black_box(frame))),
        );
    }

    let canvas = uniform_rgba_frame(1280, 720, 128);
    group.bench_function("is_blurry_rgba_1280x720", |b| {
        b.iter(|| detector.is_blurry(black_box(&canvas)))
    });

    group.finish();
}

fn bench_capture(c: &mut Criterion) {
    let mut group = c.benchmark_group("Capture");
    group.sample_size(20);

    let gate = CaptureGate::default();
    let frame = noise_frame(2, 1280, 720);
    group.bench_function("strict_capture_1280x720", |b| {
        b.iter(|| gate.capture(black_box(&frame), CaptureMode::Strict))
    });

    group.finish();
}

criterion_group!(benches, bench_blur_detection, bench_capture);
criterion_main!(benches);
