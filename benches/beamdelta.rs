use beamdelta::lowlevel::otsu_threshold;
use beamdelta::{AlignmentTracker, Centroid, CentroidEstimator, EstimatorConfig, SpotImager};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn bench_estimator(c: &mut Criterion) {
    let mut camera = SpotImager::new(1280, 1024, 15.0).unwrap();
    camera.set_spot(Centroid::new(480.4, 701.9));
    let frame = camera.render().unwrap();
    let view = frame.view();

    c.bench_function("otsu_threshold_1280x1024", |b| {
        b.iter(|| otsu_threshold(black_box(view), 256).unwrap())
    });

    let estimator = CentroidEstimator::new();
    c.bench_function("estimate_1280x1024", |b| {
        b.iter(|| estimator.estimate(black_box(view)).unwrap())
    });

    let cropped = CentroidEstimator::new().with_config(EstimatorConfig {
        edge_margin: 10,
        ..EstimatorConfig::default()
    });
    c.bench_function("estimate_1280x1024_margin10", |b| {
        b.iter(|| cropped.estimate(black_box(view)).unwrap())
    });

    if cfg!(feature = "rayon") {
        let parallel = CentroidEstimator::new().with_config(EstimatorConfig {
            parallel: true,
            ..EstimatorConfig::default()
        });
        c.bench_function("estimate_1280x1024_parallel", |b| {
            b.iter(|| parallel.estimate(black_box(view)).unwrap())
        });
    }
}

fn bench_tracker(c: &mut Criterion) {
    let mut camera = SpotImager::new(640, 512, 8.0).unwrap();
    camera.set_spot(Centroid::new(250.0, 330.0));
    let frame = camera.render().unwrap();
    let mut tracker = AlignmentTracker::default();

    c.bench_function("tracker_on_new_image_640x512", |b| {
        b.iter(|| tracker.on_new_image(black_box(frame.view())).unwrap())
    });
}

criterion_group!(benches, bench_estimator, bench_tracker);
criterion_main!(benches);
