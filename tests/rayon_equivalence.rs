#![cfg(feature = "rayon")]

use beamdelta::lowlevel::{center_of_mass, center_of_mass_par, otsu_threshold};
use beamdelta::{Centroid, CentroidEstimator, EstimatorConfig, SpotImager};

fn assert_close(a: Centroid, b: Centroid) {
    assert!(
        (a.row - b.row).abs() < 1e-9 && (a.col - b.col).abs() < 1e-9,
        "sequential {a:?} vs parallel {b:?}"
    );
}

#[test]
fn parallel_mass_matches_sequential() {
    let mut camera = SpotImager::new(640, 480, 12.0).unwrap();
    camera.set_spot(Centroid::new(201.3, 377.8));
    let frame = camera.render().unwrap();
    let view = frame.view();

    let thresh = otsu_threshold(view, 256).unwrap().unwrap();
    let seq = center_of_mass(view, &thresh).unwrap();
    let par = center_of_mass_par(view, &thresh).unwrap();
    assert_close(seq, par);
}

#[test]
fn parallel_estimator_matches_sequential_with_margin() {
    let mut camera = SpotImager::new(300, 200, 6.0).unwrap();
    camera.set_spot(Centroid::new(57.0, 240.5));
    let frame = camera.render().unwrap();

    let base = EstimatorConfig {
        edge_margin: 10,
        ..EstimatorConfig::default()
    };
    let sequential = CentroidEstimator::new().with_config(base);
    let parallel = CentroidEstimator::new().with_config(EstimatorConfig {
        parallel: true,
        ..base
    });

    let a = sequential.estimate(frame.view()).unwrap();
    let b = parallel.estimate(frame.view()).unwrap();
    assert_eq!(a.degeneracy, b.degeneracy);
    assert_close(a.centroid, b.centroid);
}
