//! Properties of the Otsu + center-of-mass estimator on synthetic frames.

use beamdelta::lowlevel::{center_of_mass, otsu_threshold};
use beamdelta::{
    estimate_centroid, BeamDeltaError, Centroid, CentroidEstimator, Degeneracy, EstimatorConfig,
    ImageView, OwnedImage, SpotImager,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Position tolerance in pixels for block and spot targets.
const POSITION_TOLERANCE_PX: f64 = 0.5;

fn block_image(
    width: usize,
    height: usize,
    rows: std::ops::Range<usize>,
    cols: std::ops::Range<usize>,
    background: u8,
    value: u8,
) -> Vec<u8> {
    let mut data = vec![background; width * height];
    for y in rows {
        for x in cols.clone() {
            data[y * width + x] = value;
        }
    }
    data
}

fn assert_near(actual: Centroid, row: f64, col: f64, tol: f64) {
    assert!(
        (actual.row - row).abs() <= tol && (actual.col - col).abs() <= tol,
        "expected ({row}, {col}) within {tol}, got ({}, {})",
        actual.row,
        actual.col
    );
}

#[test]
fn centered_block_matches_reference_scenario() {
    let data = block_image(20, 20, 8..12, 8..12, 0, 255);
    let view = ImageView::from_slice(&data, 20, 20).unwrap();

    let estimate = CentroidEstimator::new().estimate(view).unwrap();
    assert!(!estimate.is_degenerate());
    assert_near(estimate.centroid, 9.5, 9.5, 1e-9);
}

#[test]
fn off_center_blocks_land_on_their_geometric_center() {
    let cases = [
        (40, 30, 2..6, 30..37),
        (64, 48, 40..47, 3..5),
        (17, 23, 10..11, 10..11),
    ];
    for (width, height, rows, cols) in cases {
        let expected_row = (rows.start + rows.end - 1) as f64 / 2.0;
        let expected_col = (cols.start + cols.end - 1) as f64 / 2.0;
        let data = block_image(width, height, rows, cols, 12, 200);
        let view = ImageView::from_slice(&data, width, height).unwrap();

        let centroid = estimate_centroid(view).unwrap();
        assert_near(centroid, expected_row, expected_col, POSITION_TOLERANCE_PX);
    }
}

#[test]
fn block_on_noisy_background_is_located() {
    let width = 80;
    let height = 60;
    let mut rng = StdRng::seed_from_u64(7);
    let mut data: Vec<u16> = (0..width * height)
        .map(|_| 200 + rng.random_range(0..40u16))
        .collect();
    for y in 20..30 {
        for x in 50..62 {
            data[y * width + x] = 3000 + rng.random_range(0..100u16);
        }
    }
    let view = ImageView::from_slice(&data, width, height).unwrap();

    let centroid = estimate_centroid(view).unwrap();
    assert_near(centroid, 24.5, 55.5, POSITION_TOLERANCE_PX);
}

#[test]
fn gaussian_spot_is_located_subpixel() {
    let mut camera = SpotImager::new(96, 72, 4.0).unwrap();
    camera.set_spot(Centroid::new(30.25, 61.75));
    let frame = camera.render().unwrap();

    let centroid = estimate_centroid(frame.view()).unwrap();
    assert_near(centroid, 30.25, 61.75, 0.1);
}

#[test]
fn uniform_grid_returns_geometric_center() {
    let data = [77u8; 15 * 8];
    let view = ImageView::from_slice(&data, 15, 8).unwrap();

    let estimate = CentroidEstimator::new().estimate(view).unwrap();
    assert_eq!(estimate.degeneracy, Some(Degeneracy::FlatImage));
    assert_eq!(estimate.centroid, Centroid::new(4.0, 7.5));
}

#[test]
fn masked_center_of_mass_without_foreground_is_none() {
    // Threshold learned on a frame with a bright block, applied to a frame
    // whose samples all sit in the background bin.
    let bright = block_image(6, 6, 2..4, 2..4, 0, 200);
    let threshold = otsu_threshold(ImageView::from_slice(&bright, 6, 6).unwrap(), 256)
        .unwrap()
        .unwrap();

    let dark = vec![0u8; 6 * 6];
    assert_eq!(
        center_of_mass(ImageView::from_slice(&dark, 6, 6).unwrap(), &threshold),
        None
    );
    assert_eq!(
        center_of_mass(ImageView::from_slice(&bright, 6, 6).unwrap(), &threshold),
        Some(Centroid::new(2.5, 2.5))
    );
}

#[test]
fn estimation_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(42);
    let data: Vec<u8> = (0..50 * 40).map(|_| rng.random()).collect();
    let view = ImageView::from_slice(&data, 50, 40).unwrap();
    let estimator = CentroidEstimator::new();

    let first = estimator.estimate(view).unwrap();
    let second = estimator.estimate(view).unwrap();
    assert_eq!(first, second);
}

#[test]
fn border_pixel_is_ignored_only_with_edge_margin() {
    let width = 30;
    let height = 30;
    let mut data = block_image(width, height, 14..18, 14..18, 0, 200);
    data[5] = 255;
    let view = ImageView::from_slice(&data, width, height).unwrap();

    let with_margin = CentroidEstimator::new().with_config(EstimatorConfig {
        edge_margin: 1,
        ..EstimatorConfig::default()
    });
    let cropped = with_margin.estimate(view).unwrap();
    assert_near(cropped.centroid, 15.5, 15.5, 1e-9);

    let uncropped = CentroidEstimator::new().estimate(view).unwrap();
    assert!(uncropped.centroid.row < 15.0);
}

#[test]
fn edge_margin_reports_full_grid_coordinates() {
    let data = block_image(40, 40, 20..24, 4..8, 0, 180);
    let view = ImageView::from_slice(&data, 40, 40).unwrap();
    let estimator = CentroidEstimator::new().with_config(EstimatorConfig {
        edge_margin: 3,
        ..EstimatorConfig::default()
    });

    let estimate = estimator.estimate(view).unwrap();
    assert_near(estimate.centroid, 21.5, 5.5, 1e-9);
}

#[test]
fn oversized_margin_is_invalid_input() {
    let data = [0u8; 20 * 20];
    let view = ImageView::from_slice(&data, 20, 20).unwrap();
    let estimator = CentroidEstimator::new().with_config(EstimatorConfig {
        edge_margin: 10,
        ..EstimatorConfig::default()
    });

    assert_eq!(
        estimator.estimate(view).unwrap_err(),
        BeamDeltaError::MarginTooLarge {
            margin: 10,
            width: 20,
            height: 20,
        }
    );
}

#[test]
fn non_finite_samples_are_rejected_with_full_grid_position() {
    let mut data = vec![1.0f32; 8 * 8];
    data[4 * 8 + 5] = f32::INFINITY;
    let view = ImageView::from_slice(&data, 8, 8).unwrap();
    let estimator = CentroidEstimator::new().with_config(EstimatorConfig {
        edge_margin: 2,
        ..EstimatorConfig::default()
    });

    assert_eq!(
        estimator.estimate(view).unwrap_err(),
        BeamDeltaError::NonFiniteSample { x: 5, y: 4 }
    );
}

#[test]
fn negative_samples_are_rejected() {
    let mut data = vec![-10.0f64; 10 * 10];
    data[0] = -1.0;
    data[9] = 1.01;
    let view = ImageView::from_slice(&data, 10, 10).unwrap();

    let err = estimate_centroid(view).unwrap_err();
    assert_eq!(err, BeamDeltaError::NegativeSample { x: 0, y: 0 });
    assert!(err.is_invalid_input());
}

#[test]
fn negative_samples_are_reported_with_full_grid_position() {
    let mut data = vec![2.0f32; 8 * 8];
    data[3 * 8 + 4] = -0.5;
    data[0] = -3.0;
    let view = ImageView::from_slice(&data, 8, 8).unwrap();
    let estimator = CentroidEstimator::new().with_config(EstimatorConfig {
        edge_margin: 2,
        ..EstimatorConfig::default()
    });

    assert_eq!(
        estimator.estimate(view).unwrap_err(),
        BeamDeltaError::NegativeSample { x: 4, y: 3 }
    );
}

#[test]
fn strided_view_estimates_like_contiguous_copy() {
    let width = 24;
    let height = 18;
    let stride = 32;
    let packed = block_image(width, height, 3..9, 11..20, 5, 150);
    let mut padded = vec![255u8; stride * height];
    for y in 0..height {
        padded[y * stride..y * stride + width].copy_from_slice(&packed[y * width..(y + 1) * width]);
    }

    let strided = ImageView::new(&padded, width, height, stride).unwrap();
    let owned = OwnedImage::from_view(strided).unwrap();
    assert_eq!(
        estimate_centroid(strided).unwrap(),
        estimate_centroid(owned.view()).unwrap()
    );
}

#[test]
fn threshold_separates_block_from_background() {
    let data = block_image(20, 20, 8..12, 8..12, 30, 220);
    let view = ImageView::from_slice(&data, 20, 20).unwrap();

    let thresh = otsu_threshold(view, 256).unwrap().unwrap();
    assert!(thresh.value() > 30.0 && thresh.value() <= 220.0);
    assert!(!thresh.is_foreground(30.0));
    assert!(thresh.is_foreground(220.0));
}

#[test]
fn single_bin_configuration_is_rejected() {
    let data = block_image(10, 10, 2..4, 2..4, 0, 100);
    let view = ImageView::from_slice(&data, 10, 10).unwrap();
    let estimator = CentroidEstimator::new().with_config(EstimatorConfig {
        bins: 1,
        ..EstimatorConfig::default()
    });

    assert!(estimator.estimate(view).unwrap_err().is_invalid_input());
}
