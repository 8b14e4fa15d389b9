//! Beam centroid estimation.
//!
//! The estimator thresholds the image with Otsu's method, zeroes everything
//! below the threshold and returns the intensity-weighted center of mass of
//! what remains, as `(row, col)` in full-image coordinates.
//!
//! Two inputs have no meaningful centroid: a flat image (no threshold split)
//! and a masked image with zero mass. Both fall back to the geometric center
//! `(height / 2, width / 2)` and are reported through [`Degeneracy`] rather
//! than as errors.

mod mass;

#[cfg(feature = "rayon")]
pub use mass::center_of_mass_par;
pub use mass::center_of_mass;

use crate::image::{ImageView, Sample};
use crate::threshold::{Histogram, OtsuThreshold, DEFAULT_BINS};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{BeamDeltaError, BeamDeltaResult};
use std::fmt;
use std::ops::Sub;

/// Sub-pixel position in image coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Centroid {
    /// Vertical coordinate (first axis).
    pub row: f64,
    /// Horizontal coordinate (second axis).
    pub col: f64,
}

impl Centroid {
    /// Creates a centroid from `(row, col)`.
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }

    /// Geometric center of a `height x width` grid.
    pub fn geometric_center(height: usize, width: usize) -> Self {
        Self::new(height as f64 / 2.0, width as f64 / 2.0)
    }

    fn translated(self, d_row: f64, d_col: f64) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }
}

impl Sub for Centroid {
    type Output = Offset;

    fn sub(self, reference: Centroid) -> Offset {
        Offset {
            d_row: self.row - reference.row,
            d_col: self.col - reference.col,
        }
    }
}

/// Componentwise difference `current - reference`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Offset {
    /// Row (vertical) distance.
    pub d_row: f64,
    /// Column (horizontal) distance.
    pub d_col: f64,
}

impl Offset {
    /// No displacement.
    pub const ZERO: Offset = Offset {
        d_row: 0.0,
        d_col: 0.0,
    };

    /// Horizontal distance, as shown to the operator.
    pub fn x(&self) -> f64 {
        self.d_col
    }

    /// Vertical distance, as shown to the operator.
    pub fn y(&self) -> f64 {
        self.d_row
    }

    /// Euclidean length of the offset in pixels.
    pub fn magnitude(&self) -> f64 {
        self.d_row.hypot(self.d_col)
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X distance = {:.6}, Y distance = {:.6}", self.x(), self.y())
    }
}

/// Reason an estimate fell back to the geometric center.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Degeneracy {
    /// Every sample in the estimation region has the same value.
    FlatImage,
    /// Nothing with positive intensity survived thresholding.
    ZeroMass,
}

impl Degeneracy {
    /// Stable lowercase name for logs and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Degeneracy::FlatImage => "flat_image",
            Degeneracy::ZeroMass => "zero_mass",
        }
    }
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single estimation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Estimate {
    /// Estimated beam center in full-image coordinates.
    pub centroid: Centroid,
    /// Set when the centroid is a geometric-center fallback.
    pub degeneracy: Option<Degeneracy>,
}

impl Estimate {
    /// Returns true when the estimate is a fallback.
    pub fn is_degenerate(&self) -> bool {
        self.degeneracy.is_some()
    }
}

/// Configuration for [`CentroidEstimator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EstimatorConfig {
    /// Samples within this many pixels of any border are ignored.
    pub edge_margin: usize,
    /// Histogram bins used for Otsu's method (at least 2).
    pub bins: usize,
    /// Sum moments row-parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            edge_margin: 0,
            bins: DEFAULT_BINS,
            parallel: false,
        }
    }
}

/// Otsu + center-of-mass beam centroid estimator.
///
/// Stateless apart from its configuration; repeated calls on the same image
/// return identical results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CentroidEstimator {
    cfg: EstimatorConfig,
}

impl CentroidEstimator {
    /// Creates an estimator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the estimator configuration.
    pub fn with_config(mut self, cfg: EstimatorConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &EstimatorConfig {
        &self.cfg
    }

    /// Estimates the beam centroid of `image`.
    pub fn estimate<T: Sample>(&self, image: ImageView<'_, T>) -> BeamDeltaResult<Estimate> {
        let (height, width) = image.shape();
        let _span = trace_span!("estimate_centroid", width = width, height = height).entered();

        let margin = self.cfg.edge_margin;
        let region = self.region(image)?;
        let hist = Histogram::from_view(region, self.cfg.bins).map_err(|err| match err {
            BeamDeltaError::NonFiniteSample { x, y } => BeamDeltaError::NonFiniteSample {
                x: x + margin,
                y: y + margin,
            },
            BeamDeltaError::NegativeSample { x, y } => BeamDeltaError::NegativeSample {
                x: x + margin,
                y: y + margin,
            },
            other => other,
        })?;

        let fallback = Centroid::geometric_center(height, width);
        let Some(threshold) = OtsuThreshold::from_histogram(&hist) else {
            return Ok(degenerate(fallback, Degeneracy::FlatImage));
        };
        trace_event!("otsu_threshold", value = threshold.value());

        match self.masked_center_of_mass(region, &threshold) {
            Some(centroid) => {
                let centroid = centroid.translated(margin as f64, margin as f64);
                trace_event!("centroid", row = centroid.row, col = centroid.col);
                Ok(Estimate {
                    centroid,
                    degeneracy: None,
                })
            }
            None => Ok(degenerate(fallback, Degeneracy::ZeroMass)),
        }
    }

    fn region<'a, T>(&self, image: ImageView<'a, T>) -> BeamDeltaResult<ImageView<'a, T>> {
        let margin = self.cfg.edge_margin;
        if margin == 0 {
            return Ok(image);
        }
        let (height, width) = image.shape();
        let span = margin.saturating_mul(2);
        if span >= width || span >= height {
            return Err(BeamDeltaError::MarginTooLarge {
                margin,
                width,
                height,
            });
        }
        image.roi(margin, margin, width - span, height - span)
    }

    fn masked_center_of_mass<T: Sample>(
        &self,
        region: ImageView<'_, T>,
        threshold: &OtsuThreshold,
    ) -> Option<Centroid> {
        #[cfg(feature = "rayon")]
        {
            if self.cfg.parallel {
                return center_of_mass_par(region, threshold);
            }
        }
        center_of_mass(region, threshold)
    }
}

fn degenerate(centroid: Centroid, kind: Degeneracy) -> Estimate {
    trace_warn!("degenerate_image", kind = kind.as_str());
    Estimate {
        centroid,
        degeneracy: Some(kind),
    }
}

/// Estimates the centroid of `image` with the default configuration.
pub fn estimate_centroid<T: Sample>(image: ImageView<'_, T>) -> BeamDeltaResult<Centroid> {
    CentroidEstimator::new()
        .estimate(image)
        .map(|estimate| estimate.centroid)
}

#[cfg(test)]
mod tests {
    use super::{Centroid, CentroidEstimator, Degeneracy, EstimatorConfig, Offset};
    use crate::image::ImageView;

    #[test]
    fn offset_is_current_minus_reference() {
        let offset = Centroid::new(5.0, 3.0) - Centroid::new(2.0, 4.5);
        assert_eq!(
            offset,
            Offset {
                d_row: 3.0,
                d_col: -1.5
            }
        );
        assert_eq!(offset.x(), -1.5);
        assert_eq!(offset.y(), 3.0);
        assert_eq!(
            offset.to_string(),
            "X distance = -1.500000, Y distance = 3.000000"
        );
    }

    #[test]
    fn margin_that_covers_the_image_is_rejected() {
        let data = [0u8; 16];
        let view = ImageView::from_slice(&data, 4, 4).unwrap();
        let estimator = CentroidEstimator::new().with_config(EstimatorConfig {
            edge_margin: 2,
            ..EstimatorConfig::default()
        });
        assert!(estimator.estimate(view).unwrap_err().is_invalid_input());
    }

    #[test]
    fn flat_cropped_region_reports_full_grid_center() {
        let mut data = vec![5u8; 10 * 12];
        data[0] = 255;
        let view = ImageView::from_slice(&data, 12, 10).unwrap();
        let estimator = CentroidEstimator::new().with_config(EstimatorConfig {
            edge_margin: 1,
            ..EstimatorConfig::default()
        });

        let estimate = estimator.estimate(view).unwrap();
        assert_eq!(estimate.degeneracy, Some(Degeneracy::FlatImage));
        assert_eq!(estimate.centroid, Centroid::new(5.0, 6.0));
    }
}
