//! Low-level building blocks for custom centroiding pipelines.
//!
//! These expose the histogram, threshold and masked center-of-mass steps the
//! estimator is built from. Most users should prefer [`crate::CentroidEstimator`].

#[cfg(feature = "rayon")]
pub use crate::centroid::center_of_mass_par;
pub use crate::centroid::center_of_mass;
pub use crate::threshold::{otsu_threshold, Histogram, OtsuThreshold, DEFAULT_BINS};
