//! Intensity histograms and automatic threshold selection.
//!
//! The histogram spans the observed `[min, max]` range of the image with
//! equal-width bins. Otsu's method picks the split between two bins; samples
//! whose bin lies above the split are foreground.

mod histogram;
mod otsu;

pub use histogram::Histogram;
pub use otsu::{otsu_threshold, OtsuThreshold};

/// Default number of histogram bins, matching 8-bit camera depth.
pub const DEFAULT_BINS: usize = 256;
