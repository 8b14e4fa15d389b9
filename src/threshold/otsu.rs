//! Otsu's threshold selection.
//!
//! For every split `k` the histogram is divided into a background class
//! (bins `0..=k`) and a foreground class (bins `k+1..`). The chosen split
//! maximizes the between-class variance `w0 * w1 * (mu0 - mu1)^2`, which is
//! equivalent to minimizing the weighted intra-class variance. Ties resolve
//! to the lowest split, so empty bins between the two populations fall to the
//! foreground side.

use super::histogram::{bin_index, Histogram};
use crate::image::{ImageView, Sample};
use crate::util::BeamDeltaResult;

/// Threshold selected by Otsu's method.
///
/// Foreground membership is decided by bin index rather than by comparing
/// against [`OtsuThreshold::value`], so the mask is always consistent with the
/// histogram the split was computed on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OtsuThreshold {
    min: f64,
    bin_width: f64,
    bins: usize,
    split: usize,
}

impl OtsuThreshold {
    /// Selects the threshold for a histogram.
    ///
    /// Returns `None` when no split separates two non-empty classes, which
    /// happens exactly when the image is flat.
    pub fn from_histogram(hist: &Histogram) -> Option<Self> {
        if hist.is_flat() {
            return None;
        }

        let counts = hist.counts();
        let total = hist.total() as f64;
        let sum_all: f64 = counts
            .iter()
            .enumerate()
            .map(|(bin, &count)| bin as f64 * count as f64)
            .sum();

        let mut weight_b = 0.0f64;
        let mut sum_b = 0.0f64;
        let mut best: Option<(usize, f64)> = None;

        for (bin, &count) in counts.iter().enumerate().take(counts.len() - 1) {
            weight_b += count as f64;
            sum_b += bin as f64 * count as f64;
            if weight_b == 0.0 {
                continue;
            }
            let weight_f = total - weight_b;
            if weight_f == 0.0 {
                break;
            }

            let mean_b = sum_b / weight_b;
            let mean_f = (sum_all - sum_b) / weight_f;
            let variance = weight_b * weight_f * (mean_b - mean_f).powi(2);
            if best.map_or(true, |(_, v)| variance > v) {
                best = Some((bin, variance));
            }
        }

        best.filter(|&(_, variance)| variance > 0.0)
            .map(|(split, _)| Self {
                min: hist.min(),
                bin_width: hist.bin_width(),
                bins: hist.bins(),
                split,
            })
    }

    /// Threshold in intensity units: the lower edge of the first foreground bin.
    pub fn value(&self) -> f64 {
        self.min + (self.split + 1) as f64 * self.bin_width
    }

    /// Index of the last background bin.
    pub fn split_bin(&self) -> usize {
        self.split
    }

    /// Returns true when `value` is at or above the threshold.
    #[inline]
    pub fn is_foreground(&self, value: f64) -> bool {
        bin_index(value, self.min, self.bin_width, self.bins) > self.split
    }
}

/// Computes Otsu's threshold over `view` using `bins` histogram bins.
///
/// `Ok(None)` signals a flat image with no valid split.
pub fn otsu_threshold<T: Sample>(
    view: ImageView<'_, T>,
    bins: usize,
) -> BeamDeltaResult<Option<OtsuThreshold>> {
    let hist = Histogram::from_view(view, bins)?;
    Ok(OtsuThreshold::from_histogram(&hist))
}
