//! Equal-width intensity histogram over an image view.

use crate::image::{ImageView, Sample};
use crate::util::{BeamDeltaError, BeamDeltaResult};

/// Intensity histogram with `bins` equal-width bins spanning `[min, max]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    counts: Vec<u64>,
    min: f64,
    max: f64,
    bin_width: f64,
}

impl Histogram {
    /// Builds a histogram over every sample of `view`.
    ///
    /// Fails on fewer than two bins or on a non-finite or negative sample;
    /// the reported coordinates are relative to `view`.
    pub fn from_view<T: Sample>(view: ImageView<'_, T>, bins: usize) -> BeamDeltaResult<Self> {
        if bins < 2 {
            return Err(BeamDeltaError::InvalidInput(
                "histogram needs at least two bins",
            ));
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for (y, row) in view.rows().enumerate() {
            for (x, &sample) in row.iter().enumerate() {
                let value = sample.to_f64();
                if !value.is_finite() {
                    return Err(BeamDeltaError::NonFiniteSample { x, y });
                }
                if value < 0.0 {
                    return Err(BeamDeltaError::NegativeSample { x, y });
                }
                min = min.min(value);
                max = max.max(value);
            }
        }

        let bin_width = (max - min) / bins as f64;
        let mut hist = Self {
            counts: vec![0; bins],
            min,
            max,
            bin_width,
        };
        for row in view.rows() {
            for &sample in row {
                let bin = hist.bin_of(sample.to_f64());
                hist.counts[bin] += 1;
            }
        }
        Ok(hist)
    }

    /// Returns the per-bin sample counts.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Returns the number of bins.
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Returns the total number of samples.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Returns the smallest sample value.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Returns the largest sample value.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Returns the width of one bin in intensity units.
    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Returns true when every sample has the same value.
    pub fn is_flat(&self) -> bool {
        self.max <= self.min
    }

    /// Returns the bin a value falls into, clamped to the histogram range.
    #[inline]
    pub fn bin_of(&self, value: f64) -> usize {
        bin_index(value, self.min, self.bin_width, self.bins())
    }

    /// Returns the lower intensity edge of `bin`.
    pub fn lower_edge(&self, bin: usize) -> f64 {
        self.min + bin as f64 * self.bin_width
    }
}

/// Bin lookup shared with the threshold so masking agrees with the histogram.
#[inline]
pub(crate) fn bin_index(value: f64, min: f64, bin_width: f64, bins: usize) -> usize {
    if bin_width <= 0.0 {
        return 0;
    }
    // Saturating float->int cast maps values below `min` (and NaN) to bin 0.
    let bin = ((value - min) / bin_width) as usize;
    bin.min(bins - 1)
}
