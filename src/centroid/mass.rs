//! Masked intensity-weighted center of mass.

use super::Centroid;
use crate::image::{ImageView, Sample};
use crate::threshold::OtsuThreshold;

/// First moments of the masked intensity over a set of rows.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Moments {
    sum_w: f64,
    sum_wy: f64,
    sum_wx: f64,
}

impl Moments {
    pub(crate) fn of_row<T: Sample>(row: &[T], y: usize, threshold: &OtsuThreshold) -> Self {
        let mut out = Self::default();
        for (x, &sample) in row.iter().enumerate() {
            let value = sample.to_f64();
            if threshold.is_foreground(value) {
                out.sum_w += value;
                out.sum_wx += value * x as f64;
            }
        }
        out.sum_wy = out.sum_w * y as f64;
        out
    }

    pub(crate) fn merge(self, other: Self) -> Self {
        Self {
            sum_w: self.sum_w + other.sum_w,
            sum_wy: self.sum_wy + other.sum_wy,
            sum_wx: self.sum_wx + other.sum_wx,
        }
    }

    /// Returns the centroid, or `None` when there is no positive mass.
    pub(crate) fn centroid(self) -> Option<Centroid> {
        if self.sum_w > 0.0 {
            Some(Centroid::new(
                self.sum_wy / self.sum_w,
                self.sum_wx / self.sum_w,
            ))
        } else {
            None
        }
    }
}

/// Center of mass of `view` after zeroing every sample below `threshold`.
///
/// Coordinates are relative to `view`. Returns `None` when the masked image
/// carries no mass.
pub fn center_of_mass<T: Sample>(
    view: ImageView<'_, T>,
    threshold: &OtsuThreshold,
) -> Option<Centroid> {
    view.rows()
        .enumerate()
        .map(|(y, row)| Moments::of_row(row, y, threshold))
        .fold(Moments::default(), Moments::merge)
        .centroid()
}

/// Row-parallel variant of [`center_of_mass`].
///
/// Summation order differs from the sequential path, so results agree to
/// floating-point rounding rather than bit-for-bit.
#[cfg(feature = "rayon")]
pub fn center_of_mass_par<T: Sample>(
    view: ImageView<'_, T>,
    threshold: &OtsuThreshold,
) -> Option<Centroid> {
    use rayon::prelude::*;

    (0..view.height())
        .into_par_iter()
        .filter_map(|y| view.row(y).map(|row| Moments::of_row(row, y, threshold)))
        .reduce(Moments::default, Moments::merge)
        .centroid()
}
