//! Numeric sample types accepted by the estimator.

/// A pixel intensity that can be read as `f64`.
///
/// Implemented for the integer and float formats scientific cameras commonly
/// deliver. Negative values are rejected by the estimator as invalid input.
pub trait Sample: Copy + Send + Sync + 'static {
    /// Converts the sample to `f64` for histogramming and mass accumulation.
    fn to_f64(self) -> f64;
}

macro_rules! impl_sample_lossless {
    ($($ty:ty),*) => {
        $(
            impl Sample for $ty {
                #[inline]
                fn to_f64(self) -> f64 {
                    f64::from(self)
                }
            }
        )*
    };
}

impl_sample_lossless!(u8, u16, u32, f32, f64);
