//! Error types for beamdelta.

use thiserror::Error;

/// Result alias for beamdelta operations.
pub type BeamDeltaResult<T> = std::result::Result<T, BeamDeltaError>;

/// Errors that can occur when estimating or tracking beam centroids.
///
/// Degenerate images (flat intensity, no mass above threshold) are not
/// errors; they are reported through [`crate::Degeneracy`] instead.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BeamDeltaError {
    /// Width or height is zero, or the buffer size overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the declared shape requires.
    #[error("buffer too small: needed {needed} samples, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The edge margin leaves no samples to estimate from.
    #[error("edge margin {margin} leaves no samples in a {width}x{height} image")]
    MarginTooLarge {
        margin: usize,
        width: usize,
        height: usize,
    },
    /// A sample is NaN or infinite.
    #[error("non-finite sample at ({x}, {y})")]
    NonFiniteSample { x: usize, y: usize },
    /// A sample is below zero.
    #[error("negative sample at ({x}, {y})")]
    NegativeSample { x: usize, y: usize },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// The tracker has not processed an image yet.
    #[error("state unavailable: {0}")]
    StateUnavailable(&'static str),
    /// Image decoding failed.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
    /// An imaging device failed to acquire or change state.
    #[error("device error: {reason}")]
    Device { reason: String },
}

impl BeamDeltaError {
    /// Returns true for errors caused by malformed input grids.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidDimensions { .. }
                | Self::InvalidStride { .. }
                | Self::BufferTooSmall { .. }
                | Self::MarginTooLarge { .. }
                | Self::NonFiniteSample { .. }
                | Self::NegativeSample { .. }
                | Self::InvalidInput(_)
        )
    }
}
