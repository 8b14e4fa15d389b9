//! Imaging device abstraction.
//!
//! A camera is anything that reports a fixed sensor shape, can be switched on
//! and off, takes an exposure time, and hands back one frame per blocking
//! `acquire` call. Real camera
//! clients live outside this crate; the implementations here replay recorded
//! frames or synthesize a beam spot.

mod sequence;
mod spot;

pub use sequence::FrameSequence;
pub use spot::SpotImager;

use crate::image::{OwnedImage, Sample};
use crate::util::{BeamDeltaError, BeamDeltaResult};

/// Source of camera frames.
pub trait Imager {
    /// Pixel type produced by the sensor.
    type Sample: Sample;

    /// Sensor shape as `(height, width)`.
    fn shape(&self) -> (usize, usize);

    /// Starts acquisition.
    fn enable(&mut self) -> BeamDeltaResult<()>;

    /// Stops acquisition.
    fn disable(&mut self) -> BeamDeltaResult<()>;

    /// Sets the exposure time in seconds for subsequent acquisitions.
    ///
    /// Non-finite or non-positive values are invalid input.
    fn set_exposure(&mut self, seconds: f64) -> BeamDeltaResult<()>;

    /// Triggers an exposure and blocks until the frame is available.
    fn acquire(&mut self) -> BeamDeltaResult<OwnedImage<Self::Sample>>;
}

impl<I: Imager + ?Sized> Imager for Box<I> {
    type Sample = I::Sample;

    fn shape(&self) -> (usize, usize) {
        (**self).shape()
    }

    fn enable(&mut self) -> BeamDeltaResult<()> {
        (**self).enable()
    }

    fn disable(&mut self) -> BeamDeltaResult<()> {
        (**self).disable()
    }

    fn set_exposure(&mut self, seconds: f64) -> BeamDeltaResult<()> {
        (**self).set_exposure(seconds)
    }

    fn acquire(&mut self) -> BeamDeltaResult<OwnedImage<Self::Sample>> {
        (**self).acquire()
    }
}

pub(crate) fn checked_exposure(seconds: f64) -> BeamDeltaResult<f64> {
    if seconds.is_finite() && seconds > 0.0 {
        Ok(seconds)
    } else {
        Err(BeamDeltaError::InvalidInput("exposure must be a positive number of seconds"))
    }
}
