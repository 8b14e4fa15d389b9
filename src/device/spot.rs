//! Synthetic camera rendering a Gaussian beam spot.

use super::{checked_exposure, Imager};
use crate::centroid::Centroid;
use crate::image::OwnedImage;
use crate::util::{BeamDeltaError, BeamDeltaResult};

/// Deterministic 16-bit camera showing one Gaussian spot on a flat background.
///
/// Move the spot between acquisitions with [`SpotImager::set_spot`] to mimic
/// a beam drifting while the operator adjusts the optics. The spot amplitude
/// is `peak * exposure`; the background does not scale.
#[derive(Clone, Debug)]
pub struct SpotImager {
    width: usize,
    height: usize,
    spot: Centroid,
    sigma: f64,
    peak: f64,
    background: u16,
    exposure: f64,
    enabled: bool,
}

impl SpotImager {
    /// Creates a camera with the spot at the sensor center.
    pub fn new(width: usize, height: usize, sigma: f64) -> BeamDeltaResult<Self> {
        if width == 0 || height == 0 {
            return Err(BeamDeltaError::InvalidDimensions { width, height });
        }
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(BeamDeltaError::InvalidInput("spot sigma must be positive"));
        }
        Ok(Self {
            width,
            height,
            spot: Centroid::geometric_center(height, width),
            sigma,
            peak: 4000.0,
            background: 100,
            exposure: 1.0,
            enabled: false,
        })
    }

    /// Sets the background level and the spot peak above it.
    pub fn with_levels(mut self, background: u16, peak: f64) -> Self {
        self.background = background;
        self.peak = peak.max(0.0);
        self
    }

    /// Moves the spot center.
    pub fn set_spot(&mut self, spot: Centroid) {
        self.spot = spot;
    }

    /// Returns the spot center.
    pub fn spot(&self) -> Centroid {
        self.spot
    }

    /// Returns the exposure time in seconds.
    pub fn exposure(&self) -> f64 {
        self.exposure
    }

    /// Renders the current frame without requiring the camera to be enabled.
    pub fn render(&self) -> BeamDeltaResult<OwnedImage<u16>> {
        let inv_two_sigma2 = 1.0 / (2.0 * self.sigma * self.sigma);
        let background = f64::from(self.background);
        let amplitude = self.peak * self.exposure;
        let mut data = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            let dy = y as f64 - self.spot.row;
            for x in 0..self.width {
                let dx = x as f64 - self.spot.col;
                let value = background + amplitude * (-(dx * dx + dy * dy) * inv_two_sigma2).exp();
                data.push(value.round().clamp(0.0, f64::from(u16::MAX)) as u16);
            }
        }
        OwnedImage::new(data, self.width, self.height)
    }
}

impl Imager for SpotImager {
    type Sample = u16;

    fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    fn enable(&mut self) -> BeamDeltaResult<()> {
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) -> BeamDeltaResult<()> {
        self.enabled = false;
        Ok(())
    }

    fn set_exposure(&mut self, seconds: f64) -> BeamDeltaResult<()> {
        self.exposure = checked_exposure(seconds)?;
        Ok(())
    }

    fn acquire(&mut self) -> BeamDeltaResult<OwnedImage<u16>> {
        if !self.enabled {
            return Err(BeamDeltaError::Device {
                reason: "acquire called while disabled".to_string(),
            });
        }
        self.render()
    }
}
