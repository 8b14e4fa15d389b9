//! Replays a fixed list of frames.

use super::{checked_exposure, Imager};
use crate::image::{OwnedImage, Sample};
use crate::util::{BeamDeltaError, BeamDeltaResult};

/// Imager that returns pre-recorded frames in order.
///
/// Exposure settings are validated and remembered but do not alter the
/// recorded frames.
#[derive(Clone, Debug)]
pub struct FrameSequence<T> {
    frames: Vec<OwnedImage<T>>,
    next: usize,
    cycle: bool,
    enabled: bool,
    exposure: Option<f64>,
}

impl<T: Sample> FrameSequence<T> {
    /// Creates a sequence; all frames must share one shape.
    pub fn new(frames: Vec<OwnedImage<T>>) -> BeamDeltaResult<Self> {
        let first = frames
            .first()
            .ok_or(BeamDeltaError::InvalidInput("frame sequence is empty"))?;
        let shape = first.shape();
        if frames.iter().any(|frame| frame.shape() != shape) {
            return Err(BeamDeltaError::InvalidInput(
                "frames in a sequence must share one shape",
            ));
        }
        Ok(Self {
            frames,
            next: 0,
            cycle: false,
            enabled: false,
            exposure: None,
        })
    }

    /// Restart from the first frame instead of failing when exhausted.
    pub fn cycling(mut self, cycle: bool) -> Self {
        self.cycle = cycle;
        self
    }

    /// Number of frames in the sequence.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; empty sequences are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index of the frame the next `acquire` returns.
    pub fn position(&self) -> usize {
        self.next
    }

    /// Last exposure requested through [`Imager::set_exposure`].
    pub fn exposure(&self) -> Option<f64> {
        self.exposure
    }
}

impl<T: Sample> Imager for FrameSequence<T> {
    type Sample = T;

    fn shape(&self) -> (usize, usize) {
        self.frames[0].shape()
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
        self.exposure = Some(checked_exposure(seconds)?);
        Ok(())
    }

    fn acquire(&mut self) -> BeamDeltaResult<OwnedImage<T>> {
        if !self.enabled {
            return Err(BeamDeltaError::Device {
                reason: "acquire called while disabled".to_string(),
            });
        }
        if self.next >= self.frames.len() {
            if !self.cycle {
                return Err(BeamDeltaError::Device {
                    reason: format!("frame sequence exhausted after {} frames", self.frames.len()),
                });
            }
            self.next = 0;
        }
        let frame = self.frames[self.next].clone();
        self.next += 1;
        Ok(frame)
    }
}
