//! One camera paired with one alignment tracker.
//!
//! A session is what an operator drives per camera: a live toggle that starts
//! and stops the device, a poll step the acquisition loop calls on every
//! tick, the exposure setting, and the reference actions.

use crate::centroid::{Centroid, CentroidEstimator};
use crate::device::Imager;
use crate::trace::trace_span;
use crate::tracker::{AlignmentTracker, Snapshot};
use crate::util::BeamDeltaResult;

/// Live acquisition feeding an [`AlignmentTracker`].
#[derive(Debug)]
pub struct AlignmentSession<I: Imager> {
    imager: I,
    tracker: AlignmentTracker<I::Sample>,
    live: bool,
}

impl<I: Imager> AlignmentSession<I> {
    /// Creates a session; acquisition starts disabled.
    pub fn new(imager: I, estimator: CentroidEstimator) -> Self {
        Self {
            imager,
            tracker: AlignmentTracker::new(estimator),
            live: false,
        }
    }

    /// Enables or disables the imager. No-op if already in that mode.
    pub fn set_live(&mut self, live: bool) -> BeamDeltaResult<()> {
        if live == self.live {
            return Ok(());
        }
        if live {
            self.imager.enable()?;
        } else {
            self.imager.disable()?;
        }
        self.live = live;
        Ok(())
    }

    /// Returns true while acquisition is enabled.
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Acquires one frame and updates the tracker.
    ///
    /// Returns `Ok(None)` without touching the device when not live.
    pub fn poll(&mut self) -> BeamDeltaResult<Option<Snapshot>> {
        if !self.live {
            return Ok(None);
        }
        let _span = trace_span!("poll").entered();
        let frame = self.imager.acquire()?;
        self.tracker.on_new_frame(frame).map(Some)
    }

    /// Forwards an exposure time in seconds to the imager.
    pub fn set_exposure(&mut self, seconds: f64) -> BeamDeltaResult<()> {
        self.imager.set_exposure(seconds)
    }

    /// Stores the latest frame's centroid as the new reference.
    pub fn update_reference(&mut self) -> BeamDeltaResult<Centroid> {
        self.tracker.update_reference()
    }

    /// Drops the reference; the next polled frame seeds a new one.
    pub fn clear_reference(&mut self) -> BeamDeltaResult<Snapshot> {
        self.tracker.clear_reference()
    }

    /// Returns the tracker.
    pub fn tracker(&self) -> &AlignmentTracker<I::Sample> {
        &self.tracker
    }

    /// Returns the tracker mutably, e.g. to subscribe observers.
    pub fn tracker_mut(&mut self) -> &mut AlignmentTracker<I::Sample> {
        &mut self.tracker
    }

    /// Returns the imager.
    pub fn imager(&self) -> &I {
        &self.imager
    }

    /// Returns the imager mutably.
    pub fn imager_mut(&mut self) -> &mut I {
        &mut self.imager
    }
}
