//! Reference/current centroid tracking for beam alignment.
//!
//! [`AlignmentTracker`] keeps the most recent image and two centroids: the
//! operator's saved `reference` and the `current` one from the latest image.
//! The first image seeds both, so the offset starts at exactly zero. After
//! that, new images move only `current`, and `update_reference` re-samples the
//! latest image into `reference`. `clear_reference` drops the reference; the
//! offset is unavailable until the next image re-seeds it.
//!
//! All mutation goes through `&mut self`. Observers are notified after the
//! state is fully updated and always see a consistent [`Snapshot`].

mod notify;

pub use notify::{LatestSnapshot, SubscriptionId};

use crate::centroid::{Centroid, CentroidEstimator, Degeneracy, Offset};
use crate::image::{ImageView, OwnedImage, Sample};
use crate::trace::{trace_event, trace_span};
use crate::util::{BeamDeltaError, BeamDeltaResult};
use notify::Observers;
use std::fmt;

const NO_IMAGE: &str = "no image has been processed yet";
const NO_REFERENCE: &str = "reference has been cleared";

/// Lifecycle of a tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackerState {
    /// No image has been processed.
    Uninitialized,
    /// A current centroid is set. The reference is set too unless it was
    /// cleared and no image has arrived since.
    Tracking,
}

/// Consistent view of the alignment state after a mutation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapshot {
    /// Saved reference centroid; `None` right after `clear_reference`.
    pub reference: Option<Centroid>,
    /// Centroid of the most recent image.
    pub current: Centroid,
    /// `current - reference`, when a reference is set.
    pub offset: Option<Offset>,
    /// Fallback reason for the most recent estimate, if any.
    ///
    /// After `on_new_image` this describes the current frame. After
    /// `update_reference` it describes the reference re-estimate instead.
    /// `clear_reference` leaves it unchanged.
    pub degeneracy: Option<Degeneracy>,
    /// Number of mutations so far; increases by one per notification.
    pub sequence: u64,
}

#[derive(Clone, Copy, Debug)]
struct Alignment {
    reference: Option<Centroid>,
    current: Centroid,
}

impl Alignment {
    fn offset(&self) -> Option<Offset> {
        self.reference.map(|reference| self.current - reference)
    }
}

/// Stateful wrapper over [`CentroidEstimator`] tracking a reference offset.
pub struct AlignmentTracker<T> {
    estimator: CentroidEstimator,
    image: Option<OwnedImage<T>>,
    alignment: Option<Alignment>,
    degeneracy: Option<Degeneracy>,
    sequence: u64,
    observers: Observers,
}

impl<T: Sample> AlignmentTracker<T> {
    /// Creates an uninitialized tracker.
    pub fn new(estimator: CentroidEstimator) -> Self {
        Self {
            estimator,
            image: None,
            alignment: None,
            degeneracy: None,
            sequence: 0,
            observers: Observers::default(),
        }
    }

    /// Returns the estimator used for every update.
    pub fn estimator(&self) -> &CentroidEstimator {
        &self.estimator
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> TrackerState {
        if self.alignment.is_some() {
            TrackerState::Tracking
        } else {
            TrackerState::Uninitialized
        }
    }

    /// Processes a newly acquired image.
    ///
    /// On error the tracker is left untouched.
    pub fn on_new_image(&mut self, image: ImageView<'_, T>) -> BeamDeltaResult<Snapshot> {
        let frame = OwnedImage::from_view(image)?;
        self.on_new_frame(frame)
    }

    /// Processes a newly acquired image, taking ownership of the buffer.
    pub fn on_new_frame(&mut self, frame: OwnedImage<T>) -> BeamDeltaResult<Snapshot> {
        let _span = trace_span!("on_new_image", sequence = self.sequence).entered();
        let estimate = self.estimator.estimate(frame.view())?;

        let current = estimate.centroid;
        let reference = self
            .alignment
            .and_then(|a| a.reference)
            .unwrap_or(current);
        self.image = Some(frame);
        Ok(self.commit(
            Alignment {
                reference: Some(reference),
                current,
            },
            estimate.degeneracy,
        ))
    }

    /// Re-estimates the most recent image and stores it as the reference.
    ///
    /// Returns [`BeamDeltaError::StateUnavailable`] before the first image.
    pub fn update_reference(&mut self) -> BeamDeltaResult<Centroid> {
        let _span = trace_span!("update_reference", sequence = self.sequence).entered();
        let (Some(image), Some(alignment)) = (self.image.as_ref(), self.alignment) else {
            return Err(BeamDeltaError::StateUnavailable(NO_IMAGE));
        };
        let estimate = self.estimator.estimate(image.view())?;

        let reference = estimate.centroid;
        self.commit(
            Alignment {
                reference: Some(reference),
                current: alignment.current,
            },
            estimate.degeneracy,
        );
        Ok(reference)
    }

    /// Forgets the reference centroid.
    ///
    /// Offsets are unavailable until the next image, which seeds a fresh
    /// reference from its own centroid. Returns
    /// [`BeamDeltaError::StateUnavailable`] before the first image.
    pub fn clear_reference(&mut self) -> BeamDeltaResult<Snapshot> {
        let alignment = self
            .alignment
            .ok_or(BeamDeltaError::StateUnavailable(NO_IMAGE))?;
        Ok(self.commit(
            Alignment {
                reference: None,
                ..alignment
            },
            self.degeneracy,
        ))
    }

    /// Returns the reference centroid.
    pub fn reference(&self) -> BeamDeltaResult<Centroid> {
        let alignment = self
            .alignment
            .ok_or(BeamDeltaError::StateUnavailable(NO_IMAGE))?;
        alignment
            .reference
            .ok_or(BeamDeltaError::StateUnavailable(NO_REFERENCE))
    }

    /// Returns the current centroid.
    pub fn current(&self) -> BeamDeltaResult<Centroid> {
        self.alignment
            .map(|a| a.current)
            .ok_or(BeamDeltaError::StateUnavailable(NO_IMAGE))
    }

    /// Returns `current - reference`.
    pub fn offset(&self) -> BeamDeltaResult<Offset> {
        let alignment = self
            .alignment
            .ok_or(BeamDeltaError::StateUnavailable(NO_IMAGE))?;
        alignment
            .offset()
            .ok_or(BeamDeltaError::StateUnavailable(NO_REFERENCE))
    }

    /// Returns the full alignment state, or `None` before the first image.
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.alignment.map(|a| Snapshot {
            reference: a.reference,
            current: a.current,
            offset: a.offset(),
            degeneracy: self.degeneracy,
            sequence: self.sequence,
        })
    }

    /// Fallback reason for the most recent estimate.
    pub fn last_degeneracy(&self) -> Option<Degeneracy> {
        self.degeneracy
    }

    /// Returns the most recently supplied image.
    pub fn image(&self) -> Option<&OwnedImage<T>> {
        self.image.as_ref()
    }

    /// Registers a callback invoked after every state change.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Snapshot) + Send + 'static,
    {
        self.observers.subscribe(Box::new(callback))
    }

    /// Removes a callback. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Returns a shared cell that always holds the latest snapshot.
    pub fn watch(&mut self) -> LatestSnapshot {
        let current = self.snapshot();
        self.observers.watch(current)
    }

    fn commit(&mut self, alignment: Alignment, degeneracy: Option<Degeneracy>) -> Snapshot {
        self.alignment = Some(alignment);
        self.degeneracy = degeneracy;
        self.sequence += 1;

        let snapshot = Snapshot {
            reference: alignment.reference,
            current: alignment.current,
            offset: alignment.offset(),
            degeneracy,
            sequence: self.sequence,
        };
        let offset = snapshot.offset.unwrap_or_default();
        trace_event!(
            "alignment_changed",
            d_row = offset.d_row,
            d_col = offset.d_col,
            has_reference = snapshot.reference.is_some(),
            sequence = snapshot.sequence,
        );
        self.observers.publish(&snapshot);
        snapshot
    }
}

impl<T: Sample> Default for AlignmentTracker<T> {
    fn default() -> Self {
        Self::new(CentroidEstimator::default())
    }
}

impl<T> fmt::Debug for AlignmentTracker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignmentTracker")
            .field("estimator", &self.estimator)
            .field("alignment", &self.alignment)
            .field("degeneracy", &self.degeneracy)
            .field("sequence", &self.sequence)
            .field("observers", &self.observers.len())
            .finish()
    }
}
