//! BeamDelta estimates beam centroids in microscope camera frames and tracks
//! their offset from a saved reference, for mechanically aligning optics.
//!
//! The estimator thresholds each frame with Otsu's method and takes the
//! intensity-weighted center of mass of what remains. The tracker holds a
//! reference and a current centroid and notifies observers on change.
//! Optional features add row-parallel summation (`rayon`), image file
//! loading (`image-io`) and instrumentation (`tracing`).

pub mod centroid;
pub mod device;
pub mod image;
pub mod lowlevel;
pub mod session;
pub mod threshold;
mod trace;
pub mod tracker;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use centroid::{
    estimate_centroid, Centroid, CentroidEstimator, Degeneracy, Estimate, EstimatorConfig, Offset,
};
pub use device::{FrameSequence, Imager, SpotImager};
pub use crate::image::{ImageView, OwnedImage, Sample};
pub use session::AlignmentSession;
pub use tracker::{AlignmentTracker, LatestSnapshot, Snapshot, SubscriptionId, TrackerState};
pub use util::{BeamDeltaError, BeamDeltaResult};
