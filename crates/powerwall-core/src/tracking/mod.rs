//! Pose input for the camera rig.
//!
//! A [`TrackingInputAdapter`] is polled once per tick and yields either an
//! incremental delta (manual control) or an absolute pose (external
//! tracking). Polling never blocks.

mod external;
mod manual;

use serde::{Deserialize, Serialize};

use crate::input::InputEvent;
use crate::options::BodyConfig;
use crate::pose::{BodyId, Pose, PoseDelta, TrackedPose};

pub use external::{ExternalTracking, PoseBoard};
pub use manual::ManualInput;

/// Which kind of source drives the rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TrackingSource {
    /// No tracking: keyboard/gamepad control.
    #[default]
    None,
    /// Name-keyed motion capture stream (Vicon DataStream).
    Vicon,
    /// Id-keyed motion capture stream (ART DTrack).
    DTrack,
}

impl TrackingSource {
    /// Picks a source from per-system toggles. Vicon wins if both are set.
    #[must_use]
    pub fn from_flags(use_vicon: bool, use_dtrack: bool) -> Self {
        if use_vicon {
            TrackingSource::Vicon
        } else if use_dtrack {
            TrackingSource::DTrack
        } else {
            TrackingSource::None
        }
    }

    /// Returns true for sources fed by an external tracking client.
    #[must_use]
    pub fn is_external(self) -> bool {
        self != TrackingSource::None
    }

    /// How this source addresses `body`.
    #[must_use]
    pub fn body_id(self, body: &BodyConfig) -> BodyId {
        match self {
            TrackingSource::DTrack => BodyId::Index(body.id),
            TrackingSource::Vicon | TrackingSource::None => BodyId::Name(body.name.clone()),
        }
    }
}

/// Result of one poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoseUpdate {
    /// Move the rig by a heading-relative delta.
    Relative(PoseDelta),
    /// Place the rig at an absolute pose.
    Absolute(Pose),
}

/// A per-tick pose feed for the rig.
pub trait TrackingInputAdapter {
    /// Which source this adapter represents.
    fn source(&self) -> TrackingSource;

    /// Returns the latest update, or `None` if there is nothing new.
    fn poll(&mut self) -> Option<PoseUpdate>;

    /// Receives an input event from the host. Ignored by default.
    fn handle_input(&mut self, _event: InputEvent) {}
}

/// The tracking client's side of the contract.
///
/// Implementations are fed by their own ingestion thread or process; reads
/// must not block on the network.
pub trait TrackingClient: Send + Sync {
    /// Which source this client speaks.
    fn source(&self) -> TrackingSource;

    /// Latest pose reported for `body`, if any, paired with the body's write
    /// sequence.
    ///
    /// The sequence must change on every write for that body. Consumers use it
    /// to detect new data, so it is independent of the source's clock.
    fn latest_pose(&self, body: &BodyId) -> Option<(u64, TrackedPose)>;
}
