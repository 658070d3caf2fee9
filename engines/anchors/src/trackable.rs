use std::{
    fmt::{self, Display},
    num::NonZeroU64,
};

use lib_geometry::Pose;
use serde::{Deserialize, Serialize};

/// Opaque identity of a trackable, assigned by the tracking system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackableId(pub NonZeroU64);

impl Display for TrackableId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "trackable#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingState {
    /// actively tracked, the pose is current
    Tracking,
    /// temporarily lost, may resume later
    Paused,
    /// will never be tracked again
    Stopped,
}

/// How an augmented image is currently being tracked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingMethod {
    /// the image is in view and its pose is measured
    #[default]
    FullTracking,
    /// the image left the view, its last pose is reused
    LastKnownPose,
    NotTracking,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackableKind {
    /// An image marker. `database_index` is its position in the image database.
    AugmentedImage { database_index: usize },
    DetectedPlane,
    FeaturePoint,
}

/// Snapshot of a trackable as reported by the tracking system for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trackable {
    pub id: TrackableId,
    pub kind: TrackableKind,
    pub state: TrackingState,
    pub method: TrackingMethod,
    /// center pose of the trackable
    pub pose: Pose,
}

impl Trackable {
    /// database index for augmented images, `None` for every other kind
    #[must_use]
    pub fn database_index(&self) -> Option<usize> {
        match self.kind {
            TrackableKind::AugmentedImage { database_index } => Some(database_index),
            TrackableKind::DetectedPlane | TrackableKind::FeaturePoint => None,
        }
    }

    /// Whether content may be attached to this trackable right now.
    ///
    /// With `require_full_tracking` an image that is only kept at its last known pose does not
    /// count as tracked.
    #[must_use]
    pub fn is_confidently_tracked(&self, require_full_tracking: bool) -> bool {
        self.state == TrackingState::Tracking
            && (!require_full_tracking || self.method == TrackingMethod::FullTracking)
    }
}

/// Selects which trackables a query returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackableQueryFilter {
    /// every trackable the session knows about
    All,
    /// trackables that changed since the previous query
    Updated,
}
