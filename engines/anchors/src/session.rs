use std::{
    fmt::{self, Display},
    num::NonZeroU64,
};

use glam::Vec2;
use lib_geometry::{Camera, Pose};
use serde::{Deserialize, Serialize};

use crate::trackable::{Trackable, TrackableId, TrackableKind, TrackableQueryFilter};

/// Handle of an anchor created by the tracking system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(pub NonZeroU64);

impl Display for AnchorId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "anchor#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Initializing,
    /// motion tracking works, trackables are reported
    Tracking,
    /// motion tracking was lost but may recover
    LostTracking,
    /// the session is paused
    NotTracking,
    ErrorPermissionNotGranted,
    ErrorCameraNotAvailable,
    FatalError,
}

impl SessionStatus {
    #[must_use]
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Self::ErrorPermissionNotGranted | Self::ErrorCameraNotAvailable | Self::FatalError
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusMode {
    #[default]
    Fixed,
    Auto,
}

impl FocusMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Fixed => Self::Auto,
            Self::Auto => Self::Fixed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthMode {
    #[default]
    Disabled,
    Automatic,
}

impl DepthMode {
    #[must_use]
    pub fn is_enabled(self) -> bool {
        self != Self::Disabled
    }
}

/// Runtime configuration of the tracking session that controllers may change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub focus_mode: FocusMode,
    pub depth_mode: DepthMode,
}

/// Which kinds of trackables a raycast may hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RaycastFilter {
    /// detected planes, but only inside their polygon
    pub plane_within_polygon: bool,
    /// feature points that come with an estimated surface normal
    pub feature_point_with_surface_normal: bool,
}

impl RaycastFilter {
    pub const PLANES: Self = Self {
        plane_within_polygon: true,
        feature_point_with_surface_normal: false,
    };

    pub const PLANES_AND_FEATURE_POINTS: Self = Self {
        plane_within_polygon: true,
        feature_point_with_surface_normal: true,
    };

    #[must_use]
    pub fn accepts(self, kind: TrackableKind) -> bool {
        match kind {
            TrackableKind::DetectedPlane => self.plane_within_polygon,
            TrackableKind::FeaturePoint => self.feature_point_with_surface_normal,
            TrackableKind::AugmentedImage { .. } => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastHit {
    /// the trackable that was hit
    pub trackable: Trackable,
    /// pose of the hit point, its up axis is the surface normal
    pub pose: Pose,
}

/// The AR tracking system.
///
/// Everything is pulled once per frame; the session never calls back into the engine.
pub trait Session {
    fn status(&self) -> SessionStatus;

    /// the first-person camera of the current frame
    fn camera(&self) -> Camera;

    /// Snapshots of the trackables selected by `filter`.
    ///
    /// [`TrackableQueryFilter::Updated`] returns the trackables that changed since the previous
    /// query with that filter.
    fn trackables(&mut self, filter: TrackableQueryFilter) -> Vec<Trackable>;

    /// current snapshot of a single trackable, `None` if the session forgot about it
    fn trackable(&self, id: TrackableId) -> Option<Trackable>;

    /// Pins `pose` to the reference frame of `trackable`.
    ///
    /// Returns `None` if the trackable cannot take anchors (anymore).
    fn create_anchor(&mut self, trackable: TrackableId, pose: Pose) -> Option<AnchorId>;

    /// Stops updating an anchor and releases it. Unknown anchors are ignored.
    fn detach_anchor(&mut self, anchor: AnchorId);

    /// hit test against the reconstructed physical world at a screen position in pixels
    fn raycast(&self, screen_position: Vec2, filter: RaycastFilter) -> Option<RaycastHit>;

    fn config(&self) -> Option<&SessionConfig>;

    fn config_mut(&mut self) -> Option<&mut SessionConfig>;
}
