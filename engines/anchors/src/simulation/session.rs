use std::num::NonZeroU64;

use glam::{Vec2, Vec3};
use indexmap::IndexMap;
use lib_geometry::{Camera, Pose};
use log::trace;

use crate::{
    session::{AnchorId, RaycastFilter, RaycastHit, Session, SessionConfig, SessionStatus},
    trackable::{
        Trackable, TrackableId, TrackableKind, TrackableQueryFilter, TrackingMethod,
        TrackingState,
    },
};

struct SimulatedTrackable {
    trackable: Trackable,
    /// changed since the last [`TrackableQueryFilter::Updated`] query
    updated: bool,
}

/// Tracking session whose trackables are added and changed by hand.
///
/// Starts out tracking, with the camera 1.5m above the origin looking at it from 1m away.
pub struct SimulatedSession {
    status: SessionStatus,
    camera: Camera,
    config: Option<SessionConfig>,
    trackables: IndexMap<TrackableId, SimulatedTrackable>,
    /// live anchors and the trackable each one is attached to
    anchors: IndexMap<AnchorId, TrackableId>,
    next_id: NonZeroU64,
    raycast_hit: Option<(TrackableId, Pose)>,
    refuse_anchors: bool,
    anchors_created: usize,
    anchors_detached: usize,
}

impl SimulatedSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Tracking,
            camera: Camera::looking_at(Vec3::new(0.0, 1.5, 1.0), Vec3::ZERO),
            config: Some(SessionConfig::default()),
            trackables: IndexMap::new(),
            anchors: IndexMap::new(),
            next_id: NonZeroU64::MIN,
            raycast_hit: None,
            refuse_anchors: false,
            anchors_created: 0,
            anchors_detached: 0,
        }
    }

    fn allocate_id(&mut self) -> NonZeroU64 {
        let id = self.next_id;
        self.next_id = id.saturating_add(1);
        id
    }

    /// Adds a fully tracked trackable that shows up in the next update query.
    pub fn add_trackable(&mut self, kind: TrackableKind, pose: Pose) -> TrackableId {
        let id = TrackableId(self.allocate_id());
        self.trackables.insert(
            id,
            SimulatedTrackable {
                trackable: Trackable {
                    id,
                    kind,
                    state: TrackingState::Tracking,
                    method: TrackingMethod::FullTracking,
                    pose,
                },
                updated: true,
            },
        );
        trace!("added {id} ({kind:?})");
        id
    }

    fn update(&mut self, id: TrackableId, change: impl FnOnce(&mut Trackable)) {
        if let Some(simulated) = self.trackables.get_mut(&id) {
            change(&mut simulated.trackable);
            simulated.updated = true;
        }
    }

    /// reports `id` as updated again without changing it
    pub fn observe(&mut self, id: TrackableId) {
        self.update(id, |_| {});
    }

    pub fn set_tracking_state(&mut self, id: TrackableId, state: TrackingState) {
        self.update(id, |trackable| trackable.state = state);
    }

    pub fn set_tracking_method(&mut self, id: TrackableId, method: TrackingMethod) {
        self.update(id, |trackable| trackable.method = method);
    }

    pub fn move_trackable(&mut self, id: TrackableId, pose: Pose) {
        self.update(id, |trackable| trackable.pose = pose);
    }

    /// drops a trackable as if the session had never seen it
    pub fn forget_trackable(&mut self, id: TrackableId) {
        self.trackables.shift_remove(&id);
    }

    /// the augmented image with the given database index
    #[must_use]
    pub fn image(&self, database_index: usize) -> Option<TrackableId> {
        self.trackables
            .values()
            .map(|simulated| simulated.trackable)
            .find(|trackable| trackable.database_index() == Some(database_index))
            .map(|trackable| trackable.id)
    }

    pub fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    /// `None` simulates a session that is not configured yet
    pub fn set_config(&mut self, config: Option<SessionConfig>) {
        self.config = config;
    }

    /// What every raycast hits until changed. The hit is dropped if the trackable is unknown or
    /// rejected by the raycast's filter.
    pub fn set_raycast_hit(&mut self, hit: Option<(TrackableId, Pose)>) {
        self.raycast_hit = hit;
    }

    pub fn refuse_anchors(&mut self, refuse: bool) {
        self.refuse_anchors = refuse;
    }

    #[must_use]
    pub fn live_anchors(&self) -> Vec<AnchorId> {
        self.anchors.keys().copied().collect()
    }

    /// the trackable a live anchor is attached to
    #[must_use]
    pub fn anchor_target(&self, anchor: AnchorId) -> Option<TrackableId> {
        self.anchors.get(&anchor).copied()
    }

    #[must_use]
    pub fn anchors_created(&self) -> usize {
        self.anchors_created
    }

    #[must_use]
    pub fn anchors_detached(&self) -> usize {
        self.anchors_detached
    }
}

impl Default for SimulatedSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Session for SimulatedSession {
    fn status(&self) -> SessionStatus {
        self.status
    }

    fn camera(&self) -> Camera {
        self.camera
    }

    fn trackables(&mut self, filter: TrackableQueryFilter) -> Vec<Trackable> {
        match filter {
            TrackableQueryFilter::All => self
                .trackables
                .values()
                .map(|simulated| simulated.trackable)
                .collect(),
            TrackableQueryFilter::Updated => self
                .trackables
                .values_mut()
                .filter(|simulated| simulated.updated)
                .map(|simulated| {
                    simulated.updated = false;
                    simulated.trackable
                })
                .collect(),
        }
    }

    fn trackable(&self, id: TrackableId) -> Option<Trackable> {
        self.trackables.get(&id).map(|simulated| simulated.trackable)
    }

    fn create_anchor(&mut self, trackable: TrackableId, _pose: Pose) -> Option<AnchorId> {
        if self.refuse_anchors {
            return None;
        }
        let state = self.trackables.get(&trackable)?.trackable.state;
        if state == TrackingState::Stopped {
            return None;
        }
        let anchor = AnchorId(self.allocate_id());
        self.anchors.insert(anchor, trackable);
        self.anchors_created += 1;
        Some(anchor)
    }

    fn detach_anchor(&mut self, anchor: AnchorId) {
        if self.anchors.shift_remove(&anchor).is_some() {
            self.anchors_detached += 1;
        }
    }

    fn raycast(&self, _screen_position: Vec2, filter: RaycastFilter) -> Option<RaycastHit> {
        let (id, pose) = self.raycast_hit?;
        let trackable = self.trackable(id)?;
        filter
            .accepts(trackable.kind)
            .then_some(RaycastHit { trackable, pose })
    }

    fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    fn config_mut(&mut self) -> Option<&mut SessionConfig> {
        self.config.as_mut()
    }
}
