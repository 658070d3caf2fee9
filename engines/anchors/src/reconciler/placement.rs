use glam::Vec2;
use log::{debug, info, warn};

use crate::{
    config::PlacementConfig,
    controller::Controller,
    frame::Frame,
    input::{Input, PointerId, TouchPhase},
    proxy::Proxy,
    report::{Created, DestroyReason, FrameReport, ProxyKey, TapRejection},
    scene::PrefabId,
    session::RaycastFilter,
    trackable::{TrackableKind, TrackingState},
};

/// What makes the [`PlacementReconciler`] place a new proxy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlacementTrigger {
    /// the first touch of a frame, in the frame the finger goes down
    Touch,
    /// Every completed tap gesture that did not land on an existing object.
    ///
    /// The model is wrapped in an instance of `manipulator`, which gets selected after placement.
    Manipulator { manipulator: PrefabId },
}

impl PlacementTrigger {
    /// raycast filter used unless configured otherwise
    #[must_use]
    pub fn default_raycast_filter(&self) -> RaycastFilter {
        match self {
            Self::Touch => RaycastFilter::PLANES_AND_FEATURE_POINTS,
            Self::Manipulator { .. } => RaycastFilter::PLANES,
        }
    }
}

/// Places proxies where the user taps on a plane or feature point.
///
/// Any number of proxies may share a trackable. A proxy is removed once its trackable stopped
/// being tracked.
pub struct PlacementReconciler {
    template: PrefabId,
    trigger: PlacementTrigger,
    raycast_filter: RaycastFilter,
    proxies: Vec<Proxy>,
}

impl PlacementReconciler {
    #[must_use]
    pub fn new(template: PrefabId, trigger: PlacementTrigger) -> Self {
        Self {
            template,
            raycast_filter: trigger.default_raycast_filter(),
            trigger,
            proxies: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &PlacementConfig) -> Self {
        let trigger = config
            .manipulator
            .clone()
            .map_or(PlacementTrigger::Touch, |manipulator| {
                PlacementTrigger::Manipulator { manipulator }
            });
        let placement = Self::new(config.template.clone(), trigger);
        match config.raycast_filter {
            Some(filter) => placement.with_raycast_filter(filter),
            None => placement,
        }
    }

    #[must_use]
    pub fn with_raycast_filter(mut self, raycast_filter: RaycastFilter) -> Self {
        self.raycast_filter = raycast_filter;
        self
    }

    #[must_use]
    pub fn raycast_filter(&self) -> RaycastFilter {
        self.raycast_filter
    }

    #[must_use]
    pub fn trigger(&self) -> &PlacementTrigger {
        &self.trigger
    }

    /// live proxies, oldest first
    #[must_use]
    pub fn proxies(&self) -> &[Proxy] {
        &self.proxies
    }

    /// Places proxies for this frame's taps, then removes proxies of stopped trackables.
    pub fn reconcile(&mut self, frame: &mut Frame<'_>, report: &mut FrameReport) {
        for (pointer, screen_position) in self.pending_taps(frame.input) {
            if let Err(rejection) = self.place(frame, pointer, screen_position, report) {
                debug!("tap at {screen_position} rejected: {rejection:?}");
                report.rejected_taps.push(rejection);
            }
        }
        self.clean_untracked(frame, report);
    }

    fn pending_taps(&self, input: &dyn Input) -> Vec<(PointerId, Vec2)> {
        match self.trigger {
            PlacementTrigger::Touch => input
                .touches()
                .first()
                .filter(|touch| touch.phase == TouchPhase::Began)
                .map(|touch| (touch.pointer, touch.position))
                .into_iter()
                .collect(),
            PlacementTrigger::Manipulator { .. } => input
                .tap_gestures()
                .into_iter()
                .filter(|tap| !tap.cancelled && tap.target.is_none())
                .map(|tap| (tap.pointer, tap.start_position))
                .collect(),
        }
    }

    fn place(
        &mut self,
        frame: &mut Frame<'_>,
        pointer: PointerId,
        screen_position: Vec2,
        report: &mut FrameReport,
    ) -> Result<(), TapRejection> {
        if frame.input.is_pointer_over_ui(pointer) {
            return Err(TapRejection::PointerOverUi);
        }

        let hit = frame
            .session
            .raycast(screen_position, self.raycast_filter)
            .ok_or(TapRejection::NoHit)?;

        if hit.trackable.kind == TrackableKind::DetectedPlane
            && hit.pose.faces_away_from(frame.session.camera().position())
        {
            return Err(TapRejection::BackFace);
        }

        let wrapper = match &self.trigger {
            PlacementTrigger::Touch => None,
            PlacementTrigger::Manipulator { manipulator } => Some(manipulator),
        };
        let Some(proxy) = Proxy::spawn(
            frame.session,
            frame.scene,
            hit.trackable.id,
            hit.pose,
            &self.template,
            wrapper,
        ) else {
            warn!("session refused an anchor on {}", hit.trackable.id);
            return Err(TapRejection::AnchorUnavailable);
        };

        if let Some(wrapper) = proxy.wrapper() {
            frame.scene.select(wrapper);
        }

        info!(
            "placed `{}` on {} ({})",
            self.template,
            hit.trackable.id,
            proxy.anchor()
        );
        report.created.push(Created {
            key: ProxyKey::Placement(proxy.anchor()),
            trackable: hit.trackable.id,
            anchor: proxy.anchor(),
        });
        self.proxies.push(proxy);
        Ok(())
    }

    /// Removes every proxy whose trackable stopped, newest first.
    ///
    /// A proxy whose model vanished from the scene counts as untracked: its anchor is released
    /// and the remaining nodes are removed. Proxies whose trackable is unknown to the session
    /// are left alone.
    fn clean_untracked(&mut self, frame: &mut Frame<'_>, report: &mut FrameReport) {
        for index in (0..self.proxies.len()).rev() {
            let Some(proxy) = self.proxies.get(index) else {
                continue;
            };
            let reason = if proxy.is_intact(&*frame.scene) {
                let stopped = frame
                    .session
                    .trackable(proxy.trackable())
                    .is_some_and(|trackable| trackable.state == TrackingState::Stopped);
                if !stopped {
                    continue;
                }
                DestroyReason::TrackableStopped
            } else {
                DestroyReason::ModelLost
            };

            let proxy = self.proxies.remove(index);
            let trackable = proxy.trackable();
            let anchor = proxy.destroy(frame.session, frame.scene);
            match reason {
                DestroyReason::ModelLost => {
                    debug!("model on {trackable} is gone, released anchor {anchor}");
                }
                _ => info!("{trackable} stopped tracking, removed proxy at {anchor}"),
            }
            report.destroyed_with(ProxyKey::Placement(anchor), anchor, reason);
        }
    }
}

impl Controller for PlacementReconciler {
    fn name(&self) -> &'static str {
        match self.trigger {
            PlacementTrigger::Touch => "placement",
            PlacementTrigger::Manipulator { .. } => "manipulator",
        }
    }

    fn update(&mut self, frame: &mut Frame<'_>, report: &mut FrameReport) {
        self.reconcile(frame, report);
    }

    fn has_instances(&self) -> bool {
        !self.proxies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::{f32::consts::PI, time::Duration};

    use glam::{Quat, Vec3};
    use lib_geometry::Pose;

    use super::*;
    use crate::{
        input::{TapGesture, Touch},
        scene::{NodeId, Parent, Scene},
        simulation::SimulatedWorld,
        trackable::TrackableId,
    };

    const FRAME: Duration = Duration::from_millis(16);

    fn touch_down(world: &mut SimulatedWorld, pointer: u32) {
        world.input.push_touch(Touch {
            pointer: PointerId(pointer),
            position: Vec2::new(540.0, 960.0),
            phase: TouchPhase::Began,
        });
    }

    fn tap(world: &mut SimulatedWorld, target: Option<NodeId>, cancelled: bool) {
        world.input.push_tap(TapGesture {
            pointer: PointerId(0),
            start_position: Vec2::new(540.0, 960.0),
            target,
            cancelled,
        });
    }

    fn floor(world: &mut SimulatedWorld) -> TrackableId {
        let plane = world
            .session
            .add_trackable(TrackableKind::DetectedPlane, Pose::IDENTITY);
        world
            .session
            .set_raycast_hit(Some((plane, Pose::from_position(Vec3::new(0.2, 0.0, -0.4)))));
        plane
    }

    fn touch_placement() -> PlacementReconciler {
        PlacementReconciler::new("chair".into(), PlacementTrigger::Touch)
    }

    #[test]
    fn touch_on_plane_places_proxy() {
        let mut world = SimulatedWorld::new();
        let plane = floor(&mut world);
        let mut placement = touch_placement();
        touch_down(&mut world, 0);

        let report = world.run_controller(&mut placement, FRAME);

        assert_eq!(report.created.len(), 1);
        assert_eq!(report.created[0].trackable, plane);
        let proxy = &placement.proxies()[0];
        assert_eq!(
            world.scene.parent_of(proxy.model()),
            Some(Parent::Anchor(proxy.anchor()))
        );
    }

    #[test]
    fn several_proxies_may_share_a_plane() {
        let mut world = SimulatedWorld::new();
        floor(&mut world);
        let mut placement = touch_placement();

        for frame in 1..=3 {
            touch_down(&mut world, 0);
            world.run_controller(&mut placement, FRAME * frame);
            world.input.clear();
        }

        assert_eq!(placement.proxies().len(), 3);
        assert_eq!(world.session.live_anchors().len(), 3);
    }

    #[test]
    fn held_touch_places_only_once() {
        let mut world = SimulatedWorld::new();
        floor(&mut world);
        let mut placement = touch_placement();
        touch_down(&mut world, 0);
        world.run_controller(&mut placement, FRAME);

        world.input.clear();
        world.input.push_touch(Touch {
            pointer: PointerId(0),
            position: Vec2::new(540.0, 960.0),
            phase: TouchPhase::Stationary,
        });
        world.run_controller(&mut placement, FRAME * 2);

        assert_eq!(placement.proxies().len(), 1);
    }

    #[test]
    fn back_face_hit_is_rejected() {
        let mut world = SimulatedWorld::new();
        let ceiling = world.session.add_trackable(
            TrackableKind::DetectedPlane,
            Pose::new(Vec3::new(0.0, 2.5, 0.0), Quat::from_rotation_x(PI)),
        );
        world.session.set_raycast_hit(Some((
            ceiling,
            Pose::new(Vec3::new(0.0, 1.0, -1.0), Quat::from_rotation_x(PI)),
        )));
        let mut placement = touch_placement();
        touch_down(&mut world, 0);

        let report = world.run_controller(&mut placement, FRAME);

        assert_eq!(report.rejected_taps, vec![TapRejection::BackFace]);
        assert!(placement.proxies().is_empty());
        assert_eq!(world.session.anchors_created(), 0);
    }

    #[test]
    fn back_facing_feature_point_is_accepted() {
        let mut world = SimulatedWorld::new();
        let point = world
            .session
            .add_trackable(TrackableKind::FeaturePoint, Pose::IDENTITY);
        world.session.set_raycast_hit(Some((
            point,
            Pose::new(Vec3::new(0.0, 1.0, -1.0), Quat::from_rotation_x(PI)),
        )));
        let mut placement = touch_placement();
        touch_down(&mut world, 0);

        world.run_controller(&mut placement, FRAME);

        assert_eq!(placement.proxies().len(), 1);
    }

    #[test]
    fn tap_over_ui_is_rejected() {
        let mut world = SimulatedWorld::new();
        floor(&mut world);
        world.input.set_pointer_over_ui(PointerId(0), true);
        let mut placement = touch_placement();
        touch_down(&mut world, 0);

        let report = world.run_controller(&mut placement, FRAME);

        assert_eq!(report.rejected_taps, vec![TapRejection::PointerOverUi]);
        assert!(placement.proxies().is_empty());
    }

    #[test]
    fn manipulator_tap_over_ui_is_rejected() {
        let mut world = SimulatedWorld::new();
        floor(&mut world);
        world.input.set_pointer_over_ui(PointerId(0), true);
        let mut placement = PlacementReconciler::new(
            "chair".into(),
            PlacementTrigger::Manipulator {
                manipulator: "manipulator".into(),
            },
        );
        tap(&mut world, None, false);

        let report = world.run_controller(&mut placement, FRAME);

        assert_eq!(report.rejected_taps, vec![TapRejection::PointerOverUi]);
        assert!(placement.proxies().is_empty());
        assert_eq!(world.session.anchors_created(), 0);
        assert_eq!(world.scene.node_count(), 0);
    }

    #[test]
    fn missed_raycast_creates_nothing() {
        let mut world = SimulatedWorld::new();
        let mut placement = touch_placement();
        touch_down(&mut world, 0);

        let report = world.run_controller(&mut placement, FRAME);

        assert_eq!(report.rejected_taps, vec![TapRejection::NoHit]);
        assert_eq!(world.scene.node_count(), 0);
    }

    #[test]
    fn raycast_respects_filter() {
        let mut world = SimulatedWorld::new();
        let point = world
            .session
            .add_trackable(TrackableKind::FeaturePoint, Pose::IDENTITY);
        world.session.set_raycast_hit(Some((point, Pose::IDENTITY)));
        let mut placement = touch_placement().with_raycast_filter(RaycastFilter::PLANES);
        touch_down(&mut world, 0);

        let report = world.run_controller(&mut placement, FRAME);

        assert_eq!(report.rejected_taps, vec![TapRejection::NoHit]);
    }

    #[test]
    fn stopped_plane_removes_only_its_proxies() {
        let mut world = SimulatedWorld::new();
        let first = floor(&mut world);
        let mut placement = touch_placement();
        touch_down(&mut world, 0);
        world.run_controller(&mut placement, FRAME);

        let table = world
            .session
            .add_trackable(TrackableKind::DetectedPlane, Pose::IDENTITY);
        world.session.set_raycast_hit(Some((table, Pose::IDENTITY)));
        world.input.clear();
        touch_down(&mut world, 0);
        world.run_controller(&mut placement, FRAME * 2);

        world.session.set_raycast_hit(Some((first, Pose::IDENTITY)));
        world.input.clear();
        touch_down(&mut world, 0);
        world.run_controller(&mut placement, FRAME * 3);
        assert_eq!(placement.proxies().len(), 3);

        world.input.clear();
        world.session.set_tracking_state(first, TrackingState::Stopped);
        let report = world.run_controller(&mut placement, FRAME * 4);

        assert_eq!(report.destroyed.len(), 2);
        assert!(report
            .destroyed
            .iter()
            .all(|destroyed| destroyed.reason == DestroyReason::TrackableStopped));
        assert_eq!(placement.proxies().len(), 1);
        assert_eq!(placement.proxies()[0].trackable(), table);
        assert_eq!(world.session.live_anchors(), vec![placement.proxies()[0].anchor()]);
    }

    #[test]
    fn paused_plane_keeps_its_proxy() {
        let mut world = SimulatedWorld::new();
        let plane = floor(&mut world);
        let mut placement = touch_placement();
        touch_down(&mut world, 0);
        world.run_controller(&mut placement, FRAME);

        world.input.clear();
        world.session.set_tracking_state(plane, TrackingState::Paused);
        world.run_controller(&mut placement, FRAME * 2);

        assert_eq!(placement.proxies().len(), 1);
    }

    #[test]
    fn externally_destroyed_model_releases_its_anchor() {
        let mut world = SimulatedWorld::new();
        floor(&mut world);
        let mut placement = touch_placement();
        touch_down(&mut world, 0);
        world.run_controller(&mut placement, FRAME);
        let anchor = placement.proxies()[0].anchor();
        let model = placement.proxies()[0].model();
        world.scene.destroy(model);

        world.input.clear();
        let report = world.run_controller(&mut placement, FRAME * 2);

        assert_eq!(report.destroyed.len(), 1);
        assert_eq!(report.destroyed[0].anchor, anchor);
        assert_eq!(report.destroyed[0].reason, DestroyReason::ModelLost);
        assert!(placement.proxies().is_empty());
        assert!(!placement.has_instances());
        assert!(world.session.live_anchors().is_empty());
    }

    #[test]
    fn externally_destroyed_model_keeps_its_wrapper_chain_consistent() {
        let mut world = SimulatedWorld::new();
        floor(&mut world);
        let mut placement = PlacementReconciler::new(
            "chair".into(),
            PlacementTrigger::Manipulator {
                manipulator: "manipulator".into(),
            },
        );
        tap(&mut world, None, false);
        world.run_controller(&mut placement, FRAME);
        let model = placement.proxies()[0].model();
        world.scene.destroy(model);

        world.input.clear();
        world.run_controller(&mut placement, FRAME * 2);

        assert!(placement.proxies().is_empty());
        assert_eq!(world.scene.node_count(), 0);
        assert!(world.session.live_anchors().is_empty());
    }

    #[test]
    fn forgotten_trackable_is_skipped() {
        let mut world = SimulatedWorld::new();
        let plane = floor(&mut world);
        let mut placement = touch_placement();
        touch_down(&mut world, 0);
        world.run_controller(&mut placement, FRAME);

        world.input.clear();
        world.session.forget_trackable(plane);
        let report = world.run_controller(&mut placement, FRAME * 2);

        assert!(report.destroyed.is_empty());
        assert_eq!(placement.proxies().len(), 1);
    }

    #[test]
    fn manipulator_wraps_and_selects_model() {
        let mut world = SimulatedWorld::new();
        floor(&mut world);
        let mut placement = PlacementReconciler::new(
            "chair".into(),
            PlacementTrigger::Manipulator {
                manipulator: "manipulator".into(),
            },
        );
        tap(&mut world, None, false);

        world.run_controller(&mut placement, FRAME);

        let proxy = &placement.proxies()[0];
        let wrapper = proxy.wrapper().unwrap();
        assert_eq!(world.scene.parent_of(wrapper), Some(Parent::Anchor(proxy.anchor())));
        assert_eq!(world.scene.parent_of(proxy.model()), Some(Parent::Node(wrapper)));
        assert_eq!(world.scene.selected(), Some(wrapper));
    }

    #[test]
    fn manipulator_ignores_cancelled_and_targeted_taps() {
        let mut world = SimulatedWorld::new();
        floor(&mut world);
        let existing = world
            .scene
            .instantiate(&PrefabId::from("lamp"), Parent::Root, Pose::IDENTITY);
        let mut placement = PlacementReconciler::new(
            "chair".into(),
            PlacementTrigger::Manipulator {
                manipulator: "manipulator".into(),
            },
        );
        tap(&mut world, None, true);
        tap(&mut world, Some(existing), false);

        let report = world.run_controller(&mut placement, FRAME);

        assert!(report.is_quiet());
        assert!(report.rejected_taps.is_empty());
        assert!(placement.proxies().is_empty());
    }

    #[test]
    fn manipulator_chain_is_removed_entirely() {
        let mut world = SimulatedWorld::new();
        let plane = floor(&mut world);
        let mut placement = PlacementReconciler::new(
            "chair".into(),
            PlacementTrigger::Manipulator {
                manipulator: "manipulator".into(),
            },
        );
        tap(&mut world, None, false);
        world.run_controller(&mut placement, FRAME);

        world.input.clear();
        world.session.set_tracking_state(plane, TrackingState::Stopped);
        world.run_controller(&mut placement, FRAME * 2);

        assert_eq!(world.scene.node_count(), 0);
        assert!(world.session.live_anchors().is_empty());
        assert_eq!(world.scene.selected(), None);
    }

    #[test]
    fn default_filters_depend_on_trigger() {
        assert_eq!(
            touch_placement().raycast_filter(),
            RaycastFilter::PLANES_AND_FEATURE_POINTS
        );
        let manipulator = PlacementReconciler::new(
            "chair".into(),
            PlacementTrigger::Manipulator {
                manipulator: "manipulator".into(),
            },
        );
        assert_eq!(manipulator.raycast_filter(), RaycastFilter::PLANES);
    }
}
