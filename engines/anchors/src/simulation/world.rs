use std::{
    f32::consts::PI,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use glam::{Quat, Vec2};
use indexmap::IndexMap;
use lib_geometry::Pose;
use log::{debug, warn};

use super::{
    RecordingPlatform, Script, ScriptAction, ScriptHit, ScriptedInput, SimulatedScene,
    SimulatedSession,
};
use crate::{
    controller::Controller,
    frame::{Backend, Frame},
    input::{PointerId, TapGesture, Touch, TouchPhase},
    report::FrameReport,
    session::{DepthMode, Session},
    trackable::{TrackableId, TrackableKind, TrackingMethod, TrackingState},
};

/// All simulated collaborators, optionally driven by a [`Script`].
pub struct SimulatedWorld {
    pub session: SimulatedSession,
    pub scene: SimulatedScene,
    pub input: ScriptedInput,
    pub platform: RecordingPlatform,
    script: Option<Script>,
    /// index of the next script step to apply
    cursor: usize,
    /// planes added by the script, by name
    planes: IndexMap<String, TrackableId>,
    interrupt: Option<Arc<AtomicBool>>,
    time: Duration,
}

impl SimulatedWorld {
    /// A world without script that runs until the application quits.
    #[must_use]
    pub fn new() -> Self {
        Self {
            session: SimulatedSession::new(),
            scene: SimulatedScene::new(),
            input: ScriptedInput::new(),
            platform: RecordingPlatform::new(),
            script: None,
            cursor: 0,
            planes: IndexMap::new(),
            interrupt: None,
            time: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_script(script: Script) -> Self {
        Self {
            script: Some(script),
            ..Self::new()
        }
    }

    /// ends the simulation once `interrupt` is set, e.g. by a Ctrl-C handler
    #[must_use]
    pub fn with_interrupt(mut self, interrupt: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    /// Borrows the collaborators for a frame at `time` without advancing the script.
    pub fn frame_at(&mut self, time: Duration) -> Frame<'_> {
        Frame {
            time,
            session: &mut self.session,
            scene: &mut self.scene,
            input: &self.input,
            platform: &mut self.platform,
        }
    }

    /// Runs a single update of `controller` against the current state. Input is kept.
    pub fn run_controller(
        &mut self,
        controller: &mut dyn Controller,
        time: Duration,
    ) -> FrameReport {
        let mut report = FrameReport::default();
        controller.update(&mut self.frame_at(time), &mut report);
        report
    }

    /// the plane the script added as `name`
    #[must_use]
    pub fn plane(&self, name: &str) -> Option<TrackableId> {
        self.planes.get(name).copied()
    }

    fn apply(&mut self, action: ScriptAction) {
        debug!("{:?}: {action:?}", self.time);
        match action {
            ScriptAction::SessionStatus { status } => self.session.set_status(status),
            ScriptAction::ShowMarker { index, position } => {
                let pose = Pose::from_position(position);
                match self.session.image(index) {
                    Some(image) => {
                        self.session.move_trackable(image, pose);
                        self.session.set_tracking_state(image, TrackingState::Tracking);
                        self.session
                            .set_tracking_method(image, TrackingMethod::FullTracking);
                    }
                    None => {
                        self.session.add_trackable(
                            TrackableKind::AugmentedImage {
                                database_index: index,
                            },
                            pose,
                        );
                    }
                }
            }
            ScriptAction::ObserveMarker { index } => {
                if let Some(image) = self.marker(index) {
                    self.session.observe(image);
                }
            }
            ScriptAction::MarkerState {
                index,
                state,
                method,
            } => {
                if let Some(image) = self.marker(index) {
                    self.session.set_tracking_state(image, state);
                    self.session.set_tracking_method(image, method);
                }
            }
            ScriptAction::AddPlane {
                name,
                position,
                upside_down,
            } => {
                let rotation = if upside_down {
                    Quat::from_rotation_x(PI)
                } else {
                    Quat::IDENTITY
                };
                let plane = self
                    .session
                    .add_trackable(TrackableKind::DetectedPlane, Pose::new(position, rotation));
                self.planes.insert(name, plane);
            }
            ScriptAction::PlaneState { name, state } => {
                if let Some(plane) = self.named_plane(&name) {
                    self.session.set_tracking_state(plane, state);
                }
            }
            ScriptAction::Tap {
                position,
                pointer,
                over_ui,
                hit,
                gesture,
            } => {
                self.input.set_pointer_over_ui(pointer, over_ui);
                if let Some(hit) = hit {
                    self.aim_raycast(&hit);
                }
                if gesture {
                    self.input.push_tap(TapGesture {
                        pointer,
                        start_position: position,
                        target: None,
                        cancelled: false,
                    });
                } else {
                    self.input.push_touch(Touch {
                        pointer,
                        position,
                        phase: TouchPhase::Began,
                    });
                }
            }
            ScriptAction::TwoFingerTap => {
                for (pointer, phase) in [(0, TouchPhase::Stationary), (1, TouchPhase::Began)] {
                    self.input.push_touch(Touch {
                        pointer: PointerId(pointer),
                        position: Vec2::ZERO,
                        phase,
                    });
                }
            }
            ScriptAction::Back => self.input.press_back(),
            ScriptAction::Depth { enabled } => {
                if let Some(config) = self.session.config_mut() {
                    config.depth_mode = if enabled {
                        DepthMode::Automatic
                    } else {
                        DepthMode::Disabled
                    };
                }
            }
        }
    }

    fn marker(&self, index: usize) -> Option<TrackableId> {
        let image = self.session.image(index);
        if image.is_none() {
            warn!("script refers to marker {index} before showing it");
        }
        image
    }

    fn named_plane(&self, name: &str) -> Option<TrackableId> {
        let plane = self.plane(name);
        if plane.is_none() {
            warn!("script refers to unknown plane `{name}`");
        }
        plane
    }

    fn aim_raycast(&mut self, hit: &ScriptHit) {
        let Some(plane) = self.named_plane(&hit.plane) else {
            return;
        };
        let rotation = self
            .session
            .trackable(plane)
            .map_or(Quat::IDENTITY, |trackable| trackable.pose.rotation);
        self.session
            .set_raycast_hit(Some((plane, Pose::new(hit.position, rotation))));
    }

    fn script_finished(&self) -> bool {
        self.script
            .as_ref()
            .is_some_and(|script| self.time >= script.end())
    }

    fn interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|interrupt| interrupt.load(Ordering::Relaxed))
    }
}

impl Default for SimulatedWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for SimulatedWorld {
    fn begin_frame(&mut self, time: Duration) {
        self.time = time;
        self.input.clear();
        self.session.set_raycast_hit(None);

        loop {
            let Some(step) = self
                .script
                .as_ref()
                .and_then(|script| script.steps.get(self.cursor))
                .filter(|step| step.at() <= time)
                .cloned()
            else {
                break;
            };
            self.cursor += 1;
            self.apply(step.action);
        }
    }

    fn frame(&mut self, time: Duration) -> Frame<'_> {
        self.frame_at(time)
    }

    fn should_exit(&self) -> bool {
        self.platform.quit_requested() || self.script_finished() || self.interrupted()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::{
        input::Input,
        session::{RaycastFilter, SessionStatus},
        simulation::ScriptStep,
    };

    fn step(at_secs: f32, action: ScriptAction) -> ScriptStep {
        ScriptStep { at_secs, action }
    }

    #[test]
    fn due_steps_are_applied_once() {
        let script = Script::new(
            2.0,
            vec![
                step(0.0, ScriptAction::ShowMarker {
                    index: 0,
                    position: Vec3::ZERO,
                }),
                step(1.0, ScriptAction::SessionStatus {
                    status: SessionStatus::LostTracking,
                }),
            ],
        );
        let mut world = SimulatedWorld::with_script(script);

        world.begin_frame(Duration::ZERO);
        world.begin_frame(Duration::from_millis(500));
        assert!(world.session.image(0).is_some());
        assert_eq!(world.session.status(), SessionStatus::Tracking);

        world.begin_frame(Duration::from_secs(1));
        assert_eq!(world.session.status(), SessionStatus::LostTracking);
        assert!(!world.should_exit());

        world.begin_frame(Duration::from_secs(2));
        assert!(world.should_exit());
    }

    #[test]
    fn tap_aims_raycast_for_one_frame() {
        let script = Script::new(
            1.0,
            vec![
                step(0.0, ScriptAction::AddPlane {
                    name: "ceiling".to_owned(),
                    position: Vec3::new(0.0, 2.5, 0.0),
                    upside_down: true,
                }),
                step(0.0, ScriptAction::Tap {
                    position: Vec2::new(540.0, 960.0),
                    pointer: PointerId(0),
                    over_ui: false,
                    hit: Some(ScriptHit {
                        plane: "ceiling".to_owned(),
                        position: Vec3::new(0.0, 2.5, -1.0),
                    }),
                    gesture: false,
                }),
            ],
        );
        let mut world = SimulatedWorld::with_script(script);

        world.begin_frame(Duration::ZERO);
        let ceiling = world.plane("ceiling").unwrap();
        let hit = world
            .session
            .raycast(Vec2::ZERO, RaycastFilter::PLANES)
            .unwrap();
        assert_eq!(hit.trackable.id, ceiling);
        assert!(!hit.pose.faces_away_from(world.session.camera().position()));
        assert_eq!(world.input.touches().len(), 1);

        world.begin_frame(Duration::from_millis(16));
        assert!(world
            .session
            .raycast(Vec2::ZERO, RaycastFilter::PLANES)
            .is_none());
        assert!(world.input.touches().is_empty());
    }

    #[test]
    fn interrupt_ends_the_simulation() {
        let interrupt = Arc::new(AtomicBool::new(false));
        let mut world = SimulatedWorld::new().with_interrupt(Arc::clone(&interrupt));
        world.begin_frame(Duration::ZERO);
        assert!(!world.should_exit());

        interrupt.store(true, Ordering::Relaxed);

        assert!(world.should_exit());
    }

    #[test]
    fn depth_step_changes_session_config() {
        let script = Script::new(1.0, vec![step(0.0, ScriptAction::Depth { enabled: true })]);
        let mut world = SimulatedWorld::with_script(script);

        world.begin_frame(Duration::ZERO);

        let config = world.session.config().unwrap();
        assert!(config.depth_mode.is_enabled());
    }
}
