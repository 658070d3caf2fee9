use std::time::Duration;

use lib_geometry::Pose;
use lib_time::{frame_duration, Clock};
use log::{debug, info, trace};

use crate::{
    autofocus::AutofocusController,
    config::ArConfig,
    controller::Controller,
    frame::{Backend, Frame},
    lifecycle::LifecycleController,
    overlay::FitToScanOverlay,
    reconciler::{MarkerReconciler, PlacementReconciler},
    report::FrameReport,
    scene::{Parent, PrefabId, Scene},
    shadow::ShadowQuadController,
};

pub const FIT_TO_SCAN_PREFAB: PrefabId = PrefabId::from_static("fit_to_scan_overlay");
pub const SHADOW_QUAD_PREFAB: PrefabId = PrefabId::from_static("shadow_quad");

/// Totals over all frames of a [`FrameLoop::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub frames: u64,
    pub created: usize,
    pub destroyed: usize,
    pub rejected_taps: usize,
}

impl LoopStats {
    fn record(&mut self, report: &FrameReport) {
        self.frames += 1;
        self.created += report.created.len();
        self.destroyed += report.destroyed.len();
        self.rejected_taps += report.rejected_taps.len();
    }
}

/// Runs the registered controllers once per frame, in registration order.
pub struct FrameLoop {
    controllers: Vec<Box<dyn Controller>>,
    overlay: Option<FitToScanOverlay>,
    frame_duration: Duration,
    initialized: bool,
}

impl FrameLoop {
    #[must_use]
    pub fn new(target_frame_rate: u32) -> Self {
        Self {
            controllers: Vec::new(),
            overlay: None,
            frame_duration: frame_duration(target_frame_rate),
            initialized: false,
        }
    }

    /// Builds the controllers enabled in `config`, instantiating their helper nodes in `scene`.
    #[must_use]
    pub fn from_config(config: &ArConfig, scene: &mut dyn Scene) -> Self {
        let mut frame_loop = Self::new(config.target_frame_rate);
        frame_loop.add_controller(Box::new(LifecycleController::new(
            config.target_frame_rate,
            config.quit_delay(),
        )));
        if config.autofocus_toggle {
            frame_loop.add_controller(Box::new(AutofocusController));
        }
        if let Some(markers) = &config.markers {
            frame_loop.add_controller(Box::new(MarkerReconciler::from_config(markers)));
        }
        if let Some(placement) = &config.placement {
            frame_loop.add_controller(Box::new(PlacementReconciler::from_config(placement)));
        }
        if config.shadow_quad {
            let quad = scene.instantiate(&SHADOW_QUAD_PREFAB, Parent::Root, Pose::IDENTITY);
            frame_loop.add_controller(Box::new(ShadowQuadController::new(quad)));
        }
        if config.fit_to_scan_overlay {
            let node = scene.instantiate(&FIT_TO_SCAN_PREFAB, Parent::Root, Pose::IDENTITY);
            frame_loop.set_overlay(FitToScanOverlay::new(node));
        }
        frame_loop
    }

    pub fn add_controller(&mut self, controller: Box<dyn Controller>) {
        debug!("registered controller `{}`", controller.name());
        self.controllers.push(controller);
    }

    pub fn set_overlay(&mut self, overlay: FitToScanOverlay) {
        self.overlay = Some(overlay);
    }

    #[must_use]
    pub fn controller_names(&self) -> Vec<&'static str> {
        self.controllers
            .iter()
            .map(|controller| controller.name())
            .collect()
    }

    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// `true` if any controller keeps a proxy alive
    #[must_use]
    pub fn has_instances(&self) -> bool {
        self.controllers
            .iter()
            .any(|controller| controller.has_instances())
    }

    /// Runs a single frame. Controllers are initialized right before the first one.
    pub fn run_frame(&mut self, frame: &mut Frame<'_>) -> FrameReport {
        if !self.initialized {
            for controller in &mut self.controllers {
                trace!("initializing `{}`", controller.name());
                controller.init(frame);
            }
            self.initialized = true;
        }

        let mut report = FrameReport::default();
        for controller in &mut self.controllers {
            controller.update(frame, &mut report);
        }

        if let Some(overlay) = &self.overlay {
            let any_instances = self.has_instances();
            report.overlay_visible = Some(overlay.update(frame.scene, any_instances));
        }
        report
    }

    /// Runs frames paced to the target frame rate until the backend asks to exit.
    pub fn run(&mut self, backend: &mut dyn Backend, clock: &dyn Clock) -> LoopStats {
        let mut stats = LoopStats::default();
        let mut fps = FpsCounter::new(clock.now());
        let mut next_frame = clock.now();

        loop {
            let time = clock.now();
            backend.begin_frame(time);
            if backend.should_exit() {
                info!("frame loop exiting after {} frames", stats.frames);
                break;
            }

            let report = self.run_frame(&mut backend.frame(time));
            stats.record(&report);
            fps.tick(time);

            // compute the timestamp of the next frame
            next_frame += self.frame_duration;
            if let Some(delay) = next_frame.checked_sub(clock.now()) {
                clock.sleep(delay);
            } else {
                trace!("frame took longer than {:?}", self.frame_duration);
                next_frame = clock.now();
            }
        }
        stats
    }
}

struct FpsCounter {
    frame_counter: u32,
    frame_time: Duration,
}

impl FpsCounter {
    fn new(now: Duration) -> Self {
        Self {
            frame_counter: 0,
            frame_time: now,
        }
    }

    fn tick(&mut self, now: Duration) {
        self.frame_counter += 1;
        let span = now.saturating_sub(self.frame_time);
        if span >= Duration::from_secs(1) {
            #[expect(clippy::cast_precision_loss, reason = "frame counts stay small")]
            let frames = self.frame_counter as f32;
            debug!("{} fps", (frames / span.as_secs_f32()).round());
            self.frame_counter = 0;
            self.frame_time += span;
        }
    }
}
