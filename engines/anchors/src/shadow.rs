use crate::{controller::Controller, frame::Frame, report::FrameReport, scene::NodeId};

/// Hides the light estimation shadow plane while depth is enabled.
///
/// Shadows cast onto the plane ignore depth and would render through real objects.
pub struct ShadowQuadController {
    quad: NodeId,
}

impl ShadowQuadController {
    #[must_use]
    pub fn new(quad: NodeId) -> Self {
        Self { quad }
    }
}

impl Controller for ShadowQuadController {
    fn name(&self) -> &'static str {
        "shadow quad"
    }

    fn update(&mut self, frame: &mut Frame<'_>, _report: &mut FrameReport) {
        let depth_enabled = frame
            .session
            .config()
            .is_some_and(|config| config.depth_mode.is_enabled());
        if frame.scene.is_active(self.quad) == depth_enabled {
            frame.scene.set_active(self.quad, !depth_enabled);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use lib_geometry::Pose;

    use super::*;
    use crate::{
        scene::{Parent, PrefabId, Scene},
        session::{DepthMode, SessionConfig},
        simulation::SimulatedWorld,
    };

    #[test]
    fn quad_follows_depth_mode() {
        let mut world = SimulatedWorld::new();
        let quad = world
            .scene
            .instantiate(&PrefabId::from("shadow_quad"), Parent::Root, Pose::IDENTITY);
        let mut shadow = ShadowQuadController::new(quad);

        world.run_controller(&mut shadow, Duration::ZERO);
        assert!(world.scene.is_active(quad));

        world.session.set_config(Some(SessionConfig {
            depth_mode: DepthMode::Automatic,
            ..SessionConfig::default()
        }));
        world.run_controller(&mut shadow, Duration::ZERO);
        assert!(!world.scene.is_active(quad));

        world.session.set_config(None);
        world.run_controller(&mut shadow, Duration::ZERO);
        assert!(world.scene.is_active(quad));
    }
}
