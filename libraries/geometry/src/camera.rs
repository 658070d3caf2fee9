use glam::{Mat4, Quat, Vec3};

use crate::Pose;

/// The first-person camera rendering the passthrough image.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Camera {
    pub pose: Pose,
}

impl Camera {
    #[must_use]
    pub fn new(pose: Pose) -> Self {
        Self { pose }
    }

    /// camera at `eye` looking towards `center`, Y-up
    #[must_use]
    pub fn looking_at(eye: Vec3, center: Vec3) -> Self {
        let view = Mat4::look_at_rh(eye, center, Vec3::Y);
        let rotation = Quat::from_mat4(&view.inverse());
        Self {
            pose: Pose::new(eye, rotation),
        }
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        self.pose.matrix().inverse()
    }
}
