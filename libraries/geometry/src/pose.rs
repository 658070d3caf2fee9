use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position and orientation in world space.
///
/// The world is Y-up, which is what AR tracking systems report.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    #[must_use]
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    #[must_use]
    pub const fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// local up axis in world space
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// local forward axis in world space (right handed, looking down -Z)
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// local-to-world transformation
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    /// Whether a surface with this pose shows its back to `viewer`.
    ///
    /// The surface normal is the pose's up axis. Viewers exactly in the surface plane see the
    /// front.
    #[must_use]
    pub fn faces_away_from(&self, viewer: Vec3) -> bool {
        (viewer - self.position).dot(self.up()) < 0.0
    }
}
