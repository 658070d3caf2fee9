use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::scene::NodeId;

/// Identifies a finger (or mouse button) across frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointerId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Began,
    Moved,
    Stationary,
    Ended,
    Canceled,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Touch {
    pub pointer: PointerId,
    /// screen position in pixels
    pub position: Vec2,
    pub phase: TouchPhase,
}

/// A completed tap as recognized by the gesture system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapGesture {
    pub pointer: PointerId,
    pub start_position: Vec2,
    /// scene node under the tap, if any
    pub target: Option<NodeId>,
    pub cancelled: bool,
}

/// User input of the current frame.
pub trait Input {
    /// active touches, in the order the fingers went down
    fn touches(&self) -> Vec<Touch>;

    /// taps that completed during this frame
    fn tap_gestures(&self) -> Vec<TapGesture>;

    /// whether the pointer currently hovers a UI widget
    fn is_pointer_over_ui(&self, pointer: PointerId) -> bool;

    /// the platform's back button (escape on desktop)
    fn back_pressed(&self) -> bool;
}
