use std::time::Duration;

use crate::{input::Input, platform::Platform, scene::Scene, session::Session};

/// Everything a controller may look at or change during one frame.
pub struct Frame<'frame> {
    /// time since the application started
    pub time: Duration,
    pub session: &'frame mut dyn Session,
    pub scene: &'frame mut dyn Scene,
    pub input: &'frame dyn Input,
    pub platform: &'frame mut dyn Platform,
}

/// Provides the collaborators for each frame of a [`FrameLoop`](crate::FrameLoop).
pub trait Backend {
    /// Advances the external systems to `time`. Called once before each frame.
    fn begin_frame(&mut self, time: Duration);

    /// borrows the collaborators for the frame at `time`
    fn frame(&mut self, time: Duration) -> Frame<'_>;

    /// checked after [`Backend::begin_frame`]; `true` ends the loop
    fn should_exit(&self) -> bool;
}
