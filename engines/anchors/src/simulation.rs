//! In-memory stand-ins for the tracking system, the scene graph, the input devices and the
//! platform.
//!
//! [`SimulatedWorld`] bundles them into a [`Backend`](crate::Backend) that can replay a
//! [`Script`] of timed events, which is how the demo application and the integration tests drive
//! a [`FrameLoop`](crate::FrameLoop) without a device.

mod input;
mod platform;
mod scene;
mod script;
mod session;
mod world;

pub use input::ScriptedInput;
pub use platform::RecordingPlatform;
pub use scene::SimulatedScene;
pub use script::{Script, ScriptAction, ScriptHit, ScriptStep};
pub use session::SimulatedSession;
pub use world::SimulatedWorld;
