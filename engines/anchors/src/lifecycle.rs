use std::time::Duration;

use log::{info, warn};

use crate::{
    controller::Controller,
    frame::Frame,
    platform::SleepTimeout,
    report::FrameReport,
    session::SessionStatus,
};

pub const DEFAULT_TARGET_FRAME_RATE: u32 = 60;

/// Time the user gets to read the error toast before the application quits.
pub const DEFAULT_QUIT_DELAY: Duration = Duration::from_millis(500);

const PERMISSION_MESSAGE: &str = "Camera permission is needed to run this application.";
const CONNECTION_MESSAGE: &str =
    "The AR session encountered a problem connecting. Please start the app again.";

/// Application-level reactions to the session state.
///
/// - requests the target frame rate on start
/// - quits when the back button is pressed
/// - keeps the screen awake while tracking
/// - shows a toast and quits shortly after when the session reports an error
pub struct LifecycleController {
    target_frame_rate: u32,
    quit_delay: Duration,
    /// frame time at which the application quits, set once an error was reported
    quit_at: Option<Duration>,
}

impl LifecycleController {
    #[must_use]
    pub fn new(target_frame_rate: u32, quit_delay: Duration) -> Self {
        Self {
            target_frame_rate,
            quit_delay,
            quit_at: None,
        }
    }

    #[must_use]
    pub fn is_quitting(&self) -> bool {
        self.quit_at.is_some()
    }

    fn schedule_quit(&mut self, frame: &mut Frame<'_>, message: &str) {
        warn!("session status {:?}, quitting", frame.session.status());
        frame.platform.show_toast(message);
        self.quit_at = Some(frame.time.saturating_add(self.quit_delay));
    }
}

impl Default for LifecycleController {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_FRAME_RATE, DEFAULT_QUIT_DELAY)
    }
}

impl Controller for LifecycleController {
    fn name(&self) -> &'static str {
        "lifecycle"
    }

    fn init(&mut self, frame: &mut Frame<'_>) {
        frame.platform.set_target_frame_rate(self.target_frame_rate);
    }

    fn update(&mut self, frame: &mut Frame<'_>, _report: &mut FrameReport) {
        if frame.input.back_pressed() {
            info!("back button pressed, quitting");
            frame.platform.quit();
        }

        let status = frame.session.status();
        frame.platform.set_sleep_timeout(if status == SessionStatus::Tracking {
            SleepTimeout::NeverSleep
        } else {
            SleepTimeout::SystemSetting
        });

        if let Some(quit_at) = self.quit_at {
            if frame.time >= quit_at {
                frame.platform.quit();
            }
            return;
        }

        if status == SessionStatus::ErrorPermissionNotGranted {
            self.schedule_quit(frame, PERMISSION_MESSAGE);
        } else if status.is_error() {
            self.schedule_quit(frame, CONNECTION_MESSAGE);
        }
    }
}
