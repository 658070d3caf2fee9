use log::info;

use crate::platform::{Platform, SleepTimeout};

/// Remembers every request instead of acting on it. Toasts are logged.
#[derive(Default)]
pub struct RecordingPlatform {
    target_frame_rate: Option<u32>,
    sleep_timeout: SleepTimeout,
    toasts: Vec<String>,
    quit_requested: bool,
}

impl RecordingPlatform {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn target_frame_rate(&self) -> Option<u32> {
        self.target_frame_rate
    }

    #[must_use]
    pub fn sleep_timeout(&self) -> SleepTimeout {
        self.sleep_timeout
    }

    /// every toast shown so far, oldest first
    #[must_use]
    pub fn toasts(&self) -> &[String] {
        &self.toasts
    }

    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

impl Platform for RecordingPlatform {
    fn set_target_frame_rate(&mut self, frames_per_second: u32) {
        self.target_frame_rate = Some(frames_per_second);
    }

    fn set_sleep_timeout(&mut self, timeout: SleepTimeout) {
        self.sleep_timeout = timeout;
    }

    fn show_toast(&mut self, message: &str) {
        info!("toast: {message}");
        self.toasts.push(message.to_owned());
    }

    fn quit(&mut self) {
        self.quit_requested = true;
    }
}
