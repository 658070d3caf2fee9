/// Screen dimming behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SleepTimeout {
    /// whatever the user configured for the device
    #[default]
    SystemSetting,
    NeverSleep,
}

/// Services of the operating system the application runs on.
pub trait Platform {
    fn set_target_frame_rate(&mut self, frames_per_second: u32);

    fn set_sleep_timeout(&mut self, timeout: SleepTimeout);

    /// short, non-blocking notification for the user
    fn show_toast(&mut self, message: &str);

    /// asks the application to exit after the current frame
    fn quit(&mut self);
}
