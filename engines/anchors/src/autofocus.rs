use log::info;

use crate::{controller::Controller, frame::Frame, input::TouchPhase, report::FrameReport};

/// Toggles between fixed and automatic focus with a two-finger tap.
#[derive(Default)]
pub struct AutofocusController;

impl Controller for AutofocusController {
    fn name(&self) -> &'static str {
        "autofocus"
    }

    fn update(&mut self, frame: &mut Frame<'_>, _report: &mut FrameReport) {
        let touches = frame.input.touches();
        let second_finger_down = touches
            .get(1)
            .is_some_and(|touch| touch.phase == TouchPhase::Began);
        if !second_finger_down {
            return;
        }

        if let Some(config) = frame.session.config_mut() {
            config.focus_mode = config.focus_mode.toggled();
            info!("focus mode: {:?}", config.focus_mode);
        }
    }
}
