use indexmap::IndexSet;

use crate::input::{Input, PointerId, TapGesture, Touch};

/// Input of a single frame, filled in by tests or a script.
#[derive(Default)]
pub struct ScriptedInput {
    touches: Vec<Touch>,
    taps: Vec<TapGesture>,
    pointers_over_ui: IndexSet<PointerId>,
    back_pressed: bool,
}

impl ScriptedInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_touch(&mut self, touch: Touch) {
        self.touches.push(touch);
    }

    pub fn push_tap(&mut self, tap: TapGesture) {
        self.taps.push(tap);
    }

    pub fn set_pointer_over_ui(&mut self, pointer: PointerId, over_ui: bool) {
        if over_ui {
            self.pointers_over_ui.insert(pointer);
        } else {
            self.pointers_over_ui.shift_remove(&pointer);
        }
    }

    pub fn press_back(&mut self) {
        self.back_pressed = true;
    }

    /// forgets everything, ready for the next frame
    pub fn clear(&mut self) {
        self.touches.clear();
        self.taps.clear();
        self.pointers_over_ui.clear();
        self.back_pressed = false;
    }
}

impl Input for ScriptedInput {
    fn touches(&self) -> Vec<Touch> {
        self.touches.clone()
    }

    fn tap_gestures(&self) -> Vec<TapGesture> {
        self.taps.clone()
    }

    fn is_pointer_over_ui(&self, pointer: PointerId) -> bool {
        self.pointers_over_ui.contains(&pointer)
    }

    fn back_pressed(&self) -> bool {
        self.back_pressed
    }
}
