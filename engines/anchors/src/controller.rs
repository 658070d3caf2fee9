use crate::{frame::Frame, report::FrameReport};

/// A unit of per-frame behaviour run by the [`FrameLoop`](crate::FrameLoop).
pub trait Controller {
    /// name used in log messages
    fn name(&self) -> &'static str;

    /// called once before the first frame
    fn init(&mut self, _frame: &mut Frame<'_>) {}

    fn update(&mut self, frame: &mut Frame<'_>, report: &mut FrameReport);

    /// whether this controller currently keeps any proxy alive
    fn has_instances(&self) -> bool {
        false
    }
}
