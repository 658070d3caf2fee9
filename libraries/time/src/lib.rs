#![allow(missing_docs, reason = "small crate, the names speak for themselves")]

use std::{cell::Cell, thread, time::Duration};

use web_time::Instant;

/// Source of the frame time.
///
/// All times are measured relative to the creation of the clock so they can be compared across
/// frames without dealing with platform specific instants.
pub trait Clock {
    /// time elapsed since the clock was started
    fn now(&self) -> Duration;

    /// blocks until `duration` has passed
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by [`web_time::Instant`] so it also works in browsers.
pub struct SystemClock {
    start_time: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn start() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start_time.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Clock that only moves when told to. Sleeping advances the time instantly.
#[derive(Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get().saturating_add(duration));
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// Duration of a single frame at the given rate, rounded to the nearest nanosecond.
///
/// Same as `Duration::from_secs_f64(f64::from(frames_per_second).recip())` but exact and usable in
/// const contexts. A rate of zero is treated as one frame per second.
#[must_use]
pub const fn frame_duration(frames_per_second: u32) -> Duration {
    let frames_per_second = if frames_per_second == 0 {
        1
    } else {
        frames_per_second as u64
    };
    Duration::from_nanos((1_000_000_000_u64 + frames_per_second / 2) / frames_per_second)
}
