//! Keeps proxies in lockstep with the trackables reported by the session.
//!
//! Both reconcilers are pure functions of the current session state and the frame time: besides
//! their proxy tables they keep no state between frames.

mod marker;
mod placement;

pub use marker::{MarkerReconciler, DEFAULT_STALE_AFTER};
pub use placement::{PlacementReconciler, PlacementTrigger};
