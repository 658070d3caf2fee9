#![allow(missing_docs, reason = "TODO remove before release")]

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::{info, warn};

pub mod logging;

/// Installs a Ctrl-C handler and returns the flag it sets.
///
/// Long running loops should poll the flag and wind down once it is set.
#[must_use]
pub fn register_ctrlc() -> Arc<AtomicBool> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&interrupted);
    if let Err(error) = ctrlc::set_handler(move || {
        info!("received Ctrl-C, shutting down");
        handler_flag.store(true, Ordering::Relaxed);
    }) {
        warn!("failed to install Ctrl-C handler: {error}");
    }
    interrupted
}
