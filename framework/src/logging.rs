use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(debug_assertions)]
const DEFAULT_LEVEL: Level = Level::DEBUG;
#[cfg(not(debug_assertions))]
const DEFAULT_LEVEL: Level = Level::INFO;

fn target_filter() -> filter::Targets {
    filter::Targets::new()
        .with_default(DEFAULT_LEVEL)
        // one debug message per script step
        .with_target("engine_anchors::simulation", Level::INFO)
}

/// Sends `tracing` events and `log` records to stdout.
pub fn init_logger() {
    // A layer that logs events to stdout using the human-readable "pretty" format.
    let logger = tracing_subscriber::fmt::layer().pretty();

    tracing_subscriber::registry()
        .with(logger)
        .with(target_filter())
        .with(LevelFilter::from_level(DEFAULT_LEVEL))
        .init();
}
