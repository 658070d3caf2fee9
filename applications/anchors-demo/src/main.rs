//! Replays a scenario script against the controllers enabled in a configuration file.
//!
//! ```text
//! application-anchors-demo [--config <path>] [--scenario <path>] [--realtime]
//! ```
//!
//! Without `--realtime` the frames are simulated as fast as possible. The defaults are the
//! `config.json` and `scenario.json` next to this crate's manifest.

#![allow(missing_docs, reason = "binary crate")]

mod error;

use std::{path::PathBuf, process::ExitCode};

use anchors_framework::{logging::init_logger, register_ctrlc};
use engine_anchors::{
    simulation::{Script, SimulatedWorld},
    ArConfig, FrameLoop,
};
use error::{ApplicationError, ApplicationResult};
use lib_time::{Clock, ManualClock, SystemClock};
use log::{error, info};

const DEFAULT_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config.json");
const DEFAULT_SCENARIO: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/scenario.json");

struct Options {
    config: PathBuf,
    scenario: PathBuf,
    realtime: bool,
}

impl Options {
    fn from_env() -> ApplicationResult<Self> {
        let mut args = pico_args::Arguments::from_env();
        let options = Self {
            config: args
                .opt_value_from_str("--config")?
                .unwrap_or_else(|| DEFAULT_CONFIG.into()),
            scenario: args
                .opt_value_from_str("--scenario")?
                .unwrap_or_else(|| DEFAULT_SCENARIO.into()),
            realtime: args.contains("--realtime"),
        };

        let remaining = args.finish();
        if !remaining.is_empty() {
            return Err(ApplicationError::UnexpectedArguments(remaining));
        }
        Ok(options)
    }
}

fn main() -> ExitCode {
    init_logger();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error}");
            error.into()
        }
    }
}

fn run() -> ApplicationResult<()> {
    let options = Options::from_env()?;
    let config = ArConfig::load(&options.config)?;
    let script = Script::load(&options.scenario)?;
    info!(
        "replaying {} ({} steps, {:?})",
        options.scenario.display(),
        script.steps.len(),
        script.end()
    );

    let mut world = SimulatedWorld::with_script(script).with_interrupt(register_ctrlc());
    let mut frame_loop = FrameLoop::from_config(&config, &mut world.scene);
    info!("controllers: {}", frame_loop.controller_names().join(", "));

    let clock: Box<dyn Clock> = if options.realtime {
        Box::new(SystemClock::start())
    } else {
        Box::new(ManualClock::new())
    };
    let stats = frame_loop.run(&mut world, clock.as_ref());

    info!(
        "{} frames, {} proxies created, {} destroyed, {} taps rejected",
        stats.frames, stats.created, stats.destroyed, stats.rejected_taps
    );
    info!(
        "{} anchors still alive, {} scene nodes",
        world.session.live_anchors().len(),
        world.scene.node_count()
    );
    Ok(())
}
