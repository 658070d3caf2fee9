use std::{path::Path, time::Duration};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::{
    error::{parse_json, read_file, LoadError, LoadResult},
    input::PointerId,
    session::SessionStatus,
    trackable::{TrackingMethod, TrackingState},
};

/// Timed events replayed by a [`SimulatedWorld`](super::SimulatedWorld).
///
/// ```json
/// {
///     "end_secs": 4.0,
///     "steps": [
///         { "at_secs": 0.5, "action": "show_marker", "index": 0 },
///         { "at_secs": 1.0, "action": "add_plane", "name": "floor" },
///         { "at_secs": 1.5, "action": "tap", "position": [540, 960], "hit": { "plane": "floor" } }
///     ]
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// the simulation ends at this time
    pub end_secs: f32,
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub at_secs: f32,
    #[serde(flatten)]
    pub action: ScriptAction,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
    SessionStatus {
        status: SessionStatus,
    },
    /// Starts fully tracking the image with database index `index`, adding it on first use.
    ShowMarker {
        index: usize,
        #[serde(default)]
        position: Vec3,
    },
    /// reports the image as updated without changing it
    ObserveMarker {
        index: usize,
    },
    MarkerState {
        index: usize,
        state: TrackingState,
        #[serde(default)]
        method: TrackingMethod,
    },
    /// Adds a horizontal plane. `upside_down` planes face the floor, like a ceiling.
    AddPlane {
        name: String,
        #[serde(default)]
        position: Vec3,
        #[serde(default)]
        upside_down: bool,
    },
    PlaneState {
        name: String,
        state: TrackingState,
    },
    /// A finger touching the screen, or a completed tap gesture with `gesture`.
    Tap {
        position: Vec2,
        #[serde(default)]
        pointer: PointerId,
        #[serde(default)]
        over_ui: bool,
        /// what a raycast from `position` hits in this frame
        #[serde(default)]
        hit: Option<ScriptHit>,
        #[serde(default)]
        gesture: bool,
    },
    /// a second finger going down while the first one rests
    TwoFingerTap,
    Back,
    Depth {
        enabled: bool,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptHit {
    /// name given in [`ScriptAction::AddPlane`]
    pub plane: String,
    #[serde(default)]
    pub position: Vec3,
}

impl Script {
    #[must_use]
    pub fn new(end_secs: f32, steps: Vec<ScriptStep>) -> Self {
        let mut script = Self { end_secs, steps };
        script.sort();
        script
    }

    /// Parses and validates a JSON script.
    pub fn from_json_str(json: &str) -> LoadResult<Self> {
        Self::checked(parse_json(json, "<string>")?)
    }

    /// Reads, parses and validates the JSON script at `path`.
    pub fn load(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref();
        Self::checked(parse_json(&read_file(path)?, path.display().to_string())?)
    }

    fn checked(mut script: Self) -> LoadResult<Self> {
        checked_seconds("end_secs", script.end_secs)?;
        for step in &script.steps {
            checked_seconds("at_secs", step.at_secs)?;
        }
        script.sort();
        Ok(script)
    }

    /// steps with the same time keep their order
    fn sort(&mut self) {
        self.steps
            .sort_by(|left, right| left.at_secs.total_cmp(&right.at_secs));
    }

    #[must_use]
    pub fn end(&self) -> Duration {
        seconds(self.end_secs)
    }
}

impl ScriptStep {
    #[must_use]
    pub fn at(&self) -> Duration {
        seconds(self.at_secs)
    }
}

/// saturates for values [`Script::checked`] rejects
fn seconds(seconds: f32) -> Duration {
    Duration::try_from_secs_f32(seconds).unwrap_or(Duration::MAX)
}

fn checked_seconds(field: &str, secs: f32) -> LoadResult<Duration> {
    Duration::try_from_secs_f32(secs).map_err(|error| {
        LoadError::Invalid(format!(
            "{field} must be a non-negative number of seconds, got {secs}: {error}"
        ))
    })
}
