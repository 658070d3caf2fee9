use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    error::{parse_json, read_file, LoadError, LoadResult},
    lifecycle::{DEFAULT_QUIT_DELAY, DEFAULT_TARGET_FRAME_RATE},
    reconciler::DEFAULT_STALE_AFTER,
    scene::PrefabId,
    session::RaycastFilter,
};

/// Which controllers a [`FrameLoop`](crate::FrameLoop) runs and how they are tuned.
///
/// Every field has a default, so an empty JSON object is a valid configuration that only runs
/// the lifecycle controller, the autofocus toggle and the fit-to-scan overlay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArConfig {
    pub target_frame_rate: u32,
    /// seconds between an error toast and quitting
    pub quit_delay_secs: f32,
    pub fit_to_scan_overlay: bool,
    /// toggle the focus mode on two-finger taps
    pub autofocus_toggle: bool,
    /// show a shadow receiver quad while depth is disabled
    pub shadow_quad: bool,
    pub markers: Option<MarkerConfig>,
    pub placement: Option<PlacementConfig>,
}

impl Default for ArConfig {
    fn default() -> Self {
        Self {
            target_frame_rate: DEFAULT_TARGET_FRAME_RATE,
            quit_delay_secs: DEFAULT_QUIT_DELAY.as_secs_f32(),
            fit_to_scan_overlay: true,
            autofocus_toggle: true,
            shadow_quad: false,
            markers: None,
            placement: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkerConfig {
    /// one prefab per image, indexed by the image's database index
    pub prefabs: Vec<PrefabId>,
    #[serde(default = "MarkerConfig::default_stale_after_secs")]
    pub stale_after_secs: f32,
    #[serde(default = "MarkerConfig::default_require_full_tracking")]
    pub require_full_tracking: bool,
}

impl MarkerConfig {
    fn default_stale_after_secs() -> f32 {
        DEFAULT_STALE_AFTER.as_secs_f32()
    }

    fn default_require_full_tracking() -> bool {
        true
    }

    /// only meaningful after [`ArConfig::validate`] succeeded, saturates otherwise
    #[must_use]
    pub fn stale_after(&self) -> Duration {
        Duration::try_from_secs_f32(self.stale_after_secs).unwrap_or(Duration::MAX)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlacementConfig {
    pub template: PrefabId,
    /// wrap placed models in this prefab and place on tap gestures instead of raw touches
    #[serde(default)]
    pub manipulator: Option<PrefabId>,
    #[serde(default)]
    pub raycast_filter: Option<RaycastFilter>,
}

impl ArConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> LoadResult<Self> {
        let config: Self = parse_json(json, "<string>")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the JSON configuration at `path`.
    pub fn load(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref();
        let config: Self = parse_json(&read_file(path)?, path.display().to_string())?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LoadResult<()> {
        if self.target_frame_rate == 0 {
            return Err(LoadError::Invalid("target_frame_rate must be positive".into()));
        }
        seconds("quit_delay_secs", self.quit_delay_secs)?;
        if let Some(markers) = &self.markers {
            let stale_after = seconds("markers.stale_after_secs", markers.stale_after_secs)?;
            if stale_after.is_zero() {
                return Err(LoadError::Invalid(
                    "markers.stale_after_secs must be positive".into(),
                ));
            }
            let empty = markers.prefabs.iter().position(|prefab| prefab.as_str().is_empty());
            if let Some(index) = empty {
                return Err(LoadError::Invalid(format!("markers.prefabs[{index}] is empty")));
            }
        }
        if let Some(placement) = &self.placement {
            if placement.template.as_str().is_empty() {
                return Err(LoadError::Invalid("placement.template is empty".into()));
            }
            if placement
                .manipulator
                .as_ref()
                .is_some_and(|manipulator| manipulator.as_str().is_empty())
            {
                return Err(LoadError::Invalid("placement.manipulator is empty".into()));
            }
        }
        Ok(())
    }

    /// only meaningful after [`ArConfig::validate`] succeeded, saturates otherwise
    #[must_use]
    pub fn quit_delay(&self) -> Duration {
        Duration::try_from_secs_f32(self.quit_delay_secs).unwrap_or(Duration::MAX)
    }
}

/// Converts a non-negative number of seconds, rejecting values a [`Duration`] cannot hold.
fn seconds(field: &str, secs: f32) -> LoadResult<Duration> {
    Duration::try_from_secs_f32(secs).map_err(|error| {
        LoadError::Invalid(format!(
            "{field} must be a non-negative number of seconds, got {secs}: {error}"
        ))
    })
}
