//! Tunable configuration. Every field has a default so a partial TOML file
//! (or none at all) is valid.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::types::millis_to_ticks;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoidlineConfig {
    pub targeting: TargetingConfig,
    pub missions: MissionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingConfig {
    /// An out-of-range target at or within this distance is re-acquired.
    pub reacquire_distance_km: f64,
    /// Non-virtual targets beyond this distance are flagged out of range.
    pub max_range_km: f64,
    /// Frames of HUD suppression after the computer is enabled.
    pub power_up_ticks: u64,
    /// Select the first sub-system automatically when a target is locked.
    pub auto_select_sub_target: bool,
    /// Keep destroyed sub-systems on the sub-target list.
    pub destroyed_subsystems_targetable: bool,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            reacquire_distance_km: DEFAULT_REACQUIRE_DISTANCE_KM,
            max_range_km: DEFAULT_MAX_RANGE_KM,
            power_up_ticks: DEFAULT_POWER_UP_TICKS,
            auto_select_sub_target: true,
            destroyed_subsystems_targetable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub completion_check_delay_ms: u64,
    pub dismiss_fade_ms: u64,
    /// Seed for card picks. Same seed, same cards.
    pub rng_seed: u64,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MISSION_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            completion_check_delay_ms: DEFAULT_COMPLETION_CHECK_DELAY_MS,
            dismiss_fade_ms: DEFAULT_DISMISS_FADE_MS,
            rng_seed: 42,
        }
    }
}

impl MissionConfig {
    pub fn completion_check_ticks(&self) -> u64 {
        millis_to_ticks(self.completion_check_delay_ms)
    }

    pub fn dismiss_fade_ticks(&self) -> u64 {
        millis_to_ticks(self.dismiss_fade_ms)
    }
}
