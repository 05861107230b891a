//! HUD constants, palette and tuning parameters.

/// HUD frame rate (Hz).
pub const TICK_RATE: u32 = 60;

// --- Diplomacy palette ---

pub const COLOR_WAYPOINT: &str = "#ff00ff";
pub const COLOR_UNKNOWN: &str = "#44ffff";
pub const COLOR_NEUTRAL: &str = "#ffff00";
pub const COLOR_ENEMY: &str = "#ff3333";
pub const COLOR_FRIENDLY: &str = "#00ff41";

/// Text drawn on top of a saturated yellow/green background.
pub const TEXT_DARK: &str = "#000000";
/// Text drawn on top of a red background.
pub const TEXT_LIGHT: &str = "#ffffff";
/// Panel background for diplomacy classes without a solid fill.
pub const BACKGROUND_DEFAULT: &str = "#000000";

// --- Hull bar ---

pub const HULL_BAR_HEALTHY: &str = "#00ff41";
pub const HULL_BAR_DAMAGED: &str = "#ffff00";
pub const HULL_BAR_CRITICAL: &str = "#ff3333";

/// Hull percent above which the bar is drawn healthy.
pub const HULL_HEALTHY_PERCENT: u32 = 50;

/// Hull percent above which the bar is drawn damaged (else critical).
pub const HULL_DAMAGED_PERCENT: u32 = 25;

// --- Labels ---

pub const LABEL_UNKNOWN: &str = "Unknown";
pub const LABEL_OUT_OF_RANGE: &str = "Out of Range";
pub const LABEL_NO_TARGET: &str = "No Target Selected";
pub const LABEL_WAYPOINT: &str = "Waypoint";

// --- Targeting ---

/// Distance (km) at or below which an out-of-range target is re-acquired.
pub const DEFAULT_REACQUIRE_DISTANCE_KM: f64 = 150.0;

/// Distance (km) beyond which a non-virtual target is flagged out of range.
pub const DEFAULT_MAX_RANGE_KM: f64 = 150.0;

/// Frames the computer spends powering up after `enable()`.
pub const DEFAULT_POWER_UP_TICKS: u64 = 30;

// --- Reputation ---

pub const REPUTATION_MIN: i32 = -100;
pub const REPUTATION_MAX: i32 = 100;

/// Standing at or below which a faction is treated as hostile.
pub const REPUTATION_HOSTILE_AT: i32 = -25;

/// Standing at or above which a faction is treated as friendly.
pub const REPUTATION_FRIENDLY_AT: i32 = 25;

// --- Missions ---

/// Delay after an achieved objective before checking for completion, so the
/// waypoint manager can activate the next waypoint.
pub const DEFAULT_COMPLETION_CHECK_DELAY_MS: u64 = 200;

/// Fade-out of a dismissed rewards panel.
pub const DEFAULT_DISMISS_FADE_MS: u64 = 500;

/// Deadline for a single mission service request.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Delay before the single retry of a failed credit grant.
pub const REWARD_RETRY_DELAY_MS: u64 = 1000;

pub const DEFAULT_MISSION_BASE_URL: &str = "http://127.0.0.1:5001";

/// Memo prefix for mission credit grants (`mission:<id>`).
pub const CREDIT_MEMO_PREFIX: &str = "mission:";

/// Maximum notifications kept for the toast stack.
pub const MAX_NOTIFICATIONS: usize = 8;
