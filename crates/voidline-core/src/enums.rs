//! Enumeration types used throughout the target computer.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Top-level kind of a selectable target. The free-form sub-type
/// ("star", "planet", "refinery", ...) lives on the target itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    CelestialBody,
    Station,
    EnemyShip,
    FriendlyShip,
    Waypoint,
}

impl TargetKind {
    pub fn is_ship(self) -> bool {
        matches!(self, TargetKind::EnemyShip | TargetKind::FriendlyShip)
    }
}

/// Diplomatic class of a target, which drives every HUD color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Diplomacy {
    Enemy,
    Neutral,
    Friendly,
    Unknown,
    Waypoint,
}

impl Diplomacy {
    pub fn color(self) -> &'static str {
        match self {
            Diplomacy::Enemy => COLOR_ENEMY,
            Diplomacy::Neutral => COLOR_NEUTRAL,
            Diplomacy::Friendly => COLOR_FRIENDLY,
            Diplomacy::Unknown => COLOR_UNKNOWN,
            Diplomacy::Waypoint => COLOR_WAYPOINT,
        }
    }

    /// Parse a free-form stance word as used by faction data.
    pub fn from_stance(word: &str) -> Option<Diplomacy> {
        match word.trim().to_ascii_lowercase().as_str() {
            "enemy" | "hostile" => Some(Diplomacy::Enemy),
            "friendly" | "allied" | "ally" => Some(Diplomacy::Friendly),
            "neutral" => Some(Diplomacy::Neutral),
            _ => None,
        }
    }
}

/// Whether a target's true identity is visible to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscoveryStatus {
    Discovered,
    Undiscovered,
    /// Ships and waypoints, which never hide their identity.
    AlwaysVisible,
}

impl DiscoveryStatus {
    pub fn is_visible(self) -> bool {
        !matches!(self, DiscoveryStatus::Undiscovered)
    }
}

/// Target computer lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComputerState {
    #[default]
    Disabled,
    /// Enabled, no target.
    Idle,
    /// Enabled, holding a target.
    Locked,
}

/// Cycling direction for targets and sub-targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Next,
    Previous,
}

impl Direction {
    pub fn step(self) -> isize {
        match self {
            Direction::Next => 1,
            Direction::Previous => -1,
        }
    }

    /// Move `index` one step within `len` slots, wrapping at both ends.
    pub fn wrap(self, index: usize, len: usize) -> usize {
        debug_assert!(len > 0);
        (index as isize + self.step()).rem_euclid(len as isize) as usize
    }
}

/// Services a discovered target offers, shown as HUD icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ServiceIcon {
    Trade,
    Repair,
    Diplomatic,
    Refuel,
}

/// Mission lifecycle as reported by the mission service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    #[default]
    Accepted,
    Achieved,
    Completed,
    Botched,
}

impl MissionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, MissionStatus::Accepted)
    }

    pub fn is_success(self) -> bool {
        matches!(self, MissionStatus::Achieved | MissionStatus::Completed)
    }
}

/// Card rarity tiers used for reward grants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardRarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Severity of a HUD notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}
