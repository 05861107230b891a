//! Player commands sent from the input layer to the HUD engine.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::Direction;
use crate::mission::MissionId;
use crate::target::TargetId;

/// All possible player actions on the target computer and mission panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Target computer ---
    /// Power the target computer on.
    EnableComputer,
    /// Power the target computer off, dropping any lock.
    DisableComputer,
    /// Flip between enabled and disabled.
    ToggleComputer,
    /// Lock a target by id.
    SelectTarget { id: TargetId },
    /// Lock a target by exact display name.
    SelectTargetByName { name: String },
    /// Cycle through the registry.
    CycleTarget { direction: Direction },
    /// Drop the current lock.
    ClearTarget,
    /// Cycle through the locked target's sub-systems.
    CycleSubTarget { direction: Direction },

    // --- Mission panel ---
    /// Show or hide the mission status panel.
    ToggleMissionPanel,
    /// Close any open modal panel.
    CloseModal,
    /// The OK button of a mission rewards panel.
    DismissMission { mission_id: MissionId },
}

/// Map a key press to a command. `key` uses DOM-style key names.
pub fn key_binding(key: &str, shift: bool) -> Option<PlayerCommand> {
    let command = match key {
        "Tab" if shift => PlayerCommand::CycleTarget {
            direction: Direction::Previous,
        },
        "Tab" => PlayerCommand::CycleTarget {
            direction: Direction::Next,
        },
        "z" | "Z" => PlayerCommand::CycleSubTarget {
            direction: Direction::Previous,
        },
        "x" | "X" => PlayerCommand::CycleSubTarget {
            direction: Direction::Next,
        },
        "t" | "T" => PlayerCommand::ToggleComputer,
        "m" | "M" => PlayerCommand::ToggleMissionPanel,
        "Escape" => PlayerCommand::CloseModal,
        _ => return None,
    };
    Some(command)
}
