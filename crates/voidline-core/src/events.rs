//! Events emitted by the target computer and mission layer, and the game
//! event bus that feeds the mission layer.

use serde::{Deserialize, Serialize};

use crate::enums::{AlertLevel, DiscoveryStatus};
use crate::mission::{Mission, MissionId};
use crate::target::TargetId;

/// Events for the scene graph and other listeners of the target computer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ComputerEvent {
    /// A target was locked.
    TargetLocked { id: TargetId },
    /// The lock was dropped, by request or by a failed invariant.
    TargetCleared { id: TargetId },
    /// Discovery status of the locked target flipped; rebuild its wireframe.
    DiscoveryChanged { id: TargetId, status: DiscoveryStatus },
    /// The selected sub-system changed.
    SubTargetChanged { id: TargetId, system: Option<String> },
}

/// Sound cues for the optional audio player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioCue {
    PowerUp,
    PowerDown,
    TargetAcquired,
    TargetLost,
    SubTargetChanged,
    MissionComplete,
}

impl AudioCue {
    /// Asset path and volume for the cue.
    pub fn asset(&self) -> (&'static str, f32) {
        match self {
            AudioCue::PowerUp => ("audio/targeting/power_up.wav", 0.6),
            AudioCue::PowerDown => ("audio/targeting/power_down.wav", 0.6),
            AudioCue::TargetAcquired => ("audio/targeting/blurb.wav", 0.5),
            AudioCue::TargetLost => ("audio/targeting/lost.wav", 0.4),
            AudioCue::SubTargetChanged => ("audio/targeting/click.wav", 0.3),
            AudioCue::MissionComplete => ("audio/missions/complete.wav", 0.8),
        }
    }
}

/// World events published by other subsystems. Replaces hooking into the
/// combat code: combat publishes, the mission layer subscribes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    EnemyDestroyed { enemy_type: String, location: String },
    LocationReached { location: String },
    CargoDelivered { cargo_type: String, quantity: u32, location: String },
    ObjectiveAchieved { mission_id: MissionId, objective_id: String },
    /// A mission update arrived with a new status.
    MissionStatusChanged { mission: Mission },
    /// The mission service no longer lists a mission.
    MissionDeleted { mission_id: MissionId },
}

impl GameEvent {
    /// Path segment of `POST /api/missions/events/{kind}` for combat-side events.
    pub fn service_kind(&self) -> Option<&'static str> {
        match self {
            GameEvent::EnemyDestroyed { .. } => Some("enemy_destroyed"),
            GameEvent::LocationReached { .. } => Some("location_reached"),
            GameEvent::CargoDelivered { .. } => Some("cargo_delivered"),
            _ => None,
        }
    }
}

/// A simple in-process queue. Publishers push, the owner drains once per tick.
#[derive(Debug, Default)]
pub struct EventBus {
    pending: Vec<GameEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, event: GameEvent) {
        self.pending.push(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Non-blocking toast for the HUD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub level: AlertLevel,
    pub message: String,
    pub tick: u64,
}
