//! View models: the HUD projection of the locked target, mission panels,
//! and the complete snapshot handed to the renderer each frame.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{AudioCue, ComputerEvent, Notification};
use crate::mission::{MissionId, Objective};
use crate::target::TargetId;
use crate::types::SimTime;

/// Everything a renderer needs to paint the target HUD. Identical inputs
/// produce identical models so the view layer can memoize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudModel {
    pub target_id: TargetId,
    pub diplomacy: Diplomacy,
    pub border_color: String,
    pub name_line: String,
    pub type_line: String,
    pub distance_line: String,
    pub text_color: String,
    pub background_color: String,
    pub hull_section: Option<HullSection>,
    pub sub_target_section: Option<SubTargetSection>,
    pub reticle_color: String,
    pub status_icons: Vec<ServiceIcon>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HullSection {
    pub percent: u32,
    pub bar_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubTargetSection {
    /// Selected sub-system, if any.
    pub selected: Option<SelectedSubTarget>,
    pub targetable_count: usize,
    /// "N targetable systems detected" while nothing is selected.
    pub summary_line: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedSubTarget {
    pub system_name: String,
    pub system_display_name: String,
    pub health_percent: u32,
    pub accuracy_pct: i32,
    pub damage_pct: i32,
    pub destroyed: bool,
}

/// One objective line of a mission panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveView {
    pub description: String,
    pub achieved: bool,
    pub optional: bool,
}

/// Rewards sub-panel shown once a mission completes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RewardsPanel {
    pub credits: u64,
    pub reputation: Vec<ReputationLine>,
    pub cards: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationLine {
    pub faction: String,
    pub delta: i32,
    pub new_value: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionPanelView {
    pub mission_id: MissionId,
    pub title: String,
    pub status: MissionStatus,
    pub objectives: Vec<ObjectiveView>,
    pub rewards: Option<RewardsPanel>,
    pub show_ok_button: bool,
    /// Panel opacity; below 1.0 while fading out after dismissal.
    pub opacity: f64,
}

impl From<&Objective> for ObjectiveView {
    fn from(o: &Objective) -> Self {
        Self {
            description: o.description.clone(),
            achieved: o.is_achieved,
            optional: o.is_optional,
        }
    }
}

/// Complete HUD state broadcast to the renderer after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub time: SimTime,
    pub computer: ComputerState,
    pub powering_up: bool,
    /// `None` renders as "No Target Selected".
    pub target: Option<HudModel>,
    pub mission_panel_open: bool,
    pub missions: Vec<MissionPanelView>,
    pub notifications: Vec<Notification>,
    pub computer_events: Vec<ComputerEvent>,
    pub audio_cues: Vec<AudioCue>,
}
