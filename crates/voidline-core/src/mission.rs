//! Mission records as exchanged with the mission service, plus the
//! player's faction standings.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{REPUTATION_FRIENDLY_AT, REPUTATION_HOSTILE_AT, REPUTATION_MAX, REPUTATION_MIN};
use crate::enums::{Diplomacy, MissionStatus};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissionId(pub String);

impl MissionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MissionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub is_achieved: bool,
    #[serde(default)]
    pub is_optional: bool,
}

/// Card portion of a mission reward.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CardRewards {
    #[serde(default)]
    pub count: u32,
    /// Specific cards to grant, by name.
    #[serde(default)]
    pub names: Option<Vec<String>>,
    /// Card types parallel to `names`, when the service already resolved them.
    #[serde(default)]
    pub types: Option<Vec<String>>,
    /// Types to pick from uniformly when no names are given.
    #[serde(default)]
    pub preferred_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rewards {
    #[serde(default)]
    pub credits: u64,
    #[serde(default)]
    pub faction_bonuses: BTreeMap<String, i32>,
    #[serde(default)]
    pub cards: CardRewards,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub title: String,
    #[serde(default)]
    pub status: MissionStatus,
    #[serde(default)]
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub rewards: Rewards,
}

impl Objective {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            is_achieved: false,
            is_optional: false,
        }
    }
}

impl Mission {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: MissionId::new(id),
            title: title.into(),
            status: MissionStatus::Accepted,
            objectives: Vec::new(),
            rewards: Rewards::default(),
        }
    }

    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objectives.push(objective);
        self
    }

    pub fn with_rewards(mut self, rewards: Rewards) -> Self {
        self.rewards = rewards;
        self
    }

    /// True once every required objective is achieved. A mission with no
    /// objectives is never complete by objectives alone.
    pub fn all_objectives_achieved(&self) -> bool {
        let mut required = self.objectives.iter().filter(|o| !o.is_optional).peekable();
        required.peek().is_some() && required.all(|o| o.is_achieved)
    }

    /// Mark an objective achieved. Returns false for an unknown objective id.
    pub fn achieve_objective(&mut self, objective_id: &str) -> bool {
        match self.objectives.iter_mut().find(|o| o.id == objective_id) {
            Some(objective) => {
                objective.is_achieved = true;
                true
            }
            None => false,
        }
    }
}

/// Player reputation per faction, bounded to `[-100, 100]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactionStandings {
    standings: BTreeMap<String, i32>,
}

impl FactionStandings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, faction: &str) -> i32 {
        self.standings.get(faction).copied().unwrap_or(0)
    }

    /// Apply a delta and return the clamped new value.
    pub fn adjust(&mut self, faction: &str, delta: i32) -> i32 {
        let entry = self.standings.entry(faction.to_string()).or_insert(0);
        *entry = entry.saturating_add(delta).clamp(REPUTATION_MIN, REPUTATION_MAX);
        *entry
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.standings.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Diplomatic stance implied by a standing.
    pub fn stance(&self, faction: &str) -> Diplomacy {
        let value = self.get(faction);
        if value <= REPUTATION_HOSTILE_AT {
            Diplomacy::Enemy
        } else if value >= REPUTATION_FRIENDLY_AT {
            Diplomacy::Friendly
        } else {
            Diplomacy::Neutral
        }
    }

    /// Encode as the `faction_standings` query value (`A:10,B:-3`).
    pub fn to_query_value(&self) -> String {
        self.standings
            .iter()
            .map(|(k, v)| format!("{k}:{v}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}
