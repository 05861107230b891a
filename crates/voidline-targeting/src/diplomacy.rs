//! Diplomacy resolution: target → diplomatic class and display color.
//!
//! Rules are evaluated in order and the first match wins. The resolver is
//! total; neutral is the fallback for anything it cannot classify.

use std::collections::HashMap;

use voidline_core::enums::{Diplomacy, DiscoveryStatus, TargetKind};
use voidline_core::mission::FactionStandings;
use voidline_core::target::Target;

/// Faction name → stance lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactionTable {
    stances: HashMap<String, Diplomacy>,
}

impl FactionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stances implied by the player's reputation with each faction.
    pub fn from_standings(standings: &FactionStandings) -> Self {
        let stances = standings
            .iter()
            .map(|(faction, _)| (faction.to_string(), standings.stance(faction)))
            .collect();
        Self { stances }
    }

    pub fn set(&mut self, faction: impl Into<String>, stance: Diplomacy) {
        self.stances.insert(faction.into(), stance);
    }

    pub fn stance(&self, faction: &str) -> Option<Diplomacy> {
        self.stances.get(faction).copied()
    }
}

/// Resolve a target's diplomatic class and color.
pub fn resolve(
    target: &Target,
    discovery: DiscoveryStatus,
    factions: Option<&FactionTable>,
) -> (Diplomacy, &'static str) {
    let class = classify(target, discovery, factions);
    (class, class.color())
}

fn classify(
    target: &Target,
    discovery: DiscoveryStatus,
    factions: Option<&FactionTable>,
) -> Diplomacy {
    let kind = target.kind();

    if target.is_virtual() || kind == TargetKind::Waypoint {
        return Diplomacy::Waypoint;
    }

    if !kind.is_ship() && discovery == DiscoveryStatus::Undiscovered {
        return Diplomacy::Unknown;
    }

    if target.sub_type.to_ascii_lowercase().contains("star") {
        return Diplomacy::Neutral;
    }

    match faction_stance(target, factions) {
        Some(Diplomacy::Enemy) => Diplomacy::Enemy,
        Some(Diplomacy::Friendly) => Diplomacy::Friendly,
        _ => Diplomacy::Neutral,
    }
}

/// Stance from the faction table, else from the faction string itself,
/// else implied by the ship variant. A neutral table entry only reflects a
/// middling standing, so it does not override the variant.
fn faction_stance(target: &Target, factions: Option<&FactionTable>) -> Option<Diplomacy> {
    let declared = target.faction.as_deref().and_then(|faction| {
        factions
            .and_then(|table| table.stance(faction))
            .filter(|stance| *stance != Diplomacy::Neutral)
            .or_else(|| Diplomacy::from_stance(faction))
    });
    declared.or_else(|| match target.kind() {
        TargetKind::EnemyShip => Some(Diplomacy::Enemy),
        TargetKind::FriendlyShip => Some(Diplomacy::Friendly),
        _ => None,
    })
}
