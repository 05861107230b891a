//! HUD projection: a pure function from the locked target and its derived
//! facts to a `HudModel`.
//!
//! This module never touches the registry or the scene. Identical inputs
//! give identical models.

use voidline_core::constants::*;
use voidline_core::enums::{Diplomacy, DiscoveryStatus, ServiceIcon, TargetKind};
use voidline_core::state::{HudModel, HullSection, SelectedSubTarget, SubTargetSection};
use voidline_core::target::{HullData, Target};

use crate::diplomacy::{self, FactionTable};
use crate::subtargets::SubTargetEntry;

/// What the player's ship contributes to the projection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShipCaps {
    pub has_sub_targeting: bool,
    /// Accuracy bonus for the selected sub-target, as a fraction.
    pub accuracy_bonus: f64,
    /// Damage bonus for the selected sub-target, as a fraction.
    pub damage_bonus: f64,
}

/// Inputs of one projection.
pub struct Projection<'a> {
    pub target: &'a Target,
    pub distance_km: f64,
    pub out_of_range: bool,
    pub sub_targets: &'a [SubTargetEntry],
    pub sub_cursor: Option<usize>,
    pub discovery: DiscoveryStatus,
    pub ship: ShipCaps,
    pub factions: Option<&'a FactionTable>,
}

pub fn project(input: &Projection<'_>) -> HudModel {
    let target = input.target;
    let visible = input.discovery.is_visible();
    let (class, color) = diplomacy::resolve(target, input.discovery, input.factions);
    let (text_color, background_color) = panel_colors(class);

    let (name_line, type_line) = if visible {
        (target.display_name.clone(), type_label(target))
    } else {
        (LABEL_UNKNOWN.to_string(), LABEL_UNKNOWN.to_string())
    };

    let distance_line = if input.out_of_range {
        LABEL_OUT_OF_RANGE.to_string()
    } else {
        format_distance(input.distance_km)
    };

    let status_icons = if visible {
        let mut icons: Vec<ServiceIcon> = target.services.clone();
        icons.sort();
        icons.dedup();
        icons
    } else {
        Vec::new()
    };

    HudModel {
        target_id: target.id.clone(),
        diplomacy: class,
        border_color: color.to_string(),
        name_line,
        type_line,
        distance_line,
        text_color: text_color.to_string(),
        background_color: background_color.to_string(),
        hull_section: hull_section(target, visible),
        sub_target_section: sub_target_section(input, visible),
        reticle_color: color.to_string(),
        status_icons,
    }
}

/// Text and background for the target panel.
pub fn panel_colors(class: Diplomacy) -> (&'static str, &'static str) {
    match class {
        Diplomacy::Enemy => (TEXT_LIGHT, COLOR_ENEMY),
        Diplomacy::Friendly => (TEXT_DARK, COLOR_FRIENDLY),
        Diplomacy::Neutral => (TEXT_DARK, COLOR_NEUTRAL),
        Diplomacy::Unknown | Diplomacy::Waypoint => (class.color(), BACKGROUND_DEFAULT),
    }
}

/// Human-readable distance: whole meters below 1 km, else kilometers with
/// one decimal. Rounding is half-up.
pub fn format_distance(km: f64) -> String {
    let km = km.max(0.0);
    if km < 1.0 {
        let meters = (km * 1000.0).round();
        if meters < 1000.0 {
            return format!("{} m", meters as u64);
        }
    }
    let tenths = (km * 10.0).round() as u64;
    format!("{}.{} km", tenths / 10, tenths % 10)
}

/// Hull percent: 0 only when the hull is exactly 0, at least 1 for any
/// positive hull, otherwise rounded half-up. `None` without a valid maximum.
pub fn hull_percent(current: f64, max: f64) -> Option<u32> {
    if max.is_nan() || max <= 0.0 || !current.is_finite() {
        return None;
    }
    let current = current.clamp(0.0, max);
    if current == 0.0 {
        return Some(0);
    }
    let raw = current / max * 100.0;
    if raw < 1.0 {
        return Some(raw.ceil().max(1.0) as u32);
    }
    Some((raw.round() as u32).min(100))
}

pub fn hull_bar_color(percent: u32) -> &'static str {
    if percent > HULL_HEALTHY_PERCENT {
        HULL_BAR_HEALTHY
    } else if percent > HULL_DAMAGED_PERCENT {
        HULL_BAR_DAMAGED
    } else {
        HULL_BAR_CRITICAL
    }
}

fn hull_section(target: &Target, visible: bool) -> Option<HullSection> {
    let hull: &HullData = target.hull()?;
    let show = match target.kind() {
        TargetKind::EnemyShip | TargetKind::FriendlyShip => true,
        TargetKind::Station => visible,
        _ => false,
    };
    if !show {
        return None;
    }
    let percent = hull_percent(hull.hull_current, hull.hull_max)?;
    Some(HullSection {
        percent,
        bar_color: hull_bar_color(percent).to_string(),
    })
}

fn sub_target_section(input: &Projection<'_>, visible: bool) -> Option<SubTargetSection> {
    let gated = visible || input.target.is_ship();
    if !gated || !input.ship.has_sub_targeting || input.sub_targets.is_empty() {
        return None;
    }
    let count = input.sub_targets.len();
    let selected = input
        .sub_cursor
        .and_then(|i| input.sub_targets.get(i))
        .map(|entry| SelectedSubTarget {
            system_name: entry.name.clone(),
            system_display_name: entry.display_name.clone(),
            health_percent: entry.health_percent(),
            accuracy_pct: bonus_percent(input.ship.accuracy_bonus),
            damage_pct: bonus_percent(input.ship.damage_bonus),
            destroyed: entry.destroyed,
        });
    let summary_line = match selected {
        Some(_) => None,
        None => Some(format!("{count} targetable systems detected")),
    };
    Some(SubTargetSection {
        selected,
        targetable_count: count,
        summary_line,
    })
}

fn bonus_percent(fraction: f64) -> i32 {
    if fraction.is_finite() {
        (fraction * 100.0).round() as i32
    } else {
        0
    }
}

/// Title-cased sub-type, or the fixed waypoint label.
fn type_label(target: &Target) -> String {
    if target.is_virtual() {
        return LABEL_WAYPOINT.to_string();
    }
    let words: Vec<String> = target
        .sub_type
        .split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();
    if words.is_empty() {
        LABEL_UNKNOWN.to_string()
    } else {
        words.join(" ")
    }
}
