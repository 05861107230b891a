//! Sub-target enumeration for ships and stations, and the cursor that
//! walks the resulting list.

use voidline_core::enums::Direction;
use voidline_core::target::{HullData, SubSystem};

/// One entry of the sub-target list, health already normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct SubTargetEntry {
    pub name: String,
    pub display_name: String,
    /// Health in `[0, 1]`.
    pub health: f64,
    pub accuracy_bonus: f64,
    pub damage_bonus: f64,
    pub destroyed: bool,
}

impl SubTargetEntry {
    /// Health on `[0, 100]`, rounded half-up.
    pub fn health_percent(&self) -> u32 {
        (self.health * 100.0).round().clamp(0.0, 100.0) as u32
    }
}

/// Normalize a reported health value to `[0, 1]`. Values above 1 are read as
/// percentages. Out-of-range input is clamped.
pub fn normalize_health(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    let fraction = if raw > 1.0 { raw / 100.0 } else { raw };
    fraction.clamp(0.0, 1.0)
}

/// Ordered list of targetable sub-systems.
///
/// Systems with health left are always listed; destroyed systems stay listed
/// when `keep_destroyed` is set and the system itself allows it. Order is by
/// declared priority, then insertion order, then name.
pub fn enumerate(hull: &HullData, keep_destroyed: bool) -> Vec<SubTargetEntry> {
    let mut listed: Vec<(usize, &SubSystem)> = hull
        .subsystems
        .iter()
        .enumerate()
        .filter(|(_, system)| {
            normalize_health(system.health) > 0.0
                || (keep_destroyed && system.targetable_when_destroyed)
        })
        .collect();

    listed.sort_by(|(ia, a), (ib, b)| {
        a.priority
            .cmp(&b.priority)
            .then(ia.cmp(ib))
            .then_with(|| a.name.cmp(&b.name))
    });

    listed
        .into_iter()
        .map(|(_, system)| {
            let health = normalize_health(system.health);
            SubTargetEntry {
                name: system.name.clone(),
                display_name: system.display_name.clone(),
                health,
                accuracy_bonus: system.accuracy_bonus,
                damage_bonus: system.damage_bonus,
                destroyed: health <= 0.0,
            }
        })
        .collect()
}

/// Index into the sub-target list of the locked target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubTargetCursor {
    index: Option<usize>,
}

impl SubTargetCursor {
    /// Reset for a freshly locked target.
    pub fn reset(&mut self, count: usize, auto_select: bool) {
        self.index = if count > 0 && auto_select { Some(0) } else { None };
    }

    pub fn clear(&mut self) {
        self.index = None;
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Step through `count` entries, wrapping. From no selection, `Next`
    /// picks the first entry and `Previous` the last.
    pub fn cycle(&mut self, direction: Direction, count: usize) -> Option<usize> {
        if count == 0 {
            self.index = None;
            return None;
        }
        let next = match self.index {
            Some(i) => direction.wrap(i.min(count - 1), count),
            None => match direction {
                Direction::Next => 0,
                Direction::Previous => count - 1,
            },
        };
        self.index = Some(next);
        self.index
    }

    /// Keep the index valid after the list shrank.
    pub fn sync(&mut self, count: usize) {
        self.index = match self.index {
            Some(_) if count == 0 => None,
            Some(i) => Some(i.min(count - 1)),
            None => None,
        };
    }

    pub fn selected<'a>(&self, entries: &'a [SubTargetEntry]) -> Option<&'a SubTargetEntry> {
        self.index.and_then(|i| entries.get(i))
    }
}
