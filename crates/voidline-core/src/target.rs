//! Target data model.
//!
//! Targets are plain data owned by the registry. Every variant shares a
//! common header (id, name, sub-type, faction); ships and stations carry a
//! hull payload with their sub-systems. Scene nodes are referenced by id and
//! resolved through the scene graph at use time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::{ServiceIcon, TargetKind};
use crate::types::Position;

/// Stable identifier of a target, shared with the scene graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub String);

impl TargetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Where a target's position comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Placement {
    /// Fixed coordinates known to the registrar.
    Fixed { position: Position },
    /// Resolved every frame through the scene graph by target id.
    Scene,
}

/// A targetable component of a ship or station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubSystem {
    /// Key of the system ("engines", "weapons", ...).
    pub name: String,
    pub display_name: String,
    /// Health as reported by the ship, either `[0, 1]` or `[0, 100]`.
    pub health: f64,
    /// Accuracy bonus when this system is targeted, as a fraction.
    pub accuracy_bonus: f64,
    /// Damage bonus when this system is targeted, as a fraction.
    pub damage_bonus: f64,
    /// Declared priority; lower values are listed first.
    #[serde(default)]
    pub priority: u8,
    /// Whether the system stays on the sub-target list once destroyed.
    #[serde(default = "default_true")]
    pub targetable_when_destroyed: bool,
}

fn default_true() -> bool {
    true
}

/// Hull and sub-system payload of ships and stations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HullData {
    pub hull_current: f64,
    pub hull_max: f64,
    /// Sub-systems in insertion order.
    pub subsystems: Vec<SubSystem>,
}

/// Variant-specific payload of a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TargetBody {
    CelestialBody,
    Station { hull: HullData },
    EnemyShip { hull: HullData },
    FriendlyShip { hull: HullData },
    Waypoint,
}

/// Any selectable in-world entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub display_name: String,
    /// Free-form sub-type, e.g. "star", "planet", "refinery", "light fighter".
    pub sub_type: String,
    pub faction: Option<String>,
    pub placement: Placement,
    /// Explicit discovery flag; `None` defers to the discovery service.
    pub discovered: Option<bool>,
    /// Set while the target is beyond targeting range.
    #[serde(default)]
    pub out_of_range: bool,
    /// Services offered at the target.
    #[serde(default)]
    pub services: Vec<ServiceIcon>,
    pub body: TargetBody,
}

impl SubSystem {
    pub fn new(name: impl Into<String>, health: f64) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            health,
            accuracy_bonus: 0.0,
            damage_bonus: 0.0,
            priority: 0,
            targetable_when_destroyed: true,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_bonuses(mut self, accuracy: f64, damage: f64) -> Self {
        self.accuracy_bonus = accuracy;
        self.damage_bonus = damage;
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }
}

impl HullData {
    pub fn new(hull_current: f64, hull_max: f64) -> Self {
        Self {
            hull_current,
            hull_max,
            subsystems: Vec::new(),
        }
    }

    pub fn with_subsystem(mut self, system: SubSystem) -> Self {
        self.subsystems.push(system);
        self
    }
}

impl Target {
    fn with_body(
        id: impl Into<String>,
        display_name: impl Into<String>,
        sub_type: impl Into<String>,
        position: Position,
        body: TargetBody,
    ) -> Self {
        Self {
            id: TargetId::new(id),
            display_name: display_name.into(),
            sub_type: sub_type.into(),
            faction: None,
            placement: Placement::Fixed { position },
            discovered: None,
            out_of_range: false,
            services: Vec::new(),
            body,
        }
    }

    pub fn celestial(
        id: impl Into<String>,
        name: impl Into<String>,
        sub_type: impl Into<String>,
        position: Position,
    ) -> Self {
        Self::with_body(id, name, sub_type, position, TargetBody::CelestialBody)
    }

    pub fn station(
        id: impl Into<String>,
        name: impl Into<String>,
        sub_type: impl Into<String>,
        position: Position,
        hull: HullData,
    ) -> Self {
        Self::with_body(id, name, sub_type, position, TargetBody::Station { hull })
    }

    pub fn enemy_ship(
        id: impl Into<String>,
        name: impl Into<String>,
        ship_class: impl Into<String>,
        position: Position,
        hull: HullData,
    ) -> Self {
        Self::with_body(id, name, ship_class, position, TargetBody::EnemyShip { hull })
    }

    pub fn friendly_ship(
        id: impl Into<String>,
        name: impl Into<String>,
        ship_class: impl Into<String>,
        position: Position,
        hull: HullData,
    ) -> Self {
        Self::with_body(id, name, ship_class, position, TargetBody::FriendlyShip { hull })
    }

    pub fn waypoint(id: impl Into<String>, name: impl Into<String>, position: Position) -> Self {
        Self::with_body(id, name, "waypoint", position, TargetBody::Waypoint)
    }

    pub fn with_faction(mut self, faction: impl Into<String>) -> Self {
        self.faction = Some(faction.into());
        self
    }

    pub fn with_discovered(mut self, discovered: bool) -> Self {
        self.discovered = Some(discovered);
        self
    }

    pub fn with_services(mut self, services: impl IntoIterator<Item = ServiceIcon>) -> Self {
        self.services = services.into_iter().collect();
        self
    }

    /// Resolve the position through the scene graph instead of fixed coordinates.
    pub fn tracked_by_scene(mut self) -> Self {
        self.placement = Placement::Scene;
        self
    }

    pub fn kind(&self) -> TargetKind {
        match self.body {
            TargetBody::CelestialBody => TargetKind::CelestialBody,
            TargetBody::Station { .. } => TargetKind::Station,
            TargetBody::EnemyShip { .. } => TargetKind::EnemyShip,
            TargetBody::FriendlyShip { .. } => TargetKind::FriendlyShip,
            TargetBody::Waypoint => TargetKind::Waypoint,
        }
    }

    /// Waypoints have no physical presence.
    pub fn is_virtual(&self) -> bool {
        matches!(self.body, TargetBody::Waypoint)
    }

    pub fn is_ship(&self) -> bool {
        self.kind().is_ship()
    }

    pub fn hull(&self) -> Option<&HullData> {
        match &self.body {
            TargetBody::Station { hull }
            | TargetBody::EnemyShip { hull }
            | TargetBody::FriendlyShip { hull } => Some(hull),
            TargetBody::CelestialBody | TargetBody::Waypoint => None,
        }
    }

    pub fn hull_mut(&mut self) -> Option<&mut HullData> {
        match &mut self.body {
            TargetBody::Station { hull }
            | TargetBody::EnemyShip { hull }
            | TargetBody::FriendlyShip { hull } => Some(hull),
            TargetBody::CelestialBody | TargetBody::Waypoint => None,
        }
    }

    pub fn fixed_position(&self) -> Option<Position> {
        match self.placement {
            Placement::Fixed { position } => Some(position),
            Placement::Scene => None,
        }
    }
}
