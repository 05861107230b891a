//! Capability interfaces the target computer consumes.
//!
//! The computer never reaches for global state: the scene graph, discovery
//! service and ship systems are passed in at construction.

use std::collections::HashSet;

use voidline_core::target::TargetId;
use voidline_core::types::{CameraPose, Position};

use crate::subtargets::SubTargetEntry;

/// The 3D scene: camera pose, live target positions, and HUD-driven
/// visuals (reticle, wireframe).
pub trait SceneGraph {
    fn camera_pose(&self) -> CameraPose;

    /// Current position of a scene-tracked target, or `None` if its node is gone.
    fn target_position(&self, id: &TargetId) -> Option<Position>;

    fn set_reticle_color(&mut self, _color: &str) {}

    /// Discovery status of `id` changed; its wireframe must be rebuilt.
    fn rebuild_wireframe(&mut self, _id: &TargetId) {}
}

/// Answers whether the player has discovered a target.
pub trait DiscoveryService {
    fn is_discovered(&self, id: &TargetId) -> bool;
}

/// The player's ship systems: whether sub-targeting is fitted, and the
/// bonuses targeting a given sub-system grants.
pub trait ShipSystems {
    fn has_sub_targeting(&self) -> bool;

    /// Accuracy bonus (fraction) for targeting `system`.
    fn sub_target_accuracy_bonus(&self, system: &SubTargetEntry) -> f64 {
        system.accuracy_bonus
    }

    /// Damage bonus (fraction) for targeting `system`.
    fn sub_target_damage_bonus(&self, system: &SubTargetEntry) -> f64 {
        system.damage_bonus
    }
}

/// Everything the computer talks to.
pub struct Capabilities {
    pub scene: Box<dyn SceneGraph>,
    pub discovery: Box<dyn DiscoveryService>,
    pub ship: Box<dyn ShipSystems>,
}

/// Discovery backed by a set of discovered ids.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryLog {
    discovered: HashSet<TargetId>,
}

impl DiscoveryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the id was newly discovered.
    pub fn discover(&mut self, id: TargetId) -> bool {
        self.discovered.insert(id)
    }

    pub fn forget(&mut self, id: &TargetId) {
        self.discovered.remove(id);
    }
}

impl DiscoveryService for DiscoveryLog {
    fn is_discovered(&self, id: &TargetId) -> bool {
        self.discovered.contains(id)
    }
}

/// A ship fit with fixed capabilities that echoes per-system bonuses.
#[derive(Debug, Clone, Copy)]
pub struct StandardShip {
    pub sub_targeting: bool,
}

impl ShipSystems for StandardShip {
    fn has_sub_targeting(&self) -> bool {
        self.sub_targeting
    }
}
