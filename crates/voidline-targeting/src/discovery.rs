//! Discovery gate: decides whether a target's true identity is visible, and
//! remembers the last status per target so changes can be announced.

use std::collections::HashMap;

use voidline_core::enums::DiscoveryStatus;
use voidline_core::target::{Target, TargetId};

use crate::capabilities::DiscoveryService;

/// Evaluate discovery for a target whose position may or may not resolve.
pub fn evaluate(
    target: &Target,
    position_resolvable: bool,
    service: &dyn DiscoveryService,
) -> DiscoveryStatus {
    if target.is_ship() || target.is_virtual() {
        return DiscoveryStatus::AlwaysVisible;
    }
    if !position_resolvable {
        return DiscoveryStatus::Undiscovered;
    }
    let discovered = match target.discovered {
        Some(flag) => flag,
        None => service.is_discovered(&target.id),
    };
    if discovered {
        DiscoveryStatus::Discovered
    } else {
        DiscoveryStatus::Undiscovered
    }
}

/// Last observed discovery status per target.
#[derive(Debug, Default)]
pub struct DiscoveryTracker {
    last: HashMap<TargetId, DiscoveryStatus>,
}

impl DiscoveryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a status. Returns true only when a previously observed status
    /// differs; the first observation of a target is not a change.
    pub fn observe(&mut self, id: &TargetId, status: DiscoveryStatus) -> bool {
        match self.last.insert(id.clone(), status) {
            Some(previous) => previous != status,
            None => false,
        }
    }

    pub fn last(&self, id: &TargetId) -> Option<DiscoveryStatus> {
        self.last.get(id).copied()
    }

    pub fn forget(&mut self, id: &TargetId) {
        self.last.remove(id);
    }
}
