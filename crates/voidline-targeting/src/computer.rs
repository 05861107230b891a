//! Target computer state machine.
//!
//! `TargetComputer` owns the registry, the current lock and the sub-target
//! cursor. Selection commands change the lock immediately; `tick` re-checks
//! the lock against the registry and the scene before anything is projected,
//! so a stale target never paints the HUD. Tick is total: every failure
//! drops the lock instead of escaping.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use voidline_core::config::TargetingConfig;
use voidline_core::enums::{ComputerState, Direction};
use voidline_core::error::{Result, TargetingError};
use voidline_core::events::{AudioCue, ComputerEvent};
use voidline_core::state::HudModel;
use voidline_core::target::{Placement, Target, TargetId};
use voidline_core::types::{CameraPose, Position, SimTime};

use crate::capabilities::Capabilities;
use crate::diplomacy::FactionTable;
use crate::discovery::{self, DiscoveryTracker};
use crate::hud::{self, Projection, ShipCaps};
use crate::registry::TargetRegistry;
use crate::subtargets::{self, SubTargetCursor, SubTargetEntry};

#[derive(Debug, Clone)]
struct Lock {
    id: TargetId,
    out_of_range: bool,
}

pub struct TargetComputer {
    config: TargetingConfig,
    caps: Capabilities,
    registry: TargetRegistry,
    factions: Option<FactionTable>,
    enabled: bool,
    time: SimTime,
    /// Tick at which the power-up window ends.
    power_up_until: Option<u64>,
    lock: Option<Lock>,
    sub_cursor: SubTargetCursor,
    discovery: DiscoveryTracker,
    published: Option<Arc<HudModel>>,
    events: Vec<ComputerEvent>,
    audio_cues: Vec<AudioCue>,
    /// Targets already reported for invalid data.
    violations_logged: HashSet<TargetId>,
}

impl TargetComputer {
    /// Create a disabled computer with an empty registry.
    pub fn new(config: TargetingConfig, caps: Capabilities) -> Self {
        Self {
            config,
            caps,
            registry: TargetRegistry::new(),
            factions: None,
            enabled: false,
            time: SimTime::default(),
            power_up_until: None,
            lock: None,
            sub_cursor: SubTargetCursor::default(),
            discovery: DiscoveryTracker::new(),
            published: None,
            events: Vec::new(),
            audio_cues: Vec::new(),
            violations_logged: HashSet::new(),
        }
    }

    // --- Lifecycle ---

    /// Disabled → Idle. Starts the power-up window during which nothing is
    /// published.
    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        self.enabled = true;
        self.power_up_until = match self.config.power_up_ticks {
            0 => None,
            ticks => Some(self.time.after(ticks)),
        };
        self.audio_cues.push(AudioCue::PowerUp);
        debug!(tick = self.time.tick, "target computer enabled");
    }

    /// Any → Disabled. Drops the lock and the sub-target cursor.
    pub fn disable(&mut self) {
        if !self.enabled {
            return;
        }
        self.drop_lock();
        self.enabled = false;
        self.power_up_until = None;
        self.published = None;
        self.audio_cues.push(AudioCue::PowerDown);
        debug!(tick = self.time.tick, "target computer disabled");
    }

    /// Flip power and return the resulting state.
    pub fn toggle(&mut self) -> ComputerState {
        if self.enabled {
            self.disable();
        } else {
            self.enable();
        }
        self.state()
    }

    pub fn state(&self) -> ComputerState {
        match (self.enabled, &self.lock) {
            (false, _) => ComputerState::Disabled,
            (true, None) => ComputerState::Idle,
            (true, Some(_)) => ComputerState::Locked,
        }
    }

    /// True during the transient power-up window after `enable`.
    pub fn is_powering_up(&self) -> bool {
        self.power_up_until.is_some_and(|until| self.time.tick < until)
    }

    // --- Selection ---

    pub fn try_select_by_id(&mut self, id: &TargetId) -> Result<()> {
        if !self.enabled {
            return Err(TargetingError::ComputerDisabled);
        }
        let target = self
            .registry
            .get_by_id(id)
            .ok_or_else(|| TargetingError::TargetNotFound(id.clone()))?;
        if self.resolve_position(target).is_none() {
            return Err(TargetingError::PositionUnresolvable(id.clone()));
        }
        self.lock_on(id.clone());
        Ok(())
    }

    /// Lock a target by id. On failure the current lock is unchanged.
    pub fn select_by_id(&mut self, id: &TargetId) -> bool {
        match self.try_select_by_id(id) {
            Ok(()) => true,
            Err(err) => {
                debug!(error = %err, "select by id failed");
                false
            }
        }
    }

    pub fn try_select_by_name(&mut self, name: &str) -> Result<()> {
        let id = self
            .registry
            .get_by_name(name)
            .map(|t| t.id.clone())
            .ok_or_else(|| TargetingError::TargetNotFound(TargetId::new(name)))?;
        self.try_select_by_id(&id)
    }

    pub fn select_by_name(&mut self, name: &str) -> bool {
        match self.try_select_by_name(name) {
            Ok(()) => true,
            Err(err) => {
                debug!(error = %err, "select by name failed");
                false
            }
        }
    }

    /// Cycle to the next lockable target, skipping targets whose position
    /// cannot be resolved. Returns the new lock.
    pub fn try_cycle(&mut self, direction: Direction) -> Result<TargetId> {
        if !self.enabled {
            return Err(TargetingError::ComputerDisabled);
        }
        let mut last_failure = TargetingError::RegistryEmpty;
        for _ in 0..self.registry.len() {
            let id = match self.registry.cycle(direction) {
                Some(target) => target.id.clone(),
                None => break,
            };
            match self.try_select_by_id(&id) {
                Ok(()) => return Ok(id),
                Err(err @ TargetingError::PositionUnresolvable(_)) => last_failure = err,
                Err(err) => return Err(err),
            }
        }
        Err(last_failure)
    }

    pub fn cycle(&mut self, direction: Direction) -> bool {
        match self.try_cycle(direction) {
            Ok(_) => true,
            Err(err) => {
                debug!(error = %err, "cycle failed");
                false
            }
        }
    }

    /// Locked → Idle. Returns false when nothing was locked.
    pub fn clear(&mut self) -> bool {
        if self.lock.is_none() {
            return false;
        }
        self.drop_lock();
        self.published = None;
        true
    }

    // --- Sub-targets ---

    /// Step the sub-target cursor of the locked target.
    pub fn cycle_sub_target(&mut self, direction: Direction) -> bool {
        let Some(lock) = &self.lock else {
            return false;
        };
        if !self.caps.ship.has_sub_targeting() {
            return false;
        }
        let entries = match self.registry.get_by_id(&lock.id) {
            Some(target) => self.sub_targets_of(target),
            None => return false,
        };
        if entries.is_empty() {
            return false;
        }
        let system = self
            .sub_cursor
            .cycle(direction, entries.len())
            .and_then(|i| entries.get(i))
            .map(|entry| entry.name.clone());
        self.events.push(ComputerEvent::SubTargetChanged {
            id: lock.id.clone(),
            system,
        });
        self.audio_cues.push(AudioCue::SubTargetChanged);
        true
    }

    /// The selected sub-system of the locked target.
    pub fn current_sub_target(&self) -> Option<SubTargetEntry> {
        let lock = self.lock.as_ref()?;
        let target = self.registry.get_by_id(&lock.id)?;
        let entries = self.sub_targets_of(target);
        self.sub_cursor.selected(&entries).cloned()
    }

    // --- Per-frame update ---

    /// Tick using the scene graph's own camera pose.
    pub fn tick_frame(&mut self, now: SimTime) -> Option<Arc<HudModel>> {
        let camera = self.caps.scene.camera_pose();
        self.tick(camera, now)
    }

    /// Re-validate the lock and publish a fresh HUD model. Returns the
    /// published model; `None` means "No Target Selected" or power-up.
    pub fn tick(&mut self, camera: CameraPose, now: SimTime) -> Option<Arc<HudModel>> {
        self.time = now;
        if self.power_up_until.is_some_and(|until| now.tick >= until) {
            self.power_up_until = None;
            debug!(tick = now.tick, "target computer powered up");
        }

        let locked_id = match (&self.lock, self.enabled) {
            (Some(lock), true) => lock.id.clone(),
            _ => {
                self.published = None;
                return None;
            }
        };

        match self.evaluate_lock(&locked_id, camera) {
            Ok(model) => {
                if self.is_powering_up() {
                    self.published = None;
                } else {
                    self.caps.scene.set_reticle_color(&model.reticle_color);
                    self.published = Some(Arc::new(model));
                }
            }
            Err(err) => {
                match err {
                    TargetingError::TargetNotFound(_) | TargetingError::PositionUnresolvable(_) => {
                        debug!(error = %err, "lock lost")
                    }
                    _ => warn!(error = %err, "target computer tick failed, clearing lock"),
                }
                self.drop_lock();
                self.published = None;
            }
        }
        self.published.clone()
    }

    /// Locked-state invariants, in order. Registry presence and position are
    /// checked before anything is computed.
    fn evaluate_lock(&mut self, id: &TargetId, camera: CameraPose) -> Result<HudModel> {
        let mut target = self
            .registry
            .get_by_id(id)
            .cloned()
            .ok_or_else(|| TargetingError::TargetNotFound(id.clone()))?;

        let position = self
            .resolve_position(&target)
            .ok_or_else(|| TargetingError::PositionUnresolvable(id.clone()))?;

        let distance_km = camera.distance_to(&position);
        if !distance_km.is_finite() {
            return Err(TargetingError::NonFiniteDistance(id.clone()));
        }

        let status = discovery::evaluate(&target, true, &*self.caps.discovery);
        if self.discovery.observe(id, status) {
            debug!(target = %id, ?status, "discovery changed");
            self.events.push(ComputerEvent::DiscoveryChanged {
                id: id.clone(),
                status,
            });
            self.caps.scene.rebuild_wireframe(id);
        }

        let out_of_range = self.update_range(id, &target, distance_km);

        self.sanitize(&mut target);
        let entries = self.sub_targets_of(&target);
        self.sub_cursor.sync(entries.len());

        let has_sub_targeting = self.caps.ship.has_sub_targeting();
        let ship = match self.sub_cursor.selected(&entries) {
            Some(entry) => ShipCaps {
                has_sub_targeting,
                accuracy_bonus: self.caps.ship.sub_target_accuracy_bonus(entry),
                damage_bonus: self.caps.ship.sub_target_damage_bonus(entry),
            },
            None => ShipCaps {
                has_sub_targeting,
                ..ShipCaps::default()
            },
        };

        Ok(hud::project(&Projection {
            target: &target,
            distance_km,
            out_of_range,
            sub_targets: &entries,
            sub_cursor: self.sub_cursor.index(),
            discovery: status,
            ship,
            factions: self.factions.as_ref(),
        }))
    }

    /// Apply the range rules and mirror the flag onto the registry entry.
    fn update_range(&mut self, id: &TargetId, target: &Target, distance_km: f64) -> bool {
        let flagged = target.out_of_range || self.lock.as_ref().is_some_and(|l| l.out_of_range);
        let out_of_range = if flagged {
            distance_km > self.config.reacquire_distance_km
        } else {
            !target.is_virtual() && distance_km > self.config.max_range_km
        };

        if flagged && !out_of_range {
            debug!(target = %id, distance_km, "target re-acquired");
        } else if !flagged && out_of_range {
            debug!(target = %id, distance_km, "target out of range");
        }

        if target.out_of_range != out_of_range {
            self.registry.set_out_of_range(id, out_of_range);
        }
        if let Some(lock) = self.lock.as_mut() {
            lock.out_of_range = out_of_range;
        }
        out_of_range
    }

    /// Clamp invalid hull and health data, warning once per target.
    fn sanitize(&mut self, target: &mut Target) {
        let mut violations = Vec::new();
        if let Some(hull) = target.hull_mut() {
            if !hull.hull_max.is_finite() || hull.hull_max < 0.0 {
                violations.push(format!("hull max {}", hull.hull_max));
                hull.hull_max = 0.0;
            }
            if !hull.hull_current.is_finite()
                || hull.hull_current < 0.0
                || hull.hull_current > hull.hull_max
            {
                violations.push(format!("hull {} of {}", hull.hull_current, hull.hull_max));
                hull.hull_current = if hull.hull_current.is_finite() {
                    hull.hull_current.clamp(0.0, hull.hull_max)
                } else {
                    0.0
                };
            }
            for system in &mut hull.subsystems {
                if !system.health.is_finite() || system.health < 0.0 || system.health > 100.0 {
                    violations.push(format!("{} health {}", system.name, system.health));
                    system.health = subtargets::normalize_health(system.health);
                }
            }
        }
        if !violations.is_empty() && self.violations_logged.insert(target.id.clone()) {
            let detail = violations.join(", ");
            let violation = TargetingError::InvariantViolation {
                id: target.id.clone(),
                detail,
            };
            warn!(error = %violation, "clamped invalid target data");
        }
    }

    fn sub_targets_of(&self, target: &Target) -> Vec<SubTargetEntry> {
        target
            .hull()
            .map(|hull| subtargets::enumerate(hull, self.config.destroyed_subsystems_targetable))
            .unwrap_or_default()
    }

    fn resolve_position(&self, target: &Target) -> Option<Position> {
        let position = match target.placement {
            Placement::Fixed { position } => Some(position),
            Placement::Scene => self.caps.scene.target_position(&target.id),
        }?;
        position.is_finite().then_some(position)
    }

    fn lock_on(&mut self, id: TargetId) {
        if self.lock.as_ref().is_some_and(|lock| lock.id == id) {
            return;
        }
        let (count, out_of_range) = match self.registry.get_by_id(&id) {
            Some(target) => (self.sub_targets_of(target).len(), target.out_of_range),
            None => (0, false),
        };
        self.sub_cursor
            .reset(count, self.config.auto_select_sub_target);
        self.registry.set_cursor(&id);
        debug!(target = %id, sub_targets = count, "target locked");
        self.events.push(ComputerEvent::TargetLocked { id: id.clone() });
        self.audio_cues.push(AudioCue::TargetAcquired);
        self.lock = Some(Lock { id, out_of_range });
    }

    fn drop_lock(&mut self) {
        self.sub_cursor.clear();
        if let Some(lock) = self.lock.take() {
            debug!(target = %lock.id, "target cleared");
            self.events.push(ComputerEvent::TargetCleared { id: lock.id });
            self.audio_cues.push(AudioCue::TargetLost);
        }
    }

    // --- Accessors ---

    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    /// Registrar access: add, remove and reorder targets.
    pub fn registry_mut(&mut self) -> &mut TargetRegistry {
        &mut self.registry
    }

    pub fn set_factions(&mut self, factions: Option<FactionTable>) {
        self.factions = factions;
    }

    pub fn capabilities_mut(&mut self) -> &mut Capabilities {
        &mut self.caps
    }

    pub fn config(&self) -> &TargetingConfig {
        &self.config
    }

    pub fn current_target_id(&self) -> Option<&TargetId> {
        self.lock.as_ref().map(|lock| &lock.id)
    }

    pub fn current_target(&self) -> Option<&Target> {
        self.current_target_id()
            .and_then(|id| self.registry.get_by_id(id))
    }

    /// Whether the lock is currently annotated "Out of Range".
    pub fn is_out_of_range(&self) -> bool {
        self.lock.as_ref().is_some_and(|lock| lock.out_of_range)
    }

    /// Last published model.
    pub fn published(&self) -> Option<Arc<HudModel>> {
        self.published.clone()
    }

    pub fn take_events(&mut self) -> Vec<ComputerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn take_audio_cues(&mut self) -> Vec<AudioCue> {
        std::mem::take(&mut self.audio_cues)
    }
}
