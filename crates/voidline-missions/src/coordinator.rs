//! Mission completion coordinator.
//!
//! Owns the local mission cache and the `showing_completion` latch. A mission
//! enters the latch when its last objective is achieved (after a short
//! delayed check) or when the service reports a terminal status, and leaves
//! it only when the player dismisses the rewards panel. While latched, no
//! refresh or status update from the service may replace its panel.
//!
//! All mutation happens on the HUD thread; network results arrive here as
//! plain values.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use tracing::{debug, info, warn};

use voidline_core::config::MissionConfig;
use voidline_core::constants::{MAX_NOTIFICATIONS, REWARD_RETRY_DELAY_MS};
use voidline_core::enums::{AlertLevel, MissionStatus};
use voidline_core::events::{AudioCue, GameEvent, Notification};
use voidline_core::mission::{FactionStandings, Mission, MissionId};
use voidline_core::state::{MissionPanelView, ObjectiveView, RewardsPanel};
use voidline_core::types::{millis_to_ticks, SimTime};

use crate::capabilities::MissionCapabilities;
use crate::error::MissionError;
use crate::rewards::RewardGranter;
use crate::scheduler::DelayedCheckScheduler;

#[derive(Debug, Clone, PartialEq)]
enum Job {
    /// Decide whether a mission whose objectives all look achieved is done.
    CompletionCheck(MissionId),
    /// Second and last attempt at crediting a completed mission.
    RewardRetry(MissionId),
}

impl Job {
    fn mission(&self) -> &MissionId {
        match self {
            Job::CompletionCheck(id) | Job::RewardRetry(id) => id,
        }
    }
}

#[derive(Debug, Clone)]
struct Completion {
    /// `None` for a botched mission: panel without rewards.
    rewards: Option<RewardsPanel>,
    /// Tick at which the dismissal fade ends.
    fade_until: Option<u64>,
    deleted_remotely: bool,
}

pub struct MissionCoordinator {
    config: MissionConfig,
    caps: MissionCapabilities,
    standings: FactionStandings,
    granter: RewardGranter,
    missions: BTreeMap<MissionId, Mission>,
    showing_completion: BTreeSet<MissionId>,
    completions: BTreeMap<MissionId, Completion>,
    /// Dismissed missions still listed by the service. Later reports about
    /// them are ignored.
    finished: HashSet<MissionId>,
    scheduler: DelayedCheckScheduler<Job>,
    notifications: VecDeque<Notification>,
    audio_cues: Vec<AudioCue>,
    time: SimTime,
}

impl MissionCoordinator {
    pub fn new(config: MissionConfig, caps: MissionCapabilities) -> Self {
        let granter = RewardGranter::new(config.rng_seed);
        Self {
            config,
            caps,
            standings: FactionStandings::new(),
            granter,
            missions: BTreeMap::new(),
            showing_completion: BTreeSet::new(),
            completions: BTreeMap::new(),
            finished: HashSet::new(),
            scheduler: DelayedCheckScheduler::new(),
            notifications: VecDeque::new(),
            audio_cues: Vec::new(),
            time: SimTime::default(),
        }
    }

    pub fn with_standings(mut self, standings: FactionStandings) -> Self {
        self.standings = standings;
        self
    }

    // --- Inputs ---

    /// Route one event from the game event bus.
    pub fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::ObjectiveAchieved {
                mission_id,
                objective_id,
            } => self.on_objective_achieved(&mission_id, &objective_id),
            GameEvent::MissionStatusChanged { mission } => {
                self.upsert(mission);
            }
            GameEvent::MissionDeleted { mission_id } => self.on_mission_deleted(&mission_id),
            // Combat-side events are forwarded to the service by the caller.
            GameEvent::EnemyDestroyed { .. }
            | GameEvent::LocationReached { .. }
            | GameEvent::CargoDelivered { .. } => {}
        }
    }

    /// Replace the cache with a fresh mission list from the service. Ids in
    /// `showing_completion` keep their local record. Returns how many
    /// listed missions were suppressed.
    pub fn apply_refresh(&mut self, missions: Vec<Mission>) -> usize {
        let listed: HashSet<MissionId> = missions.iter().map(|m| m.id.clone()).collect();
        // Dismissed ids the service has dropped can no longer echo back.
        self.finished.retain(|id| listed.contains(id));
        let stale: Vec<MissionId> = self
            .missions
            .keys()
            .filter(|id| !listed.contains(*id) && !self.showing_completion.contains(*id))
            .cloned()
            .collect();
        for id in stale {
            self.missions.remove(&id);
            self.scheduler.cancel_where(|job| job.mission() == &id);
        }

        let mut suppressed = 0;
        for mission in missions {
            if !self.upsert(mission) {
                suppressed += 1;
            }
        }
        if suppressed > 0 {
            debug!(suppressed, "refresh suppressed for completed missions");
        }
        suppressed
    }

    /// Cache one mission update. Returns false when the update was ignored
    /// because the mission is latched or already dismissed.
    pub fn upsert(&mut self, mission: Mission) -> bool {
        if self.finished.contains(&mission.id) {
            return false;
        }
        if self.showing_completion.contains(&mission.id) {
            debug!(mission = %mission.id, "update suppressed while showing completion");
            return false;
        }
        let mut mission = mission;
        if let Some(local) = self.missions.get(&mission.id) {
            keep_local_achievements(&mut mission, local);
        }
        let id = mission.id.clone();
        let terminal = mission.status.is_terminal();
        self.missions.insert(id.clone(), mission);
        if terminal {
            self.complete(&id);
        } else {
            self.schedule_completion_check(&id);
        }
        true
    }

    /// A mission request failed. Caches stay as they are; the player gets a
    /// toast.
    pub fn request_failed(&mut self, context: &str, err: &MissionError) {
        warn!(context, error = %err, "mission service request failed");
        self.notify(
            AlertLevel::Warning,
            format!("Mission service unavailable ({context})"),
        );
    }

    fn on_objective_achieved(&mut self, id: &MissionId, objective_id: &str) {
        if self.finished.contains(id) {
            return;
        }
        let Some(mission) = self.missions.get_mut(id) else {
            debug!(mission = %id, objective = objective_id, "objective for unknown mission");
            return;
        };
        if !mission.achieve_objective(objective_id) {
            debug!(mission = %id, objective = objective_id, "unknown objective");
            return;
        }
        debug!(mission = %id, objective = objective_id, "objective achieved");
        self.schedule_completion_check(id);
    }

    /// Queue the delayed completion check once every required objective is
    /// achieved. A check already pending keeps its due tick.
    fn schedule_completion_check(&mut self, id: &MissionId) {
        let done = self
            .missions
            .get(id)
            .is_some_and(|m| m.all_objectives_achieved());
        if !done
            || self.showing_completion.contains(id)
            || self.finished.contains(id)
            || self.has_pending_check(id)
        {
            return;
        }
        let due = self.time.after(self.config.completion_check_ticks());
        self.scheduler.schedule(due, Job::CompletionCheck(id.clone()));
    }

    fn on_mission_deleted(&mut self, id: &MissionId) {
        if let Some(completion) = self.completions.get_mut(id) {
            // The panel stays until the player dismisses it.
            completion.deleted_remotely = true;
            debug!(mission = %id, "mission deleted remotely, keeping completion panel");
            return;
        }
        if self.missions.remove(id).is_some() {
            debug!(mission = %id, "mission deleted");
        }
        self.scheduler.cancel_where(|job| job.mission() == id);
    }

    // --- Completion protocol ---

    /// Latch a mission's completion, grant its rewards and show the panel.
    /// Returns false when the mission is unknown, already latched or already
    /// dismissed.
    pub fn complete(&mut self, id: &MissionId) -> bool {
        if self.showing_completion.contains(id) {
            debug!(mission = %id, "completion already showing");
            return false;
        }
        if self.finished.contains(id) {
            return false;
        }
        let Some(mission) = self.missions.get_mut(id) else {
            let err = MissionError::UnknownMission(id.clone());
            warn!(error = %err, "cannot complete mission");
            return false;
        };
        if mission.status == MissionStatus::Accepted {
            mission.status = MissionStatus::Completed;
        }
        let mission = mission.clone();

        self.showing_completion.insert(id.clone());
        self.scheduler
            .cancel_where(|job| matches!(job, Job::CompletionCheck(m) if m == id));

        let rewards = if mission.status.is_success() {
            let outcome = self
                .granter
                .grant(&mission, &mut self.caps, &mut self.standings);
            if outcome.credits_pending {
                let due = self.time.after(millis_to_ticks(REWARD_RETRY_DELAY_MS));
                self.scheduler.schedule(due, Job::RewardRetry(id.clone()));
            }
            info!(mission = %id, credits = outcome.panel.credits, "mission complete");
            self.audio_cues.push(AudioCue::MissionComplete);
            self.notify(AlertLevel::Info, format!("Mission complete: {}", mission.title));
            Some(outcome.panel)
        } else {
            info!(mission = %id, status = ?mission.status, "mission ended without rewards");
            self.notify(AlertLevel::Warning, format!("Mission failed: {}", mission.title));
            None
        };

        self.completions.insert(
            id.clone(),
            Completion {
                rewards,
                fade_until: None,
                deleted_remotely: false,
            },
        );
        true
    }

    /// The player pressed OK. Starts the fade; the record is dropped once it
    /// ends. Pending retries for the mission are cancelled.
    pub fn dismiss(&mut self, id: &MissionId) -> bool {
        let fade_ticks = self.config.dismiss_fade_ticks();
        let now = self.time.tick;
        let Some(completion) = self.completions.get_mut(id) else {
            return false;
        };
        if completion.fade_until.is_some() {
            return false;
        }
        completion.fade_until = Some(now + fade_ticks);
        let cancelled = self.scheduler.cancel_where(|job| job.mission() == id);
        debug!(mission = %id, cancelled, "completion dismissed");
        if fade_ticks == 0 {
            self.finalize(id);
        }
        true
    }

    /// Advance to `now`: run due checks and retries, finish faded panels.
    pub fn tick(&mut self, now: SimTime) {
        self.time = now;
        for job in self.scheduler.pop_due(now.tick) {
            match job {
                Job::CompletionCheck(id) => {
                    let done = self
                        .missions
                        .get(&id)
                        .is_some_and(|m| m.all_objectives_achieved());
                    if done {
                        self.complete(&id);
                    } else {
                        debug!(mission = %id, "completion check: objectives outstanding");
                    }
                }
                Job::RewardRetry(id) => self.retry_rewards(&id),
            }
        }

        let faded: Vec<MissionId> = self
            .completions
            .iter()
            .filter(|(_, c)| c.fade_until.is_some_and(|until| now.tick >= until))
            .map(|(id, _)| id.clone())
            .collect();
        for id in faded {
            self.finalize(&id);
        }
    }

    fn retry_rewards(&mut self, id: &MissionId) {
        if !self.showing_completion.contains(id) {
            return;
        }
        let Some(mission) = self.missions.get(id).cloned() else {
            return;
        };
        let outcome = self
            .granter
            .grant(&mission, &mut self.caps, &mut self.standings);
        if outcome.credits_pending {
            let err = MissionError::LedgerRejected(id.clone());
            warn!(error = %err, "reward retry failed, giving up");
            self.notify(
                AlertLevel::Critical,
                format!("Credits for \"{}\" could not be granted", mission.title),
            );
        } else {
            info!(mission = %id, "reward retry succeeded");
        }
    }

    fn finalize(&mut self, id: &MissionId) {
        self.showing_completion.remove(id);
        let remote = self
            .completions
            .remove(id)
            .is_some_and(|c| c.deleted_remotely);
        self.missions.remove(id);
        self.finished.insert(id.clone());
        self.scheduler.cancel_where(|job| job.mission() == id);
        info!(mission = %id, deleted_remotely = remote, "completion panel closed");
    }

    // --- Notifications ---

    pub fn notify(&mut self, level: AlertLevel, message: impl Into<String>) {
        if self.notifications.len() == MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
        self.notifications.push_back(Notification {
            level,
            message: message.into(),
            tick: self.time.tick,
        });
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.iter().cloned().collect()
    }

    pub fn take_audio_cues(&mut self) -> Vec<AudioCue> {
        std::mem::take(&mut self.audio_cues)
    }

    // --- Views ---

    /// Mission panels in id order. Only latched missions carry rewards.
    pub fn panels(&self) -> Vec<MissionPanelView> {
        let fade_ticks = self.config.dismiss_fade_ticks();
        self.missions
            .values()
            .map(|mission| {
                let completion = self.completions.get(&mission.id);
                let opacity = match completion.and_then(|c| c.fade_until) {
                    Some(until) if fade_ticks > 0 => {
                        let left = until.saturating_sub(self.time.tick);
                        (left as f64 / fade_ticks as f64).clamp(0.0, 1.0)
                    }
                    Some(_) => 0.0,
                    None => 1.0,
                };
                MissionPanelView {
                    mission_id: mission.id.clone(),
                    title: mission.title.clone(),
                    status: mission.status,
                    objectives: mission.objectives.iter().map(ObjectiveView::from).collect(),
                    rewards: completion.and_then(|c| c.rewards.clone()),
                    show_ok_button: completion.is_some_and(|c| c.fade_until.is_none()),
                    opacity,
                }
            })
            .collect()
    }

    pub fn is_showing_completion(&self, id: &MissionId) -> bool {
        self.showing_completion.contains(id)
    }

    pub fn showing_completion(&self) -> impl Iterator<Item = &MissionId> {
        self.showing_completion.iter()
    }

    pub fn has_pending_retry(&self, id: &MissionId) -> bool {
        self.scheduler.is_pending(&Job::RewardRetry(id.clone()))
    }

    pub fn has_pending_check(&self, id: &MissionId) -> bool {
        self.scheduler.is_pending(&Job::CompletionCheck(id.clone()))
    }

    pub fn mission(&self, id: &MissionId) -> Option<&Mission> {
        self.missions.get(id)
    }

    pub fn missions(&self) -> impl Iterator<Item = &Mission> {
        self.missions.values()
    }

    pub fn standings(&self) -> &FactionStandings {
        &self.standings
    }

    pub fn standings_mut(&mut self) -> &mut FactionStandings {
        &mut self.standings
    }

    pub fn config(&self) -> &MissionConfig {
        &self.config
    }
}

/// Objectives achieved locally stay achieved when the service echoes an
/// older view of the mission.
fn keep_local_achievements(incoming: &mut Mission, local: &Mission) {
    for objective in &mut incoming.objectives {
        let achieved_here = local
            .objectives
            .iter()
            .any(|o| o.id == objective.id && o.is_achieved);
        if achieved_here {
            objective.is_achieved = true;
        }
    }
}
