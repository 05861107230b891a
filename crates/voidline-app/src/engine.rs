//! HUD engine: owns the target computer and the mission coordinator,
//! processes player commands at the tick boundary and builds one
//! `HudSnapshot` per tick. Headless, so tests drive it directly.

use std::collections::VecDeque;

use tracing::{debug, trace};

use voidline_core::commands::PlayerCommand;
use voidline_core::events::{AudioCue, EventBus, GameEvent};
use voidline_core::mission::FactionStandings;
use voidline_core::state::HudSnapshot;
use voidline_core::types::{CameraPose, SimTime};
use voidline_missions::capabilities::AudioPlayer;
use voidline_missions::coordinator::MissionCoordinator;
use voidline_targeting::diplomacy::FactionTable;
use voidline_targeting::TargetComputer;

use crate::bridge::{MissionRequest, MissionResponse};

/// Audio player that only logs. Used when no sound backend is present.
#[derive(Debug, Default)]
pub struct LogAudio {
    pub played: Vec<String>,
}

impl AudioPlayer for LogAudio {
    fn play(&mut self, path: &str, volume: f32) {
        trace!(path, volume, "audio");
        self.played.push(path.to_string());
    }
}

pub struct HudEngine {
    computer: TargetComputer,
    missions: MissionCoordinator,
    audio: Option<Box<dyn AudioPlayer>>,
    bus: EventBus,
    time: SimTime,
    command_queue: VecDeque<PlayerCommand>,
    camera: Option<CameraPose>,
    mission_panel_open: bool,
    outbound: Vec<MissionRequest>,
    /// Standings the faction table was last built from.
    table_standings: Option<FactionStandings>,
}

impl HudEngine {
    pub fn new(computer: TargetComputer, missions: MissionCoordinator) -> Self {
        Self {
            computer,
            missions,
            audio: None,
            bus: EventBus::new(),
            time: SimTime::default(),
            command_queue: VecDeque::new(),
            camera: None,
            mission_panel_open: false,
            outbound: Vec::new(),
            table_standings: None,
        }
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioPlayer>) -> Self {
        self.audio = Some(audio);
        self
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Publish a world event. Delivered at the next tick.
    pub fn publish(&mut self, event: GameEvent) {
        self.bus.publish(event);
    }

    /// Use this pose instead of the scene graph's own camera.
    pub fn set_camera(&mut self, pose: CameraPose) {
        self.camera = Some(pose);
    }

    /// Apply results from the mission bridge.
    pub fn apply_mission_response(&mut self, response: MissionResponse) {
        match response {
            MissionResponse::Active(missions) => {
                self.missions.apply_refresh(missions);
            }
            MissionResponse::Available(missions) => {
                debug!(count = missions.len(), "missions available");
            }
            MissionResponse::Updated(missions) => {
                for mission in missions {
                    self.missions.upsert(mission);
                }
            }
            MissionResponse::Abandoned(mission_id) => {
                self.bus.publish(GameEvent::MissionDeleted { mission_id });
            }
            MissionResponse::Failed { context, error } => {
                self.missions.request_failed(context, &error);
            }
        }
    }

    /// Requests produced since the last call, for the mission bridge.
    pub fn take_outbound(&mut self) -> Vec<MissionRequest> {
        std::mem::take(&mut self.outbound)
    }

    /// Advance one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> HudSnapshot {
        self.process_commands();
        self.time.advance();
        self.route_events();
        self.missions.tick(self.time);
        self.sync_factions();

        let target = match self.camera {
            Some(pose) => self.computer.tick(pose, self.time),
            None => self.computer.tick_frame(self.time),
        };

        let mut audio_cues = self.computer.take_audio_cues();
        audio_cues.extend(self.missions.take_audio_cues());
        self.play(&audio_cues);

        HudSnapshot {
            time: self.time,
            computer: self.computer.state(),
            powering_up: self.computer.is_powering_up(),
            target: target.map(|model| (*model).clone()),
            mission_panel_open: self.mission_panel_open,
            missions: self.missions.panels(),
            notifications: self.missions.notifications(),
            computer_events: self.computer.take_events(),
            audio_cues,
        }
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.process_command(command);
        }
    }

    fn process_command(&mut self, command: PlayerCommand) {
        debug!(?command, "command");
        match command {
            PlayerCommand::EnableComputer => self.computer.enable(),
            PlayerCommand::DisableComputer => self.computer.disable(),
            PlayerCommand::ToggleComputer => {
                self.computer.toggle();
            }
            PlayerCommand::SelectTarget { id } => {
                self.computer.select_by_id(&id);
            }
            PlayerCommand::SelectTargetByName { name } => {
                self.computer.select_by_name(&name);
            }
            PlayerCommand::CycleTarget { direction } => {
                self.computer.cycle(direction);
            }
            PlayerCommand::ClearTarget => {
                self.computer.clear();
            }
            PlayerCommand::CycleSubTarget { direction } => {
                self.computer.cycle_sub_target(direction);
            }
            PlayerCommand::ToggleMissionPanel => {
                self.mission_panel_open = !self.mission_panel_open;
                if self.mission_panel_open {
                    self.outbound.push(MissionRequest::Refresh);
                }
            }
            PlayerCommand::CloseModal => self.mission_panel_open = false,
            PlayerCommand::DismissMission { mission_id } => {
                self.missions.dismiss(&mission_id);
            }
        }
    }

    /// Combat events go to the mission service; mission events go to the
    /// coordinator. Objective completions are reported to the service too.
    fn route_events(&mut self) {
        for event in self.bus.drain() {
            if event.service_kind().is_some() {
                self.outbound.push(MissionRequest::ReportEvent(event));
                continue;
            }
            if let GameEvent::ObjectiveAchieved {
                mission_id,
                objective_id,
            } = &event
            {
                self.outbound.push(MissionRequest::CompleteObjective {
                    mission_id: mission_id.clone(),
                    objective_id: objective_id.clone(),
                });
            }
            self.missions.handle_event(event);
        }
    }

    fn sync_factions(&mut self) {
        let standings = self.missions.standings();
        if self.table_standings.as_ref() == Some(standings) {
            return;
        }
        self.computer
            .set_factions(Some(FactionTable::from_standings(standings)));
        self.table_standings = Some(standings.clone());
    }

    fn play(&mut self, cues: &[AudioCue]) {
        if let Some(audio) = self.audio.as_mut() {
            for cue in cues {
                let (path, volume) = cue.asset();
                audio.play(path, volume);
            }
        }
    }

    // --- Accessors ---

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn computer(&self) -> &TargetComputer {
        &self.computer
    }

    pub fn computer_mut(&mut self) -> &mut TargetComputer {
        &mut self.computer
    }

    pub fn missions(&self) -> &MissionCoordinator {
        &self.missions
    }

    pub fn missions_mut(&mut self) -> &mut MissionCoordinator {
        &mut self.missions
    }
}
