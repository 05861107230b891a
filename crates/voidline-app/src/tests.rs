//! Tests for configuration loading, the HUD engine and the loop plumbing.

use std::path::Path;
use std::sync::mpsc;

use voidline_core::commands::{key_binding, PlayerCommand};
use voidline_core::config::VoidlineConfig;
use voidline_core::enums::{AlertLevel, ComputerState, Direction};
use voidline_core::events::{AudioCue, ComputerEvent, GameEvent};
use voidline_core::state::HudSnapshot;
use voidline_core::types::{CameraPose, Position};
use voidline_missions::error::MissionError;

use crate::bridge::{MissionRequest, MissionResponse};
use crate::config;
use crate::demo;
use crate::engine::HudEngine;
use crate::error::ConfigError;
use crate::game_loop::{drain_commands, TICK_DURATION};
use crate::state::{AppState, HudLoopCommand};

fn demo_engine() -> HudEngine {
    demo::build_engine(&VoidlineConfig::default())
}

/// Run `n` ticks and return the last snapshot.
fn run(engine: &mut HudEngine, n: usize) -> HudSnapshot {
    let mut last = engine.tick();
    for _ in 1..n {
        last = engine.tick();
    }
    last
}

/// Enable the computer and wait out the power-up window.
fn powered_engine() -> HudEngine {
    let mut engine = demo_engine();
    engine.queue_command(PlayerCommand::EnableComputer);
    run(&mut engine, 30);
    engine
}

// ---- Configuration ----

#[test]
fn test_parse_partial_config() {
    let config = config::parse(
        r#"
[targeting]
max_range_km = 300.0
auto_select_sub_target = false

[missions]
base_url = "http://missions.local:5001"
"#,
    )
    .expect("valid config");
    assert_eq!(config.targeting.max_range_km, 300.0);
    assert!(!config.targeting.auto_select_sub_target);
    assert_eq!(config.targeting.reacquire_distance_km, 150.0);
    assert_eq!(config.missions.base_url, "http://missions.local:5001");
    assert_eq!(config.missions.request_timeout_secs, 5);
    assert_eq!(config.missions.completion_check_delay_ms, 200);
}

#[test]
fn test_parse_empty_config_is_default() {
    assert_eq!(config::parse("").unwrap(), VoidlineConfig::default());
}

#[test]
fn test_parse_invalid_config() {
    let result = config::parse("[targeting]\nmax_range_km = \"far\"");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let config = config::load_from_path(Path::new("/nonexistent/voidline.toml")).unwrap();
    assert_eq!(config, VoidlineConfig::default());
}

// ---- Loop plumbing ----

#[test]
fn test_tick_duration_constant() {
    // 60 Hz = 16.667 ms per tick
    let expected_nanos = 1_000_000_000u64 / 60;
    assert_eq!(TICK_DURATION.as_nanos(), expected_nanos as u128);
}

#[test]
fn test_drain_commands() {
    let (tx, rx) = mpsc::channel::<HudLoopCommand>();
    let mut engine = demo_engine();

    tx.send(HudLoopCommand::Player(PlayerCommand::EnableComputer))
        .unwrap();
    tx.send(HudLoopCommand::Camera(CameraPose::at(Position::new(
        1.0, 0.0, 0.0,
    ))))
    .unwrap();
    assert!(drain_commands(&mut engine, &rx));
    let snapshot = engine.tick();
    assert_eq!(snapshot.computer, ComputerState::Idle);
    assert!(snapshot.powering_up);

    tx.send(HudLoopCommand::Shutdown).unwrap();
    assert!(!drain_commands(&mut engine, &rx));

    drop(tx);
    assert!(!drain_commands(&mut engine, &rx), "Disconnect stops the loop");
}

#[test]
fn test_app_state_without_loop() {
    let state = AppState::new();
    assert!(state.command_tx.lock().unwrap().is_none());
    assert!(state.snapshot().is_none());
    assert!(!state.is_running());
    assert!(!state.send(HudLoopCommand::Shutdown));
}

#[test]
fn test_app_state_forwards_commands() {
    let state = AppState::new();
    let (tx, rx) = mpsc::channel::<HudLoopCommand>();
    *state.command_tx.lock().unwrap() = Some(tx);
    assert!(state.send(HudLoopCommand::Player(PlayerCommand::ClearTarget)));
    assert!(matches!(
        rx.try_recv(),
        Ok(HudLoopCommand::Player(PlayerCommand::ClearTarget))
    ));
}

// ---- Engine ----

#[test]
fn test_power_up_hides_hud() {
    let mut engine = demo_engine();
    engine.queue_command(PlayerCommand::EnableComputer);
    engine.queue_command(PlayerCommand::SelectTarget {
        id: "A0_star".into(),
    });
    let snapshot = engine.tick();
    assert_eq!(snapshot.computer, ComputerState::Locked);
    assert!(snapshot.powering_up);
    assert!(snapshot.target.is_none());
    assert!(snapshot.audio_cues.contains(&AudioCue::PowerUp));

    let snapshot = run(&mut engine, 29);
    assert!(!snapshot.powering_up);
    let target = snapshot.target.expect("published after power-up");
    assert_eq!(target.name_line, "Sol");
    assert_eq!(target.border_color, "#ffff00");
    assert_eq!(target.distance_line, "14.1 km");
}

#[test]
fn test_key_bindings_drive_the_computer() {
    let mut engine = powered_engine();
    engine.queue_command(key_binding("Tab", false).unwrap());
    let snapshot = engine.tick();
    assert_eq!(
        snapshot.target.as_ref().map(|t| t.target_id.as_str()),
        Some("A0_star")
    );

    engine.queue_command(key_binding("Tab", true).unwrap());
    let snapshot = engine.tick();
    assert_eq!(
        snapshot.target.as_ref().map(|t| t.target_id.as_str()),
        Some("wp_belt"),
        "Shift+Tab wraps to the last target"
    );
    assert_eq!(snapshot.target.unwrap().border_color, "#ff00ff");

    engine.queue_command(key_binding("t", false).unwrap());
    let snapshot = engine.tick();
    assert_eq!(snapshot.computer, ComputerState::Disabled);
    assert!(snapshot.target.is_none());
}

#[test]
fn test_sub_target_cycling_through_engine() {
    let mut engine = powered_engine();
    engine.queue_command(PlayerCommand::SelectTarget {
        id: "enemy_raider_1".into(),
    });
    engine.queue_command(PlayerCommand::CycleSubTarget {
        direction: Direction::Next,
    });
    let snapshot = engine.tick();
    let section = snapshot
        .target
        .and_then(|t| t.sub_target_section)
        .expect("sub-target section");
    let selected = section.selected.expect("selected system");
    assert_eq!(selected.system_name, "weapons");
    assert_eq!(selected.health_percent, 20);
    assert_eq!(selected.accuracy_pct, 10);
    assert_eq!(selected.damage_pct, 30);
    assert!(snapshot.audio_cues.contains(&AudioCue::SubTargetChanged));
}

#[test]
fn test_rapid_toggle_in_one_frame() {
    let mut engine = demo_engine();
    engine.queue_commands([
        PlayerCommand::EnableComputer,
        PlayerCommand::SelectTarget {
            id: "A0_star".into(),
        },
        PlayerCommand::DisableComputer,
        PlayerCommand::EnableComputer,
    ]);
    let snapshot = engine.tick();
    assert_eq!(snapshot.computer, ComputerState::Idle);
    assert!(snapshot.target.is_none());
    assert!(engine.computer().current_target_id().is_none());
}

#[test]
fn test_out_of_range_via_camera() {
    let mut engine = powered_engine();
    engine.queue_command(PlayerCommand::SelectTarget {
        id: "wp_belt".into(),
    });
    engine.set_camera(CameraPose::at(Position::new(0.0, 0.0, 1000.0)));
    let snapshot = engine.tick();
    assert_ne!(
        snapshot.target.as_ref().map(|t| t.distance_line.as_str()),
        Some("Out of Range"),
        "Waypoints are never flagged"
    );

    engine.queue_command(PlayerCommand::SelectTarget {
        id: "enemy_raider_1".into(),
    });
    let snapshot = engine.tick();
    assert_eq!(
        snapshot.target.map(|t| t.distance_line),
        Some("Out of Range".to_string())
    );
}

#[test]
fn test_faction_standings_recolor_targets() {
    let mut engine = powered_engine();
    engine.queue_command(PlayerCommand::SelectTargetByName {
        name: "Terra".into(),
    });
    let snapshot = engine.tick();
    assert_eq!(snapshot.target.unwrap().border_color, "#ffff00");

    engine.missions_mut().standings_mut().adjust("TRA", 30);
    let snapshot = engine.tick();
    assert_eq!(snapshot.target.unwrap().border_color, "#00ff41");
}

#[test]
fn test_pirate_raider_renders_hostile() {
    let mut engine = powered_engine();
    engine.queue_command(PlayerCommand::SelectTarget {
        id: "enemy_raider_1".into(),
    });
    let snapshot = engine.tick();
    assert_eq!(snapshot.target.unwrap().border_color, "#ff3333");

    // A small standing with the faction keeps the ship hostile.
    engine.missions_mut().standings_mut().adjust("PIR", -5);
    let snapshot = engine.tick();
    let target = snapshot.target.unwrap();
    assert_eq!(target.border_color, "#ff3333");
    assert_eq!(target.reticle_color, "#ff3333");
}

#[test]
fn test_out_of_order_objective_replies_still_complete() {
    let mut engine = demo_engine();
    for objective in ["destroy_raider", "reach_belt"] {
        engine.publish(GameEvent::ObjectiveAchieved {
            mission_id: "mission_belt_patrol".into(),
            objective_id: objective.to_string(),
        });
    }
    engine.tick();

    let mut first_reply = demo::sector_missions().remove(0);
    first_reply.achieve_objective("destroy_raider");
    engine.apply_mission_response(MissionResponse::Updated(vec![first_reply]));

    let snapshot = run(&mut engine, 20);
    let panel = snapshot
        .missions
        .iter()
        .find(|p| p.mission_id.as_str() == "mission_belt_patrol")
        .expect("mission panel");
    assert!(panel.rewards.is_some());
    assert_eq!(engine.missions().standings().get("TRA"), 3);
}

#[test]
fn test_combat_events_go_to_mission_service() {
    let mut engine = demo_engine();
    engine.publish(GameEvent::EnemyDestroyed {
        enemy_type: "raider".into(),
        location: "A0_belt".into(),
    });
    engine.tick();
    let outbound = engine.take_outbound();
    assert_eq!(outbound.len(), 1);
    assert!(matches!(
        &outbound[0],
        MissionRequest::ReportEvent(GameEvent::EnemyDestroyed { .. })
    ));
    assert!(engine.take_outbound().is_empty());
}

#[test]
fn test_mission_panel_toggle_requests_refresh() {
    let mut engine = demo_engine();
    engine.queue_command(key_binding("M", false).unwrap());
    let snapshot = engine.tick();
    assert!(snapshot.mission_panel_open);
    assert!(matches!(
        engine.take_outbound().as_slice(),
        [MissionRequest::Refresh]
    ));

    engine.queue_command(key_binding("Escape", false).unwrap());
    assert!(!engine.tick().mission_panel_open);
}

#[test]
fn test_mission_completion_through_engine() {
    let mut engine = demo_engine();
    for objective in ["destroy_raider", "reach_belt"] {
        engine.publish(GameEvent::ObjectiveAchieved {
            mission_id: "mission_belt_patrol".into(),
            objective_id: objective.to_string(),
        });
    }
    engine.tick();
    let outbound = engine.take_outbound();
    assert_eq!(outbound.len(), 2);
    assert!(outbound
        .iter()
        .all(|r| matches!(r, MissionRequest::CompleteObjective { .. })));

    let snapshot = run(&mut engine, 15);
    let panel = snapshot
        .missions
        .iter()
        .find(|p| p.mission_id.as_str() == "mission_belt_patrol")
        .expect("mission panel");
    let rewards = panel.rewards.as_ref().expect("rewards shown");
    assert_eq!(rewards.credits, 250);
    assert!(panel.show_ok_button);
    assert_eq!(engine.missions().standings().get("TRA"), 3);
    assert_eq!(engine.missions().standings().get("PIR"), -5);

    // Stale service refresh while the panel is up.
    engine.apply_mission_response(MissionResponse::Active(demo::sector_missions()));
    let snapshot = engine.tick();
    assert!(snapshot.missions.iter().any(|p| p.rewards.is_some()));

    engine.queue_command(PlayerCommand::DismissMission {
        mission_id: "mission_belt_patrol".into(),
    });
    let snapshot = run(&mut engine, 31);
    assert!(snapshot.missions.is_empty());
}

#[test]
fn test_failed_request_shows_toast() {
    let mut engine = demo_engine();
    engine.apply_mission_response(MissionResponse::Failed {
        context: "refresh",
        error: MissionError::Network("connection refused".into()),
    });
    let snapshot = engine.tick();
    assert_eq!(snapshot.missions.len(), 1, "Cache survives the failure");
    assert_eq!(snapshot.notifications.len(), 1);
    assert_eq!(snapshot.notifications[0].level, AlertLevel::Warning);
}

#[test]
fn test_abandoned_mission_removed() {
    let mut engine = demo_engine();
    engine.apply_mission_response(MissionResponse::Abandoned("mission_belt_patrol".into()));
    engine.tick();
    let snapshot = engine.tick();
    assert!(snapshot.missions.is_empty());
}

#[test]
fn test_lost_target_reported_in_snapshot() {
    let mut engine = powered_engine();
    engine.queue_command(PlayerCommand::SelectTarget {
        id: "enemy_raider_1".into(),
    });
    engine.tick();
    engine
        .computer_mut()
        .registry_mut()
        .remove(&"enemy_raider_1".into());
    let snapshot = engine.tick();
    assert!(snapshot.target.is_none());
    assert_eq!(snapshot.computer, ComputerState::Idle);
    assert!(snapshot.computer_events.contains(&ComputerEvent::TargetCleared {
        id: "enemy_raider_1".into()
    }));
}

#[test]
fn test_determinism_same_inputs() {
    let mut a = demo_engine();
    let mut b = demo_engine();
    let script = [
        PlayerCommand::EnableComputer,
        PlayerCommand::CycleTarget {
            direction: Direction::Next,
        },
    ];
    a.queue_commands(script.clone());
    b.queue_commands(script);
    for _ in 0..60 {
        let json_a = serde_json::to_string(&a.tick()).unwrap();
        let json_b = serde_json::to_string(&b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged");
    }
}
