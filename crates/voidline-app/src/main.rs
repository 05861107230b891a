//! VOIDLINE - headless HUD runner.
//!
//! Loads configuration, starts the mission bridge and the HUD loop over the
//! demo sector, plays a short scripted session through the key bindings and
//! prints the resulting HUD snapshots.

use std::thread;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use voidline_app::bridge::MissionBridge;
use voidline_app::error::Result;
use voidline_app::game_loop::spawn_hud_loop;
use voidline_app::state::{AppState, HudLoopCommand};
use voidline_app::{config, demo};
use voidline_core::commands::{key_binding, PlayerCommand};
use voidline_core::events::GameEvent;
use voidline_core::mission::MissionId;
use voidline_core::types::{CameraPose, Position};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("VOIDLINE starting...");

    let config = config::load()?;
    let bridge = MissionBridge::spawn(&config.missions)?;

    let state = AppState::new();
    let engine_config = config.clone();
    let (command_tx, handle) = spawn_hud_loop(
        Box::new(move || demo::build_engine(&engine_config)),
        Some(bridge),
        state.latest_snapshot.clone(),
    )?;
    if let Ok(mut tx) = state.command_tx.lock() {
        *tx = Some(command_tx);
    }
    if let Ok(mut running) = state.running.lock() {
        *running = true;
    }

    let press = |key: &str, shift: bool| {
        if let Some(command) = key_binding(key, shift) {
            state.send(HudLoopCommand::Player(command));
        }
    };

    // Power up and wait out the power-up window.
    press("t", false);
    thread::sleep(Duration::from_millis(600));

    press("Tab", false);
    thread::sleep(Duration::from_millis(50));
    print_snapshot(&state, "first target")?;

    state.send(HudLoopCommand::Player(PlayerCommand::SelectTarget {
        id: "enemy_raider_1".into(),
    }));
    press("x", false);
    thread::sleep(Duration::from_millis(50));
    print_snapshot(&state, "raider, second sub-system")?;

    // Fly toward the belt and finish the patrol.
    state.send(HudLoopCommand::Camera(CameraPose::at(Position::new(
        100.0, 0.0, -250.0,
    ))));
    let mission_id = MissionId::from("mission_belt_patrol");
    for objective in ["destroy_raider", "reach_belt"] {
        state.send(HudLoopCommand::Event(GameEvent::ObjectiveAchieved {
            mission_id: mission_id.clone(),
            objective_id: objective.to_string(),
        }));
    }
    press("m", false);
    thread::sleep(Duration::from_millis(400));
    print_snapshot(&state, "mission complete")?;

    state.send(HudLoopCommand::Player(PlayerCommand::DismissMission {
        mission_id,
    }));
    thread::sleep(Duration::from_millis(700));
    print_snapshot(&state, "after dismissal")?;

    state.send(HudLoopCommand::Shutdown);
    if handle.join().is_err() {
        error!("HUD loop thread panicked");
    }
    if let Ok(mut running) = state.running.lock() {
        *running = false;
    }

    info!("VOIDLINE stopped");
    Ok(())
}

fn print_snapshot(state: &AppState, label: &str) -> Result<()> {
    match state.snapshot() {
        Some(snapshot) => {
            println!("=== {label} (tick {}) ===", snapshot.time.tick);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        None => println!("=== {label}: no snapshot yet ==="),
    }
    Ok(())
}
