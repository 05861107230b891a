//! HUD loop thread: runs the HUD engine at `TICK_RATE` and stores the
//! latest snapshot.
//!
//! The engine is built inside the thread from a factory, since its
//! collaborators are single-threaded. Commands arrive via `mpsc`; mission
//! service traffic goes through the `MissionBridge`.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use voidline_core::constants::TICK_RATE;
use voidline_core::state::HudSnapshot;

use crate::bridge::{MissionBridge, MissionRequest};
use crate::engine::HudEngine;
use crate::state::HudLoopCommand;

/// Duration of one HUD tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Builds the engine on the loop thread.
pub type EngineFactory = Box<dyn FnOnce() -> HudEngine + Send>;

/// Spawns the HUD loop in a new thread. Returns the command sender and the
/// thread handle.
pub fn spawn_hud_loop(
    factory: EngineFactory,
    bridge: Option<MissionBridge>,
    latest_snapshot: Arc<Mutex<Option<HudSnapshot>>>,
) -> std::io::Result<(mpsc::Sender<HudLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<HudLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("voidline-hud-loop".into())
        .spawn(move || {
            let mut engine = factory();
            run_hud_loop(&mut engine, cmd_rx, bridge.as_ref(), &latest_snapshot);
            if let Some(bridge) = bridge {
                bridge.shutdown();
            }
        })?;

    Ok((cmd_tx, handle))
}

/// Drain pending commands into the engine. Returns false on shutdown or
/// disconnect.
pub fn drain_commands(engine: &mut HudEngine, cmd_rx: &mpsc::Receiver<HudLoopCommand>) -> bool {
    loop {
        match cmd_rx.try_recv() {
            Ok(HudLoopCommand::Player(command)) => engine.queue_command(command),
            Ok(HudLoopCommand::Event(event)) => engine.publish(event),
            Ok(HudLoopCommand::Camera(pose)) => engine.set_camera(pose),
            Ok(HudLoopCommand::Shutdown) => return false,
            Err(mpsc::TryRecvError::Empty) => return true,
            Err(mpsc::TryRecvError::Disconnected) => return false,
        }
    }
}

/// The loop. Runs until Shutdown or channel disconnect.
fn run_hud_loop(
    engine: &mut HudEngine,
    cmd_rx: mpsc::Receiver<HudLoopCommand>,
    bridge: Option<&MissionBridge>,
    latest_snapshot: &Mutex<Option<HudSnapshot>>,
) {
    info!(tick_rate = TICK_RATE, "HUD loop started");
    if let Some(bridge) = bridge {
        bridge.send(MissionRequest::Refresh);
    }
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Commands and network results
        if !drain_commands(engine, &cmd_rx) {
            break;
        }
        if let Some(bridge) = bridge {
            for response in bridge.drain() {
                engine.apply_mission_response(response);
            }
        }

        // 2. Advance one tick
        let snapshot = engine.tick();

        // 3. Outbound mission traffic
        for request in engine.take_outbound() {
            match bridge {
                Some(bridge) => {
                    if !bridge.send(request) {
                        warn!("mission bridge closed, dropping request");
                    }
                }
                None => warn!(?request, "no mission bridge, dropping request"),
            }
        }

        // 4. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until the next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind; skip ahead instead of catching up
            next_tick_time = now;
        }
    }
    info!(tick = engine.time().tick, "HUD loop stopped");
}
