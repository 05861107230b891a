//! State shared between the input side and the HUD loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use voidline_core::commands::PlayerCommand;
use voidline_core::events::GameEvent;
use voidline_core::state::HudSnapshot;
use voidline_core::types::CameraPose;

/// Commands sent to the HUD loop thread.
#[derive(Debug)]
pub enum HudLoopCommand {
    /// A player command for the HUD engine.
    Player(PlayerCommand),
    /// A world event for the event bus.
    Event(GameEvent),
    /// Camera pose from the renderer.
    Camera(CameraPose),
    /// Stop the HUD loop.
    Shutdown,
}

/// Handles kept by the input side.
///
/// `mpsc::Sender` is not `Sync`, so it sits behind a `Mutex`; the latest
/// snapshot is shared with the loop thread.
pub struct AppState {
    pub command_tx: Mutex<Option<mpsc::Sender<HudLoopCommand>>>,
    pub latest_snapshot: Arc<Mutex<Option<HudSnapshot>>>,
    pub running: Mutex<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            running: Mutex::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a command to the loop. False when the loop is not running.
    pub fn send(&self, command: HudLoopCommand) -> bool {
        match self.command_tx.lock() {
            Ok(tx) => tx.as_ref().is_some_and(|tx| tx.send(command).is_ok()),
            Err(_) => false,
        }
    }

    pub fn snapshot(&self) -> Option<HudSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|s| s.clone())
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().map(|r| *r).unwrap_or(false)
    }
}
