//! Mission tail lifecycle for the VOIDLINE HUD.
//!
//! `MissionCoordinator` takes a mission from "all objectives achieved" to
//! player dismissal: it latches the completion, grants rewards exactly once,
//! keeps the rewards panel alive across refreshes and removes it after the
//! fade. `MissionClient` talks to the HTTP mission service.

pub mod capabilities;
pub mod client;
pub mod coordinator;
pub mod error;
pub mod rewards;
pub mod scheduler;

pub use client::MissionClient;
pub use coordinator::MissionCoordinator;
