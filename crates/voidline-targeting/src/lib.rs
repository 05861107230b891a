//! Target computer engine for VOIDLINE.
//!
//! Owns the target registry, resolves diplomacy and discovery, enumerates
//! sub-targets, runs the lock state machine once per frame and projects the
//! locked target into a `HudModel`. Completely headless: the scene graph,
//! discovery and ship systems are capability objects handed in at
//! construction, so every behavior is testable with fakes.

pub mod capabilities;
pub mod computer;
pub mod diplomacy;
pub mod discovery;
pub mod hud;
pub mod registry;
pub mod subtargets;

pub use computer::TargetComputer;
pub use voidline_core as core;

#[cfg(test)]
mod tests;
