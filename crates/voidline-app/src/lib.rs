//! VOIDLINE HUD application.
//!
//! Wires the target computer and the mission coordinator into a fixed-rate
//! HUD loop, and runs the mission service client on its own bridge thread.

pub mod bridge;
pub mod config;
pub mod demo;
pub mod engine;
pub mod error;
pub mod game_loop;
pub mod scene;
pub mod state;

pub use voidline_core as core;

#[cfg(test)]
mod tests;
