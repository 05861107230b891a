//! Core types and definitions for the VOIDLINE target computer.
//!
//! This crate defines the vocabulary shared across all other crates:
//! targets, missions, commands, HUD view models, events, configuration
//! and constants. It has no dependency on any runtime or network stack.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod mission;
pub mod state;
pub mod target;
pub mod types;
