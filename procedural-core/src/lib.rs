//! Cave Generator - Procedural Core Library
//!
//! This crate provides deterministic procedural cave generation:
//! - Cellular-automata caves on a bordered wall/floor grid
//! - Spawn room plus noise-edged rooms for enemy spawners
//! - Region detection and tunnel connection (everything reachable)
//! - Dungeon floor progression with per-floor seeds and boss floors
//! - Config loading (RON/JSON) with hot-reload
//! - ASCII and tile-placement visualization
//! - FFI bridge for game engine integration

pub mod bridge;
pub mod constants;
pub mod error;
pub mod generation;
pub mod hotreload;
pub mod logging;
pub mod visualization;

pub use error::{CaveError, Result};
pub use generation::{generate_cave, CaveConfig, CaveLayout, CavePlugin};
