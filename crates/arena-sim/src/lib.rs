//! Headless arena harness.
//!
//! Owns a hecs world of tanks and projectiles plus the tile map, mines and
//! hazard cloud, and drives the AI registry at a fixed tick rate. Used by
//! tests and demos in place of the game proper.

pub mod components;
pub mod engine;
pub mod hazard;
pub mod systems;
pub mod world_setup;

pub use arena_ai as ai;
pub use arena_core as core;
pub use engine::{ArenaEngine, SimConfig};
pub use hazard::{ClosingCloud, CloudConfig};

#[cfg(test)]
mod tests;
