//! Computer-controlled opponents for the tank arena.
//!
//! Archetype profiles, tactical queries, steering, the per-tank behavior
//! state machine, fire resolution and the controller registry.

pub mod controller;
pub mod error;
pub mod fire;
pub mod fsm;
pub mod manager;
pub mod profiles;
pub mod steering;
pub mod tactics;
pub mod tuning;
pub mod world;

pub use arena_core as core;
pub use arena_nav as nav;

pub use controller::{AimMode, Controller, TickContext};
pub use error::{AiError, Result};
pub use manager::AiManager;
pub use profiles::{get_profile, ArchetypeProfile, BehaviorFlags};
pub use tuning::BehaviorTuning;
pub use world::{HazardField, TankPool, WorldView};
