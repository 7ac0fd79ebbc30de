//! Core types and definitions for the arena opponent AI.
//!
//! This crate defines the vocabulary shared across all other crates:
//! snapshots of the external world, intents produced by the AI,
//! enums, weapon data and tuning constants.
//! It has no dependency on any game loop or renderer.

pub mod constants;
pub mod enums;
pub mod types;
pub mod weapons;

pub use glam::Vec2;
