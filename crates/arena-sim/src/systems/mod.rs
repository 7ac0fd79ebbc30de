//! Systems run by the harness each tick.
//!
//! Systems are plain functions over the hecs world. They keep no state of
//! their own.

pub mod cleanup;
pub mod cloud;
pub mod mines;
pub mod movement;
pub mod projectiles;
pub mod snapshot;
