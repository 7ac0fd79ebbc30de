//! Navigation for arena tanks.
//!
//! Tile grid queries, bullet raycasts, radius-aware clearance tests,
//! A* path search and path smoothing.

pub use arena_core as core;

pub mod clearance;
pub mod grid;
pub mod path;
pub mod pathfinding;
pub mod raycast;

// Re-export key types for convenience.
pub use clearance::{is_position_clear, is_tile_walkable, segment_has_clearance};
pub use grid::TileGrid;
pub use path::Path;
pub use pathfinding::{find_path, find_smoothed_path, PathSearch};
pub use raycast::{has_line_of_sight, raycast, RayHit};
