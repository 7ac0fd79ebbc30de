//! Radius-aware solidity tests for tank-sized bodies.

use arena_core::constants::{CLEARANCE_MIN_STEP, WALKABLE_MIN_RADIUS, WALKABLE_RADIUS_FACTOR};
use glam::Vec2;

use crate::grid::TileGrid;

const DIAGONAL: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// True if a circle of `radius` centered at `pos` touches no solid tile.
///
/// Samples the center, four cardinal points and four diagonal points on
/// the circle.
pub fn is_position_clear(grid: &TileGrid, pos: Vec2, radius: f32) -> bool {
    if grid.is_solid(pos) {
        return false;
    }
    if radius <= 0.0 {
        return true;
    }
    let d = radius * DIAGONAL;
    let offsets = [
        Vec2::new(radius, 0.0),
        Vec2::new(-radius, 0.0),
        Vec2::new(0.0, radius),
        Vec2::new(0.0, -radius),
        Vec2::new(d, d),
        Vec2::new(d, -d),
        Vec2::new(-d, d),
        Vec2::new(-d, -d),
    ];
    offsets.iter().all(|o| !grid.is_solid(pos + *o))
}

/// True if a circle of `radius` can slide in a straight line from `from` to `to`.
pub fn segment_has_clearance(grid: &TileGrid, from: Vec2, to: Vec2, radius: f32) -> bool {
    let delta = to - from;
    let dist = delta.length();
    if dist <= 1e-3 {
        return is_position_clear(grid, from, radius);
    }

    let step = (radius * 0.5).max(CLEARANCE_MIN_STEP);
    let steps = (dist / step).ceil().max(1.0) as i32;
    (0..=steps).all(|i| {
        let t = i as f32 / steps as f32;
        is_position_clear(grid, from + delta * t, radius)
    })
}

/// True if a body of `radius` fits in the tile at grid coordinates.
///
/// Checks the tile center and, for bodies larger than a point, four cardinal
/// samples at a slightly reduced radius.
pub fn is_tile_walkable(grid: &TileGrid, tx: i32, ty: i32, radius: f32) -> bool {
    if !grid.in_bounds(tx, ty) || grid.is_solid_tile(tx, ty) {
        return false;
    }
    if radius <= WALKABLE_MIN_RADIUS {
        return true;
    }
    let center = grid.tile_to_world(tx, ty);
    let r = radius * WALKABLE_RADIUS_FACTOR;
    [
        Vec2::new(r, 0.0),
        Vec2::new(-r, 0.0),
        Vec2::new(0.0, r),
        Vec2::new(0.0, -r),
    ]
    .iter()
    .all(|o| !grid.is_solid(center + *o))
}

/// Walkability of the tile containing a world position.
pub fn is_walkable_at(grid: &TileGrid, pos: Vec2, radius: f32) -> bool {
    let (tx, ty) = grid.world_to_tile(pos);
    is_tile_walkable(grid, tx, ty, radius)
}

/// Nearest walkable tile within `max_ring` rings around a tile, scanning
/// rings outward.
pub fn nearest_walkable_tile(
    grid: &TileGrid,
    tx: i32,
    ty: i32,
    radius: f32,
    max_ring: i32,
) -> Option<(i32, i32)> {
    if is_tile_walkable(grid, tx, ty, radius) {
        return Some((tx, ty));
    }
    for r in 1..=max_ring {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx.abs() != r && dy.abs() != r {
                    continue;
                }
                if is_tile_walkable(grid, tx + dx, ty + dy, radius) {
                    return Some((tx + dx, ty + dy));
                }
            }
        }
    }
    None
}
