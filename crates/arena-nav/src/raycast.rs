//! Bullet raycasts and line-of-sight.
//!
//! Rays walk the tile grid cell by cell (DDA) and stop at the first tile that
//! blocks bullets. Pits do not stop rays; the area outside the map does.

use glam::Vec2;

use crate::grid::TileGrid;

/// Result of a raycast between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub hit: bool,
    /// Wall contact point, or the end point when nothing was hit.
    pub point: Vec2,
    /// Unit normal of the wall face that was hit. Zero on a miss.
    pub normal: Vec2,
    /// Distance from the start to `point`.
    pub distance: f32,
}

/// Cast a ray from `start` to `end` against bullet-blocking tiles.
pub fn raycast(grid: &TileGrid, start: Vec2, end: Vec2) -> RayHit {
    let delta = end - start;
    let total = delta.length();
    let miss = RayHit {
        hit: false,
        point: end,
        normal: Vec2::ZERO,
        distance: total,
    };
    if total < 1e-4 {
        return miss;
    }
    let dir = delta / total;

    if grid.blocks_bullets(start) {
        let normal = if dir.x.abs() > dir.y.abs() {
            Vec2::new(-dir.x.signum(), 0.0)
        } else {
            Vec2::new(0.0, -dir.y.signum())
        };
        return RayHit {
            hit: true,
            point: start,
            normal,
            distance: 0.0,
        };
    }

    let ts = grid.tile_size();
    let local = start + grid.half_extents();
    let (mut tx, mut ty) = grid.world_to_tile(start);
    let step_x: i32 = if dir.x >= 0.0 { 1 } else { -1 };
    let step_y: i32 = if dir.y >= 0.0 { 1 } else { -1 };

    let (mut t_max_x, t_delta_x) = if dir.x.abs() < 1e-6 {
        (f32::INFINITY, f32::INFINITY)
    } else {
        let next = if step_x > 0 { tx + 1 } else { tx } as f32 * ts;
        ((next - local.x) / dir.x, ts / dir.x.abs())
    };
    let (mut t_max_y, t_delta_y) = if dir.y.abs() < 1e-6 {
        (f32::INFINITY, f32::INFINITY)
    } else {
        let next = if step_y > 0 { ty + 1 } else { ty } as f32 * ts;
        ((next - local.y) / dir.y, ts / dir.y.abs())
    };

    let max_steps = (total / ts) as i32 + grid.width() + grid.height() + 4;
    for _ in 0..max_steps {
        // Step into the next tile, remembering the face we crossed.
        let (t_enter, normal) = if t_max_x < t_max_y {
            let t = t_max_x;
            t_max_x += t_delta_x;
            tx += step_x;
            (t, Vec2::new(-step_x as f32, 0.0))
        } else {
            let t = t_max_y;
            t_max_y += t_delta_y;
            ty += step_y;
            (t, Vec2::new(0.0, -step_y as f32))
        };

        if t_enter > total {
            return miss;
        }

        if grid.blocks_bullets_tile(tx, ty) {
            let t = t_enter.clamp(0.0, total);
            return RayHit {
                hit: true,
                point: start + dir * t,
                normal,
                distance: t,
            };
        }
    }

    miss
}

/// True if nothing blocks a bullet travelling from `from` to `to`.
pub fn has_line_of_sight(grid: &TileGrid, from: Vec2, to: Vec2) -> bool {
    !raycast(grid, from, to).hit
}
