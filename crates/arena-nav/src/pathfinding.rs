//! A* path search over the tile grid.
//!
//! 8-directional movement with Euclidean heuristic. Diagonal steps need both
//! orthogonal neighbours walkable so paths never cut a wall corner.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use arena_core::constants::{GOAL_RELOCATE_RADIUS, PATHFIND_MAX_ITERATIONS, PATH_MAX_LENGTH};
use glam::Vec2;
use tracing::debug;

use crate::clearance::{is_tile_walkable, nearest_walkable_tile};
use crate::grid::TileGrid;
use crate::path::{smooth_points, Path};

const DIR_X: [i32; 8] = [0, 1, 1, 1, 0, -1, -1, -1];
const DIR_Y: [i32; 8] = [1, 1, 0, -1, -1, -1, 0, 1];

/// A successful search: the raw tile path and the node expansions it took.
#[derive(Debug, Clone)]
pub struct PathSearch {
    pub path: Path,
    pub iterations: usize,
}

/// Node in the A* open set.
#[derive(Debug, Clone, Copy)]
struct OpenNode {
    idx: usize,
    f_cost: f32,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.idx == other.idx
    }
}

impl Eq for OpenNode {}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .f_cost
            .partial_cmp(&self.f_cost)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn heuristic(x1: i32, y1: i32, x2: i32, y2: i32) -> f32 {
    let dx = (x2 - x1) as f32;
    let dy = (y2 - y1) as f32;
    (dx * dx + dy * dy).sqrt()
}

/// Find a path for a body of `radius` from `start` to `goal`.
///
/// An unwalkable goal tile is replaced by the nearest walkable tile within a
/// few rings. Returns `None` when either end is off the map, no path exists,
/// or the search exhausts its iteration budget.
///
/// The first waypoint is `start` itself. The last is `goal` itself, unless
/// the goal had to be relocated, in which case it is the relocated tile's
/// center rather than the requested goal, so every waypoint stays walkable.
///
/// A route longer than the waypoint capacity comes back already smoothed;
/// it only fails if smoothing cannot bring it under the capacity.
pub fn find_path(grid: &TileGrid, start: Vec2, goal: Vec2, radius: f32) -> Option<PathSearch> {
    let (sx, sy) = grid.world_to_tile(start);
    let (requested_gx, requested_gy) = grid.world_to_tile(goal);

    if !grid.in_bounds(sx, sy) || !grid.in_bounds(requested_gx, requested_gy) {
        debug!("pathfind: start or goal out of bounds");
        return None;
    }

    let Some((gx, gy)) =
        nearest_walkable_tile(grid, requested_gx, requested_gy, radius, GOAL_RELOCATE_RADIUS)
    else {
        debug!("pathfind: goal not walkable and no nearby walkable tile");
        return None;
    };
    let relocated = (gx, gy) != (requested_gx, requested_gy);
    let end_point = if relocated {
        grid.tile_to_world(gx, gy)
    } else {
        goal
    };

    if (sx, sy) == (gx, gy) {
        return Some(PathSearch {
            path: Path::new(vec![end_point]),
            iterations: 0,
        });
    }

    let width = grid.width();
    let size = (grid.width() * grid.height()) as usize;
    let index = |x: i32, y: i32| (y * width + x) as usize;

    let mut g_costs = vec![f32::INFINITY; size];
    let mut parents: Vec<Option<usize>> = vec![None; size];
    let mut closed = vec![false; size];
    let mut open = BinaryHeap::new();

    let start_idx = index(sx, sy);
    let goal_idx = index(gx, gy);
    g_costs[start_idx] = 0.0;
    open.push(OpenNode {
        idx: start_idx,
        f_cost: heuristic(sx, sy, gx, gy),
    });

    let mut iterations = 0;
    let mut found = false;

    while iterations < PATHFIND_MAX_ITERATIONS {
        let Some(current) = open.pop() else {
            break;
        };
        iterations += 1;

        if closed[current.idx] {
            continue;
        }
        closed[current.idx] = true;

        if current.idx == goal_idx {
            found = true;
            break;
        }

        let cx = (current.idx % width as usize) as i32;
        let cy = (current.idx / width as usize) as i32;

        for d in 0..8 {
            let nx = cx + DIR_X[d];
            let ny = cy + DIR_Y[d];
            if !grid.in_bounds(nx, ny) {
                continue;
            }
            let n_idx = index(nx, ny);
            if closed[n_idx] || !is_tile_walkable(grid, nx, ny, radius) {
                continue;
            }

            let diagonal = DIR_X[d] != 0 && DIR_Y[d] != 0;
            if diagonal
                && (!is_tile_walkable(grid, nx, cy, radius)
                    || !is_tile_walkable(grid, cx, ny, radius))
            {
                continue;
            }

            let step = if diagonal {
                std::f32::consts::SQRT_2
            } else {
                1.0
            };
            let tentative_g = g_costs[current.idx] + step;
            if tentative_g < g_costs[n_idx] {
                g_costs[n_idx] = tentative_g;
                parents[n_idx] = Some(current.idx);
                open.push(OpenNode {
                    idx: n_idx,
                    f_cost: tentative_g + heuristic(nx, ny, gx, gy),
                });
            }
        }
    }

    if !found {
        debug!(iterations, "pathfind: no path found");
        return None;
    }

    let tiles = reconstruct_path(&parents, goal_idx);
    let mut points: Vec<Vec2> = tiles
        .iter()
        .map(|&idx| {
            grid.tile_to_world((idx % width as usize) as i32, (idx / width as usize) as i32)
        })
        .collect();
    if let Some(first) = points.first_mut() {
        *first = start;
    }
    if let Some(last) = points.last_mut() {
        *last = end_point;
    }
    if points.len() > PATH_MAX_LENGTH {
        points = smooth_points(grid, &points, radius);
        if points.len() > PATH_MAX_LENGTH {
            debug!(
                waypoints = points.len(),
                "pathfind: path exceeds waypoint capacity"
            );
            return None;
        }
    }

    debug!(
        waypoints = points.len(),
        iterations, "pathfind: found path"
    );

    Some(PathSearch {
        path: Path::new(points),
        iterations,
    })
}

/// Find a path and smooth it in one go.
pub fn find_smoothed_path(grid: &TileGrid, start: Vec2, goal: Vec2, radius: f32) -> Option<Path> {
    let mut search = find_path(grid, start, goal, radius)?;
    search.path.smooth(grid, radius);
    Some(search.path)
}

/// Walk parent links back from the goal and return the tile chain in
/// start-to-goal order.
fn reconstruct_path(parents: &[Option<usize>], goal_idx: usize) -> Vec<usize> {
    let mut path = vec![goal_idx];
    let mut current = goal_idx;
    while let Some(prev) = parents[current] {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::constants::{TANK_RADIUS, WAYPOINT_ARRIVE_THRESHOLD};
    use arena_core::enums::Tile;
    use proptest::prelude::*;

    use crate::clearance::is_walkable_at;

    /// 6x6 grid with a wall down column 2, rows 0-4, leaving a gap at row 5.
    fn wall_with_gap() -> TileGrid {
        let mut grid = TileGrid::new(6, 6, 2.0);
        for y in 0..5 {
            grid.set_tile(2, y, Tile::Wall);
        }
        grid
    }

    #[test]
    fn test_straight_line() {
        let grid = TileGrid::new(10, 10, 2.0);
        let start = grid.tile_to_world(1, 1);
        let goal = grid.tile_to_world(6, 1);
        let search = find_path(&grid, start, goal, TANK_RADIUS).unwrap();
        assert_eq!(search.path.len(), 6);
        assert_eq!(search.path.points()[0], start);
        assert_eq!(search.path.goal(), Some(goal));
        assert!(search.iterations > 0);
    }

    #[test]
    fn test_detours_through_gap() {
        let grid = wall_with_gap();
        let start = grid.tile_to_world(0, 0);
        let goal = grid.tile_to_world(5, 0);
        let search = find_path(&grid, start, goal, 0.0).unwrap();
        let path = &search.path;

        assert!(path.len() > 6, "got {} waypoints", path.len());
        assert!(path
            .points()
            .iter()
            .any(|p| grid.world_to_tile(*p) == (2, 5)));
        for p in path.points() {
            assert!(!grid.is_solid(*p));
        }
    }

    #[test]
    fn test_same_tile_returns_goal() {
        let grid = TileGrid::new(4, 4, 2.0);
        let start = grid.tile_to_world(1, 1);
        let goal = start + Vec2::new(0.4, -0.3);
        let search = find_path(&grid, start, goal, TANK_RADIUS).unwrap();
        assert!(search.path.is_valid());
        assert_eq!(search.path.points(), &[goal]);
    }

    #[test]
    fn test_unwalkable_goal_is_relocated() {
        let mut grid = TileGrid::new(8, 8, 2.0);
        grid.set_tile(5, 5, Tile::Wall);
        let start = grid.tile_to_world(1, 1);
        let goal = grid.tile_to_world(5, 5);
        let search = find_path(&grid, start, goal, 0.0).unwrap();
        let end = search.path.goal().unwrap();
        assert!(!grid.is_solid(end));
        let (ex, ey) = grid.world_to_tile(end);
        assert!((ex - 5).abs() <= 1 && (ey - 5).abs() <= 1);
    }

    #[test]
    fn test_enclosed_goal_fails() {
        let mut grid = TileGrid::new(12, 12, 2.0);
        for y in 4..=10 {
            for x in 4..=10 {
                if x == 4 || x == 10 || y == 4 || y == 10 {
                    grid.set_tile(x, y, Tile::Wall);
                }
            }
        }
        let start = grid.tile_to_world(1, 1);
        let goal = grid.tile_to_world(7, 7);
        assert!(find_path(&grid, start, goal, 0.0).is_none());
    }

    #[test]
    fn test_out_of_bounds_fails() {
        let grid = TileGrid::new(4, 4, 2.0);
        let start = grid.tile_to_world(1, 1);
        assert!(find_path(&grid, start, Vec2::new(100.0, 0.0), 0.0).is_none());
        assert!(find_path(&grid, Vec2::new(-100.0, 0.0), start, 0.0).is_none());
    }

    #[test]
    fn test_no_corner_cutting() {
        // Diagonal between two walls touching at a corner is closed.
        let mut grid = TileGrid::new(4, 4, 2.0);
        grid.set_tile(1, 0, Tile::Wall);
        grid.set_tile(0, 1, Tile::Wall);
        let start = grid.tile_to_world(0, 0);
        let goal = grid.tile_to_world(1, 1);
        assert!(find_path(&grid, start, goal, 0.0).is_none());
    }

    #[test]
    fn test_smoothed_path_is_shorter() {
        let grid = TileGrid::new(16, 16, 2.0);
        let start = grid.tile_to_world(1, 1);
        let goal = grid.tile_to_world(12, 5);
        let raw = find_path(&grid, start, goal, TANK_RADIUS).unwrap().path;
        let smooth = find_smoothed_path(&grid, start, goal, TANK_RADIUS).unwrap();
        assert!(smooth.len() < raw.len());
        assert_eq!(smooth.points(), &[start, goal]);
    }

    /// Breadth-first reachability for point-sized bodies, no budget.
    fn reachable(grid: &TileGrid, from: (i32, i32), to: (i32, i32)) -> bool {
        let mut seen = vec![false; (grid.width() * grid.height()) as usize];
        let mut queue = std::collections::VecDeque::from([from]);
        while let Some((x, y)) = queue.pop_front() {
            if (x, y) == to {
                return true;
            }
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                let (nx, ny) = (x + dx, y + dy);
                if !grid.in_bounds(nx, ny) || grid.is_solid_tile(nx, ny) {
                    continue;
                }
                let idx = (ny * grid.width() + nx) as usize;
                if !seen[idx] {
                    seen[idx] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
        false
    }

    #[test]
    fn test_iteration_budget_exhaustion_is_no_path() {
        // Goal inside a walled box whose only opening faces away from the
        // start: a real route exists, but the search floods the open field in
        // front of the box long before reaching it.
        let mut grid = TileGrid::new(120, 120, 2.0);
        for i in 50..=70 {
            grid.set_tile(50, i, Tile::Wall);
            grid.set_tile(70, i, Tile::Wall);
            grid.set_tile(i, 50, Tile::Wall);
            grid.set_tile(i, 70, Tile::Wall);
        }
        grid.set_tile(70, 60, Tile::Floor);
        assert!(reachable(&grid, (2, 60), (60, 60)));

        let start = grid.tile_to_world(2, 60);
        let goal = grid.tile_to_world(60, 60);
        assert!(find_path(&grid, start, goal, 0.0).is_none());
    }

    #[test]
    fn test_long_route_is_smoothed_under_capacity() {
        let grid = TileGrid::new(140, 3, 2.0);
        let start = grid.tile_to_world(1, 1);
        let goal = grid.tile_to_world(135, 1);

        let search = find_path(&grid, start, goal, 0.0).unwrap();
        assert!(search.iterations > PATH_MAX_LENGTH);
        assert_eq!(search.path.points(), &[start, goal]);
    }

    fn scatter_walls(seed: &[(i32, i32)]) -> TileGrid {
        let mut grid = TileGrid::new(12, 12, 2.0);
        for &(x, y) in seed {
            grid.set_tile(x, y, Tile::Wall);
        }
        grid
    }

    proptest! {
        #[test]
        fn prop_path_endpoints_and_walkability(
            walls in proptest::collection::vec((0i32..12, 0i32..12), 0..30),
            sx in 0i32..12, sy in 0i32..12,
            gx in 0i32..12, gy in 0i32..12,
        ) {
            let grid = scatter_walls(&walls);
            prop_assume!(is_tile_walkable(&grid, sx, sy, TANK_RADIUS));
            prop_assume!(is_tile_walkable(&grid, gx, gy, TANK_RADIUS));

            let start = grid.tile_to_world(sx, sy);
            let goal = grid.tile_to_world(gx, gy);
            if let Some(search) = find_path(&grid, start, goal, TANK_RADIUS) {
                let points = search.path.points();
                prop_assert!(points[0].distance(start) <= WAYPOINT_ARRIVE_THRESHOLD
                    || points.len() == 1);
                prop_assert!(points[points.len() - 1].distance(goal) <= WAYPOINT_ARRIVE_THRESHOLD);
                for p in points {
                    prop_assert!(is_walkable_at(&grid, *p, TANK_RADIUS));
                }
            }
        }

        #[test]
        fn prop_smoothing_is_idempotent(
            walls in proptest::collection::vec((0i32..12, 0i32..12), 0..30),
            sx in 0i32..12, sy in 0i32..12,
            gx in 0i32..12, gy in 0i32..12,
        ) {
            let grid = scatter_walls(&walls);
            let start = grid.tile_to_world(sx, sy);
            let goal = grid.tile_to_world(gx, gy);
            if let Some(once) = find_smoothed_path(&grid, start, goal, TANK_RADIUS) {
                let mut twice = once.clone();
                twice.smooth(&grid, TANK_RADIUS);
                prop_assert_eq!(once, twice);
            }
        }
    }
}
