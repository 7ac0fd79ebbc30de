//! Path: an ordered list of world-space waypoints with a follow cursor.

use arena_core::constants::PATH_MAX_LENGTH;
use glam::Vec2;

use crate::clearance::{is_walkable_at, segment_has_clearance};
use crate::grid::TileGrid;
use crate::raycast::has_line_of_sight;

/// Waypoints from start to goal plus the index of the next one to reach.
///
/// The cursor stays in `[0, len]`; the path is complete once it reaches `len`.
/// An invalid path has no waypoints and is always complete.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    points: Vec<Vec2>,
    current: usize,
    valid: bool,
}

impl Path {
    /// A valid path through `points`, truncated to the waypoint capacity.
    pub fn new(mut points: Vec<Vec2>) -> Self {
        points.truncate(PATH_MAX_LENGTH);
        let valid = !points.is_empty();
        Self {
            points,
            current: 0,
            valid,
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Waypoints not yet reached.
    pub fn remaining(&self) -> &[Vec2] {
        &self.points[self.current.min(self.points.len())..]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_complete(&self) -> bool {
        !self.valid || self.current >= self.points.len()
    }

    /// The next waypoint to steer toward, or the final goal once complete.
    pub fn target(&self) -> Option<Vec2> {
        if !self.valid {
            return None;
        }
        self.points
            .get(self.current)
            .or_else(|| self.points.last())
            .copied()
    }

    /// The final waypoint.
    pub fn goal(&self) -> Option<Vec2> {
        if !self.valid {
            return None;
        }
        self.points.last().copied()
    }

    /// Move the cursor past the current waypoint if `pos` is within
    /// `threshold` of it. Returns true if the cursor moved.
    pub fn advance(&mut self, pos: Vec2, threshold: f32) -> bool {
        if self.is_complete() {
            return false;
        }
        if pos.distance(self.points[self.current]) <= threshold {
            self.current += 1;
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.current = 0;
        self.valid = false;
    }

    /// Greedy furthest-visible-waypoint smoothing.
    ///
    /// From each kept waypoint, scans back from the end of the path for the
    /// furthest waypoint reachable by a straight segment wide enough for
    /// `radius`, and splices directly to it. The first and last waypoints are
    /// always kept.
    pub fn smooth(&mut self, grid: &TileGrid, radius: f32) {
        if !self.valid || self.points.len() <= 2 {
            return;
        }
        self.points = smooth_points(grid, &self.points, radius);
        if self.current >= self.points.len() {
            self.current = self.points.len() - 1;
        }
    }

    /// False once the remaining route has gone stale: a remaining waypoint's
    /// tile is no longer walkable for `radius`, or a consecutive pair of
    /// remaining waypoints has lost line of sight.
    pub fn is_still_valid(&self, grid: &TileGrid, radius: f32) -> bool {
        if !self.valid {
            return false;
        }
        let remaining = self.remaining();
        remaining.iter().all(|p| is_walkable_at(grid, *p, radius))
            && remaining
                .windows(2)
                .all(|pair| has_line_of_sight(grid, pair[0], pair[1]))
    }
}

/// Smoothing pass over raw waypoints; see [`Path::smooth`].
pub(crate) fn smooth_points(grid: &TileGrid, points: &[Vec2], radius: f32) -> Vec<Vec2> {
    let count = points.len();
    if count <= 2 {
        return points.to_vec();
    }

    let mut smoothed = Vec::with_capacity(count);
    smoothed.push(points[0]);

    let mut current = 0;
    while current < count - 1 {
        let furthest = ((current + 2)..count)
            .rev()
            .find(|&i| segment_has_clearance(grid, points[current], points[i], radius))
            .unwrap_or(current + 1);
        current = furthest;
        smoothed.push(points[current]);
    }
    smoothed
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::constants::TANK_RADIUS;
    use arena_core::enums::Tile;

    fn straight(n: usize) -> Path {
        Path::new((0..n).map(|i| Vec2::new(i as f32 * 2.0, 0.0)).collect())
    }

    #[test]
    fn test_empty_path_is_invalid_and_complete() {
        let path = Path::new(Vec::new());
        assert!(!path.is_valid());
        assert!(path.is_complete());
        assert_eq!(path.target(), None);
        assert_eq!(path.goal(), None);
    }

    #[test]
    fn test_advance_and_target() {
        let mut path = straight(3);
        assert_eq!(path.target(), Some(Vec2::new(0.0, 0.0)));
        assert!(!path.advance(Vec2::new(5.0, 0.0), 0.8));
        assert!(path.advance(Vec2::new(0.3, 0.0), 0.8));
        assert_eq!(path.target(), Some(Vec2::new(2.0, 0.0)));
        assert!(path.advance(Vec2::new(2.0, 0.5), 0.8));
        assert!(path.advance(Vec2::new(4.0, 0.0), 0.8));
        assert!(path.is_complete());
        assert_eq!(path.current(), 3);
        // Completed paths keep pointing at the goal.
        assert_eq!(path.target(), Some(Vec2::new(4.0, 0.0)));
        assert!(!path.advance(Vec2::new(4.0, 0.0), 0.8));
    }

    #[test]
    fn test_clear() {
        let mut path = straight(4);
        path.advance(Vec2::ZERO, 0.8);
        path.clear();
        assert!(path.is_empty());
        assert!(!path.is_valid());
        assert_eq!(path.current(), 0);
    }

    #[test]
    fn test_capacity_is_enforced() {
        let path = straight(PATH_MAX_LENGTH + 10);
        assert_eq!(path.len(), PATH_MAX_LENGTH);
    }

    #[test]
    fn test_smooth_open_field_collapses_to_endpoints() {
        let grid = TileGrid::new(12, 12, 2.0);
        let mut path = Path::new(vec![
            grid.tile_to_world(1, 1),
            grid.tile_to_world(2, 2),
            grid.tile_to_world(3, 2),
            grid.tile_to_world(4, 3),
            grid.tile_to_world(5, 3),
        ]);
        path.smooth(&grid, TANK_RADIUS);
        assert_eq!(
            path.points(),
            &[grid.tile_to_world(1, 1), grid.tile_to_world(5, 3)]
        );
    }

    #[test]
    fn test_smooth_keeps_corner_around_wall() {
        let mut grid = TileGrid::new(8, 8, 2.0);
        for y in 0..6 {
            grid.set_tile(3, y, Tile::Wall);
        }
        let mut path = Path::new(vec![
            grid.tile_to_world(1, 1),
            grid.tile_to_world(1, 4),
            grid.tile_to_world(2, 6),
            grid.tile_to_world(3, 6),
            grid.tile_to_world(4, 6),
            grid.tile_to_world(5, 4),
            grid.tile_to_world(5, 1),
        ]);
        path.smooth(&grid, TANK_RADIUS);
        assert!(path.len() >= 3);
        assert_eq!(path.points()[0], grid.tile_to_world(1, 1));
        assert_eq!(path.goal(), Some(grid.tile_to_world(5, 1)));
        for pair in path.points().windows(2) {
            assert!(segment_has_clearance(&grid, pair[0], pair[1], TANK_RADIUS));
        }
    }

    #[test]
    fn test_validity_tracks_map_changes() {
        let mut grid = TileGrid::new(8, 4, 2.0);
        let mut path = Path::new(vec![grid.tile_to_world(1, 1), grid.tile_to_world(6, 1)]);
        assert!(path.is_still_valid(&grid, TANK_RADIUS));

        grid.set_tile(4, 1, Tile::Wall);
        assert!(!path.is_still_valid(&grid, TANK_RADIUS));

        // Only the part of the route still ahead matters.
        path.advance(grid.tile_to_world(1, 1), 0.8);
        assert!(path.is_still_valid(&grid, TANK_RADIUS));
        grid.set_tile(6, 1, Tile::Pit);
        assert!(!path.is_still_valid(&grid, TANK_RADIUS));
    }
}
