//! TileGrid: the arena's tile map with solidity queries.
//!
//! The world is centered at the origin. Tile (0, 0) covers the corner with
//! minimum x and minimum y; tile x grows with world x and tile y with world y.

use arena_core::constants::TILE_SIZE;
use arena_core::enums::Tile;
use glam::Vec2;

/// Rectangular grid of tiles.
#[derive(Debug, Clone)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tile_size: f32,
    /// Row-major, `tiles[y * width + x]`.
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Create an all-floor grid.
    pub fn new(width: i32, height: i32, tile_size: f32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tile_size,
            tiles: vec![Tile::Floor; (width * height) as usize],
        }
    }

    /// Build a grid from text rows using the default tile size.
    ///
    /// `rows[0]` is tile row 0. `#` is a wall, `~` or `o` a pit and anything
    /// else floor. Short rows are padded with floor.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let mut grid = Self::new(width, height, TILE_SIZE);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let tile = match ch {
                    '#' => Tile::Wall,
                    '~' | 'o' => Tile::Pit,
                    _ => Tile::Floor,
                };
                grid.set_tile(x as i32, y as i32, tile);
            }
        }
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn world_width(&self) -> f32 {
        self.width as f32 * self.tile_size
    }

    pub fn world_height(&self) -> f32 {
        self.height as f32 * self.tile_size
    }

    /// Half of the world size on each axis.
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.world_width(), self.world_height()) * 0.5
    }

    pub fn in_bounds(&self, tx: i32, ty: i32) -> bool {
        tx >= 0 && tx < self.width && ty >= 0 && ty < self.height
    }

    pub fn in_bounds_world(&self, pos: Vec2) -> bool {
        let half = self.half_extents();
        pos.x >= -half.x && pos.x < half.x && pos.y >= -half.y && pos.y < half.y
    }

    /// Tile at grid coordinates. Out-of-bounds reads as a wall.
    pub fn tile(&self, tx: i32, ty: i32) -> Tile {
        if !self.in_bounds(tx, ty) {
            return Tile::Wall;
        }
        self.tiles[(ty * self.width + tx) as usize]
    }

    /// Overwrite one tile. Out-of-bounds writes are ignored.
    pub fn set_tile(&mut self, tx: i32, ty: i32, tile: Tile) {
        if self.in_bounds(tx, ty) {
            let idx = (ty * self.width + tx) as usize;
            self.tiles[idx] = tile;
        }
    }

    /// Center of a tile in world space.
    pub fn tile_to_world(&self, tx: i32, ty: i32) -> Vec2 {
        let half = self.half_extents();
        Vec2::new(
            tx as f32 * self.tile_size + self.tile_size * 0.5 - half.x,
            ty as f32 * self.tile_size + self.tile_size * 0.5 - half.y,
        )
    }

    /// Tile containing a world position. May be out of bounds.
    pub fn world_to_tile(&self, pos: Vec2) -> (i32, i32) {
        let half = self.half_extents();
        (
            ((pos.x + half.x) / self.tile_size).floor() as i32,
            ((pos.y + half.y) / self.tile_size).floor() as i32,
        )
    }

    /// True if tanks cannot occupy the position (wall, pit or off-map).
    pub fn is_solid(&self, pos: Vec2) -> bool {
        let (tx, ty) = self.world_to_tile(pos);
        self.tile(tx, ty).blocks_movement()
    }

    /// True if the tile at grid coordinates blocks movement.
    pub fn is_solid_tile(&self, tx: i32, ty: i32) -> bool {
        self.tile(tx, ty).blocks_movement()
    }

    /// True if bullets are stopped at the position (wall or off-map).
    pub fn blocks_bullets(&self, pos: Vec2) -> bool {
        let (tx, ty) = self.world_to_tile(pos);
        self.tile(tx, ty).blocks_bullets()
    }

    pub fn blocks_bullets_tile(&self, tx: i32, ty: i32) -> bool {
        self.tile(tx, ty).blocks_bullets()
    }

    /// Clamp a position to lie strictly inside the map.
    pub fn clamp_to_bounds(&self, pos: Vec2, margin: f32) -> Vec2 {
        let half = self.half_extents() - Vec2::splat(margin);
        pos.clamp(-half.max(Vec2::ZERO), half.max(Vec2::ZERO))
    }
}
