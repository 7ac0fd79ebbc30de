//! Read-only view of the world the controllers reason about, plus the
//! interfaces of the external collaborators.

use arena_core::enums::WeaponKind;
use arena_core::types::{MineSnapshot, ProjectileSnapshot, TankId, TankSnapshot};
use arena_nav::TileGrid;
use glam::Vec2;

/// A closing area-denial zone.
///
/// Distances are signed: positive inside the hazard, negative in the safe
/// zone.
pub trait HazardField {
    fn is_enabled(&self) -> bool;

    /// True if `pos` is inside the hazard right now.
    fn is_inside(&self, pos: Vec2) -> bool;

    /// True if `pos` will be inside the hazard once closing reaches
    /// `future_progress` (0 = not closed, 1 = fully closed).
    fn will_be_inside(&self, pos: Vec2, future_progress: f32) -> bool;

    /// Current closing progress in `[0, 1]`.
    fn progress(&self) -> f32;

    /// Signed distance from `pos` to the current boundary.
    fn distance_to_boundary(&self, pos: Vec2) -> f32;

    /// A point of the final safe zone near `from`, at least `margin` inside it.
    fn safe_position(&self, from: Vec2, margin: f32) -> Vec2;

    /// Center and half extents of the safe zone once fully closed.
    fn final_safe_zone(&self) -> (Vec2, Vec2);
}

/// External tank pool that owns tank bodies.
pub trait TankPool {
    /// Spawn a computer-controlled tank. `None` if the pool is full.
    fn spawn_tank(
        &mut self,
        pos: Vec2,
        angle: f32,
        health: i32,
        weapon: WeaponKind,
    ) -> Option<TankId>;
}

/// Snapshot of everything a controller may query during one tick.
#[derive(Clone, Copy)]
pub struct WorldView<'a> {
    pub map: &'a TileGrid,
    pub tanks: &'a [TankSnapshot],
    pub projectiles: &'a [ProjectileSnapshot],
    pub mines: &'a [MineSnapshot],
    pub hazard: Option<&'a dyn HazardField>,
}

impl<'a> WorldView<'a> {
    pub fn new(map: &'a TileGrid, tanks: &'a [TankSnapshot]) -> Self {
        Self {
            map,
            tanks,
            projectiles: &[],
            mines: &[],
            hazard: None,
        }
    }

    pub fn with_projectiles(mut self, projectiles: &'a [ProjectileSnapshot]) -> Self {
        self.projectiles = projectiles;
        self
    }

    pub fn with_mines(mut self, mines: &'a [MineSnapshot]) -> Self {
        self.mines = mines;
        self
    }

    pub fn with_hazard(mut self, hazard: &'a dyn HazardField) -> Self {
        self.hazard = Some(hazard);
        self
    }

    pub fn tank(&self, id: TankId) -> Option<&'a TankSnapshot> {
        self.tanks.iter().find(|t| t.id == id)
    }

    /// Closest living human-controlled tank.
    pub fn nearest_player(&self, pos: Vec2) -> Option<&'a TankSnapshot> {
        self.tanks
            .iter()
            .filter(|t| t.alive && t.is_player)
            .min_by(|a, b| {
                a.pos
                    .distance_squared(pos)
                    .total_cmp(&b.pos.distance_squared(pos))
            })
    }

    pub fn projectiles_owned_by(&self, owner: TankId) -> usize {
        self.projectiles.iter().filter(|p| p.owner == owner).count()
    }

    /// The hazard, if there is one and it is active.
    pub fn active_hazard(&self) -> Option<&'a dyn HazardField> {
        self.hazard.filter(|h| h.is_enabled())
    }
}
