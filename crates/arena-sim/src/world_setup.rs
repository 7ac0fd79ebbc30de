//! Entity spawn factories and the tank pool handed to the AI registry.

use arena_ai::TankPool;
use arena_core::constants::*;
use arena_core::enums::WeaponKind;
use arena_core::types::TankId;
use arena_nav::TileGrid;
use glam::Vec2;
use hecs::{Entity, World};

use crate::components::{Position, Tank, Velocity};

/// A small walled arena with a few pillars, used by demos and tests.
pub fn demo_arena() -> TileGrid {
    TileGrid::from_ascii(&[
        "################",
        "#..............#",
        "#..............#",
        "#...##....##...#",
        "#...##....##...#",
        "#..............#",
        "#......oo......#",
        "#..............#",
        "#..............#",
        "#......oo......#",
        "#..............#",
        "#...##....##...#",
        "#...##....##...#",
        "#..............#",
        "#..............#",
        "################",
    ])
}

/// Spawn a tank body.
pub fn spawn_tank(
    world: &mut World,
    id: TankId,
    pos: Vec2,
    angle: f32,
    health: i32,
    weapon: WeaponKind,
    is_player: bool,
) -> Entity {
    world.spawn((
        Tank {
            id,
            is_player,
            health,
            max_health: health,
            alive: true,
            turret_angle: angle,
            radius: TANK_RADIUS,
            weapon,
            cloud_exposure: 0.0,
        },
        Position(pos),
        Velocity::default(),
    ))
}

/// Number of tank bodies in the world, dead or alive.
pub fn tank_count(world: &World) -> usize {
    world.query::<&Tank>().iter().count()
}

/// Tank pool backed by the ECS world.
pub struct EcsTankPool<'a> {
    pub world: &'a mut World,
    pub next_id: &'a mut u32,
    pub capacity: usize,
}

impl TankPool for EcsTankPool<'_> {
    fn spawn_tank(
        &mut self,
        pos: Vec2,
        angle: f32,
        health: i32,
        weapon: WeaponKind,
    ) -> Option<TankId> {
        if tank_count(self.world) >= self.capacity {
            return None;
        }
        let id = TankId(*self.next_id);
        *self.next_id += 1;
        spawn_tank(self.world, id, pos, angle, health, weapon, false);
        Some(id)
    }
}
