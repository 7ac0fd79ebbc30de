//! Read-only snapshots of the world handed to the AI each tick.

use arena_core::types::{ProjectileSnapshot, TankSnapshot};
use hecs::World;

use crate::components::{Position, Projectile, Tank, Velocity};

/// Every tank, ordered by id.
pub fn tank_snapshots(world: &World) -> Vec<TankSnapshot> {
    let mut tanks: Vec<TankSnapshot> = world
        .query::<(&Tank, &Position)>()
        .iter()
        .map(|(_, (tank, pos))| TankSnapshot {
            id: tank.id,
            pos: pos.0,
            turret_angle: tank.turret_angle,
            health: tank.health,
            max_health: tank.max_health,
            alive: tank.alive,
            is_player: tank.is_player,
            radius: tank.radius,
        })
        .collect();
    tanks.sort_by_key(|t| t.id);
    tanks
}

/// Projectiles still in flight.
pub fn projectile_snapshots(world: &World) -> Vec<ProjectileSnapshot> {
    world
        .query::<(&Projectile, &Position, &Velocity)>()
        .iter()
        .filter(|(_, (proj, _, _))| !proj.spent)
        .map(|(_, (proj, pos, vel))| ProjectileSnapshot {
            pos: pos.0,
            velocity: vel.0,
            owner: proj.owner,
            bounces_remaining: proj.bounces_remaining,
        })
        .collect()
}
