//! Mine arming, triggering and explosions.

use arena_core::constants::{MINE_DAMAGE, MINE_DAMAGE_RADIUS, MINE_TRIGGER_RADIUS, PROJECTILE_RADIUS};
use arena_core::types::{MineSnapshot, TankId};
use hecs::World;
use tracing::{debug, info};

use crate::components::{Position, Projectile, Tank};

/// Tick arming timers and detonate armed mines touched by a tank or struck
/// by a projectile. Returns the tanks destroyed by the blasts.
pub fn run(world: &mut World, mines: &mut Vec<MineSnapshot>, dt: f32) -> Vec<TankId> {
    for mine in mines.iter_mut() {
        if mine.arm_timer > 0.0 {
            mine.arm_timer = (mine.arm_timer - dt).max(0.0);
        }
    }

    let mut blasts = Vec::new();
    mines.retain(|mine| {
        if !mine.is_armed() {
            return true;
        }
        let touched = world
            .query::<(&Tank, &Position)>()
            .iter()
            .any(|(_, (tank, pos))| {
                tank.alive && pos.0.distance(mine.pos) < MINE_TRIGGER_RADIUS + tank.radius
            });
        let struck = world
            .query::<(&Projectile, &Position)>()
            .iter()
            .any(|(_, (proj, pos))| {
                !proj.spent && pos.0.distance(mine.pos) < MINE_TRIGGER_RADIUS + PROJECTILE_RADIUS
            });
        if touched || struck {
            blasts.push(mine.pos);
            return false;
        }
        true
    });

    let mut destroyed = Vec::new();
    for center in blasts {
        debug!("mine exploded at ({:.1}, {:.1})", center.x, center.y);
        for (_entity, (proj, pos)) in world.query_mut::<(&mut Projectile, &Position)>() {
            if pos.0.distance(center) < MINE_TRIGGER_RADIUS + PROJECTILE_RADIUS {
                proj.spent = true;
            }
        }
        for (_entity, (tank, pos)) in world.query_mut::<(&mut Tank, &Position)>() {
            if pos.0.distance(center) < MINE_DAMAGE_RADIUS + tank.radius && tank.take_damage(MINE_DAMAGE) {
                info!(tank = %tank.id, "tank destroyed by mine");
                destroyed.push(tank.id);
            }
        }
    }
    destroyed
}
