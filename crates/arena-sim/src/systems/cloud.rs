//! Hazard cloud damage.

use arena_core::types::TankId;
use hecs::World;
use tracing::info;

use crate::components::{Position, Tank};
use crate::hazard::ClosingCloud;

/// Damage tanks that have stayed inside the cloud for a full damage
/// interval. Leaving the cloud resets the exposure clock.
pub fn run(world: &mut World, cloud: &ClosingCloud, dt: f32) -> Vec<TankId> {
    let mut destroyed = Vec::new();
    for (_entity, (tank, pos)) in world.query_mut::<(&mut Tank, &Position)>() {
        if !tank.alive {
            continue;
        }
        if !cloud.is_damaging(pos.0) {
            tank.cloud_exposure = 0.0;
            continue;
        }
        tank.cloud_exposure += dt;
        if tank.cloud_exposure >= cloud.config.damage_interval {
            tank.cloud_exposure = 0.0;
            if tank.take_damage(cloud.config.damage) {
                info!(tank = %tank.id, "tank destroyed by hazard cloud");
                destroyed.push(tank.id);
            }
        }
    }
    destroyed
}
