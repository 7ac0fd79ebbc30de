//! Kinematic tank integrator.
//!
//! Applies movement and turret intents: position += move_dir * dt, sliding
//! along walls and refusing moves that push two tanks into each other.

use arena_core::types::{TankId, TankIntent};
use arena_nav::{is_position_clear, TileGrid};
use glam::Vec2;
use hecs::World;

use crate::components::{Position, Tank, Velocity};
use crate::hazard::ClosingCloud;

/// Move every living tank that has an intent this tick.
pub fn run(
    world: &mut World,
    map: &TileGrid,
    intents: &[TankIntent],
    cloud: Option<&ClosingCloud>,
    dt: f32,
) {
    if dt <= 0.0 {
        return;
    }
    let bodies: Vec<(TankId, Vec2, f32)> = world
        .query::<(&Tank, &Position)>()
        .iter()
        .filter(|(_, (tank, _))| tank.alive)
        .map(|(_, (tank, pos))| (tank.id, pos.0, tank.radius))
        .collect();

    for (_entity, (tank, pos, vel)) in world.query_mut::<(&mut Tank, &mut Position, &mut Velocity)>() {
        vel.0 = Vec2::ZERO;
        if !tank.alive {
            continue;
        }
        let Some(intent) = intents.iter().find(|i| i.tank == tank.id) else {
            continue;
        };
        tank.turret_angle = intent.target_turret;

        let mut step = intent.move_dir;
        if let Some(cloud) = cloud {
            if cloud.is_damaging(pos.0) {
                step *= cloud.config.slowdown;
            }
        }
        if step == Vec2::ZERO {
            continue;
        }

        let next = slide(map, pos.0, pos.0 + step * dt, tank.radius);
        let bumps = bodies.iter().any(|&(id, other, radius)| {
            id != tank.id
                && next.distance(other) < tank.radius + radius
                && next.distance(other) < pos.0.distance(other)
        });
        if bumps {
            continue;
        }
        vel.0 = (next - pos.0) / dt;
        pos.0 = next;
    }
}

/// Full move if clear, otherwise the clear single-axis component, otherwise
/// stay put.
pub fn slide(map: &TileGrid, from: Vec2, to: Vec2, radius: f32) -> Vec2 {
    [to, Vec2::new(to.x, from.y), Vec2::new(from.x, to.y)]
        .into_iter()
        .find(|p| is_position_clear(map, *p, radius))
        .unwrap_or(from)
}
