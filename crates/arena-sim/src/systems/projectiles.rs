//! Projectile spawning, flight, wall bounces and hits.

use arena_ai::tactics::{segment_circle_hit, ShotSegment};
use arena_core::constants::{BOUNCE_WALL_OFFSET, PROJECTILE_LIFETIME, PROJECTILE_RADIUS};
use arena_core::types::{reflect, FireRequest, TankId};
use arena_nav::{raycast, TileGrid};
use glam::Vec2;
use hecs::{Entity, World};
use tracing::info;

use crate::components::{Position, Projectile, Tank, Velocity};

/// Spawn one projectile per fire request.
pub fn spawn(world: &mut World, requests: &[FireRequest]) {
    for req in requests {
        world.spawn((
            Projectile {
                owner: req.tank,
                damage: req.damage,
                bounces_remaining: req.max_bounces,
                lifetime: PROJECTILE_LIFETIME,
                hits_owner: false,
                spent: false,
            },
            Position(req.spawn_pos),
            Velocity(req.direction.normalize_or_zero() * req.speed),
        ));
    }
}

/// Move a projectile for one tick, reflecting off walls while it has
/// bounces left. Returns the legs it travelled.
pub fn fly(
    map: &TileGrid,
    proj: &mut Projectile,
    pos: &mut Vec2,
    vel: &mut Vec2,
    dt: f32,
) -> Vec<ShotSegment> {
    let mut legs = Vec::with_capacity(2);
    let speed = vel.length();
    let mut remaining = speed * dt;
    if speed <= 0.0 {
        return legs;
    }

    while remaining > 0.0 && !proj.spent {
        let dir = *vel / speed;
        let start = *pos;
        let hit = raycast(map, start, start + dir * remaining);
        legs.push(ShotSegment {
            start,
            end: hit.point,
        });
        if !hit.hit {
            *pos = hit.point;
            break;
        }
        if proj.bounces_remaining == 0 {
            *pos = hit.point;
            proj.spent = true;
            break;
        }
        proj.bounces_remaining -= 1;
        proj.hits_owner = true;
        *vel = reflect(dir, hit.normal) * speed;
        *pos = hit.point + hit.normal * BOUNCE_WALL_OFFSET;
        remaining -= hit.distance.max(BOUNCE_WALL_OFFSET);
    }
    legs
}

/// Advance every projectile, then resolve tank hits and projectiles
/// shooting each other down. Returns the tanks destroyed this tick.
pub fn run(world: &mut World, map: &TileGrid, dt: f32) -> Vec<TankId> {
    let mut flights: Vec<(Entity, Projectile, Vec<ShotSegment>)> = Vec::new();
    for (entity, (proj, pos, vel)) in
        world.query_mut::<(&mut Projectile, &mut Position, &mut Velocity)>()
    {
        if proj.spent {
            continue;
        }
        proj.lifetime -= dt;
        if proj.lifetime <= 0.0 {
            proj.spent = true;
            continue;
        }
        let legs = fly(map, proj, &mut pos.0, &mut vel.0, dt);
        flights.push((entity, *proj, legs));
    }

    let tanks: Vec<(Entity, TankId, Vec2, f32)> = world
        .query::<(&Tank, &Position)>()
        .iter()
        .filter(|(_, (tank, _))| tank.alive)
        .map(|(e, (tank, pos))| (e, tank.id, pos.0, tank.radius))
        .collect();

    let mut hits: Vec<(Entity, Entity, i32)> = Vec::new();
    for (proj_entity, proj, legs) in &flights {
        let mut traveled = 0.0;
        let mut first: Option<(f32, Entity)> = None;
        for leg in legs {
            for &(tank_entity, id, center, radius) in &tanks {
                if id == proj.owner && !proj.hits_owner {
                    continue;
                }
                if let Some(d) = segment_circle_hit(leg.start, leg.end, center, radius + PROJECTILE_RADIUS) {
                    let at = traveled + d;
                    if first.map_or(true, |(best, _)| at < best) {
                        first = Some((at, tank_entity));
                    }
                }
            }
            if first.is_some() {
                break;
            }
            traveled += leg.length();
        }
        if let Some((_, tank_entity)) = first {
            hits.push((*proj_entity, tank_entity, proj.damage));
        }
    }

    let mut destroyed = Vec::new();
    for (proj_entity, tank_entity, damage) in hits {
        if let Ok(mut proj) = world.get::<&mut Projectile>(proj_entity) {
            proj.spent = true;
        }
        if let Ok(mut tank) = world.get::<&mut Tank>(tank_entity) {
            if tank.take_damage(damage) {
                info!(tank = %tank.id, "tank destroyed");
                destroyed.push(tank.id);
            }
        }
    }

    shoot_down(world);
    destroyed
}

/// Projectiles from different owners that touch destroy each other.
fn shoot_down(world: &mut World) {
    let live: Vec<(Entity, TankId, Vec2)> = world
        .query::<(&Projectile, &Position)>()
        .iter()
        .filter(|(_, (proj, _))| !proj.spent)
        .map(|(e, (proj, pos))| (e, proj.owner, pos.0))
        .collect();

    let mut collided = Vec::new();
    for (i, a) in live.iter().enumerate() {
        for b in &live[i + 1..] {
            if a.1 != b.1 && a.2.distance(b.2) < PROJECTILE_RADIUS * 2.0 {
                collided.push(a.0);
                collided.push(b.0);
            }
        }
    }
    for entity in collided {
        if let Ok(mut proj) = world.get::<&mut Projectile>(entity) {
            proj.spent = true;
        }
    }
}
