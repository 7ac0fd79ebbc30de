//! Cleanup system: removes spent projectiles and projectiles that left the map.

use arena_nav::TileGrid;
use hecs::{Entity, World};

use crate::components::{Position, Projectile};

/// Despawn spent or off-map projectiles. Uses a caller-owned buffer to avoid
/// per-tick allocation. Tank bodies are never removed.
pub fn run(world: &mut World, map: &TileGrid, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, (proj, pos)) in world.query_mut::<(&Projectile, &Position)>() {
        if proj.spent || !map.in_bounds_world(pos.0) {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
