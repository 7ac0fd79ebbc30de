//! ECS components of the harness world.

use arena_core::enums::WeaponKind;
use arena_core::types::TankId;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// World-space position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec2);

/// World-space velocity in units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity(pub Vec2);

/// A tank body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    pub id: TankId,
    pub is_player: bool,
    pub health: i32,
    pub max_health: i32,
    pub alive: bool,
    pub turret_angle: f32,
    pub radius: f32,
    pub weapon: WeaponKind,
    /// Time spent inside the hazard cloud since the last damage tick.
    pub cloud_exposure: f32,
}

impl Tank {
    /// Apply damage. Returns true if this killed the tank.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.alive {
            return false;
        }
        self.health -= amount;
        if self.health <= 0 {
            self.health = 0;
            self.alive = false;
            return true;
        }
        false
    }
}

/// A projectile in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub owner: TankId,
    pub damage: i32,
    pub bounces_remaining: u32,
    /// Seconds left before the projectile fizzles.
    pub lifetime: f32,
    /// The owner is immune until the first bounce.
    pub hits_owner: bool,
    pub spent: bool,
}
