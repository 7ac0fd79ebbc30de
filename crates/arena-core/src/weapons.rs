//! Weapon parameter table.

use serde::{Deserialize, Serialize};

use crate::enums::WeaponKind;

/// Ballistic and rate-of-fire parameters of a weapon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    /// Seconds between shots before archetype scaling.
    pub fire_cooldown: f32,
    pub projectile_speed: f32,
    pub damage: i32,
    /// Wall bounces before a projectile is destroyed.
    pub max_bounces: u32,
    /// Maximum projectiles a single tank may have in flight.
    pub max_active: usize,
}

/// Look up the parameters of a weapon.
pub fn weapon_stats(kind: WeaponKind) -> WeaponStats {
    match kind {
        WeaponKind::Default => WeaponStats {
            fire_cooldown: 0.325,
            projectile_speed: 11.25,
            damage: 5,
            max_bounces: 1,
            max_active: 8,
        },
        WeaponKind::MachineGun => WeaponStats {
            fire_cooldown: 0.1625,
            projectile_speed: 14.0,
            damage: 1,
            max_bounces: 0,
            max_active: 12,
        },
        WeaponKind::Ricochet => WeaponStats {
            fire_cooldown: 0.3,
            projectile_speed: 12.5,
            damage: 5,
            max_bounces: 2,
            max_active: 6,
        },
    }
}
