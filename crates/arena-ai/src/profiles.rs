//! Archetype-specific behavioral profiles.
//!
//! Behavior is composed from capability flags. The state machine checks a
//! flag before every gated branch, so a new archetype is a new table row.

use arena_core::constants::BASE_TURRET_TURN_RATE;
use arena_core::enums::{Archetype, WeaponKind};
use arena_core::weapons::{weapon_stats, WeaponStats};
use bitflags::bitflags;

bitflags! {
    /// Capabilities an archetype may use.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct BehaviorFlags: u32 {
        /// Drives the hull at all.
        const MOVE                = 1 << 0;
        /// Plans routes with A* instead of driving straight.
        const PATHFIND            = 1 << 1;
        /// Peek-and-fire from cover.
        const USE_COVER           = 1 << 2;
        const CHASE               = 1 << 3;
        const FLANK               = 1 << 4;
        /// Dodges incoming projectiles.
        const EVADE               = 1 << 5;
        /// Strafes around the target at combat range.
        const STRAFE              = 1 << 6;
        const BOUNCE_SHOTS        = 1 << 7;
        /// Shoots down incoming projectiles.
        const DEFEND_PROJECTILES  = 1 << 8;
        const TARGET_MINES        = 1 << 9;
        /// Runs from the closing hazard cloud.
        const HAZARD_ESCAPE       = 1 << 10;
        /// Never fires without line of sight or a solved bounce shot.
        const REQUIRE_BOUNCE_SHOT = 1 << 11;
    }
}

/// Behavioral profile for an archetype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchetypeProfile {
    pub health: i32,
    pub weapon: WeaponKind,
    /// Bounces given to projectiles fired by this archetype.
    pub max_bounces: u32,
    /// Multiplier on the weapon's cooldown.
    pub fire_cooldown_scale: f32,
    /// Multiplier on the base turret turn rate.
    pub aim_speed: f32,
    /// Largest aim error (radians) at which a shot is taken.
    pub aim_tolerance: f32,
    pub move_speed: f32,
    /// Multiplier on the weapon's projectile speed.
    pub projectile_speed_scale: f32,
    /// Ray length used by the bounce-shot solver.
    pub bounce_shot_range: f32,
    pub bounce_shot_samples: u32,
    /// Chance per evaluation to try shooting down an incoming projectile.
    pub projectile_defense_chance: f32,
    pub max_shots_per_peek: u32,
    /// Projectiles allowed in flight when shooting with line of sight.
    pub max_projectiles_direct: usize,
    /// Projectiles allowed in flight when shooting a bounce shot.
    pub max_projectiles_bounce: usize,
    pub flags: BehaviorFlags,
}

impl ArchetypeProfile {
    pub fn has(&self, flag: BehaviorFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn weapon_stats(&self) -> WeaponStats {
        weapon_stats(self.weapon)
    }

    /// Turret turn rate in radians per second.
    pub fn turret_turn_rate(&self) -> f32 {
        BASE_TURRET_TURN_RATE * self.aim_speed
    }

    pub fn fire_cooldown(&self) -> f32 {
        self.weapon_stats().fire_cooldown * self.fire_cooldown_scale
    }

    pub fn projectile_speed(&self) -> f32 {
        self.weapon_stats().projectile_speed * self.projectile_speed_scale
    }
}

/// Get the behavioral profile for a given archetype.
pub fn get_profile(archetype: Archetype) -> ArchetypeProfile {
    match archetype {
        Archetype::Sentry => ArchetypeProfile {
            health: 10,
            weapon: WeaponKind::Default,
            max_bounces: 1,
            fire_cooldown_scale: 1.6,
            aim_speed: 1.2,
            aim_tolerance: 0.26,
            move_speed: 0.0,
            projectile_speed_scale: 1.0,
            bounce_shot_range: 30.0,
            bounce_shot_samples: 36,
            projectile_defense_chance: 0.25,
            max_shots_per_peek: 1,
            max_projectiles_direct: 3,
            max_projectiles_bounce: 1,
            flags: BehaviorFlags::BOUNCE_SHOTS
                | BehaviorFlags::TARGET_MINES
                | BehaviorFlags::DEFEND_PROJECTILES,
        },
        Archetype::Skirmisher => ArchetypeProfile {
            health: 15,
            weapon: WeaponKind::Default,
            max_bounces: 1,
            fire_cooldown_scale: 1.4,
            aim_speed: 1.3,
            aim_tolerance: 0.22,
            move_speed: 3.0,
            projectile_speed_scale: 1.0,
            bounce_shot_range: 25.0,
            bounce_shot_samples: 24,
            projectile_defense_chance: 0.0,
            max_shots_per_peek: 2,
            max_projectiles_direct: 2,
            max_projectiles_bounce: 1,
            flags: BehaviorFlags::MOVE
                | BehaviorFlags::PATHFIND
                | BehaviorFlags::USE_COVER
                | BehaviorFlags::BOUNCE_SHOTS
                | BehaviorFlags::HAZARD_ESCAPE
                | BehaviorFlags::TARGET_MINES,
        },
        Archetype::Hunter => ArchetypeProfile {
            health: 20,
            weapon: WeaponKind::MachineGun,
            max_bounces: 0,
            fire_cooldown_scale: 1.0,
            aim_speed: 2.0,
            aim_tolerance: 0.3,
            move_speed: 6.0,
            projectile_speed_scale: 1.0,
            bounce_shot_range: 0.0,
            bounce_shot_samples: 0,
            projectile_defense_chance: 0.35,
            max_shots_per_peek: 3,
            max_projectiles_direct: 4,
            max_projectiles_bounce: 0,
            flags: BehaviorFlags::MOVE
                | BehaviorFlags::PATHFIND
                | BehaviorFlags::USE_COVER
                | BehaviorFlags::CHASE
                | BehaviorFlags::FLANK
                | BehaviorFlags::EVADE
                | BehaviorFlags::STRAFE
                | BehaviorFlags::DEFEND_PROJECTILES
                | BehaviorFlags::HAZARD_ESCAPE,
        },
        Archetype::Sniper => ArchetypeProfile {
            health: 12,
            weapon: WeaponKind::Ricochet,
            max_bounces: 3,
            fire_cooldown_scale: 2.2,
            aim_speed: 0.9,
            aim_tolerance: 0.12,
            move_speed: 0.0,
            projectile_speed_scale: 1.25,
            bounce_shot_range: 60.0,
            bounce_shot_samples: 72,
            projectile_defense_chance: 0.0,
            max_shots_per_peek: 1,
            max_projectiles_direct: 2,
            max_projectiles_bounce: 1,
            flags: BehaviorFlags::BOUNCE_SHOTS | BehaviorFlags::REQUIRE_BOUNCE_SHOT,
        },
    }
}
