//! Fundamental geometric and simulation types.
//!
//! Angles follow the arena convention: 0 points along +y and angles grow
//! toward +x, so a heading `a` has direction `(sin a, cos a)`.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::{MINE_ARM_TIME, TANK_RADIUS};
use crate::enums::WeaponKind;

/// Stable identity of a tank in the external tank pool.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TankId(pub u32);

impl std::fmt::Display for TankId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tank#{}", self.0)
    }
}

/// Read-only view of one tank, as reported by the tank pool each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankSnapshot {
    pub id: TankId,
    pub pos: Vec2,
    pub turret_angle: f32,
    pub health: i32,
    pub max_health: i32,
    pub alive: bool,
    /// Human-controlled tanks are the targets of every AI controller.
    pub is_player: bool,
    pub radius: f32,
}

impl TankSnapshot {
    pub fn new(id: TankId, pos: Vec2, health: i32, is_player: bool) -> Self {
        Self {
            id,
            pos,
            turret_angle: 0.0,
            health,
            max_health: health,
            alive: true,
            is_player,
            radius: TANK_RADIUS,
        }
    }

    /// Current health as a fraction of maximum health.
    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }
}

/// Read-only view of an active projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub pos: Vec2,
    pub velocity: Vec2,
    pub owner: TankId,
    pub bounces_remaining: u32,
}

/// Read-only view of an active mine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MineSnapshot {
    pub pos: Vec2,
    /// `None` for mines placed by the map.
    pub owner: Option<TankId>,
    /// Seconds until armed; zero once armed.
    pub arm_timer: f32,
}

impl MineSnapshot {
    pub fn placed(pos: Vec2, owner: Option<TankId>) -> Self {
        Self {
            pos,
            owner,
            arm_timer: MINE_ARM_TIME,
        }
    }

    pub fn armed(pos: Vec2) -> Self {
        Self {
            pos,
            owner: None,
            arm_timer: 0.0,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.arm_timer <= 0.0
    }
}

/// Movement and aim intent for one tank for one tick.
///
/// `move_dir` carries both direction and speed. `target_turret` is the
/// already rate-limited turret angle the integrator should apply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankIntent {
    pub tank: TankId,
    pub move_dir: Vec2,
    pub target_turret: f32,
}

/// A fully resolved request to spawn a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireRequest {
    pub tank: TankId,
    pub spawn_pos: Vec2,
    pub direction: Vec2,
    pub weapon: WeaponKind,
    pub speed: f32,
    pub max_bounces: u32,
    pub damage: i32,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += dt as f64;
    }
}

/// Unit direction for a heading.
pub fn angle_to_dir(angle: f32) -> Vec2 {
    Vec2::new(angle.sin(), angle.cos())
}

/// Heading of a direction vector.
pub fn dir_to_angle(dir: Vec2) -> f32 {
    dir.x.atan2(dir.y)
}

/// Wrap an angle into `[-PI, PI]`.
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped < -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Rotate `current` toward `target` by at most `max_step` radians.
pub fn rotate_towards(current: f32, target: f32, max_step: f32) -> f32 {
    let diff = normalize_angle(target - current);
    if diff.abs() <= max_step {
        normalize_angle(target)
    } else {
        normalize_angle(current + max_step.copysign(diff))
    }
}

/// Reflect a direction off a surface with unit normal `normal`.
pub fn reflect(dir: Vec2, normal: Vec2) -> Vec2 {
    dir - normal * (2.0 * dir.dot(normal))
}
