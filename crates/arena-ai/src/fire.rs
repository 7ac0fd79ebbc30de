//! Fire resolution: decides whether a controller shoots this tick and
//! resolves the projectile it would spawn.

use arena_core::constants::*;
use arena_core::enums::AiState;
use arena_core::types::{angle_to_dir, normalize_angle, reflect, FireRequest, TankId};
use arena_nav::{raycast, TileGrid};
use glam::Vec2;
use tracing::debug;

use crate::controller::{AimMode, Controller};
use crate::profiles::BehaviorFlags;
use crate::tactics::{segment_circle_hit, trace_shot};
use crate::tuning::BehaviorTuning;
use crate::world::WorldView;

/// Where a shot leaves the barrel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireSolution {
    pub spawn_pos: Vec2,
    pub direction: Vec2,
    /// Bounces used up before the shot leaves the barrel.
    pub bounce_cost: u32,
}

/// Spawn at the barrel tip. A barrel poking into a wall deflects the shot
/// off that wall, which costs one bounce.
pub fn fire_solution(map: &TileGrid, pos: Vec2, angle: f32) -> FireSolution {
    let direction = angle_to_dir(angle);
    let tip = pos + direction * BARREL_LENGTH;
    let hit = raycast(map, pos, tip);

    if hit.hit && hit.distance < BARREL_LENGTH - BARREL_CLEAR_EPSILON {
        return FireSolution {
            spawn_pos: hit.point + hit.normal * BARREL_DEFLECT_EPSILON,
            direction: reflect(direction, hit.normal),
            bounce_cost: 1,
        };
    }
    FireSolution {
        spawn_pos: tip,
        direction,
        bounce_cost: 0,
    }
}

/// First living tank other than the shooter that a shot along `dir` would
/// hit, following its bounces for at most `range`.
pub fn first_tank_in_lane(
    view: &WorldView<'_>,
    shooter: TankId,
    origin: Vec2,
    dir: Vec2,
    max_bounces: u32,
    range: f32,
) -> Option<TankId> {
    trace_shot(view.map, origin, dir, max_bounces, range)
        .iter()
        .find_map(|seg| {
            view.tanks
                .iter()
                .filter(|t| t.alive && t.id != shooter)
                .filter_map(|t| {
                    segment_circle_hit(seg.start, seg.end, t.pos, t.radius).map(|d| (t.id, d))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(id, _)| id)
        })
}

impl Controller {
    /// Run the fire checks and, when they all pass, consume the cooldown and
    /// return the projectile to spawn.
    pub fn try_fire(&mut self, view: &WorldView<'_>, tuning: &BehaviorTuning) -> Option<FireRequest> {
        let me = *view.tank(self.tank).filter(|t| t.alive)?;

        let opportunistic = matches!(self.aim_mode, AimMode::Defense | AimMode::Mine);
        if !(self.wants_to_fire || opportunistic) || self.aim_mode == AimMode::None {
            return None;
        }
        if self.has(BehaviorFlags::REQUIRE_BOUNCE_SHOT) && !self.has_shot() {
            return None;
        }
        if self.state == AiState::Evading {
            return None;
        }
        if self.escape.active && self.escape.urgency >= HAZARD_CRITICAL_URGENCY {
            return None;
        }
        if self.fire_timer > 0.0 || self.hesitation_timer > 0.0 {
            return None;
        }

        let aim_error = normalize_angle(self.target_aim - self.current_aim).abs();
        if aim_error > self.profile.aim_tolerance {
            return None;
        }

        let weapon = self.profile.weapon_stats();
        let allowed = if self.aim_mode == AimMode::Bounce {
            self.profile.max_projectiles_bounce
        } else {
            self.profile.max_projectiles_direct
        };
        let budget = ((allowed as f32 * self.fire_confidence).ceil() as usize)
            .clamp(1, weapon.max_active.max(1));
        if view.projectiles_owned_by(self.tank) >= budget {
            return None;
        }

        let solution = fire_solution(view.map, me.pos, self.current_aim);
        let max_bounces = self.profile.max_bounces.saturating_sub(solution.bounce_cost);

        let lane = tuning.friendly_fire_range(weapon.max_bounces);
        if let Some(hit) = first_tank_in_lane(
            view,
            self.tank,
            solution.spawn_pos,
            solution.direction,
            max_bounces,
            lane,
        ) {
            let friendly = view.tank(hit).is_some_and(|t| !t.is_player);
            if friendly {
                return None;
            }
        }

        self.fire_timer = self.profile.fire_cooldown();
        self.shots_fired += 1;
        if self.aim_mode == AimMode::Bounce {
            self.bounce.angle = None;
            self.bounce.search_timer = BOUNCE_SEARCH_AFTER_FIRE;
        }

        debug!(
            tank = %self.tank,
            archetype = self.archetype.name(),
            mode = ?self.aim_mode,
            "fired"
        );

        Some(FireRequest {
            tank: self.tank,
            spawn_pos: solution.spawn_pos,
            direction: solution.direction,
            weapon: self.profile.weapon,
            speed: self.profile.projectile_speed(),
            max_bounces,
            damage: weapon.damage,
        })
    }
}
