//! Behavior state machine.
//!
//! One implementation for every archetype. Each branch that needs a
//! capability checks the profile flag first, and entering a state whose
//! capability is missing falls back to chasing (or idling when chasing is
//! not allowed either).

use arena_core::constants::*;
use arena_core::enums::AiState;
use glam::Vec2;
use rand::Rng;
use tracing::debug;

use crate::controller::{Controller, Situation, TickContext};
use crate::profiles::{ArchetypeProfile, BehaviorFlags};
use crate::tactics::{find_cover, find_evasion, find_flank};

/// Capability a state needs, if any.
pub fn required_flag(state: AiState) -> Option<BehaviorFlags> {
    match state {
        AiState::Idle => None,
        AiState::SeekingCover
        | AiState::InCover
        | AiState::Peeking
        | AiState::Firing
        | AiState::Retreating => Some(BehaviorFlags::USE_COVER),
        AiState::Chasing => Some(BehaviorFlags::CHASE),
        AiState::Flanking => Some(BehaviorFlags::FLANK),
        AiState::Evading => Some(BehaviorFlags::EVADE),
        AiState::Engaging => Some(BehaviorFlags::STRAFE),
    }
}

/// The state actually entered when `requested` is asked for.
pub fn resolve_state(profile: &ArchetypeProfile, requested: AiState) -> AiState {
    match required_flag(requested) {
        Some(flag) if !profile.has(flag) => {
            if profile.has(BehaviorFlags::CHASE) {
                AiState::Chasing
            } else {
                AiState::Idle
            }
        }
        _ => requested,
    }
}

fn cover_wait<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    COVER_WAIT_TIME * (0.5 + 0.5 * rng.gen::<f32>())
}

impl Controller {
    /// Switch state, dropping the current path. Returns the state entered.
    pub fn enter(&mut self, requested: AiState) -> AiState {
        let next = resolve_state(&self.profile, requested);
        if next != self.state {
            debug!(
                tank = %self.tank,
                from = self.state.name(),
                to = next.name(),
                "state transition"
            );
            self.state = next;
            self.path.clear();
            self.path_goal = None;
        }
        next
    }

    fn is_healthy(&self, sit: &Situation) -> bool {
        sit.health_ratio > HEALTHY_RATIO
    }

    fn is_hurt(&self, sit: &Situation, ctx: &TickContext<'_>) -> bool {
        sit.health_ratio < ctx.tuning.health_retreat_threshold
    }

    fn fall_back_to_cover(&mut self) {
        self.cover = None;
        self.enter(AiState::SeekingCover);
    }

    fn start_chase<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.enter(AiState::Chasing) == AiState::Chasing {
            self.aggression_timer = 1.0 + rng.gen::<f32>();
        }
    }

    fn start_engage<R: Rng + ?Sized>(&mut self, rng: &mut R, base: f32) {
        if self.enter(AiState::Engaging) == AiState::Engaging {
            self.state_timer = base + 2.0 * rng.gen::<f32>();
        }
    }

    fn search_cover(&mut self, ctx: &TickContext<'_>, sit: &Situation) -> bool {
        let found = find_cover(
            ctx.view.map,
            sit.pos,
            sit.target,
            sit.radius,
            ctx.view.active_hazard(),
        );
        if let Some(pair) = found {
            debug!(
                tank = %self.tank,
                "found cover at ({:.1}, {:.1})",
                pair.cover.x,
                pair.cover.y
            );
            self.move_target = pair.cover;
        }
        self.cover = found;
        found.is_some()
    }

    /// Advance the state machine one tick and return the desired unit
    /// movement direction.
    pub(crate) fn step_state<R: Rng + ?Sized>(
        &mut self,
        ctx: &TickContext<'_>,
        sit: &Situation,
        rng: &mut R,
        dt: f32,
    ) -> Vec2 {
        // Dodging pre-empts every state.
        if self.has(BehaviorFlags::EVADE) && self.evade_timer <= 0.0 {
            if let Some(dir) = find_evasion(self.tank, sit.pos, ctx.view.projectiles) {
                self.enter(AiState::Evading);
                self.evade_dir = dir;
                self.evade_timer = EVADE_DURATION;
                self.wants_to_fire = false;
            }
        }

        match self.state {
            AiState::Idle => self.on_idle(ctx, sit, rng),
            AiState::SeekingCover => self.on_seeking_cover(ctx, sit, rng),
            AiState::InCover => self.on_in_cover(ctx, sit, rng, dt),
            AiState::Peeking => self.on_peeking(ctx, sit),
            AiState::Firing => self.on_firing(sit, dt),
            AiState::Retreating => self.on_retreating(ctx, sit, rng),
            AiState::Chasing => self.on_chasing(ctx, sit, rng),
            AiState::Flanking => self.on_flanking(ctx, sit, rng, dt),
            AiState::Engaging => self.on_engaging(ctx, sit, rng, dt),
            AiState::Evading => self.on_evading(ctx, sit, rng),
        }
    }

    fn on_idle<R: Rng + ?Sized>(
        &mut self,
        ctx: &TickContext<'_>,
        sit: &Situation,
        rng: &mut R,
    ) -> Vec2 {
        if self.has(BehaviorFlags::CHASE) {
            self.start_chase(rng);
            return Vec2::ZERO;
        }

        if self.has(BehaviorFlags::USE_COVER) && self.cover_search_timer <= 0.0 {
            if self.search_cover(ctx, sit) {
                self.enter(AiState::SeekingCover);
                self.wants_to_fire = false;
                return Vec2::ZERO;
            }
            self.cover_search_timer = COVER_SEARCH_COOLDOWN;
        }

        // Stationary or coverless: shoot whatever the turret has.
        self.wants_to_fire = self.has_shot();
        Vec2::ZERO
    }

    fn on_seeking_cover<R: Rng + ?Sized>(
        &mut self,
        ctx: &TickContext<'_>,
        sit: &Situation,
        rng: &mut R,
    ) -> Vec2 {
        if self.cover.is_none() && self.cover_search_timer <= 0.0 && !self.search_cover(ctx, sit) {
            self.cover_search_timer = COVER_SEARCH_COOLDOWN_FLEEING;
        }
        self.wants_to_fire = !self.has(BehaviorFlags::CHASE) && self.has_shot();

        let Some(pair) = self.cover else {
            // No cover: run straight away from the target.
            return (sit.pos - sit.target).normalize_or_zero();
        };

        if sit.pos.distance(pair.cover) < ARRIVE_THRESHOLD {
            self.enter(AiState::InCover);
            self.state_timer = cover_wait(rng);
            return Vec2::ZERO;
        }
        self.navigate(ctx.view.map, sit.pos, sit.radius, pair.cover)
    }

    fn on_in_cover<R: Rng + ?Sized>(
        &mut self,
        ctx: &TickContext<'_>,
        sit: &Situation,
        rng: &mut R,
        dt: f32,
    ) -> Vec2 {
        self.wants_to_fire = false;

        if self.can_see_target {
            // Cover is blown.
            self.cover = None;
            self.enter(AiState::Idle);
            self.state_timer = 0.0;
            return Vec2::ZERO;
        }

        self.state_timer -= dt;
        if self.state_timer > 0.0 {
            return Vec2::ZERO;
        }

        if self.has(BehaviorFlags::CHASE) && self.is_healthy(sit) {
            self.cover = None;
            self.enter(AiState::Chasing);
            self.aggression_timer = 1.0;
        } else if rng.gen::<f32>() < ctx.tuning.cover_abandon_chance {
            self.cover = None;
            self.enter(AiState::Idle);
            self.state_timer = 0.0;
        } else if let Some(pair) = self.cover {
            self.enter(AiState::Peeking);
            self.move_target = pair.peek;
            self.shots_fired = 0;
        } else {
            self.enter(AiState::Idle);
        }
        Vec2::ZERO
    }

    fn on_peeking(&mut self, ctx: &TickContext<'_>, sit: &Situation) -> Vec2 {
        self.wants_to_fire = self.can_see_target;

        let Some(pair) = self.cover else {
            self.enter(AiState::Idle);
            return Vec2::ZERO;
        };
        if sit.pos.distance(pair.peek) < ARRIVE_THRESHOLD {
            self.enter(AiState::Firing);
            self.state_timer = FIRING_TIME;
            return Vec2::ZERO;
        }
        self.navigate(ctx.view.map, sit.pos, sit.radius, pair.peek)
    }

    fn on_firing(&mut self, sit: &Situation, dt: f32) -> Vec2 {
        self.state_timer -= dt;
        self.wants_to_fire = self.has_shot();

        if self.state_timer <= 0.0 || self.shots_fired >= self.profile.max_shots_per_peek {
            if self.has(BehaviorFlags::CHASE) && self.is_healthy(sit) {
                self.cover = None;
                self.enter(AiState::Chasing);
            } else {
                debug!(
                    tank = %self.tank,
                    shots = self.shots_fired,
                    "retreating to cover"
                );
                self.enter(AiState::Retreating);
                if let Some(pair) = self.cover {
                    self.move_target = pair.cover;
                }
            }
        }
        Vec2::ZERO
    }

    fn on_retreating<R: Rng + ?Sized>(
        &mut self,
        ctx: &TickContext<'_>,
        sit: &Situation,
        rng: &mut R,
    ) -> Vec2 {
        self.wants_to_fire = !self.has(BehaviorFlags::CHASE) && self.has_shot();

        let Some(pair) = self.cover else {
            self.enter(AiState::Idle);
            return Vec2::ZERO;
        };
        if sit.pos.distance(pair.cover) >= ARRIVE_THRESHOLD {
            return self.navigate(ctx.view.map, sit.pos, sit.radius, pair.cover);
        }

        if rng.gen::<f32>() < ctx.tuning.retreat_reroll_chance {
            debug!(tank = %self.tank, "looking for new cover");
            self.cover = None;
            self.enter(AiState::Idle);
        } else {
            self.enter(AiState::InCover);
            self.state_timer = cover_wait(rng);
        }
        Vec2::ZERO
    }

    fn on_chasing<R: Rng + ?Sized>(
        &mut self,
        ctx: &TickContext<'_>,
        sit: &Situation,
        rng: &mut R,
    ) -> Vec2 {
        self.wants_to_fire = self.can_see_target;

        if self.is_hurt(sit, ctx) {
            self.fall_back_to_cover();
            return Vec2::ZERO;
        }

        let move_dir = if sit.dist_to_target > 0.1 {
            self.navigate(ctx.view.map, sit.pos, sit.radius, sit.target)
        } else {
            Vec2::ZERO
        };

        if self.has(BehaviorFlags::STRAFE)
            && sit.dist_to_target < ENGAGE_DISTANCE
            && self.can_see_target
        {
            self.start_engage(rng, 4.0);
            return move_dir;
        }

        if self.has(BehaviorFlags::FLANK)
            && self.aggression_timer <= 0.0
            && sit.dist_to_target < CHASE_DISTANCE
        {
            match find_flank(ctx.view.map, sit.pos, sit.target, sit.radius) {
                Some(flank) => {
                    self.flank_target = flank;
                    self.enter(AiState::Flanking);
                    self.state_timer = FLANK_TIMEOUT;
                    self.aggression_timer = 2.0;
                }
                None => self.aggression_timer = 1.0,
            }
        }
        move_dir
    }

    fn on_flanking<R: Rng + ?Sized>(
        &mut self,
        ctx: &TickContext<'_>,
        sit: &Situation,
        rng: &mut R,
        dt: f32,
    ) -> Vec2 {
        self.wants_to_fire = self.can_see_target;

        if self.is_hurt(sit, ctx) {
            self.fall_back_to_cover();
            return Vec2::ZERO;
        }

        self.state_timer -= dt;
        if sit.pos.distance(self.flank_target) < ARRIVE_THRESHOLD {
            if self.has(BehaviorFlags::STRAFE) {
                self.start_engage(rng, 2.0);
            } else {
                self.start_chase(rng);
            }
            return Vec2::ZERO;
        }
        if self.state_timer <= 0.0 {
            self.start_chase(rng);
            return Vec2::ZERO;
        }
        self.navigate(ctx.view.map, sit.pos, sit.radius, self.flank_target)
    }

    fn on_engaging<R: Rng + ?Sized>(
        &mut self,
        ctx: &TickContext<'_>,
        sit: &Situation,
        rng: &mut R,
        dt: f32,
    ) -> Vec2 {
        self.state_timer -= dt;
        self.wants_to_fire = self.can_see_target;

        let mut move_dir = Vec2::ZERO;
        if sit.dist_to_target > 0.1 {
            let dir = (sit.target - sit.pos) / sit.dist_to_target;
            // Strafe sideways, switching sides every half second.
            let mut strafe = Vec2::new(-dir.y, dir.x);
            if (self.state_timer * 2.0) as i32 % 2 == 0 {
                strafe = -strafe;
            }
            move_dir = if sit.dist_to_target > ENGAGE_DISTANCE * ENGAGE_CLOSE_IN_FRACTION {
                strafe + dir * 0.5
            } else if sit.dist_to_target < TOO_CLOSE_DISTANCE {
                strafe - dir * 0.8
            } else {
                strafe
            };
            move_dir = move_dir.normalize_or_zero();
        }

        if self.is_hurt(sit, ctx) {
            self.fall_back_to_cover();
            return move_dir;
        }
        if !self.can_see_target {
            self.start_chase(rng);
            return move_dir;
        }
        if self.state_timer <= 0.0 {
            if rng.gen::<f32>() < ctx.tuning.engage_break_chance {
                self.enter(AiState::Chasing);
                self.aggression_timer = 1.5;
            } else {
                self.state_timer = 2.0 + 2.0 * rng.gen::<f32>();
            }
        }
        move_dir
    }

    fn on_evading<R: Rng + ?Sized>(
        &mut self,
        ctx: &TickContext<'_>,
        sit: &Situation,
        rng: &mut R,
    ) -> Vec2 {
        self.wants_to_fire = false;
        if self.evade_timer > 0.0 {
            return self.evade_dir;
        }

        if self.is_hurt(sit, ctx) {
            self.fall_back_to_cover();
        } else if self.has(BehaviorFlags::STRAFE) && sit.dist_to_target < ENGAGE_DISTANCE {
            self.start_engage(rng, 2.0);
        } else {
            self.start_chase(rng);
        }
        Vec2::ZERO
    }
}
