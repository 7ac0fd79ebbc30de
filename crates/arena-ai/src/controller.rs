//! Per-opponent controller: one flat record of decision state plus the
//! per-tick driver that turns it into a movement and aim intent.

use arena_core::constants::*;
use arena_core::enums::{AiState, Archetype};
use arena_core::types::{dir_to_angle, rotate_towards, TankId, TankIntent, TankSnapshot};
use arena_nav::{find_smoothed_path, Path, TileGrid};
use glam::Vec2;
use rand::Rng;
use tracing::debug;

use crate::profiles::{get_profile, ArchetypeProfile, BehaviorFlags};
use crate::steering::{
    apply_mine_avoidance, blend_separation, blocked_ahead, detour_target, escape_target,
    hazard_urgency, mine_avoidance, separation, should_yield,
};
use crate::tactics::{
    find_bounce_shot, find_defense_target, find_mine_target, line_of_sight, BounceSearch,
    CoverPair,
};
use crate::tuning::BehaviorTuning;
use crate::world::WorldView;

/// What the turret is currently tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AimMode {
    /// Nothing worth shooting at.
    #[default]
    None,
    /// Straight at a visible target.
    Direct,
    /// Along a solved bounce shot.
    Bounce,
    /// At the intercept point of an incoming projectile.
    Defense,
    /// At a mine near the target.
    Mine,
}

/// Flight from the closing hazard cloud.
#[derive(Debug, Clone, Default)]
pub struct HazardEscape {
    pub active: bool,
    pub target: Vec2,
    pub path: Path,
    pub urgency: f32,
    pub check_timer: f32,
}

/// Sidestep around a tank that blocks the way.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detour {
    pub active: bool,
    pub target: Vec2,
    pub timer: f32,
    /// Time spent stalled behind a blocker.
    pub blocked_timer: f32,
    pub last_pos: Option<Vec2>,
    /// Tank that blocked this one on the last tick.
    pub blocked_by: Option<TankId>,
}

/// Cached bounce-shot solution.
#[derive(Debug, Clone, Copy, Default)]
pub struct BounceCache {
    pub angle: Option<f32>,
    /// Time left before a cached angle is dropped.
    pub recheck_timer: f32,
    /// Time left before a new search may run.
    pub search_timer: f32,
}

/// Read-only inputs shared by every controller during one tick.
pub struct TickContext<'a> {
    pub view: WorldView<'a>,
    pub tuning: &'a BehaviorTuning,
    /// Index of this controller among all registered controllers.
    pub ordinal: usize,
    pub total: usize,
    /// `(tank, blocker)` pairs as of the previous tick.
    pub prior_blocks: &'a [(TankId, TankId)],
}

/// Per-tick facts about the controlled tank and its target.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Situation {
    pub pos: Vec2,
    pub radius: f32,
    pub health_ratio: f32,
    pub target: Vec2,
    pub dist_to_target: f32,
}

/// Decision state for one computer-controlled tank.
#[derive(Debug, Clone)]
pub struct Controller {
    pub tank: TankId,
    pub archetype: Archetype,
    pub profile: ArchetypeProfile,
    pub state: AiState,

    pub current_aim: f32,
    pub target_aim: f32,
    pub aim_mode: AimMode,
    pub fire_timer: f32,
    pub can_see_target: bool,
    pub wants_to_fire: bool,

    pub cover: Option<CoverPair>,
    pub move_target: Vec2,
    pub flank_target: Vec2,
    pub evade_dir: Vec2,

    pub state_timer: f32,
    pub cover_search_timer: f32,
    pub evade_timer: f32,
    pub aggression_timer: f32,
    pub shots_fired: u32,

    pub path: Path,
    pub path_goal: Option<Vec2>,
    pub path_update_timer: f32,

    pub escape: HazardEscape,
    pub detour: Detour,
    pub bounce: BounceCache,

    /// 1.0 for confirmed shots, lower for unconfirmed bounce shots.
    pub fire_confidence: f32,
    pub hesitation_timer: f32,
    pub had_target: bool,
    pub defense_angle: Option<f32>,
    pub defense_timer: f32,
    pub mine_target: Option<Vec2>,
    pub mine_timer: f32,
}

impl Controller {
    pub fn new(tank: TankId, archetype: Archetype, pos: Vec2, angle: f32) -> Self {
        Self {
            tank,
            archetype,
            profile: get_profile(archetype),
            state: AiState::Idle,
            current_aim: angle,
            target_aim: angle,
            aim_mode: AimMode::None,
            fire_timer: 0.0,
            can_see_target: false,
            wants_to_fire: false,
            cover: None,
            move_target: pos,
            flank_target: pos,
            evade_dir: Vec2::ZERO,
            state_timer: 0.0,
            cover_search_timer: 0.0,
            evade_timer: 0.0,
            aggression_timer: 0.0,
            shots_fired: 0,
            path: Path::default(),
            path_goal: None,
            path_update_timer: 0.0,
            escape: HazardEscape::default(),
            detour: Detour::default(),
            bounce: BounceCache::default(),
            fire_confidence: 0.0,
            hesitation_timer: 0.0,
            had_target: false,
            defense_angle: None,
            defense_timer: 0.0,
            mine_target: None,
            mine_timer: 0.0,
        }
    }

    /// Fresh state for a respawned tank. Identity and archetype are kept.
    pub fn reset(&mut self, pos: Vec2, angle: f32) {
        *self = Self::new(self.tank, self.archetype, pos, angle);
    }

    pub fn has(&self, flag: BehaviorFlags) -> bool {
        self.profile.has(flag)
    }

    /// True when the turret tracks something a normal shot can hit.
    pub fn has_shot(&self) -> bool {
        matches!(self.aim_mode, AimMode::Direct | AimMode::Bounce)
    }

    /// Run one tick. `None` if the tank is gone or dead.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        ctx: &TickContext<'_>,
        rng: &mut R,
        dt: f32,
    ) -> Option<TankIntent> {
        let me = *ctx.view.tank(self.tank).filter(|t| t.alive)?;
        self.tick_timers(dt);

        let target = ctx.view.nearest_player(me.pos).map(|t| t.pos);
        self.can_see_target = target.is_some_and(|t| line_of_sight(ctx.view.map, me.pos, t));

        self.update_aim(&ctx.view, ctx.tuning, &me, target, rng, dt);

        let has_target = self.aim_mode != AimMode::None;
        if has_target && !self.had_target {
            self.hesitation_timer = ctx.tuning.hesitation_delay;
        }
        self.had_target = has_target;

        let escape = self.update_hazard_escape(ctx, &me);

        let desired = match target {
            Some(target) => {
                let sit = Situation {
                    pos: me.pos,
                    radius: me.radius,
                    health_ratio: me.health_ratio(),
                    target,
                    dist_to_target: me.pos.distance(target),
                };
                self.step_state(ctx, &sit, rng, dt)
            }
            None => {
                self.wants_to_fire = false;
                Vec2::ZERO
            }
        };

        let move_dir = self.steer(ctx, &me, escape.unwrap_or(desired), rng, dt);
        Some(TankIntent {
            tank: self.tank,
            move_dir,
            target_turret: self.current_aim,
        })
    }

    fn tick_timers(&mut self, dt: f32) {
        for timer in [
            &mut self.fire_timer,
            &mut self.hesitation_timer,
            &mut self.cover_search_timer,
            &mut self.evade_timer,
            &mut self.aggression_timer,
            &mut self.path_update_timer,
            &mut self.bounce.recheck_timer,
            &mut self.bounce.search_timer,
            &mut self.defense_timer,
            &mut self.mine_timer,
            &mut self.escape.check_timer,
        ] {
            if *timer > 0.0 {
                *timer -= dt;
            }
        }
    }

    /// Pick the aim mode and rotate the turret toward it at the archetype's
    /// turn rate. Priority: direct, bounce shot, projectile defense, mine.
    fn update_aim<R: Rng + ?Sized>(
        &mut self,
        view: &WorldView<'_>,
        tuning: &BehaviorTuning,
        me: &TankSnapshot,
        target: Option<Vec2>,
        rng: &mut R,
        dt: f32,
    ) {
        let require_bounce = self.has(BehaviorFlags::REQUIRE_BOUNCE_SHOT);

        if self.has(BehaviorFlags::BOUNCE_SHOTS) {
            self.refresh_bounce_shot(view.map, me, target);
        }

        if self.has(BehaviorFlags::DEFEND_PROJECTILES) && self.defense_timer <= 0.0 {
            self.defense_timer = DEFENSE_CHECK_INTERVAL;
            self.defense_angle = if rng.gen::<f32>() < self.profile.projectile_defense_chance {
                find_defense_target(
                    self.tank,
                    me.pos,
                    view.projectiles,
                    self.profile.projectile_speed(),
                )
                .map(|d| d.angle)
            } else {
                None
            };
        }

        if self.has(BehaviorFlags::TARGET_MINES) && self.mine_timer <= 0.0 {
            self.mine_timer = MINE_CHECK_INTERVAL;
            self.mine_target = find_mine_target(view.map, me.pos, target, view.mines);
        }

        let direct = target.map(|t| dir_to_angle(t - me.pos));
        let (mode, confidence) = match (direct, self.bounce.angle) {
            (Some(angle), _) if self.can_see_target => {
                self.target_aim = angle;
                (AimMode::Direct, 1.0)
            }
            (_, Some(angle)) => {
                self.target_aim = angle;
                (AimMode::Bounce, tuning.bounce_shot_confidence.clamp(0.0, 1.0))
            }
            _ => match (self.defense_angle, self.mine_target) {
                (Some(angle), _) if !require_bounce => {
                    self.target_aim = angle;
                    (AimMode::Defense, 1.0)
                }
                (_, Some(mine)) if !require_bounce => {
                    self.target_aim = dir_to_angle(mine - me.pos);
                    (AimMode::Mine, 1.0)
                }
                _ => {
                    // Pre-aim so the turret is ready when the target shows up.
                    if let (Some(angle), false) = (direct, require_bounce) {
                        self.target_aim = angle;
                    }
                    (AimMode::None, 0.0)
                }
            },
        };
        self.aim_mode = mode;
        self.fire_confidence = confidence;

        self.current_aim = rotate_towards(
            self.current_aim,
            self.target_aim,
            self.profile.turret_turn_rate() * dt,
        );
    }

    fn refresh_bounce_shot(&mut self, map: &TileGrid, me: &TankSnapshot, target: Option<Vec2>) {
        let Some(target) = target else {
            self.bounce.angle = None;
            return;
        };
        if self.can_see_target {
            self.bounce.angle = None;
            return;
        }
        if self.bounce.angle.is_some() && self.bounce.recheck_timer <= 0.0 {
            self.bounce.angle = None;
        }
        if self.bounce.angle.is_some() || self.bounce.search_timer > 0.0 {
            return;
        }

        let range = if self.profile.bounce_shot_range > 0.0 {
            self.profile.bounce_shot_range
        } else {
            DEFAULT_BOUNCE_SHOT_RANGE
        };
        let search = BounceSearch {
            range,
            samples: self.profile.bounce_shot_samples,
            max_bounces: self.profile.max_bounces,
            shooter_radius: me.radius,
            target_radius: TANK_RADIUS,
        };
        match find_bounce_shot(map, me.pos, target, &search) {
            Some(shot) => {
                debug!(
                    tank = %self.tank,
                    angle = shot.angle.to_degrees(),
                    bounces = shot.bounces,
                    "found bounce shot"
                );
                self.bounce.angle = Some(shot.angle);
                self.bounce.recheck_timer = BOUNCE_SHOT_RECHECK;
            }
            None => self.bounce.search_timer = BOUNCE_SEARCH_RETRY,
        }
    }

    /// Re-evaluate the hazard threat and return the escape direction while
    /// fleeing.
    fn update_hazard_escape(&mut self, ctx: &TickContext<'_>, me: &TankSnapshot) -> Option<Vec2> {
        let hazard = match ctx.view.active_hazard() {
            Some(h) if self.has(BehaviorFlags::HAZARD_ESCAPE | BehaviorFlags::MOVE) => h,
            _ => {
                if self.escape.active {
                    self.stop_escape();
                }
                return None;
            }
        };
        let map = ctx.view.map;

        if self.escape.check_timer <= 0.0 {
            self.escape.check_timer = HAZARD_CHECK_INTERVAL;
            self.escape.urgency = hazard_urgency(hazard, me.pos);

            if self.escape.urgency > HAZARD_ESCAPE_THRESHOLD {
                let stale = !self.escape.active || hazard.will_be_inside(self.escape.target, 1.0);
                if stale {
                    let target =
                        escape_target(hazard, map, me.pos, ctx.ordinal, ctx.total, me.radius);
                    self.escape.target = target;
                    self.escape.path =
                        find_smoothed_path(map, me.pos, target, me.radius).unwrap_or_default();
                    if !self.escape.active {
                        debug!(
                            tank = %self.tank,
                            urgency = self.escape.urgency,
                            "escaping hazard toward ({:.1}, {:.1})",
                            target.x,
                            target.y
                        );
                    }
                    self.escape.active = true;
                }
            } else if self.escape.active {
                self.stop_escape();
            }
        }

        if !self.escape.active {
            return None;
        }
        if me.pos.distance(self.escape.target) < HAZARD_ESCAPE_ARRIVE {
            self.stop_escape();
            return None;
        }
        Some(follow_path(&mut self.escape.path, me.pos, self.escape.target))
    }

    fn stop_escape(&mut self) {
        debug!(tank = %self.tank, "hazard escape finished");
        self.escape.active = false;
        self.escape.path.clear();
    }

    /// Path toward `goal`, re-planning on a timer, when the goal drifts, or
    /// when the current path goes stale. Drives straight when no path exists.
    pub(crate) fn navigate(&mut self, map: &TileGrid, pos: Vec2, radius: f32, goal: Vec2) -> Vec2 {
        if !self.has(BehaviorFlags::PATHFIND) {
            return direct_to(pos, goal);
        }

        let drifted = self
            .path_goal
            .map_or(true, |g| g.distance(goal) > REPATH_GOAL_DRIFT);
        let stale = self.path.is_valid() && !self.path.is_still_valid(map, radius);
        if drifted || stale || self.path_update_timer <= 0.0 {
            self.path = find_smoothed_path(map, pos, goal, radius).unwrap_or_default();
            self.path_goal = Some(goal);
            self.path_update_timer = PATH_UPDATE_INTERVAL;
        }

        follow_path(&mut self.path, pos, goal)
    }

    /// Turn a desired direction into the final movement vector: detour,
    /// mine avoidance, separation, then speed. Standing next to an armed mine
    /// skips all of that and flees straight away from it.
    pub fn steer<R: Rng + ?Sized>(
        &mut self,
        ctx: &TickContext<'_>,
        me: &TankSnapshot,
        desired: Vec2,
        rng: &mut R,
        dt: f32,
    ) -> Vec2 {
        if !self.has(BehaviorFlags::MOVE) {
            return Vec2::ZERO;
        }

        let mines = mine_avoidance(me.pos, ctx.view.mines);
        if let Some(flee) = mines.panic {
            return flee * self.profile.move_speed;
        }

        let desired = self.update_detour(ctx, me, desired, rng, dt);
        let desired = apply_mine_avoidance(desired, &mines);
        let desired = blend_separation(desired, &separation(self.tank, me.pos, ctx.view.tanks));
        desired * self.profile.move_speed
    }

    fn update_detour<R: Rng + ?Sized>(
        &mut self,
        ctx: &TickContext<'_>,
        me: &TankSnapshot,
        desired: Vec2,
        rng: &mut R,
        dt: f32,
    ) -> Vec2 {
        let pos = me.pos;
        let moved = self.detour.last_pos.map_or(f32::MAX, |p| p.distance(pos));
        self.detour.last_pos = Some(pos);

        if self.detour.active {
            self.detour.timer -= dt;
            if self.detour.timer > 0.0 && pos.distance(self.detour.target) >= ARRIVE_THRESHOLD {
                return direct_to(pos, self.detour.target);
            }
            self.detour.active = false;
        }

        let blocker = blocked_ahead(self.tank, pos, desired, ctx.view.tanks);
        self.detour.blocked_by = blocker;
        let Some(blocker) = blocker else {
            self.detour.blocked_timer = 0.0;
            return desired;
        };

        let stalled = dt > 0.0 && moved / dt < DETOUR_STALL_SPEED;
        if stalled {
            self.detour.blocked_timer += dt;
        } else {
            self.detour.blocked_timer = 0.0;
        }
        if self.detour.blocked_timer < DETOUR_STALL_TIME {
            return desired;
        }

        let mutual = ctx
            .prior_blocks
            .iter()
            .any(|&(tank, by)| tank == blocker && by == self.tank);
        if !should_yield(self.tank, blocker, mutual) {
            return desired;
        }

        match detour_target(ctx.view.map, pos, desired, me.radius, rng) {
            Some(target) => {
                debug!(
                    tank = %self.tank,
                    blocker = %blocker,
                    "detour to ({:.1}, {:.1})",
                    target.x,
                    target.y
                );
                self.detour.active = true;
                self.detour.target = target;
                self.detour.timer = DETOUR_DURATION;
                self.detour.blocked_timer = 0.0;
                direct_to(pos, target)
            }
            None => desired,
        }
    }
}

/// Unit direction toward `goal`, zero once on top of it.
pub(crate) fn direct_to(pos: Vec2, goal: Vec2) -> Vec2 {
    let to = goal - pos;
    if to.length() > 0.1 {
        to.normalize()
    } else {
        Vec2::ZERO
    }
}

/// Steer along `path`, skipping waypoints already reached. Falls back to a
/// straight line when the path is missing or used up.
fn follow_path(path: &mut Path, pos: Vec2, goal: Vec2) -> Vec2 {
    while path.advance(pos, WAYPOINT_ARRIVE_THRESHOLD) {}
    match path.target() {
        Some(waypoint) if !path.is_complete() => direct_to(pos, waypoint),
        _ => direct_to(pos, goal),
    }
}
