//! Simulation constants and tuning parameters.
//!
//! Distances are world units (one tile is `TILE_SIZE` units), times are seconds,
//! angles are radians.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Map ---

/// Default edge length of one map tile.
pub const TILE_SIZE: f32 = 2.0;

// --- Tanks ---

/// Collision radius of every tank.
pub const TANK_RADIUS: f32 = 0.9;

/// Distance from tank center to the barrel tip.
pub const BARREL_LENGTH: f32 = 1.65;

/// Allowed overlap before the barrel counts as blocked by a wall.
pub const BARREL_CLEAR_EPSILON: f32 = 0.02;

/// Push applied to a shot deflected off a wall at the barrel tip.
pub const BARREL_DEFLECT_EPSILON: f32 = 0.01;

// --- Capacities ---

/// Maximum number of concurrently registered AI controllers.
pub const MAX_AI_CONTROLLERS: usize = 16;

/// Maximum number of waypoints in a path.
pub const PATH_MAX_LENGTH: usize = 128;

/// Maximum A* node expansions per search.
pub const PATHFIND_MAX_ITERATIONS: usize = 2000;

/// Ring radius (tiles) searched for a walkable replacement goal.
pub const GOAL_RELOCATE_RADIUS: i32 = 3;

// --- Walkability ---

/// Fraction of the agent radius sampled around a tile center.
pub const WALKABLE_RADIUS_FACTOR: f32 = 0.8;

/// Radii below this only test the tile center.
pub const WALKABLE_MIN_RADIUS: f32 = 0.1;

/// Smallest sampling step for radius-aware segment checks.
pub const CLEARANCE_MIN_STEP: f32 = 0.2;

// --- Path following ---

/// Distance at which a waypoint counts as reached.
pub const WAYPOINT_ARRIVE_THRESHOLD: f32 = 0.8;

/// Distance at which a state's move target counts as reached.
pub const ARRIVE_THRESHOLD: f32 = 0.5;

/// Seconds between periodic re-plans.
pub const PATH_UPDATE_INTERVAL: f32 = 0.5;

/// Goal drift that forces a re-plan.
pub const REPATH_GOAL_DRIFT: f32 = 2.0;

// --- Aiming ---

/// Base turret turn rate, scaled by the archetype's aim speed.
pub const BASE_TURRET_TURN_RATE: f32 = 5.0;

// --- Cover ---

/// Half-width of the square sampled for cover candidates.
pub const COVER_SEARCH_RANGE: f32 = 10.0;

/// Grid step of the cover candidate sampling.
pub const COVER_SEARCH_STEP: f32 = 1.0;

/// Nearest peek offset tried from a cover point.
pub const PEEK_STEP_MIN: f32 = 1.0;

/// Farthest peek offset tried from a cover point.
pub const PEEK_STEP_MAX: f32 = 4.0;

/// Increment between peek offsets.
pub const PEEK_STEP_INCREMENT: f32 = 0.5;

/// Base wait in cover before peeking (randomized to 50-100%).
pub const COVER_WAIT_TIME: f32 = 1.5;

/// Maximum time spent exposed in the firing state.
pub const FIRING_TIME: f32 = 2.0;

/// Cooldown after a failed cover search.
pub const COVER_SEARCH_COOLDOWN: f32 = 3.0;

/// Cooldown after a failed cover search while fleeing.
pub const COVER_SEARCH_COOLDOWN_FLEEING: f32 = 1.0;

// --- Aggressive behavior ---

/// Distance under which a strafing archetype engages.
pub const ENGAGE_DISTANCE: f32 = 12.0;

/// Distance under which flanking is considered.
pub const CHASE_DISTANCE: f32 = 20.0;

/// Engaging agents back off below this distance.
pub const TOO_CLOSE_DISTANCE: f32 = 3.0;

/// Engaging agents close in above this fraction of `ENGAGE_DISTANCE`.
pub const ENGAGE_CLOSE_IN_FRACTION: f32 = 0.7;

/// Lateral offset of a flank point from the target.
pub const FLANK_DISTANCE: f32 = 8.0;

/// Offset of a flank point behind the target, away from the agent.
pub const FLANK_APPROACH_DISTANCE: f32 = 6.0;

/// Health ratio above which an aggressive archetype goes back on the attack.
pub const HEALTHY_RATIO: f32 = 0.5;

/// Flanking is abandoned for a chase after this long without arriving.
pub const FLANK_TIMEOUT: f32 = 4.0;

/// Duration of a single evasive dodge.
pub const EVADE_DURATION: f32 = 0.3;

// --- Incoming projectiles ---

/// Closest-approach distance that triggers evasion.
pub const EVADE_THREAT_RADIUS: f32 = 3.0;

/// Time horizon for evasion threats.
pub const EVADE_LOOKAHEAD: f32 = 0.8;

/// Closest-approach distance that makes a projectile worth shooting down.
pub const DEFENSE_THREAT_RADIUS: f32 = 2.5;

/// Time horizon for projectile defense.
pub const DEFENSE_LOOKAHEAD: f32 = 1.5;

/// Seconds between projectile-defense evaluations.
pub const DEFENSE_CHECK_INTERVAL: f32 = 0.25;

// --- Bounce shots ---

/// Offset from a wall used when reflecting a simulated shot.
pub const BOUNCE_WALL_OFFSET: f32 = 0.05;

/// Length of the first segment on which the shooter's own hull is ignored.
pub const BOUNCE_SELF_IGNORE_DISTANCE: f32 = 1.2;

/// Range used when an archetype does not define one.
pub const DEFAULT_BOUNCE_SHOT_RANGE: f32 = 30.0;

/// Retry delay after a failed bounce-shot search.
pub const BOUNCE_SEARCH_RETRY: f32 = 0.5;

/// Delay before searching again after firing a bounce shot.
pub const BOUNCE_SEARCH_AFTER_FIRE: f32 = 0.3;

/// Lifetime of a cached bounce-shot angle.
pub const BOUNCE_SHOT_RECHECK: f32 = 1.0;

// --- Mines ---

/// Time from placement until a mine is armed.
pub const MINE_ARM_TIME: f32 = 0.5;

/// Proximity trigger radius of an armed mine.
pub const MINE_TRIGGER_RADIUS: f32 = 0.8;

/// Blast radius of a mine explosion.
pub const MINE_DAMAGE_RADIUS: f32 = 2.0;

/// Radius inside which mines repel movement.
pub const MINE_AVOID_RADIUS: f32 = 4.0;

/// Radius around an armed mine inside which an agent flees directly.
pub const MINE_PANIC_RADIUS: f32 = MINE_TRIGGER_RADIUS + TANK_RADIUS + 0.5;

/// Maximum distance at which a mine is considered as a target.
pub const MINE_TARGET_RANGE: f32 = 12.0;

/// Distance under which a mine counts as threatening the agent.
pub const MINE_THREAT_RADIUS: f32 = 5.0;

/// Minimum distance at which shooting a mine does not hurt the shooter.
pub const MINE_SAFE_SHOOT_DISTANCE: f32 = MINE_DAMAGE_RADIUS + TANK_RADIUS + 0.5;

/// Seconds between mine-target evaluations.
pub const MINE_CHECK_INTERVAL: f32 = 0.3;

// --- Separation ---

/// Radius inside which other agents push each other apart.
pub const SEPARATION_RADIUS: f32 = 3.0;

/// Strength of the separation vector when blended at full urgency.
pub const SEPARATION_WEIGHT: f32 = 1.5;

// --- Hazard cloud ---

/// Seconds between hazard threat re-evaluations.
pub const HAZARD_CHECK_INTERVAL: f32 = 0.5;

/// Urgency above which an agent starts escaping.
pub const HAZARD_ESCAPE_THRESHOLD: f32 = 0.3;

/// Urgency at or above which escaping agents stop firing.
pub const HAZARD_CRITICAL_URGENCY: f32 = 1.0;

/// Distance from the current boundary at which proximity urgency starts.
pub const HAZARD_PROXIMITY_RANGE: f32 = 6.0;

/// Depth inside the hazard at which urgency saturates.
pub const HAZARD_DEPTH_SCALE: f32 = 4.0;

/// Margin kept from the final safe-zone edge.
pub const HAZARD_SAFE_MARGIN: f32 = 2.0;

/// Fraction of the final safe-zone half extents used to spread escape targets.
pub const HAZARD_SPREAD_FACTOR: f32 = 0.5;

/// Rings (in tiles) searched around an unusable escape candidate.
pub const HAZARD_LOCAL_SEARCH_RINGS: i32 = 4;

/// Distance at which an escape target counts as reached.
pub const HAZARD_ESCAPE_ARRIVE: f32 = 1.0;

// --- Detours ---

/// Distance ahead in which another tank counts as blocking.
pub const DETOUR_BLOCK_DISTANCE: f32 = 2.6;

/// Time spent blocked before picking a detour.
pub const DETOUR_STALL_TIME: f32 = 0.6;

/// Movement per second below which an agent counts as stalled.
pub const DETOUR_STALL_SPEED: f32 = 0.5;

/// Duration of a detour.
pub const DETOUR_DURATION: f32 = 1.0;

/// Offset of a detour target from the agent.
pub const DETOUR_OFFSET: f32 = 2.5;

// --- Balancing defaults ---

/// Chance to abandon cover instead of peeking.
pub const COVER_ABANDON_CHANCE: f32 = 0.25;

/// Chance to drop cover after retreating back to it.
pub const RETREAT_REROLL_CHANCE: f32 = 0.50;

/// Chance to break off an engagement when its timer runs out.
pub const ENGAGE_BREAK_CHANCE: f32 = 0.40;

/// Health ratio below which agents fall back to cover.
pub const HEALTH_RETREAT_THRESHOLD: f32 = 0.2;

/// Delay between acquiring a target and the first shot.
pub const HESITATION_DELAY: f32 = 0.25;

/// Targeting confidence of a solved but unconfirmed bounce shot.
pub const BOUNCE_SHOT_CONFIDENCE: f32 = 0.6;

/// Friendly-fire lane length for weapons that do not bounce.
pub const FRIENDLY_FIRE_RANGE_DIRECT: f32 = 14.0;

/// Friendly-fire lane length for bouncing weapons.
pub const FRIENDLY_FIRE_RANGE_BOUNCE: f32 = 24.0;

// --- Harness ---

/// Health of a player tank.
pub const PLAYER_HEALTH: i32 = 10;

/// Default number of tank bodies the harness can hold.
pub const MAX_TANKS: usize = 32;

/// Collision radius of a projectile.
pub const PROJECTILE_RADIUS: f32 = 0.2;

/// Seconds before an unspent projectile fizzles.
pub const PROJECTILE_LIFETIME: f32 = 8.0;

/// Damage dealt by a mine explosion.
pub const MINE_DAMAGE: i32 = 10;

/// Seconds before the hazard cloud starts closing.
pub const CLOUD_DELAY: f32 = 10.0;

/// Seconds the cloud takes to close to its final size.
pub const CLOUD_DURATION: f32 = 90.0;

/// Final safe zone size as a fraction of the map size.
pub const CLOUD_SAFE_ZONE_RATIO: f32 = 0.2;

/// Damage per cloud damage tick.
pub const CLOUD_DAMAGE: i32 = 1;

/// Seconds between cloud damage ticks.
pub const CLOUD_DAMAGE_INTERVAL: f32 = 5.0;

/// Speed multiplier for tanks inside the cloud.
pub const CLOUD_SLOWDOWN: f32 = 0.7;
