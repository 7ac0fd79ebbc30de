//! Per-tick steering vectors blended into a controller's desired movement.

use std::f32::consts::TAU;

use arena_core::constants::*;
use arena_core::types::{MineSnapshot, TankId, TankSnapshot};
use arena_nav::{is_position_clear, segment_has_clearance, TileGrid};
use glam::Vec2;
use rand::Rng;

use crate::world::HazardField;

/// Push away from nearby agents.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Separation {
    /// Unit away-vector, zero when nobody is close.
    pub dir: Vec2,
    /// 0 when the closest agent is at the separation radius, 1 when touching.
    pub urgency: f32,
}

/// Quadratically weighted away-vector from living computer-controlled tanks
/// within the separation radius.
pub fn separation(self_id: TankId, pos: Vec2, tanks: &[TankSnapshot]) -> Separation {
    let mut accum = Vec2::ZERO;
    let mut urgency: f32 = 0.0;

    for other in tanks
        .iter()
        .filter(|t| t.alive && !t.is_player && t.id != self_id)
    {
        let away = pos - other.pos;
        let dist = away.length();
        if dist >= SEPARATION_RADIUS {
            continue;
        }
        let closeness = 1.0 - dist / SEPARATION_RADIUS;
        urgency = urgency.max(closeness);
        if dist > 1e-4 {
            accum += away / dist * closeness * closeness;
        }
    }

    Separation {
        dir: accum.normalize_or_zero(),
        urgency,
    }
}

/// Blend separation into a desired direction. The result never exceeds
/// unit length.
pub fn blend_separation(desired: Vec2, sep: &Separation) -> Vec2 {
    if sep.urgency <= 0.0 || sep.dir == Vec2::ZERO {
        return desired;
    }
    (desired + sep.dir * SEPARATION_WEIGHT * sep.urgency).clamp_length_max(1.0)
}

/// Repulsion from mines.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MineAvoidance {
    pub dir: Vec2,
    pub strength: f32,
    /// Direct flight direction when standing next to an armed mine.
    pub panic: Option<Vec2>,
}

pub fn mine_avoidance(pos: Vec2, mines: &[MineSnapshot]) -> MineAvoidance {
    let mut accum = Vec2::ZERO;
    let mut strength: f32 = 0.0;
    let mut panic: Option<(f32, Vec2)> = None;

    for mine in mines {
        let away = pos - mine.pos;
        let dist = away.length();
        if dist >= MINE_AVOID_RADIUS {
            continue;
        }
        let away_dir = if dist > 1e-4 { away / dist } else { Vec2::Y };
        let closeness = 1.0 - dist / MINE_AVOID_RADIUS;
        strength = strength.max(closeness);
        accum += away_dir * closeness * closeness;

        if mine.is_armed()
            && dist < MINE_PANIC_RADIUS
            && panic.map_or(true, |(d, _)| dist < d)
        {
            panic = Some((dist, away_dir));
        }
    }

    MineAvoidance {
        dir: accum.normalize_or_zero(),
        strength,
        panic: panic.map(|(_, dir)| dir),
    }
}

/// Panic overrides everything; otherwise the repulsion is added to the
/// desired direction.
pub fn apply_mine_avoidance(desired: Vec2, avoid: &MineAvoidance) -> Vec2 {
    if let Some(flee) = avoid.panic {
        return flee;
    }
    if avoid.strength <= 0.0 {
        return desired;
    }
    (desired + avoid.dir * avoid.strength).clamp_length_max(1.0)
}

/// How urgently an agent at `pos` must leave the hazard cloud.
///
/// Below 1 outside the cloud, at least 1 inside it. Grows with closing
/// progress, with proximity to the current boundary, and with depth.
pub fn hazard_urgency(hazard: &dyn HazardField, pos: Vec2) -> f32 {
    if !hazard.is_enabled() {
        return 0.0;
    }
    let progress = hazard.progress().clamp(0.0, 1.0);
    let dist = hazard.distance_to_boundary(pos);

    if hazard.is_inside(pos) {
        return 1.0 + (dist.max(0.0) / HAZARD_DEPTH_SCALE).min(1.0);
    }

    let doomed = if hazard.will_be_inside(pos, 1.0) {
        0.3 + 0.3 * progress
    } else {
        0.0
    };
    let proximity = (1.0 - (-dist) / HAZARD_PROXIMITY_RANGE).clamp(0.0, 1.0);
    (doomed + proximity * (0.4 + 0.5 * progress)).min(0.99)
}

/// Pick a safe destination inside the final safe zone.
///
/// Agents are spread around the zone by their ordinal so they do not all
/// converge on one point. Blocked candidates fall back to a ring search,
/// then to the hazard's own suggestion.
pub fn escape_target(
    hazard: &dyn HazardField,
    map: &TileGrid,
    pos: Vec2,
    ordinal: usize,
    total: usize,
    radius: f32,
) -> Vec2 {
    let usable = |p: Vec2| is_position_clear(map, p, radius) && !hazard.will_be_inside(p, 1.0);

    let (center, half) = hazard.final_safe_zone();
    let angle = TAU * ordinal as f32 / total.max(1) as f32;
    let candidate = center + Vec2::new(angle.sin() * half.x, angle.cos() * half.y) * HAZARD_SPREAD_FACTOR;
    if usable(candidate) {
        return candidate;
    }

    let (cx, cy) = map.world_to_tile(candidate);
    for ring in 1..=HAZARD_LOCAL_SEARCH_RINGS {
        let found = (-ring..=ring)
            .flat_map(|dy| (-ring..=ring).map(move |dx| (dx, dy)))
            .filter(|(dx, dy)| dx.abs() == ring || dy.abs() == ring)
            .map(|(dx, dy)| map.tile_to_world(cx + dx, cy + dy))
            .filter(|p| usable(*p))
            .min_by(|a, b| a.distance(candidate).total_cmp(&b.distance(candidate)));
        if let Some(p) = found {
            return p;
        }
    }

    hazard.safe_position(pos, HAZARD_SAFE_MARGIN)
}

/// The closest living tank within blocking distance roughly straight ahead.
pub fn blocked_ahead(
    self_id: TankId,
    pos: Vec2,
    dir: Vec2,
    tanks: &[TankSnapshot],
) -> Option<TankId> {
    let dir = dir.normalize_or_zero();
    if dir == Vec2::ZERO {
        return None;
    }
    tanks
        .iter()
        .filter(|t| t.alive && t.id != self_id)
        .filter_map(|t| {
            let to = t.pos - pos;
            let dist = to.length();
            (dist < DETOUR_BLOCK_DISTANCE && dist > 1e-4 && dir.dot(to / dist) > 0.7)
                .then_some((t.id, dist))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

/// Two agents blocking each other: the lower id steps aside. An agent
/// blocked by someone who is not blocked back always steps aside.
pub fn should_yield(self_id: TankId, blocker: TankId, mutual: bool) -> bool {
    !mutual || self_id < blocker
}

/// A short sidestep target: left or right of the heading (random order),
/// else straight back.
pub fn detour_target<R: Rng + ?Sized>(
    map: &TileGrid,
    pos: Vec2,
    dir: Vec2,
    radius: f32,
    rng: &mut R,
) -> Option<Vec2> {
    let dir = dir.normalize_or_zero();
    if dir == Vec2::ZERO {
        return None;
    }
    let mut side = Vec2::new(-dir.y, dir.x);
    if rng.gen_bool(0.5) {
        side = -side;
    }

    [side, -side, -dir]
        .into_iter()
        .map(|d| pos + d * DETOUR_OFFSET)
        .find(|p| segment_has_clearance(map, pos, *p, radius))
}
