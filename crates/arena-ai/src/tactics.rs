//! Tactical queries built on map raycasts.
//!
//! Everything here is a pure function of the map and the positions passed
//! in. Queries that can come up empty return `Option`.

use std::f32::consts::TAU;

use arena_core::constants::*;
use arena_core::types::{angle_to_dir, dir_to_angle, normalize_angle, reflect};
use arena_core::types::{MineSnapshot, ProjectileSnapshot, TankId};
use arena_nav::{has_line_of_sight, is_position_clear, raycast, TileGrid};
use glam::Vec2;

use crate::world::HazardField;

/// True if nothing solid lies between two points. Points closer than 0.1
/// always see each other.
pub fn line_of_sight(map: &TileGrid, from: Vec2, to: Vec2) -> bool {
    if from.distance(to) < 0.1 {
        return true;
    }
    has_line_of_sight(map, from, to)
}

/// One straight leg of a simulated shot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotSegment {
    pub start: Vec2,
    pub end: Vec2,
}

impl ShotSegment {
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// Simulate a shot from `origin` along `dir`, reflecting off walls up to
/// `max_bounces` times, for at most `max_dist` of travel.
pub fn trace_shot(
    map: &TileGrid,
    origin: Vec2,
    dir: Vec2,
    max_bounces: u32,
    max_dist: f32,
) -> Vec<ShotSegment> {
    let mut segments = Vec::with_capacity(max_bounces as usize + 1);
    let mut start = origin;
    let mut dir = dir.normalize_or_zero();
    let mut remaining = max_dist;
    if dir == Vec2::ZERO {
        return segments;
    }

    for bounce in 0..=max_bounces {
        let hit = raycast(map, start, start + dir * remaining);
        segments.push(ShotSegment {
            start,
            end: hit.point,
        });
        if !hit.hit || bounce == max_bounces {
            break;
        }
        remaining -= hit.distance;
        if remaining <= 0.0 {
            break;
        }
        dir = reflect(dir, hit.normal);
        start = hit.point + hit.normal * BOUNCE_WALL_OFFSET;
    }

    segments
}

/// Distance along the segment `a -> b` to its closest approach to a circle,
/// if the segment passes within `radius` of `center`.
pub fn segment_circle_hit(a: Vec2, b: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let d = b - a;
    let len_sq = d.length_squared();
    if len_sq < 1e-8 {
        return (a.distance(center) <= radius).then_some(0.0);
    }
    let t = ((center - a).dot(d) / len_sq).clamp(0.0, 1.0);
    let closest = a + d * t;
    (closest.distance(center) <= radius).then(|| t * len_sq.sqrt())
}

/// Parameters of a bounce-shot search.
#[derive(Debug, Clone, Copy)]
pub struct BounceSearch {
    /// Total simulated travel per sampled angle.
    pub range: f32,
    /// Number of evenly spaced angles tried.
    pub samples: u32,
    pub max_bounces: u32,
    pub shooter_radius: f32,
    pub target_radius: f32,
}

/// A solved bounce shot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceShot {
    pub angle: f32,
    /// Wall reflections before the target is reached.
    pub bounces: u32,
    /// Travel distance to the target.
    pub distance: f32,
}

/// Search evenly spaced angles for a shot that reaches the target circle
/// without first clipping the shooter. Fewest bounces wins, then shortest
/// travel.
pub fn find_bounce_shot(
    map: &TileGrid,
    shooter: Vec2,
    target: Vec2,
    search: &BounceSearch,
) -> Option<BounceShot> {
    if search.samples == 0 || search.range <= 0.0 {
        return None;
    }

    let mut best: Option<BounceShot> = None;
    for i in 0..search.samples {
        let angle = normalize_angle(i as f32 * TAU / search.samples as f32);
        let dir = angle_to_dir(angle);
        let segments = trace_shot(map, shooter, dir, search.max_bounces, search.range);

        let mut traveled = 0.0;
        for (k, seg) in segments.iter().enumerate() {
            let to_target = segment_circle_hit(seg.start, seg.end, target, search.target_radius);

            // The shot leaves through the shooter's own hull on the first leg.
            let self_start = if k == 0 {
                seg.start + dir * BOUNCE_SELF_IGNORE_DISTANCE.min(seg.length())
            } else {
                seg.start
            };
            let to_self = segment_circle_hit(self_start, seg.end, shooter, search.shooter_radius)
                .map(|d| d + seg.start.distance(self_start));

            match (to_target, to_self) {
                (Some(t), Some(s)) if s < t => break,
                (None, Some(_)) => break,
                (Some(t), _) => {
                    let shot = BounceShot {
                        angle,
                        bounces: k as u32,
                        distance: traveled + t,
                    };
                    let better = best.map_or(true, |b| {
                        (shot.bounces, shot.distance) < (b.bounces, b.distance)
                    });
                    if better {
                        best = Some(shot);
                    }
                    break;
                }
                (None, None) => {}
            }
            traveled += seg.length();
        }
    }

    best
}

/// A hidden position and its paired exposed firing position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverPair {
    pub cover: Vec2,
    pub peek: Vec2,
    pub score: f32,
}

fn hazard_clear(hazard: Option<&dyn HazardField>, pos: Vec2) -> bool {
    hazard.map_or(true, |h| !h.is_inside(pos))
}

/// Grid-sample cover around `agent` that `target` cannot see, each paired
/// with the nearest peek point toward the target that can.
pub fn find_cover(
    map: &TileGrid,
    agent: Vec2,
    target: Vec2,
    radius: f32,
    hazard: Option<&dyn HazardField>,
) -> Option<CoverPair> {
    let to_target = target - agent;
    if to_target.length() < 0.1 {
        return None;
    }
    let dir_to_target = to_target.normalize();

    let cells = (COVER_SEARCH_RANGE / COVER_SEARCH_STEP).round() as i32;
    let peek_steps = ((PEEK_STEP_MAX - PEEK_STEP_MIN) / PEEK_STEP_INCREMENT).round() as i32;
    let mut best: Option<CoverPair> = None;

    for ix in -cells..=cells {
        for iy in -cells..=cells {
            let offset = Vec2::new(ix as f32, iy as f32) * COVER_SEARCH_STEP;
            let cover = agent + offset;

            if !is_position_clear(map, cover, radius) || !hazard_clear(hazard, cover) {
                continue;
            }
            if line_of_sight(map, cover, target) {
                continue;
            }

            let peek = (0..=peek_steps)
                .map(|n| PEEK_STEP_MIN + n as f32 * PEEK_STEP_INCREMENT)
                .map(|step| (step, cover + dir_to_target * step))
                .find(|&(_, p)| {
                    is_position_clear(map, p, radius)
                        && hazard_clear(hazard, p)
                        && line_of_sight(map, p, target)
                });
            let Some((step, peek)) = peek else {
                continue;
            };

            let mut score = 10.0 - agent.distance(cover) * 0.3 - step * 0.5;
            let toward = (offset / (offset.length_squared() + 0.01).sqrt()).dot(dir_to_target);
            if toward > 0.0 {
                score += toward * 3.0;
            }

            if best.map_or(true, |b| score > b.score) {
                best = Some(CoverPair { cover, peek, score });
            }
        }
    }

    best.filter(|b| b.score > 0.0)
}

/// Two points beside and behind the target, as seen from the agent. The
/// nearer clear one is returned.
pub fn find_flank(map: &TileGrid, agent: Vec2, target: Vec2, radius: f32) -> Option<Vec2> {
    let to_target = target - agent;
    if to_target.length() < 0.1 {
        return None;
    }
    let dir = to_target.normalize();
    let left = Vec2::new(-dir.y, dir.x);
    let back = -dir * FLANK_APPROACH_DISTANCE;

    [
        target + left * FLANK_DISTANCE + back,
        target - left * FLANK_DISTANCE + back,
    ]
    .into_iter()
    .filter(|p| is_position_clear(map, *p, radius))
    .min_by(|a, b| a.distance(agent).total_cmp(&b.distance(agent)))
}

/// Time and distance of a projectile's closest approach to `pos`. `None`
/// when it is standing still or already moving away.
pub fn closest_approach(pos: Vec2, projectile: &ProjectileSnapshot) -> Option<(f32, f32)> {
    let speed_sq = projectile.velocity.length_squared();
    if speed_sq < 0.01 {
        return None;
    }
    let t = (pos - projectile.pos).dot(projectile.velocity) / speed_sq;
    if t < 0.0 {
        return None;
    }
    let closest = projectile.pos + projectile.velocity * t;
    Some((t, closest.distance(pos)))
}

/// Perpendicular dodge away from the most dangerous incoming projectile.
pub fn find_evasion(agent: TankId, pos: Vec2, projectiles: &[ProjectileSnapshot]) -> Option<Vec2> {
    let mut best: Option<(f32, Vec2)> = None;

    for proj in projectiles.iter().filter(|p| p.owner != agent) {
        let Some((t, dist)) = closest_approach(pos, proj) else {
            continue;
        };
        if t > EVADE_LOOKAHEAD || dist >= EVADE_THREAT_RADIUS {
            continue;
        }
        if best.is_some_and(|(d, _)| dist >= d) {
            continue;
        }

        let dir = proj.velocity.normalize();
        let perp = Vec2::new(-dir.y, dir.x);
        let closest = proj.pos + proj.velocity * t;
        let dodge = if perp.dot(pos - closest) >= 0.0 {
            perp
        } else {
            -perp
        };
        best = Some((dist, dodge));
    }

    best.map(|(_, dodge)| dodge)
}

/// Aim solution against an incoming projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefenseTarget {
    pub angle: f32,
    /// Seconds until the threat's closest approach.
    pub time_to_threat: f32,
}

/// Earliest positive time at which a shot at `shot_speed` from `shooter`
/// meets a target starting at `pos` with constant `velocity`.
pub fn intercept_time(shooter: Vec2, pos: Vec2, velocity: Vec2, shot_speed: f32) -> Option<f32> {
    let rel = pos - shooter;
    let a = velocity.length_squared() - shot_speed * shot_speed;
    let b = 2.0 * rel.dot(velocity);
    let c = rel.length_squared();

    if a.abs() < 1e-6 {
        if b.abs() < 1e-6 {
            return None;
        }
        let t = -c / b;
        return (t > 0.0).then_some(t);
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt = disc.sqrt();
    let t1 = (-b - sqrt) / (2.0 * a);
    let t2 = (-b + sqrt) / (2.0 * a);
    [t1, t2]
        .into_iter()
        .filter(|t| *t > 0.0)
        .min_by(f32::total_cmp)
}

/// Intercept aim at the incoming projectile that will threaten the agent
/// soonest.
pub fn find_defense_target(
    agent: TankId,
    pos: Vec2,
    projectiles: &[ProjectileSnapshot],
    shot_speed: f32,
) -> Option<DefenseTarget> {
    let (threat, time_to_threat) = projectiles
        .iter()
        .filter(|p| p.owner != agent)
        .filter_map(|p| {
            let (t, dist) = closest_approach(pos, p)?;
            (t <= DEFENSE_LOOKAHEAD && dist < DEFENSE_THREAT_RADIUS).then_some((p, t))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))?;

    let aim_point = intercept_time(pos, threat.pos, threat.velocity, shot_speed)
        .map_or(threat.pos, |t| threat.pos + threat.velocity * t);

    Some(DefenseTarget {
        angle: dir_to_angle(aim_point - pos),
        time_to_threat,
    })
}

/// Closest armed mine worth shooting: visible, in range, far enough not to
/// catch the shooter in its blast, and either next to the target or
/// threatening the agent.
pub fn find_mine_target(
    map: &TileGrid,
    pos: Vec2,
    target: Option<Vec2>,
    mines: &[MineSnapshot],
) -> Option<Vec2> {
    mines
        .iter()
        .filter(|m| m.is_armed())
        .map(|m| (m.pos, m.pos.distance(pos)))
        .filter(|&(_, d)| (MINE_SAFE_SHOOT_DISTANCE..=MINE_TARGET_RANGE).contains(&d))
        .filter(|&(mine, d)| {
            let catches_target =
                target.is_some_and(|t| t.distance(mine) <= MINE_DAMAGE_RADIUS + TANK_RADIUS);
            catches_target || d <= MINE_THREAT_RADIUS
        })
        .filter(|&(mine, _)| line_of_sight(map, pos, mine))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(mine, _)| mine)
}
