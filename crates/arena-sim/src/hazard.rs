//! Closing hazard cloud.
//!
//! The safe area is a rectangle that starts as the whole map and shrinks,
//! after a delay, toward a final safe zone around `center`. Everything
//! outside the safe rectangle is inside the cloud.

use arena_ai::HazardField;
use arena_core::constants::*;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Cloud settings for one map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub enabled: bool,
    /// Seconds before closing starts.
    pub delay: f32,
    /// Seconds from the start of closing to the final size.
    pub duration: f32,
    /// Final safe zone size as a fraction of the map size.
    pub safe_zone_ratio: f32,
    pub damage: i32,
    pub damage_interval: f32,
    /// Speed multiplier inside the cloud.
    pub slowdown: f32,
    /// Center of the final safe zone.
    pub center: Vec2,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay: CLOUD_DELAY,
            duration: CLOUD_DURATION,
            safe_zone_ratio: CLOUD_SAFE_ZONE_RATIO,
            damage: CLOUD_DAMAGE,
            damage_interval: CLOUD_DAMAGE_INTERVAL,
            slowdown: CLOUD_SLOWDOWN,
            center: Vec2::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClosingCloud {
    pub config: CloudConfig,
    map_half: Vec2,
    elapsed: f32,
    progress: f32,
}

impl ClosingCloud {
    /// A cloud over a map with the given half extents, centered at the origin.
    pub fn new(config: CloudConfig, map_half: Vec2) -> Self {
        Self {
            config,
            map_half,
            elapsed: 0.0,
            progress: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        if !self.config.enabled {
            return;
        }
        self.elapsed += dt;
        let closing = self.elapsed - self.config.delay;
        self.progress = if closing <= 0.0 {
            0.0
        } else if self.config.duration <= 0.0 {
            1.0
        } else {
            (closing / self.config.duration).clamp(0.0, 1.0)
        };
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    fn final_half(&self) -> Vec2 {
        self.map_half * self.config.safe_zone_ratio.clamp(0.0, 1.0)
    }

    /// Center and half extents of the safe rectangle at `progress`.
    pub fn bounds_at(&self, progress: f32) -> (Vec2, Vec2) {
        let p = progress.clamp(0.0, 1.0);
        let center = Vec2::ZERO.lerp(self.config.center, p);
        let half = self.map_half.lerp(self.final_half(), p);
        (center, half)
    }

    pub fn bounds(&self) -> (Vec2, Vec2) {
        self.bounds_at(self.progress)
    }

    /// True when a tank at `pos` takes cloud damage and slowdown.
    pub fn is_damaging(&self, pos: Vec2) -> bool {
        self.config.enabled && self.progress > 0.0 && self.is_inside(pos)
    }
}

/// Signed distance from `pos` to a rectangle edge, positive outside.
fn rect_distance(pos: Vec2, center: Vec2, half: Vec2) -> f32 {
    let q = (pos - center).abs() - half;
    q.max(Vec2::ZERO).length() + q.x.max(q.y).min(0.0)
}

impl HazardField for ClosingCloud {
    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn is_inside(&self, pos: Vec2) -> bool {
        self.distance_to_boundary(pos) > 0.0
    }

    fn will_be_inside(&self, pos: Vec2, future_progress: f32) -> bool {
        let (center, half) = self.bounds_at(future_progress);
        rect_distance(pos, center, half) > 0.0
    }

    fn progress(&self) -> f32 {
        self.progress
    }

    fn distance_to_boundary(&self, pos: Vec2) -> f32 {
        let (center, half) = self.bounds();
        rect_distance(pos, center, half)
    }

    fn safe_position(&self, from: Vec2, margin: f32) -> Vec2 {
        let (center, half) = self.bounds_at(1.0);
        let inner = (half - Vec2::splat(margin)).max(Vec2::ZERO);
        from.clamp(center - inner, center + inner)
    }

    fn final_safe_zone(&self) -> (Vec2, Vec2) {
        (self.config.center, self.final_half())
    }
}
