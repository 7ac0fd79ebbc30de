//! Balancing knobs shared by every controller.

use arena_core::constants::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Probabilities and thresholds that shape behavior without changing it.
///
/// Missing fields in a JSON document fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorTuning {
    /// Chance to leave cover instead of peeking when the wait runs out.
    pub cover_abandon_chance: f32,
    /// Chance to look for new cover after retreating back to the old one.
    pub retreat_reroll_chance: f32,
    /// Chance to stop strafing and resume the chase when the engage timer runs out.
    pub engage_break_chance: f32,
    /// Health ratio under which aggressive agents fall back to cover.
    pub health_retreat_threshold: f32,
    /// Delay between acquiring a target and the first shot.
    pub hesitation_delay: f32,
    /// Confidence assigned to a solved but unconfirmed bounce shot.
    pub bounce_shot_confidence: f32,
    /// Friendly-fire lane length for non-bouncing weapons.
    pub friendly_fire_range_direct: f32,
    /// Friendly-fire lane length for bouncing weapons.
    pub friendly_fire_range_bounce: f32,
}

impl Default for BehaviorTuning {
    fn default() -> Self {
        Self {
            cover_abandon_chance: COVER_ABANDON_CHANCE,
            retreat_reroll_chance: RETREAT_REROLL_CHANCE,
            engage_break_chance: ENGAGE_BREAK_CHANCE,
            health_retreat_threshold: HEALTH_RETREAT_THRESHOLD,
            hesitation_delay: HESITATION_DELAY,
            bounce_shot_confidence: BOUNCE_SHOT_CONFIDENCE,
            friendly_fire_range_direct: FRIENDLY_FIRE_RANGE_DIRECT,
            friendly_fire_range_bounce: FRIENDLY_FIRE_RANGE_BOUNCE,
        }
    }
}

impl BehaviorTuning {
    /// Parse tuning from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Friendly-fire lane length for a weapon with `max_bounces`.
    pub fn friendly_fire_range(&self, max_bounces: u32) -> f32 {
        if max_bounces == 0 {
            self.friendly_fire_range_direct
        } else {
            self.friendly_fire_range_bounce
        }
    }
}
