//! Enumeration types used throughout the arena.

use serde::{Deserialize, Serialize};

/// Behavior profile of a computer-controlled tank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Stationary turret that leans on bounce shots.
    #[default]
    Sentry,
    /// Cover user that peeks out to fire.
    Skirmisher,
    /// Aggressive chaser that flanks and strafes.
    Hunter,
    /// Stationary long-range ricochet shooter.
    Sniper,
}

impl Archetype {
    pub const ALL: [Archetype; 4] = [
        Archetype::Sentry,
        Archetype::Skirmisher,
        Archetype::Hunter,
        Archetype::Sniper,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Archetype::Sentry => "Sentry",
            Archetype::Skirmisher => "Skirmisher",
            Archetype::Hunter => "Hunter",
            Archetype::Sniper => "Sniper",
        }
    }

    /// Archetypes whose survival keeps a level from being cleared early.
    pub fn is_elite(self) -> bool {
        matches!(self, Archetype::Hunter | Archetype::Sniper)
    }
}

/// Behavior state of a controller. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Idle,
    /// Moving to a cover point.
    SeekingCover,
    /// Hidden at the cover point, waiting.
    InCover,
    /// Moving out to the peek point.
    Peeking,
    /// Exposed at the peek point, shooting.
    Firing,
    /// Returning from the peek point to cover.
    Retreating,
    /// Pathing toward the target.
    Chasing,
    /// Moving to a point beside or behind the target.
    Flanking,
    /// Short perpendicular dodge away from an incoming projectile.
    Evading,
    /// Strafing around the target at combat range.
    Engaging,
}

impl AiState {
    pub fn name(self) -> &'static str {
        match self {
            AiState::Idle => "idle",
            AiState::SeekingCover => "seeking_cover",
            AiState::InCover => "in_cover",
            AiState::Peeking => "peeking",
            AiState::Firing => "firing",
            AiState::Retreating => "retreating",
            AiState::Chasing => "chasing",
            AiState::Flanking => "flanking",
            AiState::Evading => "evading",
            AiState::Engaging => "engaging",
        }
    }

    /// States that belong to the peek-and-fire cover cycle.
    pub fn is_cover_cycle(self) -> bool {
        matches!(
            self,
            AiState::SeekingCover
                | AiState::InCover
                | AiState::Peeking
                | AiState::Firing
                | AiState::Retreating
        )
    }
}

/// Weapon fitted to a tank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Standard cannon with a single ricochet.
    #[default]
    Default,
    /// Fast, weak, non-bouncing bullets.
    MachineGun,
    /// Cannon whose shells bounce twice.
    Ricochet,
}

/// Contents of one map cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Floor,
    /// Blocks movement and bullets.
    Wall,
    /// Blocks movement; bullets fly over it.
    Pit,
}

impl Tile {
    pub fn blocks_movement(self) -> bool {
        !matches!(self, Tile::Floor)
    }

    pub fn blocks_bullets(self) -> bool {
        matches!(self, Tile::Wall)
    }
}
