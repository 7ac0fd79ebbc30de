//! Controller registry.
//!
//! Owns a fixed-capacity, append-only list of controllers and drives the
//! per-tick update and fire passes. Tanks are looked up by id every tick;
//! the registry never holds on to a tank.

use arena_core::constants::MAX_AI_CONTROLLERS;
use arena_core::enums::Archetype;
use arena_core::types::{FireRequest, TankId, TankIntent, TankSnapshot};
use glam::Vec2;
use rand::Rng;
use tracing::{info, warn};

use crate::controller::{Controller, TickContext};
use crate::error::{AiError, Result};
use crate::profiles::get_profile;
use crate::tuning::BehaviorTuning;
use crate::world::{TankPool, WorldView};

#[derive(Debug, Clone)]
pub struct AiManager {
    controllers: Vec<Controller>,
    capacity: usize,
    tuning: BehaviorTuning,
}

impl Default for AiManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AiManager {
    pub fn new() -> Self {
        Self::with_tuning(BehaviorTuning::default())
    }

    pub fn with_tuning(tuning: BehaviorTuning) -> Self {
        info!(capacity = MAX_AI_CONTROLLERS, "AI manager created");
        Self {
            controllers: Vec::with_capacity(MAX_AI_CONTROLLERS),
            capacity: MAX_AI_CONTROLLERS,
            tuning,
        }
    }

    /// Spawn a tank for `archetype` in the external pool and attach a
    /// controller to it.
    pub fn spawn_enemy<P: TankPool + ?Sized>(
        &mut self,
        pool: &mut P,
        pos: Vec2,
        angle: f32,
        archetype: Archetype,
    ) -> Result<TankId> {
        if self.controllers.len() >= self.capacity {
            warn!(
                capacity = self.capacity,
                "cannot spawn enemy: max AI controllers reached"
            );
            return Err(AiError::PoolExhausted {
                capacity: self.capacity,
            });
        }

        let profile = get_profile(archetype);
        let Some(tank) = pool.spawn_tank(pos, angle, profile.health, profile.weapon) else {
            warn!("cannot spawn enemy: no tank slots available");
            return Err(AiError::TankSpawnFailed);
        };

        self.controllers
            .push(Controller::new(tank, archetype, pos, angle));
        info!(
            "spawned {} enemy at ({:.1}, {:.1}), {}",
            archetype.name(),
            pos.x,
            pos.y,
            tank
        );
        Ok(tank)
    }

    /// Attach a controller to a tank that already exists.
    pub fn register(&mut self, tank: TankId, archetype: Archetype, pos: Vec2, angle: f32) -> Result<()> {
        if self.controllers.len() >= self.capacity {
            warn!(
                capacity = self.capacity,
                "cannot register {}: max AI controllers reached", tank
            );
            return Err(AiError::PoolExhausted {
                capacity: self.capacity,
            });
        }
        self.controllers
            .push(Controller::new(tank, archetype, pos, angle));
        Ok(())
    }

    /// Run every controller for one tick. Dead or missing tanks produce no
    /// intent.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        view: &WorldView<'_>,
        rng: &mut R,
        dt: f32,
    ) -> Vec<TankIntent> {
        let prior_blocks: Vec<(TankId, TankId)> = self
            .controllers
            .iter()
            .filter_map(|c| c.detour.blocked_by.map(|by| (c.tank, by)))
            .collect();
        let total = self.controllers.len();

        let mut intents = Vec::with_capacity(total);
        for (ordinal, ctrl) in self.controllers.iter_mut().enumerate() {
            let ctx = TickContext {
                view: *view,
                tuning: &self.tuning,
                ordinal,
                total,
                prior_blocks: &prior_blocks,
            };
            if let Some(intent) = ctrl.update(&ctx, rng, dt) {
                intents.push(intent);
            }
        }
        intents
    }

    /// Fire pass, run after tanks have moved.
    pub fn fire(&mut self, view: &WorldView<'_>) -> Vec<FireRequest> {
        let tuning = self.tuning;
        self.controllers
            .iter_mut()
            .filter_map(|c| c.try_fire(view, &tuning))
            .collect()
    }

    /// Living controlled tanks.
    pub fn count_alive(&self, tanks: &[TankSnapshot]) -> usize {
        self.controllers
            .iter()
            .filter(|c| is_alive(tanks, c.tank))
            .count()
    }

    /// True while a Hunter or Sniper is still alive.
    pub fn has_elite_alive(&self, tanks: &[TankSnapshot]) -> bool {
        self.controllers
            .iter()
            .any(|c| c.archetype.is_elite() && is_alive(tanks, c.tank))
    }

    pub fn is_controlled(&self, tank: TankId) -> bool {
        self.controller(tank).is_some()
    }

    pub fn controller(&self, tank: TankId) -> Option<&Controller> {
        self.controllers.iter().find(|c| c.tank == tank)
    }

    pub fn controller_mut(&mut self, tank: TankId) -> Option<&mut Controller> {
        self.controllers.iter_mut().find(|c| c.tank == tank)
    }

    pub fn controllers(&self) -> &[Controller] {
        &self.controllers
    }

    /// Reset a controller after its tank respawned.
    pub fn reset_controller(&mut self, tank: TankId, pos: Vec2, angle: f32) -> Result<()> {
        let ctrl = self
            .controller_mut(tank)
            .ok_or(AiError::UnknownTank(tank))?;
        ctrl.reset(pos, angle);
        Ok(())
    }

    pub fn tuning(&self) -> &BehaviorTuning {
        &self.tuning
    }

    pub fn set_tuning(&mut self, tuning: BehaviorTuning) {
        self.tuning = tuning;
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn is_alive(tanks: &[TankSnapshot], id: TankId) -> bool {
    tanks.iter().any(|t| t.id == id && t.alive)
}
