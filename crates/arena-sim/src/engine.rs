//! Harness engine.
//!
//! `ArenaEngine` owns the hecs world of tanks and projectiles, the tile map,
//! mines, the hazard cloud and the AI registry, and advances them with a
//! fixed step. Completely headless and seeded, so runs are reproducible.

use arena_ai::{AiManager, AiError, BehaviorTuning, HazardField, WorldView};
use arena_core::constants::*;
use arena_core::enums::{Archetype, WeaponKind};
use arena_core::types::{
    MineSnapshot, ProjectileSnapshot, SimTime, TankId, TankIntent, TankSnapshot,
};
use arena_nav::TileGrid;
use glam::Vec2;
use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::components::{Position, Tank};
use crate::hazard::ClosingCloud;
use crate::systems;
use crate::world_setup::{self, EcsTankPool};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Seconds per tick.
    pub dt: f32,
    pub tuning: BehaviorTuning,
    /// Tank bodies the world can hold, players included.
    pub max_tanks: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            dt: DT,
            tuning: BehaviorTuning::default(),
            max_tanks: MAX_TANKS,
        }
    }
}

pub struct ArenaEngine {
    world: World,
    map: TileGrid,
    ai: AiManager,
    rng: ChaCha8Rng,
    time: SimTime,
    dt: f32,
    max_tanks: usize,
    next_tank_id: u32,
    mines: Vec<MineSnapshot>,
    cloud: Option<ClosingCloud>,
    player_intents: Vec<TankIntent>,
    destroyed: Vec<TankId>,
    despawn_buffer: Vec<hecs::Entity>,
}

impl ArenaEngine {
    pub fn new(config: SimConfig, map: TileGrid) -> Self {
        info!(
            seed = config.seed,
            width = map.width(),
            height = map.height(),
            "arena engine started"
        );
        Self {
            world: World::new(),
            map,
            ai: AiManager::with_tuning(config.tuning),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            time: SimTime::default(),
            dt: config.dt,
            max_tanks: config.max_tanks,
            next_tank_id: 1,
            mines: Vec::new(),
            cloud: None,
            player_intents: Vec::new(),
            destroyed: Vec::new(),
            despawn_buffer: Vec::new(),
        }
    }

    /// Spawn a human-controlled tank. `None` when the world is full.
    pub fn spawn_player(&mut self, pos: Vec2, angle: f32) -> Option<TankId> {
        if world_setup::tank_count(&self.world) >= self.max_tanks {
            return None;
        }
        let id = TankId(self.next_tank_id);
        self.next_tank_id += 1;
        world_setup::spawn_tank(
            &mut self.world,
            id,
            pos,
            angle,
            PLAYER_HEALTH,
            WeaponKind::Default,
            true,
        );
        Some(id)
    }

    /// Spawn a computer-controlled tank with a controller attached.
    pub fn spawn_enemy(
        &mut self,
        pos: Vec2,
        angle: f32,
        archetype: Archetype,
    ) -> Result<TankId, AiError> {
        let mut pool = EcsTankPool {
            world: &mut self.world,
            next_id: &mut self.next_tank_id,
            capacity: self.max_tanks,
        };
        self.ai.spawn_enemy(&mut pool, pos, angle, archetype)
    }

    pub fn place_mine(&mut self, pos: Vec2, owner: Option<TankId>) {
        self.mines.push(MineSnapshot::placed(pos, owner));
    }

    pub fn set_cloud(&mut self, cloud: ClosingCloud) {
        self.cloud = Some(cloud);
    }

    /// Drive a player tank this tick. `move_dir` carries speed.
    pub fn drive_player(&mut self, tank: TankId, move_dir: Vec2, turret: f32) {
        self.player_intents.retain(|i| i.tank != tank);
        self.player_intents.push(TankIntent {
            tank,
            move_dir,
            target_turret: turret,
        });
    }

    /// Teleport a tank.
    pub fn set_tank_position(&mut self, tank: TankId, pos: Vec2) {
        for (_entity, (body, position)) in self.world.query_mut::<(&Tank, &mut Position)>() {
            if body.id == tank {
                position.0 = pos;
            }
        }
    }

    /// Advance one tick: AI decisions, tank integration, fire pass,
    /// projectiles, mines, then the hazard cloud.
    pub fn tick(&mut self) {
        let dt = self.dt;
        let hazard = self.cloud.as_ref().map(|c| c as &dyn HazardField);

        // 1. AI decisions
        let tanks = self.tank_snapshots();
        let projectiles = self.projectile_snapshots();
        let mut view = WorldView::new(&self.map, &tanks)
            .with_projectiles(&projectiles)
            .with_mines(&self.mines);
        view.hazard = hazard;
        let mut intents = self.ai.update(&view, &mut self.rng, dt);
        intents.append(&mut self.player_intents);

        // 2. Tank integration
        systems::movement::run(&mut self.world, &self.map, &intents, self.cloud.as_ref(), dt);

        // 3. Fire pass against post-movement positions
        let tanks = self.tank_snapshots();
        let mut view = WorldView::new(&self.map, &tanks)
            .with_projectiles(&projectiles)
            .with_mines(&self.mines);
        view.hazard = hazard;
        let requests = self.ai.fire(&view);
        systems::projectiles::spawn(&mut self.world, &requests);

        // 4. Projectiles and mines
        let mut destroyed = systems::projectiles::run(&mut self.world, &self.map, dt);
        destroyed.extend(systems::mines::run(&mut self.world, &mut self.mines, dt));

        // 5. Hazard cloud
        if let Some(cloud) = self.cloud.as_mut() {
            cloud.advance(dt);
            destroyed.extend(systems::cloud::run(&mut self.world, cloud, dt));
        }

        systems::cleanup::run(&mut self.world, &self.map, &mut self.despawn_buffer);
        self.destroyed.extend(destroyed);
        self.time.advance(dt);
    }

    pub fn tank_snapshots(&self) -> Vec<TankSnapshot> {
        systems::snapshot::tank_snapshots(&self.world)
    }

    pub fn projectile_snapshots(&self) -> Vec<ProjectileSnapshot> {
        systems::snapshot::projectile_snapshots(&self.world)
    }

    pub fn tank(&self, id: TankId) -> Option<TankSnapshot> {
        self.tank_snapshots().into_iter().find(|t| t.id == id)
    }

    /// Living computer-controlled tanks.
    pub fn enemies_alive(&self) -> usize {
        self.ai.count_alive(&self.tank_snapshots())
    }

    /// Tanks destroyed so far, in order.
    pub fn destroyed(&self) -> &[TankId] {
        &self.destroyed
    }

    pub fn mines(&self) -> &[MineSnapshot] {
        &self.mines
    }

    pub fn cloud(&self) -> Option<&ClosingCloud> {
        self.cloud.as_ref()
    }

    pub fn map(&self) -> &TileGrid {
        &self.map
    }

    pub fn ai(&self) -> &AiManager {
        &self.ai
    }

    pub fn ai_mut(&mut self) -> &mut AiManager {
        &mut self.ai
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Read-only access to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }
}
