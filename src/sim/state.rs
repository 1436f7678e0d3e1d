//! Level state and core simulation types
//!
//! `LevelState` is the one owner of everything a level instance mutates: the
//! live enemy set, the crystal counters, the scheduler and the HUD snapshot.
//! Reloading a level rebuilds all of it.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::{EnemyId, EnemyState};
use super::geometry::LevelGeometry;
use super::health::HealthDisplay;
use super::objectives::{ObjectiveId, ObjectiveTracker};
use super::player::Player;
use super::scheduler::Scheduler;
use super::spawner::Population;
use super::weapon::Weapon;
use crate::settings::GameConfig;

/// Current phase of the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Crystals left to collect, enemies spawning
    Playing,
    /// All crystals collected, exit portal open
    PortalOpen,
    /// Player died, waiting for the reload
    Dead,
    /// Player entered the portal; the host should load the next level
    Exited,
}

/// One-shot notifications for the host (renderer, audio, scene loader)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    EnemySpawned { id: EnemyId, position: Vec3 },
    /// Visual state indicator for the animator
    EnemyStateChanged { id: EnemyId, state: EnemyState },
    EnemyDied { id: EnemyId },
    EnemyRemoved { id: EnemyId },
    PlayerHealthChanged { current: i32 },
    PlayerDied,
    CrystalCollected { id: ObjectiveId, remaining: u32 },
    PortalOpened { position: Vec3 },
    /// Scene transition request
    LoadLevel { entry: u32 },
}

/// Exit portal
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Portal {
    pub active: bool,
    pub position: Vec3,
}

/// Strings and flags for the UI text sink
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub objective_text: String,
    pub health: HealthDisplay,
    pub ammo_text: String,
    pub death_message_visible: bool,
}

impl Default for Hud {
    fn default() -> Self {
        Self {
            objective_text: String::new(),
            health: HealthDisplay {
                text: String::new(),
                color: Vec3::ONE,
            },
            ammo_text: String::new(),
            death_message_visible: false,
        }
    }
}

/// Complete state of one running level
#[derive(Debug, Clone)]
pub struct LevelState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Simulation tick counter (not reset on reload)
    pub time_ticks: u64,
    pub phase: LevelPhase,
    pub player: Player,
    pub population: Population,
    pub objectives: ObjectiveTracker,
    pub weapon: Weapon,
    pub scheduler: Scheduler,
    pub portal: Portal,
    pub hud: Hud,
    /// Number of times the level has been (re)loaded
    pub load_count: u32,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) lose_started: bool,
}

impl LevelState {
    /// Create and load a level
    pub fn new(config: GameConfig, seed: u64, geometry: &impl LevelGeometry) -> Self {
        let mut state = Self {
            player: Player::new(&config.player),
            population: Population::new(&config.spawner),
            weapon: Weapon::new(&config.weapon),
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: LevelPhase::Playing,
            objectives: ObjectiveTracker::new(),
            scheduler: Scheduler::new(),
            portal: Portal::default(),
            hud: Hud::default(),
            load_count: 0,
            events: Vec::new(),
            lose_started: false,
        };
        state.load_level(geometry);
        state
    }

    /// Reset every per-level collection and counter and populate the level
    /// from the configured layout
    pub fn load_level(&mut self, geometry: &impl LevelGeometry) {
        self.population.purge_all(&mut self.scheduler, &mut self.events);
        self.scheduler.clear();
        self.population = Population::new(&self.config.spawner);
        self.objectives.reset();
        self.player = Player::new(&self.config.player);
        self.weapon = Weapon::new(&self.config.weapon);
        self.portal = Portal::default();
        self.phase = LevelPhase::Playing;
        self.lose_started = false;
        self.hud = Hud::default();
        self.load_count += 1;

        let crystals = self.config.level.crystals.clone();
        for position in crystals {
            self.register_objective(position);
        }
        self.refresh_health_display();
        self.refresh_ammo_display();

        let spawned = self.population.spawn_initial_batch(
            &self.config.spawner,
            &self.config.enemy,
            &mut self.rng,
            geometry,
            &mut self.events,
        );
        log::info!(
            "Level loaded (load #{}): {} crystals, {} enemies",
            self.load_count,
            self.objectives.total(),
            spawned
        );
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events raised since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn lose_started(&self) -> bool {
        self.lose_started
    }

    pub fn refresh_health_display(&mut self) {
        self.hud.health = self
            .player
            .health
            .display(self.config.player.low_health_color, self.config.player.full_health_color);
    }

    pub fn refresh_ammo_display(&mut self) {
        self.hud.ammo_text = self.weapon.ammo_text(&self.config.weapon);
    }
}
