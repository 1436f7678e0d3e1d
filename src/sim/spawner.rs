//! Enemy population: live set, cap, and ground-constrained spawning
//!
//! Placement samples a uniform point in the spawn disk (rejection sampling
//! from the bounding square), then ray casts down to find the ground under it.

use glam::{Vec2, Vec3};
use rand::Rng;

use super::enemy::{Enemy, EnemyId};
use super::geometry::LevelGeometry;
use super::scheduler::Scheduler;
use super::state::GameEvent;
use crate::settings::{EnemySettings, SpawnerSettings};
use crate::{from_horizontal, secs_to_ticks};

/// Result of a single spawn attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned(EnemyId),
    /// Live set already at the cap; nothing sampled
    AtCapacity,
    /// Every candidate missed the ground; this spawn is skipped
    NoGround,
}

/// Uniform sample inside a disk of `radius` centred on the origin
///
/// Draws from the bounding square until a point lands inside the circle.
/// Terminates with probability 1 (acceptance is pi/4 per draw).
pub fn sample_disk(rng: &mut impl Rng, radius: f32) -> Vec2 {
    if radius <= 0.0 {
        return Vec2::ZERO;
    }
    loop {
        let candidate = Vec2::new(rng.random_range(-radius..=radius), rng.random_range(-radius..=radius));
        if candidate.length() <= radius {
            return candidate;
        }
    }
}

/// The live enemy set, in spawn order
#[derive(Debug, Clone, Default)]
pub struct Population {
    enemies: Vec<Enemy>,
    next_serial: u32,
    /// Ticks until the next recurring spawn
    spawn_countdown: u64,
}

impl Population {
    pub fn new(settings: &SpawnerSettings) -> Self {
        Self {
            enemies: Vec::new(),
            next_serial: 0,
            spawn_countdown: secs_to_ticks(settings.spawn_interval),
        }
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    /// Try to add one enemy. The cap is checked before any sampling.
    pub fn spawn_one(
        &mut self,
        spawner: &SpawnerSettings,
        enemy: &EnemySettings,
        rng: &mut impl Rng,
        geometry: &impl LevelGeometry,
        events: &mut Vec<GameEvent>,
    ) -> SpawnOutcome {
        if self.enemies.len() >= spawner.max_population {
            return SpawnOutcome::AtCapacity;
        }

        for _ in 0..spawner.max_ground_attempts.max(1) {
            let offset = sample_disk(rng, spawner.spawn_radius);
            let column = spawner.origin + from_horizontal(offset, 0.0);
            let ray_start = column + Vec3::Y * spawner.ray_height;

            let Some(hit) = geometry.ground_below(ray_start, spawner.ray_distance) else {
                log::debug!("No ground found at position {}", column);
                continue;
            };

            let id = EnemyId(self.next_serial);
            self.next_serial += 1;
            let position = hit + Vec3::Y * spawner.clearance;
            let new_enemy = Enemy::new(id, position, enemy);
            log::debug!("Spawned {} at {} ({} live)", new_enemy.name, position, self.enemies.len() + 1);
            self.enemies.push(new_enemy);
            events.push(GameEvent::EnemySpawned { id, position });
            return SpawnOutcome::Spawned(id);
        }

        log::warn!(
            "Skipping spawn: no ground under {} candidates within {} of {}",
            spawner.max_ground_attempts.max(1),
            spawner.spawn_radius,
            spawner.origin
        );
        SpawnOutcome::NoGround
    }

    /// Spawn the configured starting batch
    pub fn spawn_initial_batch(
        &mut self,
        spawner: &SpawnerSettings,
        enemy: &EnemySettings,
        rng: &mut impl Rng,
        geometry: &impl LevelGeometry,
        events: &mut Vec<GameEvent>,
    ) -> usize {
        (0..spawner.initial_count)
            .filter(|_| matches!(self.spawn_one(spawner, enemy, rng, geometry, events), SpawnOutcome::Spawned(_)))
            .count()
    }

    /// Count down the recurring spawn timer; spawns once each time it elapses
    pub fn tick_spawn_timer(
        &mut self,
        spawner: &SpawnerSettings,
        enemy: &EnemySettings,
        rng: &mut impl Rng,
        geometry: &impl LevelGeometry,
        events: &mut Vec<GameEvent>,
    ) -> Option<SpawnOutcome> {
        self.spawn_countdown = self.spawn_countdown.saturating_sub(1);
        if self.spawn_countdown > 0 {
            return None;
        }
        self.spawn_countdown = secs_to_ticks(spawner.spawn_interval).max(1);
        log::trace!("Spawn timer fired with {} live", self.enemies.len());
        Some(self.spawn_one(spawner, enemy, rng, geometry, events))
    }

    /// Remove one enemy. Missing ids are fine (already purged or removed).
    pub fn remove(&mut self, id: EnemyId, scheduler: &mut Scheduler, events: &mut Vec<GameEvent>) -> Option<Enemy> {
        let index = self.enemies.iter().position(|e| e.id == id)?;
        let enemy = self.enemies.remove(index);
        if let Some(task) = enemy.removal_task() {
            scheduler.cancel(task);
        }
        log::debug!("Removed {}", enemy.name);
        events.push(GameEvent::EnemyRemoved { id });
        Some(enemy)
    }

    /// Destroy every live enemy and cancel their pending removals
    pub fn purge_all(&mut self, scheduler: &mut Scheduler, events: &mut Vec<GameEvent>) -> usize {
        let count = self.enemies.len();
        for enemy in self.enemies.drain(..) {
            if let Some(task) = enemy.removal_task() {
                scheduler.cancel(task);
            }
            events.push(GameEvent::EnemyRemoved { id: enemy.id });
        }
        if count > 0 {
            log::info!("Purged {} enemies", count);
        }
        count
    }
}
