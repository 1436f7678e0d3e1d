//! Enemy agent: distance-driven state machine
//!
//! Idle -> Walking -> Attacking by distance to the player, recomputed every
//! tick. Dying is terminal: entered once at zero health, then the agent only
//! waits for its scheduled removal.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::geometry::LevelGeometry;
use super::health::{HealthChange, HealthLedger};
use super::player::Player;
use super::scheduler::{Scheduler, Task, TaskId};
use super::state::GameEvent;
use crate::consts::ENEMY_FALL_SPEED;
use crate::ticks_after;
use crate::settings::EnemySettings;

/// Stable enemy identifier, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

/// Enemy AI state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Idle,
    Walking,
    Attacking,
    Dying,
}

/// Resolve the state for a distance to the player. Rules are checked in order,
/// first match wins; nothing matched means Idle.
pub fn resolve_state(distance: f32, settings: &EnemySettings) -> EnemyState {
    let rules = [
        (settings.attack_radius, EnemyState::Attacking),
        (settings.chase_radius, EnemyState::Walking),
    ];
    rules
        .iter()
        .find(|(radius, _)| distance <= *radius)
        .map(|(_, state)| *state)
        .unwrap_or(EnemyState::Idle)
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EnemyId,
    pub name: String,
    pub position: Vec3,
    state: EnemyState,
    health: HealthLedger,
    next_attack_tick: u64,
    /// Current navigation destination; `None` when stopped
    nav_target: Option<Vec3>,
    removal_task: Option<TaskId>,
}

impl Enemy {
    pub fn new(id: EnemyId, position: Vec3, settings: &EnemySettings) -> Self {
        Self {
            id,
            name: format!("Zombie {}", id.0),
            position,
            state: EnemyState::Idle,
            health: HealthLedger::new(settings.max_health),
            next_attack_tick: 0,
            nav_target: None,
            removal_task: None,
        }
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn health(&self) -> &HealthLedger {
        &self.health
    }

    pub fn is_dying(&self) -> bool {
        self.state == EnemyState::Dying
    }

    pub fn nav_target(&self) -> Option<Vec3> {
        self.nav_target
    }

    /// Pending removal, if the death sequence has started
    pub fn removal_task(&self) -> Option<TaskId> {
        self.removal_task
    }

    /// Advance one tick. Returns the effect on the player's health if this enemy
    /// attacked.
    pub fn update(
        &mut self,
        player: &mut Player,
        settings: &EnemySettings,
        now: u64,
        dt: f32,
        geometry: &impl LevelGeometry,
        events: &mut Vec<GameEvent>,
    ) -> Option<HealthChange> {
        self.settle(geometry, dt);

        if self.is_dying() {
            return None;
        }

        let distance = self.position.distance(player.position);
        let resolved = resolve_state(distance, settings);
        if resolved != self.state {
            self.state = resolved;
            events.push(GameEvent::EnemyStateChanged {
                id: self.id,
                state: resolved,
            });
        }

        match self.state {
            EnemyState::Idle => None,
            EnemyState::Walking => {
                self.nav_target = Some(player.position);
                self.position = geometry.navigate(self.position, player.position, settings.move_speed * dt);
                None
            }
            EnemyState::Attacking => {
                if now < self.next_attack_tick {
                    return None;
                }
                self.next_attack_tick = ticks_after(now, settings.attack_interval);
                if !player.is_alive() {
                    return None;
                }
                log::debug!("{} hits the player for {}", self.name, settings.attack_damage);
                Some(player.health.apply_damage(settings.attack_damage))
            }
            EnemyState::Dying => None,
        }
    }

    /// Forward damage to the ledger. The first zero starts the death sequence:
    /// navigation halts and removal is scheduled `removal_delay` from `now`.
    pub fn take_damage(
        &mut self,
        amount: i32,
        settings: &EnemySettings,
        now: u64,
        scheduler: &mut Scheduler,
        events: &mut Vec<GameEvent>,
    ) -> HealthChange {
        log::debug!("{} takes {} damage", self.name, amount);
        let change = self.health.apply_damage(amount);
        if change == HealthChange::Died && !self.is_dying() {
            self.die(settings, now, scheduler, events);
        }
        change
    }

    fn die(&mut self, settings: &EnemySettings, now: u64, scheduler: &mut Scheduler, events: &mut Vec<GameEvent>) {
        log::debug!("{} is dying at {}", self.name, self.position);
        self.state = EnemyState::Dying;
        self.nav_target = None;
        let due = ticks_after(now, settings.removal_delay);
        self.removal_task = Some(scheduler.schedule(due, Task::RemoveEnemy(self.id)));
        events.push(GameEvent::EnemyStateChanged {
            id: self.id,
            state: EnemyState::Dying,
        });
        events.push(GameEvent::EnemyDied { id: self.id });
    }

    /// Fall toward the ground under the enemy
    fn settle(&mut self, geometry: &impl LevelGeometry, dt: f32) {
        if let Some(ground) = geometry.ground_below(self.position, f32::MAX) {
            self.position.y = (self.position.y - ENEMY_FALL_SPEED * dt).max(ground.y);
        }
    }
}
