//! Level coordination: objective HUD, win and lose sequences, portal, kill plane
//!
//! Win and lose are latched one-shots. Opening the portal a second time or
//! dying twice in a row never repeats the purge, the placement, or the reload.

use glam::Vec3;

use super::enemy::EnemyId;
use super::geometry::LevelGeometry;
use super::health::HealthChange;
use super::objectives::{ObjectiveId, Pickup};
use super::scheduler::Task;
use super::state::{GameEvent, LevelPhase, LevelState};
use super::weapon::{DamageEvent, DamageTarget};
use crate::ticks_after;

impl LevelState {
    /// Add a crystal to the level
    pub fn register_objective(&mut self, position: Vec3) -> ObjectiveId {
        let id = self.objectives.register(position);
        self.refresh_objective_display();
        id
    }

    pub fn refresh_objective_display(&mut self) {
        self.hud.objective_text = format!("{} crystals left!", self.objectives.remaining());
    }

    /// Player picked up a crystal
    pub fn collect_objective(&mut self, id: ObjectiveId) -> Option<Pickup> {
        let pickup = self.objectives.collect(id)?;
        log::info!("Crystal collected, {} left", pickup.remaining);
        self.events.push(GameEvent::CrystalCollected {
            id,
            remaining: pickup.remaining,
        });
        self.refresh_objective_display();
        if pickup.cleared {
            self.check_win_condition();
        }
        Some(pickup)
    }

    /// Open the portal if every crystal is collected. Returns true only on the
    /// call that actually opened it.
    pub fn check_win_condition(&mut self) -> bool {
        if self.objectives.remaining() != 0 || self.portal.active || self.lose_started {
            return false;
        }

        self.portal.active = true;
        self.population.purge_all(&mut self.scheduler, &mut self.events);
        self.portal.position = self.player.position + self.player.forward * self.config.level.portal_distance;
        self.phase = LevelPhase::PortalOpen;
        log::info!("All crystals collected, portal open at {}", self.portal.position);
        self.events.push(GameEvent::PortalOpened {
            position: self.portal.position,
        });
        true
    }

    /// Start the death sequence. Returns false if it is already running.
    pub fn lose_sequence(&mut self) -> bool {
        if self.lose_started {
            return false;
        }
        self.lose_started = true;
        self.hud.death_message_visible = true;
        self.population.purge_all(&mut self.scheduler, &mut self.events);
        self.phase = LevelPhase::Dead;

        let due = ticks_after(self.time_ticks, self.config.level.respawn_delay);
        self.scheduler.schedule(due, Task::ReloadLevel);
        log::info!("Player died, reloading in {}s", self.config.level.respawn_delay);
        self.events.push(GameEvent::PlayerDied);
        true
    }

    /// Second half of the death sequence, run when the reload task comes due
    pub fn finish_lose_sequence(&mut self, geometry: &impl LevelGeometry) {
        self.population.purge_all(&mut self.scheduler, &mut self.events);
        let entry = self.config.level.reload_entry;
        log::info!("Reloading level entry {}", entry);
        self.events.push(GameEvent::LoadLevel { entry });
        self.load_level(geometry);
    }

    /// Request the next level once the player stands in the open portal
    pub fn check_portal_entry(&mut self) -> bool {
        if self.phase != LevelPhase::PortalOpen || !self.player.is_alive() {
            return false;
        }
        if self.player.position.distance(self.portal.position) > self.config.level.portal_radius {
            return false;
        }
        let entry = self.config.level.next_level;
        log::info!("Player entered portal, loading level entry {}", entry);
        self.phase = LevelPhase::Exited;
        self.events.push(GameEvent::LoadLevel { entry });
        true
    }

    pub fn damage_player(&mut self, amount: i32) -> HealthChange {
        let change = self.player.health.apply_damage(amount);
        self.on_player_health_change(change);
        change
    }

    pub fn heal_player(&mut self, amount: i32) -> HealthChange {
        let change = self.player.health.heal(amount);
        self.on_player_health_change(change);
        change
    }

    pub(crate) fn on_player_health_change(&mut self, change: HealthChange) {
        match change {
            HealthChange::Ignored => {}
            HealthChange::Changed { current } => {
                self.refresh_health_display();
                self.events.push(GameEvent::PlayerHealthChanged { current });
            }
            HealthChange::Died => {
                self.refresh_health_display();
                self.events.push(GameEvent::PlayerHealthChanged { current: 0 });
                self.lose_sequence();
            }
        }
    }

    /// `None` if the enemy is not in the live set
    pub fn damage_enemy(&mut self, id: EnemyId, amount: i32) -> Option<HealthChange> {
        let now = self.time_ticks;
        let enemy = self.population.get_mut(id)?;
        Some(enemy.take_damage(amount, &self.config.enemy, now, &mut self.scheduler, &mut self.events))
    }

    /// Route a damage event to its target
    pub fn apply_damage(&mut self, event: DamageEvent) -> Option<HealthChange> {
        match event.target {
            DamageTarget::Player => Some(self.damage_player(event.amount)),
            DamageTarget::Enemy(id) => self.damage_enemy(id, event.amount),
        }
    }

    /// Kill any actor that fell below the kill plane
    pub fn apply_kill_plane(&mut self) {
        let kill_y = self.config.level.kill_plane_y;
        if self.player.is_alive() && self.player.position.y < kill_y {
            log::info!("Player fell below the kill plane");
            self.damage_player(self.player.health.max());
        }

        let fallen: Vec<EnemyId> = self
            .population
            .enemies()
            .iter()
            .filter(|e| !e.is_dying() && e.position.y < kill_y)
            .map(|e| e.id)
            .collect();
        for id in fallen {
            self.damage_enemy(id, self.config.enemy.max_health);
        }
    }
}
