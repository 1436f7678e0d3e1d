//! Hitscan weapon: magazine, fire-rate gate, delayed reload
//!
//! Produces damage events; it never touches health directly.

use glam::Vec3;

use super::enemy::{Enemy, EnemyId};
use super::geometry::ray_sphere;
use super::scheduler::{Scheduler, Task, TaskId};
use crate::ticks_after;
use crate::settings::WeaponSettings;

/// Who a damage event is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageTarget {
    Player,
    Enemy(EnemyId),
}

/// `amount` of damage routed to `target`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageEvent {
    pub amount: i32,
    pub target: DamageTarget,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FireOutcome {
    /// Reload in progress
    Reloading,
    /// Fire rate gate not yet open
    Cooldown,
    /// Trigger pulled on an empty magazine
    Empty,
    /// Round spent; `hit` is the first enemy on the ray and its distance
    Fired { hit: Option<(EnemyId, f32)> },
}

#[derive(Debug, Clone)]
pub struct Weapon {
    ammo: u32,
    next_fire_tick: u64,
    reload_task: Option<TaskId>,
}

impl Weapon {
    pub fn new(settings: &WeaponSettings) -> Self {
        Self {
            ammo: settings.ammo_size,
            next_fire_tick: 0,
            reload_task: None,
        }
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_task.is_some()
    }

    pub fn ammo_text(&self, settings: &WeaponSettings) -> String {
        format!("{}/{}", self.ammo, settings.ammo_size)
    }

    /// Pull the trigger from `eye` along `forward`
    pub fn fire(
        &mut self,
        eye: Vec3,
        forward: Vec3,
        enemies: &[Enemy],
        hit_radius: f32,
        settings: &WeaponSettings,
        now: u64,
    ) -> FireOutcome {
        if self.is_reloading() {
            return FireOutcome::Reloading;
        }
        if now < self.next_fire_tick {
            return FireOutcome::Cooldown;
        }
        self.next_fire_tick = ticks_after(now, 1.0 / settings.fire_rate).max(now.saturating_add(1));

        if self.ammo == 0 {
            return FireOutcome::Empty;
        }
        self.ammo -= 1;

        let Some(dir) = forward.try_normalize() else {
            return FireOutcome::Fired { hit: None };
        };
        let origin = eye + dir * 0.5;
        let hit = enemies
            .iter()
            .filter_map(|e| ray_sphere(origin, dir, e.position, hit_radius, settings.range).map(|t| (e.id, t)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        FireOutcome::Fired { hit }
    }

    /// Start a reload; false if one is already running
    pub fn start_reload(&mut self, settings: &WeaponSettings, now: u64, scheduler: &mut Scheduler) -> bool {
        if self.is_reloading() {
            return false;
        }
        let due = ticks_after(now, settings.reload_time);
        self.reload_task = Some(scheduler.schedule(due, Task::FinishWeaponReload));
        true
    }

    /// Called when the reload task comes due
    pub fn finish_reload(&mut self, settings: &WeaponSettings) {
        self.reload_task = None;
        self.ammo = settings.ammo_size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secs_to_ticks;
    use crate::settings::EnemySettings;

    fn enemy_at(id: u32, position: Vec3) -> Enemy {
        Enemy::new(EnemyId(id), position, &EnemySettings::default())
    }

    #[test]
    fn test_fire_hits_nearest_enemy_on_ray() {
        let settings = WeaponSettings::default();
        let mut weapon = Weapon::new(&settings);
        let enemies = vec![
            enemy_at(1, Vec3::new(0.0, 0.0, 20.0)),
            enemy_at(2, Vec3::new(0.0, 0.0, 10.0)),
            enemy_at(3, Vec3::new(5.0, 0.0, 5.0)),
        ];

        match weapon.fire(Vec3::ZERO, Vec3::Z, &enemies, 0.75, &settings, 0) {
            FireOutcome::Fired { hit: Some((id, _)) } => assert_eq!(id, EnemyId(2)),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(weapon.ammo(), settings.ammo_size - 1);
    }

    #[test]
    fn test_fire_rate_gate() {
        let settings = WeaponSettings::default();
        let mut weapon = Weapon::new(&settings);
        let gap = secs_to_ticks(1.0 / settings.fire_rate);

        assert!(matches!(weapon.fire(Vec3::ZERO, Vec3::Z, &[], 0.75, &settings, 0), FireOutcome::Fired { hit: None }));
        assert_eq!(weapon.fire(Vec3::ZERO, Vec3::Z, &[], 0.75, &settings, gap - 1), FireOutcome::Cooldown);
        assert!(matches!(weapon.fire(Vec3::ZERO, Vec3::Z, &[], 0.75, &settings, gap), FireOutcome::Fired { .. }));
    }

    #[test]
    fn test_empty_then_reload() {
        let settings = WeaponSettings {
            ammo_size: 1,
            ..Default::default()
        };
        let mut weapon = Weapon::new(&settings);
        let mut scheduler = Scheduler::new();

        assert!(matches!(weapon.fire(Vec3::ZERO, Vec3::Z, &[], 0.75, &settings, 0), FireOutcome::Fired { .. }));
        assert_eq!(weapon.fire(Vec3::ZERO, Vec3::Z, &[], 0.75, &settings, 100), FireOutcome::Empty);

        assert!(weapon.start_reload(&settings, 100, &mut scheduler));
        assert!(!weapon.start_reload(&settings, 101, &mut scheduler));
        assert_eq!(weapon.fire(Vec3::ZERO, Vec3::Z, &[], 0.75, &settings, 200), FireOutcome::Reloading);

        let due = 100 + secs_to_ticks(settings.reload_time);
        assert_eq!(scheduler.take_due(due), vec![Task::FinishWeaponReload]);
        weapon.finish_reload(&settings);
        assert_eq!(weapon.ammo_text(&settings), "1/1");
    }

    #[test]
    fn test_tiny_fire_rate_saturates_cooldown() {
        let settings = WeaponSettings {
            fire_rate: 1e-30,
            ..Default::default()
        };
        let mut weapon = Weapon::new(&settings);

        assert!(matches!(weapon.fire(Vec3::ZERO, Vec3::Z, &[], 0.75, &settings, 3), FireOutcome::Fired { .. }));
        assert_eq!(weapon.fire(Vec3::ZERO, Vec3::Z, &[], 0.75, &settings, 1_000_000), FireOutcome::Cooldown);
        assert_eq!(weapon.ammo(), settings.ammo_size - 1);
    }
}
