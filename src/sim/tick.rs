//! Fixed timestep simulation tick
//!
//! Core loop that advances a level deterministically, one tick at a time.

use glam::Vec3;

use super::geometry::LevelGeometry;
use super::health::HealthChange;
use super::scheduler::Task;
use super::state::{LevelPhase, LevelState};
use super::weapon::{DamageEvent, FireOutcome};

/// Player pose reported by the movement controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPose {
    pub position: Vec3,
    pub forward: Vec3,
    pub grounded: bool,
}

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// New pose; `None` keeps the previous one
    pub pose: Option<PlayerPose>,
    /// Trigger held
    pub fire: bool,
    /// Reload pressed
    pub reload: bool,
    /// Damage produced outside the sim (other weapons, hazards)
    pub damage: Vec<DamageEvent>,
}

/// Advance the level by one fixed timestep
pub fn tick(state: &mut LevelState, input: &TickInput, dt: f32, geometry: &impl LevelGeometry) {
    // Host is expected to load the next level
    if state.phase == LevelPhase::Exited {
        return;
    }

    state.time_ticks += 1;
    let now = state.time_ticks;

    if let Some(pose) = input.pose {
        if state.player.is_alive() {
            state.player.set_pose(pose.position, pose.forward, pose.grounded);
        }
    }

    // Deferred tasks
    let mut reloaded = false;
    for task in state.scheduler.take_due(now) {
        match task {
            Task::RemoveEnemy(id) => {
                state.population.remove(id, &mut state.scheduler, &mut state.events);
            }
            Task::FinishWeaponReload => {
                state.weapon.finish_reload(&state.config.weapon);
                state.refresh_ammo_display();
            }
            Task::ReloadLevel => {
                state.finish_lose_sequence(geometry);
                reloaded = true;
            }
        }
    }
    if reloaded || state.phase == LevelPhase::Dead {
        return;
    }

    for event in &input.damage {
        state.apply_damage(*event);
    }

    update_weapon(state, input, now);
    update_enemies(state, dt, now, geometry);

    if state.phase == LevelPhase::Playing {
        state.population.tick_spawn_timer(
            &state.config.spawner,
            &state.config.enemy,
            &mut state.rng,
            geometry,
            &mut state.events,
        );
    }

    if state.player.is_alive() {
        let touched = state
            .objectives
            .overlapping(state.player.position, state.config.level.pickup_radius);
        for id in touched {
            state.collect_objective(id);
        }
    }

    state.check_portal_entry();
    state.apply_kill_plane();
}

fn update_weapon(state: &mut LevelState, input: &TickInput, now: u64) {
    if !state.player.is_alive() {
        return;
    }
    if input.reload && state.weapon.start_reload(&state.config.weapon, now, &mut state.scheduler) {
        log::debug!("Reloading");
    }
    if !input.fire {
        return;
    }

    let outcome = state.weapon.fire(
        state.player.position,
        state.player.forward,
        state.population.enemies(),
        state.config.enemy.hit_radius,
        &state.config.weapon,
        now,
    );
    match outcome {
        FireOutcome::Fired { hit } => {
            state.refresh_ammo_display();
            if let Some((id, distance)) = hit {
                log::debug!("Shot hit enemy {:?} at {:.1}", id, distance);
                state.damage_enemy(id, state.config.weapon.damage);
            }
        }
        FireOutcome::Empty => log::debug!("Click - magazine empty"),
        FireOutcome::Cooldown | FireOutcome::Reloading => {}
    }
}

fn update_enemies(state: &mut LevelState, dt: f32, now: u64, geometry: &impl LevelGeometry) {
    let mut player_changes: Vec<HealthChange> = Vec::new();
    for enemy in state.population.enemies_mut() {
        let change = enemy.update(
            &mut state.player,
            &state.config.enemy,
            now,
            dt,
            geometry,
            &mut state.events,
        );
        player_changes.extend(change);
    }
    for change in player_changes {
        state.on_player_health_change(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::secs_to_ticks;
    use crate::settings::GameConfig;
    use crate::sim::enemy::EnemyState;
    use crate::sim::geometry::FlatGround;
    use crate::sim::spawner::SpawnOutcome;
    use crate::sim::state::GameEvent;
    use crate::sim::weapon::DamageTarget;

    /// Config with no enemies and a player far from every crystal
    fn quiet_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.spawner.initial_count = 0;
        config.spawner.spawn_interval = 10_000.0;
        config
    }

    fn pose(position: Vec3) -> TickInput {
        TickInput {
            pose: Some(PlayerPose {
                position,
                forward: Vec3::Z,
                grounded: true,
            }),
            ..Default::default()
        }
    }

    fn damage(amount: i32, target: DamageTarget) -> TickInput {
        TickInput {
            damage: vec![DamageEvent { amount, target }],
            ..Default::default()
        }
    }

    fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
        events.iter().filter(|e| pred(*e)).count()
    }

    #[test]
    fn test_collecting_all_crystals_opens_portal_once() {
        let ground = FlatGround::new(0.0);
        let mut config = GameConfig::default();
        config.spawner.spawn_radius = 5.0;
        let mut state = LevelState::new(config.clone(), 11, &ground);
        assert_eq!((state.objectives.total(), state.objectives.remaining()), (3, 3));
        assert!(!state.population.is_empty());

        for crystal in &config.level.crystals {
            tick(&mut state, &pose(*crystal), SIM_DT, &ground);
        }
        // Standing on the last crystal for a while changes nothing
        for _ in 0..10 {
            tick(&mut state, &pose(config.level.crystals[2]), SIM_DT, &ground);
        }

        let events = state.drain_events();
        assert!(state.portal.active);
        assert_eq!(state.objectives.remaining(), 0);
        assert!(state.population.is_empty());
        assert_eq!(count(&events, |e| matches!(e, GameEvent::PortalOpened { .. })), 1);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::CrystalCollected { .. })), 3);
    }

    #[test]
    fn test_no_spawns_after_portal_opens() {
        let ground = FlatGround::new(0.0);
        let mut config = GameConfig::default();
        config.spawner.spawn_interval = 0.1;
        let mut state = LevelState::new(config.clone(), 5, &ground);
        for crystal in &config.level.crystals {
            tick(&mut state, &pose(*crystal), SIM_DT, &ground);
        }
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), SIM_DT, &ground);
        }
        assert!(state.population.is_empty());
    }

    #[test]
    fn test_player_damage_sequence_triggers_lose_once() {
        let ground = FlatGround::new(0.0);
        let mut state = LevelState::new(quiet_config(), 1, &ground);

        tick(&mut state, &damage(20, DamageTarget::Player), SIM_DT, &ground);
        assert_eq!(state.player.health.current(), 80);
        tick(&mut state, &damage(30, DamageTarget::Player), SIM_DT, &ground);
        assert_eq!(state.player.health.current(), 50);
        assert!(!state.lose_started());
        tick(&mut state, &damage(60, DamageTarget::Player), SIM_DT, &ground);
        assert_eq!(state.player.health.current(), 0);
        assert!(state.lose_started());
        assert!(state.hud.death_message_visible);

        // Damage while dead is ignored
        tick(&mut state, &damage(10, DamageTarget::Player), SIM_DT, &ground);
        let events = state.drain_events();
        assert_eq!(count(&events, |e| matches!(e, GameEvent::PlayerDied)), 1);
        assert_eq!(state.hud.health.text, "HP: 0");
    }

    #[test]
    fn test_level_reloads_after_respawn_delay() {
        let ground = FlatGround::new(0.0);
        let config = GameConfig::default();
        let mut state = LevelState::new(config.clone(), 8, &ground);
        let first = state.objectives.objectives()[0].position;
        tick(&mut state, &pose(first), SIM_DT, &ground);
        assert_eq!(state.objectives.remaining(), 2);

        tick(&mut state, &damage(1000, DamageTarget::Player), SIM_DT, &ground);
        assert_eq!(state.phase, LevelPhase::Dead);
        assert!(state.population.is_empty());
        state.drain_events();

        let delay = secs_to_ticks(config.level.respawn_delay);
        for _ in 0..delay - 1 {
            tick(&mut state, &TickInput::default(), SIM_DT, &ground);
        }
        // No spawning while dead
        assert!(state.population.is_empty());
        assert_eq!(state.phase, LevelPhase::Dead);

        tick(&mut state, &TickInput::default(), SIM_DT, &ground);
        let events = state.drain_events();
        assert_eq!(count(&events, |e| *e == GameEvent::LoadLevel { entry: 0 }), 1);
        assert_eq!(state.phase, LevelPhase::Playing);
        assert_eq!(state.objectives.remaining(), 3);
        assert_eq!(state.player.health.current(), 100);
        assert_eq!(state.population.len(), config.spawner.initial_count as usize);
    }

    #[test]
    fn test_spawn_cap_scenario() {
        let ground = FlatGround::new(0.0);
        let mut config = quiet_config();
        config.spawner.max_population = 2;
        let mut state = LevelState::new(config, 4, &ground);

        let mut outcomes = Vec::new();
        for _ in 0..3 {
            outcomes.push(state.population.spawn_one(
                &state.config.spawner,
                &state.config.enemy,
                &mut state.rng,
                &ground,
                &mut state.events,
            ));
        }
        assert!(matches!(outcomes[0], SpawnOutcome::Spawned(_)));
        assert!(matches!(outcomes[1], SpawnOutcome::Spawned(_)));
        assert_eq!(outcomes[2], SpawnOutcome::AtCapacity);
        assert_eq!(state.population.len(), 2);
    }

    #[test]
    fn test_overkill_enemy_removed_after_delay() {
        let ground = FlatGround::new(0.0);
        let mut config = quiet_config();
        config.spawner.initial_count = 1;
        let mut state = LevelState::new(config.clone(), 6, &ground);
        // Keep the player out of chase range
        tick(&mut state, &pose(Vec3::new(500.0, 1.0, 500.0)), SIM_DT, &ground);
        let id = state.population.enemies()[0].id;
        state.drain_events();

        tick(&mut state, &damage(120, DamageTarget::Enemy(id)), SIM_DT, &ground);
        let died_at = state.time_ticks;
        let enemy = state.population.get(id).unwrap();
        assert_eq!(enemy.health().current(), 0);
        assert_eq!(enemy.state(), EnemyState::Dying);

        let delay = secs_to_ticks(config.enemy.removal_delay);
        while state.time_ticks < died_at + delay - 1 {
            tick(&mut state, &damage(10, DamageTarget::Enemy(id)), SIM_DT, &ground);
        }
        assert!(state.population.get(id).is_some());

        tick(&mut state, &TickInput::default(), SIM_DT, &ground);
        assert!(state.population.get(id).is_none());

        let events = state.drain_events();
        let dying = count(&events, |e| {
            *e == GameEvent::EnemyStateChanged {
                id,
                state: EnemyState::Dying,
            }
        });
        assert_eq!(dying, 1);
        assert_eq!(count(&events, |e| *e == GameEvent::EnemyRemoved { id }), 1);
    }

    #[test]
    fn test_enemy_chases_and_attacks_player() {
        let ground = FlatGround::new(0.0);
        let mut config = quiet_config();
        config.spawner.initial_count = 1;
        config.spawner.spawn_radius = 0.0;
        config.spawner.origin = Vec3::new(0.0, 0.0, 8.0);
        let mut state = LevelState::new(config, 2, &ground);
        let id = state.population.enemies()[0].id;

        let mut saw_walking = false;
        for _ in 0..600 {
            tick(&mut state, &pose(Vec3::new(0.0, 1.0, 0.0)), SIM_DT, &ground);
            saw_walking |= state.population.get(id).is_some_and(|e| e.state() == EnemyState::Walking);
            if state.player.health.current() < 100 {
                break;
            }
        }
        assert!(saw_walking);
        assert_eq!(state.player.health.current(), 80);
        assert_eq!(state.population.get(id).map(|e| e.state()), Some(EnemyState::Attacking));
    }

    #[test]
    fn test_shooting_kills_enemy() {
        let ground = FlatGround::new(0.0);
        let mut config = quiet_config();
        config.spawner.initial_count = 1;
        config.spawner.spawn_radius = 0.0;
        config.spawner.clearance = 0.0;
        config.spawner.origin = Vec3::new(0.0, 0.0, 50.0);
        config.weapon.damage = 50;
        let mut state = LevelState::new(config, 2, &ground);
        let id = state.population.enemies()[0].id;

        let aim = TickInput {
            pose: Some(PlayerPose {
                position: Vec3::new(0.0, 0.0, 0.0),
                forward: Vec3::Z,
                grounded: true,
            }),
            fire: true,
            ..Default::default()
        };
        // Two shots at 12-tick spacing
        for _ in 0..20 {
            tick(&mut state, &aim, SIM_DT, &ground);
        }
        assert!(state.population.get(id).is_some_and(|e| e.is_dying()));
        assert_eq!(state.hud.ammo_text, "6/8");
    }

    #[test]
    fn test_reload_refills_hud() {
        let ground = FlatGround::new(0.0);
        let config = quiet_config();
        let mut state = LevelState::new(config.clone(), 2, &ground);

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, SIM_DT, &ground);
        assert_eq!(state.hud.ammo_text, "7/8");

        let reload = TickInput {
            reload: true,
            ..Default::default()
        };
        tick(&mut state, &reload, SIM_DT, &ground);
        for _ in 0..secs_to_ticks(config.weapon.reload_time) {
            tick(&mut state, &TickInput::default(), SIM_DT, &ground);
        }
        assert_eq!(state.hud.ammo_text, "8/8");
        assert!(!state.weapon.is_reloading());
    }

    #[test]
    fn test_determinism() {
        let ground = FlatGround::new(0.0);
        let mut a = LevelState::new(GameConfig::default(), 99, &ground);
        let mut b = LevelState::new(GameConfig::default(), 99, &ground);
        let inputs = [
            pose(Vec3::new(2.0, 1.0, 2.0)),
            TickInput {
                fire: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        for _ in 0..200 {
            for input in &inputs {
                tick(&mut a, input, SIM_DT, &ground);
                tick(&mut b, input, SIM_DT, &ground);
            }
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.population.len(), b.population.len());
        assert_eq!(a.player.health.current(), b.player.health.current());
        assert_eq!(a.drain_events(), b.drain_events());
    }

    #[test]
    fn test_huge_respawn_delay_keeps_level_dead() {
        let ground = FlatGround::new(0.0);
        let mut config = GameConfig::from_json(r#"{ "level": { "respawn_delay": 1e30 } }"#).unwrap();
        config.spawner.initial_count = 0;
        let mut state = LevelState::new(config, 2, &ground);

        tick(&mut state, &damage(1000, DamageTarget::Player), SIM_DT, &ground);
        assert_eq!(state.phase, LevelPhase::Dead);
        assert_eq!(state.scheduler.len(), 1);

        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), SIM_DT, &ground);
        }
        assert_eq!(state.phase, LevelPhase::Dead);
        assert_eq!(state.load_count, 1);
    }

    #[test]
    fn test_tiny_fire_rate_fires_once() {
        let ground = FlatGround::new(0.0);
        let mut config = GameConfig::from_json(r#"{ "weapon": { "fire_rate": 1e-30 } }"#).unwrap();
        config.spawner.initial_count = 0;
        let mut state = LevelState::new(config, 2, &ground);
        let input = TickInput {
            fire: true,
            ..Default::default()
        };

        for _ in 0..30 {
            tick(&mut state, &input, SIM_DT, &ground);
        }
        assert_eq!(state.hud.ammo_text, "7/8");
    }
}
