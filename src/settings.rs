//! Game tuning and level layout
//!
//! Loaded from a JSON file; every section and field falls back to its default
//! so a config only needs to list what it overrides.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Player tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub starting_health: i32,
    /// Health text colour at full health (linear RGB)
    pub full_health_color: Vec3,
    /// Health text colour at zero health (linear RGB)
    pub low_health_color: Vec3,
    /// Where the player stands when the level (re)loads
    pub spawn_position: Vec3,
    pub spawn_forward: Vec3,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            starting_health: PLAYER_STARTING_HEALTH,
            full_health_color: Vec3::new(0.0, 1.0, 0.0),
            low_health_color: Vec3::new(1.0, 0.0, 0.0),
            spawn_position: Vec3::new(0.0, 1.0, 0.0),
            spawn_forward: Vec3::Z,
        }
    }
}

/// Enemy tuning (shared by every spawned enemy)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemySettings {
    pub max_health: i32,
    pub move_speed: f32,
    pub attack_damage: i32,
    /// Seconds between attacks
    pub attack_interval: f32,
    pub attack_radius: f32,
    pub chase_radius: f32,
    /// Seconds from death to removal
    pub removal_delay: f32,
    pub hit_radius: f32,
}

impl Default for EnemySettings {
    fn default() -> Self {
        Self {
            max_health: ENEMY_MAX_HEALTH,
            move_speed: ENEMY_MOVE_SPEED,
            attack_damage: ENEMY_ATTACK_DAMAGE,
            attack_interval: ENEMY_ATTACK_INTERVAL,
            attack_radius: ENEMY_ATTACK_RADIUS,
            chase_radius: ENEMY_CHASE_RADIUS,
            removal_delay: ENEMY_REMOVAL_DELAY,
            hit_radius: ENEMY_HIT_RADIUS,
        }
    }
}

/// Spawner tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerSettings {
    /// Centre of the spawn disk
    pub origin: Vec3,
    pub spawn_radius: f32,
    pub max_population: usize,
    /// Seconds between recurring spawns
    pub spawn_interval: f32,
    pub initial_count: u32,
    pub ray_height: f32,
    pub ray_distance: f32,
    pub clearance: f32,
    pub max_ground_attempts: u32,
}

impl Default for SpawnerSettings {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            spawn_radius: SPAWN_RADIUS,
            max_population: SPAWN_MAX_POPULATION,
            spawn_interval: SPAWN_INTERVAL,
            initial_count: SPAWN_INITIAL_COUNT,
            ray_height: SPAWN_RAY_HEIGHT,
            ray_distance: SPAWN_RAY_DISTANCE,
            clearance: SPAWN_CLEARANCE,
            max_ground_attempts: SPAWN_MAX_GROUND_ATTEMPTS,
        }
    }
}

/// Level layout and progression
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSettings {
    /// Crystal positions, registered on every level load
    pub crystals: Vec<Vec3>,
    pub pickup_radius: f32,
    /// Distance in front of the player the portal appears at
    pub portal_distance: f32,
    pub portal_radius: f32,
    /// Seconds between death and reload
    pub respawn_delay: f32,
    /// Level entry point requested on reload
    pub reload_entry: u32,
    /// Level entry point requested when the player enters the portal
    pub next_level: u32,
    /// Actors below this height are killed
    pub kill_plane_y: f32,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            crystals: vec![
                Vec3::new(8.0, 1.0, 8.0),
                Vec3::new(-10.0, 1.0, 4.0),
                Vec3::new(3.0, 1.0, -12.0),
            ],
            pickup_radius: PICKUP_RADIUS,
            portal_distance: PORTAL_DISTANCE,
            portal_radius: PORTAL_RADIUS,
            respawn_delay: RESPAWN_DELAY,
            reload_entry: 0,
            next_level: 1,
            kill_plane_y: KILL_PLANE_Y,
        }
    }
}

/// Weapon tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponSettings {
    pub damage: i32,
    pub ammo_size: u32,
    /// Shots per second
    pub fire_rate: f32,
    /// Seconds
    pub reload_time: f32,
    pub range: f32,
}

impl Default for WeaponSettings {
    fn default() -> Self {
        Self {
            damage: WEAPON_DAMAGE,
            ammo_size: WEAPON_AMMO_SIZE,
            fire_rate: WEAPON_FIRE_RATE,
            reload_time: WEAPON_RELOAD_TIME,
            range: WEAPON_RANGE,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerSettings,
    pub enemy: EnemySettings,
    pub spawner: SpawnerSettings,
    pub level: LevelSettings,
    pub weapon: WeaponSettings,
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Pretty JSON, suitable as a starting template
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player.starting_health < 1 {
            return Err(ConfigError::invalid("player.starting_health", "must be at least 1"));
        }
        if self.enemy.max_health < 1 {
            return Err(ConfigError::invalid("enemy.max_health", "must be at least 1"));
        }
        if self.enemy.attack_radius < 0.0 || self.enemy.chase_radius < 0.0 {
            return Err(ConfigError::invalid("enemy.attack_radius", "radii must not be negative"));
        }
        if self.enemy.attack_interval <= 0.0 {
            return Err(ConfigError::invalid("enemy.attack_interval", "must be positive"));
        }
        if self.spawner.spawn_radius < 0.0 {
            return Err(ConfigError::invalid("spawner.spawn_radius", "must not be negative"));
        }
        if self.spawner.spawn_interval <= 0.0 {
            return Err(ConfigError::invalid("spawner.spawn_interval", "must be positive"));
        }
        if self.spawner.ray_distance <= 0.0 {
            return Err(ConfigError::invalid("spawner.ray_distance", "must be positive"));
        }
        if self.weapon.fire_rate <= 0.0 {
            return Err(ConfigError::invalid("weapon.fire_rate", "must be positive"));
        }
        if self.enemy.chase_radius < self.enemy.attack_radius {
            log::warn!(
                "enemy.chase_radius ({}) is below attack_radius ({}), enemies will never walk",
                self.enemy.chase_radius,
                self.enemy.attack_radius
            );
        }
        Ok(())
    }
}
