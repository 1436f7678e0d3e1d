//! Crystal Hunt - enemy lifecycle and level progression core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (enemies, spawning, objectives, win/lose flow)
//! - `settings`: Data-driven tuning and level layout
//! - `error`: Error types for configuration loading

pub mod error;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::GameConfig;

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Enemy defaults
    pub const ENEMY_MAX_HEALTH: i32 = 100;
    pub const ENEMY_MOVE_SPEED: f32 = 3.5;
    pub const ENEMY_ATTACK_DAMAGE: i32 = 20;
    pub const ENEMY_ATTACK_INTERVAL: f32 = 1.5;
    pub const ENEMY_ATTACK_RADIUS: f32 = 2.0;
    pub const ENEMY_CHASE_RADIUS: f32 = 10.0;
    /// Seconds between entering Dying and removal from the live set
    pub const ENEMY_REMOVAL_DELAY: f32 = 3.0;
    /// Fall speed for enemies settling onto the ground (units/s)
    pub const ENEMY_FALL_SPEED: f32 = 9.0;
    /// Radius of the sphere used for hitscan against enemies
    pub const ENEMY_HIT_RADIUS: f32 = 0.75;

    /// Spawner defaults
    pub const SPAWN_RADIUS: f32 = 20.0;
    pub const SPAWN_MAX_POPULATION: usize = 20;
    pub const SPAWN_INTERVAL: f32 = 1.0;
    pub const SPAWN_INITIAL_COUNT: u32 = 5;
    /// Height above the candidate offset the ground ray starts from
    pub const SPAWN_RAY_HEIGHT: f32 = 50.0;
    /// Maximum length of the downward ground ray
    pub const SPAWN_RAY_DISTANCE: f32 = 300.0;
    /// Clearance above the ground hit point
    pub const SPAWN_CLEARANCE: f32 = 5.0;
    /// Fresh offsets tried before a spawn is skipped
    pub const SPAWN_MAX_GROUND_ATTEMPTS: u32 = 32;

    /// Player defaults
    pub const PLAYER_STARTING_HEALTH: i32 = 100;

    /// Level defaults
    pub const PORTAL_DISTANCE: f32 = 3.0;
    pub const PORTAL_RADIUS: f32 = 1.5;
    pub const PICKUP_RADIUS: f32 = 1.0;
    pub const RESPAWN_DELAY: f32 = 5.0;
    pub const KILL_PLANE_Y: f32 = -50.0;

    /// Weapon defaults
    pub const WEAPON_DAMAGE: i32 = 10;
    pub const WEAPON_AMMO_SIZE: u32 = 8;
    pub const WEAPON_FIRE_RATE: f32 = 5.0;
    pub const WEAPON_RELOAD_TIME: f32 = 2.0;
    pub const WEAPON_RANGE: f32 = 100.0;
}

/// Convert a duration in seconds to whole simulation ticks (rounded, never negative)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u64 {
    (secs.max(0.0) * consts::SIM_HZ as f32).round() as u64
}

/// Tick at which something `secs` after `now` comes due. Saturates, so an
/// absurdly long delay just never fires.
#[inline]
pub fn ticks_after(now: u64, secs: f32) -> u64 {
    now.saturating_add(secs_to_ticks(secs))
}

/// Project a world position onto the ground plane (x, z)
#[inline]
pub fn horizontal(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Lift a ground-plane offset back into world space at height `y`
#[inline]
pub fn from_horizontal(v: Vec2, y: f32) -> Vec3 {
    Vec3::new(v.x, y, v.y)
}
