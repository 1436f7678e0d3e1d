//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod enemy;
pub mod geometry;
pub mod health;
pub mod level;
pub mod objectives;
pub mod player;
pub mod scheduler;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod weapon;

pub use enemy::{Enemy, EnemyId, EnemyState, resolve_state};
pub use geometry::{FlatGround, LevelGeometry};
pub use health::{HealthChange, HealthDisplay, HealthLedger};
pub use objectives::{Objective, ObjectiveId, ObjectiveTracker, Pickup};
pub use player::Player;
pub use scheduler::{Scheduler, Task, TaskId};
pub use spawner::{Population, SpawnOutcome, sample_disk};
pub use state::{GameEvent, Hud, LevelPhase, LevelState, Portal};
pub use tick::{PlayerPose, TickInput, tick};
pub use weapon::{DamageEvent, DamageTarget, FireOutcome, Weapon};
