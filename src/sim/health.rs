//! Bounded integer health shared by the player and every enemy

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Result of a damage or heal call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthChange {
    /// Owner was already dead, nothing happened
    Ignored,
    /// Value changed (or was clamped) and the owner is still alive
    Changed { current: i32 },
    /// This call took health to zero; reported once per ledger
    Died,
}

/// Text and colour for a health readout
#[derive(Debug, Clone, PartialEq)]
pub struct HealthDisplay {
    pub text: String,
    pub color: Vec3,
}

/// Health ledger owned by a single actor
///
/// `current` always stays in `0..=max`. Once it reaches zero the ledger is dead
/// for good: damage and heal become no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthLedger {
    current: i32,
    max: i32,
}

impl HealthLedger {
    /// Create a full ledger. `max` is raised to 1 so an actor is never born dead.
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Health as a fraction of max, clamped to [0, 1]
    pub fn fraction(&self) -> f32 {
        (self.current as f32 / self.max as f32).clamp(0.0, 1.0)
    }

    pub fn apply_damage(&mut self, amount: i32) -> HealthChange {
        if !self.is_alive() {
            return HealthChange::Ignored;
        }
        self.current = self.current.saturating_sub(amount).clamp(0, self.max);
        if self.current == 0 {
            HealthChange::Died
        } else {
            HealthChange::Changed {
                current: self.current,
            }
        }
    }

    pub fn heal(&mut self, amount: i32) -> HealthChange {
        if !self.is_alive() {
            return HealthChange::Ignored;
        }
        // Negative heal may not kill
        self.current = self.current.saturating_add(amount).clamp(1, self.max);
        HealthChange::Changed {
            current: self.current,
        }
    }

    /// Readout interpolated from `low` (empty) to `full`
    pub fn display(&self, low: Vec3, full: Vec3) -> HealthDisplay {
        HealthDisplay {
            text: format!("HP: {}", self.current),
            color: low.lerp(full, self.fraction()),
        }
    }
}
