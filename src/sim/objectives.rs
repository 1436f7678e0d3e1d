//! Crystal bookkeeping for the current level

use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectiveId(pub u32);

/// A collectible crystal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    pub id: ObjectiveId,
    pub position: Vec3,
}

/// Outcome of a successful pickup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickup {
    pub remaining: u32,
    /// True only on the pickup that took `remaining` to zero
    pub cleared: bool,
}

/// Total/remaining counters plus the live crystals
///
/// Owned by the level state and reset on every level load.
#[derive(Debug, Clone, Default)]
pub struct ObjectiveTracker {
    total: u32,
    remaining: u32,
    objectives: Vec<Objective>,
    next_id: u32,
    cleared_reported: bool,
}

impl ObjectiveTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn register(&mut self, position: Vec3) -> ObjectiveId {
        let id = ObjectiveId(self.next_id);
        self.next_id += 1;
        self.objectives.push(Objective { id, position });
        self.total += 1;
        self.remaining += 1;
        id
    }

    /// Collect a crystal. `None` if it was already collected or never existed.
    pub fn collect(&mut self, id: ObjectiveId) -> Option<Pickup> {
        let index = self.objectives.iter().position(|o| o.id == id)?;
        self.objectives.remove(index);
        self.remaining = self.remaining.saturating_sub(1);

        let cleared = self.remaining == 0 && !self.cleared_reported;
        if cleared {
            self.cleared_reported = true;
        }
        Some(Pickup {
            remaining: self.remaining,
            cleared,
        })
    }

    /// Crystals whose trigger region contains `point`
    pub fn overlapping(&self, point: Vec3, radius: f32) -> Vec<ObjectiveId> {
        self.objectives
            .iter()
            .filter(|o| o.position.distance(point) <= radius)
            .map(|o| o.id)
            .collect()
    }

    pub fn nearest(&self, point: Vec3) -> Option<&Objective> {
        self.objectives.iter().min_by(|a, b| {
            a.position
                .distance_squared(point)
                .partial_cmp(&b.position.distance_squared(point))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
