//! Deferred one-shot tasks on the simulation timeline
//!
//! Replaces "wait N seconds then continue" with tasks keyed to a tick. Owners
//! keep the returned [`TaskId`] so they can cancel when destroyed early.

use super::enemy::EnemyId;

/// Handle for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// Work that runs once its tick arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Remove a dead enemy from the live set
    RemoveEnemy(EnemyId),
    /// Finish the lose sequence by reloading the level
    ReloadLevel,
    /// Refill the weapon magazine
    FinishWeaponReload,
}

#[derive(Debug, Clone)]
struct Scheduled {
    id: TaskId,
    due_tick: u64,
    task: Task,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<Scheduled>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_tick: u64, task: Task) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled { id, due_tick, task });
        id
    }

    /// Returns false if the task already ran or was cancelled
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        self.pending.len() != before
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.iter().any(|s| s.id == id)
    }

    /// Remove and return every task due at or before `now`, earliest first
    /// (ties in scheduling order)
    pub fn take_due(&mut self, now: u64) -> Vec<Task> {
        let mut due: Vec<Scheduled> = Vec::new();
        self.pending.retain(|s| {
            if s.due_tick <= now {
                due.push(s.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|s| (s.due_tick, s.id));
        due.into_iter().map(|s| s.task).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
