//! Scheduler module - timed tasks
//!
//! The engine owns no clock. It submits named [`Task`]s to a [`Scheduler`]
//! and the host calls [`TetrisLogic::run_task`](crate::logic::TetrisLogic::run_task)
//! when one fires. Every task is one-shot: periodic behavior comes from the
//! handler re-arming its own task. At most one invocation per task is ever
//! pending.

use std::time::Duration;

use crate::types::Task;

/// Delay/cancel contract the engine relies on
pub trait Scheduler {
    /// Arm `task` to fire once after `delay`
    fn start(&mut self, task: Task, delay: Duration);

    /// Cancel `task` if pending
    fn stop(&mut self, task: Task);

    /// Stop then start
    fn restart(&mut self, task: Task, delay: Duration) {
        self.stop(task);
        self.start(task, delay);
    }
}

/// Shortest delay accepted by [`ManualScheduler`]; keeps a zero-delay task
/// from firing forever inside one `advance`
pub const MIN_DELAY: Duration = Duration::from_micros(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    task: Task,
    deadline: Duration,
    seq: u64,
}

/// Deterministic scheduler driven by a virtual clock
///
/// ```
/// use std::time::Duration;
/// use tetrislogic_core::{ManualScheduler, Scheduler};
/// use tetrislogic_types::Task;
///
/// let mut scheduler = ManualScheduler::new();
/// scheduler.start(Task::Fall, Duration::from_millis(100));
/// assert_eq!(scheduler.pop_due(Duration::from_millis(50)), None);
/// assert_eq!(scheduler.pop_due(Duration::from_millis(100)), Some(Task::Fall));
/// assert_eq!(scheduler.now(), Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now: Duration,
    pending: Vec<Pending>,
    seq: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_scheduled(&self, task: Task) -> bool {
        self.pending.iter().any(|p| p.task == task)
    }

    /// Time left before `task` fires
    pub fn remaining(&self, task: Task) -> Option<Duration> {
        self.pending
            .iter()
            .find(|p| p.task == task)
            .map(|p| p.deadline.saturating_sub(self.now))
    }

    /// Pending tasks, earliest first
    pub fn pending(&self) -> Vec<Task> {
        let mut pending = self.pending.clone();
        pending.sort_by_key(|p| (p.deadline, p.seq));
        pending.into_iter().map(|p| p.task).collect()
    }

    /// Remove the earliest task due at or before `until` and move the clock
    /// to its deadline
    pub fn pop_due(&mut self, until: Duration) -> Option<Task> {
        let (index, next) = self
            .pending
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| (p.deadline, p.seq))
            .map(|(index, p)| (index, *p))?;
        if next.deadline > until {
            return None;
        }
        self.pending.swap_remove(index);
        self.now = self.now.max(next.deadline);
        Some(next.task)
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, task: Task, delay: Duration) {
        self.pending.retain(|p| p.task != task);
        self.seq += 1;
        self.pending.push(Pending {
            task,
            deadline: self.now + delay.max(MIN_DELAY),
            seq: self.seq,
        });
    }

    fn stop(&mut self, task: Task) {
        self.pending.retain(|p| p.task != task);
    }
}
