//! Scheduled tasks
//!
//! The objective never owns a timer. It asks the host to schedule a
//! `ScheduledTask`, and the host hands it back through
//! `CarriedObjective::on_timer_fired` once the deadline passes. Each task
//! carries the objective's state epoch at scheduling time so the callback can
//! tell whether the world moved on in the meantime.

use crate::types::{ObjectiveId, TimeMs};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Re-scan overlapping characters (blocked touch, drop guard, ragdoll)
    TouchRecheck,
    /// Dropped too long: go home (or take the next gradual step)
    AutoReturn,
    /// End of the post-grab ping window
    PingExpired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub objective: ObjectiveId,
    pub kind: TimerKind,
    pub deadline: TimeMs,
    /// Objective state epoch when scheduled
    pub epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct QueuedTask {
    task: ScheduledTask,
    seq: u64,
}

impl Ord for QueuedTask {
    fn cmp(&self, other: &Self) -> Ordering {
        // min-heap on (deadline, seq)
        other
            .task
            .deadline
            .cmp(&self.task.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueuedTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Deadline-ordered queue for hosts; equal deadlines fire in schedule order
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<QueuedTask>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: ScheduledTask) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(QueuedTask { task, seq });
    }

    pub fn next_deadline(&self) -> Option<TimeMs> {
        self.heap.peek().map(|q| q.task.deadline)
    }

    /// Earliest task with `deadline <= now`
    pub fn pop_due(&mut self, now: TimeMs) -> Option<ScheduledTask> {
        match self.heap.peek() {
            Some(q) if q.task.deadline <= now => self.heap.pop().map(|q| q.task),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn pending_for(&self, objective: ObjectiveId, kind: TimerKind) -> usize {
        self.heap.iter().filter(|q| q.task.objective == objective && q.task.kind == kind).count()
    }
}
