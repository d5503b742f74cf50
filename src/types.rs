//! Shared identifiers and task model used across the scheduler.

use std::time::Duration;

/// Unique identifier for a task, assigned in input order starting at 1.
pub type TaskId = u64;
/// Scheduling priority; lower values run first.
pub type Priority = i64;

/// Unit of simulated work.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    /// Stable task identifier for reporting.
    pub id: TaskId,
    /// Lower value = more urgent. Not required to be unique.
    pub priority: Priority,
    /// Simulated workload length in whole seconds.
    pub execution_time: u64,
}

impl Task {
    /// Construct a new task.
    pub fn new(id: TaskId, priority: Priority, execution_time: u64) -> Self {
        Self {
            id,
            priority,
            execution_time,
        }
    }

    /// Simulated workload length as a `Duration`.
    pub fn execution_duration(&self) -> Duration {
        Duration::from_secs(self.execution_time)
    }
}

/// Outcome of one executed task.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionReport {
    pub id: TaskId,
    pub priority: Priority,
    pub execution_time: u64,
    /// Clock reading when execution began (after any throttle backoff).
    pub started_at: Duration,
    /// Clock reading when execution finished.
    pub finished_at: Duration,
    /// Whether a throttle backoff preceded this task.
    pub throttled: bool,
}

impl ExecutionReport {
    /// Measured wall time spent executing.
    pub fn elapsed(&self) -> Duration {
        self.finished_at.saturating_sub(self.started_at)
    }
}
