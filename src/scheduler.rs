//! Load-adaptive, priority-ordered execution loop.
//!
//! The scheduler walks a pre-sorted queue one task at a time. Before each task
//! it samples CPU load; a sample above the threshold inserts one fixed backoff.
//! Empty queues and finished runs both end in a single low-power wait.

use std::io::Write;
use std::time::Duration;

use tracing::{debug, warn};

use crate::clock::Clock;
use crate::error::{ConfigError, SchedulerError};
use crate::sensor::{CoreCounter, LoadReading, LoadSensor};
use crate::task_queue::TaskQueue;
use crate::types::{ExecutionReport, Task, TaskId};

// Default pacing knobs.
pub const DEFAULT_THROTTLE_THRESHOLD: f64 = 75.0;
pub const DEFAULT_BACKOFF_SECS: u64 = 3;
pub const DEFAULT_LOW_POWER_SECS: u64 = 2;

/// How an unavailable load reading feeds the throttle decision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SensorFailurePolicy {
    /// Treat the reading as below threshold and run immediately.
    #[default]
    FailOpen,
    /// Treat the reading as above threshold and apply the backoff.
    FailClosed,
}

/// Pacing parameters for a run.
#[derive(Clone, Debug, PartialEq)]
pub struct SchedulerConfig {
    /// Loads strictly above this percentage trigger the backoff.
    pub throttle_threshold: f64,
    pub throttle_backoff: Duration,
    pub low_power_wait: Duration,
    pub sensor_failure: SensorFailurePolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            throttle_threshold: DEFAULT_THROTTLE_THRESHOLD,
            throttle_backoff: Duration::from_secs(DEFAULT_BACKOFF_SECS),
            low_power_wait: Duration::from_secs(DEFAULT_LOW_POWER_SECS),
            sensor_failure: SensorFailurePolicy::FailOpen,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.throttle_threshold;
        if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        Ok(())
    }

    /// Whether a reading warrants the backoff before the next task.
    pub fn should_throttle(&self, reading: &LoadReading) -> bool {
        match reading {
            LoadReading::Percent(value) => *value > self.throttle_threshold,
            LoadReading::Unavailable(_) => self.sensor_failure == SensorFailurePolicy::FailClosed,
        }
    }
}

/// Phases a run moves through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Reporting,
    Throttled,
    Executing,
    LowPower,
    Done,
}

/// Everything observed during one run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    /// Core count reported at the start; `None` on the idle path.
    pub cores: Option<usize>,
    /// Per-task reports in execution order.
    pub reports: Vec<ExecutionReport>,
    /// Samples that could not be interpreted as a percentage.
    pub sensor_failures: usize,
    /// Every state entered, in order.
    pub states: Vec<SchedulerState>,
}

impl RunSummary {
    pub fn throttled_ids(&self) -> Vec<TaskId> {
        self.reports
            .iter()
            .filter(|report| report.throttled)
            .map(|report| report.id)
            .collect()
    }

    fn enter(&mut self, state: SchedulerState) {
        debug!(?state, "scheduler state");
        self.states.push(state);
    }
}

/// Sequential executor borrowing its capabilities for the duration of a run.
pub struct Scheduler<'a> {
    config: SchedulerConfig,
    sensor: &'a dyn LoadSensor,
    cores: &'a dyn CoreCounter,
    clock: &'a dyn Clock,
}

impl<'a> Scheduler<'a> {
    pub fn new(
        config: SchedulerConfig,
        sensor: &'a dyn LoadSensor,
        cores: &'a dyn CoreCounter,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            config,
            sensor,
            cores,
            clock,
        }
    }

    /// Execute every task in queue order, writing progress lines to `out`.
    ///
    /// The queue is expected to be sorted already. Sensor failures never
    /// abort the run; only a failed write does.
    pub fn run<W: Write>(&self, queue: TaskQueue, out: &mut W) -> Result<RunSummary, SchedulerError> {
        let mut summary = RunSummary::default();
        summary.enter(SchedulerState::Idle);

        if queue.is_empty() {
            writeln!(out, "No tasks available. CPU is entering low-power mode...")?;
            self.low_power(&mut summary, out)?;
            summary.enter(SchedulerState::Done);
            return Ok(summary);
        }

        summary.enter(SchedulerState::Reporting);
        writeln!(out, "\n=== Scheduling tasks based on priority ===")?;
        let cores = self.cores.count();
        summary.cores = Some(cores);
        writeln!(out, "Detected CPU Cores: {cores}")?;

        for task in queue {
            let report = self.run_task(task, &mut summary, out)?;
            summary.reports.push(report);
        }

        writeln!(out, "\nAll tasks executed. CPU entering low-power mode...")?;
        self.low_power(&mut summary, out)?;
        summary.enter(SchedulerState::Done);
        out.flush()?;
        Ok(summary)
    }

    fn run_task<W: Write>(
        &self,
        task: Task,
        summary: &mut RunSummary,
        out: &mut W,
    ) -> Result<ExecutionReport, SchedulerError> {
        let reading = LoadReading::from_sample(self.sensor.sample());
        match &reading {
            LoadReading::Percent(value) => {
                debug!(task = task.id, load = value, "load sampled");
                writeln!(out, "Current CPU Load: {value:.2}%")?;
            }
            LoadReading::Unavailable(err) => {
                summary.sensor_failures += 1;
                warn!(task = task.id, error = %err, "load sample unavailable");
                writeln!(
                    out,
                    "Current CPU Load: {:.2}% (sensor unavailable)",
                    reading.reported_percent()
                )?;
            }
        }

        // One backoff at most; the load is not re-sampled afterwards.
        let throttled = self.config.should_throttle(&reading);
        if throttled {
            summary.enter(SchedulerState::Throttled);
            if reading.is_available() {
                writeln!(out, "High CPU usage detected! Delaying execution to save power...")?;
            } else {
                writeln!(out, "CPU load unknown! Delaying execution to save power...")?;
            }
            debug!(task = task.id, backoff = ?self.config.throttle_backoff, "throttling");
            self.clock.wait(self.config.throttle_backoff);
        }

        summary.enter(SchedulerState::Executing);
        let started_at = self.clock.now();
        writeln!(
            out,
            "Executing Task {} | Priority: {} | Execution Time: {} sec",
            task.id, task.priority, task.execution_time
        )?;
        self.clock.wait(task.execution_duration());
        let finished_at = self.clock.now();

        let report = ExecutionReport {
            id: task.id,
            priority: task.priority,
            execution_time: task.execution_time,
            started_at,
            finished_at,
            throttled,
        };
        writeln!(
            out,
            "Task {} completed in {:.2} seconds",
            report.id,
            report.elapsed().as_secs_f64()
        )?;
        Ok(report)
    }

    fn low_power<W: Write>(&self, summary: &mut RunSummary, out: &mut W) -> Result<(), SchedulerError> {
        summary.enter(SchedulerState::LowPower);
        out.flush()?;
        self.clock.wait(self.config.low_power_wait);
        writeln!(out, "CPU exiting low-power mode.")?;
        Ok(())
    }
}
