//! Error types for input handling, queue bounds, sensors, and runs.

use std::io;

use thiserror::Error;

use crate::types::TaskId;

/// Malformed or out-of-range interactive input. Always fatal.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("task count is not a number: {raw:?}")]
    InvalidCount { raw: String },

    #[error("task count {count} is outside 1..={max}")]
    CountOutOfRange { count: i64, max: usize },

    #[error("priority for task {task} is not a number: {raw:?}")]
    InvalidPriority { task: TaskId, raw: String },

    #[error("execution time for task {task} is not a number: {raw:?}")]
    InvalidExecutionTime { task: TaskId, raw: String },

    #[error("execution time for task {task} must be at least 1 second, got {value}")]
    NonPositiveExecutionTime { task: TaskId, value: i64 },

    #[error("input ended before {expected} was provided")]
    UnexpectedEof { expected: &'static str },

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

/// Violation of the task queue capacity bound.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("task queue is full (capacity {capacity})")]
    Full { capacity: usize },
}

/// CPU utilization could not be sampled. Never fatal to a run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SensorError {
    #[error("load query failed: {0}")]
    Unavailable(String),

    #[error("load sample {0} is outside 0..=100")]
    OutOfRange(f64),

    #[error("load sampling is not supported on this platform")]
    Unsupported,
}

/// Invalid scheduler configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("throttle threshold must be a finite percentage in 0..=100, got {0}")]
    InvalidThreshold(f64),
}

/// Failure that aborts a scheduling run.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("failed to write run output: {0}")]
    Output(#[from] io::Error),
}
