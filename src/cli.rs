use std::time::Duration;

use clap::Parser;

use crate::scheduler::{
    DEFAULT_BACKOFF_SECS, DEFAULT_LOW_POWER_SECS, DEFAULT_THROTTLE_THRESHOLD, SchedulerConfig,
    SensorFailurePolicy,
};

/// Priority task scheduler that backs off under high CPU load.
///
/// Tasks are entered interactively on stdin, run lowest priority value first,
/// and each one is delayed once if CPU load is above the threshold.
#[derive(Parser, Debug)]
#[command(name = "powersched", version)]
pub struct CliArgs {
    /// CPU load percentage above which a task is delayed
    #[arg(long, env = "POWERSCHED_THRESHOLD", default_value_t = DEFAULT_THROTTLE_THRESHOLD)]
    pub threshold: f64,

    /// Seconds to wait before a task when load is high
    #[arg(long, env = "POWERSCHED_BACKOFF_SECS", default_value_t = DEFAULT_BACKOFF_SECS)]
    pub backoff_secs: u64,

    /// Seconds spent in low-power mode when idle or finished
    #[arg(long, env = "POWERSCHED_LOW_POWER_SECS", default_value_t = DEFAULT_LOW_POWER_SECS)]
    pub low_power_secs: u64,

    /// Delay tasks when the load sensor fails instead of running them immediately
    #[arg(long, env = "POWERSCHED_FAIL_CLOSED")]
    pub fail_closed: bool,

    /// Emit debug diagnostics on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            throttle_threshold: self.threshold,
            throttle_backoff: Duration::from_secs(self.backoff_secs),
            low_power_wait: Duration::from_secs(self.low_power_secs),
            sensor_failure: if self.fail_closed {
                SensorFailurePolicy::FailClosed
            } else {
                SensorFailurePolicy::FailOpen
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_scheduler_defaults() {
        let args = CliArgs::try_parse_from(["powersched"]).expect("parse defaults");
        assert_eq!(args.scheduler_config(), SchedulerConfig::default());
    }

    #[test]
    fn flags_override_config() {
        let args = CliArgs::try_parse_from([
            "powersched",
            "--threshold",
            "60",
            "--backoff-secs",
            "0",
            "--low-power-secs",
            "1",
            "--fail-closed",
        ])
        .expect("parse flags");
        let config = args.scheduler_config();
        assert_eq!(config.throttle_threshold, 60.0);
        assert_eq!(config.throttle_backoff, Duration::ZERO);
        assert_eq!(config.low_power_wait, Duration::from_secs(1));
        assert_eq!(config.sensor_failure, SensorFailurePolicy::FailClosed);
    }

    #[test]
    fn rejects_non_numeric_threshold() {
        assert!(CliArgs::try_parse_from(["powersched", "--threshold", "high"]).is_err());
    }
}
