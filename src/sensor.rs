//! CPU load and core-count capabilities, with platform-backed implementations.

use crate::error::SensorError;

/// Value reported in place of a utilization sample that could not be read.
pub const SENSOR_FAILURE_SENTINEL: f64 = -1.0;

/// Samples instantaneous CPU utilization as a percentage.
pub trait LoadSensor {
    fn sample(&self) -> Result<f64, SensorError>;
}

/// Reports the number of logical processors.
pub trait CoreCounter {
    fn count(&self) -> usize;
}

/// A sample as the scheduler interprets it.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadReading {
    /// Utilization within `0..=100`.
    Percent(f64),
    /// Sensor failure or a value outside the normal range.
    Unavailable(SensorError),
}

impl LoadReading {
    /// Classify a raw sensor result; anything not a finite percentage is unavailable.
    pub fn from_sample(sample: Result<f64, SensorError>) -> Self {
        match sample {
            Ok(value) if value.is_finite() && (0.0..=100.0).contains(&value) => {
                LoadReading::Percent(value)
            }
            Ok(value) => LoadReading::Unavailable(SensorError::OutOfRange(value)),
            Err(err) => LoadReading::Unavailable(err),
        }
    }

    /// Percentage shown to the user; the sentinel for unavailable readings.
    pub fn reported_percent(&self) -> f64 {
        match self {
            LoadReading::Percent(value) => *value,
            LoadReading::Unavailable(_) => SENSOR_FAILURE_SENTINEL,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, LoadReading::Percent(_))
    }
}

/// Load sensor deriving utilization from the 1-minute load average.
///
/// The load average is divided by the online core count and scaled to a
/// percentage, clamped to `0..=100`.
pub struct SystemLoadSensor {
    cores: usize,
}

impl SystemLoadSensor {
    pub fn new(cores: &dyn CoreCounter) -> Self {
        Self {
            cores: cores.count().max(1),
        }
    }
}

impl LoadSensor for SystemLoadSensor {
    fn sample(&self) -> Result<f64, SensorError> {
        let load = load_average_1m()?;
        Ok((load / self.cores as f64 * 100.0).clamp(0.0, 100.0))
    }
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn load_average_1m() -> Result<f64, SensorError> {
    let mut loads = [0.0f64; 3];
    let rc = unsafe { libc::getloadavg(loads.as_mut_ptr(), 1) };
    if rc < 1 {
        return Err(SensorError::Unavailable(format!("getloadavg returned {rc}")));
    }
    Ok(loads[0])
}

/// Stub on platforms without `getloadavg`.
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn load_average_1m() -> Result<f64, SensorError> {
    Err(SensorError::Unsupported)
}

/// Core counter backed by `sysconf`, falling back to the standard library.
pub struct SystemCoreCounter;

impl CoreCounter for SystemCoreCounter {
    fn count(&self) -> usize {
        online_processors()
            .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
            .unwrap_or(1)
    }
}

#[cfg(unix)]
fn online_processors() -> Option<usize> {
    let count = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
    if count > 0 { Some(count as usize) } else { None }
}

#[cfg(not(unix))]
fn online_processors() -> Option<usize> {
    None
}

/// Sensor that always returns the same result.
#[cfg(test)]
pub struct FixedLoadSensor(pub Result<f64, SensorError>);

#[cfg(test)]
impl LoadSensor for FixedLoadSensor {
    fn sample(&self) -> Result<f64, SensorError> {
        self.0.clone()
    }
}

/// Sensor that replays a script of samples, then reports unavailable.
#[cfg(test)]
pub struct ScriptedLoadSensor {
    samples: std::sync::Mutex<std::collections::VecDeque<Result<f64, SensorError>>>,
}

#[cfg(test)]
impl ScriptedLoadSensor {
    pub fn new(samples: Vec<Result<f64, SensorError>>) -> Self {
        Self {
            samples: std::sync::Mutex::new(samples.into()),
        }
    }

    /// Number of scripted samples not yet consumed.
    pub fn remaining(&self) -> usize {
        let guard = self.samples.lock().expect("sensor script mutex poisoned");
        guard.len()
    }
}

#[cfg(test)]
impl LoadSensor for ScriptedLoadSensor {
    fn sample(&self) -> Result<f64, SensorError> {
        let mut guard = self.samples.lock().expect("sensor script mutex poisoned");
        guard
            .pop_front()
            .unwrap_or_else(|| Err(SensorError::Unavailable("script exhausted".to_string())))
    }
}

#[cfg(test)]
pub struct FixedCoreCounter(pub usize);

#[cfg(test)]
impl CoreCounter for FixedCoreCounter {
    fn count(&self) -> usize {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_samples_are_percentages() {
        assert_eq!(LoadReading::from_sample(Ok(0.0)), LoadReading::Percent(0.0));
        assert_eq!(LoadReading::from_sample(Ok(100.0)), LoadReading::Percent(100.0));
        assert_eq!(LoadReading::from_sample(Ok(42.5)).reported_percent(), 42.5);
    }

    #[test]
    fn out_of_range_samples_are_unavailable() {
        for value in [-1.0, 100.5, f64::NAN, f64::INFINITY] {
            let reading = LoadReading::from_sample(Ok(value));
            assert!(!reading.is_available(), "{value} should be unavailable");
            assert_eq!(reading.reported_percent(), SENSOR_FAILURE_SENTINEL);
        }
    }

    #[test]
    fn sensor_errors_report_sentinel() {
        let reading = LoadReading::from_sample(Err(SensorError::Unsupported));
        assert_eq!(reading, LoadReading::Unavailable(SensorError::Unsupported));
        assert!(reading.reported_percent() < 0.0);
    }

    #[test]
    fn system_core_counter_is_positive() {
        assert!(SystemCoreCounter.count() >= 1);
    }

    #[test]
    fn system_sensor_stays_in_range_when_available() {
        let sensor = SystemLoadSensor::new(&SystemCoreCounter);
        // Availability depends on the host; a value, when produced, must be a percentage.
        if let Ok(value) = sensor.sample() {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn scripted_sensor_replays_then_fails() {
        let sensor = ScriptedLoadSensor::new(vec![Ok(10.0), Ok(90.0)]);
        assert_eq!(sensor.sample(), Ok(10.0));
        assert_eq!(sensor.sample(), Ok(90.0));
        assert_eq!(sensor.remaining(), 0);
        assert!(sensor.sample().is_err());
    }
}
