//! Monotonic time source and blocking wait used by the scheduler.

use std::thread;
use std::time::{Duration, Instant};

/// Time capability consumed by the scheduler.
pub trait Clock {
    /// Monotonic time elapsed since the clock's origin.
    fn now(&self) -> Duration;
    /// Block the caller for `duration`.
    fn wait(&self, duration: Duration);
}

/// Wall clock backed by `Instant` and `thread::sleep`.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn wait(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

/// Virtual clock for tests: `wait` advances time instantly and is recorded.
#[cfg(test)]
pub struct ManualClock {
    state: std::sync::Mutex<ManualState>,
}

#[cfg(test)]
struct ManualState {
    now: Duration,
    waits: Vec<Duration>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            state: std::sync::Mutex::new(ManualState {
                now: Duration::ZERO,
                waits: Vec::new(),
            }),
        }
    }

    /// Every wait requested so far, in call order.
    pub fn waits(&self) -> Vec<Duration> {
        let guard = self.state.lock().expect("manual clock mutex poisoned");
        guard.waits.clone()
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Duration {
        let guard = self.state.lock().expect("manual clock mutex poisoned");
        guard.now
    }

    fn wait(&self, duration: Duration) {
        let mut guard = self.state.lock().expect("manual clock mutex poisoned");
        guard.now += duration;
        guard.waits.push(duration);
    }
}
