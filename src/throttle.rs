use std::time::{Duration, Instant};

/// Default minimum time between two fetches of the same device.
pub const SCAN_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Minimum-interval gate. Holds the time of the last `touch()`.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    timestamp: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Throttle {
            interval,
            timestamp: None,
        }
    }

    /// Updates `timestamp` to `now()`.
    pub fn touch(&mut self) {
        self.timestamp = Some(Instant::now());
    }

    /// Checks whether `interval` elapsed since last `touch()`
    pub fn ready(&self) -> bool {
        match self.timestamp {
            Some(timestamp) => timestamp.elapsed() >= self.interval,
            /* never touched */
            None => true,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Throttle::new(SCAN_INTERVAL)
    }
}
