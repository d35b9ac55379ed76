//! Scoped stage timing

use std::time::{Duration, Instant};
use tracing::info;

/// Timer for measuring the duration of one pipeline stage.
///
/// Holds no state beyond its own start instant; dropping without calling
/// [`Timer::stop`] simply discards the measurement.
#[derive(Debug)]
pub struct Timer {
    name: String,
    start: Instant,
}

impl Timer {
    /// Create and start a new timer
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
        }
    }

    /// Elapsed time so far
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed time in seconds
    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Stop and log the measurement
    pub fn stop(self) -> Duration {
        let elapsed = self.start.elapsed();
        info!("{} completed in {:.3}s", self.name, elapsed.as_secs_f64());
        elapsed
    }
}
