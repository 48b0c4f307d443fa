//! Run clock and duration helpers for the capture loop.

use std::time::{Duration, Instant};

/// A run clock that provides monotonic elapsed time relative to a fixed
/// epoch (the moment a capture run started).
#[derive(Debug, Clone)]
pub struct RunClock {
    /// The instant the run started.
    epoch: Instant,

    /// Wall-clock time at epoch (ISO 8601 string).
    epoch_wall: String,
}

impl RunClock {
    /// Create a new run clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Get seconds elapsed since the run started.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Elapsed time since the run started.
    pub fn elapsed(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Wall-clock time at run start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

/// Convert a user-supplied seconds value into a duration no shorter than
/// `floor`. Negative, NaN and infinite inputs collapse to `floor`.
pub fn secs_at_least(secs: f64, floor: Duration) -> Duration {
    if !secs.is_finite() {
        return floor;
    }
    let floor_secs = floor.as_secs_f64();
    Duration::from_secs_f64(secs.max(floor_secs))
}
