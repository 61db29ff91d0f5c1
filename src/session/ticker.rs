use crate::foundation::error::{KaleidoError, KaleidoResult};

/// Fixed-rate tick clock.
///
/// Tick `k` (0-based) fires at `k * interval_secs`, so the first tick is due at time zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedRateTicker {
    interval_secs: f64,
}

impl FixedRateTicker {
    /// Create a ticker firing every `interval_secs`.
    pub fn new(interval_secs: f64) -> KaleidoResult<Self> {
        if !(interval_secs.is_finite() && interval_secs > 0.0) {
            return Err(KaleidoError::validation(
                "tick interval must be finite and > 0",
            ));
        }
        Ok(Self { interval_secs })
    }

    /// Interval between ticks in seconds.
    pub fn interval_secs(self) -> f64 {
        self.interval_secs
    }

    /// Number of ticks that have fired by `elapsed_secs`, inclusive of a tick landing exactly on it.
    pub fn ticks_due(self, elapsed_secs: f64) -> u64 {
        if !elapsed_secs.is_finite() || elapsed_secs < 0.0 {
            return 1;
        }
        // Frame times like 0.3 s sit a hair under a tick boundary in binary.
        (elapsed_secs / self.interval_secs + 1e-9).floor() as u64 + 1
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/ticker.rs"]
mod tests;
