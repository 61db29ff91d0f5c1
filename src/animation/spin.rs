use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{KaleidoError, KaleidoResult};

/// Continuous rotation applied to every fragment about its own center.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpinConfig {
    /// Seconds per full revolution.
    pub period_secs: f64,
    /// Number of revolutions before the spin stops; `None` spins forever.
    pub repeat_count: Option<u32>,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            period_secs: 12.0,
            repeat_count: Some(10_000),
        }
    }
}

impl SpinConfig {
    /// Check ranges.
    pub fn validate(&self) -> KaleidoResult<()> {
        if !(self.period_secs.is_finite() && self.period_secs > 0.0) {
            return Err(KaleidoError::validation("spin.period_secs must be > 0"));
        }
        Ok(())
    }

    /// Seconds until the spin stops, if it ever does.
    pub fn active_secs(&self) -> Option<f64> {
        self.repeat_count
            .map(|n| self.period_secs * f64::from(n))
    }
}

/// Rotation direction for fragment `index`: even indices turn positively, odd ones negatively.
pub fn spin_direction(index: usize) -> f64 {
    if index % 2 == 0 { 1.0 } else { -1.0 }
}

/// Spin angle in radians of fragment `index` at `elapsed_secs`.
///
/// Before `0` and after the configured repeats are exhausted the angle is `0`.
pub fn spin_angle(cfg: &SpinConfig, index: usize, elapsed_secs: f64) -> f64 {
    if !(elapsed_secs.is_finite() && elapsed_secs > 0.0) {
        return 0.0;
    }
    if let Some(end) = cfg.active_secs()
        && elapsed_secs >= end
    {
        return 0.0;
    }
    let phase = elapsed_secs.rem_euclid(cfg.period_secs) / cfg.period_secs;
    TAU * phase * spin_direction(index)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spin.rs"]
mod tests;
