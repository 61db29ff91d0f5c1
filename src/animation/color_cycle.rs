use serde::{Deserialize, Serialize};

use crate::foundation::error::{KaleidoError, KaleidoResult};

/// Parameters of the color-cycle oscillator and the tick that drives it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorCycleConfig {
    /// Amount added to (or removed from) the scalar on every tick.
    pub step: f64,
    /// Upper bound of the oscillation; the lower bound is always `0`.
    pub max: f64,
    /// Seconds between ticks.
    pub interval_secs: f64,
}

impl Default for ColorCycleConfig {
    fn default() -> Self {
        Self {
            step: 0.01,
            max: 0.8,
            interval_secs: 0.1,
        }
    }
}

impl ColorCycleConfig {
    /// Check ranges.
    pub fn validate(&self) -> KaleidoResult<()> {
        if !(self.step.is_finite() && self.step > 0.0 && self.step <= 1.0) {
            return Err(KaleidoError::validation(
                "color_cycle.step must be in (0, 1]",
            ));
        }
        if !(self.max.is_finite() && self.max >= self.step && self.max <= 1.0) {
            return Err(KaleidoError::validation(
                "color_cycle.max must be in [step, 1]",
            ));
        }
        let steps = self.max / self.step;
        if (steps - steps.round()).abs() > 1e-6 {
            return Err(KaleidoError::validation(
                "color_cycle.max must be a whole multiple of color_cycle.step",
            ));
        }
        if !(self.interval_secs.is_finite() && self.interval_secs > 0.0) {
            return Err(KaleidoError::validation(
                "color_cycle.interval_secs must be > 0",
            ));
        }
        Ok(())
    }
}

/// Triangular oscillator between `0` and `max`.
///
/// The scalar is kept as an integer number of steps so that the peak is hit exactly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorCycle {
    level: u32,
    peak: u32,
    steps_per_unit: f64,
    max: f64,
    rising: bool,
}

impl ColorCycle {
    /// Start at `0`, rising.
    pub fn new(cfg: &ColorCycleConfig) -> KaleidoResult<Self> {
        cfg.validate()?;
        let peak = (cfg.max / cfg.step).round().max(1.0) as u32;
        Ok(Self {
            level: 0,
            peak,
            steps_per_unit: 1.0 / cfg.step,
            max: cfg.max,
            rising: true,
        })
    }

    /// Current scalar value in `[0, max]`.
    pub fn value(&self) -> f64 {
        // `peak / steps_per_unit` can land one ulp above `max`.
        (f64::from(self.level) / self.steps_per_unit).min(self.max)
    }

    /// Current value in whole steps.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Number of steps from `0` to the peak.
    pub fn peak(&self) -> u32 {
        self.peak
    }

    /// Direction of the next step.
    pub fn is_rising(&self) -> bool {
        self.rising
    }

    /// Apply one step, then flip direction at either bound.
    pub fn advance(&mut self) {
        if self.rising {
            self.level = self.level.saturating_add(1);
        } else {
            self.level = self.level.saturating_sub(1);
        }

        if self.level >= self.peak {
            self.rising = false;
        } else if self.level == 0 {
            self.rising = true;
        }
    }

    /// Jump to the state reached after `ticks` calls to [`ColorCycle::advance`] from the start.
    pub fn seek(&mut self, ticks: u64) {
        let peak = u64::from(self.peak);
        let k = ticks % (2 * peak);
        self.level = if k <= peak { k } else { 2 * peak - k } as u32;
        self.rising = k < peak;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/color_cycle.rs"]
mod tests;
