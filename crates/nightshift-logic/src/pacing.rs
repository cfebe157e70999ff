//! Spawn pacing - how long to wait before the next anomaly.
//!
//! Early in the shift the house is forgiving; the final third is tense.
//! Progress is `simulated_time / shift_duration`.

use serde::{Deserialize, Serialize};

use crate::constants::pacing;

/// Inclusive range of real seconds a delay is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DelayRange {
    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    /// Map a `[0, 1)` roll onto the range.
    pub fn sample(&self, roll: f64) -> f64 {
        let roll = roll.clamp(0.0, 1.0);
        self.min_secs + roll * (self.max_secs - self.min_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PacingBand {
    Early,
    Mid,
    Late,
}

/// Progress thresholds and the delay range used within each band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingCurve {
    /// Progress below this is the early band.
    pub early_until: f64,
    /// Progress at or above this is the late band.
    pub late_from: f64,
    pub early: DelayRange,
    pub mid: DelayRange,
    pub late: DelayRange,
}

impl Default for PacingCurve {
    fn default() -> Self {
        Self {
            early_until: pacing::EARLY_UNTIL,
            late_from: pacing::LATE_FROM,
            early: DelayRange::new(pacing::EARLY_DELAY_SECS.0, pacing::EARLY_DELAY_SECS.1),
            mid: DelayRange::new(pacing::MID_DELAY_SECS.0, pacing::MID_DELAY_SECS.1),
            late: DelayRange::new(pacing::LATE_DELAY_SECS.0, pacing::LATE_DELAY_SECS.1),
        }
    }
}

impl PacingCurve {
    pub fn band(&self, progress: f64) -> PacingBand {
        if progress < self.early_until {
            PacingBand::Early
        } else if progress < self.late_from {
            PacingBand::Mid
        } else {
            PacingBand::Late
        }
    }

    pub fn range(&self, band: PacingBand) -> DelayRange {
        match band {
            PacingBand::Early => self.early,
            PacingBand::Mid => self.mid,
            PacingBand::Late => self.late,
        }
    }

    /// Real seconds until the next spawn, given shift progress and a `[0, 1)` roll.
    pub fn next_delay(&self, progress: f64, roll: f64) -> f64 {
        self.range(self.band(progress)).sample(roll)
    }
}

/// Shift progress in `[0, 1]`; a non-positive duration counts as finished.
pub fn shift_progress(sim_secs: f64, duration_secs: f64) -> f64 {
    if duration_secs <= 0.0 {
        return 1.0;
    }
    (sim_secs / duration_secs).clamp(0.0, 1.0)
}
