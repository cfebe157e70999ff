//! Shift clock - simulated time advanced from real-time ticks.

use nightshift_logic::clock::{format_clock_label, sim_delta};
use nightshift_logic::config::ShiftConfig;
use nightshift_logic::pacing::shift_progress;

use crate::controller::ShiftState;

#[derive(Debug, Clone)]
pub struct ShiftClock {
    /// Simulated seconds since midnight
    sim_secs: f64,
    duration_secs: f64,
    real_seconds_per_sim_hour: f64,
}

impl ShiftClock {
    pub fn new(config: &ShiftConfig) -> Self {
        Self {
            sim_secs: 0.0,
            duration_secs: config.shift_duration_secs,
            real_seconds_per_sim_hour: config.real_seconds_per_sim_hour,
        }
    }

    /// Back to midnight; only done when a new shift starts.
    pub fn reset(&mut self) {
        self.sim_secs = 0.0;
    }

    /// Advance by `real_delta` real seconds. Ticks outside `Active` are ignored.
    ///
    /// Returns the simulated seconds actually added.
    pub fn tick(&mut self, state: ShiftState, real_delta: f64) -> f64 {
        if state != ShiftState::Active {
            return 0.0;
        }
        let delta = sim_delta(real_delta, self.real_seconds_per_sim_hour);
        self.sim_secs += delta;
        delta
    }

    pub fn sim_secs(&self) -> f64 {
        self.sim_secs
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn progress(&self) -> f64 {
        shift_progress(self.sim_secs, self.duration_secs)
    }

    pub fn is_elapsed(&self) -> bool {
        self.sim_secs >= self.duration_secs
    }

    /// 12-hour label, e.g. `01:30 AM`.
    pub fn label(&self) -> String {
        format_clock_label(self.sim_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_only_while_active() {
        let mut clock = ShiftClock::new(&ShiftConfig::default());
        assert_eq!(clock.tick(ShiftState::Briefing, 25.0), 0.0);
        assert_eq!(clock.tick(ShiftState::Complete, 25.0), 0.0);
        assert_eq!(clock.sim_secs(), 0.0);

        clock.tick(ShiftState::Active, 25.0);
        assert!((clock.sim_secs() - 60.0).abs() < 1e-9);
        clock.tick(ShiftState::Active, 1.0);
        assert_eq!(clock.label(), "12:01 AM");
    }

    #[test]
    fn test_never_runs_backwards() {
        let mut clock = ShiftClock::new(&ShiftConfig::default());
        clock.tick(ShiftState::Active, 10.0);
        let before = clock.sim_secs();
        clock.tick(ShiftState::Active, -5.0);
        assert_eq!(clock.sim_secs(), before);
    }

    #[test]
    fn test_elapsed_and_reset() {
        let config = ShiftConfig {
            shift_duration_secs: 120.0,
            ..Default::default()
        };
        let mut clock = ShiftClock::new(&config);
        clock.tick(ShiftState::Active, 60.0);
        assert!(clock.is_elapsed());
        assert_eq!(clock.progress(), 1.0);
        clock.reset();
        assert!(!clock.is_elapsed());
        assert_eq!(clock.label(), "12:00 AM");
    }
}
