//! Shift constants - default figures and fixed visual mutation values.
//!
//! The `shift` values are the defaults behind [`crate::config::ShiftConfig`];
//! the `visuals` values are what an anomaly writes into a room and are not
//! configurable.

pub mod shift {
    /// Two simulated hours, midnight to 02:00.
    pub const DURATION_SECS: f64 = 7200.0;
    /// One simulated minute takes 25 real seconds.
    pub const REAL_SECONDS_PER_SIM_HOUR: f64 = 1500.0;
    pub const MAX_ANOMALIES: u32 = 5;
    /// The first anomaly arrives well before steady-state pacing kicks in.
    pub const FIRST_SPAWN_DELAY_SECS: f64 = 15.0;
    /// Undetected count at which the alarm cue plays.
    pub const ALARM_THRESHOLD: u32 = 3;
}

pub mod pacing {
    pub const EARLY_UNTIL: f64 = 0.33;
    pub const LATE_FROM: f64 = 0.67;
    pub const EARLY_DELAY_SECS: (f64, f64) = (90.0, 120.0);
    pub const MID_DELAY_SECS: (f64, f64) = (60.0, 80.0);
    pub const LATE_DELAY_SECS: (f64, f64) = (35.0, 55.0);
}

pub mod visuals {
    /// Distance a displaced prop moves along X.
    pub const DISPLACEMENT: f32 = 2.0;

    pub const BLACKOUT_INTENSITY: f32 = 0.0;
    pub const OMINOUS_INTENSITY: f32 = 5.0;
    pub const OMINOUS_COLOR: u32 = 0xff00ff;

    pub const APPARITION_OFFSET: [f32; 3] = [2.0, 1.0, 2.0];
    pub const APPARITION_COLOR: u32 = 0xffffff;
    pub const APPARITION_OPACITY: f32 = 0.5;
    pub const APPARITION_RADIUS: f32 = 0.5;

    pub const INTRUDER_OFFSET: [f32; 3] = [-2.0, 1.0, -2.0];
    pub const INTRUDER_BODY_COLOR: u32 = 0x000000;
    pub const INTRUDER_EYE_COLOR: u32 = 0xff0000;

    pub const PAINTING_PALETTE: [u32; 5] = [0xff2222, 0x22ff22, 0xff8800, 0xaa00ff, 0x00ffee];

    pub const STATIC_SCREEN_COLOR: u32 = 0x99bbff;
    pub const STATIC_EMISSIVE_COLOR: u32 = 0x4466cc;
    pub const STATIC_EMISSIVE_INTENSITY: f32 = 1.8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pacing_thresholds_ordered() {
        assert!(pacing::EARLY_UNTIL < pacing::LATE_FROM);
        assert!(pacing::LATE_DELAY_SECS.1 < pacing::MID_DELAY_SECS.0);
        assert!(pacing::MID_DELAY_SECS.1 < pacing::EARLY_DELAY_SECS.0);
    }

    #[test]
    fn test_first_spawn_faster_than_steady_state() {
        assert!(shift::FIRST_SPAWN_DELAY_SECS < pacing::LATE_DELAY_SECS.0);
    }

    #[test]
    fn test_palette_excludes_ominous_light() {
        assert!(!visuals::PAINTING_PALETTE.contains(&visuals::OMINOUS_COLOR));
    }
}
