//! Simulated shift time.
//!
//! Simulated seconds start at midnight (`0.0` = 12:00 AM). Real time is
//! converted through a fixed scale: `real_seconds_per_sim_hour` real seconds
//! make one simulated hour.

const SECS_PER_HOUR: f64 = 3600.0;

/// Real seconds that make up one simulated second.
pub fn real_per_sim_second(real_seconds_per_sim_hour: f64) -> f64 {
    real_seconds_per_sim_hour / SECS_PER_HOUR
}

/// Simulated seconds elapsed during `real_delta` real seconds.
///
/// Negative or non-finite deltas produce zero; simulated time never runs
/// backwards.
pub fn sim_delta(real_delta: f64, real_seconds_per_sim_hour: f64) -> f64 {
    if !real_delta.is_finite() || real_delta <= 0.0 {
        return 0.0;
    }
    real_delta / real_per_sim_second(real_seconds_per_sim_hour)
}

/// Real seconds a shift of `sim_secs` simulated seconds lasts.
pub fn real_duration(sim_secs: f64, real_seconds_per_sim_hour: f64) -> f64 {
    sim_secs * real_per_sim_second(real_seconds_per_sim_hour)
}

/// Wall-clock style label, e.g. `12:00 AM`, `01:30 AM`, `12:05 PM`.
pub fn format_clock_label(sim_secs: f64) -> String {
    let total_minutes = (sim_secs.max(0.0) / 60.0).floor() as u64;
    let hour = (total_minutes / 60) % 24;
    let minute = total_minutes % 60;
    let meridiem = if hour < 12 { "AM" } else { "PM" };
    let display_hour = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{:02}:{:02} {}", display_hour, minute, meridiem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midnight_label() {
        assert_eq!(format_clock_label(0.0), "12:00 AM");
        assert_eq!(format_clock_label(59.9), "12:00 AM");
    }

    #[test]
    fn test_shift_end_label() {
        assert_eq!(format_clock_label(7200.0), "02:00 AM");
        assert_eq!(format_clock_label(5400.0), "01:30 AM");
    }

    #[test]
    fn test_afternoon_wraps() {
        assert_eq!(format_clock_label(12.0 * 3600.0 + 300.0), "12:05 PM");
        assert_eq!(format_clock_label(13.0 * 3600.0), "01:00 PM");
        assert_eq!(format_clock_label(24.0 * 3600.0), "12:00 AM");
    }

    #[test]
    fn test_scale_default() {
        // 1500 real seconds per hour: 25 real seconds per simulated minute.
        let per_minute = real_duration(60.0, 1500.0);
        assert!((per_minute - 25.0).abs() < 1e-9);
        assert!((sim_delta(25.0, 1500.0) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_and_nan_deltas_ignored() {
        assert_eq!(sim_delta(-1.0, 1500.0), 0.0);
        assert_eq!(sim_delta(f64::NAN, 1500.0), 0.0);
        assert_eq!(sim_delta(f64::INFINITY, 1500.0), 0.0);
    }
}
