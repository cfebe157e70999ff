//! Presentation cues derived from anomaly counts.
//!
//! The engine never plays sounds or toggles overlays; it exposes these levels
//! and the presentation layer maps them onto audio and screen effects.

use serde::{Deserialize, Serialize};

/// Pressure cue for the whole house.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    /// Nothing undetected.
    Calm,
    /// At least one undetected anomaly; ambient tension.
    Tension,
    /// The undetected count reached the alarm threshold.
    Alarm,
}

pub fn alert_level(undetected: u32, alarm_threshold: u32) -> AlertLevel {
    if undetected == 0 {
        AlertLevel::Calm
    } else if undetected >= alarm_threshold {
        AlertLevel::Alarm
    } else {
        AlertLevel::Tension
    }
}

/// Camera distortion for the room currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GlitchLevel {
    None,
    Light,
    Heavy,
}

pub fn glitch_level(active_in_room: usize) -> GlitchLevel {
    match active_in_room {
        0 => GlitchLevel::None,
        1 => GlitchLevel::Light,
        _ => GlitchLevel::Heavy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_levels() {
        assert_eq!(alert_level(0, 3), AlertLevel::Calm);
        assert_eq!(alert_level(1, 3), AlertLevel::Tension);
        assert_eq!(alert_level(2, 3), AlertLevel::Tension);
        assert_eq!(alert_level(3, 3), AlertLevel::Alarm);
        assert_eq!(alert_level(5, 3), AlertLevel::Alarm);
    }

    #[test]
    fn test_glitch_levels() {
        assert_eq!(glitch_level(0), GlitchLevel::None);
        assert_eq!(glitch_level(1), GlitchLevel::Light);
        assert_eq!(glitch_level(4), GlitchLevel::Heavy);
    }
}
