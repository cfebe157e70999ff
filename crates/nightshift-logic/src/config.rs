//! Shift configuration.
//!
//! Every field defaults to the figures the game ships with, so an empty JSON
//! object is a valid configuration:
//!
//! ```
//! use nightshift_logic::config::ShiftConfig;
//!
//! let config = ShiftConfig::from_json_str("{ \"max_anomalies\": 4 }").unwrap();
//! assert_eq!(config.max_anomalies, 4);
//! assert_eq!(config.shift_duration_secs, 7200.0);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::shift;
use crate::pacing::{DelayRange, PacingCurve};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftConfig {
    /// Simulated seconds from midnight until the shift is survived.
    pub shift_duration_secs: f64,
    /// Real seconds per simulated hour.
    pub real_seconds_per_sim_hour: f64,
    /// Undetected count that ends the shift as a loss.
    pub max_anomalies: u32,
    /// Real seconds from shift start to the first spawn.
    pub first_spawn_delay_secs: f64,
    pub pacing: PacingCurve,
    /// Undetected count at which presentation raises the alarm cue.
    pub alarm_threshold: u32,
    /// Seed for the shift RNG (None = seeded from entropy).
    pub seed: Option<u64>,
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self {
            shift_duration_secs: shift::DURATION_SECS,
            real_seconds_per_sim_hour: shift::REAL_SECONDS_PER_SIM_HOUR,
            max_anomalies: shift::MAX_ANOMALIES,
            first_spawn_delay_secs: shift::FIRST_SPAWN_DELAY_SECS,
            pacing: PacingCurve::default(),
            alarm_threshold: shift::ALARM_THRESHOLD,
            seed: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read shift config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse shift config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid shift config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ShiftConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ShiftConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Real seconds a full shift lasts at this scale.
    pub fn real_shift_length_secs(&self) -> f64 {
        crate::clock::real_duration(self.shift_duration_secs, self.real_seconds_per_sim_hour)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first field outside its bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("shift_duration_secs", self.shift_duration_secs)?;
        positive("real_seconds_per_sim_hour", self.real_seconds_per_sim_hour)?;
        if self.max_anomalies == 0 {
            return Err(invalid("max_anomalies", "must be at least 1"));
        }
        if !self.first_spawn_delay_secs.is_finite() || self.first_spawn_delay_secs < 0.0 {
            return Err(invalid(
                "first_spawn_delay_secs",
                format!("must be a non-negative number, got {}", self.first_spawn_delay_secs),
            ));
        }
        if self.alarm_threshold > self.max_anomalies {
            return Err(invalid(
                "alarm_threshold",
                format!(
                    "{} exceeds max_anomalies {}",
                    self.alarm_threshold, self.max_anomalies
                ),
            ));
        }
        self.validate_pacing()
    }

    fn validate_pacing(&self) -> Result<(), ConfigError> {
        let pacing = &self.pacing;
        let ordered = pacing.early_until > 0.0
            && pacing.early_until <= pacing.late_from
            && pacing.late_from < 1.0;
        if !ordered {
            return Err(invalid(
                "pacing",
                format!(
                    "thresholds must satisfy 0 < early_until <= late_from < 1, got {} and {}",
                    pacing.early_until, pacing.late_from
                ),
            ));
        }
        delay_range("pacing.early", &pacing.early)?;
        delay_range("pacing.mid", &pacing.mid)?;
        delay_range("pacing.late", &pacing.late)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be a positive number, got {}", value)))
    }
}

fn delay_range(field: &'static str, range: &DelayRange) -> Result<(), ConfigError> {
    let sane = range.min_secs.is_finite()
        && range.max_secs.is_finite()
        && range.min_secs >= 0.0
        && range.min_secs <= range.max_secs;
    if sane {
        Ok(())
    } else {
        Err(invalid(
            field,
            format!("expected 0 <= min <= max, got [{}, {}]", range.min_secs, range.max_secs),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ShiftConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_anomalies, 5);
        assert_eq!(config.shift_duration_secs, 7200.0);
    }

    #[test]
    fn test_default_real_length() {
        // Two simulated hours at 1500 real seconds each.
        let config = ShiftConfig::default();
        assert!((config.real_shift_length_secs() - 3000.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = ShiftConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ShiftConfig::default());
    }

    #[test]
    fn test_partial_pacing_override() {
        let json = r#"{ "pacing": { "late": { "min_secs": 20.0, "max_secs": 30.0 } }, "seed": 9 }"#;
        let config = ShiftConfig::from_json_str(json).unwrap();
        assert_eq!(config.pacing.late, DelayRange::new(20.0, 30.0));
        assert_eq!(config.pacing.early_until, 0.33);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_rejects_zero_max() {
        let err = ShiftConfig::from_json_str(r#"{ "max_anomalies": 0, "alarm_threshold": 0 }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "max_anomalies", .. }));
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        let config = ShiftConfig {
            shift_duration_secs: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "shift_duration_secs", .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_band() {
        let mut config = ShiftConfig::default();
        config.pacing.mid = DelayRange::new(80.0, 60.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "pacing.mid", .. })
        ));
    }

    #[test]
    fn test_rejects_unordered_thresholds() {
        let mut config = ShiftConfig::default();
        config.pacing.early_until = 0.8;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "pacing", .. })));
    }

    #[test]
    fn test_rejects_alarm_above_max() {
        let config = ShiftConfig {
            alarm_threshold: 6,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error_surfaces() {
        let err = ShiftConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ShiftConfig::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
