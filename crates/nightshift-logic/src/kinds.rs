//! Anomaly kinds and the per-room kind pool.
//!
//! A report from the player names a room and a kind; the kind arrives as
//! free text (`"painting"`, `"tv"`, ...) and is parsed here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a visual deviation injected into a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    /// A prop moved sideways.
    Displaced,
    /// An apparition appeared.
    Extra,
    /// The room light blacked out or turned ominous.
    Light,
    /// A figure is standing in the room.
    Intruder,
    /// A prop vanished.
    Missing,
    /// The painting changed color.
    Painting,
    /// The screen is showing static.
    Tv,
}

impl AnomalyKind {
    pub const ALL: [AnomalyKind; 7] = [
        AnomalyKind::Displaced,
        AnomalyKind::Extra,
        AnomalyKind::Light,
        AnomalyKind::Intruder,
        AnomalyKind::Missing,
        AnomalyKind::Painting,
        AnomalyKind::Tv,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnomalyKind::Displaced => "displaced",
            AnomalyKind::Extra => "extra",
            AnomalyKind::Light => "light",
            AnomalyKind::Intruder => "intruder",
            AnomalyKind::Missing => "missing",
            AnomalyKind::Painting => "painting",
            AnomalyKind::Tv => "tv",
        }
    }

    /// Kinds that act on one of the room's props rather than a room feature.
    pub fn needs_target(self) -> bool {
        matches!(self, AnomalyKind::Displaced | AnomalyKind::Missing)
    }
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown anomaly kind: {0:?}")]
pub struct ParseKindError(pub String);

impl FromStr for AnomalyKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        AnomalyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}

/// Kinds that can be spawned in a room with the given optional features.
///
/// Five kinds are always available; `painting` and `tv` only when the room
/// actually has the feature. Order is stable so a uniform pick over the
/// returned slice is reproducible under a seeded roll.
pub fn kind_pool(has_painting: bool, has_screen: bool) -> Vec<AnomalyKind> {
    let mut pool = vec![
        AnomalyKind::Displaced,
        AnomalyKind::Extra,
        AnomalyKind::Light,
        AnomalyKind::Intruder,
        AnomalyKind::Missing,
    ];
    if has_painting {
        pool.push(AnomalyKind::Painting);
    }
    if has_screen {
        pool.push(AnomalyKind::Tv);
    }
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_names() {
        for kind in AnomalyKind::ALL {
            assert_eq!(kind.as_str().parse::<AnomalyKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_parse_is_lenient_about_case_and_padding() {
        assert_eq!(" TV ".parse::<AnomalyKind>(), Ok(AnomalyKind::Tv));
        assert_eq!("Painting".parse::<AnomalyKind>(), Ok(AnomalyKind::Painting));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "poltergeist".parse::<AnomalyKind>().unwrap_err();
        assert_eq!(err, ParseKindError("poltergeist".to_string()));
    }

    #[test]
    fn test_pool_without_features() {
        let pool = kind_pool(false, false);
        assert_eq!(pool.len(), 5);
        assert!(!pool.contains(&AnomalyKind::Painting));
        assert!(!pool.contains(&AnomalyKind::Tv));
    }

    #[test]
    fn test_pool_with_features() {
        assert!(kind_pool(true, false).contains(&AnomalyKind::Painting));
        assert!(!kind_pool(true, false).contains(&AnomalyKind::Tv));
        assert_eq!(kind_pool(true, true).len(), 7);
    }

    #[test]
    fn test_serde_uses_report_names() {
        let json = serde_json::to_string(&AnomalyKind::Tv).unwrap();
        assert_eq!(json, "\"tv\"");
        let kind: AnomalyKind = serde_json::from_str("\"displaced\"").unwrap();
        assert_eq!(kind, AnomalyKind::Displaced);
    }
}
