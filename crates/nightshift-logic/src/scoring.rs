//! Scoring for the end-of-shift debrief.

use serde::{Deserialize, Serialize};

/// Triggered/resolved counts for a single room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomTally {
    pub triggered: u32,
    pub resolved: u32,
}

impl RoomTally {
    pub fn missed(&self) -> u32 {
        self.triggered.saturating_sub(self.resolved)
    }
}

/// Share of triggered anomalies that were resolved, as a rounded percentage.
///
/// A shift where nothing was triggered scores 100.
pub fn detection_rate_percent(resolved: u32, triggered: u32) -> u32 {
    if triggered == 0 {
        return 100;
    }
    let rate = f64::from(resolved.min(triggered)) / f64::from(triggered) * 100.0;
    rate.round() as u32
}
