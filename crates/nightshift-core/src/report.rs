//! End-of-shift debrief.

use nightshift_logic::clock::format_clock_label;
use nightshift_logic::scoring::detection_rate_percent;
use serde::{Deserialize, Serialize};

use crate::catalogue::RoomCatalogue;
use crate::clock::ShiftClock;
use crate::session::ShiftSession;

/// How a shift ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftOutcome {
    /// Survived until the shift duration elapsed
    Won,
    /// Undetected count reached the maximum
    Lost,
    /// Ended from outside before either condition
    Aborted,
}

impl ShiftOutcome {
    pub fn headline(self, shift_end_secs: f64) -> String {
        match self {
            ShiftOutcome::Won => format!("SHIFT COMPLETE — {}", format_clock_label(shift_end_secs)),
            ShiftOutcome::Lost => "MISSION FAILED — HOUSE COMPROMISED".to_string(),
            ShiftOutcome::Aborted => "SHIFT ABANDONED".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomReport {
    pub room_id: String,
    pub name: String,
    pub triggered: u32,
    pub resolved: u32,
    pub missed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftReport {
    pub outcome: ShiftOutcome,
    pub headline: String,
    pub total_triggered: u32,
    pub total_resolved: u32,
    pub missed: u32,
    /// Reports that matched no active anomaly
    pub false_reports: u32,
    /// Undetected count at the moment the shift ended
    pub undetected_at_end: u32,
    /// Rounded percentage; 100 when nothing was triggered
    pub detection_rate: u32,
    /// One row per room in camera order, including quiet rooms
    pub rooms: Vec<RoomReport>,
    pub ended_at_secs: f64,
    pub ended_at_label: String,
}

impl ShiftReport {
    pub fn build(
        outcome: ShiftOutcome,
        session: &ShiftSession,
        catalogue: &RoomCatalogue,
        clock: &ShiftClock,
    ) -> Self {
        let total_triggered = session.total_triggered();
        let total_resolved = session.total_resolved();

        let rooms = catalogue
            .rooms()
            .iter()
            .map(|room| {
                let tally = session.room_tally(&room.id);
                RoomReport {
                    room_id: room.id.clone(),
                    name: room.name.clone(),
                    triggered: tally.triggered,
                    resolved: tally.resolved,
                    missed: tally.missed(),
                }
            })
            .collect();

        Self {
            outcome,
            headline: outcome.headline(clock.duration_secs()),
            total_triggered,
            total_resolved,
            missed: total_triggered.saturating_sub(total_resolved),
            false_reports: session.false_reports(),
            undetected_at_end: session.undetected_count(),
            detection_rate: detection_rate_percent(total_resolved, total_triggered),
            rooms,
            ended_at_secs: clock.sim_secs(),
            ended_at_label: clock.label(),
        }
    }

    pub fn room(&self, room_id: &str) -> Option<&RoomReport> {
        self.rooms.iter().find(|r| r.room_id == room_id)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
