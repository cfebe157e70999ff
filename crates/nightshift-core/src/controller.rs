//! Shift controller - the game state machine.
//!
//! Owns everything one shift needs: the room catalogue, a fresh
//! [`ShiftSession`] per shift, the [`ShiftClock`], and the delay queue the
//! [`SpawnScheduler`] arms. The host drives it with [`ShiftController::update`]
//! once per frame and forwards player reports to [`ShiftController::report`];
//! both hand back [`ShiftEvent`]s for the presentation to react to.

use std::fmt;

use nightshift_logic::alerts::{alert_level, glitch_level, AlertLevel, GlitchLevel};
use nightshift_logic::config::{ConfigError, ShiftConfig};
use nightshift_logic::kinds::AnomalyKind;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalogue::{CatalogueError, RoomCatalogue};
use crate::clock::ShiftClock;
use crate::report::{ShiftOutcome, ShiftReport};
use crate::session::ShiftSession;
use crate::systems::{AnomalyId, DelayQueue, Fired, SpawnScheduler, TimerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftState {
    /// Pre-game
    Idle,
    /// Free look, no spawns and no scoring
    Briefing,
    /// Clock and scheduler running, reports accepted
    Active,
    /// Shift over; summary available
    Complete,
}

impl fmt::Display for ShiftState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShiftState::Idle => "idle",
            ShiftState::Briefing => "briefing",
            ShiftState::Active => "active",
            ShiftState::Complete => "complete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ShiftError {
    #[error("cannot {action} while the shift is {from}")]
    InvalidTransition { from: ShiftState, action: &'static str },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
}

/// Something the presentation should react to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ShiftEvent {
    AnomalySpawned {
        id: AnomalyId,
        room: String,
        kind: AnomalyKind,
        undetected: u32,
    },
    AnomalyResolved {
        id: AnomalyId,
        room: String,
        kind: AnomalyKind,
        undetected: u32,
    },
    /// A report that matched nothing; `kind` is `None` when the text named no kind
    WrongReport {
        room: String,
        kind: Option<AnomalyKind>,
        undetected: u32,
    },
    ShiftEnded { outcome: ShiftOutcome },
}

/// What became of a player report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    Resolved { id: AnomalyId },
    /// Penalised; carries the undetected count after the penalty
    Wrong { undetected: u32 },
    /// Not accepted because no shift is active
    Rejected,
}

pub struct ShiftController {
    config: ShiftConfig,
    catalogue: RoomCatalogue,
    state: ShiftState,
    session: ShiftSession,
    clock: ShiftClock,
    timers: DelayQueue<TimerEvent>,
    scheduler: SpawnScheduler,
    rng: StdRng,
    events: Vec<ShiftEvent>,
    summary: Option<ShiftReport>,
    shifts_started: u32,
}

impl ShiftController {
    /// Create a controller in `Idle`. The config is validated first.
    pub fn new(catalogue: RoomCatalogue, config: ShiftConfig) -> Result<Self, ShiftError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            session: ShiftSession::new(config.max_anomalies),
            clock: ShiftClock::new(&config),
            config,
            catalogue,
            state: ShiftState::Idle,
            timers: DelayQueue::new(),
            scheduler: SpawnScheduler::new(),
            rng,
            events: Vec::new(),
            summary: None,
            shifts_started: 0,
        })
    }

    /// Controller over the six-room default house.
    pub fn with_default_house(config: ShiftConfig) -> Result<Self, ShiftError> {
        Self::new(RoomCatalogue::default_house()?, config)
    }

    pub fn enter_briefing(&mut self) -> Result<(), ShiftError> {
        self.require(&[ShiftState::Idle], "enter briefing")?;
        self.transition(ShiftState::Briefing);
        Ok(())
    }

    /// Begin a shift from zeroed counters, an empty active set, a pristine
    /// house and a clock at midnight.
    pub fn start_shift(&mut self) -> Result<(), ShiftError> {
        self.require(&[ShiftState::Idle, ShiftState::Briefing], "start a shift")?;

        self.catalogue.reset();
        self.session = ShiftSession::new(self.config.max_anomalies);
        self.clock.reset();
        self.timers.clear();
        self.events.clear();
        self.summary = None;
        self.shifts_started += 1;

        self.transition(ShiftState::Active);
        self.scheduler.start(&mut self.timers, self.config.first_spawn_delay_secs);
        log::info!(
            "Shift {} started: {} rooms, first spawn in {:.0}s",
            self.shifts_started,
            self.catalogue.len(),
            self.config.first_spawn_delay_secs
        );
        Ok(())
    }

    /// End the active shift early.
    pub fn abort(&mut self) -> Result<(), ShiftError> {
        self.require(&[ShiftState::Active], "abort")?;
        self.finish(ShiftOutcome::Aborted);
        Ok(())
    }

    /// Leave the debrief. The summary stays readable until the next shift starts.
    pub fn return_to_idle(&mut self) -> Result<(), ShiftError> {
        self.require(&[ShiftState::Complete, ShiftState::Briefing], "return to idle")?;
        self.transition(ShiftState::Idle);
        Ok(())
    }

    /// Advance by `real_delta` real seconds and return the events produced
    /// since the last call.
    ///
    /// The step is played out in time order: the clock runs up to each due
    /// spawn timer, the win is checked, and only then does the spawn fire.
    /// The rest of the step follows, with a final win check.
    pub fn update(&mut self, real_delta: f64) -> Vec<ShiftEvent> {
        let real_delta = if real_delta.is_finite() { real_delta.max(0.0) } else { 0.0 };
        let mut ticked_to = self.timers.now();
        let deadline = ticked_to + real_delta;

        while let Some(fired) = self.timers.pop_due(deadline) {
            self.advance_clock(fired.due - ticked_to);
            ticked_to = ticked_to.max(fired.due);
            self.on_timer(fired);
        }
        self.timers.advance_to(deadline);
        self.advance_clock(deadline - ticked_to);

        self.drain_events()
    }

    /// Player report: `kind` spotted in `room_id`.
    ///
    /// Resolves the earliest matching anomaly, or costs one undetected point
    /// (which may end the shift as a loss). Rejected outside `Active`.
    pub fn report(&mut self, room_id: &str, kind: AnomalyKind) -> ReportOutcome {
        if self.state != ShiftState::Active {
            log::debug!("Report {}/{} rejected while {}", room_id, kind, self.state);
            return ReportOutcome::Rejected;
        }

        match self.session.resolve_anomaly(&mut self.catalogue, room_id, kind) {
            Some(anomaly) => {
                self.events.push(ShiftEvent::AnomalyResolved {
                    id: anomaly.id,
                    room: anomaly.room,
                    kind: anomaly.kind,
                    undetected: self.session.undetected_count(),
                });
                ReportOutcome::Resolved { id: anomaly.id }
            }
            None => self.penalise(room_id, Some(kind)),
        }
    }

    /// Report with a free-text kind. Text that names no kind is a wrong report.
    pub fn report_raw(&mut self, room_id: &str, kind: &str) -> ReportOutcome {
        match kind.parse::<AnomalyKind>() {
            Ok(kind) => self.report(room_id, kind),
            Err(err) if self.state == ShiftState::Active => {
                log::debug!("Unparseable report: {}", err);
                self.penalise(room_id, None)
            }
            Err(_) => ReportOutcome::Rejected,
        }
    }

    /// Take the events queued since the last `update`.
    pub fn drain_events(&mut self) -> Vec<ShiftEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> ShiftState {
        self.state
    }

    pub fn config(&self) -> &ShiftConfig {
        &self.config
    }

    pub fn catalogue(&self) -> &RoomCatalogue {
        &self.catalogue
    }

    pub fn session(&self) -> &ShiftSession {
        &self.session
    }

    pub fn clock(&self) -> &ShiftClock {
        &self.clock
    }

    pub fn clock_label(&self) -> String {
        self.clock.label()
    }

    pub fn undetected_count(&self) -> u32 {
        self.session.undetected_count()
    }

    pub fn alert_level(&self) -> AlertLevel {
        alert_level(self.session.undetected_count(), self.config.alarm_threshold)
    }

    /// Camera feed distortion for one room.
    pub fn glitch_level(&self, room_id: &str) -> GlitchLevel {
        glitch_level(self.session.active_in_room(room_id))
    }

    /// Real seconds until the next spawn, if one is armed.
    pub fn next_spawn_in(&self) -> Option<f64> {
        self.scheduler.pending().and_then(|token| self.timers.remaining(token))
    }

    pub fn spawns_scheduled(&self) -> u32 {
        self.scheduler.scheduled()
    }

    /// Debrief of the most recent finished shift.
    pub fn summary(&self) -> Option<&ShiftReport> {
        self.summary.as_ref()
    }

    pub fn shifts_started(&self) -> u32 {
        self.shifts_started
    }

    fn advance_clock(&mut self, real_delta: f64) {
        self.clock.tick(self.state, real_delta.max(0.0));
        if self.state == ShiftState::Active && self.clock.is_elapsed() {
            self.finish(ShiftOutcome::Won);
        }
    }

    fn on_timer(&mut self, fired: Fired<TimerEvent>) {
        match fired.payload {
            TimerEvent::SpawnAnomaly => {
                let current = self.scheduler.acknowledge(fired.token);
                if !current || self.state != ShiftState::Active {
                    log::debug!("Discarding stale spawn timer {:?} while {}", fired.token, self.state);
                    return;
                }

                let anomaly = self
                    .session
                    .spawn(&mut self.catalogue, &mut self.rng, self.clock.sim_secs());
                self.events.push(ShiftEvent::AnomalySpawned {
                    id: anomaly.id,
                    room: anomaly.room,
                    kind: anomaly.kind,
                    undetected: self.session.undetected_count(),
                });

                if self.session.is_lost() {
                    self.finish(ShiftOutcome::Lost);
                } else {
                    self.scheduler.schedule_next(
                        &mut self.timers,
                        &self.config.pacing,
                        self.clock.progress(),
                        &mut self.rng,
                    );
                }
            }
        }
    }

    fn penalise(&mut self, room_id: &str, kind: Option<AnomalyKind>) -> ReportOutcome {
        let undetected = self.session.apply_wrong_report_penalty();
        self.events.push(ShiftEvent::WrongReport {
            room: room_id.to_string(),
            kind,
            undetected,
        });
        if self.session.is_lost() {
            self.finish(ShiftOutcome::Lost);
        }
        ReportOutcome::Wrong { undetected }
    }

    /// Active -> Complete. Cancels the pending spawn, records the summary and
    /// drops whatever is still unresolved.
    fn finish(&mut self, outcome: ShiftOutcome) {
        if self.state != ShiftState::Active {
            return;
        }
        self.scheduler.stop(&mut self.timers);
        self.transition(ShiftState::Complete);

        let report = ShiftReport::build(outcome, &self.session, &self.catalogue, &self.clock);
        let dropped = self.session.discard_unresolved();
        log::info!(
            "Shift ended {:?} at {}: {}/{} resolved, {} left unresolved, detection rate {}%",
            outcome,
            report.ended_at_label,
            report.total_resolved,
            report.total_triggered,
            dropped,
            report.detection_rate
        );

        self.summary = Some(report);
        self.events.push(ShiftEvent::ShiftEnded { outcome });
    }

    fn require(&self, allowed: &[ShiftState], action: &'static str) -> Result<(), ShiftError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(ShiftError::InvalidTransition {
                from: self.state,
                action,
            })
        }
    }

    fn transition(&mut self, to: ShiftState) {
        log::info!("Shift state {} -> {}", self.state, to);
        self.state = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::RoomSpec;

    fn config() -> ShiftConfig {
        ShiftConfig::default().with_seed(42)
    }

    fn controller() -> ShiftController {
        ShiftController::with_default_house(config()).unwrap()
    }

    fn spawned(events: &[ShiftEvent]) -> Vec<(String, AnomalyKind)> {
        events
            .iter()
            .filter_map(|e| match e {
                ShiftEvent::AnomalySpawned { room, kind, .. } => Some((room.clone(), *kind)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut ctl = controller();
        assert_eq!(ctl.state(), ShiftState::Idle);
        ctl.enter_briefing().unwrap();
        assert_eq!(ctl.state(), ShiftState::Briefing);
        ctl.start_shift().unwrap();
        assert_eq!(ctl.state(), ShiftState::Active);
        ctl.abort().unwrap();
        assert_eq!(ctl.state(), ShiftState::Complete);
        ctl.return_to_idle().unwrap();
        assert_eq!(ctl.state(), ShiftState::Idle);
        ctl.start_shift().unwrap();
        assert_eq!(ctl.shifts_started(), 2);
    }

    #[test]
    fn test_illegal_transitions_rejected() {
        let mut ctl = controller();
        assert!(ctl.abort().is_err());
        assert!(ctl.return_to_idle().is_err());
        ctl.start_shift().unwrap();
        assert!(matches!(
            ctl.enter_briefing(),
            Err(ShiftError::InvalidTransition { from: ShiftState::Active, .. })
        ));
        assert!(ctl.start_shift().is_err());
        ctl.abort().unwrap();
        assert!(ctl.start_shift().is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut bad = config();
        bad.max_anomalies = 0;
        assert!(matches!(
            ShiftController::with_default_house(bad),
            Err(ShiftError::Config(_))
        ));
    }

    #[test]
    fn test_briefing_spawns_nothing() {
        let mut ctl = controller();
        ctl.enter_briefing().unwrap();
        let events = ctl.update(500.0);
        assert!(events.is_empty());
        assert_eq!(ctl.clock().sim_secs(), 0.0);
        assert_eq!(ctl.session().total_triggered(), 0);
    }

    #[test]
    fn test_first_spawn_after_fixed_delay() {
        let mut ctl = controller();
        ctl.start_shift().unwrap();
        assert_eq!(ctl.next_spawn_in(), Some(15.0));

        assert!(ctl.update(14.0).is_empty());
        let events = ctl.update(1.0);
        assert_eq!(spawned(&events).len(), 1);

        let next = ctl.next_spawn_in().unwrap();
        assert!((90.0..=120.0).contains(&next), "next spawn in {next}");
    }

    #[test]
    fn test_report_outside_active_rejected() {
        let mut ctl = controller();
        assert_eq!(ctl.report("kitchen", AnomalyKind::Light), ReportOutcome::Rejected);
        assert_eq!(ctl.report_raw("kitchen", "nonsense"), ReportOutcome::Rejected);
        assert_eq!(ctl.undetected_count(), 0);
    }

    #[test]
    fn test_report_resolves_spawned_anomaly() {
        let mut ctl = controller();
        ctl.start_shift().unwrap();
        let events = ctl.update(15.0);
        let (room, kind) = spawned(&events).remove(0);
        assert_eq!(ctl.glitch_level(&room), GlitchLevel::Light);

        let outcome = ctl.report(&room, kind);
        assert!(matches!(outcome, ReportOutcome::Resolved { .. }));
        assert_eq!(ctl.undetected_count(), 0);
        assert_eq!(ctl.glitch_level(&room), GlitchLevel::None);
        assert!(matches!(ctl.drain_events()[0], ShiftEvent::AnomalyResolved { .. }));
    }

    #[test]
    fn test_unparseable_report_is_penalised() {
        let mut ctl = controller();
        ctl.start_shift().unwrap();
        assert_eq!(
            ctl.report_raw("kitchen", "ghost"),
            ReportOutcome::Wrong { undetected: 1 }
        );
        assert_eq!(
            ctl.drain_events(),
            vec![ShiftEvent::WrongReport {
                room: "kitchen".into(),
                kind: None,
                undetected: 1
            }]
        );
        assert_eq!(ctl.report_raw("kitchen", " LIGHT "), ReportOutcome::Wrong { undetected: 2 });
    }

    #[test]
    fn test_wrong_reports_end_shift_once() {
        let mut ctl = controller();
        ctl.start_shift().unwrap();
        for _ in 0..4 {
            ctl.report("bathroom", AnomalyKind::Tv);
        }
        assert_eq!(ctl.alert_level(), AlertLevel::Alarm);
        assert_eq!(ctl.state(), ShiftState::Active);

        assert_eq!(ctl.report("bathroom", AnomalyKind::Tv), ReportOutcome::Wrong { undetected: 5 });
        assert_eq!(ctl.state(), ShiftState::Complete);
        assert_eq!(ctl.next_spawn_in(), None);

        let ended = ctl
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, ShiftEvent::ShiftEnded { .. }))
            .count();
        assert_eq!(ended, 1);
        assert_eq!(ctl.report("bathroom", AnomalyKind::Tv), ReportOutcome::Rejected);
        assert_eq!(ctl.summary().unwrap().outcome, ShiftOutcome::Lost);
        assert!(ctl.update(10_000.0).is_empty());
    }

    #[test]
    fn test_stale_timer_discarded() {
        let mut ctl = controller();
        ctl.start_shift().unwrap();
        ctl.abort().unwrap();
        ctl.timers.schedule(1.0, TimerEvent::SpawnAnomaly);

        let events = ctl.update(5.0);
        assert!(events.is_empty());
        assert_eq!(ctl.session().total_triggered(), 0);
        assert!(ctl.timers.is_empty());
    }

    #[test]
    fn test_abort_cancels_pending_spawn() {
        let mut ctl = controller();
        ctl.start_shift().unwrap();
        ctl.abort().unwrap();
        assert!(ctl.timers.is_empty());
        assert_eq!(ctl.summary().unwrap().outcome, ShiftOutcome::Aborted);
        assert_eq!(ctl.drain_events(), vec![ShiftEvent::ShiftEnded { outcome: ShiftOutcome::Aborted }]);
    }

    #[test]
    fn test_new_shift_starts_clean() {
        let mut ctl = controller();
        ctl.start_shift().unwrap();
        ctl.update(15.0);
        ctl.report("bathroom", AnomalyKind::Tv);
        ctl.abort().unwrap();
        assert!(ctl.summary().is_some());

        ctl.return_to_idle().unwrap();
        assert!(ctl.summary().is_some());
        ctl.start_shift().unwrap();

        assert!(ctl.summary().is_none());
        assert_eq!(ctl.undetected_count(), 0);
        assert_eq!(ctl.session().total_triggered(), 0);
        assert_eq!(ctl.session().false_reports(), 0);
        assert!(ctl.session().active().is_empty());
        assert_eq!(ctl.catalogue().artifact_count(), 0);
        assert_eq!(ctl.clock().sim_secs(), 0.0);
        assert_eq!(ctl.next_spawn_in(), Some(15.0));
    }

    #[test]
    fn test_short_quiet_shift_wins() {
        let mut cfg = config();
        cfg.shift_duration_secs = 10.0;
        let catalogue = RoomCatalogue::from_specs(vec![
            RoomSpec::new("bathroom", "Bathroom").with_prop("toilet", -2.0, 0.5, -1.5),
        ])
        .unwrap();
        let mut ctl = ShiftController::new(catalogue, cfg).unwrap();
        ctl.start_shift().unwrap();

        // 10 simulated seconds take a little over 4 real seconds
        let events = ctl.update(5.0);
        assert_eq!(events, vec![ShiftEvent::ShiftEnded { outcome: ShiftOutcome::Won }]);
        let summary = ctl.summary().unwrap();
        assert_eq!(summary.total_triggered, 0);
        assert_eq!(summary.detection_rate, 100);
    }
}
