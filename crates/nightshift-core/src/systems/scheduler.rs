//! Spawn scheduler - one outstanding spawn timer at a time.
//!
//! The first spawn comes after a short fixed delay; every later one after a
//! delay drawn from the pacing curve for the current shift progress. The
//! scheduler holds the token of the single pending timer and invalidates it
//! when the shift ends.

use nightshift_logic::pacing::PacingCurve;
use rand::Rng;

use super::timers::{DelayQueue, TimerToken};

/// Payloads carried by the controller's delay queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    SpawnAnomaly,
}

#[derive(Debug, Clone, Default)]
pub struct SpawnScheduler {
    pending: Option<TimerToken>,
    /// Spawn timers armed since the last start
    scheduled: u32,
    stopped: bool,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the first spawn of a shift, replacing anything still pending.
    pub fn start(&mut self, queue: &mut DelayQueue<TimerEvent>, first_delay_secs: f64) -> TimerToken {
        self.cancel_pending(queue);
        self.stopped = false;
        self.scheduled = 0;
        self.arm(queue, first_delay_secs)
    }

    /// Arm the next spawn using the pacing curve. Returns the chosen delay.
    pub fn schedule_next(
        &mut self,
        queue: &mut DelayQueue<TimerEvent>,
        pacing: &PacingCurve,
        progress: f64,
        rng: &mut impl Rng,
    ) -> Option<f64> {
        if self.stopped {
            return None;
        }
        let delay = pacing.next_delay(progress, rng.gen::<f64>());
        self.arm(queue, delay);
        log::debug!(
            "Next spawn in {:.1}s (progress {:.2}, {:?} band)",
            delay,
            progress,
            pacing.band(progress)
        );
        Some(delay)
    }

    /// Claim a fired timer. Only the currently armed token is accepted;
    /// anything else is a leftover from a cancelled or earlier arming.
    pub fn acknowledge(&mut self, token: TimerToken) -> bool {
        if self.stopped || self.pending != Some(token) {
            return false;
        }
        self.pending = None;
        true
    }

    /// Cancel the pending timer and refuse to arm new ones until the next start.
    pub fn stop(&mut self, queue: &mut DelayQueue<TimerEvent>) {
        self.cancel_pending(queue);
        self.stopped = true;
    }

    pub fn pending(&self) -> Option<TimerToken> {
        self.pending
    }

    pub fn scheduled(&self) -> u32 {
        self.scheduled
    }

    fn arm(&mut self, queue: &mut DelayQueue<TimerEvent>, delay: f64) -> TimerToken {
        let token = queue.schedule(delay, TimerEvent::SpawnAnomaly);
        self.pending = Some(token);
        self.scheduled += 1;
        token
    }

    fn cancel_pending(&mut self, queue: &mut DelayQueue<TimerEvent>) {
        if let Some(token) = self.pending.take() {
            queue.cancel(token);
        }
    }
}
