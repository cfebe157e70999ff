//! Cancellable delayed tasks on a real-time axis.
//!
//! The host drives the queue forward with elapsed real seconds; due entries
//! are popped one at a time in due order so a handler can schedule follow-up
//! work relative to the moment it fired.

/// Handle to a scheduled entry; never reused within one queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

#[derive(Debug, Clone)]
struct Pending<T> {
    token: TimerToken,
    due: f64,
    payload: T,
}

/// A timer that came due.
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<T> {
    pub token: TimerToken,
    /// Queue time the entry was due at
    pub due: f64,
    pub payload: T,
}

#[derive(Debug, Clone)]
pub struct DelayQueue<T> {
    now: f64,
    next_token: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for DelayQueue<T> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_token: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> DelayQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current queue time in real seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedule `payload` to fire `delay` seconds from now (negative delays fire immediately).
    pub fn schedule(&mut self, delay: f64, payload: T) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        let delay = if delay.is_finite() { delay.max(0.0) } else { 0.0 };
        self.pending.push(Pending {
            token,
            due: self.now + delay,
            payload,
        });
        token
    }

    /// Drop a pending entry. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.token != token);
        self.pending.len() != before
    }

    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.pending.iter().any(|p| p.token == token)
    }

    /// Seconds until `token` fires, if it is still pending.
    pub fn remaining(&self, token: TimerToken) -> Option<f64> {
        self.pending
            .iter()
            .find(|p| p.token == token)
            .map(|p| (p.due - self.now).max(0.0))
    }

    /// Remove and return the earliest entry due at or before `deadline`.
    ///
    /// Queue time moves to the entry's due time, so anything scheduled while
    /// handling it is measured from that instant.
    pub fn pop_due(&mut self, deadline: f64) -> Option<Fired<T>> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= deadline)
            .min_by(|(_, a), (_, b)| {
                a.due
                    .partial_cmp(&b.due)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.token.cmp(&b.token))
            })
            .map(|(idx, _)| idx)?;

        let entry = self.pending.remove(idx);
        self.now = self.now.max(entry.due);
        Some(Fired {
            token: entry.token,
            due: entry.due,
            payload: entry.payload,
        })
    }

    /// Move queue time forward without firing anything.
    pub fn advance_to(&mut self, time: f64) {
        if time > self.now {
            self.now = time;
        }
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
