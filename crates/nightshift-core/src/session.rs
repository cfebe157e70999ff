//! Shift session - the anomaly engine's state for one shift.
//!
//! A fresh session is built every time a shift starts, so counters and the
//! active set can never leak from one shift into the next.

use std::collections::HashMap;

use nightshift_logic::kinds::AnomalyKind;
use nightshift_logic::scoring::RoomTally;
use rand::Rng;

use crate::catalogue::RoomCatalogue;
use crate::systems::{apply_mutation, restore_mutation, Anomaly, AnomalyId};

#[derive(Debug, Clone)]
pub struct ShiftSession {
    /// Unresolved anomalies in spawn order
    active: Vec<Anomaly>,
    undetected_count: u32,
    total_triggered: u32,
    total_resolved: u32,
    /// Reports that matched nothing
    false_reports: u32,
    room_log: HashMap<String, RoomTally>,
    max_anomalies: u32,
    next_id: AnomalyId,
}

impl ShiftSession {
    pub fn new(max_anomalies: u32) -> Self {
        Self {
            active: Vec::new(),
            undetected_count: 0,
            total_triggered: 0,
            total_resolved: 0,
            false_reports: 0,
            room_log: HashMap::new(),
            max_anomalies,
            next_id: 1,
        }
    }

    /// Spawn an anomaly in a uniformly chosen room, of a kind that room supports.
    pub fn spawn(
        &mut self,
        catalogue: &mut RoomCatalogue,
        rng: &mut impl Rng,
        sim_time: f64,
    ) -> Anomaly {
        let room_index = rng.gen_range(0..catalogue.len());
        let pool = catalogue.rooms()[room_index].kind_pool();
        let kind = pool[rng.gen_range(0..pool.len())];
        self.spawn_at(catalogue, room_index, kind, rng, sim_time)
    }

    /// Spawn a specific kind in a named room, bypassing the random pick.
    ///
    /// A kind the room has no feature for is still recorded but leaves the
    /// room untouched. Returns `None` for an unknown room.
    pub fn spawn_kind(
        &mut self,
        catalogue: &mut RoomCatalogue,
        room_id: &str,
        kind: AnomalyKind,
        rng: &mut impl Rng,
        sim_time: f64,
    ) -> Option<Anomaly> {
        let room_index = catalogue.index_of(room_id)?;
        Some(self.spawn_at(catalogue, room_index, kind, rng, sim_time))
    }

    fn spawn_at(
        &mut self,
        catalogue: &mut RoomCatalogue,
        room_index: usize,
        kind: AnomalyKind,
        rng: &mut impl Rng,
        sim_time: f64,
    ) -> Anomaly {
        // Reaching here with the threshold met means a loss transition was missed.
        debug_assert!(
            self.undetected_count < self.max_anomalies,
            "spawn into a lost session ({}/{})",
            self.undetected_count,
            self.max_anomalies
        );
        let id = self.next_id;
        self.next_id += 1;

        let (room, world) = catalogue.room_and_world_at(room_index);
        let target = if room.objects.is_empty() {
            None
        } else {
            Some(room.objects[rng.gen_range(0..room.objects.len())])
        };
        let mut anomaly = Anomaly::new(id, room, room_index, kind, target, sim_time);
        apply_mutation(room, world, &mut anomaly, rng);

        self.active.push(anomaly.clone());
        self.undetected_count = (self.undetected_count + 1).min(self.max_anomalies);
        self.total_triggered += 1;
        self.room_log.entry(anomaly.room.clone()).or_default().triggered += 1;

        log::info!(
            "Anomaly {} triggered in {}: {} (undetected {}/{})",
            anomaly.id,
            anomaly.room,
            anomaly.kind,
            self.undetected_count,
            self.max_anomalies
        );
        anomaly
    }

    /// Resolve the earliest active anomaly matching `room_id` and `kind`.
    ///
    /// Returns false, touching nothing, when no active anomaly matches.
    pub fn resolve(&mut self, catalogue: &mut RoomCatalogue, room_id: &str, kind: AnomalyKind) -> bool {
        self.resolve_anomaly(catalogue, room_id, kind).is_some()
    }

    /// Like [`ShiftSession::resolve`], returning the resolved anomaly.
    pub fn resolve_anomaly(
        &mut self,
        catalogue: &mut RoomCatalogue,
        room_id: &str,
        kind: AnomalyKind,
    ) -> Option<Anomaly> {
        let idx = self.active.iter().position(|a| a.matches(room_id, kind))?;
        let mut anomaly = self.active.remove(idx);

        if let Some((room, world)) = catalogue.room_and_world_mut(anomaly.room_index) {
            restore_mutation(room, world, &mut anomaly);
        }

        self.undetected_count = self.undetected_count.saturating_sub(1);
        self.total_resolved += 1;
        if let Some(tally) = self.room_log.get_mut(room_id) {
            tally.resolved += 1;
        }

        log::info!(
            "Anomaly {} resolved in {}: {} (undetected {})",
            anomaly.id,
            anomaly.room,
            anomaly.kind,
            self.undetected_count
        );
        Some(anomaly)
    }

    /// A report that matched nothing costs one undetected point, capped at the maximum.
    ///
    /// Only the undetected count moves; the active set, totals and room log do not.
    pub fn apply_wrong_report_penalty(&mut self) -> u32 {
        self.undetected_count = (self.undetected_count + 1).min(self.max_anomalies);
        self.false_reports += 1;
        log::info!(
            "Wrong report penalty (undetected {}/{})",
            self.undetected_count,
            self.max_anomalies
        );
        self.undetected_count
    }

    /// Drop every unresolved anomaly without reversing it; returns how many were dropped.
    ///
    /// Dropped anomalies no longer count as undetected. Penalty points from
    /// wrong reports stay.
    pub fn discard_unresolved(&mut self) -> usize {
        let dropped = self.active.len();
        self.active.clear();
        self.undetected_count = self
            .undetected_count
            .saturating_sub(u32::try_from(dropped).unwrap_or(u32::MAX));
        dropped
    }

    pub fn is_lost(&self) -> bool {
        self.undetected_count >= self.max_anomalies
    }

    pub fn active(&self) -> &[Anomaly] {
        &self.active
    }

    pub fn active_in_room(&self, room_id: &str) -> usize {
        self.active.iter().filter(|a| a.room == room_id).count()
    }

    pub fn undetected_count(&self) -> u32 {
        self.undetected_count
    }

    pub fn total_triggered(&self) -> u32 {
        self.total_triggered
    }

    pub fn total_resolved(&self) -> u32 {
        self.total_resolved
    }

    pub fn false_reports(&self) -> u32 {
        self.false_reports
    }

    pub fn max_anomalies(&self) -> u32 {
        self.max_anomalies
    }

    pub fn room_tally(&self, room_id: &str) -> RoomTally {
        self.room_log.get(room_id).copied().unwrap_or_default()
    }

    pub fn room_log(&self) -> &HashMap<String, RoomTally> {
        &self.room_log
    }
}
