//! Shared simulation state
//!
//! All fields live behind a single mutex so multi-field invariants, such as
//! "exactly one quadrant is active", are never observed half-updated.

use log::warn;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::snapshot::Snapshot;
use super::types::{Phase, PerQuadrant, PhaseTiming, Quadrant};

/// The data guarded by [`SimulationState`]'s lock
#[derive(Debug, Clone)]
pub struct StateData {
    counts: PerQuadrant<u32>,
    active: Quadrant,
    phase: Phase,
    running: bool,
    /// Display-only identity of the worker serving each quadrant
    workers: PerQuadrant<Option<String>>,
}

impl StateData {
    pub fn new(start: Quadrant, counts: [u32; 4]) -> Self {
        Self {
            counts: PerQuadrant::new(counts),
            active: start,
            phase: Phase::Green,
            running: true,
            workers: PerQuadrant::default(),
        }
    }

    pub fn count(&self, quadrant: Quadrant) -> u32 {
        self.counts[quadrant]
    }

    pub fn counts(&self) -> PerQuadrant<u32> {
        self.counts
    }

    pub fn active(&self) -> Quadrant {
        self.active
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn workers(&self) -> &PerQuadrant<Option<String>> {
        &self.workers
    }

    /// Remove one departing vehicle. Returns false if the queue was empty.
    pub fn depart(&mut self, quadrant: Quadrant) -> bool {
        let count = &mut self.counts[quadrant];
        if *count > 0 {
            *count -= 1;
            true
        } else {
            false
        }
    }

    /// Add one arriving vehicle
    pub fn arrive(&mut self, quadrant: Quadrant) {
        let count = &mut self.counts[quadrant];
        *count = count.saturating_add(1);
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Hand the green phase to the next quadrant in rotation
    pub(crate) fn advance(&mut self) -> Quadrant {
        self.active = self.active.next();
        self.phase = Phase::Green;
        self.active
    }

    /// Clear the running flag. The flag never goes back to true.
    pub(crate) fn stop(&mut self) {
        self.running = false;
    }

    pub(crate) fn register_worker(&mut self, quadrant: Quadrant, identity: String) {
        self.workers[quadrant] = Some(identity);
    }
}

/// Shared handle around [`StateData`]
///
/// Every read or write goes through one lock acquisition and the lock is
/// never held while a thread sleeps.
#[derive(Debug)]
pub struct SimulationState {
    data: Mutex<StateData>,
}

impl SimulationState {
    pub fn new(start: Quadrant, counts: [u32; 4]) -> Self {
        Self {
            data: Mutex::new(StateData::new(start, counts)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StateData> {
        self.data.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            warn!("Simulation state lock was poisoned, continuing with last written state");
            poisoned.into_inner()
        })
    }

    /// Run `f` inside a single critical section.
    ///
    /// Outside this crate only the count mutators (`depart`, `arrive`) are
    /// reachable. Phase, active quadrant and the running flag are written by
    /// the scheduler and supervisor alone.
    pub fn with_lock<T>(&self, f: impl FnOnce(&mut StateData) -> T) -> T {
        let mut guard = self.lock();
        f(&mut guard)
    }

    pub fn is_running(&self) -> bool {
        self.lock().is_running()
    }

    pub fn active(&self) -> Quadrant {
        self.lock().active()
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase()
    }

    pub fn counts(&self) -> PerQuadrant<u32> {
        self.lock().counts()
    }

    pub fn register_worker(&self, quadrant: Quadrant, identity: String) {
        self.lock().register_worker(quadrant, identity);
    }

    /// Copy out everything a renderer needs in one acquisition
    pub fn snapshot(&self, elapsed_in_phase: Duration, timing: &PhaseTiming) -> Snapshot {
        let data = self.lock();
        Snapshot::capture(&data, elapsed_in_phase, timing)
    }
}
