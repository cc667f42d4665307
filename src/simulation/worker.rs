//! Per-quadrant vehicle worker
//!
//! Each quadrant has one worker thread that wakes once per tick, drains a
//! vehicle while its quadrant holds the light and adds an arrival every
//! [`ARRIVAL_TICKS`] ticks.

use log::{debug, trace};
use std::thread;

use super::state::{SimulationState, StateData};
use super::types::{PhaseTiming, Quadrant, ARRIVAL_TICKS};

/// What happened to a quadrant's queue on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    pub departed: bool,
    pub arrived: bool,
}

/// Periodic updater for one quadrant's vehicle count
#[derive(Debug, Clone)]
pub struct QuadrantWorker {
    quadrant: Quadrant,
    /// Local tick counter, never shared
    arrival_ticks: u32,
}

impl QuadrantWorker {
    pub fn new(quadrant: Quadrant) -> Self {
        Self {
            quadrant,
            arrival_ticks: 0,
        }
    }

    pub fn quadrant(&self) -> Quadrant {
        self.quadrant
    }

    /// Apply both update rules for a single tick.
    ///
    /// The departure and the arrival are independent: the active quadrant
    /// can lose and gain a vehicle on the same tick.
    pub fn apply_tick(&mut self, data: &mut StateData) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if data.active() == self.quadrant {
            outcome.departed = data.depart(self.quadrant);
        }

        self.arrival_ticks += 1;
        if self.arrival_ticks >= ARRIVAL_TICKS {
            data.arrive(self.quadrant);
            self.arrival_ticks = 0;
            outcome.arrived = true;
        }

        outcome
    }

    /// One tick against the shared state, under a single lock acquisition
    pub fn tick(&mut self, state: &SimulationState) -> TickOutcome {
        state.with_lock(|data| self.apply_tick(data))
    }

    /// Loop until the scheduler clears the running flag.
    ///
    /// Returns the number of ticks applied.
    pub fn run(mut self, state: &SimulationState, timing: &PhaseTiming) -> u64 {
        debug!("{} worker started", self.quadrant);

        let mut ticks = 0u64;
        loop {
            thread::sleep(timing.tick);

            let outcome = state.with_lock(|data| {
                if data.is_running() {
                    Some(self.apply_tick(data))
                } else {
                    None
                }
            });

            let Some(outcome) = outcome else {
                break;
            };
            ticks += 1;
            trace!(
                "{} tick {}: departed={} arrived={}",
                self.quadrant,
                ticks,
                outcome.departed,
                outcome.arrived
            );
        }

        debug!("{} worker stopped after {} ticks", self.quadrant, ticks);
        ticks
    }
}
