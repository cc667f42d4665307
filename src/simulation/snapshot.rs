//! Read-only view of the simulation handed to renderers

use std::time::Duration;

use super::state::StateData;
use super::types::{Phase, PerQuadrant, PhaseTiming, Quadrant};

/// Light shown on one approach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Light {
    Green,
    Yellow,
    Red,
}

/// Immutable copy of the shared state plus derived remaining times
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub active: Quadrant,
    pub phase: Phase,
    pub counts: PerQuadrant<u32>,
    /// Time until the next transition for the active quadrant, or until
    /// green for a waiting one
    pub remaining: PerQuadrant<Duration>,
    pub workers: PerQuadrant<Option<String>>,
}

impl Snapshot {
    pub(crate) fn capture(data: &StateData, elapsed_in_phase: Duration, timing: &PhaseTiming) -> Self {
        Self {
            active: data.active(),
            phase: data.phase(),
            counts: data.counts(),
            remaining: remaining_times(data.active(), data.phase(), elapsed_in_phase, timing),
            workers: data.workers().clone(),
        }
    }

    pub fn light(&self, quadrant: Quadrant) -> Light {
        if quadrant != self.active {
            return Light::Red;
        }
        match self.phase {
            Phase::Green => Light::Green,
            Phase::Yellow => Light::Yellow,
        }
    }
}

/// Remaining time per quadrant for the given position in the cycle.
///
/// The active quadrant gets what is left of its current phase. A quadrant k
/// positions behind it waits k full cycles counted from the start of the
/// active GREEN; during YELLOW the elapsed GREEN is taken off that figure.
pub fn remaining_times(
    active: Quadrant,
    phase: Phase,
    elapsed_in_phase: Duration,
    timing: &PhaseTiming,
) -> PerQuadrant<Duration> {
    let mut remaining = PerQuadrant::<Duration>::default();
    for quadrant in Quadrant::ALL {
        let offset = quadrant.offset_from(active);
        remaining[quadrant] = if offset == 0 {
            timing.phase(phase).saturating_sub(elapsed_in_phase)
        } else {
            // offset is at most 3
            let wait = timing.cycle().saturating_mul(offset as u32);
            match phase {
                Phase::Green => wait,
                Phase::Yellow => wait.saturating_sub(timing.green),
            }
        };
    }
    remaining
}
