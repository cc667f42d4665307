//! Phase scheduler for the intersection
//!
//! Walks the active quadrant through GREEN, YELLOW and on to the next
//! quadrant, and owns the run-duration timeout that stops every worker.

use log::{debug, info};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use super::renderer::Renderer;
use super::snapshot::Snapshot;
use super::state::SimulationState;
use super::types::{Phase, PhaseTiming, Quadrant, QUADRANT_COUNT};

/// Position in the light cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseCycle {
    pub active: Quadrant,
    pub phase: Phase,
}

impl PhaseCycle {
    /// GREEN on the starting quadrant
    pub fn new(start: Quadrant) -> Self {
        Self {
            active: start,
            phase: Phase::Green,
        }
    }

    pub fn duration(&self, timing: &PhaseTiming) -> Duration {
        timing.phase(self.phase)
    }

    /// Move to the next sub-phase: GREEN -> YELLOW, YELLOW -> next quadrant's GREEN
    pub fn advance(&mut self) {
        match self.phase {
            Phase::Green => self.phase = Phase::Yellow,
            Phase::Yellow => {
                self.active = self.active.next();
                self.phase = Phase::Green;
            }
        }
    }

    /// Where the cycle stands `elapsed` after starting GREEN on `start`
    pub fn at(start: Quadrant, elapsed: Duration, timing: &PhaseTiming) -> Self {
        let cycle = timing.cycle().as_nanos();
        if cycle == 0 {
            return Self::new(start);
        }

        let elapsed = elapsed.as_nanos();
        let completed = elapsed / cycle;
        let into_cycle = elapsed % cycle;
        // completed % 4 is below 4, the cast cannot truncate
        let shift = (completed % QUADRANT_COUNT as u128) as usize;

        let mut active = start;
        for _ in 0..shift {
            active = active.next();
        }
        let phase = if into_cycle < timing.green.as_nanos() {
            Phase::Green
        } else {
            Phase::Yellow
        };
        Self { active, phase }
    }
}

/// Summary of a finished scheduler run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerReport {
    /// Number of GREEN or YELLOW phases entered, including the first
    pub phases_entered: u32,
    /// Number of times the light moved on to another quadrant
    pub quadrant_changes: u32,
    pub final_active: Quadrant,
    pub final_phase: Phase,
}

/// Drives the light cycle and stops the run once its duration is used up
pub struct PhaseScheduler<R> {
    state: Arc<SimulationState>,
    renderer: R,
    timing: PhaseTiming,
    run_duration: Duration,
}

impl<R: Renderer> PhaseScheduler<R> {
    pub fn new(
        state: Arc<SimulationState>,
        renderer: R,
        timing: PhaseTiming,
        run_duration: Duration,
    ) -> Self {
        Self {
            state,
            renderer,
            timing,
            run_duration,
        }
    }

    /// Snapshot taken under the lock, with remaining times for the current phase
    pub fn snapshot(&self, elapsed_in_phase: Duration) -> Snapshot {
        self.state.snapshot(elapsed_in_phase, &self.timing)
    }

    fn stop(&self, started: Instant) {
        self.state.with_lock(|data| data.stop());
        info!(
            "Run duration of {:?} reached after {:.2}s, stopping simulation",
            self.run_duration,
            started.elapsed().as_secs_f64()
        );
    }

    /// Run the cycle until the run duration elapses.
    ///
    /// The sleep for each phase is cut short at the end of the run, so the
    /// stop lands on time even in the middle of a phase.
    pub fn run(mut self) -> SchedulerReport {
        let started = Instant::now();
        let mut cycle = self.state.with_lock(|data| PhaseCycle {
            active: data.active(),
            phase: data.phase(),
        });
        let mut report = SchedulerReport {
            phases_entered: 0,
            quadrant_changes: 0,
            final_active: cycle.active,
            final_phase: cycle.phase,
        };

        if self.run_duration.is_zero() {
            self.stop(started);
            return report;
        }

        loop {
            debug!("{} enters {} for {:?}", cycle.active, cycle.phase, cycle.duration(&self.timing));
            let snapshot = self.snapshot(Duration::ZERO);
            self.renderer.render(&snapshot);
            report.phases_entered += 1;

            let left = self.run_duration.saturating_sub(started.elapsed());
            thread::sleep(cycle.duration(&self.timing).min(left));

            if started.elapsed() >= self.run_duration {
                self.stop(started);
                break;
            }

            cycle.advance();
            self.state.with_lock(|data| match cycle.phase {
                Phase::Yellow => data.set_phase(Phase::Yellow),
                Phase::Green => {
                    data.advance();
                }
            });
            if cycle.phase == Phase::Green {
                report.quadrant_changes += 1;
            }
        }

        report.final_active = cycle.active;
        report.final_phase = cycle.phase;
        report
    }
}
