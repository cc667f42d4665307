//! Starts the quadrant workers and the phase scheduler, then joins them

use anyhow::{anyhow, Context, Result};
use log::info;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::config::SimConfig;
use super::renderer::Renderer;
use super::scheduler::{PhaseScheduler, SchedulerReport};
use super::state::SimulationState;
use super::types::{PerQuadrant, Quadrant};
use super::worker::QuadrantWorker;

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_duration: Duration,
    /// Wall-clock time until every thread had been joined
    pub elapsed: Duration,
    pub final_counts: PerQuadrant<u32>,
    pub worker_ticks: PerQuadrant<u64>,
    pub scheduler: SchedulerReport,
}

impl RunReport {
    pub fn completion_message(&self) -> String {
        format!(
            "Program terminated after {} seconds.",
            self.run_duration.as_secs()
        )
    }
}

/// Owns one run of the simulation
pub struct Supervisor {
    config: SimConfig,
    state: Arc<SimulationState>,
}

impl Supervisor {
    pub fn new(config: SimConfig) -> Self {
        let state = Arc::new(SimulationState::new(config.start, config.initial_counts));
        Self { config, state }
    }

    /// Shared state, e.g. for observing a run from another thread
    pub fn state(&self) -> Arc<SimulationState> {
        Arc::clone(&self.state)
    }

    /// Spawn one worker thread per quadrant.
    ///
    /// Worker identities are registered from the join handles before this
    /// returns, so the first rendered frame already shows all four. If a
    /// spawn fails the run is stopped and the workers already started are
    /// joined before the error is returned.
    pub fn spawn_workers(&self) -> Result<WorkerSet> {
        let timing = self.config.timing;
        let mut workers = WorkerSet {
            handles: Vec::with_capacity(Quadrant::ALL.len()),
        };

        for quadrant in Quadrant::ALL {
            let state = Arc::clone(&self.state);
            let spawned = thread::Builder::new()
                .name(format!("quadrant-{}", quadrant.label()))
                .spawn(move || QuadrantWorker::new(quadrant).run(&state, &timing));
            match spawned {
                Ok(handle) => {
                    let identity = format!("{:?}", handle.thread().id());
                    self.state.register_worker(quadrant, identity);
                    workers.handles.push((quadrant, handle));
                }
                Err(e) => {
                    // Joined workers are not inspected, the spawn error wins
                    let _ = workers.stop_and_join(&self.state);
                    return Err(e)
                        .with_context(|| format!("Failed to spawn worker for {}", quadrant));
                }
            }
        }
        Ok(workers)
    }

    /// Spawn four workers and the scheduler and wait for all of them.
    pub fn run<R: Renderer + 'static>(self, renderer: R) -> Result<RunReport> {
        let started = Instant::now();
        info!(
            "Starting simulation on {} for {:?} with counts {:?}",
            self.config.start, self.config.run_duration, self.config.initial_counts
        );

        let workers = self.spawn_workers()?;

        let scheduler = PhaseScheduler::new(
            Arc::clone(&self.state),
            renderer,
            self.config.timing,
            self.config.run_duration,
        );
        let scheduler_handle = thread::Builder::new()
            .name("phase-scheduler".to_string())
            .spawn(move || scheduler.run());

        let scheduler_handle = match scheduler_handle {
            Ok(handle) => handle,
            Err(e) => {
                let _ = workers.stop_and_join(&self.state);
                return Err(e).context("Failed to spawn phase scheduler");
            }
        };

        let scheduler = scheduler_handle.join();
        let worker_ticks = match scheduler {
            Ok(_) => workers.join(),
            // Nothing else will clear the running flag
            Err(_) => workers.stop_and_join(&self.state),
        };
        let scheduler = scheduler.map_err(|_| anyhow!("Phase scheduler thread panicked"))?;
        let worker_ticks = worker_ticks?;

        let report = RunReport {
            run_duration: self.config.run_duration,
            elapsed: started.elapsed(),
            final_counts: self.state.counts(),
            worker_ticks,
            scheduler,
        };
        info!(
            "All threads joined after {:.2}s, final counts {:?}",
            report.elapsed.as_secs_f64(),
            report.final_counts.0
        );
        Ok(report)
    }
}

/// Running quadrant worker threads
#[derive(Debug)]
pub struct WorkerSet {
    handles: Vec<(Quadrant, JoinHandle<u64>)>,
}

impl WorkerSet {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every worker to exit and collect its tick count.
    ///
    /// All handles are joined even when some workers panicked.
    pub fn join(self) -> Result<PerQuadrant<u64>> {
        let mut worker_ticks = PerQuadrant::<u64>::default();
        let mut panicked = Vec::new();
        for (quadrant, handle) in self.handles {
            match handle.join() {
                Ok(ticks) => worker_ticks[quadrant] = ticks,
                Err(_) => panicked.push(quadrant.to_string()),
            }
        }
        if !panicked.is_empty() {
            anyhow::bail!("Worker threads panicked: {}", panicked.join(", "));
        }
        Ok(worker_ticks)
    }

    /// Clear the running flag, then wait for every worker
    pub fn stop_and_join(self, state: &SimulationState) -> Result<PerQuadrant<u64>> {
        state.with_lock(|data| data.stop());
        self.join()
    }
}
