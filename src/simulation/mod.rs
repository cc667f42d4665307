//! Concurrency core of the intersection simulation
//!
//! One shared, lock-guarded state; four quadrant workers mutating vehicle
//! counts on a fixed tick; one scheduler cycling the lights and stopping the
//! run. Rendering is reached only through the [`Renderer`] trait.

mod config;
mod renderer;
mod scheduler;
mod snapshot;
mod state;
mod supervisor;
mod types;
mod worker;

pub use config::{
    ConfigError, SimConfig, COUNT_RANGE, DURATION_RANGE, MAX_PHASE, START_RANGE,
};
pub use renderer::Renderer;
pub use scheduler::{PhaseCycle, PhaseScheduler, SchedulerReport};
pub use snapshot::{remaining_times, Light, Snapshot};
pub use state::{SimulationState, StateData};
pub use supervisor::{RunReport, Supervisor, WorkerSet};
pub use types::{
    Phase, PerQuadrant, PhaseTiming, Quadrant, ARRIVAL_TICKS, GREEN_TIME, QUADRANT_COUNT,
    TICK_INTERVAL, YELLOW_TIME,
};
pub use worker::{QuadrantWorker, TickOutcome};
