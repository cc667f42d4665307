//! Run configuration and its validation

use std::ops::RangeInclusive;
use std::time::Duration;

use super::types::{PhaseTiming, Quadrant, QUADRANT_COUNT};

/// Accepted 1-based starting quadrant labels
pub const START_RANGE: RangeInclusive<u32> = 1..=4;
/// Accepted initial vehicle count per quadrant
pub const COUNT_RANGE: RangeInclusive<u32> = 1..=100;
/// Accepted run duration in seconds
pub const DURATION_RANGE: RangeInclusive<u32> = 10..=1000;
/// Longest accepted GREEN or YELLOW phase, the longest run allowed
pub const MAX_PHASE: Duration = Duration::from_secs(1000);

/// Errors raised while validating a [`SimConfig`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("starting quadrant {0} is outside 1-4")]
    StartQuadrant(u32),

    #[error("vehicle count {count} for quadrant {quadrant} is outside 1-100")]
    VehicleCount { quadrant: usize, count: u32 },

    #[error("run duration {0}s is outside 10-1000 seconds")]
    RunDuration(u32),

    #[error("phase durations must be non-zero")]
    ZeroPhase,

    #[error("phase duration {0:?} is longer than 1000 seconds")]
    PhaseTooLong(Duration),
}

/// Parameters for one simulation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub start: Quadrant,
    pub initial_counts: [u32; QUADRANT_COUNT],
    pub run_duration: Duration,
    pub timing: PhaseTiming,
}

impl SimConfig {
    /// Validate user-facing values: a 1-based start label, four counts and
    /// a duration in whole seconds.
    pub fn new(
        start_label: u32,
        initial_counts: [u32; QUADRANT_COUNT],
        run_secs: u32,
    ) -> Result<Self, ConfigError> {
        let start = Quadrant::from_label(start_label)
            .ok_or(ConfigError::StartQuadrant(start_label))?;

        for (index, &count) in initial_counts.iter().enumerate() {
            if !COUNT_RANGE.contains(&count) {
                return Err(ConfigError::VehicleCount {
                    quadrant: index + 1,
                    count,
                });
            }
        }

        if !DURATION_RANGE.contains(&run_secs) {
            return Err(ConfigError::RunDuration(run_secs));
        }

        Ok(Self {
            start,
            initial_counts,
            run_duration: Duration::from_secs(u64::from(run_secs)),
            timing: PhaseTiming::default(),
        })
    }

    /// Replace the default phase timing. Each duration must lie in
    /// `(0, MAX_PHASE]`.
    pub fn with_timing(mut self, timing: PhaseTiming) -> Result<Self, ConfigError> {
        if timing.green.is_zero() || timing.yellow.is_zero() || timing.tick.is_zero() {
            return Err(ConfigError::ZeroPhase);
        }
        for phase in [timing.green, timing.yellow, timing.tick] {
            if phase > MAX_PHASE {
                return Err(ConfigError::PhaseTooLong(phase));
            }
        }
        self.timing = timing;
        Ok(self)
    }

    /// Override the run duration without the 10-1000s bounds. Used to run the
    /// same schedule at a smaller time scale.
    pub fn with_run_duration(mut self, run_duration: Duration) -> Self {
        self.run_duration = run_duration;
        self
    }
}
