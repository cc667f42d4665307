//! Core types for the intersection simulation
//!
//! Quadrant identity, the per-quadrant container and phase timing.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::time::Duration;

/// Number of approaches into the intersection
pub const QUADRANT_COUNT: usize = 4;

/// Default length of the GREEN phase
pub const GREEN_TIME: Duration = Duration::from_secs(10);

/// Default length of the YELLOW phase
pub const YELLOW_TIME: Duration = Duration::from_secs(3);

/// Default period of a quadrant worker tick
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Ticks between vehicle arrivals on every quadrant
pub const ARRIVAL_TICKS: u32 = 5;

/// One of the four approaches to the intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    First,
    Second,
    Third,
    Fourth,
}

impl Quadrant {
    /// All quadrants in rotation order
    pub const ALL: [Quadrant; QUADRANT_COUNT] = [
        Quadrant::First,
        Quadrant::Second,
        Quadrant::Third,
        Quadrant::Fourth,
    ];

    /// 0-based index of this quadrant
    pub const fn index(self) -> usize {
        match self {
            Quadrant::First => 0,
            Quadrant::Second => 1,
            Quadrant::Third => 2,
            Quadrant::Fourth => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Quadrant> {
        Self::ALL.get(index).copied()
    }

    /// Look up a quadrant by its 1-based display label
    pub fn from_label(label: u32) -> Option<Quadrant> {
        let index = usize::try_from(label).ok()?.checked_sub(1)?;
        Self::from_index(index)
    }

    /// 1-based label shown to users
    pub const fn label(self) -> usize {
        self.index() + 1
    }

    /// The quadrant that receives the green phase after this one
    pub const fn next(self) -> Quadrant {
        Self::ALL[(self.index() + 1) % QUADRANT_COUNT]
    }

    /// How many positions after `active` this quadrant sits in the rotation
    pub const fn offset_from(self, active: Quadrant) -> usize {
        (self.index() + QUADRANT_COUNT - active.index()) % QUADRANT_COUNT
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quadrant {}", self.label())
    }
}

/// Fixed-size storage with one slot per quadrant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerQuadrant<T>(pub [T; QUADRANT_COUNT]);

impl<T> PerQuadrant<T> {
    pub fn new(values: [T; QUADRANT_COUNT]) -> Self {
        Self(values)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Quadrant, &T)> {
        Quadrant::ALL.into_iter().zip(self.0.iter())
    }

    pub fn into_inner(self) -> [T; QUADRANT_COUNT] {
        self.0
    }
}

impl<T> Index<Quadrant> for PerQuadrant<T> {
    type Output = T;

    fn index(&self, quadrant: Quadrant) -> &T {
        &self.0[quadrant.index()]
    }
}

impl<T> IndexMut<Quadrant> for PerQuadrant<T> {
    fn index_mut(&mut self, quadrant: Quadrant) -> &mut T {
        &mut self.0[quadrant.index()]
    }
}

/// Sub-state of the active quadrant; every other quadrant is red
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Green,
    Yellow,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Green => write!(f, "GREEN"),
            Phase::Yellow => write!(f, "YELLOW"),
        }
    }
}

/// Durations driving the scheduler and the workers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTiming {
    pub green: Duration,
    pub yellow: Duration,
    /// Period between two worker ticks
    pub tick: Duration,
}

impl Default for PhaseTiming {
    fn default() -> Self {
        Self {
            green: GREEN_TIME,
            yellow: YELLOW_TIME,
            tick: TICK_INTERVAL,
        }
    }
}

impl PhaseTiming {
    pub fn phase(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Green => self.green,
            Phase::Yellow => self.yellow,
        }
    }

    /// Time for one quadrant to go through GREEN and YELLOW
    pub fn cycle(&self) -> Duration {
        self.green.saturating_add(self.yellow)
    }
}
