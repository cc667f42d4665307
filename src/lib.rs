//! Intersection Simulation Library
//!
//! A four-way intersection where one quadrant at a time holds the light while
//! worker threads queue and drain vehicles. Renderers and prompts sit outside
//! the concurrency core.

pub mod display;
pub mod input;
pub mod simulation;
