//! Core data structures of the 2D collision kernel.
//!
//! This module holds the particle store element, the uniform spatial grid
//! used for broad-phase culling, and the fixed-timestep simulation that
//! orchestrates integrate / index-build / resolve once per step.

pub mod grid;
pub mod particle;
pub mod sim;

pub use grid::{CellKey, SpatialGrid};
pub use particle::Particle;
pub use sim::Simulation;
