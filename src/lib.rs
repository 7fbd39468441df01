//! Tile model synthesis and constraint-solve orchestration for wave function collapse
//!
//! Tile definitions with painted faces are compiled into a [`TileModel`] of
//! rotated, per-cell instances with adjacency rules. The generation pipeline
//! then masks the grid, applies placement constraints, drives a solver to a
//! decision and, when the solver contradicts, recovers a partial map or a
//! small set of decisions that reproduces the failure.

#![forbid(unsafe_code)]

/// Solver contract, reference propagator and the generation pipeline
pub mod algorithm;
/// Command-line interface, rendering, configuration and errors
pub mod io;
/// Seed mixing and entropy helpers
pub mod math;
/// Tile model synthesis
pub mod model;
/// Grids, rotations, tiles and masked topologies
pub mod spatial;

pub use algorithm::constraints::PlacementConstraint;
pub use algorithm::executor::{
    Completion, FailureMode, GenerationOptions, Placement, generate, generate_with, run_attempt,
    run_attempt_with,
};
pub use io::error::{GenerationError, Result};
pub use model::{ModelTile, TileModel, synthesize, synthesize_with_palette};
