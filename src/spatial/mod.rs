//! Spatial data structures and grid collaborators
//!
//! This module contains spatial-related functionality including:
//! - The grid contract and reference square/cubic grids
//! - Dihedral rotation algebra
//! - Tile definitions and painted face patterns
//! - The masked topology handed to the solver

/// Grid contract and reference implementations
pub mod grid;
/// Rotation group elements and subgroups
pub mod rotation;
/// Tile definitions, face patterns and paint matching
pub mod tiles;
/// Solvable cell subset after placement masks
pub mod topology;

pub use grid::{Cell, CubeGrid, Grid, SquareGrid};
pub use rotation::{Direction, Rotation, RotationGroup};
pub use tiles::{FaceLayout, FacePattern, Palette, TileDefinition, TileId};
pub use topology::MaskedTopology;
