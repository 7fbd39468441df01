//! Solver collaborator contract
//!
//! The generation pipeline drives any constraint solver that implements
//! [`Solver`]. The crate ships [`WavePropagator`](crate::algorithm::propagation::WavePropagator)
//! as the reference implementation.

use crate::algorithm::bitset::TileBitset;
use crate::algorithm::recovery::Selection;
pub use crate::algorithm::selection::RandomState;
use crate::model::TileModel;
use crate::spatial::topology::MaskedTopology;

/// Overall solver status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// Some cell still has several candidates
    Undecided,
    /// Every active cell holds exactly one tile
    Decided,
    /// Some cell has no candidate left
    Contradiction,
}

/// Per-cell view of a solver state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellValue {
    /// Exactly one model tile index remains
    Decided(usize),
    /// Several candidates remain
    Undecided,
    /// No candidate remains
    Contradiction,
    /// The cell is not part of the masked topology
    Masked,
}

/// Options fixed at solver creation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverOptions {
    /// Seed for every random choice the solver makes
    pub seed: u64,
    /// Undo choices that lead to a contradiction instead of failing
    pub backtrack: bool,
}

/// Constraint solver driven by the generation pipeline
///
/// A solver is created once per attempt and never reused; replay builds a
/// fresh instance.
pub trait Solver<'m>: Sized {
    /// Build a solver over a model and masked topology, running initial propagation
    fn create(model: &'m TileModel, topology: &MaskedTopology, options: &SolverOptions) -> Self;

    /// Number of model tiles each domain ranges over
    fn tile_count(&self) -> usize;

    /// Restrict a cell to a set of tiles and propagate
    fn select(&mut self, cell: usize, tiles: &TileBitset) -> Resolution;

    /// Remove a set of tiles from a cell and propagate
    fn ban(&mut self, cell: usize, tiles: &TileBitset) -> Resolution;

    /// Make one observation and propagate it
    fn step(&mut self) -> Resolution;

    /// Current status
    fn status(&self) -> Resolution;

    /// Snapshot of every cell in index order
    fn to_value_array(&self) -> Vec<CellValue>;

    /// Start recording which cells change
    fn create_change_tracker(&mut self);

    /// Cells changed since the previous drain, ascending
    fn drain_changed_indices(&mut self) -> Vec<usize>;

    /// Remaining candidates of a cell; `None` for cells outside the topology
    fn possible_tiles(&self, cell: usize) -> Option<&TileBitset>;

    /// Fraction of active cells already decided
    fn progress(&self) -> f64;

    /// Snapshot of the random generator
    fn random_state(&self) -> RandomState;

    /// Restore a random generator snapshot
    fn goto_random_state(&mut self, state: &RandomState);

    /// Put the solver in the contradiction state without touching any domain
    fn force_contradiction(&mut self);

    /// Number of choices undone so far
    fn backtrack_count(&self) -> usize;

    /// Cell and tile chosen by the most recent `step`
    fn last_observation(&self) -> Option<Selection>;

    /// Restrict a cell to a single tile
    fn select_tile(&mut self, cell: usize, tile: usize) -> Resolution {
        let tiles = TileBitset::single(self.tile_count(), tile);
        self.select(cell, &tiles)
    }
}
