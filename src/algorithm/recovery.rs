//! Failure recovery after a contradiction during the run
//!
//! Both recovery modes replay directed selections against a freshly set-up
//! solver. This module holds the parts that don't need the pipeline: splitting
//! the failed state into stable and recent selections, capturing the
//! contradiction signature, and the delta-debugging shrink.

use crate::algorithm::solver::{CellValue, Solver};
use std::collections::BTreeSet;
use std::fmt;
use tracing::trace;

/// One directed decision: restrict a cell to a single model tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Selection {
    /// Cell index
    pub cell: usize,
    /// Model tile index
    pub tile: usize,
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell {} = tile {}", self.cell, self.tile)
    }
}

/// Decided cells split by whether the final step touched them
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassifiedSelections {
    /// Decided before the failing step
    pub stable: Vec<Selection>,
    /// Decided or narrowed by the failing step
    pub recent: Vec<Selection>,
}

impl ClassifiedSelections {
    /// Split the decided cells of a value array
    pub fn classify(values: &[CellValue], recent_cells: &[usize]) -> Self {
        let recent_cells: BTreeSet<usize> = recent_cells.iter().copied().collect();
        let mut classified = Self::default();
        for (cell, value) in values.iter().enumerate() {
            let CellValue::Decided(tile) = *value else {
                continue;
            };
            let selection = Selection { cell, tile };
            if recent_cells.contains(&cell) {
                classified.recent.push(selection);
            } else {
                classified.stable.push(selection);
            }
        }
        classified
    }

    /// Move a selection ahead of every recent one, replacing any other choice for its cell
    pub fn lead_with(&mut self, selection: Selection) {
        self.stable.retain(|kept| kept.cell != selection.cell);
        self.recent.retain(|kept| kept.cell != selection.cell);
        self.recent.insert(0, selection);
    }

    /// Stable selections followed by recent ones
    pub fn combined(&self) -> Vec<Selection> {
        self.stable
            .iter()
            .chain(&self.recent)
            .copied()
            .collect()
    }
}

/// Which recently changed cells ran out of candidates
///
/// Two failures with equal signatures show the same symptom; nothing stronger
/// is claimed about their cause.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContradictionSignature {
    cells: Vec<usize>,
    empty: Vec<bool>,
}

impl ContradictionSignature {
    /// Capture the signature of a solver state over the given cells
    pub fn capture<'m, S: Solver<'m>>(solver: &S, recent_cells: &[usize]) -> Self {
        Self {
            cells: recent_cells.to_vec(),
            empty: recent_cells
                .iter()
                .map(|&cell| solver.possible_tiles(cell).is_some_and(|d| d.is_empty()))
                .collect(),
        }
    }

    /// Cells the signature is taken over
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    /// Whether any watched cell is empty
    pub fn has_empty_cell(&self) -> bool {
        self.empty.iter().any(|&empty| empty)
    }
}

/// Drop selections while the failure keeps reproducing
///
/// Scans from the back, removing one selection at a time and keeping the
/// removal only when `reproduces` still holds for the reduced list. Repeats
/// until a full scan removes nothing. Worst case quadratic in the number of
/// selections.
pub fn shrink_selections<T: Clone + fmt::Debug>(
    selections: Vec<T>,
    mut reproduces: impl FnMut(&[T]) -> bool,
) -> Vec<T> {
    let mut current = selections;
    loop {
        let mut dropped_any = false;
        let mut index = current.len();
        while index > 0 {
            index -= 1;
            let mut candidate = current.clone();
            let removed = candidate.remove(index);
            if reproduces(&candidate) {
                trace!(?removed, remaining = candidate.len(), "dropped selection");
                current = candidate;
                dropped_any = true;
            }
        }
        if !dropped_any {
            return current;
        }
    }
}
