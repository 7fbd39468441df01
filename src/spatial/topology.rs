//! Masked topology: the solvable subset of a grid
//!
//! Cells removed by placement filters stay in the index space but have no
//! neighbours and carry no domain. A face leading into a removed cell is
//! distinguished from a face on the outer edge of the grid, because only the
//! latter receives the boundary pattern.

use crate::spatial::grid::Grid;
use crate::spatial::rotation::Direction;
use bitvec::prelude::*;
use std::collections::BTreeSet;

/// Cell index set remaining after excluded cells are removed
#[derive(Clone, Debug)]
pub struct MaskedTopology {
    active: BitVec,
    /// Grid neighbour per cell and direction, regardless of the mask
    grid_neighbors: Vec<Vec<Option<usize>>>,
    inverse: Vec<Direction>,
}

impl MaskedTopology {
    /// Build the topology of a grid minus the excluded cell indices
    pub fn new<G: Grid>(grid: &G, excluded: &BTreeSet<usize>) -> Self {
        let cell_count = grid.cell_count();
        let mut active = bitvec![1; cell_count];
        for &index in excluded {
            if index < cell_count {
                active.set(index, false);
            }
        }

        let direction_count = grid.directions().len();
        let grid_neighbors = (0..cell_count)
            .map(|index| {
                (0..direction_count)
                    .map(|d| {
                        grid.cell_at(index)
                            .and_then(|cell| grid.try_move(cell, Direction(d as u8)))
                            .and_then(|(dest, _)| grid.index_of(dest))
                    })
                    .collect()
            })
            .collect();

        let inverse = (0..direction_count)
            .map(|d| grid.inverse(Direction(d as u8)))
            .collect();

        Self {
            active,
            grid_neighbors,
            inverse,
        }
    }

    /// Size of the underlying index space, masked cells included
    pub fn cell_count(&self) -> usize {
        self.active.len()
    }

    /// Number of cells the solver works on
    pub fn active_count(&self) -> usize {
        self.active.count_ones()
    }

    /// Number of directions per cell
    pub fn direction_count(&self) -> usize {
        self.inverse.len()
    }

    /// Test whether a cell takes part in the solve
    pub fn contains(&self, index: usize) -> bool {
        self.active.get(index).as_deref() == Some(&true)
    }

    /// Indices of every active cell in ascending order
    pub fn active_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.active.iter_ones()
    }

    /// Active neighbour across a face
    pub fn neighbor(&self, index: usize, direction: Direction) -> Option<usize> {
        self.grid_neighbor(index, direction)
            .filter(|&dest| self.contains(dest))
    }

    /// Neighbour across a face, ignoring the mask
    pub fn grid_neighbor(&self, index: usize, direction: Direction) -> Option<usize> {
        self.grid_neighbors
            .get(index)
            .and_then(|row| row.get(direction.index()))
            .copied()
            .flatten()
    }

    /// Test whether a face lies on the outer edge of the grid
    pub fn is_grid_edge(&self, index: usize, direction: Direction) -> bool {
        self.grid_neighbor(index, direction).is_none()
    }

    /// Direction pointing back across the same face
    pub fn inverse(&self, direction: Direction) -> Direction {
        self.inverse
            .get(direction.index())
            .copied()
            .unwrap_or(direction)
    }
}
