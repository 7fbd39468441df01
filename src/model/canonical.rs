//! Symmetry canonicalization of oriented tile instances
//!
//! Every allowed rotation of every tile produces one oriented instance per
//! sub-cell. When a tile's paint is symmetric, several rotations describe the
//! same physical object; those are folded into the first rotation that
//! produced them so the solver never sees duplicates. The fold records which
//! sub-cell of the folded rotation lines up with which sub-cell of the
//! surviving one.

use crate::io::error::{GenerationError, Result};
use crate::spatial::grid::{Cell, Grid, add_cells, sub_cells};
use crate::spatial::rotation::Rotation;
use crate::spatial::tiles::{TileDefinition, TileId};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// One sub-cell of one tile in one orientation
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModelTile {
    /// Tile definition the instance comes from
    pub tile: TileId,
    /// Orientation of the whole tile
    pub rotation: Rotation,
    /// Sub-cell offset in the tile's authored frame
    pub offset: Cell,
}

impl ModelTile {
    /// Create an oriented instance
    pub const fn new(tile: TileId, rotation: Rotation, offset: Cell) -> Self {
        Self {
            tile,
            rotation,
            offset,
        }
    }
}

impl fmt::Display for ModelTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}{:?}",
            self.tile, self.rotation, self.offset
        )
    }
}

/// Structural mapping of a tile's offset set onto itself
///
/// Applies a rotation about the origin followed by a translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSymmetry {
    /// Rotation part
    pub rotation: Rotation,
    /// Translation applied after rotating
    pub translation: Cell,
}

impl GridSymmetry {
    /// Map one offset
    pub fn apply<G: Grid>(&self, grid: &G, offset: Cell) -> Cell {
        add_cells(grid.rotate_offset(self.rotation, offset), self.translation)
    }
}

/// Find a translation making `rotation` map the offset set onto itself
///
/// Returns `None` when the rotated shape does not coincide with the original
/// under any translation.
pub fn find_grid_symmetry<G: Grid>(
    grid: &G,
    offsets: &[Cell],
    rotation: Rotation,
) -> Option<GridSymmetry> {
    let original: BTreeSet<Cell> = offsets.iter().copied().collect();
    let rotated: BTreeSet<Cell> = offsets
        .iter()
        .map(|&offset| grid.rotate_offset(rotation, offset))
        .collect();
    if rotated.len() != original.len() {
        return None;
    }

    // Both sets are sorted, so aligning their minima fixes the only candidate translation
    let translation = sub_cells(*original.first()?, *rotated.first()?);
    rotated
        .iter()
        .all(|&cell| original.contains(&add_cells(cell, translation)))
        .then_some(GridSymmetry {
            rotation,
            translation,
        })
}

/// One equivalence class: the canonical instance and every instance folded into it
#[derive(Clone, Debug)]
pub struct EquivalenceClass {
    /// Representative seen by the solver
    pub canonical: ModelTile,
    /// All instances in the class, the representative included
    pub members: Vec<ModelTile>,
}

/// Surjection from every oriented instance onto its canonical representative
#[derive(Clone, Debug, Default)]
pub struct Canonicalization {
    canonical: BTreeMap<ModelTile, ModelTile>,
    originals: BTreeMap<ModelTile, Vec<ModelTile>>,
}

impl Canonicalization {
    /// Record one equivalence class
    pub fn insert(&mut self, class: EquivalenceClass) {
        for &member in &class.members {
            self.canonical.insert(member, class.canonical);
        }
        self.originals
            .entry(class.canonical)
            .or_default()
            .extend(class.members);
    }

    /// Canonical representative of any instance
    pub fn canonical_of(&self, instance: &ModelTile) -> Option<ModelTile> {
        self.canonical.get(instance).copied()
    }

    /// Test whether an instance is its own representative
    pub fn is_canonical(&self, instance: &ModelTile) -> bool {
        self.canonical.get(instance) == Some(instance)
    }

    /// Every instance folded into a representative
    pub fn originals_of(&self, canonical: &ModelTile) -> &[ModelTile] {
        self.originals.get(canonical).map_or(&[], Vec::as_slice)
    }

    /// Size of a representative's equivalence class
    pub fn class_size(&self, canonical: &ModelTile) -> usize {
        self.originals_of(canonical).len()
    }

    /// Canonical instances in sorted order
    pub fn canonical_tiles(&self) -> impl Iterator<Item = &ModelTile> {
        self.originals.keys()
    }

    /// Number of oriented instances covered
    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    /// Test whether no instances are covered
    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}

/// Rotations a tile may use on a grid, identity first
pub fn allowed_rotations<G: Grid>(grid: &G, definition: &TileDefinition) -> Vec<Rotation> {
    grid.rotations(definition.rotation_group())
        .into_iter()
        .filter(|r| definition.rotatable() || r.turns() == 0)
        .filter(|r| definition.reflectable() || !r.is_reflection())
        .collect()
}

/// Partition every (rotation, offset) pair of one tile into equivalence classes
///
/// Classes come out in rotation order, then offset order. Without the
/// `symmetric` flag every pair is its own class.
///
/// # Errors
///
/// Returns an error if the tile has no allowed rotation
pub fn canonicalize<G: Grid>(
    grid: &G,
    id: TileId,
    definition: &TileDefinition,
    rotations: &[Rotation],
) -> Result<Vec<EquivalenceClass>> {
    if rotations.is_empty() {
        return Err(GenerationError::Configuration {
            reason: format!("tile '{}' has no allowed rotation", definition.name()),
        });
    }

    let offsets = definition.offsets();
    let mut folded = vec![false; rotations.len()];
    let mut classes = Vec::new();

    for (i, &r1) in rotations.iter().enumerate() {
        if folded.get(i).copied().unwrap_or(true) {
            continue;
        }

        let mut members: BTreeMap<Cell, Vec<ModelTile>> = offsets
            .iter()
            .map(|&offset| (offset, vec![ModelTile::new(id, r1, offset)]))
            .collect();

        if definition.symmetric() {
            for (j, &r2) in rotations.iter().enumerate().skip(i + 1) {
                if folded.get(j).copied().unwrap_or(true) {
                    continue;
                }
                let relative = r1.inverse().compose(r2);
                let Some(symmetry) = find_grid_symmetry(grid, offsets, relative) else {
                    continue;
                };
                if !paint_agrees(grid, definition, r1, r2, &symmetry) {
                    continue;
                }

                if let Some(flag) = folded.get_mut(j) {
                    *flag = true;
                }
                for &offset in offsets {
                    let aligned = symmetry.apply(grid, offset);
                    if let Some(class) = members.get_mut(&aligned) {
                        class.push(ModelTile::new(id, r2, offset));
                    }
                }
            }
        }

        classes.extend(members.into_iter().map(|(offset, members)| EquivalenceClass {
            canonical: ModelTile::new(id, r1, offset),
            members,
        }));
    }

    Ok(classes)
}

/// Exact comparison of every face under two rotations related by `symmetry`
///
/// The face of sub-cell `o` in direction `d` under `r2` must equal, region for
/// region, the face of the aligned sub-cell in the aligned direction under `r1`.
fn paint_agrees<G: Grid>(
    grid: &G,
    definition: &TileDefinition,
    r1: Rotation,
    r2: Rotation,
    symmetry: &GridSymmetry,
) -> bool {
    let layout = grid.face_layout();
    definition.offsets().iter().all(|&offset| {
        let aligned_offset = symmetry.apply(grid, offset);
        grid.directions().iter().all(|&direction| {
            let aligned_direction = grid.rotate_direction(symmetry.rotation, direction);
            let folded = grid.rotate_face(
                r2,
                direction,
                &definition.face_or_blank(offset, direction, layout),
            );
            let kept = grid.rotate_face(
                r1,
                aligned_direction,
                &definition.face_or_blank(aligned_offset, aligned_direction, layout),
            );
            folded == kept
        })
    })
}
