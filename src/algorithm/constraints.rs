//! Placement constraints and their resolution into solver operations
//!
//! Constraints are authored in world terms (cells, tile definitions, painted
//! faces). Before any solver exists they are validated and resolved into
//! plain select and ban operations on cell indices, so a fresh solver can be
//! set up identically as often as replay needs.

use crate::algorithm::bitset::TileBitset;
use crate::io::error::{GenerationError, Result, configuration_error};
use crate::model::TileModel;
use crate::spatial::grid::{Cell, Grid, add_cells};
use crate::spatial::rotation::{Direction, Rotation};
use crate::spatial::tiles::{FacePattern, TileDefinition, TileId};
use crate::spatial::topology::MaskedTopology;
use std::collections::BTreeSet;

/// Name reported when the boundary pattern empties a domain
pub const SKYBOX_CONSTRAINT: &str = "skybox";
/// Name reported when the big-tile overhang ban empties a domain
pub const OVERHANG_CONSTRAINT: &str = "overhang";
/// Name reported when initial propagation alone finds no solution
pub const INITIAL_PROPAGATION: &str = "initial propagation";

/// Caller-supplied restriction applied before the solve starts
#[derive(Clone, Debug, PartialEq)]
pub enum PlacementConstraint {
    /// Place a whole tile with its origin at a cell
    Pin {
        /// Name reported on failure
        name: String,
        /// Tile definition to place
        tile: TileId,
        /// Orientation of the placed tile
        rotation: Rotation,
        /// World cell receiving the tile's `[0, 0, 0]` offset
        origin: Cell,
        /// Remove the covered cells and constrain their neighbours instead
        mask: bool,
    },
    /// Allow only instances of some tile definitions in a region
    Filter {
        /// Name reported on failure
        name: String,
        /// Cells the filter covers
        cells: Vec<Cell>,
        /// Tile definitions that remain allowed
        tiles: Vec<TileId>,
    },
    /// Require the face of a cell to match a fixed pattern
    Face {
        /// Name reported on failure
        name: String,
        /// Constrained cell
        cell: Cell,
        /// Outward direction of the constrained face
        direction: Direction,
        /// Pattern the face must match, authored as seen from outside the cell
        pattern: FacePattern,
    },
    /// Remove cells from the solve
    MaskOut {
        /// Name reported on failure
        name: String,
        /// Cells to remove
        cells: Vec<Cell>,
    },
}

impl PlacementConstraint {
    /// Caller-visible name
    pub fn name(&self) -> &str {
        match self {
            Self::Pin { name, .. }
            | Self::Filter { name, .. }
            | Self::Face { name, .. }
            | Self::MaskOut { name, .. } => name,
        }
    }

    /// Pin a tile without masking its cells
    pub fn pin(name: impl Into<String>, tile: TileId, rotation: Rotation, origin: Cell) -> Self {
        Self::Pin {
            name: name.into(),
            tile,
            rotation,
            origin,
            mask: false,
        }
    }
}

/// One resolved solver operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Intersect the cell's domain with the set
    Select(usize, TileBitset),
    /// Remove the set from the cell's domain
    Ban(usize, TileBitset),
}

/// Operations sharing one caller-visible name, checked together
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintGroup {
    /// Name reported if applying the group contradicts
    pub name: String,
    /// Operations in application order
    pub ops: Vec<ConstraintOp>,
}

/// World cells covered by a placed tile
fn covered_cells<G: Grid>(
    grid: &G,
    definition: &TileDefinition,
    rotation: Rotation,
    origin: Cell,
) -> Vec<(Cell, Cell)> {
    definition
        .offsets()
        .iter()
        .map(|&offset| (offset, add_cells(origin, grid.rotate_offset(rotation, offset))))
        .collect()
}

fn definition_for<'a>(
    model: &'a TileModel,
    constraint: &str,
    tile: TileId,
) -> Result<&'a TileDefinition> {
    model
        .definition(tile)
        .ok_or_else(|| GenerationError::UnknownTile {
            constraint: constraint.to_string(),
            tile: tile.0,
        })
}

/// Cell indices removed from the masked topology
///
/// # Errors
///
/// Returns an error if a masked pin names an unknown tile or covers a cell
/// outside the grid
pub fn excluded_cells<G: Grid>(
    model: &TileModel,
    grid: &G,
    constraints: &[PlacementConstraint],
) -> Result<BTreeSet<usize>> {
    let mut excluded = BTreeSet::new();
    for constraint in constraints {
        match constraint {
            PlacementConstraint::MaskOut { cells, .. } => {
                excluded.extend(cells.iter().filter_map(|&cell| grid.index_of(cell)));
            }
            PlacementConstraint::Pin {
                name,
                tile,
                rotation,
                origin,
                mask: true,
            } => {
                let definition = definition_for(model, name, *tile)?;
                for (_, cell) in covered_cells(grid, definition, *rotation, *origin) {
                    let index = grid.index_of(cell).ok_or_else(|| {
                        configuration_error(&format!("pin '{name}' covers {cell:?} outside the grid"))
                    })?;
                    excluded.insert(index);
                }
            }
            _ => {}
        }
    }
    Ok(excluded)
}

/// Resolve caller constraints into operation groups, in caller order
///
/// # Errors
///
/// Returns an error if a constraint names an unknown tile, pins outside the
/// grid, uses an orientation the tile doesn't allow, or carries a face pattern
/// of the wrong layout
pub fn resolve_constraints<G: Grid>(
    model: &TileModel,
    grid: &G,
    topology: &MaskedTopology,
    constraints: &[PlacementConstraint],
) -> Result<Vec<ConstraintGroup>> {
    let tile_count = model.tile_count();
    constraints
        .iter()
        .map(|constraint| {
            let ops = match constraint {
                PlacementConstraint::Pin {
                    name,
                    tile,
                    rotation,
                    origin,
                    mask,
                } => {
                    let definition = definition_for(model, name, *tile)?;
                    if model.skipped().contains(tile) {
                        return Err(configuration_error(&format!(
                            "pin '{name}' uses tile '{}' which was excluded during synthesis",
                            definition.name()
                        )));
                    }
                    if *mask {
                        masked_pin_ops(model, grid, topology, definition, *rotation, *origin)
                    } else {
                        pin_ops(model, grid, name, definition, *tile, *rotation, *origin)?
                    }
                }
                PlacementConstraint::Filter { name, cells, tiles } => {
                    let mut allowed = TileBitset::new(tile_count);
                    for &tile in tiles {
                        definition_for(model, name, tile)?;
                        for index in model.indices_of_tile(tile) {
                            allowed.insert(index);
                        }
                    }
                    cells
                        .iter()
                        .filter_map(|&cell| grid.index_of(cell))
                        .map(|index| ConstraintOp::Select(index, allowed.clone()))
                        .collect()
                }
                PlacementConstraint::Face {
                    name,
                    cell,
                    direction,
                    pattern,
                } => {
                    if pattern.layout() != grid.face_layout() {
                        return Err(configuration_error(&format!(
                            "face constraint '{name}' uses a {:?} pattern",
                            pattern.layout()
                        )));
                    }
                    let index = grid.index_of(*cell).ok_or_else(|| {
                        configuration_error(&format!("face constraint '{name}' is outside the grid"))
                    })?;
                    let allowed = model.candidates().matching(*direction, pattern, model.palette());
                    vec![ConstraintOp::Select(
                        index,
                        TileBitset::from_indices(tile_count, allowed),
                    )]
                }
                PlacementConstraint::MaskOut { .. } => Vec::new(),
            };
            Ok(ConstraintGroup {
                name: constraint.name().to_string(),
                ops,
            })
        })
        .collect()
}

fn pin_ops<G: Grid>(
    model: &TileModel,
    grid: &G,
    name: &str,
    definition: &TileDefinition,
    tile: TileId,
    rotation: Rotation,
    origin: Cell,
) -> Result<Vec<ConstraintOp>> {
    covered_cells(grid, definition, rotation, origin)
        .into_iter()
        .map(|(offset, cell)| {
            let index = grid.index_of(cell).ok_or_else(|| {
                configuration_error(&format!("pin '{name}' covers {cell:?} outside the grid"))
            })?;
            let instance = model.instance_index(tile, rotation, offset).ok_or_else(|| {
                configuration_error(&format!(
                    "pin '{name}' uses rotation {rotation} which tile '{}' does not allow",
                    definition.name()
                ))
            })?;
            Ok(ConstraintOp::Select(
                index,
                TileBitset::single(model.tile_count(), instance),
            ))
        })
        .collect()
}

/// Turn every outward face of a masked pin into a constraint on its neighbour
fn masked_pin_ops<G: Grid>(
    model: &TileModel,
    grid: &G,
    topology: &MaskedTopology,
    definition: &TileDefinition,
    rotation: Rotation,
    origin: Cell,
) -> Vec<ConstraintOp> {
    let layout = grid.face_layout();
    let mut ops = Vec::new();
    for (offset, cell) in covered_cells(grid, definition, rotation, origin) {
        for &direction in grid.directions() {
            if definition.occupies(grid.step_offset(offset, direction)) {
                continue;
            }
            let face = definition.face_or_blank(offset, direction, layout);
            let (world_direction, world_face) = grid.rotate_face(rotation, direction, &face);
            let Some((neighbor, back)) = grid.try_move(cell, world_direction) else {
                continue;
            };
            let Some(index) = grid.index_of(neighbor).filter(|&i| topology.contains(i)) else {
                continue;
            };
            let allowed = model.candidates().matching(back, &world_face, model.palette());
            ops.push(ConstraintOp::Select(
                index,
                TileBitset::from_indices(model.tile_count(), allowed),
            ));
        }
    }
    ops
}

/// Restrict every open face on the grid's outer edge to match a pattern
pub fn skybox_ops(
    model: &TileModel,
    topology: &MaskedTopology,
    pattern: &FacePattern,
) -> ConstraintGroup {
    let tile_count = model.tile_count();
    let mut ops = Vec::new();
    for cell in topology.active_cells() {
        for d in 0..topology.direction_count() {
            let direction = Direction(d as u8);
            if !topology.is_grid_edge(cell, direction) {
                continue;
            }
            let allowed = model.candidates().matching(direction, pattern, model.palette());
            ops.push(ConstraintOp::Select(
                cell,
                TileBitset::from_indices(tile_count, allowed),
            ));
        }
    }
    ConstraintGroup {
        name: SKYBOX_CONSTRAINT.to_string(),
        ops,
    }
}

/// Ban every big-tile instance whose sibling would fall outside the topology
pub fn overhang_ops(model: &TileModel, topology: &MaskedTopology) -> ConstraintGroup {
    let tile_count = model.tile_count();
    let mut ops = Vec::new();
    for cell in topology.active_cells() {
        let mut banned = TileBitset::new(tile_count);
        for adjacency in model.internal_adjacencies() {
            if topology.neighbor(cell, adjacency.direction).is_some() {
                continue;
            }
            if let Some(index) = model.index_of(&adjacency.source) {
                banned.insert(index);
            }
        }
        if !banned.is_empty() {
            ops.push(ConstraintOp::Ban(cell, banned));
        }
    }
    ConstraintGroup {
        name: OVERHANG_CONSTRAINT.to_string(),
        ops,
    }
}
