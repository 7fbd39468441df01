//! Tile model synthesis
//!
//! Turns caller-authored tile definitions into the immutable model the solver
//! consumes: canonical oriented instances with frequencies, internal
//! adjacencies gluing big tiles together, the external candidate index, and
//! the derived neighbour rules. Synthesis is deterministic and uses no
//! randomness.

use crate::io::error::{GenerationError, Result, configuration_error, invalid_face};
use crate::model::adjacency::{
    AdjacencyRules, CandidateIndex, FaceCandidate, InternalAdjacency, external_faces,
    internal_adjacencies,
};
use crate::model::canonical::{Canonicalization, ModelTile, allowed_rotations, canonicalize};
use crate::model::weights::{instance_frequencies, tile_shares};
use crate::spatial::grid::{Cell, Grid};
use crate::spatial::rotation::{Direction, Rotation};
use crate::spatial::tiles::{Palette, TileDefinition, TileId};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::{debug, warn};

/// Immutable tile model shared by every attempt of a generation request
///
/// Holds no per-attempt state and may be reused across retries or read by
/// concurrent attempts on different grids.
#[derive(Clone, Debug)]
pub struct TileModel {
    definitions: Vec<TileDefinition>,
    palette: Palette,
    tiles: Vec<ModelTile>,
    indices: BTreeMap<ModelTile, usize>,
    frequencies: Vec<f64>,
    canonicalization: Canonicalization,
    internal: Vec<InternalAdjacency>,
    candidates: CandidateIndex,
    rules: AdjacencyRules,
    skipped: Vec<TileId>,
}

/// Synthesize a model where only identical paints match
///
/// # Errors
///
/// Returns an error if:
/// - The definition list is empty or no tile survives validation
/// - A face references a direction, offset or layout the grid doesn't support
pub fn synthesize<G: Grid>(definitions: &[TileDefinition], grid: &G) -> Result<TileModel> {
    synthesize_with_palette(definitions, grid, Palette::new())
}

/// Synthesize a model with an explicit paint compatibility table
///
/// Non-contiguous big tiles and tiles with no placement weight are skipped
/// with a warning instead of failing the whole synthesis.
///
/// # Errors
///
/// Returns an error if:
/// - The definition list is empty or no tile survives validation
/// - A face references a direction, offset or layout the grid doesn't support
pub fn synthesize_with_palette<G: Grid>(
    definitions: &[TileDefinition],
    grid: &G,
    palette: Palette,
) -> Result<TileModel> {
    if definitions.is_empty() {
        return Err(GenerationError::EmptyTileSet);
    }

    let mut canonicalization = Canonicalization::default();
    let mut skipped = Vec::new();

    for (index, definition) in definitions.iter().enumerate() {
        let id = TileId(index);
        validate_faces(grid, definition)?;

        if definition.offsets().is_empty() {
            warn!(tile = definition.name(), "tile occupies no cells, skipping");
            skipped.push(id);
            continue;
        }
        if !is_contiguous(grid, definition.offsets()) {
            warn!(tile = definition.name(), "big tile offsets are not contiguous, skipping");
            skipped.push(id);
            continue;
        }
        if definition.weight().is_nan() || definition.weight() <= 0.0 {
            warn!(
                tile = definition.name(),
                weight = definition.weight(),
                "tile can never be placed, skipping"
            );
            skipped.push(id);
            continue;
        }

        let rotations = allowed_rotations(grid, definition);
        let classes = canonicalize(grid, id, definition, &rotations)?;
        debug!(
            tile = definition.name(),
            rotations = rotations.len(),
            offsets = definition.offsets().len(),
            canonical = classes.len(),
            "canonicalized tile"
        );
        for class in classes {
            canonicalization.insert(class);
        }
    }

    let tiles: Vec<ModelTile> = canonicalization.canonical_tiles().copied().collect();
    if tiles.is_empty() {
        return Err(configuration_error(&"no tile definition survived validation"));
    }
    let indices: BTreeMap<ModelTile, usize> = tiles
        .iter()
        .enumerate()
        .map(|(index, &tile)| (tile, index))
        .collect();

    let frequencies = instance_frequencies(
        &tiles,
        &canonicalization,
        |id| definitions.get(id.0).map_or(0.0, TileDefinition::weight),
        |id| definitions.get(id.0).map_or(0, |d| d.offsets().len()),
    );

    let mut internal = Vec::new();
    let mut candidates = CandidateIndex::default();
    for (index, tile) in tiles.iter().enumerate() {
        let Some(definition) = definitions.get(tile.tile.0) else {
            continue;
        };
        internal.extend(internal_adjacencies(grid, definition, tile, &canonicalization));
        for (direction, pattern) in external_faces(grid, definition, tile) {
            candidates.insert(
                direction,
                FaceCandidate {
                    pattern,
                    tile: *tile,
                    index,
                },
            );
        }
    }

    let internal_indices: Vec<(usize, usize, Direction)> = internal
        .iter()
        .filter_map(|adjacency| {
            Some((
                *indices.get(&adjacency.source)?,
                *indices.get(&adjacency.dest)?,
                adjacency.direction,
            ))
        })
        .collect();
    let rules = AdjacencyRules::build(grid, tiles.len(), &candidates, &internal_indices, &palette);

    debug!(
        definitions = definitions.len(),
        instances = tiles.len(),
        internal = internal.len(),
        faces = candidates.len(),
        "synthesized tile model"
    );

    Ok(TileModel {
        definitions: definitions.to_vec(),
        palette,
        tiles,
        indices,
        frequencies,
        canonicalization,
        internal,
        candidates,
        rules,
        skipped,
    })
}

/// Reject faces the grid cannot express
fn validate_faces<G: Grid>(grid: &G, definition: &TileDefinition) -> Result<()> {
    for ((offset, direction), pattern) in definition.faces() {
        if !grid.has_direction(*direction) {
            return Err(invalid_face(
                definition.name(),
                &format!("direction {direction} is not supported by the grid"),
            ));
        }
        if !definition.occupies(*offset) {
            return Err(invalid_face(
                definition.name(),
                &format!("offset {offset:?} is not part of the tile"),
            ));
        }
        if pattern.layout() != grid.face_layout() {
            return Err(invalid_face(
                definition.name(),
                &format!(
                    "{:?} pattern on a grid with {:?} faces",
                    pattern.layout(),
                    grid.face_layout()
                ),
            ));
        }
    }
    Ok(())
}

/// Test whether every offset reaches every other through adjacent offsets
pub fn is_contiguous<G: Grid>(grid: &G, offsets: &[Cell]) -> bool {
    let all: BTreeSet<Cell> = offsets.iter().copied().collect();
    let Some(&start) = all.first() else {
        return true;
    };

    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(offset) = queue.pop_front() {
        for &direction in grid.directions() {
            let next = grid.step_offset(offset, direction);
            if all.contains(&next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen.len() == all.len()
}

impl TileModel {
    /// Number of canonical instances the solver works with
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Canonical instances in solver index order
    pub fn tiles(&self) -> &[ModelTile] {
        &self.tiles
    }

    /// Canonical instance at a solver index
    pub fn tile(&self, index: usize) -> Option<&ModelTile> {
        self.tiles.get(index)
    }

    /// Solver index of any instance, canonicalizing it first
    pub fn index_of(&self, instance: &ModelTile) -> Option<usize> {
        let canonical = self.canonicalization.canonical_of(instance)?;
        self.indices.get(&canonical).copied()
    }

    /// Solver index of one sub-cell of a tile in one orientation
    pub fn instance_index(&self, tile: TileId, rotation: Rotation, offset: Cell) -> Option<usize> {
        self.index_of(&ModelTile::new(tile, rotation, offset))
    }

    /// Solver indices of every canonical instance of a tile definition
    pub fn indices_of_tile(&self, tile: TileId) -> Vec<usize> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, instance)| instance.tile == tile)
            .map(|(index, _)| index)
            .collect()
    }

    /// Solver frequency of every canonical instance
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Solver frequency of one canonical instance
    pub fn frequency(&self, index: usize) -> f64 {
        self.frequencies.get(index).copied().unwrap_or(0.0)
    }

    /// Share of the frequency mass held by each tile definition
    pub fn tile_shares(&self) -> Vec<f64> {
        tile_shares(&self.tiles, &self.frequencies, self.definitions.len())
    }

    /// Instance-to-representative mapping
    pub const fn canonicalization(&self) -> &Canonicalization {
        &self.canonicalization
    }

    /// Internal adjacencies gluing big tiles together
    pub fn internal_adjacencies(&self) -> &[InternalAdjacency] {
        &self.internal
    }

    /// External faces filed by direction
    pub const fn candidates(&self) -> &CandidateIndex {
        &self.candidates
    }

    /// Derived neighbour rules
    pub const fn rules(&self) -> &AdjacencyRules {
        &self.rules
    }

    /// Paint compatibility table
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Tile definitions the model was built from
    pub fn definitions(&self) -> &[TileDefinition] {
        &self.definitions
    }

    /// One tile definition
    pub fn definition(&self, tile: TileId) -> Option<&TileDefinition> {
        self.definitions.get(tile.0)
    }

    /// Tiles excluded during synthesis
    pub fn skipped(&self) -> &[TileId] {
        &self.skipped
    }
}
