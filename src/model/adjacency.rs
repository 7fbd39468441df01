//! Internal and external adjacency derivation
//!
//! Sub-cells of a big tile are glued together by internal adjacencies: each
//! may only sit next to its sibling across the shared face. Every other face
//! is filed in the external candidate index under the direction it points
//! after rotation, and legal neighbour pairs come from matching opposing
//! faces.

use crate::algorithm::bitset::TileBitset;
use crate::model::canonical::{Canonicalization, ModelTile};
use crate::spatial::grid::Grid;
use crate::spatial::rotation::Direction;
use crate::spatial::tiles::{FacePattern, Palette, TileDefinition};
use std::collections::BTreeMap;

/// Directed relation between two sub-cells of the same big tile placement
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InternalAdjacency {
    /// Sub-cell the relation starts from
    pub source: ModelTile,
    /// Sub-cell found across the face
    pub dest: ModelTile,
    /// World direction from source to dest
    pub direction: Direction,
}

/// One external face of one canonical instance
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceCandidate {
    /// Paint after rotating with the instance
    pub pattern: FacePattern,
    /// Instance owning the face
    pub tile: ModelTile,
    /// Solver index of the instance
    pub index: usize,
}

/// External adjacency candidates filed by outward direction
#[derive(Clone, Debug, Default)]
pub struct CandidateIndex {
    by_direction: BTreeMap<Direction, Vec<FaceCandidate>>,
}

impl CandidateIndex {
    /// File a face under the direction it points
    pub fn insert(&mut self, direction: Direction, candidate: FaceCandidate) {
        self.by_direction
            .entry(direction)
            .or_default()
            .push(candidate);
    }

    /// Every candidate whose face points in a direction
    pub fn candidates(&self, direction: Direction) -> &[FaceCandidate] {
        self.by_direction
            .get(&direction)
            .map_or(&[], Vec::as_slice)
    }

    /// Solver indices whose face in `direction` may touch a fixed facing pattern
    pub fn matching(
        &self,
        direction: Direction,
        facing: &FacePattern,
        palette: &Palette,
    ) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .candidates(direction)
            .iter()
            .filter(|candidate| candidate.pattern.matches(facing, palette))
            .map(|candidate| candidate.index)
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Total number of filed faces
    pub fn len(&self) -> usize {
        self.by_direction.values().map(Vec::len).sum()
    }

    /// Test whether nothing was filed
    pub fn is_empty(&self) -> bool {
        self.by_direction.values().all(Vec::is_empty)
    }
}

/// Internal adjacencies of one canonical instance
///
/// Empty for single-cell tiles.
pub fn internal_adjacencies<G: Grid>(
    grid: &G,
    definition: &TileDefinition,
    instance: &ModelTile,
    canonicalization: &Canonicalization,
) -> Vec<InternalAdjacency> {
    if !definition.is_big() {
        return Vec::new();
    }

    let placed = grid.rotate_offset(instance.rotation, instance.offset);
    let mut adjacencies = Vec::new();
    for &direction in grid.directions() {
        let neighbor = grid.step_offset(placed, direction);
        let sibling = definition
            .offsets()
            .iter()
            .copied()
            .find(|&offset| grid.rotate_offset(instance.rotation, offset) == neighbor);
        let Some(offset) = sibling else {
            continue;
        };
        let sibling = ModelTile::new(instance.tile, instance.rotation, offset);
        if let Some(dest) = canonicalization.canonical_of(&sibling) {
            adjacencies.push(InternalAdjacency {
                source: *instance,
                dest,
                direction,
            });
        }
    }
    adjacencies
}

/// External faces of one canonical instance, rotated into world directions
///
/// Faces shared with another sub-cell of the same tile are internal and
/// skipped.
pub fn external_faces<G: Grid>(
    grid: &G,
    definition: &TileDefinition,
    instance: &ModelTile,
) -> Vec<(Direction, FacePattern)> {
    let layout = grid.face_layout();
    grid.directions()
        .iter()
        .filter(|&&direction| !definition.occupies(grid.step_offset(instance.offset, direction)))
        .map(|&direction| {
            grid.rotate_face(
                instance.rotation,
                direction,
                &definition.face_or_blank(instance.offset, direction, layout),
            )
        })
        .collect()
}

/// Legal neighbour sets per direction and tile
///
/// `allowed(d, a)` holds every tile that may sit in direction `d` of `a`.
#[derive(Clone, Debug)]
pub struct AdjacencyRules {
    compatible: Vec<Vec<TileBitset>>,
}

impl AdjacencyRules {
    /// Derive the rules from face matching plus internal adjacencies
    ///
    /// Opposing faces are compared once per direction pair and the relation is
    /// recorded in both directions.
    pub fn build<G: Grid>(
        grid: &G,
        tile_count: usize,
        candidates: &CandidateIndex,
        internal: &[(usize, usize, Direction)],
        palette: &Palette,
    ) -> Self {
        let direction_count = grid.directions().len();
        let mut compatible = vec![vec![TileBitset::new(tile_count); tile_count]; direction_count];

        for &direction in grid.directions() {
            let inverse = grid.inverse(direction);
            if inverse < direction {
                continue;
            }
            for a in candidates.candidates(direction) {
                for b in candidates.candidates(inverse) {
                    if a.pattern.matches(&b.pattern, palette) {
                        Self::allow(&mut compatible, direction, a.index, b.index);
                        Self::allow(&mut compatible, inverse, b.index, a.index);
                    }
                }
            }
        }

        for &(source, dest, direction) in internal {
            Self::allow(&mut compatible, direction, source, dest);
            Self::allow(&mut compatible, grid.inverse(direction), dest, source);
        }

        Self { compatible }
    }

    fn allow(compatible: &mut [Vec<TileBitset>], direction: Direction, source: usize, dest: usize) {
        if let Some(set) = compatible
            .get_mut(direction.index())
            .and_then(|row| row.get_mut(source))
        {
            set.insert(dest);
        }
    }

    /// Tiles allowed across a face of `tile`
    pub fn allowed(&self, direction: Direction, tile: usize) -> Option<&TileBitset> {
        self.compatible
            .get(direction.index())
            .and_then(|row| row.get(tile))
    }

    /// Test a single neighbour pair
    pub fn is_allowed(&self, source: usize, direction: Direction, dest: usize) -> bool {
        self.allowed(direction, source)
            .is_some_and(|set| set.contains(dest))
    }

    /// Number of directions covered
    pub fn direction_count(&self) -> usize {
        self.compatible.len()
    }
}
