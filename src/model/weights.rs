//! Solver frequencies for canonical instances
//!
//! A big tile contributes one candidate per occupied cell, so its weight is
//! spread over its offsets. Symmetry folding removes candidates, so the
//! surviving representative carries the weight of its whole class.

use crate::model::canonical::{Canonicalization, ModelTile};
use crate::spatial::tiles::TileId;

/// Frequency of one canonical instance
///
/// `user_weight * class_size / offset_count`
pub fn instance_frequency(user_weight: f64, class_size: usize, offset_count: usize) -> f64 {
    if offset_count == 0 {
        return 0.0;
    }
    user_weight * class_size as f64 / offset_count as f64
}

/// Frequencies for a list of canonical instances
///
/// `weight_of` and `offsets_of` look up the tile definition's user weight and
/// offset count.
pub fn instance_frequencies(
    tiles: &[ModelTile],
    canonicalization: &Canonicalization,
    weight_of: impl Fn(TileId) -> f64,
    offsets_of: impl Fn(TileId) -> usize,
) -> Vec<f64> {
    tiles
        .iter()
        .map(|tile| {
            instance_frequency(
                weight_of(tile.tile),
                canonicalization.class_size(tile),
                offsets_of(tile.tile),
            )
        })
        .collect()
}

/// Share of the total frequency mass held by each tile definition
///
/// Entries are indexed by `TileId` and sum to one when any mass exists.
pub fn tile_shares(tiles: &[ModelTile], frequencies: &[f64], tile_count: usize) -> Vec<f64> {
    let mut shares = vec![0.0; tile_count];
    for (tile, &frequency) in tiles.iter().zip(frequencies) {
        if let Some(share) = shares.get_mut(tile.tile.0) {
            *share += frequency;
        }
    }
    let total: f64 = shares.iter().sum();
    if total > 0.0 {
        for share in &mut shares {
            *share /= total;
        }
    }
    shares
}
