//! Tests for instance frequencies and tile shares

#[cfg(test)]
mod tests {
    use tilecore::model::canonical::{Canonicalization, EquivalenceClass, ModelTile};
    use tilecore::model::weights::{instance_frequencies, instance_frequency, tile_shares};
    use tilecore::spatial::rotation::Rotation;
    use tilecore::spatial::tiles::TileId;

    // Tests weight scales with class size and is spread over offsets
    // Verified by multiplying by the offset count
    #[test]
    fn test_instance_frequency() {
        assert!((instance_frequency(2.0, 4, 2) - 4.0).abs() < 1e-12);
        assert!((instance_frequency(1.0, 1, 1) - 1.0).abs() < 1e-12);
        assert!(instance_frequency(1.0, 3, 0).abs() < 1e-12);
    }

    // Tests frequencies use each tile's own weight and class
    // Verified by using class size one for every instance
    #[test]
    fn test_instance_frequencies() {
        let a = ModelTile::new(TileId(0), Rotation::IDENTITY, [0, 0, 0]);
        let b = ModelTile::new(TileId(1), Rotation::IDENTITY, [0, 0, 0]);
        let mut canonicalization = Canonicalization::default();
        canonicalization.insert(EquivalenceClass {
            canonical: a,
            members: vec![a, ModelTile::new(TileId(0), Rotation::new(1, false), [0, 0, 0])],
        });
        canonicalization.insert(EquivalenceClass {
            canonical: b,
            members: vec![b],
        });

        let frequencies = instance_frequencies(
            &[a, b],
            &canonicalization,
            |id| if id.0 == 0 { 1.5 } else { 3.0 },
            |_| 1,
        );
        assert_eq!(frequencies.len(), 2);
        assert!((frequencies.first().copied().unwrap_or_default() - 3.0).abs() < 1e-12);
        assert!((frequencies.get(1).copied().unwrap_or_default() - 3.0).abs() < 1e-12);
    }

    // Tests shares are normalised per tile definition
    // Verified by skipping the normalisation
    #[test]
    fn test_tile_shares() {
        let tiles = [
            ModelTile::new(TileId(0), Rotation::IDENTITY, [0, 0, 0]),
            ModelTile::new(TileId(0), Rotation::IDENTITY, [1, 0, 0]),
            ModelTile::new(TileId(1), Rotation::IDENTITY, [0, 0, 0]),
        ];
        let shares = tile_shares(&tiles, &[0.5, 0.5, 3.0], 3);
        assert_eq!(shares.len(), 3);
        assert!((shares.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((shares.first().copied().unwrap_or_default() - 0.25).abs() < 1e-12);
        assert!(shares.get(2).copied().unwrap_or(1.0).abs() < 1e-12);

        let empty = tile_shares(&[], &[], 2);
        assert_eq!(empty, vec![0.0, 0.0]);
    }
}
