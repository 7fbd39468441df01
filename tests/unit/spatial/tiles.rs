//! Tests for face patterns, palettes and tile definitions

#[cfg(test)]
mod tests {
    use tilecore::spatial::grid::{X_MINUS, X_PLUS, Y_PLUS};
    use tilecore::spatial::rotation::RotationGroup;
    use tilecore::spatial::tiles::{
        BLANK_PAINT, FaceLayout, FacePattern, FaceTransform, Palette, TileDefinition, TileId,
    };

    fn numbered() -> FacePattern {
        FacePattern::square([[1, 2, 3], [4, 5, 6], [7, 8, 9]])
    }

    // Tests the square constructor and view agree
    // Verified by transposing SQUARE_RING
    #[test]
    fn test_square_roundtrip_and_ring_order() {
        let pattern = numbered();
        assert_eq!(pattern.to_square(), Some([[1, 2, 3], [4, 5, 6], [7, 8, 9]]));
        assert_eq!(pattern.center(), 5);
        assert_eq!(pattern.regions(), &[5, 2, 6, 8, 4, 3, 9, 7, 1]);
        assert_eq!(pattern.layout(), FaceLayout::Square);
    }

    // Tests a single clockwise step turns the 3x3 grid clockwise
    // Verified by shifting edges counterclockwise
    #[test]
    fn test_rotated_clockwise() {
        let turned = numbered().rotated(1);
        assert_eq!(turned.to_square(), Some([[7, 4, 1], [8, 5, 2], [9, 6, 3]]));
        assert_eq!(numbered().rotated(4), numbered());
        assert_eq!(numbered().rotated(-1), numbered().rotated(3));
    }

    // Tests reflection mirrors columns and is its own inverse
    // Verified by mapping corners with the edge permutation
    #[test]
    fn test_reflected_mirrors_columns() {
        let mirrored = numbered().reflected();
        assert_eq!(mirrored.to_square(), Some([[3, 2, 1], [6, 5, 4], [9, 8, 7]]));
        assert_eq!(mirrored.reflected(), numbered());
    }

    // Tests transforms reflect before rotating
    // Verified by rotating before reflecting
    #[test]
    fn test_transformed_order() {
        let transform = FaceTransform {
            steps: 1,
            reflect: true,
        };
        assert_eq!(
            numbered().transformed(transform),
            numbered().reflected().rotated(1)
        );
        assert_eq!(numbered().transformed(FaceTransform::IDENTITY), numbered());
    }

    // Tests faces match their mirror image but not an asymmetric copy
    // Verified by comparing regions without mirroring the facing pattern
    #[test]
    fn test_matches_mirrors_facing_pattern() {
        let palette = Palette::new();
        let asymmetric = FacePattern::square([[1, 0, 2], [1, 0, 2], [1, 0, 2]]);
        assert!(!asymmetric.matches(&asymmetric, &palette));
        assert!(asymmetric.matches(&asymmetric.reflected(), &palette));

        let uniform = FacePattern::uniform(FaceLayout::Square, 3);
        assert!(uniform.matches(&uniform, &palette));
        assert!(uniform.is_uniform());
        assert!(!asymmetric.is_uniform());
    }

    // Tests declared paint pairs match in both orders
    // Verified by storing pairs unordered
    #[test]
    fn test_palette_pairs() {
        let palette = Palette::new().with_match(2, 1);
        assert!(palette.matches(1, 2));
        assert!(palette.matches(2, 1));
        assert!(palette.matches(7, 7));
        assert!(!palette.matches(1, 3));

        let one = FacePattern::uniform(FaceLayout::Square, 1);
        let two = FacePattern::uniform(FaceLayout::Square, 2);
        assert!(one.matches(&two, &palette));
        assert!(!one.matches(&two, &Palette::new()));
    }

    // Tests patterns of different layouts never match
    // Verified by removing the layout check in matches
    #[test]
    fn test_layout_mismatch() {
        let square = FacePattern::uniform(FaceLayout::Square, 1);
        let hex = FacePattern::uniform(FaceLayout::Hex, 1);
        assert_eq!(hex.regions().len(), 13);
        assert_eq!(FaceLayout::Triangle.region_count(), 7);
        assert!(!square.matches(&hex, &Palette::new()));
        assert_eq!(hex.to_square(), None);
    }

    // Tests region counts are validated
    // Verified by accepting any region count
    #[test]
    fn test_from_regions_validates_count() {
        assert!(FacePattern::from_regions(FaceLayout::Square, vec![0; 9]).is_ok());
        assert!(FacePattern::from_regions(FaceLayout::Square, vec![0; 8]).is_err());
        assert!(FacePattern::from_regions(FaceLayout::Hex, vec![0; 13]).is_ok());
    }

    // Tests hexagonal rotations cycle after six steps
    // Verified by using four sides for every layout
    #[test]
    fn test_hex_rotation_cycle() {
        let regions: Vec<u16> = (0..13).collect();
        let Ok(pattern) = FacePattern::from_regions(FaceLayout::Hex, regions) else {
            panic!("thirteen regions fit a hex face");
        };
        assert_ne!(pattern.rotated(1), pattern);
        assert_eq!(pattern.rotated(6), pattern);
        assert_eq!(pattern.reflected().reflected(), pattern);
    }

    // Tests tile definition builders and defaults
    // Verified by keeping duplicate offsets
    #[test]
    fn test_tile_definition_builders() {
        let face = FacePattern::uniform(FaceLayout::Square, 4);
        let tile = TileDefinition::new("bridge")
            .with_offsets([[1, 0, 0], [0, 0, 0], [1, 0, 0]])
            .with_all_faces(&[X_PLUS, X_MINUS], &face)
            .with_face([0, 0, 0], Y_PLUS, face.rotated(1))
            .with_symmetry(false, true)
            .with_rotation_group(RotationGroup::HalfTurns)
            .with_symmetric(false)
            .with_weight(2.5);

        assert_eq!(tile.name(), "bridge");
        assert_eq!(tile.offsets(), &[[0, 0, 0], [1, 0, 0]]);
        assert!(tile.is_big());
        assert!(tile.occupies([1, 0, 0]));
        assert!(!tile.occupies([2, 0, 0]));
        assert_eq!(tile.faces().len(), 5);
        assert_eq!(tile.face([1, 0, 0], X_PLUS), Some(&face));
        assert!(!tile.rotatable());
        assert!(tile.reflectable());
        assert_eq!(tile.rotation_group(), RotationGroup::HalfTurns);
        assert!(!tile.symmetric());
        assert!((tile.weight() - 2.5).abs() < f64::EPSILON);

        let blank = tile.face_or_blank([1, 0, 0], Y_PLUS, FaceLayout::Square);
        assert_eq!(blank.center(), BLANK_PAINT);
        assert_eq!(TileId(3).to_string(), "tile#3");
    }
}
