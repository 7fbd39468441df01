//! Tests for the built-in tile sets

#[cfg(test)]
mod tests {
    use tilecore::algorithm::executor::{GenerationOptions, generate};
    use tilecore::io::tilesets::{Tileset, bridges, roads, stripes};
    use tilecore::model::synthesize;
    use tilecore::spatial::grid::SquareGrid;

    fn assert_drawable(tileset: &Tileset) {
        assert_eq!(tileset.colors.len(), tileset.definitions.len());
        assert_eq!(tileset.glyphs.len(), tileset.definitions.len());
    }

    // Tests shore tiles expand to four orientations
    // Verified by marking the shore symmetric
    #[test]
    fn test_stripes_instances() {
        let tileset = stripes();
        assert_drawable(&tileset);
        let model = synthesize(&tileset.definitions, &SquareGrid::new(4, 4)).expect("synthesize");
        assert_eq!(model.tile_count(), 6);
    }

    // Tests the bridge contributes both halves in each orientation
    // Verified by dropping the second bridge offset
    #[test]
    fn test_bridges_instances() {
        let tileset = bridges();
        assert_drawable(&tileset);
        let model = synthesize(&tileset.definitions, &SquareGrid::new(4, 4)).expect("synthesize");
        assert_eq!(model.tile_count(), 8);
    }

    // Tests the road set synthesizes and solves with backtracking
    // Verified by breaking the road face pattern symmetry
    #[test]
    fn test_roads_generate() {
        let tileset = roads();
        assert_drawable(&tileset);
        let grid = SquareGrid::new(8, 8);
        let model = synthesize(&tileset.definitions, &grid).expect("synthesize");
        assert_eq!(model.tile_count(), 12);

        let options = GenerationOptions::default().with_backtrack(true);
        let completion = generate(&model, &grid, &[], &options).expect("generate");
        assert!(completion.success);
        assert_eq!(completion.placements().len(), 64);
    }
}
