//! Tests for layer extraction, text rendering and PNG export

#[cfg(test)]
mod tests {
    use ndarray::Array2;
    use tilecore::algorithm::executor::{GenerationOptions, generate};
    use tilecore::io::image::{completion_layer, export_layer_as_png, render_ascii};
    use tilecore::model::synthesize;
    use tilecore::spatial::grid::{CubeGrid, SquareGrid, X_MINUS, X_PLUS, Y_MINUS, Y_PLUS};
    use tilecore::spatial::tiles::{FaceLayout, FacePattern, TileDefinition};

    // Tests the layer picks up every placement at its cell
    // Verified by transposing the layer index
    #[test]
    fn test_completion_layer() {
        let grid = SquareGrid::new(3, 2);
        let tiles = [TileDefinition::new("only").with_all_faces(
            &[X_PLUS, Y_PLUS, X_MINUS, Y_MINUS],
            &FacePattern::uniform(FaceLayout::Square, 1),
        )];
        let model = synthesize(&tiles, &grid).expect("synthesize");
        let completion =
            generate(&model, &grid, &[], &GenerationOptions::default()).expect("generate");

        let layer = completion_layer(&completion, 3, 2, 0);
        assert_eq!(layer.dim(), (2, 3));
        assert!(layer.iter().all(|tile| *tile == Some(0)));

        let above = completion_layer(&completion, 3, 2, 1);
        assert!(above.iter().all(Option::is_none));
    }

    // Tests layers of a cubic grid only take their own depth
    // Verified by ignoring the z coordinate
    #[test]
    fn test_completion_layer_on_cube() {
        let grid = CubeGrid::new(2, 2, 2);
        let model = synthesize(&[TileDefinition::new("block")], &grid).expect("synthesize");
        let completion =
            generate(&model, &grid, &[], &GenerationOptions::default()).expect("generate");
        assert!(completion.success);

        let bottom = completion_layer(&completion, 2, 2, 0);
        let top = completion_layer(&completion, 2, 2, 1);
        assert!(bottom.iter().all(Option::is_some));
        assert!(top.iter().all(Option::is_some));
        assert!(completion_layer(&completion, 2, 2, 2).iter().all(Option::is_none));
    }

    // Tests text rendering puts the highest row first
    // Verified by rendering rows in storage order
    #[test]
    fn test_render_ascii() {
        let mut layer = Array2::from_elem((2, 3), Some(0));
        if let Some(cell) = layer.get_mut([1, 0]) {
            *cell = Some(1);
        }
        if let Some(cell) = layer.get_mut([0, 2]) {
            *cell = None;
        }

        let text = render_ascii(&layer, &['.', '#']);
        assert_eq!(text, "#..\n..?\n");
    }

    // Tests unknown definitions render as a placeholder
    // Verified by panicking on missing glyphs
    #[test]
    fn test_render_ascii_missing_glyph() {
        let layer = Array2::from_elem((1, 2), Some(5));
        assert_eq!(render_ascii(&layer, &['.']), "??\n");
    }

    // Tests PNG export writes scaled blocks with y growing upwards
    // Verified by drawing rows without flipping
    #[test]
    fn test_export_layer_as_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("deeper").join("layer.png");
        let mut layer = Array2::from_elem((2, 2), None);
        if let Some(cell) = layer.get_mut([1, 0]) {
            *cell = Some(0);
        }
        let colors = [[255, 0, 0, 255]];

        export_layer_as_png(&layer, &colors, 4, &path).expect("export");

        let img = image::open(&path).expect("open").to_rgba8();
        assert_eq!(img.dimensions(), (8, 8));
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(3, 3).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(0, 4).0, [0, 0, 0, 0]);
        assert_eq!(img.get_pixel(7, 0).0, [0, 0, 0, 0]);
    }

    // Tests zero-sized blocks are rejected
    // Verified by removing the block size check
    #[test]
    fn test_export_rejects_zero_block() {
        let dir = tempfile::tempdir().expect("tempdir");
        let layer = Array2::from_elem((1, 1), Some(0));
        let result = export_layer_as_png(&layer, &[[0, 0, 0, 255]], 0, &dir.path().join("x.png"));
        assert!(result.is_err());
    }
}
