//! Raster and text rendering of completions

use crate::algorithm::executor::Completion;
use crate::io::error::{GenerationError, Result, invalid_parameter};
use image::{ImageBuffer, Rgba};
use ndarray::Array2;
use std::path::Path;

// Cells nobody placed a tile in stay transparent
const EMPTY_PIXEL: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Tile definition per cell of one horizontal layer, indexed `[y, x]`
pub fn completion_layer(
    completion: &Completion,
    width: usize,
    height: usize,
    z: i32,
) -> Array2<Option<usize>> {
    let mut layer = Array2::from_elem((height, width), None);
    for placement in completion.placements() {
        let [x, y, cell_z] = placement.cell;
        if cell_z != z || x < 0 || y < 0 {
            continue;
        }
        if let Some(slot) = layer.get_mut([y as usize, x as usize]) {
            *slot = Some(placement.tile.0);
        }
    }
    layer
}

/// Text rendering of a layer, highest row first so y grows upwards
pub fn render_ascii(layer: &Array2<Option<usize>>, glyphs: &[char]) -> String {
    let (height, width) = layer.dim();
    let mut text = String::with_capacity((width + 1) * height);
    for row in (0..height).rev() {
        for col in 0..width {
            let glyph = layer
                .get([row, col])
                .copied()
                .flatten()
                .and_then(|tile| glyphs.get(tile).copied())
                .unwrap_or('?');
            text.push(glyph);
        }
        text.push('\n');
    }
    text
}

/// Export a layer as a PNG with one square block of pixels per cell
///
/// # Errors
///
/// Returns an error if:
/// - The block size is zero
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_layer_as_png(
    layer: &Array2<Option<usize>>,
    colors: &[[u8; 4]],
    cell_pixels: u32,
    output_path: &Path,
) -> Result<()> {
    if cell_pixels == 0 {
        return Err(invalid_parameter(
            "cell_pixels",
            &cell_pixels,
            &"blocks must be at least one pixel wide",
        ));
    }
    let (height, width) = layer.dim();
    let mut img = ImageBuffer::from_pixel(
        width as u32 * cell_pixels,
        height as u32 * cell_pixels,
        EMPTY_PIXEL,
    );

    for ((row, col), tile) in layer.indexed_iter() {
        let color = tile
            .and_then(|tile| colors.get(tile))
            .map_or(EMPTY_PIXEL, |&rgba| Rgba(rgba));
        // Image rows grow downwards, grid y grows upwards
        let top = (height - 1 - row) as u32 * cell_pixels;
        let left = col as u32 * cell_pixels;
        for dy in 0..cell_pixels {
            for dx in 0..cell_pixels {
                img.put_pixel(left + dx, top + dy, color);
            }
        }
    }

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| GenerationError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path)
        .map_err(|e| GenerationError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}
