//! Input/output, configuration and error handling

/// Command-line interface and request runner
pub mod cli;
/// Generation constants and defaults
pub mod configuration;
/// Error types
pub mod error;
/// Raster and text rendering of completions
pub mod image;
/// Terminal progress bar
pub mod progress;
/// Built-in demonstration tile sets
pub mod tilesets;
