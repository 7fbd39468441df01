//! Error types for model synthesis and generation

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for all synthesis and generation operations
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No tile definitions were supplied, or none survived validation
    #[error("Tile set is empty")]
    EmptyTileSet,

    /// Tile set or placement configuration cannot be used
    #[error("Invalid configuration: {reason}")]
    Configuration {
        /// Description of what's wrong with the configuration
        reason: String,
    },

    /// A painted face does not fit the grid it is synthesized against
    ///
    /// This is a programming error in the tile set, not a user mistake,
    /// and aborts synthesis.
    #[error("Tile '{tile}' has an invalid face: {reason}")]
    InvalidFace {
        /// Name of the offending tile
        tile: String,
        /// Which face is wrong and why
        reason: String,
    },

    /// A placement constraint names a tile the model does not contain
    #[error("Constraint '{constraint}' references unknown tile {tile}")]
    UnknownTile {
        /// Name of the constraint
        constraint: String,
        /// Index that failed to resolve
        tile: usize,
    },

    /// Applying an initial constraint emptied some cell's domain
    ///
    /// Fatal for the attempt; retrying with another seed cannot help.
    #[error("Contradiction while applying '{constraint}'")]
    ContradictionDuringSetup {
        /// Name of the first offending constraint
        constraint: String,
    },

    /// Stepping the solver reached a contradiction
    #[error("Contradiction during generation at cell {cell:?}")]
    ContradictionDuringRun {
        /// First unsolved cell in scan order, if one could be located
        cell: Option<[i32; 3]>,
    },

    /// The cancellation token was triggered while stepping
    #[error("Generation cancelled")]
    Cancelled,

    /// Pipeline phases were invoked out of order
    #[error("Pipeline expected state {expected} but was in {actual}")]
    InvalidState {
        /// State the phase requires
        expected: &'static str,
        /// State the pipeline was in
        actual: &'static str,
    },

    /// Parameter validation failed
    #[error("Invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to save a rendered completion to disk
    #[error("Failed to export image to '{}': {source}", .path.display())]
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        #[source]
        source: image::ImageError,
    },

    /// General file system operation failure
    #[error("File system error during {operation} on '{}': {source}", .path.display())]
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl GenerationError {
    /// Whether another attempt with a fresh seed could succeed
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ContradictionDuringRun { .. })
    }
}

/// Convenience type alias for generation results
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GenerationError {
    GenerationError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a configuration error
pub fn configuration_error(reason: &impl ToString) -> GenerationError {
    GenerationError::Configuration {
        reason: reason.to_string(),
    }
}

/// Create an invalid face error
pub fn invalid_face(tile: &str, reason: &impl ToString) -> GenerationError {
    GenerationError::InvalidFace {
        tile: tile.to_string(),
        reason: reason.to_string(),
    }
}
