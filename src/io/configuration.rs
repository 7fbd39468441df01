//! Generation constants and runtime configuration defaults

// Default values for configurable parameters
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Steps before the solver is forced into a contradiction; zero means unbounded
pub const DEFAULT_STEP_LIMIT: usize = 0;

/// Extra attempts after a contradiction during the run
pub const DEFAULT_RETRIES: usize = 3;

// Progress callbacks must never fire more often than this
/// Minimum delay between two progress reports
pub const PROGRESS_INTERVAL_MS: u64 = 100;

/// Label passed to the progress callback while stepping
pub const PROGRESS_LABEL: &str = "Generating";

// Grid defaults for the command-line tool
/// Default grid width in cells
pub const DEFAULT_WIDTH: usize = 24;
/// Default grid height in cells
pub const DEFAULT_HEIGHT: usize = 16;
/// Default grid depth; one layer selects the square grid
pub const DEFAULT_DEPTH: usize = 1;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 4_096;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 50;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_tiles";
/// Edge length of the pixel block drawn per cell
pub const CELL_PIXELS: u32 = 8;
