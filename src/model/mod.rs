/// Internal adjacencies, external candidate index and neighbour rules
pub mod adjacency;
/// Symmetry detection and canonical instance mapping
pub mod canonical;
/// Tile model aggregate and synthesis entry points
pub mod synthesis;
/// Frequency weighting of canonical instances
pub mod weights;

pub use canonical::ModelTile;
pub use synthesis::{TileModel, synthesize, synthesize_with_palette};
