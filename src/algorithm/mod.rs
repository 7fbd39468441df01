/// Bitset domains over model tile indices
pub mod bitset;
/// Placement constraints and their resolution into solver operations
pub mod constraints;
/// Cancellation token and progress throttling
pub mod control;
/// Generation pipeline and retry loop
pub mod executor;
/// Reference arc-consistency propagator
pub mod propagation;
/// Replay classification, contradiction signatures and shrinking
pub mod recovery;
/// Seeded random selection with snapshots
pub mod selection;
/// Solver collaborator contract
pub mod solver;
