//! Mathematical utilities for generation

/// Seed mixing for reproducible retries
pub mod hashing;
/// Entropy of candidate distributions
pub mod probability;
