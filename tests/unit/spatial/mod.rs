pub mod tiles;
pub mod topology;
