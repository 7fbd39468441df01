//! Unit tests mirroring the source tree

mod algorithm;
mod math;
mod model;
mod spatial;
