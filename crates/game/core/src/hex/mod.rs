//! Hex grid geometry: coordinates, distance, lines, ranges, and pathfinding.
//!
//! Every query that walks the grid takes an `is_blocked(candidate, source)`
//! predicate instead of a board, so the same routines serve movement,
//! line-of-sight, and area-of-effect rules.
mod coord;
mod path;
mod range;

pub use coord::{AxialCoord, CubeCoord, OddRCoord};
