//! Offset, axial, and cube hex coordinates for a pointy-top, odd-row grid.
//!
//! Reference: <https://www.redblobgames.com/grids/hexagons/>

use std::fmt;
use std::ops::{Add, Sub};

use crate::config::GameConfig;
use crate::error::{EngineError, EngineResult};

/// Odd-row offset coordinate. Top-left tile is `(0, 0)`; odd rows are shoved
/// half a tile to the right.
///
/// This is the coordinate used by the board, by entities, and by the public API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OddRCoord {
    pub x: i32,
    pub y: i32,
}

/// Neighbor offsets indexed by `[row parity][direction]`.
///
/// Direction 0 is east, continuing counter-clockwise to 5 (south-east).
const DIRECTION_DIFFERENCES: [[(i32, i32); GameConfig::HEX_DIRECTIONS]; 2] = [
    // Even rows
    [(1, 0), (0, -1), (-1, -1), (-1, 0), (-1, 1), (0, 1)],
    // Odd rows
    [(1, 0), (1, -1), (0, -1), (-1, 0), (0, 1), (1, 1)],
];

impl OddRCoord {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn col(self) -> i32 {
        self.x
    }

    pub const fn row(self) -> i32 {
        self.y
    }

    pub const fn to_axial(self) -> AxialCoord {
        let parity = self.y & 1;
        AxialCoord::new(self.x - (self.y - parity) / 2, self.y)
    }

    pub const fn to_cube(self) -> CubeCoord {
        self.to_axial().to_cube()
    }

    /// Hex distance in steps.
    pub fn distance(self, other: Self) -> u32 {
        self.to_cube().distance(other.to_cube())
    }

    /// Neighbor in `direction` (0–5).
    pub fn neighbor(self, direction: usize) -> EngineResult<Self> {
        if direction >= GameConfig::HEX_DIRECTIONS {
            return Err(EngineError::InvalidArgument(
                "direction must be between 0 and 5",
            ));
        }
        Ok(self.neighbor_unchecked(direction))
    }

    fn neighbor_unchecked(self, direction: usize) -> Self {
        let parity = (self.y & 1) as usize;
        let (dx, dy) = DIRECTION_DIFFERENCES[parity][direction];
        Self::new(self.x + dx, self.y + dy)
    }

    /// All six neighbors in direction order.
    pub fn neighbors(self) -> [Self; GameConfig::HEX_DIRECTIONS] {
        std::array::from_fn(|direction| self.neighbor_unchecked(direction))
    }

    /// Returns true if `other` shares an edge with `self`.
    pub fn is_adjacent(self, other: Self) -> bool {
        self.distance(other) == 1
    }
}

impl Add for OddRCoord {
    type Output = OddRCoord;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for OddRCoord {
    type Output = OddRCoord;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for OddRCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axial coordinate `(q, r)`; the cube coordinate with `s` left implicit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxialCoord {
    pub q: i32,
    pub r: i32,
}

impl AxialCoord {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    pub const fn to_cube(self) -> CubeCoord {
        CubeCoord {
            q: self.q,
            r: self.r,
            s: -self.q - self.r,
        }
    }

    pub const fn to_odd_r(self) -> OddRCoord {
        let parity = self.r & 1;
        OddRCoord::new(self.q + (self.r - parity) / 2, self.r)
    }
}

impl Add for AxialCoord {
    type Output = AxialCoord;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.q + rhs.q, self.r + rhs.r)
    }
}

impl Sub for AxialCoord {
    type Output = AxialCoord;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.q - rhs.q, self.r - rhs.r)
    }
}

/// Cube coordinate. Always satisfies `q + r + s == 0`.
///
/// Fields are private so the constraint cannot be broken; build one with
/// [`CubeCoord::new`] (which derives `s`) or from another representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubeCoord {
    q: i32,
    r: i32,
    s: i32,
}

impl CubeCoord {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    pub const fn q(self) -> i32 {
        self.q
    }

    pub const fn r(self) -> i32 {
        self.r
    }

    pub const fn s(self) -> i32 {
        self.s
    }

    pub const fn to_axial(self) -> AxialCoord {
        AxialCoord::new(self.q, self.r)
    }

    pub const fn to_odd_r(self) -> OddRCoord {
        self.to_axial().to_odd_r()
    }

    /// Half the Manhattan length of the cube delta.
    pub fn distance(self, other: Self) -> u32 {
        let delta = self - other;
        (delta.q.unsigned_abs() + delta.r.unsigned_abs() + delta.s.unsigned_abs()) / 2
    }

    pub(crate) fn to_float(self) -> CubeCoordF {
        CubeCoordF {
            q: self.q as f64,
            r: self.r as f64,
            s: self.s as f64,
        }
    }
}

impl Add for CubeCoord {
    type Output = CubeCoord;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.q + rhs.q, self.r + rhs.r)
    }
}

impl Sub for CubeCoord {
    type Output = CubeCoord;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.q - rhs.q, self.r - rhs.r)
    }
}

/// Fractional cube coordinate used while interpolating lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct CubeCoordF {
    pub q: f64,
    pub r: f64,
    pub s: f64,
}

impl CubeCoordF {
    pub fn nudged(self, epsilon: (f64, f64, f64)) -> Self {
        Self {
            q: self.q + epsilon.0,
            r: self.r + epsilon.1,
            s: self.s + epsilon.2,
        }
    }

    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            q: self.q + (other.q - self.q) * t,
            r: self.r + (other.r - self.r) * t,
            s: self.s + (other.s - self.s) * t,
        }
    }

    /// Rounds to the nearest cell, recomputing the component with the largest
    /// rounding error from the other two.
    pub fn round(self) -> CubeCoord {
        let mut q = self.q.round();
        let mut r = self.r.round();
        let s = self.s.round();

        let q_diff = (q - self.q).abs();
        let r_diff = (r - self.r).abs();
        let s_diff = (s - self.s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            q = -r - s;
        } else if r_diff > s_diff {
            r = -q - s;
        }
        // Otherwise `s` is the one to recompute, which `CubeCoord::new` does.
        CubeCoord::new(q as i32, r as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_coords() -> impl Iterator<Item = OddRCoord> {
        (-6..=6).flat_map(|x| (-6..=6).map(move |y| OddRCoord::new(x, y)))
    }

    #[test]
    fn offset_cube_round_trip() {
        for coord in sample_coords() {
            assert_eq!(coord.to_cube().to_odd_r(), coord);
            assert_eq!(coord.to_axial().to_odd_r(), coord);
            let cube = coord.to_cube();
            assert_eq!(cube.q() + cube.r() + cube.s(), 0);
        }
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        for a in sample_coords() {
            assert_eq!(a.distance(a), 0);
            for b in sample_coords().step_by(7) {
                assert_eq!(a.distance(b), b.distance(a));
                if a != b {
                    assert!(a.distance(b) > 0);
                }
            }
        }
    }

    #[test]
    fn triangle_inequality_holds() {
        let points: Vec<_> = sample_coords().step_by(11).collect();
        for &a in &points {
            for &b in &points {
                for &c in &points {
                    assert!(a.distance(c) <= a.distance(b) + b.distance(c));
                }
            }
        }
    }

    #[test]
    fn neighbors_are_at_distance_one() {
        for coord in [OddRCoord::new(2, 2), OddRCoord::new(3, 3), OddRCoord::new(0, -1)] {
            let neighbors = coord.neighbors();
            for neighbor in neighbors {
                assert_eq!(coord.distance(neighbor), 1);
            }
            let mut unique = neighbors.to_vec();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), 6);
        }
    }

    #[test]
    fn neighbor_rejects_bad_direction() {
        assert_eq!(OddRCoord::ORIGIN.neighbor(0).unwrap(), OddRCoord::new(1, 0));
        assert!(matches!(
            OddRCoord::ORIGIN.neighbor(6),
            Err(EngineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rounding_preserves_cube_constraint() {
        let rounded = CubeCoordF {
            q: 0.4,
            r: 0.4,
            s: -0.8,
        }
        .round();
        assert_eq!(rounded.q() + rounded.r() + rounded.s(), 0);
        assert_eq!(rounded, CubeCoord::new(0, 1));
    }
}
