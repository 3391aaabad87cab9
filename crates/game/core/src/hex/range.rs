//! Line drawing and ranged enumeration.

use std::collections::BTreeSet;

use super::coord::{CubeCoord, OddRCoord};

/// Nudge applied to the line start so samples never land exactly on an edge.
const LINE_EPSILON: (f64, f64, f64) = (1e-6, 2e-6, -3e-6);

impl OddRCoord {
    /// Cells on the straight line from `self` to `other`, both endpoints included.
    ///
    /// Yields exactly `distance + 1` cells and consecutive cells are adjacent.
    pub fn line_draw(self, other: OddRCoord) -> Vec<OddRCoord> {
        let steps = self.distance(other);
        if steps == 0 {
            return vec![self];
        }

        let start = self.to_cube().to_float().nudged(LINE_EPSILON);
        let end = other.to_cube().to_float();
        let mut line = Vec::with_capacity(steps as usize + 1);
        line.push(self);
        for step in 1..steps {
            let t = f64::from(step) / f64::from(steps);
            line.push(start.lerp(end, t).round().to_odd_r());
        }
        line.push(other);
        line
    }

    /// Every cell within `radius` steps of `self`, including `self`.
    ///
    /// A negative radius yields nothing.
    pub fn all_in_range(self, radius: i32) -> Vec<OddRCoord> {
        let center = self.to_cube();
        let mut cells = Vec::new();
        for q in -radius..=radius {
            let r_min = (-radius).max(-q - radius);
            let r_max = radius.min(-q + radius);
            for r in r_min..=r_max {
                cells.push((center + CubeCoord::new(q, r)).to_odd_r());
            }
        }
        cells
    }

    /// Flood fill outward from `self` for at most `reach` steps.
    ///
    /// `is_blocked(candidate, source)` is asked once per unvisited candidate,
    /// with `source` being the cell the fill steps from. Non-positive reach
    /// expands nothing.
    pub fn get_reachable_coords<F>(
        self,
        reach: i32,
        mut is_blocked: F,
        include_self: bool,
    ) -> BTreeSet<OddRCoord>
    where
        F: FnMut(OddRCoord, OddRCoord) -> bool,
    {
        let mut visited = BTreeSet::from([self]);
        let mut fringes: Vec<Vec<OddRCoord>> = vec![vec![self]];

        for step in 1..=reach.max(0) as usize {
            let mut next = Vec::new();
            for &source in &fringes[step - 1] {
                for candidate in source.neighbors() {
                    if visited.contains(&candidate) || is_blocked(candidate, source) {
                        continue;
                    }
                    visited.insert(candidate);
                    next.push(candidate);
                }
            }
            if next.is_empty() {
                break;
            }
            fringes.push(next);
        }

        if !include_self {
            visited.remove(&self);
        }
        visited
    }
}
