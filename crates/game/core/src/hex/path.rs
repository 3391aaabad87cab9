//! A* pathfinding over the hex grid.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use super::coord::OddRCoord;

/// Heap entry ordered so the smallest `priority` pops first, then the
/// earliest pushed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Frontier {
    priority: u32,
    sequence: u64,
    cost: u32,
    coord: OddRCoord,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl OddRCoord {
    /// Unit-cost shortest path to `goal`. See [`OddRCoord::path_find_with_cost`].
    pub fn path_find<F>(self, goal: OddRCoord, is_blocked: F) -> Option<Vec<OddRCoord>>
    where
        F: FnMut(OddRCoord, OddRCoord) -> bool,
    {
        self.path_find_with_cost(goal, is_blocked, |_, _| 1)
    }

    /// Cheapest path from `self` to `goal`, both endpoints included.
    ///
    /// `is_blocked(candidate, source)` rejects a step. `cost_fn(from, to)` must
    /// return at least 1 so the hex-distance heuristic stays admissible.
    /// Returns `None` when the goal cannot be reached.
    pub fn path_find_with_cost<F, C>(
        self,
        goal: OddRCoord,
        mut is_blocked: F,
        mut cost_fn: C,
    ) -> Option<Vec<OddRCoord>>
    where
        F: FnMut(OddRCoord, OddRCoord) -> bool,
        C: FnMut(OddRCoord, OddRCoord) -> u32,
    {
        let mut frontier = BinaryHeap::new();
        let mut came_from: BTreeMap<OddRCoord, Option<OddRCoord>> = BTreeMap::new();
        let mut cost_so_far: BTreeMap<OddRCoord, u32> = BTreeMap::new();
        let mut sequence = 0u64;

        frontier.push(Frontier {
            priority: 0,
            sequence,
            cost: 0,
            coord: self,
        });
        came_from.insert(self, None);
        cost_so_far.insert(self, 0);

        while let Some(current) = frontier.pop() {
            if current.coord == goal {
                break;
            }
            // Stale entry superseded by a cheaper push.
            if cost_so_far
                .get(&current.coord)
                .is_some_and(|best| current.cost > *best)
            {
                continue;
            }

            for next in current.coord.neighbors() {
                if is_blocked(next, current.coord) {
                    continue;
                }
                let new_cost = current
                    .cost
                    .saturating_add(cost_fn(current.coord, next).max(1));
                if cost_so_far.get(&next).is_some_and(|known| new_cost >= *known) {
                    continue;
                }
                cost_so_far.insert(next, new_cost);
                came_from.insert(next, Some(current.coord));
                sequence += 1;
                frontier.push(Frontier {
                    priority: new_cost.saturating_add(goal.distance(next)),
                    sequence,
                    cost: new_cost,
                    coord: next,
                });
            }
        }

        if !came_from.contains_key(&goal) {
            return None;
        }

        let mut path = vec![goal];
        let mut cursor = goal;
        while let Some(Some(previous)) = came_from.get(&cursor) {
            path.push(*previous);
            cursor = *previous;
        }
        path.reverse();
        Some(path)
    }
}
