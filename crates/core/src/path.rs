//! A* pathfinding over the hex grid

use crate::{
    area::Area,
    hex::{Direction, Hex, HexMap},
};
use log::debug;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Supplies movement costs and the search heuristic for [path_to]
pub trait Pather {
    /// Cost of stepping from `hex` to its neighbor in `direction`. A negative
    /// cost means the step can't be taken.
    fn cost(&self, hex: Hex, direction: Direction) -> i64;

    /// Estimate the remaining cost from `from` to `to`. This must never
    /// overestimate the real cost, or the path found may not be the
    /// cheapest. A negative estimate marks `from` as unreachable.
    fn estimated_cost(&self, from: Hex, to: Hex) -> i64;

    /// Upper bound on the number of hexes the search will expand before
    /// giving up. The grid is infinite, so a pather that allows movement
    /// everywhere but can never reach the target needs this to terminate.
    fn max_expansions(&self) -> Option<usize> {
        None
    }
}

/// Every step costs 1, and the heuristic is hex distance (exact, when
/// nothing is in the way)
#[derive(Copy, Clone, Debug, Default)]
pub struct UniformCost;

impl Pather for UniformCost {
    fn cost(&self, _: Hex, _: Direction) -> i64 {
        1
    }

    fn estimated_cost(&self, from: Hex, to: Hex) -> i64 {
        from.distance_to(to)
    }
}

/// Every step within the area costs 1. Stepping outside of it is impossible.
#[derive(Copy, Clone, Debug)]
pub struct AreaPather<'a> {
    area: &'a Area,
}

impl<'a> AreaPather<'a> {
    pub fn new(area: &'a Area) -> Self {
        Self { area }
    }
}

impl<'a> Pather for AreaPather<'a> {
    fn cost(&self, hex: Hex, direction: Direction) -> i64 {
        if self.area.contains(hex.neighbor(direction)) {
            1
        } else {
            -1
        }
    }

    fn estimated_cost(&self, from: Hex, to: Hex) -> i64 {
        from.distance_to(to)
    }
}

/// The result of a search
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    /// Every hex along the path, starting with the origin and ending with
    /// the target. Empty if no path was found.
    pub hexes: Vec<Hex>,
    /// Sum of step costs along the path
    pub cost: i64,
    pub found: bool,
}

impl Path {
    fn not_found() -> Self {
        Self {
            hexes: Vec::new(),
            cost: 0,
            found: false,
        }
    }

    /// Number of hexes on the path, including both ends
    pub fn len(&self) -> usize {
        self.hexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hexes.is_empty()
    }
}

/// Find the cheapest path from `from` to `target`. The target counts as
/// reached when it's taken off the open set, not when it's first seen, so
/// the result is optimal for any admissible heuristic.
pub fn path_to(from: Hex, target: Hex, pather: &impl Pather) -> Path {
    if from == target {
        return Path {
            hexes: vec![from],
            cost: 0,
            found: true,
        };
    }

    // Best known (parent, cost) for every hex we've seen
    let mut visited: HexMap<(Option<Hex>, i64)> = HexMap::default();
    let mut open = OpenSet::default();
    visited.insert(from, (None, 0));
    open.push(from, pather.estimated_cost(from, target).max(0), 0);

    let limit = pather.max_expansions();
    let mut expansions: usize = 0;
    while let Some(node) = open.pop() {
        if node.hex == target {
            let path = Path {
                hexes: reconstruct(&visited, target),
                cost: node.cost,
                found: true,
            };
            debug!(
                "Found path from {} to {} ({} hexes, cost {}, {} expanded)",
                from,
                target,
                path.len(),
                path.cost,
                expansions
            );
            return path;
        }

        if limit.is_some_and(|limit| expansions >= limit) {
            break;
        }
        expansions += 1;

        for direction in Direction::iter() {
            let step = pather.cost(node.hex, direction);
            if step < 0 {
                continue;
            }
            let next = node.hex.neighbor(direction);
            let estimate = pather.estimated_cost(next, target);
            if estimate < 0 {
                continue;
            }

            let cost = node.cost + step;
            let improved = visited
                .get(&next)
                .map_or(true, |&(_, known)| cost < known);
            if improved {
                visited.insert(next, (Some(node.hex), cost));
                open.push(next, cost + estimate, cost);
            }
        }
    }

    debug!(
        "No path from {} to {} ({} expanded)",
        from, target, expansions
    );
    Path::not_found()
}

/// Walk parent links back from the target, then flip them into order
fn reconstruct(visited: &HexMap<(Option<Hex>, i64)>, target: Hex) -> Vec<Hex> {
    let mut hexes = vec![target];
    let mut current = target;
    while let Some(&(Some(parent), _)) = visited.get(&current) {
        hexes.push(parent);
        current = parent;
    }
    hexes.reverse();
    hexes
}

/// An entry in the open set
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Node {
    hex: Hex,
    /// Cost so far plus the heuristic estimate
    score: i64,
    /// Cost so far
    cost: i64,
    /// Breaks ties between equal scores, lowest (oldest) first
    order: u64,
}

impl Node {
    fn key(&self) -> (i64, u64) {
        (self.score, self.order)
    }
}

/// A binary min-heap of search nodes that also tracks where each hex lives in
/// the heap, so a hex that's already queued can have its score lowered in
/// place instead of being queued twice.
#[derive(Debug, Default)]
struct OpenSet {
    heap: Vec<Node>,
    positions: HexMap<usize>,
    next_order: u64,
}

impl OpenSet {
    /// Queue a hex, or lower its score if it's already queued. A higher score
    /// for a queued hex is ignored.
    fn push(&mut self, hex: Hex, score: i64, cost: i64) {
        let order = self.next_order;
        self.next_order += 1;

        match self.positions.get(&hex) {
            Some(&index) => {
                let node = &mut self.heap[index];
                if score < node.score {
                    *node = Node {
                        hex,
                        score,
                        cost,
                        order,
                    };
                    self.sift_up(index);
                }
            }
            None => {
                let index = self.heap.len();
                self.heap.push(Node {
                    hex,
                    score,
                    cost,
                    order,
                });
                self.positions.insert(hex, index);
                self.sift_up(index);
            }
        }
    }

    /// Remove and return the node with the lowest score
    fn pop(&mut self) -> Option<Node> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let node = self.heap.pop()?;
        self.positions.remove(&node.hex);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(node)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.heap[index].key() >= self.heap[parent].key() {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;
            if left < self.len()
                && self.heap[left].key() < self.heap[smallest].key()
            {
                smallest = left;
            }
            if right < self.len()
                && self.heap[right].key() < self.heap[smallest].key()
            {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.swap(index, smallest);
            index = smallest;
        }
    }

    /// Swap two nodes, keeping the position index in sync
    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.positions.insert(self.heap[a].hex, a);
        self.positions.insert(self.heap[b].hex, b);
    }
}
