//! Movement search on the 4-neighbour grid.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap, VecDeque};

use super::{Grid, Occupancy};
use crate::state::Position;

/// Every cell a unit standing on `origin` can end its move on.
///
/// Breadth-first expansion with unit step cost. Walls and occupied cells are
/// never entered; the origin itself is never a destination.
pub fn reachable_cells(
    grid: &Grid,
    occupancy: &(impl Occupancy + ?Sized),
    origin: Position,
    move_range: u32,
) -> BTreeMap<Position, u32> {
    let mut costs: HashMap<Position, u32> = HashMap::from([(origin, 0)]);
    let mut frontier = VecDeque::from([origin]);

    while let Some(current) = frontier.pop_front() {
        let cost = costs[&current];
        if cost >= move_range {
            continue;
        }
        for next in grid.neighbors(current) {
            if costs.contains_key(&next) || grid.is_wall(next) || occupancy.is_occupied(next) {
                continue;
            }
            costs.insert(next, cost + 1);
            frontier.push_back(next);
        }
    }

    costs.remove(&origin);
    costs.into_iter().collect()
}

/// Shortest path from `start` to `end`, excluding `start`.
///
/// A* with the Manhattan heuristic. `end` may be occupied; every other cell
/// on the path must be free. Returns an empty path when `end` cannot be
/// reached within `max_dist` steps.
pub fn find_path(
    grid: &Grid,
    occupancy: &(impl Occupancy + ?Sized),
    start: Position,
    end: Position,
    max_dist: u32,
) -> Vec<Position> {
    if start == end || max_dist == 0 || !grid.is_passable(end) {
        return Vec::new();
    }

    let mut open = BinaryHeap::new();
    let mut best: HashMap<Position, u32> = HashMap::from([(start, 0)]);
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    open.push(Reverse((start.manhattan(end), 0u32, start)));

    while let Some(Reverse((_, cost, current))) = open.pop() {
        if current == end {
            return rebuild(&came_from, start, end);
        }
        if best.get(&current).is_some_and(|&known| known < cost) {
            continue;
        }
        let next_cost = cost + 1;
        if next_cost > max_dist {
            continue;
        }
        for next in grid.neighbors(current) {
            if grid.is_wall(next) || (next != end && occupancy.is_occupied(next)) {
                continue;
            }
            if best.get(&next).is_some_and(|&known| known <= next_cost) {
                continue;
            }
            let estimate = next_cost + next.manhattan(end);
            if estimate > max_dist {
                continue;
            }
            best.insert(next, next_cost);
            came_from.insert(next, current);
            open.push(Reverse((estimate, next_cost, next)));
        }
    }

    Vec::new()
}

fn rebuild(came_from: &HashMap<Position, Position>, start: Position, end: Position) -> Vec<Position> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(&prev) = came_from.get(&current) {
        if prev == start {
            break;
        }
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
