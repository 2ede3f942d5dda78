//! Spatial queries over the fixed 4x4 floor grid.
//!
//! Tile indices are row-major (`index = y * 4 + x`). All functions here are
//! pure; they are shared by the action resolver, the guard AI, and the
//! legal-action predicates every client derives independently.

use serde::{Deserialize, Serialize};

use crate::cards::Loot;
use crate::state::{Floor, GameState, TileType};

pub const GRID: usize = 4;
pub const TILES_PER_FLOOR: usize = GRID * GRID;

/// Planar movement direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum Dir {
    Up,
    Right,
    Down,
    Left,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];
}

pub fn coords(tile_idx: usize) -> (usize, usize) {
    (tile_idx % GRID, tile_idx / GRID)
}

pub fn index(x: usize, y: usize) -> usize {
    y * GRID + x
}

/// Neighbor index one step in `dir`, or `None` at the perimeter.
pub fn step(tile_idx: usize, dir: Dir) -> Option<usize> {
    let (x, y) = coords(tile_idx);
    match dir {
        Dir::Up if y > 0 => Some(tile_idx - GRID),
        Dir::Down if y < GRID - 1 => Some(tile_idx + GRID),
        Dir::Left if x > 0 => Some(tile_idx - 1),
        Dir::Right if x < GRID - 1 => Some(tile_idx + 1),
        _ => None,
    }
}

/// Same floor and Manhattan distance exactly one.
pub fn is_adjacent(f1: usize, t1: usize, f2: usize, t2: usize) -> bool {
    if f1 != f2 {
        return false;
    }
    let (x1, y1) = coords(t1);
    let (x2, y2) = coords(t2);
    x1.abs_diff(x2) + y1.abs_diff(y2) == 1
}

/// True if a wall separates two adjacent tiles on `floor`.
///
/// A wall is real if either tile declares it on the shared edge. Entering
/// a revealed SecretDoor nullifies the wall, unless the mover carries the
/// Persian Kitten (which refuses to squeeze through).
pub fn wall_between(floor: &Floor, from: usize, to: usize, kitten: bool) -> bool {
    let (x1, y1) = coords(from);
    let (x2, y2) = coords(to);
    let t1 = &floor.tiles[from];
    let t2 = &floor.tiles[to];

    if t2.kind == TileType::SecretDoor && t2.revealed && !kitten {
        return false;
    }

    if x1 < x2 {
        t1.walls.right || t2.walls.left
    } else if x1 > x2 {
        t1.walls.left || t2.walls.right
    } else if y1 < y2 {
        t1.walls.bottom || t2.walls.top
    } else if y1 > y2 {
        t1.walls.top || t2.walls.bottom
    } else {
        false
    }
}

/// Wall check for whoever `player` is, honoring their loot.
pub fn wall_between_for(state: &GameState, player: &str, floor: usize, from: usize, to: usize) -> bool {
    let kitten = state.has_loot(player, Loot::PersianKitten);
    wall_between(&state.floors[floor], from, to, kitten)
}

/// Neighbor indices reachable in one step given the tile's own wall flags.
///
/// Walls are mirrored onto both tiles at generation time, so checking the
/// departing tile alone is sufficient for pathing. Traversal order is
/// up, down, left, right; BFS tie-breaking follows from it.
fn open_neighbors(tiles: &[crate::state::Tile], idx: usize) -> impl Iterator<Item = usize> {
    let (x, y) = coords(idx);
    let walls = tiles[idx].walls;
    [
        (y > 0 && !walls.top).then(|| idx - GRID),
        (y < GRID - 1 && !walls.bottom).then(|| idx + GRID),
        (x > 0 && !walls.left).then(|| idx - 1),
        (x < GRID - 1 && !walls.right).then(|| idx + 1),
    ]
    .into_iter()
    .flatten()
}

/// BFS shortest path from `start` to `target`, inclusive of both ends.
///
/// Returns the empty vector when `target` is unreachable. First-found
/// shortest path wins; there is no tie-break beyond traversal order.
pub fn shortest_path(tiles: &[crate::state::Tile], start: usize, target: usize) -> Vec<usize> {
    let mut visited = [false; TILES_PER_FLOOR];
    visited[start] = true;
    let mut queue = std::collections::VecDeque::from([vec![start]]);

    while let Some(path) = queue.pop_front() {
        let idx = *path.last().expect("paths are never empty");
        if idx == target {
            return path;
        }
        for next in open_neighbors(tiles, idx) {
            if !visited[next] {
                visited[next] = true;
                let mut longer = path.clone();
                longer.push(next);
                queue.push_back(longer);
            }
        }
    }
    Vec::new()
}

/// BFS distance from `start` to every tile; `None` where unreachable.
pub fn distances_from(tiles: &[crate::state::Tile], start: usize) -> [Option<u32>; TILES_PER_FLOOR] {
    let mut dist = [None; TILES_PER_FLOOR];
    dist[start] = Some(0);
    let mut queue = std::collections::VecDeque::from([start]);

    while let Some(idx) = queue.pop_front() {
        let here = dist[idx].expect("queued tiles have a distance");
        for next in open_neighbors(tiles, idx) {
            if dist[next].is_none() {
                dist[next] = Some(here + 1);
                queue.push_back(next);
            }
        }
    }
    dist
}

/// True when every tile is reachable from tile 0 under the current walls.
pub fn fully_connected(tiles: &[crate::state::Tile]) -> bool {
    distances_from(tiles, 0).iter().all(Option::is_some)
}
