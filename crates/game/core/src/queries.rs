//! Pure legal-action and board predicates.
//!
//! Every client derives the same clickable/highlighted tile set from the
//! shared document through these; nothing here mutates state.

use crate::engine::MoveDir;
use crate::grid::{self, Dir, TILES_PER_FLOOR};
use crate::state::{GameState, TileType};

/// Whether `actor` may click `(floor, tile_idx)` right now: first
/// placement on the ground-floor ring, or a peek/move target.
pub fn can_interact(state: &GameState, actor: &str, floor: usize, tile_idx: usize) -> bool {
    match state.position_of(actor) {
        None => {
            if floor != 0 || tile_idx >= TILES_PER_FLOOR {
                return false;
            }
            let (x, y) = grid::coords(tile_idx);
            x == 0 || x == 3 || y == 0 || y == 3
        }
        Some(from) => crate::engine::movement::reachable(state, actor, from, floor, tile_idx),
    }
}

/// Whether a directional nudge from the actor's tile is legal.
pub fn can_move(state: &GameState, actor: &str, dir: MoveDir) -> bool {
    let Some(pos) = state.position_of(actor) else {
        return false;
    };
    let here = state.tile(pos.floor, pos.tile_idx);

    match dir {
        MoveDir::FloorUp => {
            pos.floor + 1 < state.floor_count()
                && (here.kind == TileType::Stairs || here.thermal_stairs_up)
        }
        MoveDir::FloorDown => {
            pos.floor > 0
                && (state.tile(pos.floor - 1, pos.tile_idx).kind == TileType::Stairs
                    || here.kind == TileType::Walkway
                    || here.thermal_stairs_down)
        }
        MoveDir::Up | MoveDir::Right | MoveDir::Down | MoveDir::Left => {
            let planar = match dir {
                MoveDir::Up => Dir::Up,
                MoveDir::Right => Dir::Right,
                MoveDir::Down => Dir::Down,
                MoveDir::Left => Dir::Left,
                _ => unreachable!(),
            };
            grid::step(pos.tile_idx, planar).is_some_and(|target| {
                crate::engine::movement::passes_wall(state, actor, pos.floor, pos.tile_idx, target)
            })
        }
    }
}

pub fn is_guard_on_tile(state: &GameState, floor: usize, tile_idx: usize) -> bool {
    state.is_guard_at(floor, tile_idx)
}

pub fn is_guard_target_tile(state: &GameState, floor: usize, tile_idx: usize) -> bool {
    state
        .guard_positions
        .get(floor)
        .is_some_and(|g| g.target.index() == tile_idx)
}

pub fn is_alarm_on_tile(state: &GameState, floor: usize, tile_idx: usize) -> bool {
    state.floors[floor].is_alarmed(tile_idx)
}

/// The guard's current BFS route, inclusive of both endpoints.
pub fn guard_path(state: &GameState, floor: usize) -> Vec<usize> {
    let guard = state.guard(floor);
    grid::shortest_path(
        &state.floors[floor].tiles,
        guard.pos.index(),
        guard.target.index(),
    )
}

/// Whether the guard can step onto `tile_idx` within this turn's budget.
pub fn is_guard_reachable_this_turn(state: &GameState, floor: usize, tile_idx: usize) -> bool {
    let path = guard_path(state, floor);
    if path.len() < 2 {
        return false;
    }
    let budget = state.guard(floor).speed as usize + state.floors[floor].alarms.len();
    let max_step = budget.min(path.len() - 1);
    path[1..=max_step].contains(&tile_idx)
}

/// Whether the guard's route crosses the edge leaving `tile_idx` in `dir`.
pub fn is_guard_path_dir(state: &GameState, floor: usize, tile_idx: usize, dir: Dir) -> bool {
    let Some(neighbor) = grid::step(tile_idx, dir) else {
        return false;
    };
    let path = guard_path(state, floor);
    path.windows(2).any(|pair| {
        (pair[0] == tile_idx && pair[1] == neighbor) || (pair[0] == neighbor && pair[1] == tile_idx)
    })
}
