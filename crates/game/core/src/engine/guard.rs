//! Autonomous guard movement.
//!
//! One guard patrols each floor. At the end of every human turn the guard
//! on that floor walks `speed + alarm count` steps toward its target,
//! recomputing the BFS path after every single step because reaching an
//! intermediate waypoint (or clearing an alarm) can change the target.

use crate::env::{GameEnv, RngStream};
use crate::grid::{self, TILES_PER_FLOOR};
use crate::state::{GameState, GridPos, TileType};

use super::alarm::{AlarmKind, check_closest_alarm, trigger_alarm};
use super::damage_once;

/// Runs one full guard-movement sequence on `floor`.
///
/// `on_step` fires after each single step with the already-mutated state;
/// the runtime uses it to persist and pace intermediate positions. Hazard
/// resolution is strictly per step since later steps depend on earlier
/// tile and alarm mutations.
pub fn take_guard_turn(
    state: &mut GameState,
    env: &GameEnv<'_>,
    floor: usize,
    on_step: &mut dyn FnMut(&GameState),
) {
    if state.guard(floor).donut {
        state.guard_mut(floor).donut = false;
        return;
    }

    let mut rng = RngStream::new(env.rng(), state.rng_state);
    let mut steps = 0u32;

    loop {
        let budget = state.guard(floor).speed + state.floors[floor].alarms.len() as u32;
        if steps >= budget {
            break;
        }
        if state.guard(floor).pos == state.guard(floor).target {
            next_waypoint(state, &mut rng, floor);
        }

        let from = state.guard(floor).pos.index();
        let to = state.guard(floor).target.index();
        let path = grid::shortest_path(&state.floors[floor].tiles, from, to);
        if path.len() < 2 {
            break;
        }
        let next = path[1];
        state.guard_mut(floor).pos = GridPos::from_index(next);

        if state.floors[floor].clear_alarm(next) && !state.floors[floor].alarms.is_empty() {
            check_closest_alarm(state, floor);
        }

        if state.tile(floor, next).kind == TileType::Camera && state.tile(floor, next).revealed {
            camera_sweep(state);
        }

        step_hazards(state, floor, next);

        on_step(state);
        steps += 1;
    }

    state.rng_state = rng.counter();
}

/// Every monitor lights up: alarm checks fire at every player's tile.
fn camera_sweep(state: &mut GameState) {
    let positions: Vec<_> = state.player_positions.values().copied().collect();
    for pos in positions {
        trigger_alarm(state, AlarmKind::Camera, pos.floor, pos.tile_idx);
    }
}

/// Combat and line-of-sight checks after the guard lands on `next`.
fn step_hazards(state: &mut GameState, floor: usize, next: usize) {
    let players: Vec<(String, crate::state::PlayerPos)> = state
        .player_positions
        .iter()
        .map(|(name, pos)| (name.clone(), *pos))
        .collect();

    for (name, pos) in players {
        if pos.floor == floor && pos.tile_idx == next {
            if state.invisibility == name {
                continue;
            }
            if state.tile(floor, next).stealth_tokens > 0 {
                state.tile_mut(floor, next).stealth_tokens -= 1;
            } else {
                damage_once(state, &name);
            }
            continue;
        }

        if pos.floor.abs_diff(floor) == 1
            && pos.tile_idx == next
            && state.tile(pos.floor, pos.tile_idx).kind == TileType::Atrium
        {
            damage_once(state, &name);
            continue;
        }

        if pos.floor == floor
            && (state.tile(floor, pos.tile_idx).kind == TileType::Lobby
                || state.has_loot(&name, crate::cards::Loot::Tiara))
            && grid::is_adjacent(floor, pos.tile_idx, floor, next)
            && !grid::wall_between(&state.floors[floor], pos.tile_idx, next, false)
        {
            damage_once(state, &name);
        }
    }
}

/// Pops the next patrol waypoint, skipping any entry equal to the current
/// position. Naturally draining the queue refills it with a fresh
/// full-grid shuffle and makes the guard one step faster.
fn next_waypoint(state: &mut GameState, rng: &mut RngStream<'_>, floor: usize) {
    loop {
        if state.guard(floor).moves.is_empty() {
            state.guard_mut(floor).speed += 1;
            refill_waypoints(state, rng, floor);
        }
        let guard = state.guard_mut(floor);
        let waypoint = guard.moves.remove(0);
        if waypoint != guard.pos {
            guard.target = waypoint;
            return;
        }
    }
}

pub(crate) fn refill_waypoints(state: &mut GameState, rng: &mut RngStream<'_>, floor: usize) {
    let mut cells: Vec<GridPos> = (0..TILES_PER_FLOOR).map(GridPos::from_index).collect();
    rng.shuffle(&mut cells);
    state.guard_mut(floor).moves = cells;
}
