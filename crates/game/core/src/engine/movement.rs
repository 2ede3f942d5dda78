//! Placement, peeking, and move resolution.
//!
//! `move_to_tile` is the richest transition in the engine: tile-specific
//! AP costs, the laser gamble, walkway fall-through, the keypad dice
//! gate, and the arrival hazard checks all live here.

use serde::{Deserialize, Serialize};

use crate::cards::{self, Loot};
use crate::character::Archetype;
use crate::env::{ChoiceKind, ChoiceOption, ChoicePrompt, GameEnv, RngStream};
use crate::grid::{self, Dir, TILES_PER_FLOOR};
use crate::state::{GameState, MotionMark, PlayerPos, TileType};

use super::alarm::{AlarmKind, trigger_alarm};
use super::{Rejected, damage_once, spend_ap};

/// Directional nudge, including floor transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoveDir {
    Up,
    Right,
    Down,
    Left,
    FloorUp,
    FloorDown,
}

impl MoveDir {
    fn planar(self) -> Option<Dir> {
        match self {
            MoveDir::Up => Some(Dir::Up),
            MoveDir::Right => Some(Dir::Right),
            MoveDir::Down => Some(Dir::Down),
            MoveDir::Left => Some(Dir::Left),
            _ => None,
        }
    }
}

/// Wall check honoring the mover's active gymnastics status and loot.
pub(crate) fn passes_wall(state: &GameState, player: &str, floor: usize, from: usize, to: usize) -> bool {
    state.gymnastics == player || !grid::wall_between_for(state, player, floor, from, to)
}

/// Whether `actor`, standing at `from`, can peek or move to the target.
///
/// Same-floor targets must be adjacent with no wall. Cross-floor targets
/// keep the same tile index and need a Stairs/Atrium/thermal-stair
/// passage; revealed ServiceDuct tiles pair up across the whole building.
pub(crate) fn reachable(
    state: &GameState,
    actor: &str,
    from: PlayerPos,
    floor: usize,
    tile_idx: usize,
) -> bool {
    if floor >= state.floor_count() || tile_idx >= TILES_PER_FLOOR {
        return false;
    }
    if from.floor == floor && from.tile_idx == tile_idx {
        return false;
    }
    let here = state.tile(from.floor, from.tile_idx);
    let there = state.tile(floor, tile_idx);

    if here.kind == TileType::ServiceDuct && there.kind == TileType::ServiceDuct && there.revealed {
        return true;
    }
    if from.floor == floor {
        return grid::is_adjacent(floor, from.tile_idx, floor, tile_idx)
            && passes_wall(state, actor, floor, from.tile_idx, tile_idx);
    }
    if tile_idx == from.tile_idx {
        if floor == from.floor + 1 {
            return here.kind == TileType::Stairs
                || here.thermal_stairs_up
                || (here.kind == TileType::Atrium && !there.revealed);
        }
        if floor + 1 == from.floor {
            return there.kind == TileType::Stairs
                || here.thermal_stairs_down
                || (here.kind == TileType::Atrium && !there.revealed);
        }
    }
    false
}

fn require_pos(state: &GameState, actor: &str) -> Result<PlayerPos, Rejected> {
    state.position_of(actor).ok_or(Rejected::NotPlaced)
}

/// First placement: ground-floor outer ring only, free of charge.
pub(crate) fn place(state: &mut GameState, actor: &str, tile_idx: usize) -> Result<(), Rejected> {
    if state.position_of(actor).is_some() {
        return Err(Rejected::AlreadyPlaced);
    }
    let (x, y) = grid::coords(tile_idx % TILES_PER_FLOOR);
    if tile_idx >= TILES_PER_FLOOR || !(x == 0 || x == 3 || y == 0 || y == 3) {
        return Err(Rejected::NotOnEntryRing);
    }

    state.tile_mut(0, tile_idx).revealed = true;
    state
        .player_positions
        .insert(actor.to_string(), PlayerPos { floor: 0, tile_idx });
    state.starting_position = Some(tile_idx);
    Ok(())
}

/// Reveal a reachable unrevealed tile without moving. 1 AP.
pub(crate) fn peek(state: &mut GameState, actor: &str, floor: usize, tile_idx: usize) -> Result<(), Rejected> {
    let from = require_pos(state, actor)?;
    if !reachable(state, actor, from, floor, tile_idx) {
        return Err(Rejected::NotReachable);
    }
    if state.tile(floor, tile_idx).revealed {
        return Err(Rejected::AlreadyRevealed);
    }
    spend_ap(state, 1)?;
    state.tile_mut(floor, tile_idx).revealed = true;
    Ok(())
}

/// Click-to-move: target must already be revealed and reachable.
pub(crate) fn move_action(
    state: &mut GameState,
    env: &GameEnv<'_>,
    actor: &str,
    floor: usize,
    tile_idx: usize,
) -> Result<(), Rejected> {
    let from = require_pos(state, actor)?;
    if !reachable(state, actor, from, floor, tile_idx) {
        return Err(Rejected::NotReachable);
    }
    if !state.tile(floor, tile_idx).revealed {
        return Err(Rejected::NotRevealed);
    }
    move_to_tile(state, env, actor, floor, tile_idx)
}

/// Arrow-key move: the target is computed from the current position, and
/// unlike a click it may land on an unrevealed tile.
pub(crate) fn step_action(
    state: &mut GameState,
    env: &GameEnv<'_>,
    actor: &str,
    dir: MoveDir,
) -> Result<(), Rejected> {
    let from = require_pos(state, actor)?;
    let here = state.tile(from.floor, from.tile_idx);

    match dir {
        MoveDir::FloorUp => {
            if from.floor + 1 >= state.floor_count()
                || !(here.kind == TileType::Stairs || here.thermal_stairs_up)
            {
                return Err(Rejected::NotReachable);
            }
            move_to_tile(state, env, actor, from.floor + 1, from.tile_idx)
        }
        MoveDir::FloorDown => {
            if from.floor == 0 {
                return Err(Rejected::NotReachable);
            }
            let below_is_stairs = state.tile(from.floor - 1, from.tile_idx).kind == TileType::Stairs;
            if !(below_is_stairs || here.kind == TileType::Walkway || here.thermal_stairs_down) {
                return Err(Rejected::NotReachable);
            }
            move_to_tile(state, env, actor, from.floor - 1, from.tile_idx)
        }
        _ => {
            let dir = dir.planar().expect("floor transitions handled above");
            let target = grid::step(from.tile_idx, dir).ok_or(Rejected::NotReachable)?;
            if !passes_wall(state, actor, from.floor, from.tile_idx, target) {
                return Err(Rejected::NotReachable);
            }
            move_to_tile(state, env, actor, from.floor, target)
        }
    }
}

/// The full move pipeline for a target `(floor, tile_idx)`.
///
/// Resolution order: AP cost (SafetyLock/Laser specials), motion-tile
/// tracking, walkway fall-through, keypad gate, then the arrival hazards.
/// Some branches legitimately spend AP without moving the player.
pub(crate) fn move_to_tile(
    state: &mut GameState,
    env: &GameEnv<'_>,
    actor: &str,
    mut floor: usize,
    tile_idx: usize,
) -> Result<(), Rejected> {
    let from = require_pos(state, actor)?;
    let gemstone = state.has_loot(actor, Loot::Gemstone);

    match state.tile(floor, tile_idx).kind {
        TileType::SafetyLock => {
            let occupied = !state.players_on_tile(floor, tile_idx).is_empty()
                || state.is_guard_at(floor, tile_idx);
            if occupied {
                spend_ap(state, if gemstone { 1 } else { 2 })?;
            } else if state.current_ap >= 3 {
                spend_ap(state, 3)?;
            } else if !state.tile(floor, tile_idx).revealed {
                // Not enough to enter, but one point buys the reveal.
                spend_ap(state, 1)?;
                state.tile_mut(floor, tile_idx).revealed = true;
                return Ok(());
            } else {
                return Err(Rejected::InsufficientAp {
                    needed: 3,
                    available: state.current_ap,
                });
            }
        }
        TileType::Laser => {
            let risky = if gemstone { 2 } else { 1 };
            if !state.tile(floor, tile_idx).revealed {
                spend_ap(state, 1)?;
                trigger_alarm(state, AlarmKind::Laser, floor, tile_idx);
            } else if state.current_ap >= 2 {
                let prompt = ChoicePrompt::new(
                    ChoiceKind::LaserApGamble,
                    vec![ChoiceOption::ApSpend(2), ChoiceOption::ApSpend(risky)],
                );
                match env.choices().choose(&prompt) {
                    Some(0) => spend_ap(state, 2)?,
                    Some(_) => {
                        spend_ap(state, risky)?;
                        trigger_alarm(state, AlarmKind::Laser, floor, tile_idx);
                    }
                    None => return Err(Rejected::ChoiceCancelled),
                }
            } else {
                spend_ap(state, risky)?;
                trigger_alarm(state, AlarmKind::Laser, floor, tile_idx);
            }
        }
        _ => spend_ap(state, 1)?,
    }

    if state.tile(floor, tile_idx).kind == TileType::Motion {
        state.triggered_motions.push(MotionMark { floor, tile_idx });
    }
    // Leaving a motion tile crossed earlier this turn trips its sensor.
    if state.tile(from.floor, from.tile_idx).kind == TileType::Motion
        && state
            .triggered_motions
            .iter()
            .any(|m| m.floor == from.floor && m.tile_idx == from.tile_idx)
    {
        trigger_alarm(state, AlarmKind::Motion, from.floor, from.tile_idx);
    }

    if state.tile(floor, tile_idx).kind == TileType::Walkway
        && !state.tile(floor, tile_idx).revealed
        && floor > 0
    {
        state.tile_mut(floor, tile_idx).revealed = true;
        floor -= 1;
    }

    if state.tile(floor, tile_idx).kind == TileType::Keypad && !state.keypad_opened(floor, tile_idx) {
        if state.has_loot(actor, Loot::Keycard) {
            if let Some(keypad) = state.keypad_mut(floor, tile_idx) {
                keypad.opened = true;
            }
        } else {
            let extra_die = state
                .character_of(actor)
                .is_some_and(|c| c.archetype() == Archetype::Peterman);
            let mut rng = RngStream::new(env.rng(), state.rng_state);
            let mut opened = false;
            if let Some(keypad) = state.keypad_mut(floor, tile_idx) {
                let dice = keypad.tries as usize + 1 + usize::from(extra_die);
                for _ in 0..dice {
                    if rng.roll_d6() == 6 {
                        opened = true;
                    }
                }
                keypad.tries += 1;
                keypad.opened = opened;
            }
            state.rng_state = rng.counter();
            if !opened {
                // Blocked at the door; the attempt still revealed it.
                state.tile_mut(floor, tile_idx).revealed = true;
                return Ok(());
            }
        }
    }

    state
        .player_positions
        .insert(actor.to_string(), PlayerPos { floor, tile_idx });
    state.tile_mut(floor, tile_idx).revealed = true;

    arrival_hazards(state, env, actor, floor, tile_idx);
    Ok(())
}

/// Side effects of standing on the destination: guard collision, line-of-
/// sight hazards, sensor triggers, laboratory loot, floor markers.
fn arrival_hazards(state: &mut GameState, env: &GameEnv<'_>, actor: &str, floor: usize, tile_idx: usize) {
    let acrobat = state
        .character_of(actor)
        .is_some_and(|c| c.archetype() == Archetype::Acrobat);

    // Collision is against the destination floor's guard: arriving by
    // stairs onto the guard's tile counts the same as a lateral move.
    if state.is_guard_at(floor, tile_idx) {
        if acrobat || state.invisibility == actor {
            // Shielded; nothing is consumed.
        } else if state.tile(floor, tile_idx).stealth_tokens > 0 {
            state.tile_mut(floor, tile_idx).stealth_tokens -= 1;
        } else {
            damage_once(state, actor);
        }
    }

    let kind = state.tile(floor, tile_idx).kind;

    if kind == TileType::Lobby || state.has_loot(actor, Loot::Tiara) {
        let guard_idx = state.guard(floor).pos.index();
        if grid::is_adjacent(floor, tile_idx, floor, guard_idx)
            && !grid::wall_between(&state.floors[floor], tile_idx, guard_idx, false)
        {
            damage_once(state, actor);
        }
    }

    if kind == TileType::Atrium {
        for adj in [floor.checked_sub(1), Some(floor + 1)].into_iter().flatten() {
            if adj < state.floor_count() && state.is_guard_at(adj, tile_idx) {
                damage_once(state, actor);
            }
        }
    }

    match kind {
        TileType::Fingerprint => trigger_alarm(state, AlarmKind::Fingerprint, floor, tile_idx),
        TileType::Camera => trigger_alarm(state, AlarmKind::Camera, floor, tile_idx),
        TileType::Thermo => trigger_alarm(state, AlarmKind::Thermo, floor, tile_idx),
        TileType::Scanner => {
            let carrying = state
                .inventory
                .get(actor)
                .is_some_and(|inv| !inv.loot.is_empty());
            if carrying {
                trigger_alarm(state, AlarmKind::Scanner, floor, tile_idx);
            }
        }
        TileType::Laboratory if state.tile(floor, tile_idx).not_looted => {
            state.tile_mut(floor, tile_idx).not_looted = false;
            let mut rng = RngStream::new(env.rng(), state.rng_state);
            let tool = cards::draw_tool(state, &mut rng);
            state.rng_state = rng.counter();
            state.add_tool(actor, tool);
        }
        _ => {}
    }

    if state.tile(floor, tile_idx).cat {
        state.tile_mut(floor, tile_idx).cat = false;
        state.add_loot(actor, Loot::PersianKitten);
    }
    if state.tile(floor, tile_idx).gold {
        state.tile_mut(floor, tile_idx).gold = false;
        state.add_loot(actor, Loot::GoldBar);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Character;
    use crate::env::{FirstOption, ScriptedChoices, SinRng};
    use crate::state::KeypadTile;
    use crate::test_support::{FixedRng, bare_state, place_player};

    fn env<'a>(rng: &'a dyn crate::env::RngOracle, choices: &'a dyn crate::env::ChoiceOracle) -> GameEnv<'a> {
        GameEnv::new(rng, choices)
    }

    #[test]
    fn first_placement_sets_position_and_spawn_point_for_free() {
        let mut state = bare_state();
        state.player_order = vec!["p".into()];
        state.player_character.insert("p".into(), Character::Rigger);
        state.tile_mut(0, 0).revealed = false;

        place(&mut state, "p", 0).unwrap();
        assert_eq!(state.position_of("p"), Some(PlayerPos { floor: 0, tile_idx: 0 }));
        assert!(state.tile(0, 0).revealed);
        assert_eq!(state.starting_position, Some(0));
        assert_eq!(state.current_ap, 4);
    }

    #[test]
    fn placement_rejects_interior_tiles() {
        let mut state = bare_state();
        state.player_order = vec!["p".into()];
        assert_eq!(place(&mut state, "p", 5), Err(Rejected::NotOnEntryRing));
        assert!(state.position_of("p").is_none());
    }

    #[test]
    fn peek_reveals_without_moving() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Rigger);
        state.tile_mut(0, 6).revealed = false;

        peek(&mut state, "p", 0, 6).unwrap();
        assert!(state.tile(0, 6).revealed);
        assert_eq!(state.position_of("p").unwrap().tile_idx, 5);
        assert_eq!(state.current_ap, 3);
    }

    #[test]
    fn walls_block_movement_but_not_gymnasts() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Rigger);
        state.tile_mut(0, 5).walls.right = true;
        let rng = SinRng;
        let choices = FirstOption;

        assert_eq!(
            move_action(&mut state, &env(&rng, &choices), "p", 0, 6),
            Err(Rejected::NotReachable)
        );

        state.gymnastics = "p".into();
        move_action(&mut state, &env(&rng, &choices), "p", 0, 6).unwrap();
        assert_eq!(state.position_of("p").unwrap().tile_idx, 6);
    }

    #[test]
    fn stairs_arrival_onto_the_guard_collides() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Rigger);
        state.tile_mut(0, 5).kind = TileType::Stairs;
        state.guard_mut(1).pos = crate::state::GridPos::from_index(5);
        let rng = FixedRng(0);
        let choices = FirstOption;

        move_to_tile(&mut state, &env(&rng, &choices), "p", 1, 5).unwrap();
        assert_eq!(state.position_of("p").unwrap().floor, 1);
        assert_eq!(state.healths["p"], 2);
    }

    #[test]
    fn keypad_failure_blocks_and_counts_the_try() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Rigger);
        state.tile_mut(0, 6).kind = TileType::Keypad;
        state.keypads.push(KeypadTile { floor: 0, tile_idx: 6, tries: 0, opened: false });
        let rng = FixedRng(0); // every die shows 1
        let choices = FirstOption;

        move_to_tile(&mut state, &env(&rng, &choices), "p", 0, 6).unwrap();
        assert_eq!(state.position_of("p").unwrap().tile_idx, 5);
        assert_eq!(state.keypads[0].tries, 1);
        assert!(!state.keypads[0].opened);
        assert!(state.tile(0, 6).revealed);
        assert_eq!(state.current_ap, 3);
    }

    #[test]
    fn keypad_six_opens_and_completes_the_move() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Rigger);
        state.tile_mut(0, 6).kind = TileType::Keypad;
        state.keypads.push(KeypadTile { floor: 0, tile_idx: 6, tries: 0, opened: false });
        let rng = FixedRng(5); // every die shows 6
        let choices = FirstOption;

        move_to_tile(&mut state, &env(&rng, &choices), "p", 0, 6).unwrap();
        assert_eq!(state.position_of("p").unwrap().tile_idx, 6);
        assert!(state.keypads[0].opened);
    }

    #[test]
    fn safety_lock_reveal_fallback_spends_one_point() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Rigger);
        state.tile_mut(0, 6).kind = TileType::SafetyLock;
        state.tile_mut(0, 6).revealed = false;
        state.current_ap = 2;
        let rng = SinRng;
        let choices = FirstOption;

        move_to_tile(&mut state, &env(&rng, &choices), "p", 0, 6).unwrap();
        assert!(state.tile(0, 6).revealed);
        assert_eq!(state.position_of("p").unwrap().tile_idx, 5);
        assert_eq!(state.current_ap, 1);
    }

    #[test]
    fn occupied_safety_lock_is_cheaper() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Rigger);
        place_player(&mut state, "q", 0, 6, Character::Hawk);
        state.tile_mut(0, 6).kind = TileType::SafetyLock;
        let rng = SinRng;
        let choices = FirstOption;

        move_to_tile(&mut state, &env(&rng, &choices), "p", 0, 6).unwrap();
        assert_eq!(state.position_of("p").unwrap().tile_idx, 6);
        assert_eq!(state.current_ap, 2);
    }

    #[test]
    fn laser_gamble_risky_choice_trips_the_alarm() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Rigger);
        state.tile_mut(0, 6).kind = TileType::Laser;
        let rng = SinRng;
        let choices = ScriptedChoices::new([Some(1)]);

        move_to_tile(&mut state, &env(&rng, &choices), "p", 0, 6).unwrap();
        assert_eq!(state.current_ap, 3);
        assert!(state.floors[0].alarms.contains(&6));
    }

    #[test]
    fn unrevealed_walkway_drops_the_mover_a_floor() {
        let mut state = bare_state();
        place_player(&mut state, "p", 1, 5, Character::Rigger);
        state.tile_mut(1, 6).kind = TileType::Walkway;
        state.tile_mut(1, 6).revealed = false;
        let rng = SinRng;
        let choices = FirstOption;

        move_to_tile(&mut state, &env(&rng, &choices), "p", 1, 6).unwrap();
        assert_eq!(state.position_of("p"), Some(PlayerPos { floor: 0, tile_idx: 6 }));
        assert!(state.tile(1, 6).revealed);
    }

    #[test]
    fn leaving_a_crossed_motion_tile_trips_it() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Rigger);
        state.tile_mut(0, 6).kind = TileType::Motion;
        let rng = SinRng;
        let choices = FirstOption;

        move_to_tile(&mut state, &env(&rng, &choices), "p", 0, 6).unwrap();
        assert!(state.floors[0].alarms.is_empty());

        move_to_tile(&mut state, &env(&rng, &choices), "p", 0, 7).unwrap();
        assert!(state.floors[0].alarms.contains(&6));
    }

    #[test]
    fn stealth_token_absorbs_the_guard_collision() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Rigger);
        state.guard_mut(0).pos = crate::state::GridPos::from_index(6);
        state.tile_mut(0, 6).stealth_tokens = 1;
        let rng = SinRng;
        let choices = FirstOption;

        move_to_tile(&mut state, &env(&rng, &choices), "p", 0, 6).unwrap();
        assert_eq!(state.tile(0, 6).stealth_tokens, 0);
        assert_eq!(state.healths["p"], 3);
        assert!(state.already_damaged.is_empty());
    }

    #[test]
    fn guard_collision_damages_once_per_turn() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Rigger);
        state.guard_mut(0).pos = crate::state::GridPos::from_index(6);
        let rng = SinRng;
        let choices = FirstOption;

        move_to_tile(&mut state, &env(&rng, &choices), "p", 0, 6).unwrap();
        assert_eq!(state.healths["p"], 2);

        // Step off and back on: the per-turn dedup holds.
        move_to_tile(&mut state, &env(&rng, &choices), "p", 0, 5).unwrap();
        move_to_tile(&mut state, &env(&rng, &choices), "p", 0, 6).unwrap();
        assert_eq!(state.healths["p"], 2);
    }

    #[test]
    fn laboratory_first_visit_draws_a_tool() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Rigger);
        state.tile_mut(0, 6).kind = TileType::Laboratory;
        let rng = SinRng;
        let choices = FirstOption;

        move_to_tile(&mut state, &env(&rng, &choices), "p", 0, 6).unwrap();
        assert_eq!(state.inventory_of("p").tool.len(), 1);
        assert!(!state.tile(0, 6).not_looted);

        move_to_tile(&mut state, &env(&rng, &choices), "p", 0, 5).unwrap();
        move_to_tile(&mut state, &env(&rng, &choices), "p", 0, 6).unwrap();
        assert_eq!(state.inventory_of("p").tool.len(), 1);
    }
}
