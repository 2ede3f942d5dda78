//! The turn controller: game start and the end-of-turn pipeline.

use crate::cards::{self, Loot};
use crate::character::Archetype;
use crate::env::{GameEnv, RngStream};
use crate::state::{GameState, PlayerPos, TileType};

use super::alarm::{AlarmKind, check_closest_alarm, trigger_alarm};
use super::{Rejected, events, guard};

/// Promotes a generated board into a running game: the first two queued
/// waypoints become each guard's position and target, and the roster is
/// frozen into the turn order with full health.
pub fn start_game(state: &mut GameState, roster: &[String]) {
    for guard in &mut state.guard_positions {
        if guard.moves.len() >= 2 {
            guard.pos = guard.moves.remove(0);
            guard.target = guard.moves.remove(0);
        }
    }
    state.player_order = roster.to_vec();
    for player in roster {
        state.healths.insert(player.clone(), 3);
    }
    state.current_player_idx = 0;
    state.current_ap = 4;
}

/// Ends `actor`'s turn. Always legal on the actor's own turn.
pub fn end_turn(state: &mut GameState, env: &GameEnv<'_>, actor: &str) -> Result<(), Rejected> {
    end_turn_with(state, env, actor, &mut |_| {})
}

/// Like [`end_turn`], with an observer for individual guard steps so a
/// runtime can persist and pace them.
pub fn end_turn_with(
    state: &mut GameState,
    env: &GameEnv<'_>,
    actor: &str,
    on_guard_step: &mut dyn FnMut(&GameState),
) -> Result<(), Rejected> {
    let actions = state.actions_taken;

    state.actions_taken = 0;
    state.already_damaged.clear();
    state.triggered_motions.clear();
    state.skill_used = false;
    state.juicer_token = 0;
    for keypad in &mut state.keypads {
        keypad.tries = 0;
    }

    // A restless kitten yowls at whatever is already ringing.
    if state.has_loot(actor, Loot::PersianKitten) {
        let mut rng = RngStream::new(env.rng(), state.rng_state);
        let roll = rng.roll_d6();
        state.rng_state = rng.counter();
        if roll == 6
            && let Some(pos) = state.position_of(actor)
        {
            check_closest_alarm(state, pos.floor);
        }
    }

    if let Some(pos) = state.position_of(actor)
        && state.tile(pos.floor, pos.tile_idx).kind == TileType::Thermo
    {
        trigger_alarm(state, AlarmKind::Thermo, pos.floor, pos.tile_idx);
    }

    // Sitting still draws attention.
    let threshold = 2 + u32::from(state.has_loot(actor, Loot::Stamp));
    if actions <= threshold {
        let mut rng = RngStream::new(env.rng(), state.rng_state);
        let event = cards::draw_event(state, &mut rng);
        state.rng_state = rng.counter();
        events::apply_event(state, env, actor, event);
    }

    if state
        .character_of(actor)
        .is_some_and(|c| c.archetype() == Archetype::Acrobat)
        && let Some(pos) = state.position_of(actor)
        && state.is_guard_at(pos.floor, pos.tile_idx)
    {
        state.damage(actor);
    }

    if state.shift_change {
        state.shift_change = false;
    } else if let Some(pos) = state.position_of(actor) {
        guard::take_guard_turn(state, env, pos.floor, on_guard_step);
    }

    let len = state.player_order.len();
    if len == 0 {
        return Ok(());
    }
    let mut next = (state.current_player_idx + 1) % len;
    if state.jump_the_gun {
        next = (next + 1) % len;
        state.jump_the_gun = false;
    }
    state.current_player_idx = next;
    let incoming = state.player_order[next].clone();

    let mut ap: i8 = 4;
    if state.has_loot(&incoming, Loot::Mirror) {
        ap -= 1;
    }
    if state.headsup == incoming {
        ap += 1;
        state.headsup.clear();
    }
    if state.daydreaming == incoming {
        ap -= 1;
        state.daydreaming.clear();
    }
    state.current_ap = ap.clamp(0, 5) as u8;

    if state.has_loot(&incoming, Loot::Chihuahua) {
        let mut rng = RngStream::new(env.rng(), state.rng_state);
        let roll = rng.roll_d6();
        state.rng_state = rng.counter();
        if roll == 6
            && let Some(pos) = state.position_of(&incoming)
        {
            trigger_alarm(state, AlarmKind::Chihuahua, pos.floor, pos.tile_idx);
        }
    }

    // Owner-scoped statuses last exactly until their owner's next turn.
    for status in [
        &mut state.emp,
        &mut state.timelock,
        &mut state.cameraloop,
        &mut state.gymnastics,
        &mut state.invisibility,
    ] {
        if *status == incoming {
            status.clear();
        }
    }

    if state.position_of(&incoming).is_none()
        && let Some(start) = state.starting_position
    {
        state
            .player_positions
            .insert(incoming, PlayerPos { floor: 0, tile_idx: start });
    }
    Ok(())
}
