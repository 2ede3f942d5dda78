//! One-shot event card effects, applied at the turn boundary.
//!
//! Events can never be rejected: a cancelled secondary choice simply
//! wastes the card. `actor` is the player who ended the quiet turn.

use crate::cards::Event;
use crate::env::{ChoiceKind, ChoiceOption, ChoicePrompt, GameEnv, RngStream};
use crate::grid::TILES_PER_FLOOR;
use crate::state::{GameState, PlayerPos};

use super::alarm::{AlarmKind, trigger_alarm};
use super::guard;

pub(crate) fn apply_event(state: &mut GameState, env: &GameEnv<'_>, actor: &str, event: Event) {
    match event {
        Event::Reboot => {
            state.hack_fingerprint = 1;
            state.hack_motion = 1;
            state.hack_laser = 1;
        }
        Event::DeadDrop => dead_drop(state, actor),
        Event::FreightElevator => shift_floor(state, actor, 1),
        Event::LostGrip => shift_floor(state, actor, -1),
        Event::ThrowVoice => throw_voice(state, env, actor),
        Event::Peekhole => peekhole(state, env, actor),
        Event::GoWithYourGut => go_with_your_gut(state, env, actor),
        Event::BuddySystem => buddy_system(state, env, actor),
        Event::ShiftChange => shift_change(state, env),
        Event::JumpTheGun => state.jump_the_gun = true,
        Event::HeadsUp => state.headsup = actor.to_string(),
        Event::VideoLoop => state.cameraloop = actor.to_string(),
        Event::TimeLock => state.timelock = actor.to_string(),
        Event::Gymnastics => state.gymnastics = actor.to_string(),
        Event::Shoplifting => at_actor_tile(state, actor, AlarmKind::Shoplifting),
        Event::ChangeOfPlans => change_of_plans(state, env, actor),
        Event::Espresso => state.current_ap = (state.current_ap + 1).min(4),
        Event::SilentAlarm => silent_alarm(state, env, actor),
        Event::Blackout => state.emp = actor.to_string(),
        Event::Fingerprints => at_actor_tile(state, actor, AlarmKind::Fingerprint),
        Event::Crash => at_actor_tile(state, actor, AlarmKind::Decoy),
        Event::SmokeDetector => at_actor_tile(state, actor, AlarmKind::Thermo),
        Event::Daydreaming => state.daydreaming = actor.to_string(),
        Event::NeatFreak => neat_freak(state, actor),
        Event::LooseLips => loose_lips(state, actor),
        Event::SecondWind => state.heal(actor),
    }
}

fn at_actor_tile(state: &mut GameState, actor: &str, kind: AlarmKind) {
    if let Some(pos) = state.position_of(actor) {
        trigger_alarm(state, kind, pos.floor, pos.tile_idx);
    }
}

/// Hand everything over to the previous player in turn order.
fn dead_drop(state: &mut GameState, actor: &str) {
    let len = state.player_order.len();
    if len < 2 {
        return;
    }
    let slot = state.player_order.iter().position(|p| p == actor);
    let Some(slot) = slot else { return };
    let receiver = state.player_order[(slot + len - 1) % len].clone();

    let dropped = state.inventory.remove(actor).unwrap_or_default();
    let inv = state.inventory.entry(receiver).or_default();
    inv.loot.extend(dropped.loot);
    inv.tool.extend(dropped.tool);
}

/// Forced relocation one floor up or down; the landing tile is revealed
/// but no movement hazards apply.
fn shift_floor(state: &mut GameState, actor: &str, delta: i32) {
    let Some(pos) = state.position_of(actor) else { return };
    let target = pos.floor as i32 + delta;
    if target < 0 || target as usize >= state.floor_count() {
        return;
    }
    let floor = target as usize;
    state.tile_mut(floor, pos.tile_idx).revealed = true;
    state
        .player_positions
        .insert(actor.to_string(), PlayerPos { floor, tile_idx: pos.tile_idx });
}

/// Fake a noise anywhere on the actor's floor.
fn throw_voice(state: &mut GameState, env: &GameEnv<'_>, actor: &str) {
    let Some(pos) = state.position_of(actor) else { return };
    let guard_idx = state.guard(pos.floor).pos.index();
    let options: Vec<ChoiceOption> = (0..TILES_PER_FLOOR)
        .filter(|&idx| idx != guard_idx && !state.floors[pos.floor].is_alarmed(idx))
        .map(|idx| ChoiceOption::Tile { floor: pos.floor, tile_idx: idx })
        .collect();
    let prompt = ChoicePrompt::new(ChoiceKind::TargetTile, options.clone());
    if let Some(picked) = env.choices().choose(&prompt)
        && let Some(ChoiceOption::Tile { tile_idx, .. }) = options.get(picked)
    {
        trigger_alarm(state, AlarmKind::Decoy, pos.floor, *tile_idx);
    }
}

/// Free reveal of one unrevealed tile on the actor's floor.
fn peekhole(state: &mut GameState, env: &GameEnv<'_>, actor: &str) {
    let Some(pos) = state.position_of(actor) else { return };
    let options: Vec<ChoiceOption> = (0..TILES_PER_FLOOR)
        .filter(|&idx| !state.tile(pos.floor, idx).revealed)
        .map(|idx| ChoiceOption::Tile { floor: pos.floor, tile_idx: idx })
        .collect();
    if options.is_empty() {
        return;
    }
    let prompt = ChoicePrompt::new(ChoiceKind::TargetTile, options.clone());
    if let Some(picked) = env.choices().choose(&prompt)
        && let Some(ChoiceOption::Tile { tile_idx, .. }) = options.get(picked)
    {
        state.tile_mut(pos.floor, *tile_idx).revealed = true;
    }
}

/// Draw the next two events and pick which one lands; the other goes
/// back on top.
fn go_with_your_gut(state: &mut GameState, env: &GameEnv<'_>, actor: &str) {
    let mut rng = RngStream::new(env.rng(), state.rng_state);
    let first = crate::cards::draw_event(state, &mut rng);
    let second = crate::cards::draw_event(state, &mut rng);
    state.rng_state = rng.counter();

    let prompt = ChoicePrompt::new(
        ChoiceKind::EventOrder,
        vec![
            ChoiceOption::Card(first.to_string()),
            ChoiceOption::Card(second.to_string()),
        ],
    );
    match env.choices().choose(&prompt) {
        Some(1) => {
            state.events.insert(0, first);
            apply_event(state, env, actor, second);
        }
        Some(_) => {
            state.events.insert(0, second);
            apply_event(state, env, actor, first);
        }
        None => {
            state.events.insert(0, second);
            state.events.insert(0, first);
        }
    }
}

/// Pull a chosen teammate onto the actor's tile.
fn buddy_system(state: &mut GameState, env: &GameEnv<'_>, actor: &str) {
    let Some(pos) = state.position_of(actor) else { return };
    let options: Vec<ChoiceOption> = state
        .player_positions
        .keys()
        .filter(|name| name.as_str() != actor)
        .map(|name| ChoiceOption::Player(name.clone()))
        .collect();
    if options.is_empty() {
        return;
    }
    let prompt = ChoicePrompt::new(ChoiceKind::TargetPlayer, options.clone());
    if let Some(picked) = env.choices().choose(&prompt)
        && let Some(ChoiceOption::Player(name)) = options.get(picked)
    {
        state.player_positions.insert(name.clone(), pos);
    }
}

/// Every guard takes its patrol immediately; the end-of-turn guard move
/// is skipped afterwards.
fn shift_change(state: &mut GameState, env: &GameEnv<'_>) {
    for floor in 0..state.floor_count() {
        guard::take_guard_turn(state, env, floor, &mut |_| {});
    }
    state.shift_change = true;
}

/// The guard on the actor's floor tears up its route and starts over.
fn change_of_plans(state: &mut GameState, env: &GameEnv<'_>, actor: &str) {
    let Some(pos) = state.position_of(actor) else { return };
    let mut rng = RngStream::new(env.rng(), state.rng_state);
    guard::refill_waypoints(state, &mut rng, pos.floor);
    state.rng_state = rng.counter();

    let guard = state.guard_mut(pos.floor);
    let next = guard.moves.remove(0);
    guard.target = next;
}

/// An alarm rings somewhere random on the actor's floor.
fn silent_alarm(state: &mut GameState, env: &GameEnv<'_>, actor: &str) {
    let Some(pos) = state.position_of(actor) else { return };
    let mut rng = RngStream::new(env.rng(), state.rng_state);
    let tile_idx = rng.pick(TILES_PER_FLOOR);
    state.rng_state = rng.counter();
    trigger_alarm(state, AlarmKind::Decoy, pos.floor, tile_idx);
}

/// The night crew sweeps up every stealth token on the actor's floor.
fn neat_freak(state: &mut GameState, actor: &str) {
    let Some(pos) = state.position_of(actor) else { return };
    for idx in 0..TILES_PER_FLOOR {
        state.tile_mut(pos.floor, idx).stealth_tokens = 0;
    }
}

/// Somebody talked: the guard heads straight for the actor.
fn loose_lips(state: &mut GameState, actor: &str) {
    let Some(pos) = state.position_of(actor) else { return };
    state.guard_mut(pos.floor).target = crate::state::GridPos::from_index(pos.tile_idx);
}
