//! One-shot tool effects.
//!
//! Tools are consumed from inventory on a successful use; a rejected or
//! cancelled use leaves the item in place.

use crate::cards::Tool;
use crate::env::{ChoiceKind, ChoiceOption, ChoicePrompt, GameEnv};
use crate::grid::{self, Dir};
use crate::state::{GameState, PlayerPos, TileType};

use super::Rejected;
use super::alarm::{AlarmKind, check_closest_alarm, trigger_alarm};

pub(crate) fn use_tool(
    state: &mut GameState,
    env: &GameEnv<'_>,
    actor: &str,
    tool: Tool,
) -> Result<(), Rejected> {
    if !state.has_tool(actor, tool) {
        return Err(Rejected::ToolNotHeld(tool));
    }
    let pos = state.position_of(actor).ok_or(Rejected::NotPlaced)?;

    match tool {
        Tool::Blueprints => blueprints(state, env, pos)?,
        Tool::Crowbar => breach_wall(state, env, pos, None)?,
        Tool::CrystalBall => crystal_ball(state, env)?,
        Tool::Donuts => state.guard_mut(pos.floor).donut = true,
        Tool::Dynamite => breach_wall(state, env, pos, Some(AlarmKind::Dynamite))?,
        Tool::Emp => state.emp = actor.to_string(),
        Tool::InvisibleSuit => state.invisibility = actor.to_string(),
        Tool::MakeupKit => state.cameraloop = actor.to_string(),
        Tool::Rollerskates => state.current_ap = (state.current_ap + 2).min(4),
        Tool::SmokeBomb => smoke_bomb(state, pos)?,
        Tool::Stethoscope => stethoscope(state, pos)?,
        Tool::ThermalBomb => thermal_bomb(state, pos)?,
        Tool::Virus => {
            state.hack_fingerprint = (state.hack_fingerprint + 1).min(6);
            state.hack_motion = (state.hack_motion + 1).min(6);
            state.hack_laser = (state.hack_laser + 1).min(6);
        }
    }

    let inv = state.inventory.entry(actor.to_string()).or_default();
    if let Some(slot) = inv.tool.iter().position(|&t| t == tool) {
        inv.tool.remove(slot);
    }
    Ok(())
}

/// Study the plans: reveal any one unrevealed tile on the current floor.
fn blueprints(state: &mut GameState, env: &GameEnv<'_>, pos: PlayerPos) -> Result<(), Rejected> {
    let options: Vec<ChoiceOption> = (0..grid::TILES_PER_FLOOR)
        .filter(|&idx| !state.tile(pos.floor, idx).revealed)
        .map(|idx| ChoiceOption::Tile { floor: pos.floor, tile_idx: idx })
        .collect();
    if options.is_empty() {
        return Err(Rejected::NoLegalTarget);
    }
    let prompt = ChoicePrompt::new(ChoiceKind::TargetTile, options.clone());
    let picked = env.choices().choose(&prompt).ok_or(Rejected::ChoiceCancelled)?;
    let Some(ChoiceOption::Tile { tile_idx, .. }) = options.get(picked) else {
        return Err(Rejected::ChoiceCancelled);
    };
    state.tile_mut(pos.floor, *tile_idx).revealed = true;
    Ok(())
}

/// Tear out a wall in a chosen direction. Dynamite does the same job
/// with considerably less subtlety, tripping an alarm where it goes off.
fn breach_wall(
    state: &mut GameState,
    env: &GameEnv<'_>,
    pos: PlayerPos,
    blast: Option<AlarmKind>,
) -> Result<(), Rejected> {
    let options: Vec<(Dir, usize)> = Dir::ALL
        .iter()
        .filter_map(|&dir| grid::step(pos.tile_idx, dir).map(|idx| (dir, idx)))
        .filter(|&(_, idx)| grid::wall_between(&state.floors[pos.floor], pos.tile_idx, idx, true))
        .collect();
    if options.is_empty() {
        return Err(Rejected::NoLegalTarget);
    }
    let prompt = ChoicePrompt::new(
        ChoiceKind::TargetDirection,
        options.iter().map(|&(dir, _)| ChoiceOption::Direction(dir)).collect(),
    );
    let picked = env.choices().choose(&prompt).ok_or(Rejected::ChoiceCancelled)?;
    let &(dir, neighbor) = options.get(picked).ok_or(Rejected::ChoiceCancelled)?;

    let here = state.tile_mut(pos.floor, pos.tile_idx);
    match dir {
        Dir::Up => here.walls.top = false,
        Dir::Right => here.walls.right = false,
        Dir::Down => here.walls.bottom = false,
        Dir::Left => here.walls.left = false,
    }
    let there = state.tile_mut(pos.floor, neighbor);
    match dir {
        Dir::Up => there.walls.bottom = false,
        Dir::Right => there.walls.left = false,
        Dir::Down => there.walls.top = false,
        Dir::Left => there.walls.right = false,
    }

    if let Some(kind) = blast {
        trigger_alarm(state, kind, pos.floor, pos.tile_idx);
    }
    Ok(())
}

/// Reorder the top three event cards, one pick at a time.
fn crystal_ball(state: &mut GameState, env: &GameEnv<'_>) -> Result<(), Rejected> {
    let depth = state.events.len().min(3);
    if depth < 2 {
        return Err(Rejected::NoLegalTarget);
    }
    // Picks happen against a scratch pool; state.events is only touched
    // once the whole sequence went through, so a mid-way cancellation
    // leaves the deck exactly as it was.
    let mut pool: Vec<_> = state.events[..depth].to_vec();
    let mut reordered = Vec::with_capacity(depth);

    while pool.len() > 1 {
        let prompt = ChoicePrompt::new(
            ChoiceKind::EventOrder,
            pool.iter().map(|e| ChoiceOption::Card(e.to_string())).collect(),
        );
        match env.choices().choose(&prompt) {
            Some(picked) if picked < pool.len() => reordered.push(pool.remove(picked)),
            _ => return Err(Rejected::ChoiceCancelled),
        }
    }
    reordered.append(&mut pool);
    state.events.splice(..depth, reordered);
    Ok(())
}

/// Smother one burning alarm on the current floor.
fn smoke_bomb(state: &mut GameState, pos: PlayerPos) -> Result<(), Rejected> {
    if !state.floors[pos.floor].is_alarmed(pos.tile_idx) {
        return Err(Rejected::NoLegalTarget);
    }
    state.floors[pos.floor].clear_alarm(pos.tile_idx);
    check_closest_alarm(state, pos.floor);
    Ok(())
}

/// Listen to the dial: a free safe token.
fn stethoscope(state: &mut GameState, pos: PlayerPos) -> Result<(), Rejected> {
    if state.tile(pos.floor, pos.tile_idx).kind != TileType::Safe {
        return Err(Rejected::WrongTile { expected: "Safe" });
    }
    if state.floors[pos.floor].safe_opened {
        return Err(Rejected::SafeAlreadyOpen);
    }
    if !state.timelock.is_empty() {
        return Err(Rejected::TimeLocked);
    }
    if state.tile(pos.floor, pos.tile_idx).tokens >= 6 {
        return Err(Rejected::TokensMaxed);
    }
    state.tile_mut(pos.floor, pos.tile_idx).tokens += 1;
    Ok(())
}

/// Burn a passage through the floor underfoot.
fn thermal_bomb(state: &mut GameState, pos: PlayerPos) -> Result<(), Rejected> {
    if pos.floor == 0 {
        return Err(Rejected::NoLegalTarget);
    }
    state.tile_mut(pos.floor, pos.tile_idx).thermal_stairs_down = true;
    state.tile_mut(pos.floor - 1, pos.tile_idx).thermal_stairs_up = true;
    Ok(())
}
