//! Once-per-turn character skills.
//!
//! Hard character variants and the two passive-only archetypes (Acrobat,
//! Peterman) never reach this module; their rules live in the movement
//! and interact paths.

use crate::character::Archetype;
use crate::env::{ChoiceKind, ChoiceOption, ChoicePrompt, GameEnv};
use crate::grid::{self, Dir};
use crate::state::{GameState, PlayerPos};

use super::alarm::{AlarmKind, trigger_alarm};
use super::{Rejected, spend_ap};

pub(crate) fn use_skill(state: &mut GameState, env: &GameEnv<'_>, actor: &str) -> Result<(), Rejected> {
    let character = state.character_of(actor).ok_or(Rejected::NoCharacterChosen)?;
    if !character.has_skill() {
        return Err(Rejected::NoSkill);
    }
    if state.skill_used {
        return Err(Rejected::SkillAlreadyUsed);
    }
    let pos = state.position_of(actor).ok_or(Rejected::NotPlaced)?;

    match character.archetype() {
        Archetype::Hacker => hacker(state, pos)?,
        Archetype::Hawk => hawk(state, env, pos)?,
        Archetype::Juicer => juicer(state, env, pos)?,
        Archetype::Raven => raven(state, pos)?,
        Archetype::Rigger => rigger(state, pos)?,
        Archetype::Rook => rook(state, env, actor, pos)?,
        Archetype::Spotter => spotter(state, env)?,
        Archetype::Acrobat | Archetype::Peterman => return Err(Rejected::NoSkill),
    }
    state.skill_used = true;
    Ok(())
}

/// Bank the one-shot universal hack token from any computer terminal.
fn hacker(state: &mut GameState, pos: PlayerPos) -> Result<(), Rejected> {
    if !state.tile(pos.floor, pos.tile_idx).kind.is_computer() {
        return Err(Rejected::WrongTile { expected: "computer terminal" });
    }
    if state.hack_hacker > 0 {
        return Err(Rejected::TokensMaxed);
    }
    spend_ap(state, 1)?;
    state.hack_hacker = 1;
    Ok(())
}

/// Peek one unrevealed diagonal neighbor.
fn hawk(state: &mut GameState, env: &GameEnv<'_>, pos: PlayerPos) -> Result<(), Rejected> {
    let (x, y) = grid::coords(pos.tile_idx);
    let mut options = Vec::new();
    for (dx, dy) in [(-1i32, -1i32), (1, -1), (-1, 1), (1, 1)] {
        let (nx, ny) = (x as i32 + dx, y as i32 + dy);
        if (0..4).contains(&nx) && (0..4).contains(&ny) {
            let idx = grid::index(nx as usize, ny as usize);
            if !state.tile(pos.floor, idx).revealed {
                options.push(ChoiceOption::Tile { floor: pos.floor, tile_idx: idx });
            }
        }
    }
    if options.is_empty() {
        return Err(Rejected::NoLegalTarget);
    }
    let prompt = ChoicePrompt::new(ChoiceKind::TargetTile, options.clone());
    let picked = env.choices().choose(&prompt).ok_or(Rejected::ChoiceCancelled)?;
    let Some(ChoiceOption::Tile { tile_idx, .. }) = options.get(picked) else {
        return Err(Rejected::ChoiceCancelled);
    };
    let tile_idx = *tile_idx;

    spend_ap(state, 1)?;
    state.tile_mut(pos.floor, tile_idx).revealed = true;
    Ok(())
}

/// Fake a sensor trip on an adjacent tile to drag the guard over.
fn juicer(state: &mut GameState, env: &GameEnv<'_>, pos: PlayerPos) -> Result<(), Rejected> {
    if state.juicer_token > 0 {
        return Err(Rejected::TokensMaxed);
    }
    let options: Vec<ChoiceOption> = Dir::ALL
        .iter()
        .filter_map(|&dir| grid::step(pos.tile_idx, dir))
        .map(|idx| ChoiceOption::Tile { floor: pos.floor, tile_idx: idx })
        .collect();
    let prompt = ChoicePrompt::new(ChoiceKind::TargetTile, options.clone());
    let picked = env.choices().choose(&prompt).ok_or(Rejected::ChoiceCancelled)?;
    let Some(ChoiceOption::Tile { tile_idx, .. }) = options.get(picked) else {
        return Err(Rejected::ChoiceCancelled);
    };
    let tile_idx = *tile_idx;

    spend_ap(state, 1)?;
    state.juicer_token = 1;
    trigger_alarm(state, AlarmKind::Juicer, pos.floor, tile_idx);
    Ok(())
}

/// Swap the guard's current target with its next queued waypoint.
fn raven(state: &mut GameState, pos: PlayerPos) -> Result<(), Rejected> {
    if state.guard(pos.floor).moves.is_empty() {
        return Err(Rejected::NoLegalTarget);
    }
    spend_ap(state, 1)?;
    let guard = state.guard_mut(pos.floor);
    std::mem::swap(&mut guard.target, &mut guard.moves[0]);
    Ok(())
}

/// Drop a stealth token on the current tile.
fn rigger(state: &mut GameState, pos: PlayerPos) -> Result<(), Rejected> {
    spend_ap(state, 1)?;
    state.tile_mut(pos.floor, pos.tile_idx).stealth_tokens += 1;
    Ok(())
}

/// Pull a neighboring player onto the Rook's tile.
fn rook(state: &mut GameState, env: &GameEnv<'_>, actor: &str, pos: PlayerPos) -> Result<(), Rejected> {
    let options: Vec<ChoiceOption> = state
        .player_positions
        .iter()
        .filter(|(name, p)| {
            name.as_str() != actor
                && p.floor == pos.floor
                && grid::is_adjacent(pos.floor, pos.tile_idx, p.floor, p.tile_idx)
                && !grid::wall_between(&state.floors[pos.floor], p.tile_idx, pos.tile_idx, false)
        })
        .map(|(name, _)| ChoiceOption::Player(name.clone()))
        .collect();
    if options.is_empty() {
        return Err(Rejected::NoLegalTarget);
    }
    let prompt = ChoicePrompt::new(ChoiceKind::TargetPlayer, options.clone());
    let picked = env.choices().choose(&prompt).ok_or(Rejected::ChoiceCancelled)?;
    let Some(ChoiceOption::Player(name)) = options.get(picked) else {
        return Err(Rejected::ChoiceCancelled);
    };
    let name = name.clone();

    spend_ap(state, 1)?;
    state.player_positions.insert(name, pos);
    Ok(())
}

/// Look at the next two event cards and optionally swap them.
fn spotter(state: &mut GameState, env: &GameEnv<'_>) -> Result<(), Rejected> {
    if state.events.len() < 2 {
        return Err(Rejected::NoLegalTarget);
    }
    let prompt = ChoicePrompt::new(
        ChoiceKind::EventOrder,
        vec![
            ChoiceOption::Card(state.events[0].to_string()),
            ChoiceOption::Card(state.events[1].to_string()),
        ],
    );
    let picked = env.choices().choose(&prompt).ok_or(Rejected::ChoiceCancelled)?;
    spend_ap(state, 1)?;
    if picked == 1 {
        state.events.swap(0, 1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Event;
    use crate::character::Character;
    use crate::env::{FirstOption, ScriptedChoices, SinRng};
    use crate::state::{GridPos, TileType};
    use crate::test_support::{bare_state, place_player};

    fn env<'a>(choices: &'a dyn crate::env::ChoiceOracle) -> GameEnv<'a> {
        GameEnv::new(&SinRng, choices)
    }

    #[test]
    fn hard_variants_have_no_skill() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::HawkHard);
        assert_eq!(use_skill(&mut state, &env(&FirstOption), "p"), Err(Rejected::NoSkill));
    }

    #[test]
    fn skill_is_once_per_turn() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Rigger);

        use_skill(&mut state, &env(&FirstOption), "p").unwrap();
        assert_eq!(state.tile(0, 5).stealth_tokens, 1);
        assert_eq!(
            use_skill(&mut state, &env(&FirstOption), "p"),
            Err(Rejected::SkillAlreadyUsed)
        );
    }

    #[test]
    fn hawk_reveals_a_chosen_diagonal() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Hawk);
        for idx in [0, 2, 8, 10] {
            state.tile_mut(0, idx).revealed = false;
        }
        let choices = ScriptedChoices::new([Some(1)]);

        use_skill(&mut state, &env(&choices), "p").unwrap();
        assert!(state.tile(0, 2).revealed);
        assert!(!state.tile(0, 0).revealed);
        assert_eq!(state.current_ap, 3);
    }

    #[test]
    fn raven_swaps_target_and_next_waypoint() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Raven);
        state.guard_mut(0).target = GridPos::from_index(3);
        state.guard_mut(0).moves = vec![GridPos::from_index(12)];

        use_skill(&mut state, &env(&FirstOption), "p").unwrap();
        assert_eq!(state.guard(0).target, GridPos::from_index(12));
        assert_eq!(state.guard(0).moves[0], GridPos::from_index(3));
    }

    #[test]
    fn rook_pulls_an_adjacent_player_over() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Rook);
        place_player(&mut state, "q", 0, 6, Character::Hawk);

        use_skill(&mut state, &env(&FirstOption), "p").unwrap();
        assert_eq!(state.position_of("q").unwrap().tile_idx, 5);
    }

    #[test]
    fn spotter_can_reorder_the_event_top() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Spotter);
        state.events = vec![Event::Reboot, Event::Blackout, Event::Crash];
        let choices = ScriptedChoices::new([Some(1)]);

        use_skill(&mut state, &env(&choices), "p").unwrap();
        assert_eq!(state.events[..2], [Event::Blackout, Event::Reboot]);
    }

    #[test]
    fn hacker_banks_the_universal_token_on_a_terminal() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Hacker);
        assert!(use_skill(&mut state, &env(&FirstOption), "p").is_err());

        state.tile_mut(0, 5).kind = TileType::ComputerMotion;
        use_skill(&mut state, &env(&FirstOption), "p").unwrap();
        assert_eq!(state.hack_hacker, 1);
    }
}
