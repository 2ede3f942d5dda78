//! The action resolver: the authoritative reducer for [`GameState`].
//!
//! Every player-issued mutation flows through [`resolve`], which checks
//! the actor, validates the action against spatial/resource/turn-order
//! constraints, and either mutates the state in place or returns a
//! [`Rejected`] reason without touching it. The original cooperative
//! client silently swallowed illegal input; surfacing the reason keeps
//! the acceptance conditions identical while making them testable.

pub mod alarm;
mod events;
mod guard;
mod interact;
pub(crate) mod movement;
mod skill;
mod tools;
mod turn;

pub use alarm::{AlarmKind, check_closest_alarm, trigger_alarm};
pub use guard::take_guard_turn;
pub use movement::MoveDir;
pub use turn::{end_turn, end_turn_with, start_game};

use serde::{Deserialize, Serialize};

use crate::cards::Tool;
use crate::character::Character;
use crate::env::GameEnv;
use crate::state::GameState;

/// Which banked counter or dial an interact action feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenTarget {
    Fingerprint,
    Motion,
    Laser,
    Safe,
}

/// A single player-issued action request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// Pick a character variant; prerequisite for everything else.
    SelectCharacter { character: Character },
    /// First placement on the ground-floor outer ring. Free.
    Place { tile_idx: usize },
    /// Reveal a reachable unrevealed tile without moving. 1 AP.
    Peek { floor: usize, tile_idx: usize },
    /// Move to a revealed reachable tile.
    Move { floor: usize, tile_idx: usize },
    /// Directional nudge from the current position.
    Step { dir: MoveDir },
    /// Bank a hack token or add a safe dial token on the current tile.
    AddToken { target: TokenTarget },
    /// Roll the dice against the safe on the current tile.
    CrackSafe,
    /// Consume an inventory tool.
    UseTool { tool: Tool },
    /// Once-per-turn character skill.
    UseSkill,
    /// Hand the turn over; runs the whole turn-boundary pipeline.
    EndTurn,
}

/// Why an action was not applied. The state is untouched whenever one of
/// these comes back.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejected {
    #[error("it is not {actor}'s turn")]
    NotYourTurn { actor: String },

    #[error("{actor} is spectating and cannot act")]
    Spectator { actor: String },

    #[error("no character chosen yet")]
    NoCharacterChosen,

    #[error("character {0} is already taken")]
    CharacterTaken(Character),

    #[error("character already chosen")]
    CharacterAlreadyChosen,

    #[error("player is already placed on the board")]
    AlreadyPlaced,

    #[error("player has not been placed yet")]
    NotPlaced,

    #[error("first placement must be on the ground-floor outer ring")]
    NotOnEntryRing,

    #[error("tile is already revealed")]
    AlreadyRevealed,

    #[error("tile is not revealed")]
    NotRevealed,

    #[error("target tile is not reachable from here")]
    NotReachable,

    #[error("insufficient action points: need {needed}, have {available}")]
    InsufficientAp { needed: u8, available: u8 },

    #[error("action requires standing on a {expected} tile")]
    WrongTile { expected: &'static str },

    #[error("the safe is already open")]
    SafeAlreadyOpen,

    #[error("the safe has no dial tokens yet")]
    SafeNoTokens,

    #[error("counter is already at its maximum")]
    TokensMaxed,

    #[error("safe interactions are time-locked")]
    TimeLocked,

    #[error("tool {0} is not in the inventory")]
    ToolNotHeld(Tool),

    #[error("this character has no active skill")]
    NoSkill,

    #[error("skill already used this turn")]
    SkillAlreadyUsed,

    #[error("no legal target for this effect")]
    NoLegalTarget,

    #[error("player cancelled a required choice")]
    ChoiceCancelled,
}

/// Applies one action for `actor`, or reports why it cannot be applied.
///
/// Successful non-free actions bump the per-turn action counter used by
/// the event-draw gate at the turn boundary.
pub fn resolve(
    state: &mut GameState,
    env: &GameEnv<'_>,
    actor: &str,
    action: &Action,
) -> Result<(), Rejected> {
    resolve_with(state, env, actor, action, &mut |_| {})
}

/// Like [`resolve`], with an observer invoked after each individual guard
/// step of an end-of-turn guard move, so a runtime can persist and pace
/// them.
pub fn resolve_with(
    state: &mut GameState,
    env: &GameEnv<'_>,
    actor: &str,
    action: &Action,
    on_guard_step: &mut dyn FnMut(&GameState),
) -> Result<(), Rejected> {
    if let Action::SelectCharacter { character } = action {
        return interact::select_character(state, actor, *character);
    }

    if !state.player_order.iter().any(|p| p == actor) {
        return Err(Rejected::Spectator {
            actor: actor.to_string(),
        });
    }
    if state.current_player() != Some(actor) {
        return Err(Rejected::NotYourTurn {
            actor: actor.to_string(),
        });
    }
    if state.character_of(actor).is_none() {
        return Err(Rejected::NoCharacterChosen);
    }

    match action {
        Action::SelectCharacter { .. } => unreachable!("handled above"),
        Action::Place { tile_idx } => movement::place(state, actor, *tile_idx),
        Action::Peek { floor, tile_idx } => {
            movement::peek(state, actor, *floor, *tile_idx)?;
            state.actions_taken += 1;
            Ok(())
        }
        Action::Move { floor, tile_idx } => {
            movement::move_action(state, env, actor, *floor, *tile_idx)?;
            state.actions_taken += 1;
            Ok(())
        }
        Action::Step { dir } => {
            movement::step_action(state, env, actor, *dir)?;
            state.actions_taken += 1;
            Ok(())
        }
        Action::AddToken { target } => {
            interact::add_token(state, actor, *target)?;
            state.actions_taken += 1;
            Ok(())
        }
        Action::CrackSafe => {
            interact::crack_safe(state, env, actor, 1)?;
            state.actions_taken += 1;
            Ok(())
        }
        Action::UseTool { tool } => {
            tools::use_tool(state, env, actor, *tool)?;
            state.actions_taken += 1;
            Ok(())
        }
        Action::UseSkill => {
            skill::use_skill(state, env, actor)?;
            state.actions_taken += 1;
            Ok(())
        }
        Action::EndTurn => turn::end_turn_with(state, env, actor, on_guard_step),
    }
}

/// Deducts `cost` AP or rejects without a partial spend.
pub(crate) fn spend_ap(state: &mut GameState, cost: u8) -> Result<(), Rejected> {
    if state.current_ap < cost {
        return Err(Rejected::InsufficientAp {
            needed: cost,
            available: state.current_ap,
        });
    }
    state.current_ap -= cost;
    Ok(())
}

/// Damage that applies at most once per player per turn.
pub(crate) fn damage_once(state: &mut GameState, player: &str) {
    if state.already_damaged.iter().any(|p| p == player) {
        return;
    }
    state.damage(player);
    state.already_damaged.push(player.to_string());
}
