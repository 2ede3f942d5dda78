//! Standing-on-a-tile interactions: hack-token banking, the safe dial,
//! and the crack roll.

use crate::cards::{self, Loot};
use crate::character::{Archetype, Character};
use crate::env::{GameEnv, RngStream};
use crate::grid::{self, GRID};
use crate::state::{GameState, TileType};

use super::{Rejected, TokenTarget, spend_ap};

pub(crate) fn select_character(
    state: &mut GameState,
    actor: &str,
    character: Character,
) -> Result<(), Rejected> {
    if !state.player_order.is_empty() && !state.player_order.iter().any(|p| p == actor) {
        return Err(Rejected::Spectator {
            actor: actor.to_string(),
        });
    }
    if state.character_of(actor).is_some() {
        return Err(Rejected::CharacterAlreadyChosen);
    }
    if state.player_character.values().any(|&c| c == character) {
        return Err(Rejected::CharacterTaken(character));
    }
    state.player_character.insert(actor.to_string(), character);
    Ok(())
}

/// Banks a hack token on a computer terminal (1 AP) or adds a dial token
/// to the safe under the actor's feet (2 AP).
pub(crate) fn add_token(state: &mut GameState, actor: &str, target: TokenTarget) -> Result<(), Rejected> {
    let pos = state.position_of(actor).ok_or(Rejected::NotPlaced)?;
    let kind = state.tile(pos.floor, pos.tile_idx).kind;

    let (required, counter) = match target {
        TokenTarget::Fingerprint => (TileType::ComputerFingerprint, &mut state.hack_fingerprint),
        TokenTarget::Motion => (TileType::ComputerMotion, &mut state.hack_motion),
        TokenTarget::Laser => (TileType::ComputerLaser, &mut state.hack_laser),
        TokenTarget::Safe => {
            if kind != TileType::Safe {
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
            spend_ap(state, 2)?;
            state.tile_mut(pos.floor, pos.tile_idx).tokens += 1;
            return Ok(());
        }
    };

    if kind != required {
        return Err(Rejected::WrongTile { expected: "computer terminal" });
    }
    if *counter >= 6 {
        return Err(Rejected::TokensMaxed);
    }
    spend_ap(state, 1)?;
    match target {
        TokenTarget::Fingerprint => state.hack_fingerprint += 1,
        TokenTarget::Motion => state.hack_motion += 1,
        TokenTarget::Laser => state.hack_laser += 1,
        TokenTarget::Safe => unreachable!(),
    }
    Ok(())
}

/// Rolls the safe dial: one die per banked token, cracking every revealed
/// row/column tile whose number comes up. Opening the safe awards a loot
/// draw to the cracker.
pub(crate) fn crack_safe(
    state: &mut GameState,
    env: &GameEnv<'_>,
    actor: &str,
    cost: u8,
) -> Result<(), Rejected> {
    let pos = state.position_of(actor).ok_or(Rejected::NotPlaced)?;
    if state.tile(pos.floor, pos.tile_idx).kind != TileType::Safe {
        return Err(Rejected::WrongTile { expected: "Safe" });
    }
    if state.floors[pos.floor].safe_opened {
        return Err(Rejected::SafeAlreadyOpen);
    }
    if !state.timelock.is_empty() {
        return Err(Rejected::TimeLocked);
    }
    if state.tile(pos.floor, pos.tile_idx).tokens == 0 {
        return Err(Rejected::SafeNoTokens);
    }
    spend_ap(state, cost)?;

    let extra_die = state
        .character_of(actor)
        .is_some_and(|c| c.archetype() == Archetype::Peterman);
    let mut rng = RngStream::new(env.rng(), state.rng_state);
    let dice = state.tile(pos.floor, pos.tile_idx).tokens as usize + usize::from(extra_die);
    let faces: Vec<u8> = (0..dice).map(|_| rng.roll_d6()).collect();
    state.rng_state = rng.counter();

    let (col, row) = grid::coords(pos.tile_idx);
    let mut all_cracked = true;
    let line: Vec<usize> = (0..GRID)
        .map(|c| grid::index(c, row))
        .chain((0..GRID).map(|r| grid::index(col, r)))
        .filter(|&idx| idx != pos.tile_idx)
        .collect();

    for idx in line {
        let tile = state.tile_mut(pos.floor, idx);
        if tile.revealed && faces.contains(&tile.number) {
            tile.cracked = true;
        }
        all_cracked &= state.tile(pos.floor, idx).cracked;
    }

    if all_cracked {
        state.floors[pos.floor].safe_opened = true;
        award_loot(state, env, actor);
    }
    Ok(())
}

/// Draws a loot card for `player` and applies its on-pickup string.
pub(crate) fn award_loot(state: &mut GameState, env: &GameEnv<'_>, player: &str) {
    let mut rng = RngStream::new(env.rng(), state.rng_state);
    let loot = cards::draw_loot(state, &mut rng);
    state.rng_state = rng.counter();

    match loot {
        // The gold bar is too heavy to carry out of the vault; it lands
        // on the floor as a pickup marker instead.
        Loot::GoldBar => {
            if let Some(pos) = state.position_of(player) {
                state.tile_mut(pos.floor, pos.tile_idx).gold = true;
            } else {
                state.add_loot(player, loot);
            }
        }
        Loot::Goblet => {
            state.add_loot(player, loot);
            state.damage(player);
        }
        _ => state.add_loot(player, loot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{FirstOption, SinRng};
    use crate::test_support::{FixedRng, bare_state, place_player};

    fn env<'a>(rng: &'a dyn crate::env::RngOracle) -> GameEnv<'a> {
        GameEnv::new(rng, &FirstOption)
    }

    #[test]
    fn character_picks_are_exclusive() {
        let mut state = bare_state();
        select_character(&mut state, "p", Character::Hawk).unwrap();
        assert_eq!(
            select_character(&mut state, "q", Character::Hawk),
            Err(Rejected::CharacterTaken(Character::Hawk))
        );
        assert_eq!(
            select_character(&mut state, "p", Character::Rook),
            Err(Rejected::CharacterAlreadyChosen)
        );
    }

    #[test]
    fn hack_tokens_require_the_matching_terminal() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Rigger);
        state.tile_mut(0, 5).kind = TileType::ComputerLaser;

        assert!(add_token(&mut state, "p", TokenTarget::Fingerprint).is_err());
        add_token(&mut state, "p", TokenTarget::Laser).unwrap();
        assert_eq!(state.hack_laser, 1);
        assert_eq!(state.current_ap, 3);
    }

    #[test]
    fn safe_tokens_cost_two_and_cap_at_six() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Rigger);
        state.tile_mut(0, 5).kind = TileType::Safe;

        add_token(&mut state, "p", TokenTarget::Safe).unwrap();
        assert_eq!(state.tile(0, 5).tokens, 1);
        assert_eq!(state.current_ap, 2);

        state.tile_mut(0, 5).tokens = 6;
        assert_eq!(add_token(&mut state, "p", TokenTarget::Safe), Err(Rejected::TokensMaxed));
    }

    #[test]
    fn timelock_blocks_safe_interactions() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Rigger);
        state.tile_mut(0, 5).kind = TileType::Safe;
        state.tile_mut(0, 5).tokens = 1;
        state.timelock = "q".into();

        assert_eq!(add_token(&mut state, "p", TokenTarget::Safe), Err(Rejected::TimeLocked));
        assert_eq!(crack_safe(&mut state, &env(&SinRng), "p", 1), Err(Rejected::TimeLocked));
    }

    #[test]
    fn crack_roll_marks_matching_revealed_tiles() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Rigger);
        state.tile_mut(0, 5).kind = TileType::Safe;
        state.tile_mut(0, 5).tokens = 2;
        for idx in 0..16 {
            state.tile_mut(0, idx).number = 3;
        }
        state.tile_mut(0, 4).number = 6;
        let rng = FixedRng(5); // every die shows 6

        crack_safe(&mut state, &env(&rng), "p", 1).unwrap();
        assert!(state.tile(0, 4).cracked);
        assert!(!state.tile(0, 6).cracked);
        assert!(!state.floors[0].safe_opened);
    }

    #[test]
    fn cracking_the_last_tile_opens_the_safe_and_pays_out() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Rigger);
        state.tile_mut(0, 5).kind = TileType::Safe;
        state.tile_mut(0, 5).tokens = 1;
        state.loots = vec![Loot::Painting];
        for idx in [4, 6, 7, 1, 9, 13] {
            state.tile_mut(0, idx).number = 6;
        }
        let rng = FixedRng(5);

        crack_safe(&mut state, &env(&rng), "p", 1).unwrap();
        assert!(state.floors[0].safe_opened);
        assert_eq!(state.inventory_of("p").loot, vec![Loot::Painting]);
    }

    #[test]
    fn goblet_pickup_hurts() {
        let mut state = bare_state();
        place_player(&mut state, "p", 0, 5, Character::Rigger);
        state.loots = vec![Loot::Goblet];
        award_loot(&mut state, &env(&SinRng), "p");
        assert_eq!(state.healths["p"], 2);
        assert!(state.has_loot("p", Loot::Goblet));
    }
}
