//! The three draw decks: tools, loot, and events.
//!
//! Decks live in the shared document as ordered name lists consumed
//! head-first. Whenever a deck runs dry it is rebuilt as a full shuffle
//! of the canonical list, so a draw can never fail.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::env::RngStream;
use crate::state::GameState;

/// One-shot utility items; used from inventory at a time of the holder's
/// choosing.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Tool {
    Blueprints,
    Crowbar,
    CrystalBall,
    Donuts,
    Dynamite,
    Emp,
    InvisibleSuit,
    MakeupKit,
    Rollerskates,
    SmokeBomb,
    Stethoscope,
    ThermalBomb,
    Virus,
}

/// Treasure with (mostly) passive strings attached.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Loot {
    Gemstone,
    Tiara,
    Mirror,
    Stamp,
    Chihuahua,
    PersianKitten,
    Goblet,
    GoldBar,
    Isotope,
    Keycard,
    Painting,
    Bust,
}

/// Turn-boundary surprises, drawn when a player ends a quiet turn.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Event {
    Reboot,
    DeadDrop,
    FreightElevator,
    LostGrip,
    ThrowVoice,
    Peekhole,
    GoWithYourGut,
    BuddySystem,
    ShiftChange,
    JumpTheGun,
    HeadsUp,
    VideoLoop,
    TimeLock,
    Gymnastics,
    Shoplifting,
    ChangeOfPlans,
    Espresso,
    SilentAlarm,
    Blackout,
    Fingerprints,
    Crash,
    SmokeDetector,
    Daydreaming,
    NeatFreak,
    LooseLips,
    SecondWind,
}

/// Canonical deck contents, in declaration order.
pub fn all_tools() -> Vec<Tool> {
    Tool::iter().collect()
}

pub fn all_loots() -> Vec<Loot> {
    Loot::iter().collect()
}

pub fn all_events() -> Vec<Event> {
    Event::iter().collect()
}

fn draw<T: Copy>(deck: &mut Vec<T>, canonical: Vec<T>, rng: &mut RngStream<'_>) -> T {
    if deck.is_empty() {
        let mut fresh = canonical;
        rng.shuffle(&mut fresh);
        *deck = fresh;
    }
    deck.remove(0)
}

/// Draws the top tool, reshuffling the canonical list first if the deck
/// is exhausted.
pub fn draw_tool(state: &mut GameState, rng: &mut RngStream<'_>) -> Tool {
    draw(&mut state.tools, all_tools(), rng)
}

pub fn draw_loot(state: &mut GameState, rng: &mut RngStream<'_>) -> Loot {
    draw(&mut state.loots, all_loots(), rng)
}

pub fn draw_event(state: &mut GameState, rng: &mut RngStream<'_>) -> Event {
    draw(&mut state.events, all_events(), rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SinRng;

    #[test]
    fn canonical_deck_sizes() {
        assert_eq!(all_tools().len(), 13);
        assert_eq!(all_loots().len(), 12);
        assert_eq!(all_events().len(), 26);
    }

    #[test]
    fn draws_consume_head_first() {
        let mut state = crate::test_support::bare_state();
        state.tools = vec![Tool::Crowbar, Tool::Emp];
        let mut rng = RngStream::new(&SinRng, 0);
        assert_eq!(draw_tool(&mut state, &mut rng), Tool::Crowbar);
        assert_eq!(draw_tool(&mut state, &mut rng), Tool::Emp);
        assert!(state.tools.is_empty());
    }

    #[test]
    fn exhausted_deck_reshuffles_full_canonical_list() {
        let mut state = crate::test_support::bare_state();
        state.events.clear();
        let mut rng = RngStream::new(&SinRng, 7);
        let drawn = draw_event(&mut state, &mut rng);
        // The draw itself is valid and the rest of the reshuffle remains.
        assert!(all_events().contains(&drawn));
        assert_eq!(state.events.len(), all_events().len() - 1);
    }

    #[test]
    fn cards_serialize_as_plain_strings() {
        assert_eq!(serde_json::to_string(&Tool::CrystalBall).unwrap(), "\"CrystalBall\"");
        assert_eq!(serde_json::to_string(&Loot::PersianKitten).unwrap(), "\"PersianKitten\"");
        assert_eq!(serde_json::to_string(&Event::JumpTheGun).unwrap(), "\"JumpTheGun\"");
    }
}
