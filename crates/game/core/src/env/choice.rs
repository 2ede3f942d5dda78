//! Secondary player choices.
//!
//! Several actions and card effects pause mid-resolution to ask the acting
//! player to pick one option from a dynamically computed legal set (how
//! many AP to risk on a laser, which tile to throw a voice at, which
//! player to buddy up with). The engine stays synchronous: it hands a
//! [`ChoicePrompt`] to the [`ChoiceOracle`] and expects exactly one chosen
//! index back, or `None` for a cancellation.

use serde::{Deserialize, Serialize};

use crate::grid::Dir;

/// What the prompt is about, so a UI can phrase it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceKind {
    /// Laser tile entry: safe 2 AP vs. risky 1 AP (2 with the Gemstone).
    LaserApGamble,
    /// Pick a target tile for an effect.
    TargetTile,
    /// Pick a movement direction.
    TargetDirection,
    /// Pick another player.
    TargetPlayer,
    /// Pick the next event card while reordering the deck top.
    EventOrder,
    /// Yes/no decision.
    Confirm,
}

/// One selectable option inside a prompt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChoiceOption {
    Tile { floor: usize, tile_idx: usize },
    Direction(Dir),
    Player(String),
    Card(String),
    ApSpend(u8),
    Yes,
    No,
}

/// A blocking request for a single selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChoicePrompt {
    pub kind: ChoiceKind,
    pub options: Vec<ChoiceOption>,
}

impl ChoicePrompt {
    pub fn new(kind: ChoiceKind, options: Vec<ChoiceOption>) -> Self {
        Self { kind, options }
    }
}

/// Resolves prompts to a chosen option index.
///
/// A `None` answer is a cancellation: the surrounding action is rejected
/// without mutating state.
pub trait ChoiceOracle {
    fn choose(&self, prompt: &ChoicePrompt) -> Option<usize>;
}

/// Oracle answering from a fixed script. Intended for tests and for
/// replaying recorded sessions.
#[derive(Debug, Default)]
pub struct ScriptedChoices {
    answers: std::cell::RefCell<std::collections::VecDeque<Option<usize>>>,
}

impl ScriptedChoices {
    pub fn new(answers: impl IntoIterator<Item = Option<usize>>) -> Self {
        Self {
            answers: std::cell::RefCell::new(answers.into_iter().collect()),
        }
    }
}

impl ChoiceOracle for ScriptedChoices {
    fn choose(&self, prompt: &ChoicePrompt) -> Option<usize> {
        let answer = self.answers.borrow_mut().pop_front().flatten()?;
        (answer < prompt.options.len()).then_some(answer)
    }
}

/// Oracle that always picks the first legal option. Useful where no
/// interactive frontend is attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstOption;

impl ChoiceOracle for FirstOption {
    fn choose(&self, prompt: &ChoicePrompt) -> Option<usize> {
        (!prompt.options.is_empty()).then_some(0)
    }
}
