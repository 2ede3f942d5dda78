//! Read-only collaborators the engine depends on.
//!
//! The engine never talks to a frontend or an entropy source directly;
//! both are injected as oracle traits and bundled into a [`GameEnv`] so
//! reducers can reach everything they need without hard coupling to
//! concrete implementations.

mod choice;
mod rng;

pub use choice::{ChoiceKind, ChoiceOption, ChoiceOracle, ChoicePrompt, FirstOption, ScriptedChoices};
pub use rng::{RngOracle, RngStream, SinRng, hash_seed};

/// Aggregates the oracles required by the action resolver.
#[derive(Clone, Copy)]
pub struct GameEnv<'a> {
    rng: &'a dyn RngOracle,
    choices: &'a dyn ChoiceOracle,
}

impl<'a> GameEnv<'a> {
    pub fn new(rng: &'a dyn RngOracle, choices: &'a dyn ChoiceOracle) -> Self {
        Self { rng, choices }
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    pub fn choices(&self) -> &'a dyn ChoiceOracle {
        self.choices
    }
}
