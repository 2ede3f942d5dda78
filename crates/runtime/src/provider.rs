//! Asynchronous sourcing of secondary player choices.
//!
//! The core engine resolves choices synchronously through its
//! `ChoiceOracle`; runtime users plug in a [`ChoiceProvider`] so those
//! prompts can be answered by a UI, a network peer, or a script. The
//! bridge between the two worlds lives here as well.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use heist_core::{ChoiceOracle, ChoicePrompt};

/// Answers choice prompts for the acting player.
///
/// A `None` answer is a cancellation: the surrounding action is rejected
/// without mutating state.
#[async_trait]
pub trait ChoiceProvider: Send + Sync {
    async fn choose(&self, prompt: ChoicePrompt) -> Option<usize>;
}

/// Always picks the first legal option. Useful for headless runs where no
/// interactive frontend is attached.
pub struct FirstOptionProvider;

#[async_trait]
impl ChoiceProvider for FirstOptionProvider {
    async fn choose(&self, prompt: ChoicePrompt) -> Option<usize> {
        (!prompt.options.is_empty()).then_some(0)
    }
}

/// Answers from a fixed script, for tests and replays.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    answers: Mutex<VecDeque<Option<usize>>>,
}

impl ScriptedProvider {
    pub fn new(answers: impl IntoIterator<Item = Option<usize>>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
        }
    }
}

#[async_trait]
impl ChoiceProvider for ScriptedProvider {
    async fn choose(&self, prompt: ChoicePrompt) -> Option<usize> {
        let answer = self
            .answers
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .flatten()?;
        (answer < prompt.options.len()).then_some(answer)
    }
}

/// Sync facade handed to the core resolver.
///
/// Must only be used from inside `tokio::task::block_in_place`, where
/// blocking on the provider future is legal.
pub(crate) struct OracleBridge<'a> {
    provider: &'a dyn ChoiceProvider,
    handle: tokio::runtime::Handle,
}

impl<'a> OracleBridge<'a> {
    pub(crate) fn new(provider: &'a dyn ChoiceProvider, handle: tokio::runtime::Handle) -> Self {
        Self { provider, handle }
    }
}

impl ChoiceOracle for OracleBridge<'_> {
    fn choose(&self, prompt: &ChoicePrompt) -> Option<usize> {
        self.handle.block_on(self.provider.choose(prompt.clone()))
    }
}
