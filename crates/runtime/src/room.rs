//! The room envelope wrapping a shared game document.
//!
//! A room is what clients rendezvous on: the roster being assembled in the
//! lobby, the board-generation parameters, and, once started, the game
//! document itself. Like [`GameState`], its serde representation is the
//! persisted schema.

use serde::{Deserialize, Serialize};

use heist_core::{GameState, RngOracle, engine, generate};

/// Room lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Lobby,
    Playing,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub room_id: String,
    /// Join order; frozen into the turn rotation at start.
    pub players: Vec<String>,
    pub phase: Phase,
    pub seed: String,
    pub floor_count: usize,
    pub game: Option<GameState>,
}

impl Room {
    pub fn new(room_id: impl Into<String>, seed: impl Into<String>, floor_count: usize) -> Self {
        debug_assert!(floor_count == 2 || floor_count == 3);
        Self {
            room_id: room_id.into(),
            players: Vec::new(),
            phase: Phase::Lobby,
            seed: seed.into(),
            floor_count,
            game: None,
        }
    }

    /// Registers a player in the roster. Joining twice is a no-op.
    pub fn join(&mut self, player: &str) {
        if !self.players.iter().any(|p| p == player) {
            self.players.push(player.to_string());
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self.phase, Phase::Playing)
    }

    /// Generates the board from the room's seed and freezes the roster
    /// into a running game.
    pub fn start(&mut self, rng: &dyn RngOracle) -> &GameState {
        let mut state = generate(rng, &self.seed, self.floor_count);
        engine::start_game(&mut state, &self.players);
        self.phase = Phase::Playing;
        self.game.insert(state)
    }
}
