//! Deterministic rules engine for the cooperative grid-stealth game.
//!
//! `heist-core` defines the shared game document, the board generator,
//! and the action resolver that every client runs over the persisted
//! state. All mutation flows through [`engine::resolve`] and the turn
//! controller; everything else is pure queries. The crate does no I/O
//! and keeps randomness and player choices behind the [`env`] oracles so
//! identical inputs always replay to identical states.
pub mod cards;
pub mod character;
pub mod engine;
pub mod env;
pub mod generate;
pub mod grid;
pub mod queries;
pub mod state;

pub use cards::{Event, Loot, Tool};
pub use character::{Archetype, Character};
pub use engine::{
    Action, AlarmKind, MoveDir, Rejected, TokenTarget, end_turn, end_turn_with, resolve,
    resolve_with, start_game, take_guard_turn, trigger_alarm,
};
pub use env::{
    ChoiceKind, ChoiceOption, ChoiceOracle, ChoicePrompt, FirstOption, GameEnv, RngOracle,
    RngStream, ScriptedChoices, SinRng, hash_seed,
};
pub use generate::generate;
pub use state::{
    Floor, GameState, GridPos, Guard, Inventory, KeypadTile, MotionMark, PlayerPos, Tile,
    TileType, Walls,
};
