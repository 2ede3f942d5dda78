//! Single-writer session driver over a shared room.
//!
//! A [`Session`] is the runtime's write path: every submitted action runs
//! start to finish under one async mutex, so the whole end-of-turn chain
//! (guard steps, event draw, status expiry) lands in the repository
//! before the next action is accepted. Reads go straight to the
//! repository and need no coordination.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use heist_core::{Action, GameEnv, GameState, SinRng, resolve_with};

use crate::error::{Result, RuntimeError};
use crate::provider::{ChoiceProvider, OracleBridge};
use crate::repository::StateRepository;
use crate::room::Room;

pub struct Session {
    room_id: String,
    repo: Arc<dyn StateRepository>,
    choices: Arc<dyn ChoiceProvider>,
    rng: SinRng,
    writer: Mutex<()>,
    pace_guards: bool,
}

impl Session {
    pub fn new(
        room_id: impl Into<String>,
        repo: Arc<dyn StateRepository>,
        choices: Arc<dyn ChoiceProvider>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            repo,
            choices,
            rng: SinRng,
            writer: Mutex::new(()),
            pace_guards: false,
        }
    }

    /// Persist each individual guard step with a speed-scaled delay, the
    /// way an animated client paces patrols. Off by default; the terminal
    /// state is identical either way.
    pub fn with_guard_pacing(mut self) -> Self {
        self.pace_guards = true;
        self
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Creates the room in the lobby phase.
    pub async fn create(&self, seed: &str, floor_count: usize) -> Result<Room> {
        let _writer = self.writer.lock().await;
        if self.repo.read_room(&self.room_id)?.is_some() {
            return Err(RuntimeError::RoomExists(self.room_id.clone()));
        }

        let room = Room::new(self.room_id.clone(), seed, floor_count);
        self.repo.write_room(&room)?;
        tracing::info!(room = %self.room_id, seed, floor_count, "room created");
        Ok(room)
    }

    /// Registers a player in the lobby roster.
    pub async fn join(&self, player: &str) -> Result<Room> {
        let _writer = self.writer.lock().await;
        let mut room = self.load_room()?;
        if room.is_started() {
            return Err(RuntimeError::AlreadyStarted(self.room_id.clone()));
        }

        room.join(player);
        self.repo.write_room(&room)?;
        tracing::info!(room = %self.room_id, player, "player joined");
        Ok(room)
    }

    /// Generates the board and starts the game with the current roster.
    pub async fn start(&self) -> Result<GameState> {
        let _writer = self.writer.lock().await;
        let mut room = self.load_room()?;
        if room.is_started() {
            return Err(RuntimeError::AlreadyStarted(self.room_id.clone()));
        }
        if room.players.is_empty() {
            return Err(RuntimeError::EmptyRoom(self.room_id.clone()));
        }

        let state = room.start(&self.rng).clone();
        self.repo.write_room(&room)?;
        tracing::info!(room = %self.room_id, players = room.players.len(), "game started");
        Ok(state)
    }

    /// Current game document of a started room.
    pub async fn state(&self) -> Result<GameState> {
        let room = self.load_room()?;
        room.game
            .ok_or_else(|| RuntimeError::NotStarted(self.room_id.clone()))
    }

    /// Applies one action for `actor` and persists the resulting state.
    ///
    /// On rejection the stored document is left untouched and the engine's
    /// reason is returned. Requires a multi-threaded tokio runtime, since
    /// choice prompts block the submitting task.
    pub async fn submit(&self, actor: &str, action: Action) -> Result<GameState> {
        let _writer = self.writer.lock().await;
        let mut room = self.load_room()?;
        let Some(state) = room.game.as_mut() else {
            return Err(RuntimeError::NotStarted(self.room_id.clone()));
        };

        let span = tracing::info_span!("action", room = %self.room_id, actor);
        let _enter = span.enter();

        let handle = tokio::runtime::Handle::current();
        let outcome = tokio::task::block_in_place(|| {
            let bridge = OracleBridge::new(self.choices.as_ref(), handle.clone());
            let env = GameEnv::new(&self.rng, &bridge);
            resolve_with(state, &env, actor, &action, &mut |snapshot| {
                if self.pace_guards {
                    self.persist_guard_step(snapshot, &handle);
                }
            })
        });

        match outcome {
            Ok(()) => {
                tracing::debug!(?action, "action applied");
                let snapshot = state.clone();
                self.repo.write_room(&room)?;
                Ok(snapshot)
            }
            Err(reason) => {
                tracing::debug!(?action, %reason, "action rejected");
                Err(reason.into())
            }
        }
    }

    fn load_room(&self) -> Result<Room> {
        self.repo
            .read_room(&self.room_id)?
            .ok_or_else(|| RuntimeError::RoomNotFound(self.room_id.clone()))
    }

    /// A full patrol sweep spans roughly two seconds regardless of the
    /// guard's speed. Persistence failures mid-sweep are logged and
    /// dropped; the terminal write in `submit` still happens.
    fn persist_guard_step(&self, snapshot: &GameState, handle: &tokio::runtime::Handle) {
        if let Err(error) = self.repo.write_state(&self.room_id, snapshot) {
            tracing::warn!(room = %self.room_id, %error, "failed to persist guard step");
        }
        let speed = snapshot
            .current_player()
            .and_then(|p| snapshot.position_of(p))
            .map(|pos| snapshot.guard(pos.floor).speed)
            .unwrap_or(2);
        let delay = Duration::from_millis(2000 / u64::from(speed.max(1)));
        handle.block_on(tokio::time::sleep(delay));
    }
}
