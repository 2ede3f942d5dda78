//! Repository contract for saving and loading shared room documents.

use heist_core::GameState;

use crate::repository::{RepositoryError, Result};
use crate::room::Room;

/// Whole-document persistence for rooms, keyed by room id.
///
/// Semantics are last-write-wins: `write_room` replaces the stored copy
/// wholesale, which matches the single-writer session discipline. There
/// is no partial update and no versioning.
pub trait StateRepository: Send + Sync {
    /// Load a room envelope by id.
    fn read_room(&self, room_id: &str) -> Result<Option<Room>>;

    /// Replace the stored room envelope.
    fn write_room(&self, room: &Room) -> Result<()>;

    /// Delete a room.
    fn delete_room(&self, room_id: &str) -> Result<()>;

    /// List stored room ids, sorted.
    fn list_rooms(&self) -> Result<Vec<String>>;

    /// Load just the game document of a started room.
    fn read_state(&self, room_id: &str) -> Result<Option<GameState>> {
        Ok(self.read_room(room_id)?.and_then(|room| room.game))
    }

    /// Replace just the game document, keeping the envelope.
    fn write_state(&self, room_id: &str, state: &GameState) -> Result<()> {
        let mut room = self
            .read_room(room_id)?
            .ok_or_else(|| RepositoryError::MissingRoom(room_id.to_string()))?;
        room.game = Some(state.clone());
        self.write_room(&room)
    }
}
