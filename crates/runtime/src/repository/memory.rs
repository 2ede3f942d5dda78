//! In-memory StateRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::repository::{RepositoryError, Result, StateRepository};
use crate::room::Room;

/// In-memory implementation of [`StateRepository`].
///
/// Stores rooms in a map for testing and local development.
pub struct InMemoryStateRepo {
    rooms: RwLock<HashMap<String, Room>>,
}

impl InMemoryStateRepo {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Create with one room already stored.
    pub fn with_room(room: Room) -> Self {
        let mut rooms = HashMap::new();
        rooms.insert(room.room_id.clone(), room);
        Self {
            rooms: RwLock::new(rooms),
        }
    }
}

impl Default for InMemoryStateRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl StateRepository for InMemoryStateRepo {
    fn read_room(&self, room_id: &str) -> Result<Option<Room>> {
        let rooms = self
            .rooms
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(rooms.get(room_id).cloned())
    }

    fn write_room(&self, room: &Room) -> Result<()> {
        let mut rooms = self
            .rooms
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        rooms.insert(room.room_id.clone(), room.clone());
        Ok(())
    }

    fn delete_room(&self, room_id: &str) -> Result<()> {
        let mut rooms = self
            .rooms
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        rooms.remove(room_id);
        Ok(())
    }

    fn list_rooms(&self) -> Result<Vec<String>> {
        let rooms = self
            .rooms
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut ids: Vec<String> = rooms.keys().cloned().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}
