//! File-based StateRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::repository::{RepositoryError, Result, StateRepository};
use crate::room::Room;

/// File-based implementation of [`StateRepository`].
///
/// Stores each room as an individual `room_{id}.json` document so the
/// persisted bytes match the shared camelCase schema exactly. Writes go
/// through a temp file and an atomic rename.
pub struct FileStateRepository {
    base_dir: PathBuf,
}

impl FileStateRepository {
    /// Create a new file-based repository rooted at `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    fn room_path(&self, room_id: &str) -> PathBuf {
        self.base_dir.join(format!("room_{room_id}.json"))
    }
}

impl StateRepository for FileStateRepository {
    fn read_room(&self, room_id: &str) -> Result<Option<Room>> {
        let path = self.room_path(room_id);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let room: Room = serde_json::from_slice(&bytes)?;

        tracing::debug!(room = %room_id, path = %path.display(), "loaded room");
        Ok(Some(room))
    }

    fn write_room(&self, room: &Room) -> Result<()> {
        let path = self.room_path(&room.room_id);
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec(room)?;
        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!(room = %room.room_id, path = %path.display(), "saved room");
        Ok(())
    }

    fn delete_room(&self, room_id: &str) -> Result<()> {
        let path = self.room_path(room_id);
        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!(room = %room_id, "deleted room");
        }
        Ok(())
    }

    fn list_rooms(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();

        let entries = fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)?;
        for entry in entries {
            let entry = entry.map_err(RepositoryError::Io)?;
            let path = entry.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(id) = filename
                    .strip_prefix("room_")
                    .and_then(|s| s.strip_suffix(".json"))
            {
                ids.push(id.to_string());
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }
}
