use serde::{Deserialize, Serialize};

use super::tile::Tile;

/// One 4x4 floor: sixteen tiles in row-major order plus the floor-wide
/// alarm set and safe status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Floor {
    pub tiles: Vec<Tile>,
    /// Tile indices with an unresolved alarm.
    pub alarms: Vec<usize>,
    pub safe_opened: bool,
}

impl Floor {
    pub fn new(tiles: Vec<Tile>) -> Self {
        debug_assert_eq!(tiles.len(), crate::grid::TILES_PER_FLOOR);
        Self {
            tiles,
            alarms: Vec::new(),
            safe_opened: false,
        }
    }

    pub fn is_alarmed(&self, tile_idx: usize) -> bool {
        self.alarms.contains(&tile_idx)
    }

    pub fn clear_alarm(&mut self, tile_idx: usize) -> bool {
        let before = self.alarms.len();
        self.alarms.retain(|&a| a != tile_idx);
        self.alarms.len() != before
    }
}
