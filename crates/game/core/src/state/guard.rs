use serde::{Deserialize, Serialize};

use crate::grid;

/// Grid coordinate on a 4x4 floor, always in 0..=3 on both axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPos {
    pub x: u8,
    pub y: u8,
}

impl GridPos {
    pub fn new(x: u8, y: u8) -> Self {
        debug_assert!(x < 4 && y < 4);
        Self { x, y }
    }

    pub fn from_index(tile_idx: usize) -> Self {
        let (x, y) = grid::coords(tile_idx);
        Self {
            x: x as u8,
            y: y as u8,
        }
    }

    pub fn index(self) -> usize {
        grid::index(self.x as usize, self.y as usize)
    }
}

/// Autonomous guard, one per floor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guard {
    pub floor: usize,
    pub pos: GridPos,
    pub target: GridPos,
    /// Steps per turn. Grows by one each time the patrol queue drains.
    pub speed: u32,
    /// Shuffled queue of future patrol waypoints, consumed head-first.
    pub moves: Vec<GridPos>,
    /// One-turn movement skip flag (Donuts tool).
    pub donut: bool,
}

impl Guard {
    pub fn new(floor: usize, speed: u32, moves: Vec<GridPos>) -> Self {
        Self {
            floor,
            pos: GridPos::default(),
            target: GridPos::default(),
            speed,
            moves,
            donut: false,
        }
    }

    pub fn is_at(&self, tile_idx: usize) -> bool {
        self.pos.index() == tile_idx
    }
}
