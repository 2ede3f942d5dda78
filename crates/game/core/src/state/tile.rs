use serde::{Deserialize, Serialize};

/// Functional room categories on the 4x4 floor grid.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum TileType {
    Safe,
    Stairs,
    Atrium,
    Camera,
    SafetyLock,
    Fingerprint,
    Lobby,
    Keypad,
    Laboratory,
    Laser,
    Toilet,
    Motion,
    Scanner,
    SecretDoor,
    ServiceDuct,
    Thermo,
    Walkway,
    ComputerLaser,
    ComputerFingerprint,
    ComputerMotion,
    Disabled,
}

impl TileType {
    /// Computer terminals bank hack tokens for one sensor family each.
    pub fn is_computer(self) -> bool {
        matches!(
            self,
            TileType::ComputerLaser | TileType::ComputerFingerprint | TileType::ComputerMotion
        )
    }
}

/// Edge wall flags, shared with the neighboring tile: a wall is real if
/// either adjacent tile (or the perimeter) declares it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Walls {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

/// One cell of a floor grid. Hidden until first interaction reveals it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    #[serde(rename = "type")]
    pub kind: TileType,
    pub revealed: bool,
    pub walls: Walls,
    /// Safe dial count (0-6).
    pub tokens: u8,
    /// Safe-crack die face, 1-6.
    pub number: u8,
    /// Crack-row/col marker toward opening the safe.
    pub cracked: bool,
    /// Damage-absorption charges sitting on the tile.
    #[serde(rename = "stealthtoken")]
    pub stealth_tokens: u8,
    pub thermal_stairs_up: bool,
    pub thermal_stairs_down: bool,
    /// Loot markers dropped on the tile, picked up by entering it.
    pub cat: bool,
    pub gold: bool,
    /// Laboratory first-visit marker; the first visitor draws a tool.
    pub not_looted: bool,
}

impl Tile {
    pub fn new(kind: TileType, walls: Walls, number: u8) -> Self {
        Self {
            kind,
            revealed: false,
            walls,
            tokens: 0,
            number,
            cracked: false,
            stealth_tokens: 0,
            thermal_stairs_up: false,
            thermal_stairs_down: false,
            cat: false,
            gold: false,
            not_looted: true,
        }
    }
}
