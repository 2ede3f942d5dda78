//! Shared game document and its component types.
//!
//! [`GameState`] is the single mutable document every client reads and
//! writes wholesale. Its serde representation is the wire/storage schema,
//! so field names are pinned to the camelCase document layout.

mod floor;
mod game;
mod guard;
mod tile;

pub use floor::Floor;
pub use game::{GameState, Inventory, KeypadTile, MotionMark, PlayerPos};
pub use guard::{Guard, GridPos};
pub use tile::{Tile, TileType, Walls};
