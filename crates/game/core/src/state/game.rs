use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cards::{Event, Loot, Tool};
use crate::character::Character;

use super::floor::Floor;
use super::guard::Guard;
use super::tile::Tile;

/// A player's location: floor index plus row-major tile index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPos {
    pub floor: usize,
    pub tile_idx: usize,
}

/// Per-keypad progress: failed tries this turn and whether it is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeypadTile {
    pub floor: usize,
    pub tile_idx: usize,
    pub tries: u8,
    pub opened: bool,
}

/// Items a player carries, split by deck of origin.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub loot: Vec<Loot>,
    pub tool: Vec<Tool>,
}

/// Motion tile marked as triggered earlier this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionMark {
    pub floor: usize,
    pub tile_idx: usize,
}

/// The shared game document. This struct IS the persisted JSON schema;
/// it must round-trip exactly through storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub floors: Vec<Floor>,
    /// One guard per floor index.
    pub guard_positions: Vec<Guard>,
    pub player_positions: BTreeMap<String, PlayerPos>,
    pub player_character: BTreeMap<String, Character>,
    /// Turn rotation, fixed at game start.
    pub player_order: Vec<String>,
    pub current_player_idx: usize,
    #[serde(rename = "currentAP")]
    pub current_ap: u8,
    /// Tile chosen by whoever placed first; later joiners spawn here.
    pub starting_position: Option<usize>,
    pub healths: BTreeMap<String, u8>,
    pub hack_motion: u8,
    pub hack_fingerprint: u8,
    pub hack_laser: u8,
    /// One-shot universal hack token, 0 or 1.
    pub hack_hacker: u8,
    pub keypads: Vec<KeypadTile>,
    pub tools: Vec<Tool>,
    pub events: Vec<Event>,
    pub loots: Vec<Loot>,
    pub inventory: BTreeMap<String, Inventory>,
    /// One-shot status flags: empty, or the name of the player whose next
    /// turn start clears the effect.
    pub emp: String,
    pub timelock: String,
    pub cameraloop: String,
    pub gymnastics: String,
    pub invisibility: String,
    /// One-shot AP modifiers consumed at the next turn-start reset.
    pub headsup: String,
    pub daydreaming: String,
    pub juicer_token: u8,
    /// Persisted position in the seed-derived random stream. Advancing it
    /// here (rather than per client) keeps reshuffles and dice identical
    /// on every client.
    pub rng_state: i64,
    /// Resolved actions this turn, for the event-draw gate.
    pub actions_taken: u32,
    /// Players already damaged this turn.
    pub already_damaged: Vec<String>,
    /// Motion tiles crossed this turn; a second crossing trips the alarm.
    pub triggered_motions: Vec<MotionMark>,
    /// Set when a ShiftChange event already moved every guard this turn.
    pub shift_change: bool,
    /// Pending extra player skip at the next turn advance.
    pub jump_the_gun: bool,
    /// Character skill already used this turn.
    pub skill_used: bool,
}

impl GameState {
    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    /// Name of the player whose turn it is, if the order is populated.
    pub fn current_player(&self) -> Option<&str> {
        self.player_order
            .get(self.current_player_idx)
            .map(String::as_str)
    }

    pub fn tile(&self, floor: usize, tile_idx: usize) -> &Tile {
        &self.floors[floor].tiles[tile_idx]
    }

    pub fn tile_mut(&mut self, floor: usize, tile_idx: usize) -> &mut Tile {
        &mut self.floors[floor].tiles[tile_idx]
    }

    pub fn guard(&self, floor: usize) -> &Guard {
        &self.guard_positions[floor]
    }

    pub fn guard_mut(&mut self, floor: usize) -> &mut Guard {
        &mut self.guard_positions[floor]
    }

    pub fn is_guard_at(&self, floor: usize, tile_idx: usize) -> bool {
        self.guard_positions
            .get(floor)
            .is_some_and(|g| g.is_at(tile_idx))
    }

    pub fn position_of(&self, player: &str) -> Option<PlayerPos> {
        self.player_positions.get(player).copied()
    }

    pub fn character_of(&self, player: &str) -> Option<Character> {
        self.player_character.get(player).copied()
    }

    pub fn players_on_tile(&self, floor: usize, tile_idx: usize) -> Vec<String> {
        self.player_positions
            .iter()
            .filter(|(_, pos)| pos.floor == floor && pos.tile_idx == tile_idx)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn inventory_of(&self, player: &str) -> Inventory {
        self.inventory.get(player).cloned().unwrap_or_default()
    }

    pub fn has_loot(&self, player: &str, loot: Loot) -> bool {
        self.inventory
            .get(player)
            .is_some_and(|inv| inv.loot.contains(&loot))
    }

    pub fn has_tool(&self, player: &str, tool: Tool) -> bool {
        self.inventory
            .get(player)
            .is_some_and(|inv| inv.tool.contains(&tool))
    }

    pub fn add_loot(&mut self, player: &str, loot: Loot) {
        self.inventory.entry(player.to_string()).or_default().loot.push(loot);
    }

    pub fn add_tool(&mut self, player: &str, tool: Tool) {
        self.inventory.entry(player.to_string()).or_default().tool.push(tool);
    }

    /// Removes a single health point, never dropping below zero.
    pub fn damage(&mut self, player: &str) {
        let hp = self.healths.entry(player.to_string()).or_insert(1);
        *hp = hp.saturating_sub(1);
    }

    pub fn heal(&mut self, player: &str) {
        let hp = self.healths.entry(player.to_string()).or_insert(0);
        *hp = (*hp + 1).min(3);
    }

    pub fn keypad_mut(&mut self, floor: usize, tile_idx: usize) -> Option<&mut KeypadTile> {
        self.keypads
            .iter_mut()
            .find(|k| k.floor == floor && k.tile_idx == tile_idx)
    }

    pub fn keypad_opened(&self, floor: usize, tile_idx: usize) -> bool {
        self.keypads
            .iter()
            .any(|k| k.floor == floor && k.tile_idx == tile_idx && k.opened)
    }
}
