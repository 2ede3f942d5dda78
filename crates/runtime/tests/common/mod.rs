//! Hand-built room fixtures: fully open revealed floors, idle guards,
//! canonical deck order.
#![allow(dead_code)]

use heist_core::grid::{GRID, TILES_PER_FLOOR, coords};
use heist_core::{
    Character, Floor, GameState, GridPos, Guard, PlayerPos, Tile, TileType, Walls, cards,
};
use heist_runtime::{Phase, Room};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn open_floor() -> Floor {
    let tiles = (0..TILES_PER_FLOOR)
        .map(|idx| {
            let (x, y) = coords(idx);
            let walls = Walls {
                top: y == 0,
                right: x == GRID - 1,
                bottom: y == GRID - 1,
                left: x == 0,
            };
            let mut tile = Tile::new(TileType::Toilet, walls, 1);
            tile.revealed = true;
            tile
        })
        .collect();
    Floor::new(tiles)
}

pub fn open_state(floor_count: usize) -> GameState {
    let floors: Vec<Floor> = (0..floor_count).map(|_| open_floor()).collect();
    let guards = (0..floor_count)
        .map(|floor| {
            let moves = (0..TILES_PER_FLOOR).map(GridPos::from_index).collect();
            Guard::new(floor, 2, moves)
        })
        .collect();

    GameState {
        floors,
        guard_positions: guards,
        player_positions: Default::default(),
        player_character: Default::default(),
        player_order: Vec::new(),
        current_player_idx: 0,
        current_ap: 4,
        starting_position: None,
        healths: Default::default(),
        hack_motion: 0,
        hack_fingerprint: 0,
        hack_laser: 0,
        hack_hacker: 0,
        keypads: Vec::new(),
        tools: cards::all_tools(),
        events: cards::all_events(),
        loots: cards::all_loots(),
        inventory: Default::default(),
        emp: String::new(),
        timelock: String::new(),
        cameraloop: String::new(),
        gymnastics: String::new(),
        invisibility: String::new(),
        headsup: String::new(),
        daydreaming: String::new(),
        juicer_token: 0,
        rng_state: 0,
        actions_taken: 0,
        already_damaged: Vec::new(),
        triggered_motions: Vec::new(),
        shift_change: false,
        jump_the_gun: false,
        skill_used: false,
    }
}

pub fn seat(state: &mut GameState, name: &str, floor: usize, tile_idx: usize, character: Character) {
    state
        .player_positions
        .insert(name.to_string(), PlayerPos { floor, tile_idx });
    state.player_character.insert(name.to_string(), character);
    state.healths.insert(name.to_string(), 3);
    if !state.player_order.iter().any(|p| p == name) {
        state.player_order.push(name.to_string());
    }
}

/// Wraps a prepared game document in a started room envelope.
pub fn started_room(room_id: &str, state: GameState) -> Room {
    let mut room = Room::new(room_id, "fixture", state.floor_count());
    room.players = state.player_order.clone();
    room.phase = Phase::Playing;
    room.game = Some(state);
    room
}
