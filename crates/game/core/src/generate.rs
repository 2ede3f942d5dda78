//! Deterministic board generation.
//!
//! `generate` builds the whole shared document from a seed string: floor
//! layouts, the wall maze, guards with their patrol queues, and the three
//! shuffled decks. Identical inputs yield a byte-identical state; every
//! random draw comes from the seed-hashed [`RngStream`].

use std::collections::BTreeMap;

use crate::cards;
use crate::env::{RngOracle, RngStream, hash_seed};
use crate::grid::{self, GRID, TILES_PER_FLOOR};
use crate::state::{Floor, GameState, Guard, GridPos, KeypadTile, Tile, TileType, Walls};

/// Curated tile multiset for two-floor games: two chunks of fourteen,
/// each later joined by a forced Safe and Stairs.
const TILE_POOL_TWO_FLOORS: [TileType; 28] = [
    TileType::ServiceDuct,
    TileType::ServiceDuct,
    TileType::Laser,
    TileType::Laser,
    TileType::Thermo,
    TileType::Thermo,
    TileType::Fingerprint,
    TileType::Fingerprint,
    TileType::ComputerMotion,
    TileType::ComputerLaser,
    TileType::ComputerFingerprint,
    TileType::Camera,
    TileType::Camera,
    TileType::Camera,
    TileType::Toilet,
    TileType::Motion,
    TileType::Motion,
    TileType::Walkway,
    TileType::Walkway,
    TileType::SecretDoor,
    TileType::SecretDoor,
    TileType::Lobby,
    TileType::Lobby,
    TileType::Keypad,
    TileType::Keypad,
    TileType::Laboratory,
    TileType::SafetyLock,
    TileType::SafetyLock,
];

/// Larger multiset for three-floor games.
const TILE_POOL_THREE_FLOORS: [TileType; 42] = [
    TileType::ServiceDuct,
    TileType::ServiceDuct,
    TileType::Laser,
    TileType::Laser,
    TileType::Laser,
    TileType::Thermo,
    TileType::Thermo,
    TileType::Thermo,
    TileType::Fingerprint,
    TileType::Fingerprint,
    TileType::Fingerprint,
    TileType::ComputerMotion,
    TileType::ComputerLaser,
    TileType::ComputerFingerprint,
    TileType::Camera,
    TileType::Camera,
    TileType::Camera,
    TileType::Camera,
    TileType::Toilet,
    TileType::Motion,
    TileType::Motion,
    TileType::Motion,
    TileType::Scanner,
    TileType::Scanner,
    TileType::Scanner,
    TileType::Walkway,
    TileType::Walkway,
    TileType::Walkway,
    TileType::SecretDoor,
    TileType::SecretDoor,
    TileType::Lobby,
    TileType::Lobby,
    TileType::Keypad,
    TileType::Keypad,
    TileType::Keypad,
    TileType::Laboratory,
    TileType::Laboratory,
    TileType::Atrium,
    TileType::Atrium,
    TileType::SafetyLock,
    TileType::SafetyLock,
    TileType::SafetyLock,
];

/// Internal walls accepted per floor, on top of the forced perimeter.
const WALLS_PER_FLOOR: usize = 8;
const TILES_PER_CHUNK: usize = 14;

/// Base guard speed per floor index.
const GUARD_SPEEDS: [u32; 3] = [2, 3, 4];

/// Builds a fresh game document from a seed.
///
/// The caller (the turn controller, at game start) still has to pop the
/// first two queued waypoints into each guard's `pos`/`target` and set up
/// the player roster.
pub fn generate(rng: &dyn RngOracle, seed: &str, floor_count: usize) -> GameState {
    debug_assert!(floor_count == 2 || floor_count == 3);
    let mut stream = RngStream::new(rng, hash_seed(seed) as i64);

    let mut pool: Vec<TileType> = match floor_count {
        2 => TILE_POOL_TWO_FLOORS.to_vec(),
        _ => TILE_POOL_THREE_FLOORS.to_vec(),
    };
    stream.shuffle(&mut pool);

    let mut floors = Vec::with_capacity(floor_count);
    for chunk in 0..floor_count {
        let rooms = &pool[chunk * TILES_PER_CHUNK..(chunk + 1) * TILES_PER_CHUNK];
        floors.push(generate_floor(&mut stream, rooms));
    }

    let guard_positions = (0..floor_count)
        .map(|f| Guard::new(f, GUARD_SPEEDS[f], shuffled_waypoints(&mut stream)))
        .collect();

    let keypads = keypads_of(&floors);

    let mut tools = cards::all_tools();
    stream.shuffle(&mut tools);
    let mut loots = cards::all_loots();
    stream.shuffle(&mut loots);
    let mut events = cards::all_events();
    stream.shuffle(&mut events);

    GameState {
        floors,
        guard_positions,
        player_positions: BTreeMap::new(),
        player_character: BTreeMap::new(),
        player_order: Vec::new(),
        current_player_idx: 0,
        current_ap: 4,
        starting_position: None,
        healths: BTreeMap::new(),
        hack_motion: 0,
        hack_fingerprint: 0,
        hack_laser: 0,
        hack_hacker: 0,
        keypads,
        tools,
        events,
        loots,
        inventory: BTreeMap::new(),
        emp: String::new(),
        timelock: String::new(),
        cameraloop: String::new(),
        gymnastics: String::new(),
        invisibility: String::new(),
        headsup: String::new(),
        daydreaming: String::new(),
        juicer_token: 0,
        rng_state: stream.counter(),
        actions_taken: 0,
        already_damaged: Vec::new(),
        triggered_motions: Vec::new(),
        shift_change: false,
        jump_the_gun: false,
        skill_used: false,
    }
}

/// Every grid cell once, in shuffled order.
fn shuffled_waypoints(stream: &mut RngStream<'_>) -> Vec<GridPos> {
    let mut waypoints: Vec<GridPos> = (0..TILES_PER_FLOOR).map(GridPos::from_index).collect();
    stream.shuffle(&mut waypoints);
    waypoints
}

fn generate_floor(stream: &mut RngStream<'_>, rooms: &[TileType]) -> Floor {
    let mut kinds = rooms.to_vec();
    kinds.push(TileType::Safe);
    kinds.push(TileType::Stairs);
    stream.shuffle(&mut kinds);

    let tiles = kinds
        .into_iter()
        .enumerate()
        .map(|(idx, kind)| {
            let (x, y) = grid::coords(idx);
            let walls = Walls {
                top: y == 0,
                right: x == GRID - 1,
                bottom: y == GRID - 1,
                left: x == 0,
            };
            Tile::new(kind, walls, stream.roll_d6())
        })
        .collect();

    let mut floor = Floor::new(tiles);
    place_walls(stream, &mut floor.tiles);
    floor
}

/// Candidate internal wall between two horizontally or vertically
/// neighboring tiles.
#[derive(Clone, Copy)]
struct WallCandidate {
    a: usize,
    b: usize,
    horizontal: bool,
}

/// Greedily accepts up to eight shuffled wall candidates per floor,
/// rejecting any that would disconnect the grid. The BFS reachability
/// check runs against tile 0 after each tentative placement.
fn place_walls(stream: &mut RngStream<'_>, tiles: &mut [Tile]) {
    let mut candidates = Vec::with_capacity(2 * GRID * (GRID - 1));
    for y in 0..GRID {
        for x in 0..GRID {
            let idx = grid::index(x, y);
            if x < GRID - 1 {
                candidates.push(WallCandidate {
                    a: idx,
                    b: idx + 1,
                    horizontal: true,
                });
            }
            if y < GRID - 1 {
                candidates.push(WallCandidate {
                    a: idx,
                    b: idx + GRID,
                    horizontal: false,
                });
            }
        }
    }
    stream.shuffle(&mut candidates);

    let mut placed = 0;
    for wall in candidates {
        if placed >= WALLS_PER_FLOOR {
            break;
        }
        set_wall(tiles, wall, true);
        if grid::fully_connected(tiles) {
            placed += 1;
        } else {
            set_wall(tiles, wall, false);
        }
    }
    debug_assert_eq!(placed, WALLS_PER_FLOOR);
}

fn set_wall(tiles: &mut [Tile], wall: WallCandidate, present: bool) {
    if wall.horizontal {
        tiles[wall.a].walls.right = present;
        tiles[wall.b].walls.left = present;
    } else {
        tiles[wall.a].walls.bottom = present;
        tiles[wall.b].walls.top = present;
    }
}

fn keypads_of(floors: &[Floor]) -> Vec<KeypadTile> {
    floors
        .iter()
        .enumerate()
        .flat_map(|(f, floor)| {
            floor
                .tiles
                .iter()
                .enumerate()
                .filter(|(_, tile)| tile.kind == TileType::Keypad)
                .map(move |(idx, _)| KeypadTile {
                    floor: f,
                    tile_idx: idx,
                    tries: 0,
                    opened: false,
                })
        })
        .collect()
}
