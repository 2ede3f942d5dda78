//! Alarm propagation and hack-token absorption.

use serde::{Deserialize, Serialize};

use crate::character::Archetype;
use crate::grid;
use crate::state::{GameState, GridPos};

/// What tripped (or tried to trip) an alarm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmKind {
    Camera,
    Laser,
    Motion,
    Fingerprint,
    Thermo,
    Scanner,
    Dynamite,
    Chihuahua,
    Shoplifting,
    Juicer,
    /// Thrown-voice style distractions from event cards.
    Decoy,
}

impl AlarmKind {
    /// Sensor families whose triggers a banked hack token can absorb.
    pub fn is_hackable(self) -> bool {
        matches!(self, AlarmKind::Fingerprint | AlarmKind::Motion | AlarmKind::Laser)
    }
}

/// Trips an alarm at `(floor, tile_idx)` unless something absorbs it.
///
/// No-ops when the guard already stands there, the tile is already
/// alarmed, or an EMP is active. Hackable kinds burn a matching banked
/// token, the universal hacker token, or the presence of a Hacker on the
/// tile, in that order. Camera triggers are swallowed by an active video
/// loop. Anything that actually lands retargets the guard to the nearest
/// alarm.
pub fn trigger_alarm(state: &mut GameState, kind: AlarmKind, floor: usize, tile_idx: usize) {
    if state.is_guard_at(floor, tile_idx) || state.floors[floor].is_alarmed(tile_idx) {
        return;
    }
    if !state.emp.is_empty() {
        return;
    }

    if kind.is_hackable() {
        let counter = match kind {
            AlarmKind::Fingerprint => &mut state.hack_fingerprint,
            AlarmKind::Motion => &mut state.hack_motion,
            AlarmKind::Laser => &mut state.hack_laser,
            _ => unreachable!(),
        };
        if *counter > 0 {
            *counter -= 1;
            return;
        }
        if state.hack_hacker > 0 {
            state.hack_hacker = 0;
            return;
        }
        if hacker_present(state, floor, tile_idx) {
            return;
        }
    } else if kind == AlarmKind::Camera && !state.cameraloop.is_empty() {
        return;
    }

    state.floors[floor].alarms.push(tile_idx);
    check_closest_alarm(state, floor);
}

/// True when a Hacker-archetype player physically stands on the tile.
fn hacker_present(state: &GameState, floor: usize, tile_idx: usize) -> bool {
    state.players_on_tile(floor, tile_idx).iter().any(|name| {
        state
            .character_of(name)
            .is_some_and(|c| c.archetype() == Archetype::Hacker)
    })
}

/// Retargets the floor's guard to the alarm with the shortest BFS path.
///
/// Ties fall to the earlier entry in the alarm list. No-op when the floor
/// has no alarms.
pub fn check_closest_alarm(state: &mut GameState, floor: usize) {
    let guard_pos = state.guard(floor).pos.index();
    let tiles = &state.floors[floor].tiles;

    let closest = state.floors[floor]
        .alarms
        .iter()
        .map(|&alarm| (grid::shortest_path(tiles, guard_pos, alarm).len(), alarm))
        .filter(|&(len, _)| len > 0)
        .min_by_key(|&(len, _)| len)
        .map(|(_, alarm)| alarm);

    if let Some(alarm) = closest {
        state.guard_mut(floor).target = GridPos::from_index(alarm);
    }
}
