mod common;

use std::sync::Arc;

use heist_core::state::KeypadTile;
use heist_core::{Action, Character, Event, Loot, MoveDir, TileType};
use heist_runtime::{
    FileStateRepository, FirstOptionProvider, InMemoryStateRepo, Session, StateRepository,
};

fn fixture_session(room_id: &str, state: heist_core::GameState) -> (Arc<InMemoryStateRepo>, Session) {
    common::init_tracing();
    let repo = Arc::new(InMemoryStateRepo::with_room(common::started_room(room_id, state)));
    let session = Session::new(room_id, repo.clone(), Arc::new(FirstOptionProvider));
    (repo, session)
}

#[tokio::test(flavor = "multi_thread")]
async fn keypad_attempt_fails_at_the_door() {
    let mut state = common::open_state(2);
    common::seat(&mut state, "ada", 0, 5, Character::RiggerHard);
    state.tile_mut(0, 6).kind = TileType::Keypad;
    state.tile_mut(0, 6).revealed = false;
    state.keypads.push(KeypadTile { floor: 0, tile_idx: 6, tries: 0, opened: false });
    // rng_state 0: the first d6 of the sin stream shows a one.
    let (_, session) = fixture_session("vault", state);

    let after = session
        .submit("ada", Action::Step { dir: MoveDir::Right })
        .await
        .unwrap();
    assert_eq!(after.position_of("ada").unwrap().tile_idx, 5);
    assert_eq!(after.keypads[0].tries, 1);
    assert!(!after.keypads[0].opened);
    assert!(after.tile(0, 6).revealed);
    assert_eq!(after.current_ap, 3);
    assert_eq!(after.rng_state, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn keycard_walks_straight_through_the_keypad() {
    let mut state = common::open_state(2);
    common::seat(&mut state, "ada", 0, 5, Character::RiggerHard);
    state.tile_mut(0, 6).kind = TileType::Keypad;
    state.keypads.push(KeypadTile { floor: 0, tile_idx: 6, tries: 0, opened: false });
    state.add_loot("ada", Loot::Keycard);
    let (_, session) = fixture_session("vault", state);

    let after = session
        .submit("ada", Action::Step { dir: MoveDir::Right })
        .await
        .unwrap();
    assert_eq!(after.position_of("ada").unwrap().tile_idx, 6);
    assert!(after.keypads[0].opened);
    assert_eq!(after.keypads[0].tries, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn safety_lock_reveal_fallback_through_the_session() {
    let mut state = common::open_state(2);
    common::seat(&mut state, "ada", 0, 5, Character::RiggerHard);
    state.tile_mut(0, 6).kind = TileType::SafetyLock;
    state.tile_mut(0, 6).revealed = false;
    state.current_ap = 2;
    let (_, session) = fixture_session("vault", state);

    let after = session
        .submit("ada", Action::Step { dir: MoveDir::Right })
        .await
        .unwrap();
    assert_eq!(after.position_of("ada").unwrap().tile_idx, 5);
    assert!(after.tile(0, 6).revealed);
    assert_eq!(after.current_ap, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn quiet_turn_draws_from_the_event_deck() {
    let mut state = common::open_state(2);
    common::seat(&mut state, "ada", 0, 5, Character::RiggerHard);
    state.events = vec![Event::SecondWind];
    state.healths.insert("ada".into(), 2);
    let (_, session) = fixture_session("vault", state);

    let after = session.submit("ada", Action::EndTurn).await.unwrap();
    assert!(after.events.is_empty());
    assert_eq!(after.healths["ada"], 3);
    assert_eq!(after.current_player(), Some("ada"));
}

#[tokio::test(flavor = "multi_thread")]
async fn rooms_survive_a_session_restart() {
    common::init_tracing();
    let dir = tempfile::tempdir().unwrap();

    let repo = Arc::new(FileStateRepository::new(dir.path()).unwrap());
    let session = Session::new("cellar", repo, Arc::new(FirstOptionProvider));
    session.create("HEIST42", 3).await.unwrap();
    session.join("ada").await.unwrap();
    let started = session.start().await.unwrap();
    drop(session);

    let repo = Arc::new(FileStateRepository::new(dir.path()).unwrap());
    assert_eq!(repo.list_rooms().unwrap(), vec!["cellar"]);
    let session = Session::new("cellar", repo, Arc::new(FirstOptionProvider));
    assert_eq!(session.state().await.unwrap(), started);

    let after = session
        .submit("ada", Action::SelectCharacter { character: Character::Hawk })
        .await
        .unwrap();
    assert_eq!(after.character_of("ada"), Some(Character::Hawk));
}
