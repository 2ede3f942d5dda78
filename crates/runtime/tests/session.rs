mod common;

use std::sync::Arc;

use heist_core::{Action, Character, Rejected, Tool};
use heist_runtime::{
    FirstOptionProvider, InMemoryStateRepo, Phase, RuntimeError, ScriptedProvider, Session,
    StateRepository,
};

#[tokio::test(flavor = "multi_thread")]
async fn lobby_to_game_flow() {
    common::init_tracing();
    let repo = Arc::new(InMemoryStateRepo::new());
    let session = Session::new("attic", repo.clone(), Arc::new(FirstOptionProvider));

    session.create("HEIST42", 2).await.unwrap();
    assert!(matches!(
        session.create("HEIST42", 2).await,
        Err(RuntimeError::RoomExists(_))
    ));

    session.join("ada").await.unwrap();
    session.join("bert").await.unwrap();
    let state = session.start().await.unwrap();

    assert_eq!(state.player_order, vec!["ada", "bert"]);
    assert_eq!(state.current_player(), Some("ada"));
    assert_eq!(state.current_ap, 4);
    // Two waypoints were promoted into pos/target at start.
    assert!(state.guard_positions.iter().all(|g| g.moves.len() == 14));

    let room = repo.read_room("attic").unwrap().unwrap();
    assert_eq!(room.phase, Phase::Playing);
    assert!(matches!(
        session.join("late").await,
        Err(RuntimeError::AlreadyStarted(_))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn character_select_and_first_placement() {
    common::init_tracing();
    let repo = Arc::new(InMemoryStateRepo::new());
    let session = Session::new("attic", repo.clone(), Arc::new(FirstOptionProvider));
    session.create("HEIST42", 2).await.unwrap();
    session.join("ada").await.unwrap();
    session.join("bert").await.unwrap();
    session.start().await.unwrap();

    session
        .submit("ada", Action::SelectCharacter { character: Character::Rigger })
        .await
        .unwrap();
    assert!(matches!(
        session
            .submit("bert", Action::SelectCharacter { character: Character::Rigger })
            .await,
        Err(RuntimeError::Rejected(Rejected::CharacterTaken(Character::Rigger)))
    ));
    session
        .submit("bert", Action::SelectCharacter { character: Character::Hawk })
        .await
        .unwrap();

    // Out-of-turn placement is rejected and nothing is persisted.
    let before = session.state().await.unwrap();
    assert!(matches!(
        session.submit("bert", Action::Place { tile_idx: 0 }).await,
        Err(RuntimeError::Rejected(Rejected::NotYourTurn { .. }))
    ));
    assert_eq!(session.state().await.unwrap(), before);

    let state = session
        .submit("ada", Action::Place { tile_idx: 0 })
        .await
        .unwrap();
    assert_eq!(state.position_of("ada").unwrap().tile_idx, 0);
    assert!(state.tile(0, 0).revealed);
    assert_eq!(state.starting_position, Some(0));
    assert_eq!(session.state().await.unwrap(), state);
}

#[tokio::test(flavor = "multi_thread")]
async fn busy_turn_rotates_without_an_event_draw() {
    common::init_tracing();
    let repo = Arc::new(InMemoryStateRepo::new());
    let session = Session::new("attic", repo.clone(), Arc::new(FirstOptionProvider));
    session.create("HEIST42", 2).await.unwrap();
    session.join("ada").await.unwrap();
    session.join("bert").await.unwrap();
    session.start().await.unwrap();

    session
        .submit("ada", Action::SelectCharacter { character: Character::Rigger })
        .await
        .unwrap();
    session
        .submit("bert", Action::SelectCharacter { character: Character::Hawk })
        .await
        .unwrap();
    session
        .submit("ada", Action::Place { tile_idx: 0 })
        .await
        .unwrap();

    // Mark the turn busy so the quiet-turn event draw stays off.
    let mut state = session.state().await.unwrap();
    state.actions_taken = 3;
    let deck = state.events.clone();
    repo.write_state("attic", &state).unwrap();

    let after = session.submit("ada", Action::EndTurn).await.unwrap();
    assert_eq!(after.current_player(), Some("bert"));
    assert_eq!(after.current_ap, 4);
    assert_eq!(after.actions_taken, 0);
    assert_eq!(after.events, deck);
}

#[tokio::test(flavor = "multi_thread")]
async fn cancelled_tool_choice_keeps_the_tool() {
    common::init_tracing();
    let repo = Arc::new(InMemoryStateRepo::new());
    let setup = Session::new("attic", repo.clone(), Arc::new(FirstOptionProvider));
    setup.create("HEIST42", 2).await.unwrap();
    setup.join("ada").await.unwrap();
    setup.start().await.unwrap();
    setup
        .submit("ada", Action::SelectCharacter { character: Character::Rigger })
        .await
        .unwrap();
    setup
        .submit("ada", Action::Place { tile_idx: 0 })
        .await
        .unwrap();

    let mut state = setup.state().await.unwrap();
    state.add_tool("ada", Tool::CrystalBall);
    repo.write_state("attic", &state).unwrap();

    let cancelling = Session::new("attic", repo.clone(), Arc::new(ScriptedProvider::new([None])));
    let err = cancelling
        .submit("ada", Action::UseTool { tool: Tool::CrystalBall })
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Rejected(Rejected::ChoiceCancelled)));

    let after = cancelling.state().await.unwrap();
    assert!(after.has_tool("ada", Tool::CrystalBall));
    assert_eq!(after, state);
}
