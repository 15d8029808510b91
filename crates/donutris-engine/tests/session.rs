use donutris_engine::{
    Cell, Command, GameConfig, GameSession, PieceCatalog, PieceColor, PieceSeed, PieceTemplate,
    SessionState,
};

fn config(ring_count: usize, segments_per_ring: usize, offsets: &[(i32, i32)]) -> GameConfig {
    GameConfig {
        ring_count,
        segments_per_ring,
        catalog: PieceCatalog::new(vec![PieceTemplate::from_offsets(
            "test",
            offsets,
            PieceColor::new(0x12, 0x34, 0x56),
        )])
        .unwrap(),
        ..GameConfig::default()
    }
}

#[test]
fn full_game_with_reference_config() {
    let mut session = GameSession::new(GameConfig::default(), PieceSeed::from(2024)).unwrap();
    let mut placements = 0;
    let mut ticks = 0;
    while session.session_state() == SessionState::Active && ticks < 100_000 {
        if !session.tick() {
            placements += 1;
        }
        ticks += 1;
        // Board cells never leave the grid and ring 0 stays clear while playing
        if session.session_state().is_active() {
            assert!(!session.board().is_danger_zone_violated());
            assert!(session.falling_piece().is_some());
        }
    }
    assert!(session.session_state().is_game_over());
    assert!(session.falling_piece().is_none());
    assert_eq!(session.stats().completed_pieces(), placements);
    assert_eq!(session.ticks(), ticks);
    assert_eq!(
        session.stats().score(),
        session.stats().total_cleared_rings() * 100
    );
}

#[test]
fn spreading_pieces_clears_rings() {
    // Two-cell arcs on a 2x4 board: shifting every other piece fills ring 1
    let mut session =
        GameSession::new(config(2, 4, &[(0, 0), (0, 1)]), PieceSeed::from(5)).unwrap();
    for _ in 0..200 {
        if session.session_state().is_game_over() {
            break;
        }
        let segment = session.falling_piece().unwrap().segment();
        let target = if session.board().is_occupied(1, 0).unwrap() { 2 } else { 0 };
        let command = if segment == target {
            Command::ForceMoveInward
        } else {
            Command::ShiftRight
        };
        session.apply(command);
    }
    assert!(session.stats().total_cleared_rings() > 0);
    assert_eq!(
        session.stats().score(),
        session.stats().total_cleared_rings() * 100
    );
}

#[test]
fn restart_after_game_over_gives_fresh_game() {
    let mut session =
        GameSession::new(config(2, 4, &[(0, 0), (1, 0)]), PieceSeed::from(1)).unwrap();
    session.tick();
    assert!(session.session_state().is_game_over());
    assert!(
        session
            .board()
            .rings()
            .iter()
            .flat_map(|r| r.cells())
            .any(|c| *c != Cell::Empty)
    );

    session.apply(Command::Restart);
    assert!(session.session_state().is_active());
    assert_eq!(session.board().occupied_count(), 0);
    assert_eq!(session.stats().score(), 0);
}
