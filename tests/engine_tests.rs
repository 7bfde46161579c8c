use test_utils::*;

use std::sync::mpsc;
use std::time::Duration;

use chess_engine::{
    engine::{Engine, SearchSettings},
    uci::UciSession,
};

mod game_control {
    use super::*;

    const ITALIAN_FEN: &str = "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3";

    #[test]
    fn play_move_updates_the_live_position() {
        let mut engine = Engine::default();
        engine.play_move("e2e4").expect("legal move");
        assert_eq!(
            engine.position.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );

        assert!(engine.play_move("e2e4").is_err());
        assert_eq!(engine.position.history().len(), 1);
    }

    #[test]
    fn new_game_resets_the_board() {
        let mut engine = engine_from_fen(KIWIPETE_FEN, 1);
        engine.new_game();
        assert_eq!(engine.position.to_fen(), START_FEN);
    }

    #[test]
    fn think_returns_a_legal_move() {
        let mut engine = engine_from_fen(ITALIAN_FEN, 1);
        let result = engine.think().expect("search should succeed");
        let best_move = result.best_move.expect("position has legal moves");

        assert!(engine.position.legal_moves().contains(&best_move));
        assert_eq!(result.depth, 1);
    }
}

mod background_search {
    use super::*;

    #[test]
    fn worker_reports_iterations_and_finishes() {
        let engine = engine_from_fen(START_FEN, 1);
        let (sender, receiver) = mpsc::channel();

        let handle = engine.start_search(move |result| {
            let _ = sender.send(result.depth);
        });
        let result = handle.join().expect("search should succeed");

        let depths: Vec<u16> = receiver.try_iter().collect();
        assert_eq!(depths, vec![0, 1]);
        assert_eq!(result.depth, 1);
    }

    #[test]
    fn stop_ends_an_infinite_search() {
        let engine = Engine::new(SearchSettings {
            infinite: true,
            ..SearchSettings::default()
        });

        let handle = engine.start_search(|_| {});
        std::thread::sleep(Duration::from_millis(100));
        assert!(!handle.is_finished(), "Infinite search runs until stopped");

        let result = handle.stop().expect("search should succeed");
        assert!(result.best_move.is_some());
    }

    #[test]
    fn worker_searches_a_snapshot() {
        let mut engine = engine_from_fen(START_FEN, 1);
        let handle = engine.start_search(|_| {});
        engine.play_move("d2d4").expect("legal move");

        let result = handle.join().expect("search should succeed");
        let best_move = result.best_move.expect("start position has moves");
        assert_eq!(best_move.side(), chess_engine::types::Side::White);
    }
}

mod uci_session {
    use super::*;

    #[test]
    fn position_commands_update_the_engine() {
        let mut session = UciSession::new(Engine::default());

        assert!(session.handle_command("position startpos moves e2e4 c7c5"));
        assert_eq!(
            session.engine().position.to_fen(),
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2"
        );

        assert!(session.handle_command(&format!("position fen {KIWIPETE_FEN}")));
        assert_eq!(session.engine().position.to_fen(), KIWIPETE_FEN);
    }

    #[test]
    fn rejected_position_keeps_the_previous_one() {
        let mut session = UciSession::new(Engine::default());
        session.handle_command("position startpos moves e2e4");
        let before = session.engine().position.to_fen();

        assert!(session.handle_command("position startpos moves e2e4 e2e4"));
        assert_eq!(session.engine().position.to_fen(), before);
    }

    #[test]
    fn go_then_stop_and_quit() {
        let mut session = UciSession::new(Engine::default());

        assert!(session.handle_command("ucinewgame"));
        assert!(session.handle_command("go infinite"));
        std::thread::sleep(Duration::from_millis(50));
        assert!(session.handle_command("stop"));
        assert!(session.handle_command("go depth 1"));
        assert!(!session.handle_command("quit"), "quit ends the loop");
    }

    #[test]
    fn blank_and_unknown_commands_are_ignored() {
        let mut session = UciSession::new(Engine::default());
        assert!(session.handle_command(""));
        assert!(session.handle_command("   "));
        assert!(session.handle_command("xyzzy"));
        assert_eq!(session.engine().position.to_fen(), START_FEN);
    }
}
