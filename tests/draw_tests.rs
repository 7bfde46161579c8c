use test_utils::*;

use chess_engine::types::GameState;

mod fifty_move_rule {
    use super::*;

    #[test]
    fn hundredth_halfmove_draws() {
        let mut position = position_from_fen("k7/8/8/8/8/8/8/K6N w - - 99 60");
        assert_eq!(position.game_state(), GameState::Ongoing);

        play(&mut position, &["h1g3"]);
        assert_eq!(position.halfmove_clock(), 100);
        assert_eq!(
            position.game_state(),
            GameState::Draw,
            "Halfmove clock at 100 should draw"
        );
    }

    #[test]
    fn pawn_move_resets_the_clock() {
        let mut position = position_from_fen("4k3/4p3/8/8/8/8/4P3/3K4 w - - 40 1");
        play(&mut position, &["d1c1"]);
        assert_eq!(position.halfmove_clock(), 41);

        play(&mut position, &["e7e6"]);
        assert_eq!(position.halfmove_clock(), 0, "Pawn move resets the clock");
    }

    #[test]
    fn capture_resets_the_clock() {
        let mut position = position_from_fen("4k3/8/8/8/8/8/3r4/4K3 w - - 57 30");
        play(&mut position, &["e1d2"]);
        assert_eq!(position.halfmove_clock(), 0, "Capture resets the clock");
    }
}

mod repetition {
    use super::*;

    const SHUFFLE: [&str; 4] = ["g1f3", "g8f6", "f3g1", "f6g8"];

    #[test]
    fn loaded_position_counts_once() {
        let position = position_from_fen(START_FEN);
        assert_eq!(position.repetition_count(), 1);
    }

    #[test]
    fn threefold_repetition_draws() {
        let mut position = position_from_fen(START_FEN);

        play(&mut position, &SHUFFLE);
        assert_eq!(position.repetition_count(), 2);
        assert_eq!(position.game_state(), GameState::Ongoing);

        play(&mut position, &SHUFFLE);
        assert_eq!(position.repetition_count(), 3);
        assert_eq!(
            position.game_state(),
            GameState::Draw,
            "Third occurrence of the start placement should draw"
        );
    }

    #[test]
    fn irreversible_moves_clear_the_table() {
        let mut position = position_from_fen(START_FEN);
        play(&mut position, &SHUFFLE);
        play(&mut position, &["e2e4"]);
        assert_eq!(position.repetition_count(), 1);

        play(&mut position, &["g8f6", "g1f3", "f6g8", "f3g1"]);
        assert_eq!(position.repetition_count(), 2);
        assert_eq!(position.game_state(), GameState::Ongoing);
    }
}

mod terminal {
    use super::*;

    #[test]
    fn stalemate_is_a_draw() {
        let mut position = position_from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");

        assert!(!position.is_check());
        assert!(position.legal_moves().is_empty());
        assert_eq!(position.game_state(), GameState::Draw);
    }

    #[test]
    fn checkmate_is_a_win() {
        let mut position = position_from_fen(START_FEN);
        play(&mut position, &["f2f3", "e7e5", "g2g4", "d8h4"]);

        assert!(position.is_check());
        assert_eq!(position.game_state(), GameState::BlackWon);
    }

    #[test]
    fn checkmate_beats_the_fifty_move_rule() {
        let mut position = position_from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 99 80");
        play(&mut position, &["a1a8"]);

        assert_eq!(position.halfmove_clock(), 100);
        assert_eq!(position.game_state(), GameState::WhiteWon);
    }
}
