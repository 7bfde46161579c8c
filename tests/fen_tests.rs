use test_utils::*;

use chess_engine::{
    error::FenError,
    position::Position,
    types::{CastleSide, Piece, Side, Square},
};

mod round_trip {
    use super::*;

    #[test]
    fn standard_positions_round_trip() {
        for fen in [
            START_FEN,
            KIWIPETE_FEN,
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
            "r3k2r/8/8/8/8/8/8/R3K2R b Qk - 12 40",
        ] {
            assert_eq!(position_from_fen(fen).to_fen(), fen, "FEN should round trip");
        }
    }

    #[test]
    fn fields_are_loaded() {
        let position =
            position_from_fen("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR b Kq e3 3 7");

        assert_eq!(position.side_to_move(), Side::Black);
        assert!(position.castling_right(Side::White, CastleSide::Short));
        assert!(!position.castling_right(Side::White, CastleSide::Long));
        assert!(!position.castling_right(Side::Black, CastleSide::Short));
        assert!(position.castling_right(Side::Black, CastleSide::Long));
        assert_eq!(position.en_passant(), Some(Square::E3));
        assert_eq!(position.halfmove_clock(), 3);
        assert_eq!(position.fullmove_number(), 7);
        assert_eq!(position.piece_at(Square::E4), Some((Side::White, Piece::Pawn)));
        assert_eq!(position.piece_at(Square::D8), Some((Side::Black, Piece::Queen)));
        assert_eq!(position.piece_at(Square::E2), None);
    }

    #[test]
    fn new_is_the_start_position() {
        assert_eq!(Position::new().to_fen(), START_FEN);
        assert_eq!(Position::default().to_fen(), START_FEN);
    }
}

mod malformed {
    use super::*;

    fn error_of(fen: &str) -> FenError {
        Position::from_fen(fen).expect_err("FEN should be rejected")
    }

    #[test]
    fn wrong_field_count() {
        assert_eq!(
            error_of("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"),
            FenError::FieldCount(4)
        );
    }

    #[test]
    fn wrong_rank_count() {
        assert_eq!(
            error_of("rnbqkbnr/pppppppp/8/8/8/8/RNBQKBNR w KQkq - 0 1"),
            FenError::RankCount(7)
        );
    }

    #[test]
    fn unknown_piece_letter() {
        assert_eq!(
            error_of("rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            FenError::InvalidPiece('x')
        );
    }

    #[test]
    fn ranks_must_have_eight_files() {
        assert_eq!(
            error_of("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            FenError::RankWidth { rank: 7 }
        );
        assert_eq!(
            error_of("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            FenError::InvalidPiece('9')
        );
        assert_eq!(
            error_of("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNRR w KQkq - 0 1"),
            FenError::RankWidth { rank: 1 }
        );
    }

    #[test]
    fn bad_side_castling_and_en_passant() {
        assert!(matches!(
            error_of("4k3/8/8/8/8/8/8/4K3 x - - 0 1"),
            FenError::SideToMove(_)
        ));
        assert!(matches!(
            error_of("4k3/8/8/8/8/8/8/4K3 w KX - 0 1"),
            FenError::Castling(_)
        ));
        assert!(matches!(
            error_of("4k3/8/8/8/8/8/8/4K3 w - e9 0 1"),
            FenError::EnPassant(_)
        ));
    }

    #[test]
    fn bad_counters() {
        assert!(matches!(
            error_of("4k3/8/8/8/8/8/8/4K3 w - - x 1"),
            FenError::Counter { field: "halfmove clock", .. }
        ));
        assert!(matches!(
            error_of("4k3/8/8/8/8/8/8/4K3 w - - 0 -1"),
            FenError::Counter { field: "fullmove number", .. }
        ));
    }

    #[test]
    fn exactly_one_king_per_side() {
        assert_eq!(
            error_of("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            FenError::KingCount {
                side: Side::Black,
                count: 0
            }
        );
        assert_eq!(
            error_of("4k3/8/8/8/8/8/8/3KK3 w - - 0 1"),
            FenError::KingCount {
                side: Side::White,
                count: 2
            }
        );
    }
}

mod fallback {
    use super::*;

    #[test]
    fn invalid_fen_falls_back_to_start() {
        assert_eq!(Position::from_fen_or_start("not a fen").to_fen(), START_FEN);
    }

    #[test]
    fn load_fen_leaves_position_untouched_on_failure() {
        let mut position = position_from_fen(KIWIPETE_FEN);
        assert!(position.load_fen("garbage").is_err());
        assert_eq!(position.to_fen(), KIWIPETE_FEN);

        position.load_fen(START_FEN).expect("valid FEN");
        assert_eq!(position.to_fen(), START_FEN);
    }
}

mod preview {
    use super::*;

    #[test]
    fn start_position_preview() {
        let preview = Position::new().to_string();
        let lines: Vec<&str> = preview.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "rnbqkbnr");
        assert_eq!(lines[3], "--------");
        assert_eq!(lines[7], "RNBQKBNR");
    }
}
