use test_utils::*;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use chess_engine::{
    evaluation::Evaluation,
    search::{SearchLimits, SearchResult, Searcher},
    types::{GameState, Side},
};

const FOOLS_MATE_FEN: &str = "rnbqkbnr/ppppp2p/5p2/6p1/3PP3/8/PPP2PPP/RNBQKBNR w KQkq - 0 3";

fn search(fen: &str, limits: SearchLimits) -> SearchResult {
    let mut position = position_from_fen(fen);
    Searcher::new(limits, Arc::new(AtomicBool::new(false)))
        .search(&mut position)
        .expect("search should succeed")
}

mod forced_moves {
    use super::*;

    #[test]
    fn single_legal_move_is_returned() {
        let result = search("7k/8/8/8/8/8/1r6/K7 w - - 0 1", SearchLimits::Depth(3));

        assert_eq!(
            result.best_move.map(|mv| mv.to_string()),
            Some("a1b2".to_string()),
            "Kxb2 is the only legal move"
        );
        assert_eq!(result.depth, 3);
    }

    #[test]
    fn finds_mate_in_one() {
        let result = search(FOOLS_MATE_FEN, SearchLimits::Depth(1));
        let best_move = result.best_move.expect("a move is available");

        assert_eq!(best_move.to_string(), "d1h5");
        assert_eq!(
            result.evaluation,
            Evaluation::ForcedMate {
                winner: Side::White,
                plies: 1
            }
        );
        assert_eq!(result.evaluation.mate_in_moves(), Some(1));

        let mut position = position_from_fen(FOOLS_MATE_FEN);
        let mut after = best_move.simulate(&position).expect("legal move");
        assert_eq!(after.game_state(), GameState::WhiteWon);
        assert!(after.legal_moves().is_empty());
        assert!(after.is_check());
        assert_eq!(position.game_state(), GameState::Ongoing);
    }

    #[test]
    fn black_finds_mate_in_one() {
        let mut position = position_from_fen(START_FEN);
        play(&mut position, &["f2f3", "e7e5", "g2g4"]);

        let result = Searcher::new(SearchLimits::Depth(1), Arc::new(AtomicBool::new(false)))
            .search(&mut position)
            .expect("search should succeed");

        assert_eq!(result.best_move.map(|mv| mv.to_string()), Some("d8h4".to_string()));
        assert_eq!(
            result.evaluation,
            Evaluation::ForcedMate {
                winner: Side::Black,
                plies: 1
            }
        );
    }

    #[test]
    fn search_leaves_the_root_untouched() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let mut position = position_from_fen(fen);
        Searcher::new(SearchLimits::Depth(1), Arc::new(AtomicBool::new(false)))
            .search(&mut position)
            .expect("search should succeed");

        assert_eq!(position.to_fen(), fen);
        assert!(position.history().is_empty());
    }
}

mod limits {
    use super::*;

    #[test]
    fn node_budget_is_respected() {
        let result = search(START_FEN, SearchLimits::Nodes(500));

        assert!(result.best_move.is_some());
        assert!(
            result.stats.nodes + result.stats.qnodes <= 500,
            "Searched {} nodes",
            result.stats.nodes + result.stats.qnodes
        );
    }

    #[test]
    fn raised_stop_flag_keeps_the_fallback_move() {
        let mut position = position_from_fen(START_FEN);
        let stop = Arc::new(AtomicBool::new(true));
        let result = Searcher::new(SearchLimits::Infinite, stop)
            .search(&mut position)
            .expect("search should succeed");

        assert_eq!(result.depth, 0);
        assert!(result.best_move.is_some(), "First legal move is the fallback");
        assert_eq!(result.evaluation, Evaluation::Centipawns(0));
    }

    #[test]
    fn stop_flag_ends_an_infinite_search() {
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);

        let worker = std::thread::spawn(move || {
            let mut position = position_from_fen(KIWIPETE_FEN);
            Searcher::new(SearchLimits::Infinite, worker_stop).search(&mut position)
        });

        std::thread::sleep(Duration::from_millis(200));
        stop.store(true, Ordering::Relaxed);

        let result = worker
            .join()
            .expect("worker should not panic")
            .expect("search should succeed");
        assert!(result.best_move.is_some());
    }

    #[test]
    fn timed_search_stops_early_on_mate() {
        let result = search(FOOLS_MATE_FEN, SearchLimits::MoveTime(30_000));

        assert_eq!(result.best_move.map(|mv| mv.to_string()), Some("d1h5".to_string()));
        assert_eq!(result.depth, 0, "Mate is proven by the first iteration");
        assert!(result.elapsed < Duration::from_secs(30));
    }
}

mod progress {
    use super::*;

    #[test]
    fn one_report_per_iteration() {
        let mut position = position_from_fen(START_FEN);
        let mut depths = Vec::new();

        let result = Searcher::new(SearchLimits::Depth(2), Arc::new(AtomicBool::new(false)))
            .search_with_progress(&mut position, |iteration| depths.push(iteration.depth))
            .expect("search should succeed");

        assert_eq!(depths, vec![0, 1, 2]);
        assert_eq!(result.depth, 2);
        assert!(result.stats.nodes > 0);
        assert!(result.stats.evaluations > 0);
    }
}

mod terminal_roots {
    use super::*;

    #[test]
    fn stalemated_root_has_no_move() {
        let result = search("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", SearchLimits::Depth(2));

        assert!(result.best_move.is_none());
        assert_eq!(result.evaluation, Evaluation::GameOver { winner: None });
    }

    #[test]
    fn checkmated_root_reports_the_winner() {
        let mut position = position_from_fen(START_FEN);
        play(&mut position, &["f2f3", "e7e5", "g2g4", "d8h4"]);

        let result = Searcher::new(SearchLimits::Depth(2), Arc::new(AtomicBool::new(false)))
            .search(&mut position)
            .expect("search should succeed");

        assert!(result.best_move.is_none());
        assert_eq!(
            result.evaluation,
            Evaluation::GameOver {
                winner: Some(Side::Black)
            }
        );
    }
}
