use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use tracing::{debug, info};

use crate::{
    constants::MAX_SEARCH_DEPTH,
    error::SearchError,
    evaluation::Evaluation,
    evaluator::Evaluator,
    moves::Move,
    ordering::{OrderedMove, order_moves},
    position::Position,
    time::TimeManager,
    types::{GameState, Side},
};

/// What ends a search, besides an external stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchLimits {
    /// Remaining clock and increment per side, in milliseconds
    Clock {
        white_time_ms: u64,
        black_time_ms: u64,
        white_increment_ms: u64,
        black_increment_ms: u64,
    },
    Depth(u16),
    MoveTime(u64),
    Nodes(u64),
    Infinite,
}

impl SearchLimits {
    pub fn max_depth(&self) -> u16 {
        match *self {
            SearchLimits::Depth(depth) => depth.min(MAX_SEARCH_DEPTH),
            _ => MAX_SEARCH_DEPTH,
        }
    }

    pub fn node_limit(&self) -> Option<u64> {
        match *self {
            SearchLimits::Nodes(nodes) => Some(nodes),
            _ => None,
        }
    }

    fn time_manager(&self, side: Side, fullmove_number: u32) -> TimeManager {
        match *self {
            SearchLimits::Clock {
                white_time_ms,
                black_time_ms,
                white_increment_ms,
                black_increment_ms,
            } => {
                let (time_left, increment) = match side {
                    Side::White => (white_time_ms, white_increment_ms),
                    Side::Black => (black_time_ms, black_increment_ms),
                };
                TimeManager::for_clock(time_left, increment, fullmove_number)
            }
            SearchLimits::MoveTime(movetime_ms) => TimeManager::fixed(movetime_ms),
            SearchLimits::Depth(_) | SearchLimits::Nodes(_) | SearchLimits::Infinite => {
                TimeManager::unlimited()
            }
        }
    }

    /// Whether a proven mate may end the search before its limit.
    fn stops_on_mate(&self) -> bool {
        matches!(
            self,
            SearchLimits::Clock { .. } | SearchLimits::MoveTime(_) | SearchLimits::Nodes(_)
        )
    }
}

/// Counters for one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub qnodes: u64,
    pub evaluations: u64,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub evaluation: Evaluation,
    /// Depth of the last completed iteration
    pub depth: u16,
    pub stats: SearchStats,
    pub elapsed: Duration,
}

/// Iterative-deepening alpha-beta search over one root position.
///
/// Only completed iterations update the result, so a stop in the middle of
/// an iteration keeps the previous best move.
pub struct Searcher {
    limits: SearchLimits,
    evaluator: Evaluator,
    stop: Arc<AtomicBool>,
    time: TimeManager,
    stats: SearchStats,
    aborted: bool,
}

impl Searcher {
    pub fn new(limits: SearchLimits, stop: Arc<AtomicBool>) -> Self {
        Self {
            limits,
            evaluator: Evaluator::default(),
            stop,
            time: TimeManager::unlimited(),
            stats: SearchStats::default(),
            aborted: false,
        }
    }

    pub fn with_evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn search(&mut self, root: &mut Position) -> Result<SearchResult, SearchError> {
        self.search_with_progress(root, |_| {})
    }

    /// `on_iteration` runs after every completed iteration.
    pub fn search_with_progress<F>(
        &mut self,
        root: &mut Position,
        mut on_iteration: F,
    ) -> Result<SearchResult, SearchError>
    where
        F: FnMut(&SearchResult),
    {
        self.time = self
            .limits
            .time_manager(root.side_to_move(), root.fullmove_number());
        self.stats = SearchStats::default();
        self.aborted = false;

        info!(limits = ?self.limits, fen = %root.to_fen(), "search started");

        let legal_moves = root.legal_moves().to_vec();
        let mut result = SearchResult {
            best_move: legal_moves.first().copied(),
            evaluation: self.evaluate(root),
            depth: 0,
            stats: self.stats,
            elapsed: Duration::ZERO,
        };

        if legal_moves.is_empty() {
            result.elapsed = self.time.elapsed();
            return Ok(result);
        }

        let mut root_moves = order_moves(root, &legal_moves)?;
        let mut last_iteration = Duration::ZERO;

        for depth in 0..=self.limits.max_depth() {
            if depth > 0 && !self.time.can_start_iteration(last_iteration) {
                break;
            }

            let started = Instant::now();
            let Some((best_index, evaluation)) = self.search_root(&mut root_moves, depth)? else {
                break;
            };
            last_iteration = started.elapsed();

            // Previous best is tried first in the next iteration
            let best = root_moves.remove(best_index);
            root_moves.insert(0, best);

            result.best_move = Some(root_moves[0].mv);
            result.evaluation = evaluation;
            result.depth = depth;
            result.stats = self.stats;
            result.elapsed = self.time.elapsed();

            debug!(
                depth,
                evaluation = %evaluation,
                best_move = %root_moves[0].mv,
                nodes = self.stats.nodes,
                qnodes = self.stats.qnodes,
                "iteration complete"
            );
            on_iteration(&result);

            if evaluation.is_decisive() && self.limits.stops_on_mate() {
                break;
            }
        }

        result.stats = self.stats;
        result.elapsed = self.time.elapsed();

        info!(
            depth = result.depth,
            evaluation = %result.evaluation,
            nodes = result.stats.nodes,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "search finished"
        );

        Ok(result)
    }

    /// Index of the best root move and its value, or `None` if the iteration
    /// was cut short.
    fn search_root(
        &mut self,
        root_moves: &mut [OrderedMove],
        depth: u16,
    ) -> Result<Option<(usize, Evaluation)>, SearchError> {
        let Some(side) = root_moves.first().map(|entry| entry.mv.side()) else {
            return Ok(None);
        };

        let mut alpha = Evaluation::worst_for(Side::White);
        let mut beta = Evaluation::worst_for(Side::Black);
        let mut best: Option<(usize, Evaluation)> = None;

        for (index, child) in root_moves.iter_mut().enumerate() {
            let evaluation = self
                .minimax(&mut child.position, depth, alpha, beta)?
                .tick();
            if self.aborted {
                return Ok(None);
            }

            if best.is_none_or(|(_, current)| evaluation.is_better_for(side, &current)) {
                best = Some((index, evaluation));
            }
            narrow_window(side, evaluation, &mut alpha, &mut beta);
        }

        Ok(best)
    }

    /// Value of `position` in its own frame. Callers tick it.
    fn minimax(
        &mut self,
        position: &mut Position,
        depth: u16,
        mut alpha: Evaluation,
        mut beta: Evaluation,
    ) -> Result<Evaluation, SearchError> {
        let side = position.side_to_move();
        if self.should_stop() {
            return Ok(Evaluation::worst_for(side));
        }
        self.stats.nodes += 1;

        if position.game_state() != GameState::Ongoing {
            return Ok(self.evaluate(position));
        }
        if depth == 0 {
            return self.quiescence(position, alpha, beta);
        }

        let moves = position.legal_moves().to_vec();
        let mut children = order_moves(position, &moves)?;
        let mut best = Evaluation::worst_for(side);

        for child in children.iter_mut() {
            let evaluation = self
                .minimax(&mut child.position, depth - 1, alpha, beta)?
                .tick();
            if self.aborted {
                return Ok(Evaluation::worst_for(side));
            }

            if evaluation.is_better_for(side, &best) {
                best = evaluation;
            }
            narrow_window(side, evaluation, &mut alpha, &mut beta);
            if beta.key() <= alpha.key() {
                break;
            }
        }

        Ok(best)
    }

    /// Captures only, with the static evaluation as a stand-pat floor.
    fn quiescence(
        &mut self,
        position: &mut Position,
        mut alpha: Evaluation,
        mut beta: Evaluation,
    ) -> Result<Evaluation, SearchError> {
        let side = position.side_to_move();
        if self.should_stop() {
            return Ok(Evaluation::worst_for(side));
        }
        self.stats.qnodes += 1;

        let stand_pat = self.evaluate(position);
        if matches!(stand_pat, Evaluation::GameOver { .. }) {
            return Ok(stand_pat);
        }

        match side {
            Side::White if stand_pat.key() >= beta.key() => return Ok(stand_pat),
            Side::Black if stand_pat.key() <= alpha.key() => return Ok(stand_pat),
            _ => narrow_window(side, stand_pat, &mut alpha, &mut beta),
        }

        let captures: Vec<Move> = position
            .legal_moves()
            .iter()
            .filter(|mv| mv.is_capture())
            .copied()
            .collect();
        let mut children = order_moves(position, &captures)?;
        let mut best = stand_pat;

        for child in children.iter_mut() {
            let evaluation = self
                .quiescence(&mut child.position, alpha, beta)?
                .tick();
            if self.aborted {
                return Ok(Evaluation::worst_for(side));
            }

            if evaluation.is_better_for(side, &best) {
                best = evaluation;
            }
            narrow_window(side, evaluation, &mut alpha, &mut beta);
            if beta.key() <= alpha.key() {
                break;
            }
        }

        Ok(best)
    }

    fn evaluate(&mut self, position: &mut Position) -> Evaluation {
        self.stats.evaluations += 1;
        self.evaluator.evaluate(position)
    }

    /// Polled on entry to every node.
    fn should_stop(&mut self) -> bool {
        if self.aborted {
            return true;
        }

        let searched = self.stats.nodes + self.stats.qnodes;
        self.aborted = self.stop.load(Ordering::Relaxed)
            || self.limits.node_limit().is_some_and(|limit| searched >= limit)
            || self.time.is_hard_limit_reached();

        self.aborted
    }
}

/// White raises alpha, black lowers beta.
fn narrow_window(side: Side, evaluation: Evaluation, alpha: &mut Evaluation, beta: &mut Evaluation) {
    match side {
        Side::White if evaluation.key() > alpha.key() => *alpha = evaluation,
        Side::Black if evaluation.key() < beta.key() => *beta = evaluation,
        _ => {}
    }
}
