use std::{
    any::Any,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
};

use tracing::info;

use crate::{
    constants::{DEFAULT_PLAYER_INCREMENT_MS, DEFAULT_PLAYER_TIME_REMAINING_MS},
    error::{EngineError, MoveError, SearchError},
    evaluator::Evaluator,
    moves::Move,
    position::Position,
    search::{SearchLimits, SearchResult, Searcher},
};

/// Owns the live game and starts searches on snapshots of it.
pub struct Engine {
    pub position: Position,
    pub search_settings: SearchSettings,
    pub evaluator: Evaluator,
}

/// Raw `go` parameters. Fixed-depth, fixed-node, fixed-time and infinite
/// searches take precedence over the clock, in that order after infinite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub wtime: u64,
    pub btime: u64,
    pub winc: u64,
    pub binc: u64,
    pub movetime: Option<u64>,
    pub max_depth: Option<u16>,
    pub max_nodes: Option<u64>,
    pub infinite: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            wtime: DEFAULT_PLAYER_TIME_REMAINING_MS,
            btime: DEFAULT_PLAYER_TIME_REMAINING_MS,
            winc: DEFAULT_PLAYER_INCREMENT_MS,
            binc: DEFAULT_PLAYER_INCREMENT_MS,
            movetime: None,
            max_depth: None,
            max_nodes: None,
            infinite: false,
        }
    }
}

impl SearchSettings {
    pub fn limits(&self) -> SearchLimits {
        if self.infinite {
            return SearchLimits::Infinite;
        }
        if let Some(depth) = self.max_depth {
            return SearchLimits::Depth(depth);
        }
        if let Some(nodes) = self.max_nodes {
            return SearchLimits::Nodes(nodes);
        }
        if let Some(movetime) = self.movetime {
            return SearchLimits::MoveTime(movetime);
        }

        SearchLimits::Clock {
            white_time_ms: self.wtime,
            black_time_ms: self.btime,
            white_increment_ms: self.winc,
            black_increment_ms: self.binc,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(SearchSettings::default())
    }
}

impl Engine {
    pub fn new(search_settings: SearchSettings) -> Self {
        Self {
            position: Position::new(),
            search_settings,
            evaluator: Evaluator::default(),
        }
    }

    pub fn new_game(&mut self) {
        self.position = Position::new();
    }

    /// Loads `fen` (or the start position) and plays `moves` on it. The live
    /// position only changes if everything parses and every move is legal.
    pub fn set_position(&mut self, fen: Option<&str>, moves: &[&str]) -> Result<(), EngineError> {
        let mut position = match fen {
            Some(fen) => Position::from_fen(fen)?,
            None => Position::new(),
        };

        for text in moves {
            position.apply_long_algebraic(text)?;
        }

        self.position = position;
        Ok(())
    }

    pub fn play_move(&mut self, text: &str) -> Result<Move, MoveError> {
        self.position.apply_long_algebraic(text)
    }

    /// Searches on the calling thread.
    pub fn think(&self) -> Result<SearchResult, SearchError> {
        let mut root = self.position.clone();
        Searcher::new(self.search_settings.limits(), Arc::new(AtomicBool::new(false)))
            .with_evaluator(self.evaluator.clone())
            .search(&mut root)
    }

    /// Searches a snapshot of the live position on a worker thread.
    /// `on_iteration` runs on the worker after every completed iteration.
    pub fn start_search<F>(&self, on_iteration: F) -> SearchHandle
    where
        F: FnMut(&SearchResult) + Send + 'static,
    {
        SearchHandle::spawn(
            self.position.clone(),
            self.search_settings.limits(),
            self.evaluator.clone(),
            on_iteration,
        )
    }
}

/// A running search. Dropping the handle detaches the worker, which keeps
/// running until its limits are reached.
pub struct SearchHandle {
    stop: Arc<AtomicBool>,
    worker: JoinHandle<Result<SearchResult, SearchError>>,
}

impl SearchHandle {
    pub fn spawn<F>(
        mut root: Position,
        limits: SearchLimits,
        evaluator: Evaluator,
        on_iteration: F,
    ) -> Self
    where
        F: FnMut(&SearchResult) + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);

        info!(?limits, "starting search worker");
        let worker = thread::spawn(move || {
            Searcher::new(limits, worker_stop)
                .with_evaluator(evaluator)
                .search_with_progress(&mut root, on_iteration)
        });

        Self { stop, worker }
    }

    /// Shared flag the worker polls at every node.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Signals the worker and waits for its result.
    pub fn stop(self) -> Result<SearchResult, SearchError> {
        self.stop.store(true, Ordering::Relaxed);
        self.join()
    }

    /// Waits for the worker to reach its limits. A panic inside the worker
    /// comes back as `SearchError::WorkerPanicked`.
    pub fn join(self) -> Result<SearchResult, SearchError> {
        match self.worker.join() {
            Ok(result) => result,
            Err(payload) => Err(SearchError::WorkerPanicked(panic_message(payload.as_ref()))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
