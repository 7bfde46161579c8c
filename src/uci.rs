use std::{
    io::{self, BufRead, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
};

use tracing::{error, warn};

use crate::{
    engine::{Engine, SearchSettings},
    error::EngineError,
    search::SearchResult,
    types::Side,
};

const ENGINE_NAME: &str = "Bitboard Alpha-Beta";
const ENGINE_AUTHOR: &str = "Brendan Dagys";

/// A search running in the background. Its reporter thread prints
/// `bestmove` once the worker finishes.
struct ActiveSearch {
    stop: Arc<AtomicBool>,
    reporter: JoinHandle<()>,
}

pub struct UciSession {
    engine: Engine,
    search: Option<ActiveSearch>,
}

pub fn uci_loop(engine: Engine) {
    let mut session = UciSession::new(engine);
    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };

        if !session.handle_command(&line) {
            break;
        }
    }

    session.finish_search();
}

impl UciSession {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            search: None,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Returns `false` on `quit`.
    pub fn handle_command(&mut self, input: &str) -> bool {
        let input = input.trim();
        let Some(command) = input.split_whitespace().next() else {
            return true;
        };

        match command {
            "uci" => {
                println!("id name {ENGINE_NAME}");
                println!("id author {ENGINE_AUTHOR}");
                println!("uciok");
            }
            "isready" => println!("readyok"),
            "ucinewgame" => {
                self.finish_search();
                self.engine.new_game();
            }
            "position" => {
                self.finish_search();
                if let Err(error) = parse_position_command(&mut self.engine, input) {
                    warn!(%error, input, "rejected position command");
                    println!("info string error {error}");
                }
            }
            "go" => {
                self.finish_search();
                self.engine.search_settings = parse_go_command(input);
                self.start_search();
            }
            "stop" => self.finish_search(),
            "quit" => {
                self.finish_search();
                return false;
            }
            "d" | "display" => {
                print!("{}", self.engine.position);
                println!("Fen: {}", self.engine.position.to_fen());
            }
            _ => warn!(input, "unknown command"),
        }

        if let Err(error) = io::stdout().flush() {
            error!(%error, "failed to flush stdout");
        }

        true
    }

    fn start_search(&mut self) {
        let side = self.engine.position.side_to_move();
        let handle = self
            .engine
            .start_search(move |result: &SearchResult| println!("{}", info_line(result, side)));
        let stop = handle.stop_flag();

        let reporter = thread::spawn(move || {
            let best_move = match handle.join() {
                Ok(result) => result
                    .best_move
                    .map_or_else(|| "0000".to_string(), |mv| mv.to_string()),
                Err(error) => {
                    error!(%error, "search failed");
                    "0000".to_string()
                }
            };
            println!("bestmove {best_move}");
        });

        self.search = Some(ActiveSearch { stop, reporter });
    }

    /// Stops any running search and waits for its `bestmove`.
    pub fn finish_search(&mut self) {
        if let Some(active) = self.search.take() {
            active.stop.store(true, Ordering::Relaxed);
            if active.reporter.join().is_err() {
                error!("search reporter panicked");
            }
        }
    }
}

pub fn info_line(result: &SearchResult, side_to_move: Side) -> String {
    let mut line = format!(
        "info depth {} score {} nodes {} time {}",
        result.depth,
        result.evaluation.uci_score(side_to_move),
        result.stats.nodes + result.stats.qnodes,
        result.elapsed.as_millis()
    );

    if let Some(best_move) = result.best_move {
        line.push_str(&format!(" pv {best_move}"));
    }

    line
}

/// Parse UCI position command
/// Examples:
///   position startpos
///   position startpos moves e2e4 e7e5
///   position fen rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 moves e2e4
pub fn parse_position_command(engine: &mut Engine, command: &str) -> Result<(), EngineError> {
    let parts: Vec<&str> = command.split_whitespace().collect();
    let moves_index = parts.iter().position(|&part| part == "moves");
    let setup = parts
        .get(1..moves_index.unwrap_or(parts.len()))
        .unwrap_or_default();
    let moves = moves_index.map_or(&[][..], |index| &parts[index + 1..]);

    match setup.split_first() {
        Some((&"startpos", _)) => engine.set_position(None, moves),
        Some((&"fen", fields)) => engine.set_position(Some(fields.join(" ").as_str()), moves),
        _ => Err(EngineError::InvalidCommand(command.to_string())),
    }
}

/// Parse UCI go command
/// Examples:
///   go depth 10
///   go movetime 5000
///   go nodes 200000
///   go wtime 300000 btime 300000 winc 0 binc 0
///   go infinite
pub fn parse_go_command(command: &str) -> SearchSettings {
    let mut settings = SearchSettings::default();
    let mut parts = command.split_whitespace().skip(1);

    while let Some(token) = parts.next() {
        match token {
            "infinite" => settings.infinite = true,
            "wtime" => settings.wtime = next_number(&mut parts).unwrap_or(settings.wtime),
            "btime" => settings.btime = next_number(&mut parts).unwrap_or(settings.btime),
            "winc" => settings.winc = next_number(&mut parts).unwrap_or(settings.winc),
            "binc" => settings.binc = next_number(&mut parts).unwrap_or(settings.binc),
            "movetime" => settings.movetime = next_number(&mut parts),
            "depth" => settings.max_depth = next_number(&mut parts),
            "nodes" => settings.max_nodes = next_number(&mut parts),
            _ => {}
        }
    }

    settings
}

fn next_number<'a, T: std::str::FromStr>(parts: &mut impl Iterator<Item = &'a str>) -> Option<T> {
    parts.next().and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchLimits;

    #[test]
    fn position_startpos_with_moves() {
        let mut engine = Engine::default();
        parse_position_command(&mut engine, "position startpos moves e2e4 e7e5 g1f3")
            .expect("valid command");

        assert_eq!(
            engine.position.to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
        );
    }

    #[test]
    fn position_fen_with_moves() {
        let mut engine = Engine::default();
        parse_position_command(
            &mut engine,
            "position fen 4k3/8/8/8/8/8/8/4K2R w K - 0 1 moves e1g1",
        )
        .expect("valid command");

        assert_eq!(engine.position.to_fen(), "4k3/8/8/8/8/8/8/5RK1 b - - 1 1");
    }

    #[test]
    fn position_rejects_illegal_moves_and_bad_fen() {
        let mut engine = Engine::default();

        assert!(parse_position_command(&mut engine, "position startpos moves e2e5").is_err());
        assert!(parse_position_command(&mut engine, "position fen not a fen").is_err());
        assert!(parse_position_command(&mut engine, "position").is_err());
        assert_eq!(
            engine.position.to_fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    #[test]
    fn go_parameters() {
        assert_eq!(parse_go_command("go depth 6").limits(), SearchLimits::Depth(6));
        assert_eq!(
            parse_go_command("go movetime 250").limits(),
            SearchLimits::MoveTime(250)
        );
        assert_eq!(parse_go_command("go nodes 5000").limits(), SearchLimits::Nodes(5000));
        assert_eq!(parse_go_command("go infinite").limits(), SearchLimits::Infinite);
        assert_eq!(
            parse_go_command("go wtime 1000 btime 2000 winc 10 binc 20").limits(),
            SearchLimits::Clock {
                white_time_ms: 1000,
                black_time_ms: 2000,
                white_increment_ms: 10,
                black_increment_ms: 20,
            }
        );
    }
}
