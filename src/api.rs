#[cfg(feature = "api")]
use serde::{Deserialize, Serialize};

use crate::{
    engine::{Engine, SearchSettings},
    error::EngineError,
};

#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "api", serde(default))]
#[derive(Debug, Clone, Default)]
pub struct AnalyzeRequest {
    /// Empty means the start position
    pub fen: String,
    /// Long-algebraic moves played from `fen` before searching
    pub moves: Vec<String>,
    pub wtime_ms: Option<u64>,
    pub btime_ms: Option<u64>,
    pub winc_ms: Option<u64>,
    pub binc_ms: Option<u64>,
    pub movetime_ms: Option<u64>,
    pub depth: Option<u16>,
    pub nodes: Option<u64>,
}

#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeResponse {
    pub best_move: String,      // Long algebraic, e.g. e2e4
    pub evaluation: String,     // White's view: "+0.35", "-M3", "1-0"
    pub depth: u16,             // Last completed iteration
    pub nodes: u64,
    pub qnodes: u64,
    pub time_ms: u64,
    pub fen_after_move: String, // Position after playing best_move
}

impl AnalyzeRequest {
    fn search_settings(&self) -> SearchSettings {
        let defaults = SearchSettings::default();

        SearchSettings {
            wtime: self.wtime_ms.unwrap_or(defaults.wtime),
            btime: self.btime_ms.unwrap_or(defaults.btime),
            winc: self.winc_ms.unwrap_or(defaults.winc),
            binc: self.binc_ms.unwrap_or(defaults.binc),
            movetime: self.movetime_ms,
            max_depth: self.depth,
            max_nodes: self.nodes,
            infinite: false,
        }
    }
}

/// Main entry point for API consumers
/// Analyzes a chess position and returns the best move
pub fn analyze_position(request: AnalyzeRequest) -> Result<AnalyzeResponse, EngineError> {
    let mut engine = Engine::new(request.search_settings());
    let fen = (!request.fen.trim().is_empty()).then_some(request.fen.as_str());
    let moves: Vec<&str> = request.moves.iter().map(String::as_str).collect();
    engine.set_position(fen, &moves)?;

    if engine.position.legal_moves().is_empty() {
        return Err(EngineError::NoLegalMoves);
    }

    let result = engine.think()?;
    let best_move = result.best_move.ok_or(EngineError::NoLegalMoves)?;
    let fen_after_move = best_move.simulate(&engine.position)?.to_fen();

    Ok(AnalyzeResponse {
        best_move: best_move.to_string(),
        evaluation: result.evaluation.to_string(),
        depth: result.depth,
        nodes: result.stats.nodes,
        qnodes: result.stats.qnodes,
        time_ms: result.elapsed.as_millis() as u64,
        fen_after_move,
    })
}

/// Simpler interface with just FEN and depth
pub fn get_best_move(fen: &str, depth: u16) -> Result<AnalyzeResponse, EngineError> {
    analyze_position(AnalyzeRequest {
        fen: fen.to_string(),
        depth: Some(depth),
        ..AnalyzeRequest::default()
    })
}

/// JSON in, JSON out.
#[cfg(feature = "api")]
pub fn analyze_json(request: &str) -> Result<String, EngineError> {
    let request: AnalyzeRequest = serde_json::from_str(request)?;
    let response = analyze_position(request)?;
    Ok(serde_json::to_string(&response)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_analyze_starting_position() {
        let request = AnalyzeRequest {
            fen: START.to_string(),
            depth: Some(2),
            ..AnalyzeRequest::default()
        };

        let response = analyze_position(request).unwrap();
        assert_eq!(response.best_move.len(), 4);
        assert_eq!(response.depth, 2);
        assert!(response.nodes > 0);
        assert_ne!(response.fen_after_move, START);
    }

    #[test]
    fn test_moves_are_played_before_searching() {
        let request = AnalyzeRequest {
            moves: vec!["e2e4".to_string()],
            depth: Some(1),
            ..AnalyzeRequest::default()
        };

        let response = analyze_position(request).unwrap();
        assert!(
            response.fen_after_move.contains(" w "),
            "Black replied, so white is to move: {}",
            response.fen_after_move
        );
    }

    #[test]
    fn test_invalid_fen() {
        let result = get_best_move("invalid fen string", 2);
        assert!(matches!(result, Err(EngineError::Fen(_))));
    }

    #[test]
    fn test_checkmated_position_has_no_move() {
        // Fool's mate, white to move and mated
        let fen = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
        assert!(matches!(get_best_move(fen, 2), Err(EngineError::NoLegalMoves)));
    }

    #[test]
    fn test_mate_in_one_is_found() {
        let fen = "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1";
        let response = get_best_move(fen, 2).unwrap();
        assert_eq!(response.best_move, "a1a8");
        assert!(response.evaluation.contains('M'), "{}", response.evaluation);
    }

    #[cfg(feature = "api")]
    #[test]
    fn test_json_round_trip() {
        let json = analyze_json(r#"{"moves": ["e2e4", "e7e5"], "depth": 1}"#).unwrap();
        let response: AnalyzeResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(response.depth, 1);
    }
}
