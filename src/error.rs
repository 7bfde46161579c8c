use thiserror::Error;

use crate::types::{Piece, Side, Square};

/// Malformed FEN text. Always recoverable: the caller decides whether to
/// reject the input or fall back to the start position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected 6 space-separated fields, found {0}")]
    FieldCount(usize),

    #[error("expected 8 ranks in piece placement, found {0}")]
    RankCount(usize),

    #[error("unrecognized piece letter '{0}'")]
    InvalidPiece(char),

    #[error("rank {rank} does not decompose into exactly 8 files")]
    RankWidth { rank: usize },

    #[error("invalid side to move '{0}'")]
    SideToMove(String),

    #[error("invalid castling rights '{0}'")]
    Castling(String),

    #[error("invalid en passant target '{0}'")]
    EnPassant(String),

    #[error("invalid {field} '{value}'")]
    Counter { field: &'static str, value: String },

    #[error("expected exactly one {side:?} king, found {count}")]
    KingCount { side: Side, count: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("malformed move text '{0}'")]
    InvalidNotation(String),

    #[error("invalid square '{0}'")]
    InvalidSquare(String),

    #[error("no piece on {0:?}")]
    NoPieceAt(Square),

    #[error("cannot promote to {0:?}")]
    InvalidPromotion(Piece),

    #[error("{0:?} is not the en passant target")]
    NotEnPassantTarget(Square),

    #[error("piece on {0:?} is not a pawn")]
    NotAPawn(Square),

    #[error("no {0:?} king on the board")]
    MissingKing(Side),

    #[error("no castling rook found for king on {0:?}")]
    RookNotFound(Square),

    #[error("no pawn to capture en passant on {0:?}")]
    CapturedPawnMissing(Square),

    #[error("move {0} was generated from a different position")]
    StalePosition(String),

    #[error("illegal move {0}")]
    Illegal(String),
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search failed: {0}")]
    Move(#[from] MoveError),

    #[error("search worker panicked: {0}")]
    WorkerPanicked(String),
}

/// Umbrella error for the protocol-facing surfaces.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid FEN: {0}")]
    Fen(#[from] FenError),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("no legal moves in position")]
    NoLegalMoves,

    #[error("malformed command '{0}'")]
    InvalidCommand(String),

    #[cfg(feature = "api")]
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
