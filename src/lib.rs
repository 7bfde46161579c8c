pub mod api;
pub mod bitboard;
pub mod constants;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod evaluator;
pub mod movegen;
pub mod moves;
pub mod ordering;
pub mod piece;
pub mod position;
pub mod search;
pub mod square;
pub mod time;
pub mod types;
pub mod uci;
pub mod zobrist_hash;
