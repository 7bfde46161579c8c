use rand::{RngCore, SeedableRng, rngs::StdRng};
use std::sync::OnceLock;

use crate::{
    constants::{NUM_FILES, NUM_PIECE_TYPES, NUM_SIDES, NUM_SQUARES, ZOBRIST_SEED},
    types::{BitBoard, CastleSide, Piece, Side, Square},
};

pub struct ZobristKeys {
    pieces: [[[u64; NUM_SQUARES]; NUM_PIECE_TYPES]; NUM_SIDES],
    black_to_move: u64,
    castling: [[u64; 2]; NUM_SIDES],
    en_passant_file: [u64; NUM_FILES],
}

static ZOBRIST_KEYS: OnceLock<ZobristKeys> = OnceLock::new();

/// Lazily built, process-wide key tables
pub fn zobrist_keys() -> &'static ZobristKeys {
    ZOBRIST_KEYS.get_or_init(|| {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut pieces = [[[0u64; NUM_SQUARES]; NUM_PIECE_TYPES]; NUM_SIDES];

        for side in Side::iter() {
            for piece in Piece::iter() {
                for square in Square::iter() {
                    pieces[side as usize][piece as usize][square as usize] = rng.next_u64();
                }
            }
        }

        let black_to_move = rng.next_u64();

        let mut castling = [[0u64; 2]; NUM_SIDES];
        for side in Side::iter() {
            for castle_side in CastleSide::iter() {
                castling[side as usize][castle_side as usize] = rng.next_u64();
            }
        }

        let mut en_passant_file = [0u64; NUM_FILES];
        en_passant_file.iter_mut().for_each(|key| *key = rng.next_u64());

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant_file,
        }
    })
}

impl ZobristKeys {
    /// Signature of piece placement only. Keys the repetition table.
    pub fn placement(&self, pieces: &[[BitBoard; NUM_PIECE_TYPES]; NUM_SIDES]) -> u64 {
        let mut key = 0u64;

        for side in Side::iter() {
            for piece in Piece::iter() {
                for square in pieces[side as usize][piece as usize].squares() {
                    key ^= self.pieces[side as usize][piece as usize][square as usize];
                }
            }
        }

        key
    }

    /// Placement plus side to move, castling rights and en passant file.
    pub fn position(
        &self,
        placement: u64,
        side: Side,
        castling: &[[bool; 2]; NUM_SIDES],
        en_passant: Option<Square>,
    ) -> u64 {
        let mut key = placement;

        if side == Side::Black {
            key ^= self.black_to_move;
        }

        for side in Side::iter() {
            for castle_side in CastleSide::iter() {
                if castling[side as usize][castle_side as usize] {
                    key ^= self.castling[side as usize][castle_side as usize];
                }
            }
        }

        if let Some(square) = en_passant {
            key ^= self.en_passant_file[square.file() as usize];
        }

        key
    }
}
