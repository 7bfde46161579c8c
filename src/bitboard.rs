use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use crate::{
    constants::{NUM_FILES, NUM_RANKS, NUM_SQUARES},
    types::{BitBoard, Direction, Side, Square},
};

pub const FILE_A: u64 = 0x0101_0101_0101_0101;
pub const RANK_1: u64 = 0xFF;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

pub const KNIGHT_MOVES: [BitBoard; NUM_SQUARES] = build_leaper_table(&KNIGHT_OFFSETS);
pub const KING_MOVES: [BitBoard; NUM_SQUARES] = build_leaper_table(&KING_OFFSETS);

/// Every destination reachable by one of `offsets`, edge-clipped so nothing wraps from h to a.
const fn build_leaper_table(offsets: &[(i8, i8)]) -> [BitBoard; NUM_SQUARES] {
    let mut table = [BitBoard(0); NUM_SQUARES];
    let mut square = 0;

    while square < NUM_SQUARES {
        let file = (square % NUM_FILES) as i8;
        let rank = (square / NUM_FILES) as i8;
        let mut mask = 0u64;
        let mut i = 0;

        while i < offsets.len() {
            let (file_delta, rank_delta) = offsets[i];
            let to_file = file + file_delta;
            let to_rank = rank + rank_delta;

            if to_file >= 0 && to_file < NUM_FILES as i8 && to_rank >= 0 && to_rank < NUM_RANKS as i8
            {
                mask |= 1u64 << (to_rank * NUM_FILES as i8 + to_file) as u32;
            }

            i += 1;
        }

        table[square] = BitBoard(mask);
        square += 1;
    }

    table
}

impl BitBoard {
    pub const EMPTY: BitBoard = BitBoard(0);

    pub fn set_bit(&mut self, square: Square) {
        self.0 |= square.as_bit();
    }

    pub fn clear_bit(&mut self, square: Square) {
        self.0 &= !square.as_bit();
    }

    pub fn is_bit_set(&self, square: Square) -> bool {
        (self.0 & square.as_bit()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    /// Least significant set square, without removing it.
    pub fn first_square(&self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }

        Square::from_index(self.0.trailing_zeros() as usize)
    }

    /// Removes and returns the least significant set square.
    pub fn next_bit(&mut self) -> Option<Square> {
        let square = self.first_square()?;
        self.0 &= self.0 - 1;
        Some(square)
    }

    /// Set squares from A1 towards H8.
    pub fn squares(self) -> impl Iterator<Item = Square> {
        let mut remaining = self;
        std::iter::from_fn(move || remaining.next_bit())
    }
}

impl BitOr for BitBoard {
    type Output = BitBoard;

    fn bitor(self, rhs: BitBoard) -> BitBoard {
        BitBoard(self.0 | rhs.0)
    }
}

impl BitOrAssign for BitBoard {
    fn bitor_assign(&mut self, rhs: BitBoard) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for BitBoard {
    type Output = BitBoard;

    fn bitand(self, rhs: BitBoard) -> BitBoard {
        BitBoard(self.0 & rhs.0)
    }
}

impl BitAndAssign for BitBoard {
    fn bitand_assign(&mut self, rhs: BitBoard) {
        self.0 &= rhs.0;
    }
}

impl Not for BitBoard {
    type Output = BitBoard;

    fn not(self) -> BitBoard {
        BitBoard(!self.0)
    }
}

pub fn file_mask(square: Square) -> BitBoard {
    BitBoard(FILE_A << square.file())
}

pub fn rank_mask(square: Square) -> BitBoard {
    BitBoard(RANK_1 << (square.rank() as usize * NUM_FILES))
}

pub fn king_move_mask(square: Square) -> BitBoard {
    KING_MOVES[square as usize]
}

pub fn knight_move_mask(square: Square) -> BitBoard {
    KNIGHT_MOVES[square as usize]
}

/// Squares a pawn of `side` standing on `square` captures on. Pass the
/// opponent's side to get the backward diagonals instead.
pub fn pawn_attack_mask(side: Side, square: Square) -> BitBoard {
    let forward = side.forward();
    let mut mask = BitBoard::EMPTY;

    for file_delta in [-1, 1] {
        if let Some(target) = square.offset(file_delta, forward) {
            mask.set_bit(target);
        }
    }

    mask
}

/// Set-wise version of `pawn_attack_mask` for every pawn in `pawns`.
pub fn pawn_attacks(side: Side, pawns: BitBoard) -> BitBoard {
    let not_file_a = !FILE_A;
    let not_file_h = !(FILE_A << 7);

    match side {
        Side::White => BitBoard(((pawns.0 & not_file_a) << 7) | ((pawns.0 & not_file_h) << 9)),
        Side::Black => BitBoard(((pawns.0 & not_file_a) >> 9) | ((pawns.0 & not_file_h) >> 7)),
    }
}

/// The pawn's file and both neighbouring files, on every rank ahead of it.
/// No enemy pawn inside this mask means the pawn is passed.
pub fn passed_pawn_mask(side: Side, square: Square) -> BitBoard {
    let mut files = file_mask(square).0;
    if square.file() > 0 {
        files |= FILE_A << (square.file() - 1);
    }
    if square.file() < 7 {
        files |= FILE_A << (square.file() + 1);
    }

    let rank = square.rank() as usize;
    let ahead = match side {
        Side::White if rank == 7 => 0,
        Side::White => u64::MAX << ((rank + 1) * NUM_FILES),
        Side::Black => (1u64 << (rank * NUM_FILES)) - 1,
    };

    BitBoard(files & ahead)
}

/// Ray scan from `square` in each direction until the edge or the first
/// occupied square, which is included.
pub fn sliding_attacks(square: Square, occupied: BitBoard, directions: &[Direction]) -> BitBoard {
    let mut attacks = BitBoard::EMPTY;

    for &direction in directions {
        let mut current = square;

        while let Some(next) = current.step(direction) {
            attacks.set_bit(next);
            if occupied.is_bit_set(next) {
                break;
            }
            current = next;
        }
    }

    attacks
}
