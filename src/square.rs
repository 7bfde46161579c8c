use std::{fmt, str::FromStr};

use crate::{
    constants::{NUM_FILES, NUM_RANKS},
    error::MoveError,
    types::{BitBoard, Direction, Square},
};

#[rustfmt::skip]
const ALL_SQUARES: [Square; 64] = [
    Square::A1, Square::B1, Square::C1, Square::D1, Square::E1, Square::F1, Square::G1, Square::H1,
    Square::A2, Square::B2, Square::C2, Square::D2, Square::E2, Square::F2, Square::G2, Square::H2,
    Square::A3, Square::B3, Square::C3, Square::D3, Square::E3, Square::F3, Square::G3, Square::H3,
    Square::A4, Square::B4, Square::C4, Square::D4, Square::E4, Square::F4, Square::G4, Square::H4,
    Square::A5, Square::B5, Square::C5, Square::D5, Square::E5, Square::F5, Square::G5, Square::H5,
    Square::A6, Square::B6, Square::C6, Square::D6, Square::E6, Square::F6, Square::G6, Square::H6,
    Square::A7, Square::B7, Square::C7, Square::D7, Square::E7, Square::F7, Square::G7, Square::H7,
    Square::A8, Square::B8, Square::C8, Square::D8, Square::E8, Square::F8, Square::G8, Square::H8,
];

impl Square {
    pub fn iter() -> impl Iterator<Item = Square> {
        ALL_SQUARES.into_iter()
    }

    /// `None` for anything outside 0-63.
    pub fn from_index(index: usize) -> Option<Square> {
        ALL_SQUARES.get(index).copied()
    }

    /// File and rank are 0-indexed. Out-of-board coordinates yield `None`.
    pub fn from_coords(file: i8, rank: i8) -> Option<Square> {
        if !(0..NUM_FILES as i8).contains(&file) || !(0..NUM_RANKS as i8).contains(&rank) {
            return None;
        }

        Square::from_index(rank as usize * NUM_FILES + file as usize)
    }

    #[inline]
    pub fn as_bit(self) -> u64 {
        1u64 << (self as u64)
    }

    #[inline]
    pub fn as_bitboard(self) -> BitBoard {
        BitBoard(self.as_bit())
    }

    /// 0-indexed (0-7)
    pub fn rank(self) -> u8 {
        self as u8 / NUM_FILES as u8
    }

    /// 0-indexed (0-7)
    pub fn file(self) -> u8 {
        (self as u8) % (NUM_FILES as u8)
    }

    /// The square `file_delta` files and `rank_delta` ranks away, if it is on the board.
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Square> {
        Square::from_coords(self.file() as i8 + file_delta, self.rank() as i8 + rank_delta)
    }

    pub fn step(self, direction: Direction) -> Option<Square> {
        let (file_delta, rank_delta) = direction.delta();
        self.offset(file_delta, rank_delta)
    }

    /// Vertical mirror, used to read white-oriented tables for black.
    pub fn flipped(self) -> Square {
        ALL_SQUARES[self as usize ^ 56]
    }
}

impl Direction {
    pub const ORTHOGONAL: [Direction; 4] = [Direction::N, Direction::E, Direction::S, Direction::W];
    pub const DIAGONAL: [Direction; 4] = [Direction::NE, Direction::SE, Direction::SW, Direction::NW];
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    /// (file, rank) step
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::N => (0, 1),
            Direction::NE => (1, 1),
            Direction::E => (1, 0),
            Direction::SE => (1, -1),
            Direction::S => (0, -1),
            Direction::SW => (-1, -1),
            Direction::W => (-1, 0),
            Direction::NW => (-1, 1),
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file()) as char;
        let rank = (b'1' + self.rank()) as char;
        write!(f, "{file}{rank}")
    }
}

impl FromStr for Square {
    type Err = MoveError;

    /// Parses algebraic coordinates such as `e4`
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || MoveError::InvalidSquare(text.to_string());

        let bytes = text.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }

        let file = bytes[0].wrapping_sub(b'a') as i8;
        let rank = bytes[1].wrapping_sub(b'1') as i8;

        Square::from_coords(file, rank).ok_or_else(invalid)
    }
}

impl TryFrom<u8> for Square {
    type Error = &'static str;

    /// Converts from a number representing the square index
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Square::from_index(value as usize).ok_or("Square index out of range (must be 0-63)")
    }
}
