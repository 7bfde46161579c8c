use crate::{
    constants::{BISHOP_VALUE, KNIGHT_VALUE, PAWN_VALUE, QUEEN_VALUE, ROOK_VALUE},
    types::{CastleSide, Piece, Side},
};

impl Piece {
    /// Generation order for promotion candidates.
    pub const PROMOTIONS: [Piece; 4] = [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen];

    /// Material value in centipawns. Kings are never traded, so they count 0.
    pub const fn value(self) -> i64 {
        match self {
            Piece::Pawn => PAWN_VALUE,
            Piece::Knight => KNIGHT_VALUE,
            Piece::Bishop => BISHOP_VALUE,
            Piece::Rook => ROOK_VALUE,
            Piece::Queen => QUEEN_VALUE,
            Piece::King => 0,
        }
    }

    pub const fn is_slider(self) -> bool {
        matches!(self, Piece::Bishop | Piece::Rook | Piece::Queen)
    }

    pub fn iter() -> impl Iterator<Item = Piece> {
        [
            Piece::Pawn,
            Piece::Knight,
            Piece::Bishop,
            Piece::Rook,
            Piece::Queen,
            Piece::King,
        ]
        .into_iter()
    }

    /// Lowercase letter, as used in long algebraic promotions.
    pub const fn letter(self) -> char {
        match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        }
    }

    /// FEN letter: uppercase for white, lowercase for black.
    pub fn fen_char(self, side: Side) -> char {
        match side {
            Side::White => self.letter().to_ascii_uppercase(),
            Side::Black => self.letter(),
        }
    }

    pub fn from_fen_char(c: char) -> Option<(Side, Piece)> {
        let side = if c.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };

        let piece = match c.to_ascii_lowercase() {
            'p' => Piece::Pawn,
            'n' => Piece::Knight,
            'b' => Piece::Bishop,
            'r' => Piece::Rook,
            'q' => Piece::Queen,
            'k' => Piece::King,
            _ => return None,
        };

        Some((side, piece))
    }

    /// Only queen, rook, bishop and knight letters are accepted.
    pub fn from_promotion_char(c: char) -> Option<Piece> {
        match c.to_ascii_lowercase() {
            'q' => Some(Piece::Queen),
            'r' => Some(Piece::Rook),
            'b' => Some(Piece::Bishop),
            'n' => Some(Piece::Knight),
            _ => None,
        }
    }
}

impl Side {
    pub fn iter() -> impl Iterator<Item = Side> {
        [Side::White, Side::Black].into_iter()
    }

    pub const fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Rank delta of a pawn push.
    pub const fn forward(self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    /// Rank holding the king and rooks at the start of the game.
    pub const fn home_rank(self) -> u8 {
        match self {
            Side::White => 0,
            Side::Black => 7,
        }
    }

    pub const fn pawn_rank(self) -> u8 {
        match self {
            Side::White => 1,
            Side::Black => 6,
        }
    }

    pub const fn promotion_rank(self) -> u8 {
        match self {
            Side::White => 7,
            Side::Black => 0,
        }
    }
}

impl CastleSide {
    pub fn iter() -> impl Iterator<Item = CastleSide> {
        [CastleSide::Short, CastleSide::Long].into_iter()
    }

    /// File delta of the king's walk toward the rook.
    pub const fn direction(self) -> i8 {
        match self {
            CastleSide::Short => 1,
            CastleSide::Long => -1,
        }
    }

    /// File of the rook's home corner.
    pub const fn rook_file(self) -> u8 {
        match self {
            CastleSide::Short => 7,
            CastleSide::Long => 0,
        }
    }
}
