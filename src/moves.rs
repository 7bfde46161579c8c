use std::fmt;

use crate::{
    error::MoveError,
    position::Position,
    types::{CastleSide, Piece, Side, Square},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    Castling(CastleSide),
    EnPassant,
    Promotion(Piece),
}

/// A move bound to the position it was generated from. Two moves with the
/// same squares from different positions never compare equal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    side: Side,
    piece: Piece,
    from: Square,
    to: Square,
    kind: MoveKind,
    captured: Option<Piece>,
    origin: u64,
}

impl Move {
    /// Unchecked constructor for the generator, which already knows the
    /// move is well formed.
    pub(crate) fn build(
        position: &Position,
        origin: u64,
        side: Side,
        piece: Piece,
        from: Square,
        to: Square,
        kind: MoveKind,
    ) -> Move {
        let captured = match kind {
            MoveKind::EnPassant => Some(Piece::Pawn),
            MoveKind::Castling(_) => None,
            MoveKind::Normal | MoveKind::Promotion(_) => {
                position.piece_at(to).map(|(_, piece)| piece)
            }
        };

        Move {
            side,
            piece,
            from,
            to,
            kind,
            captured,
            origin,
        }
    }

    pub fn normal(position: &Position, from: Square, to: Square) -> Result<Move, MoveError> {
        let (side, piece) = position.piece_at(from).ok_or(MoveError::NoPieceAt(from))?;
        Ok(Move::build(
            position,
            position.signature(),
            side,
            piece,
            from,
            to,
            MoveKind::Normal,
        ))
    }

    /// Castling for the side to move. The king walks two files toward the rook.
    pub fn castling(position: &Position, castle_side: CastleSide) -> Result<Move, MoveError> {
        let side = position.side_to_move();
        let king = position
            .king_square(side)
            .ok_or(MoveError::MissingKing(side))?;
        let to = king
            .offset(2 * castle_side.direction(), 0)
            .ok_or(MoveError::RookNotFound(king))?;

        Ok(Move::build(
            position,
            position.signature(),
            side,
            Piece::King,
            king,
            to,
            MoveKind::Castling(castle_side),
        ))
    }

    /// Fails unless `to` is the current en passant target and `from` holds a pawn.
    pub fn en_passant(position: &Position, from: Square, to: Square) -> Result<Move, MoveError> {
        let (side, piece) = position.piece_at(from).ok_or(MoveError::NoPieceAt(from))?;
        if piece != Piece::Pawn {
            return Err(MoveError::NotAPawn(from));
        }
        if position.en_passant() != Some(to) {
            return Err(MoveError::NotEnPassantTarget(to));
        }

        Ok(Move::build(
            position,
            position.signature(),
            side,
            piece,
            from,
            to,
            MoveKind::EnPassant,
        ))
    }

    pub fn promotion(
        position: &Position,
        from: Square,
        to: Square,
        promote: Piece,
    ) -> Result<Move, MoveError> {
        if !Piece::PROMOTIONS.contains(&promote) {
            return Err(MoveError::InvalidPromotion(promote));
        }

        let (side, piece) = position.piece_at(from).ok_or(MoveError::NoPieceAt(from))?;
        if piece != Piece::Pawn {
            return Err(MoveError::NotAPawn(from));
        }

        Ok(Move::build(
            position,
            position.signature(),
            side,
            piece,
            from,
            to,
            MoveKind::Promotion(promote),
        ))
    }

    /// Parses `e2e4` / `e7e8q` against `position`. Castling, en passant and
    /// promotion are recognised from the squares alone; a pawn reaching the
    /// last rank without a letter promotes to a queen.
    ///
    /// The result is not checked for legality.
    pub fn from_long_algebraic(text: &str, position: &Position) -> Result<Move, MoveError> {
        let malformed = || MoveError::InvalidNotation(text.to_string());

        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(malformed());
        }

        let from: Square = text[0..2].parse()?;
        let to: Square = text[2..4].parse()?;
        let promotion = match text[4..].chars().next() {
            Some(c) => Some(Piece::from_promotion_char(c).ok_or_else(malformed)?),
            None => None,
        };

        let (side, piece) = position.piece_at(from).ok_or(MoveError::NoPieceAt(from))?;
        if side != position.side_to_move() {
            return Err(MoveError::Illegal(text.to_string()));
        }

        if piece == Piece::King && from.file().abs_diff(to.file()) >= 2 {
            let castle_side = if to.file() > from.file() {
                CastleSide::Short
            } else {
                CastleSide::Long
            };
            return Move::castling(position, castle_side);
        }

        if piece == Piece::Pawn {
            if to.rank() == side.promotion_rank() {
                return Move::promotion(position, from, to, promotion.unwrap_or(Piece::Queen));
            }
            if from.file() != to.file() && position.en_passant() == Some(to) {
                return Move::en_passant(position, from, to);
            }
        }

        if promotion.is_some() {
            return Err(malformed());
        }

        Move::normal(position, from, to)
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn piece(&self) -> Piece {
        self.piece
    }

    pub fn from(&self) -> Square {
        self.from
    }

    pub fn to(&self) -> Square {
        self.to
    }

    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    pub fn captured(&self) -> Option<Piece> {
        self.captured
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    pub fn promotion_piece(&self) -> Option<Piece> {
        match self.kind {
            MoveKind::Promotion(piece) => Some(piece),
            _ => None,
        }
    }

    pub fn is_double_push(&self) -> bool {
        self.piece == Piece::Pawn && self.from.rank().abs_diff(self.to.rank()) == 2
    }

    /// Plays the move on a copy of `position`, which must be the position
    /// the move was generated from.
    pub fn simulate(&self, position: &Position) -> Result<Position, MoveError> {
        if position.signature() != self.origin {
            return Err(MoveError::StalePosition(self.to_string()));
        }

        let mut next = position.successor();

        let irreversible = match self.kind {
            MoveKind::Normal => self.play_normal(&mut next),
            MoveKind::Castling(castle_side) => self.play_castling(position, &mut next, castle_side)?,
            MoveKind::EnPassant => self.play_en_passant(position, &mut next)?,
            MoveKind::Promotion(promote) => self.play_promotion(&mut next, promote),
        };

        next.finish_move(*self, irreversible);
        Ok(next)
    }

    /// Returns whether the move resets the halfmove clock.
    fn play_normal(&self, next: &mut Position) -> bool {
        next.remove_piece_at(self.from);
        next.set_piece_at(self.to, self.side, self.piece);

        match self.piece {
            Piece::King => next.clear_castling(self.side),
            Piece::Rook => next.revoke_castling_for_rook(self.side, self.from),
            _ => {}
        }
        if self.captured == Some(Piece::Rook) {
            next.revoke_castling_for_rook(self.side.opponent(), self.to);
        }

        let en_passant = if self.is_double_push() {
            self.from.offset(0, self.side.forward())
        } else {
            None
        };
        next.set_en_passant(en_passant);

        self.piece == Piece::Pawn || self.captured.is_some()
    }

    fn play_castling(
        &self,
        position: &Position,
        next: &mut Position,
        castle_side: CastleSide,
    ) -> Result<bool, MoveError> {
        let direction = castle_side.direction();
        let rank = self.from.rank() as i8;
        let mut file = self.from.file() as i8 + direction;

        let rook_from = loop {
            let square =
                Square::from_coords(file, rank).ok_or(MoveError::RookNotFound(self.from))?;
            if position.piece_at(square) == Some((self.side, Piece::Rook)) {
                break square;
            }
            file += direction;
        };
        let rook_to = self
            .from
            .offset(direction, 0)
            .ok_or(MoveError::RookNotFound(self.from))?;

        next.remove_piece_at(self.from);
        next.remove_piece_at(rook_from);
        next.set_piece_at(self.to, self.side, Piece::King);
        next.set_piece_at(rook_to, self.side, Piece::Rook);
        next.clear_castling(self.side);
        next.set_en_passant(None);

        Ok(false)
    }

    fn play_en_passant(&self, position: &Position, next: &mut Position) -> Result<bool, MoveError> {
        // The captured pawn sits beside the origin, on the destination file.
        let captured = Square::from_coords(self.to.file() as i8, self.from.rank() as i8)
            .ok_or(MoveError::CapturedPawnMissing(self.to))?;
        if position.piece_at(captured) != Some((self.side.opponent(), Piece::Pawn)) {
            return Err(MoveError::CapturedPawnMissing(captured));
        }

        next.remove_piece_at(self.from);
        next.remove_piece_at(captured);
        next.set_piece_at(self.to, self.side, Piece::Pawn);
        next.set_en_passant(None);

        Ok(true)
    }

    fn play_promotion(&self, next: &mut Position, promote: Piece) -> bool {
        next.remove_piece_at(self.from);
        next.set_piece_at(self.to, self.side, promote);
        if self.captured == Some(Piece::Rook) {
            next.revoke_castling_for_rook(self.side.opponent(), self.to);
        }
        next.set_en_passant(None);

        true
    }
}

/// Long algebraic form, e.g. `e2e4`, `e1g1`, `e7e8q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece) = self.promotion_piece() {
            write!(f, "{}", piece.letter())?;
        }
        Ok(())
    }
}
