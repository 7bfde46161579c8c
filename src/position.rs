use std::{collections::HashMap, fmt};

use tracing::warn;

use crate::{
    bitboard::{king_move_mask, knight_move_mask, pawn_attacks, sliding_attacks},
    constants::{
        FIFTY_MOVE_HALFMOVES, NUM_FILES, NUM_PIECE_TYPES, NUM_RANKS, NUM_SIDES,
        REPETITION_DRAW_COUNT, START_FEN,
    },
    error::{FenError, MoveError},
    movegen,
    moves::Move,
    types::{BitBoard, CastleSide, Direction, GameState, Piece, Side, Square},
    zobrist_hash::zobrist_keys,
};

/// A complete game state: twelve piece bitboards, the two controlled-square
/// caches and the bookkeeping needed for castling, en passant and draws.
///
/// Positions are copied for every simulated move. Only the live game is
/// mutated in place, through [`Position::apply_move_in_place`].
#[derive(Clone, Debug)]
pub struct Position {
    pieces: [[BitBoard; NUM_PIECE_TYPES]; NUM_SIDES],
    controlled: [BitBoard; NUM_SIDES],
    side: Side,
    castling: [[bool; 2]; NUM_SIDES],
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    repetitions: HashMap<u64, u32>,
    history: Vec<Move>,
    legal_moves_memo: Option<(u32, Vec<Move>)>,
    game_state_memo: Option<(u32, GameState)>,
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

impl Position {
    /// The standard start position
    pub fn new() -> Self {
        Position::from_fen(START_FEN).expect("start position FEN must parse")
    }

    fn empty() -> Self {
        Self {
            pieces: [[BitBoard::EMPTY; NUM_PIECE_TYPES]; NUM_SIDES],
            controlled: [BitBoard::EMPTY; NUM_SIDES],
            side: Side::White,
            castling: [[false; 2]; NUM_SIDES],
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            repetitions: HashMap::new(),
            history: Vec::new(),
            legal_moves_memo: None,
            game_state_memo: None,
        }
    }

    /// Parses the six FEN fields. Attack caches are computed before returning.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::FieldCount(fields.len()));
        }

        let mut position = Position::empty();

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != NUM_RANKS {
            return Err(FenError::RankCount(ranks.len()));
        }

        for (row, rank_text) in ranks.iter().enumerate() {
            let rank = NUM_RANKS - 1 - row;
            let mut file = 0usize;

            for c in rank_text.chars() {
                if let Some(run) = c.to_digit(10) {
                    if !(1..=NUM_FILES as u32).contains(&run) {
                        return Err(FenError::InvalidPiece(c));
                    }
                    file += run as usize;
                } else {
                    let (side, piece) = Piece::from_fen_char(c).ok_or(FenError::InvalidPiece(c))?;
                    let square = Square::from_index(rank * NUM_FILES + file)
                        .filter(|_| file < NUM_FILES)
                        .ok_or(FenError::RankWidth { rank: rank + 1 })?;
                    position.pieces[side as usize][piece as usize].set_bit(square);
                    file += 1;
                }

                if file > NUM_FILES {
                    return Err(FenError::RankWidth { rank: rank + 1 });
                }
            }

            if file != NUM_FILES {
                return Err(FenError::RankWidth { rank: rank + 1 });
            }
        }

        position.side = match fields[1] {
            "w" => Side::White,
            "b" => Side::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        if fields[2] != "-" {
            for c in fields[2].chars() {
                let (side, castle_side) = match c {
                    'K' => (Side::White, CastleSide::Short),
                    'Q' => (Side::White, CastleSide::Long),
                    'k' => (Side::Black, CastleSide::Short),
                    'q' => (Side::Black, CastleSide::Long),
                    _ => return Err(FenError::Castling(fields[2].to_string())),
                };
                position.castling[side as usize][castle_side as usize] = true;
            }
        }

        position.en_passant = match fields[3] {
            "-" => None,
            text => Some(
                text.parse::<Square>()
                    .map_err(|_| FenError::EnPassant(text.to_string()))?,
            ),
        };

        position.halfmove_clock = fields[4].parse().map_err(|_| FenError::Counter {
            field: "halfmove clock",
            value: fields[4].to_string(),
        })?;
        position.fullmove_number = fields[5].parse().map_err(|_| FenError::Counter {
            field: "fullmove number",
            value: fields[5].to_string(),
        })?;

        for side in Side::iter() {
            let count = position.pieces(side, Piece::King).count();
            if count != 1 {
                return Err(FenError::KingCount { side, count });
            }
        }

        position.refresh_controlled_squares();
        position.repetitions.insert(position.placement_signature(), 1);

        Ok(position)
    }

    /// Invalid FEN falls back to the start position.
    pub fn from_fen_or_start(fen: &str) -> Self {
        match Position::from_fen(fen) {
            Ok(position) => position,
            Err(error) => {
                warn!(%error, fen, "falling back to the start position");
                Position::new()
            }
        }
    }

    /// Replaces this position with the parsed FEN. Leaves it untouched on failure.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), FenError> {
        *self = Position::from_fen(fen)?;
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        let mut placement = String::new();

        for rank in (0..NUM_RANKS).rev() {
            let mut empty_run = 0;

            for file in 0..NUM_FILES {
                let piece = Square::from_index(rank * NUM_FILES + file).and_then(|sq| self.piece_at(sq));

                match piece {
                    Some((side, piece)) => {
                        if empty_run > 0 {
                            placement.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        placement.push(piece.fen_char(side));
                    }
                    None => empty_run += 1,
                }
            }

            if empty_run > 0 {
                placement.push_str(&empty_run.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let side = match self.side {
            Side::White => "w",
            Side::Black => "b",
        };

        let mut castling = String::new();
        for (side, castle_side, letter) in [
            (Side::White, CastleSide::Short, 'K'),
            (Side::White, CastleSide::Long, 'Q'),
            (Side::Black, CastleSide::Short, 'k'),
            (Side::Black, CastleSide::Long, 'q'),
        ] {
            if self.castling_right(side, castle_side) {
                castling.push(letter);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), |square| square.to_string());

        format!(
            "{placement} {side} {castling} {en_passant} {} {}",
            self.halfmove_clock, self.fullmove_number
        )
    }

    /// `None` for an empty square.
    ///
    /// Panics if the square is set on more than one piece board, which can
    /// only happen if the position was corrupted.
    pub fn piece_at(&self, square: Square) -> Option<(Side, Piece)> {
        let mut found = None;

        for side in Side::iter() {
            for piece in Piece::iter() {
                if self.pieces[side as usize][piece as usize].is_bit_set(square) {
                    if let Some((other_side, other_piece)) = found {
                        panic!(
                            "{square} is set for both {other_side:?} {other_piece:?} and {side:?} {piece:?}"
                        );
                    }
                    found = Some((side, piece));
                }
            }
        }

        found
    }

    /// Attack caches are not refreshed; call `refresh_controlled_squares` when done editing.
    pub fn set_piece_at(&mut self, square: Square, side: Side, piece: Piece) {
        self.remove_piece_at(square);
        self.pieces[side as usize][piece as usize].set_bit(square);
    }

    pub fn remove_piece_at(&mut self, square: Square) {
        for boards in self.pieces.iter_mut() {
            for board in boards.iter_mut() {
                board.clear_bit(square);
            }
        }
        self.invalidate_memos();
    }

    pub fn pieces(&self, side: Side, piece: Piece) -> BitBoard {
        self.pieces[side as usize][piece as usize]
    }

    pub fn occupancy(&self, side: Side) -> BitBoard {
        self.pieces[side as usize]
            .iter()
            .fold(BitBoard::EMPTY, |acc, board| acc | *board)
    }

    pub fn occupied(&self) -> BitBoard {
        self.occupancy(Side::White) | self.occupancy(Side::Black)
    }

    pub fn empty_squares(&self) -> BitBoard {
        !self.occupied()
    }

    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.pieces(side, Piece::King).first_square()
    }

    pub fn side_to_move(&self) -> Side {
        self.side
    }

    pub fn castling_right(&self, side: Side, castle_side: CastleSide) -> bool {
        self.castling[side as usize][castle_side as usize]
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Moves made since this position was loaded, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// How often the current piece placement has occurred since the last
    /// pawn move or capture.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions
            .get(&self.placement_signature())
            .copied()
            .unwrap_or(0)
    }

    pub fn placement_signature(&self) -> u64 {
        zobrist_keys().placement(&self.pieces)
    }

    /// Identifies the position a move was generated from.
    pub fn signature(&self) -> u64 {
        zobrist_keys().position(
            self.placement_signature(),
            self.side,
            &self.castling,
            self.en_passant,
        )
    }

    /// Every square `side` attacks or defends, computed from scratch.
    /// Pins and checks are ignored.
    pub fn controlled_squares(&self, side: Side) -> BitBoard {
        let occupied = self.occupied();
        let mut controlled = pawn_attacks(side, self.pieces(side, Piece::Pawn));

        for square in self.pieces(side, Piece::Knight).squares() {
            controlled |= knight_move_mask(square);
        }

        let diagonal = self.pieces(side, Piece::Bishop) | self.pieces(side, Piece::Queen);
        for square in diagonal.squares() {
            controlled |= sliding_attacks(square, occupied, &Direction::DIAGONAL);
        }

        let orthogonal = self.pieces(side, Piece::Rook) | self.pieces(side, Piece::Queen);
        for square in orthogonal.squares() {
            controlled |= sliding_attacks(square, occupied, &Direction::ORTHOGONAL);
        }

        for square in self.pieces(side, Piece::King).squares() {
            controlled |= king_move_mask(square);
        }

        controlled
    }

    pub fn refresh_controlled_squares(&mut self) {
        for side in Side::iter() {
            self.controlled[side as usize] = self.controlled_squares(side);
        }
    }

    /// Cached controlled squares as of the last refresh.
    pub fn controlled(&self, side: Side) -> BitBoard {
        self.controlled[side as usize]
    }

    pub fn is_square_attacked(&self, square: Square, by: Side) -> bool {
        self.controlled(by).is_bit_set(square)
    }

    /// A side without a king is treated as attacked.
    pub fn is_king_attacked(&self, side: Side) -> bool {
        self.king_square(side)
            .is_none_or(|king| self.is_square_attacked(king, side.opponent()))
    }

    /// Whether the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.is_king_attacked(self.side)
    }

    /// Memo key: one value per ply of the game.
    fn ply_key(&self) -> u32 {
        self.fullmove_number * 2 + self.side as u32
    }

    fn invalidate_memos(&mut self) {
        self.legal_moves_memo = None;
        self.game_state_memo = None;
    }

    /// Legal moves for the side to move, memoized until the ply changes.
    pub fn legal_moves(&mut self) -> &[Move] {
        let key = self.ply_key();

        if self.legal_moves_memo.as_ref().map(|(k, _)| *k) != Some(key) {
            let moves = movegen::legal_moves(self);
            self.legal_moves_memo = Some((key, moves));
        }

        match &self.legal_moves_memo {
            Some((_, moves)) => moves,
            None => &[],
        }
    }

    /// No legal moves decides first, then the fifty-move rule, then threefold repetition.
    pub fn game_state(&mut self) -> GameState {
        let key = self.ply_key();
        if let Some((memo_key, state)) = self.game_state_memo {
            if memo_key == key {
                return state;
            }
        }

        let state = if self.legal_moves().is_empty() {
            match (self.is_check(), self.side) {
                (true, Side::White) => GameState::BlackWon,
                (true, Side::Black) => GameState::WhiteWon,
                (false, _) => GameState::Draw,
            }
        } else if self.halfmove_clock >= FIFTY_MOVE_HALFMOVES {
            GameState::Draw
        } else if self.repetition_count() >= REPETITION_DRAW_COUNT {
            GameState::Draw
        } else {
            GameState::Ongoing
        };

        self.game_state_memo = Some((key, state));
        state
    }

    /// Only for the live game. Search works on simulated copies.
    pub fn apply_move_in_place(&mut self, mv: &Move) -> Result<(), MoveError> {
        *self = mv.simulate(self)?;
        Ok(())
    }

    /// Parses `text`, checks it against the legal moves and plays it.
    pub fn apply_long_algebraic(&mut self, text: &str) -> Result<Move, MoveError> {
        let mv = Move::from_long_algebraic(text, self)?;

        if !self.legal_moves().contains(&mv) {
            return Err(MoveError::Illegal(text.to_string()));
        }

        self.apply_move_in_place(&mv)?;
        Ok(mv)
    }

    /// Copy that a move is played onto. Memos are dropped rather than cloned.
    pub(crate) fn successor(&self) -> Position {
        Position {
            pieces: self.pieces,
            controlled: self.controlled,
            side: self.side,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            repetitions: self.repetitions.clone(),
            history: self.history.clone(),
            legal_moves_memo: None,
            game_state_memo: None,
        }
    }

    pub(crate) fn clear_castling(&mut self, side: Side) {
        self.castling[side as usize] = [false; 2];
    }

    /// A rook leaving or captured on its home corner loses that side's right.
    pub(crate) fn revoke_castling_for_rook(&mut self, side: Side, square: Square) {
        if square.rank() != side.home_rank() {
            return;
        }

        for castle_side in CastleSide::iter() {
            if square.file() == castle_side.rook_file() {
                self.castling[side as usize][castle_side as usize] = false;
            }
        }
    }

    pub(crate) fn set_en_passant(&mut self, square: Option<Square>) {
        self.en_passant = square;
    }

    /// Counter and bookkeeping updates shared by every move variant.
    pub(crate) fn finish_move(&mut self, mv: Move, irreversible: bool) {
        if irreversible {
            self.halfmove_clock = 0;
            self.repetitions.clear();
        } else {
            self.halfmove_clock += 1;
        }

        self.side = self.side.opponent();
        if self.side == Side::White {
            self.fullmove_number += 1;
        }

        self.history.push(mv);
        self.refresh_controlled_squares();
        *self
            .repetitions
            .entry(self.placement_signature())
            .or_insert(0) += 1;
        self.invalidate_memos();
    }
}

/// ASCII preview: uppercase white, lowercase black, `-` empty, rank 8 first.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..NUM_RANKS).rev() {
            for file in 0..NUM_FILES {
                let c = Square::from_index(rank * NUM_FILES + file)
                    .and_then(|square| self.piece_at(square))
                    .map_or('-', |(side, piece)| piece.fen_char(side));
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
