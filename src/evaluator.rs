use crate::{
    bitboard::{FILE_A, passed_pawn_mask},
    constants::{
        BISHOP_SCORE, CONTROLLED_SQUARE_BONUS, DOUBLED_PAWN_EXPONENT, DOUBLED_PAWN_PENALTY,
        ENDGAME_MATERIAL, ENDGAME_PIECE_COUNT, HALFMOVE_DAMPING_CAP, HALFMOVE_DAMPING_RATE,
        HALFMOVE_DAMPING_START, KING_ENDGAME_SCORE, KING_SCORE, KNIGHT_SCORE,
        MATERIAL_RATIO_FLOOR, NUM_FILES, NUM_SQUARES, PASSED_PAWN_BONUS, PAWN_SCORE,
        PIECE_COUNT_RATIO_FLOOR, QUEEN_SCORE, ROOK_SCORE, START_MATERIAL, START_PIECE_COUNT,
    },
    evaluation::Evaluation,
    position::Position,
    types::{BitBoard, Piece, Side},
};

/// Tunable evaluation coefficients
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatorConfig {
    pub doubled_pawn_penalty: i64,
    pub doubled_pawn_exponent: f64,
    pub controlled_square_bonus: i64,
    pub piece_count_ratio_floor: f64,
    pub material_ratio_floor: f64,
    pub halfmove_damping_start: u32,
    pub halfmove_damping_rate: f64,
    pub halfmove_damping_cap: f64,
    pub endgame_piece_count: u32,
    pub endgame_material: i64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            doubled_pawn_penalty: DOUBLED_PAWN_PENALTY,
            doubled_pawn_exponent: DOUBLED_PAWN_EXPONENT,
            controlled_square_bonus: CONTROLLED_SQUARE_BONUS,
            piece_count_ratio_floor: PIECE_COUNT_RATIO_FLOOR,
            material_ratio_floor: MATERIAL_RATIO_FLOOR,
            halfmove_damping_start: HALFMOVE_DAMPING_START,
            halfmove_damping_rate: HALFMOVE_DAMPING_RATE,
            halfmove_damping_cap: HALFMOVE_DAMPING_CAP,
            endgame_piece_count: ENDGAME_PIECE_COUNT,
            endgame_material: ENDGAME_MATERIAL,
        }
    }
}

/// Static evaluator. Scores are from white's point of view regardless of
/// the side to move.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    pub config: EvaluatorConfig,
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    /// Finished games short-circuit to their result.
    pub fn evaluate(&self, position: &mut Position) -> Evaluation {
        match Evaluation::from_game_state(position.game_state()) {
            Some(terminal) => terminal,
            None => Evaluation::Centipawns(self.heuristic_score(position)),
        }
    }

    /// Centipawn heuristics only, without checking whether the game is over.
    pub fn heuristic_score(&self, position: &Position) -> i64 {
        let piece_count = non_king_piece_count(position);
        let material = non_king_material(position);
        let endgame =
            piece_count < self.config.endgame_piece_count || material <= self.config.endgame_material;

        let mut score = 0;
        for side in Side::iter() {
            let side_score = material_of(position, side)
                + self.piece_square_score(position, side, endgame)
                + self.passed_pawn_bonus(position, side)
                - self.doubled_pawn_penalty(position.pieces(side, Piece::Pawn));

            score += match side {
                Side::White => side_score,
                Side::Black => -side_score,
            };
        }

        let control = position.controlled(Side::White).count() as i64
            - position.controlled(Side::Black).count() as i64;
        score += control * self.config.controlled_square_bonus;

        self.scale(score, piece_count, material, position.halfmove_clock())
    }

    /// Piece-count and material ratios divide the score, so it grows as the
    /// board empties. A long quiet stretch then damps it toward zero.
    fn scale(&self, score: i64, piece_count: u32, material: i64, halfmove_clock: u32) -> i64 {
        let piece_ratio = (f64::from(piece_count) / f64::from(START_PIECE_COUNT))
            .max(self.config.piece_count_ratio_floor);
        let material_ratio =
            (material as f64 / START_MATERIAL as f64).max(self.config.material_ratio_floor);

        let mut scaled = score as f64 / piece_ratio / material_ratio;

        if halfmove_clock > self.config.halfmove_damping_start {
            let excess = f64::from(halfmove_clock - self.config.halfmove_damping_start);
            let damping = (excess * self.config.halfmove_damping_rate).min(self.config.halfmove_damping_cap);
            scaled *= 1.0 - damping;
        }

        scaled.round() as i64
    }

    pub fn piece_square_score(&self, position: &Position, side: Side, endgame: bool) -> i64 {
        let mut score = 0;

        for piece in Piece::iter() {
            let table = piece_square_table(piece, endgame);

            for square in position.pieces(side, piece).squares() {
                let index = match side {
                    Side::White => square,
                    Side::Black => square.flipped(),
                };
                score += i64::from(table[index as usize]);
            }
        }

        score
    }

    /// Superlinear in the number of extra pawns on each file.
    pub fn doubled_pawn_penalty(&self, pawns: BitBoard) -> i64 {
        (0..NUM_FILES)
            .map(|file| (pawns & BitBoard(FILE_A << file)).count())
            .filter(|&count| count > 1)
            .map(|count| {
                let extra = f64::from(count - 1).powf(self.config.doubled_pawn_exponent).floor();
                self.config.doubled_pawn_penalty * extra as i64
            })
            .sum()
    }

    pub fn passed_pawn_bonus(&self, position: &Position, side: Side) -> i64 {
        let enemy_pawns = position.pieces(side.opponent(), Piece::Pawn);

        position
            .pieces(side, Piece::Pawn)
            .squares()
            .filter(|&square| (passed_pawn_mask(side, square) & enemy_pawns).is_empty())
            .map(|square| {
                let relative_rank = match side {
                    Side::White => square.rank(),
                    Side::Black => 7 - square.rank(),
                };
                PASSED_PAWN_BONUS[relative_rank as usize]
            })
            .sum()
    }
}

fn piece_square_table(piece: Piece, endgame: bool) -> &'static [i32; NUM_SQUARES] {
    match piece {
        Piece::Pawn => &PAWN_SCORE,
        Piece::Knight => &KNIGHT_SCORE,
        Piece::Bishop => &BISHOP_SCORE,
        Piece::Rook => &ROOK_SCORE,
        Piece::Queen => &QUEEN_SCORE,
        Piece::King if endgame => &KING_ENDGAME_SCORE,
        Piece::King => &KING_SCORE,
    }
}

fn material_of(position: &Position, side: Side) -> i64 {
    Piece::iter()
        .map(|piece| i64::from(position.pieces(side, piece).count()) * piece.value())
        .sum()
}

fn non_king_material(position: &Position) -> i64 {
    material_of(position, Side::White) + material_of(position, Side::Black)
}

fn non_king_piece_count(position: &Position) -> u32 {
    Side::iter()
        .flat_map(|side| {
            [
                Piece::Pawn,
                Piece::Knight,
                Piece::Bishop,
                Piece::Rook,
                Piece::Queen,
            ]
            .map(|piece| position.pieces(side, piece).count())
        })
        .sum()
}
