/// NOTE: 1 ply = one move by a single player

pub const NUM_SQUARES: usize = 64;
pub const NUM_PIECE_TYPES: usize = 6;
pub const NUM_SIDES: usize = 2;
pub const NUM_RANKS: usize = 8;
pub const NUM_FILES: usize = 8;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// Material, in centipawns
pub const PAWN_VALUE: i64 = 100;
pub const KNIGHT_VALUE: i64 = 300;
pub const BISHOP_VALUE: i64 = 310;
pub const ROOK_VALUE: i64 = 500;
pub const QUEEN_VALUE: i64 = 900;

/// Non-king pieces on the board at the start of a game.
pub const START_PIECE_COUNT: u32 = 30;

/// Non-king material of both sides at the start of a game.
pub const START_MATERIAL: i64 =
    2 * (8 * PAWN_VALUE + 2 * KNIGHT_VALUE + 2 * BISHOP_VALUE + 2 * ROOK_VALUE + QUEEN_VALUE);

// Evaluation defaults. See `EvaluatorConfig`.
pub const DOUBLED_PAWN_PENALTY: i64 = 25;
pub const DOUBLED_PAWN_EXPONENT: f64 = 1.2;
pub const CONTROLLED_SQUARE_BONUS: i64 = 2;
pub const PIECE_COUNT_RATIO_FLOOR: f64 = 0.5;
pub const MATERIAL_RATIO_FLOOR: f64 = 0.3;
pub const HALFMOVE_DAMPING_START: u32 = 30;
pub const HALFMOVE_DAMPING_RATE: f64 = 0.03;
pub const HALFMOVE_DAMPING_CAP: f64 = 0.5;
/// Below either threshold the king switches to its endgame table.
pub const ENDGAME_PIECE_COUNT: u32 = 10;
pub const ENDGAME_MATERIAL: i64 = 2600;

// Game rules
pub const FIFTY_MOVE_HALFMOVES: u32 = 100;
pub const REPETITION_DRAW_COUNT: u32 = 3;

/// Mate distances (in ply) are clamped to this when mapped onto the comparison key.
pub const MAX_FORCED_MATE_DEPTH: u32 = 500;

/// Hard limit for iterative deepening (in ply).
pub const MAX_SEARCH_DEPTH: u16 = 50;

// Move ordering weights
pub const CHECK_ORDER_BONUS: i64 = 200;
pub const CAPTURE_ORDER_BONUS: i64 = 100;
pub const PAWN_MOVE_ORDER_BONUS: i64 = 20;
pub const DOUBLE_PUSH_ORDER_BONUS: i64 = 10;

// Time
pub const DEFAULT_PLAYER_TIME_REMAINING_MS: u64 = 300_000; // 5 minutes
pub const DEFAULT_PLAYER_INCREMENT_MS: u64 = 0;
pub const ESTIMATED_MOVES_PER_GAME: u64 = 40;
pub const ESTIMATED_MOVES_TAPER_START: u64 = 20;
pub const MIN_ESTIMATED_MOVES_REMAINING: u64 = 10;
/// A new iteration starts only if elapsed + this multiple of the last iteration fits the goal.
pub const ITERATION_GROWTH_FACTOR: u32 = 2;
/// The running iteration is abandoned once elapsed time reaches this multiple of the goal.
pub const HARD_LIMIT_FACTOR: u32 = 3;

/// Seed for the signature keys. Fixed so signatures are stable between runs.
pub const ZOBRIST_SEED: u64 = 0x5EED_C4E5_5B0A_4D01;

/// Passed-pawn bonus by rank, from the pawn owner's viewpoint.
/// Rank 7 pawns are already rewarded by `PAWN_SCORE`.
pub const PASSED_PAWN_BONUS: [i64; NUM_RANKS] = [0, 8, 8, 15, 30, 60, 0, 0];

/// A1 - H8, from white's viewpoint
#[rustfmt::skip]
pub const PAWN_SCORE: [i32; NUM_SQUARES] = [
        0,   0,   0,   0,   0,   0,   0,   0,
        0,   2,   4, -12, -12,   4,   2,   0,
        0,   2,   4,   4,   4,   4,   2,   0,
        0,   2,   4,   8,   8,   4,   2,   0,
        0,   2,   4,   8,   8,   4,   2,   0,
        4,   8,  10,  16,  16,  10,   8,   4,
      100, 100, 100, 100, 100, 100, 100, 100,
        0,   0,   0,   0,   0,   0,   0,   0
];

#[rustfmt::skip]
pub const KNIGHT_SCORE: [i32; NUM_SQUARES] = [
       -30, -20, -10, -8, -8, -10, -20,  -30,
       -16,  -6,  -2,  0,  0,  -2,  -6,  -16,
        -8,  -2,   4,  6,  6,   4,  -2,   -8,
        -5,   0,   6,  8,  8,   6,   0,   -5,
        -5,   0,   6,  8,  8,   6,   0,   -5,
       -10,  -2,   4,  6,  6,   4,  -2,  -10,
       -20, -10,  -2,  0,  0,  -2, -10,  -20,
      -150, -20, -10, -5, -5, -10, -20, -150
];

#[rustfmt::skip]
pub const BISHOP_SCORE: [i32; NUM_SQUARES] = [
      -10, -10, -12, -10, -10, -12, -10, -10,
        0,   4,   4,   4,   4,   4,   4,   0,
        2,   4,   6,   6,   6,   6,   4,   2,
        2,   4,   6,   8,   8,   6,   4,   2,
        2,   4,   6,   8,   8,   6,   4,   2,
        2,   4,   6,   6,   6,   6,   4,   2,
      -10,   4,   4,   4,   4,   4,   4, -10,
      -10, -10, -10, -10, -10, -10, -10, -10
];

#[rustfmt::skip]
pub const ROOK_SCORE: [i32; NUM_SQUARES] = [
       4,  4,  4,  6,  6,  4,  4,  4,
       0,  0,  0,  0,  0,  0,  0,  0,
       0,  0,  0,  0,  0,  0,  0,  0,
       0,  0,  0,  0,  0,  0,  0,  0,
       0,  0,  0,  0,  0,  0,  0,  0,
       0,  0,  0,  0,  0,  0,  0,  0,
      20, 20, 20, 20, 20, 20, 20, 20,
      10, 10, 10, 10, 10, 10, 10, 10
];

#[rustfmt::skip]
pub const QUEEN_SCORE: [i32; NUM_SQUARES] = [
      -10, -10, -6, -4, -4, -6, -10, -10,
      -10,   2,  2,  2,  2,  2,   2, -10,
        2,   2,  2,  3,  3,  2,   2,   2,
        2,   2,  3,  4,  4,  3,   2,   2,
        2,   2,  3,  4,  4,  3,   2,   2,
        2,   2,  2,  3,  3,  2,   2,   2,
      -10,   2,  2,  2,  2,  2,   2, -10,
      -10, -10,  2,  2,  2,  2, -10, -10
];

#[rustfmt::skip]
pub const KING_SCORE: [i32; NUM_SQUARES] = [
       20,  20,  20, -40,  10, -60,  20,  20,
       15,  20, -25, -30, -30, -45,  20,  15,
      -48, -48, -48, -48, -48, -48, -48, -48,
      -48, -48, -48, -48, -48, -48, -48, -48,
      -48, -48, -48, -48, -48, -48, -48, -48,
      -48, -48, -48, -48, -48, -48, -48, -48,
      -48, -48, -48, -48, -48, -48, -48, -48,
      -48, -48, -48, -48, -48, -48, -48, -48
];

#[rustfmt::skip]
pub const KING_ENDGAME_SCORE: [i32; NUM_SQUARES] = [
       0,  8, 16, 18, 18, 16,  8,  0,
       8, 16, 24, 32, 32, 24, 16,  8,
      16, 24, 32, 40, 40, 32, 24, 16,
      25, 32, 40, 48, 48, 40, 32, 25,
      25, 32, 40, 48, 48, 40, 32, 25,
      16, 24, 32, 40, 40, 32, 24, 16,
       8, 16, 24, 32, 32, 24, 16,  8,
       0,  8, 16, 18, 18, 16,  8,  0
];
