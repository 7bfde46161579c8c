use tracing::trace;

use crate::{
    bitboard::{king_move_mask, knight_move_mask, pawn_attack_mask, sliding_attacks},
    moves::{Move, MoveKind},
    position::Position,
    types::{BitBoard, CastleSide, Direction, Piece, Side, Square},
};

/// Every legal move for the side to move.
pub fn legal_moves(position: &Position) -> Vec<Move> {
    let side = position.side_to_move();
    let origin = position.signature();
    let mut moves = Vec::with_capacity(48);

    for from in position.occupancy(side).squares() {
        moves.extend(
            candidate_moves(position, origin, from)
                .into_iter()
                .filter(|candidate| is_legal(position, candidate)),
        );
    }

    moves
}

/// Legal moves of the piece on `from`, if it belongs to the side to move.
pub fn legal_moves_from(position: &Position, from: Square) -> Vec<Move> {
    pseudo_legal_moves(position, from)
        .into_iter()
        .filter(|candidate| is_legal(position, candidate))
        .collect()
}

/// Candidates for the piece on `from` that ignore self-check.
pub fn pseudo_legal_moves(position: &Position, from: Square) -> Vec<Move> {
    match position.piece_at(from) {
        Some((side, _)) if side == position.side_to_move() => {
            candidate_moves(position, position.signature(), from)
        }
        _ => Vec::new(),
    }
}

fn candidate_moves(position: &Position, origin: u64, from: Square) -> Vec<Move> {
    let Some((side, piece)) = position.piece_at(from) else {
        return Vec::new();
    };

    let own = position.occupancy(side);
    let occupied = position.occupied();
    let mut moves = Vec::new();

    match piece {
        Piece::Pawn => pawn_candidates(position, origin, side, from, &mut moves),
        Piece::Knight => {
            let targets = knight_move_mask(from) & !own;
            push_targets(position, origin, side, piece, from, targets, &mut moves);
        }
        Piece::Bishop => {
            let targets = sliding_attacks(from, occupied, &Direction::DIAGONAL) & !own;
            push_targets(position, origin, side, piece, from, targets, &mut moves);
        }
        Piece::Rook => {
            let targets = sliding_attacks(from, occupied, &Direction::ORTHOGONAL) & !own;
            push_targets(position, origin, side, piece, from, targets, &mut moves);
        }
        Piece::Queen => {
            let targets = sliding_attacks(from, occupied, &Direction::ALL) & !own;
            push_targets(position, origin, side, piece, from, targets, &mut moves);
        }
        Piece::King => {
            let targets = king_move_mask(from) & !own;
            push_targets(position, origin, side, piece, from, targets, &mut moves);
            castling_candidates(position, origin, side, from, &mut moves);
        }
    }

    moves
}

fn push_targets(
    position: &Position,
    origin: u64,
    side: Side,
    piece: Piece,
    from: Square,
    targets: BitBoard,
    moves: &mut Vec<Move>,
) {
    for to in targets.squares() {
        moves.push(Move::build(position, origin, side, piece, from, to, MoveKind::Normal));
    }
}

/// A push or capture onto the last rank becomes one candidate per promotion piece.
fn push_pawn_move(
    position: &Position,
    origin: u64,
    side: Side,
    from: Square,
    to: Square,
    moves: &mut Vec<Move>,
) {
    if to.rank() == side.promotion_rank() {
        for promote in Piece::PROMOTIONS {
            moves.push(Move::build(
                position,
                origin,
                side,
                Piece::Pawn,
                from,
                to,
                MoveKind::Promotion(promote),
            ));
        }
    } else {
        moves.push(Move::build(position, origin, side, Piece::Pawn, from, to, MoveKind::Normal));
    }
}

fn pawn_candidates(
    position: &Position,
    origin: u64,
    side: Side,
    from: Square,
    moves: &mut Vec<Move>,
) {
    let occupied = position.occupied();
    let enemy = position.occupancy(side.opponent());
    let forward = side.forward();

    if let Some(single) = from.offset(0, forward) {
        if !occupied.is_bit_set(single) {
            push_pawn_move(position, origin, side, from, single, moves);

            if from.rank() == side.pawn_rank() {
                if let Some(double) = from.offset(0, 2 * forward) {
                    if !occupied.is_bit_set(double) {
                        push_pawn_move(position, origin, side, from, double, moves);
                    }
                }
            }
        }
    }

    let attacks = pawn_attack_mask(side, from);
    for to in (attacks & enemy).squares() {
        push_pawn_move(position, origin, side, from, to, moves);
    }

    if let Some(target) = position.en_passant() {
        if attacks.is_bit_set(target) {
            moves.push(Move::build(
                position,
                origin,
                side,
                Piece::Pawn,
                from,
                target,
                MoveKind::EnPassant,
            ));
        }
    }
}

fn castling_candidates(
    position: &Position,
    origin: u64,
    side: Side,
    from: Square,
    moves: &mut Vec<Move>,
) {
    if from.rank() != side.home_rank() {
        return;
    }

    for castle_side in CastleSide::iter() {
        if !position.castling_right(side, castle_side) {
            continue;
        }

        let Some(to) = from.offset(2 * castle_side.direction(), 0) else {
            continue;
        };

        if path_to_rook_is_clear(position, side, from, castle_side) {
            moves.push(Move::build(
                position,
                origin,
                side,
                Piece::King,
                from,
                to,
                MoveKind::Castling(castle_side),
            ));
        }
    }
}

/// Every square strictly between the king and its home-corner rook is empty.
fn path_to_rook_is_clear(
    position: &Position,
    side: Side,
    king: Square,
    castle_side: CastleSide,
) -> bool {
    let mut current = king;

    while let Some(next) = current.offset(castle_side.direction(), 0) {
        match position.piece_at(next) {
            None => current = next,
            Some(found) => {
                return found == (side, Piece::Rook) && next.file() == castle_side.rook_file();
            }
        }
    }

    false
}

/// Rejects candidates that leave the mover's king attacked, and castling
/// out of, through or into check.
fn is_legal(position: &Position, candidate: &Move) -> bool {
    if let MoveKind::Castling(castle_side) = candidate.kind() {
        let opponent = candidate.side().opponent();
        let king_path_attacked = (0..=2)
            .filter_map(|step| candidate.from().offset(step * castle_side.direction(), 0))
            .any(|square| position.is_square_attacked(square, opponent));

        if king_path_attacked {
            return false;
        }
    }

    match candidate.simulate(position) {
        Ok(next) => !next.is_king_attacked(candidate.side()),
        Err(error) => {
            trace!(%error, %candidate, "discarding candidate");
            false
        }
    }
}
