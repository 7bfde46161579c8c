use crate::{
    constants::{
        CAPTURE_ORDER_BONUS, CHECK_ORDER_BONUS, DOUBLE_PUSH_ORDER_BONUS, PAWN_MOVE_ORDER_BONUS,
    },
    error::MoveError,
    moves::Move,
    position::Position,
    types::Piece,
};

/// A move together with the position it leads to, so the search does not
/// simulate it a second time.
#[derive(Debug, Clone)]
pub struct OrderedMove {
    pub mv: Move,
    pub position: Position,
    pub weight: i64,
}

/// Simulates every move and sorts them by descending weight. Ties keep
/// generation order.
pub fn order_moves(position: &Position, moves: &[Move]) -> Result<Vec<OrderedMove>, MoveError> {
    let mut ordered = moves
        .iter()
        .map(|mv| {
            let next = mv.simulate(position)?;
            Ok(OrderedMove {
                mv: *mv,
                weight: move_weight(mv, &next),
                position: next,
            })
        })
        .collect::<Result<Vec<_>, MoveError>>()?;

    ordered.sort_by(|a, b| b.weight.cmp(&a.weight));
    Ok(ordered)
}

/// Checks first, then captures by victim minus attacker, then pawn pushes.
pub fn move_weight(mv: &Move, after: &Position) -> i64 {
    let mut weight = 0;

    if after.is_check() {
        weight += CHECK_ORDER_BONUS;
    }

    if let Some(victim) = mv.captured() {
        weight += CAPTURE_ORDER_BONUS + victim.value() - mv.piece().value();
    }

    if mv.piece() == Piece::Pawn {
        weight += PAWN_MOVE_ORDER_BONUS;
        if mv.is_double_push() {
            weight += DOUBLE_PUSH_ORDER_BONUS;
        }
    }

    weight
}
