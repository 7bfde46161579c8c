use std::fmt;

use crate::{
    constants::MAX_FORCED_MATE_DEPTH,
    types::{GameState, Side},
};

/// Largest magnitude on the comparison scale, reserved for finished games.
pub const EVAL_MAX: i64 = i64::MAX;

/// Centipawn scores are clamped inside this bound so they never reach mate territory.
pub const CENTIPAWN_LIMIT: i64 = EVAL_MAX - MAX_FORCED_MATE_DEPTH as i64 - 1;

/// Score of a position, always from white's point of view.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Evaluation {
    /// Positive favours white.
    Centipawns(i64),
    /// `winner` mates in `plies` half-moves.
    ForcedMate { winner: Side, plies: u32 },
    /// `None` is a draw.
    GameOver { winner: Option<Side> },
}

impl Evaluation {
    /// `None` for an ongoing game.
    pub fn from_game_state(state: GameState) -> Option<Evaluation> {
        match state {
            GameState::Ongoing => None,
            GameState::WhiteWon => Some(Evaluation::GameOver {
                winner: Some(Side::White),
            }),
            GameState::BlackWon => Some(Evaluation::GameOver {
                winner: Some(Side::Black),
            }),
            GameState::Draw => Some(Evaluation::GameOver { winner: None }),
        }
    }

    /// The lowest possible value for `side`: a finished game lost by it.
    pub fn worst_for(side: Side) -> Evaluation {
        Evaluation::GameOver {
            winner: Some(side.opponent()),
        }
    }

    /// Monotone comparison key: higher is better for white.
    ///
    /// Finished wins sit at the extremes, then forced mates (closer mates
    /// further out), then clamped centipawns.
    pub fn key(&self) -> i64 {
        match *self {
            Evaluation::Centipawns(centipawns) => {
                centipawns.clamp(-CENTIPAWN_LIMIT, CENTIPAWN_LIMIT)
            }
            Evaluation::ForcedMate { winner, plies } => {
                let distance = plies.clamp(1, MAX_FORCED_MATE_DEPTH) as i64;
                signed(winner, EVAL_MAX - distance)
            }
            Evaluation::GameOver { winner: Some(winner) } => signed(winner, EVAL_MAX),
            Evaluation::GameOver { winner: None } => 0,
        }
    }

    /// Whether `self` is strictly better than `other` for `side`.
    pub fn is_better_for(&self, side: Side, other: &Evaluation) -> bool {
        match side {
            Side::White => self.key() > other.key(),
            Side::Black => self.key() < other.key(),
        }
    }

    /// Ages a decisive result by one ply as it moves up the tree. Finished
    /// games become mate-in-one, mates get one ply longer, a finished draw
    /// becomes an even score and centipawns are unchanged.
    pub fn tick(self) -> Evaluation {
        match self {
            Evaluation::GameOver {
                winner: Some(winner),
            } => Evaluation::ForcedMate { winner, plies: 1 },
            Evaluation::GameOver { winner: None } => Evaluation::Centipawns(0),
            Evaluation::ForcedMate { winner, plies } => Evaluation::ForcedMate {
                winner,
                plies: plies.saturating_add(1),
            },
            centipawns @ Evaluation::Centipawns(_) => centipawns,
        }
    }

    pub fn is_decisive(&self) -> bool {
        !matches!(
            self,
            Evaluation::Centipawns(_) | Evaluation::GameOver { winner: None }
        )
    }

    /// Mate distance in full moves of the winning side.
    pub fn mate_in_moves(&self) -> Option<u32> {
        match self {
            Evaluation::ForcedMate { plies, .. } => Some(plies.div_ceil(2)),
            _ => None,
        }
    }

    /// UCI `score` payload relative to `side_to_move`: `cp 35`, `mate 3`, `mate -2`.
    pub fn uci_score(&self, side_to_move: Side) -> String {
        let perspective = match side_to_move {
            Side::White => 1,
            Side::Black => -1,
        };

        match *self {
            Evaluation::Centipawns(centipawns) => format!("cp {}", centipawns * perspective),
            Evaluation::ForcedMate { winner, plies } => {
                let moves = i64::from(plies.div_ceil(2));
                if winner == side_to_move {
                    format!("mate {moves}")
                } else {
                    format!("mate -{moves}")
                }
            }
            Evaluation::GameOver { winner: Some(_) } => "mate 0".to_string(),
            Evaluation::GameOver { winner: None } => "cp 0".to_string(),
        }
    }
}

fn signed(winner: Side, magnitude: i64) -> i64 {
    match winner {
        Side::White => magnitude,
        Side::Black => -magnitude,
    }
}

/// `+1.23`, `+M4` / `-M4`, `1-0`, `0-1`, `0.5-0.5`
impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Evaluation::Centipawns(centipawns) => {
                let sign = if centipawns < 0 { '-' } else { '+' };
                let magnitude = centipawns.unsigned_abs();
                write!(f, "{sign}{}.{:02}", magnitude / 100, magnitude % 100)
            }
            Evaluation::ForcedMate { winner, plies } => {
                let sign = match winner {
                    Side::White => '+',
                    Side::Black => '-',
                };
                write!(f, "{sign}M{}", plies.div_ceil(2))
            }
            Evaluation::GameOver {
                winner: Some(Side::White),
            } => write!(f, "1-0"),
            Evaluation::GameOver {
                winner: Some(Side::Black),
            } => write!(f, "0-1"),
            Evaluation::GameOver { winner: None } => write!(f, "0.5-0.5"),
        }
    }
}
