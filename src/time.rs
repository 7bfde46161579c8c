use std::time::{Duration, Instant};

use crate::constants::{
    ESTIMATED_MOVES_PER_GAME, ESTIMATED_MOVES_TAPER_START, HARD_LIMIT_FACTOR,
    ITERATION_GROWTH_FACTOR, MIN_ESTIMATED_MOVES_REMAINING,
};

/// Time budget of one search. `None` limits never trigger.
#[derive(Debug, Clone, Copy)]
pub struct TimeManager {
    pub start_time: Instant,
    /// Iterations are not started if they are projected to end past this
    pub goal: Option<Duration>,
    /// The running iteration is abandoned here
    pub hard_limit: Option<Duration>,
}

/// For depth, node and infinite searches
impl Default for TimeManager {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl TimeManager {
    pub fn unlimited() -> Self {
        Self {
            start_time: Instant::now(),
            goal: None,
            hard_limit: None,
        }
    }

    /// Spend exactly `movetime_ms`.
    pub fn fixed(movetime_ms: u64) -> Self {
        let budget = Duration::from_millis(movetime_ms);

        Self {
            start_time: Instant::now(),
            goal: Some(budget),
            hard_limit: Some(budget),
        }
    }

    /// Budget from the mover's remaining clock and increment.
    pub fn for_clock(time_left_ms: u64, increment_ms: u64, fullmove_number: u32) -> Self {
        let goal_ms = move_time_goal_ms(time_left_ms, increment_ms, fullmove_number);
        let hard_ms = (goal_ms * u64::from(HARD_LIMIT_FACTOR)).min(time_left_ms / 2);

        Self {
            start_time: Instant::now(),
            goal: Some(Duration::from_millis(goal_ms.min(hard_ms))),
            hard_limit: Some(Duration::from_millis(hard_ms)),
        }
    }

    /// Time since search began
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// The next iteration is assumed to take `ITERATION_GROWTH_FACTOR` times the last one.
    pub fn can_start_iteration(&self, last_iteration: Duration) -> bool {
        match self.goal {
            Some(goal) => self.elapsed() + last_iteration * ITERATION_GROWTH_FACTOR < goal,
            None => true,
        }
    }

    /// Check if we must abort immediately
    pub fn is_hard_limit_reached(&self) -> bool {
        self.hard_limit
            .is_some_and(|hard_limit| self.elapsed() >= hard_limit)
    }
}

/// Games are assumed to last `ESTIMATED_MOVES_PER_GAME` moves; past move 20
/// the estimate shrinks by one per move, never below the minimum.
pub fn estimated_moves_remaining(fullmove_number: u32) -> u64 {
    let played_past_taper = u64::from(fullmove_number).saturating_sub(ESTIMATED_MOVES_TAPER_START);

    ESTIMATED_MOVES_PER_GAME
        .saturating_sub(played_past_taper)
        .max(MIN_ESTIMATED_MOVES_REMAINING)
}

/// Even share of the remaining time, plus half of the increments expected
/// over the same number of moves.
pub fn move_time_goal_ms(time_left_ms: u64, increment_ms: u64, fullmove_number: u32) -> u64 {
    let moves_left = estimated_moves_remaining(fullmove_number);

    if increment_ms == 0 {
        time_left_ms / moves_left
    } else {
        (time_left_ms + moves_left * increment_ms / 2) / moves_left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_remaining_tapers_after_move_twenty() {
        assert_eq!(estimated_moves_remaining(1), 40);
        assert_eq!(estimated_moves_remaining(20), 40);
        assert_eq!(estimated_moves_remaining(25), 35);
        assert_eq!(estimated_moves_remaining(50), 10);
        assert_eq!(estimated_moves_remaining(200), 10);
    }

    #[test]
    fn goal_shares_time_and_increment() {
        assert_eq!(move_time_goal_ms(40_000, 0, 1), 1_000);
        assert_eq!(move_time_goal_ms(40_000, 2_000, 1), 2_000);
        assert_eq!(move_time_goal_ms(10_000, 0, 60), 1_000);
    }

    #[test]
    fn clock_budget_never_exceeds_half_the_clock() {
        let manager = TimeManager::for_clock(1_000, 5_000, 1);
        let hard = manager.hard_limit.expect("clock searches have a hard limit");
        let goal = manager.goal.expect("clock searches have a goal");

        assert!(hard <= Duration::from_millis(500));
        assert!(goal <= hard);
    }

    #[test]
    fn unlimited_never_stops() {
        let manager = TimeManager::unlimited();
        assert!(manager.can_start_iteration(Duration::from_secs(3600)));
        assert!(!manager.is_hard_limit_reached());
    }

    #[test]
    fn projection_blocks_an_iteration_that_would_overrun() {
        let manager = TimeManager::fixed(100);
        assert!(manager.can_start_iteration(Duration::ZERO));
        assert!(!manager.can_start_iteration(Duration::from_millis(60)));
    }
}
