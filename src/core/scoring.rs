//! Scoring module - score, level and turn-delay formulas
//!
//! Points for a clear scale with the number of lines, the number of
//! distinct cleared cells, and the running multiplier. The level rises
//! every 1000 points and shortens the turn countdown by 500 ms per
//! level down to a 2.5 s floor.

use std::time::Duration;

use crate::types::{INITIAL_TURN_MS, MIN_TURN_MS, POINTS_PER_BLOCK, POINTS_PER_LEVEL, TURN_STEP_MS};

/// Points awarded for clearing `lines` lines covering `blocks` distinct
/// cells at the given multiplier
pub fn score_delta(lines: u32, blocks: u32, multiplier: u32) -> u32 {
    lines * blocks * POINTS_PER_BLOCK * multiplier
}

/// Level for a running score (one level per 1000 points)
pub fn level_for_score(score: u32) -> u32 {
    score / POINTS_PER_LEVEL
}

/// Countdown duration for a turn at the given level, in milliseconds
pub fn turn_delay_ms(level: u32) -> u64 {
    INITIAL_TURN_MS
        .saturating_sub(TURN_STEP_MS * level as u64)
        .max(MIN_TURN_MS)
}

/// Countdown duration for a turn at the given level
pub fn turn_delay(level: u32) -> Duration {
    Duration::from_millis(turn_delay_ms(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_scales_with_all_factors() {
        assert_eq!(score_delta(1, 5, 1), 50);
        assert_eq!(score_delta(2, 9, 1), 180);
        assert_eq!(score_delta(2, 9, 3), 540);
        assert_eq!(score_delta(0, 0, 1), 0);
    }

    #[test]
    fn level_rises_every_thousand() {
        assert_eq!(level_for_score(0), 0);
        assert_eq!(level_for_score(999), 0);
        assert_eq!(level_for_score(1000), 1);
        assert_eq!(level_for_score(4321), 4);
    }

    #[test]
    fn turn_delay_shrinks_to_floor() {
        assert_eq!(turn_delay_ms(0), 12_000);
        assert_eq!(turn_delay_ms(4), 10_000);
        assert_eq!(turn_delay_ms(19), 2_500);
        assert_eq!(turn_delay_ms(100), 2_500);
    }
}
