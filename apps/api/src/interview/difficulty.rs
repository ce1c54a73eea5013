//! Adaptive difficulty: maps the last score to the next question's difficulty.
//!
//! Deliberately a fixed step function rather than a learned policy:
//! - score >= 8 → up two levels
//! - score 5..=7 → up one level
//! - score <= 4 → down one level
//!
//! Results are always clamped to `[1, 10]`.

use crate::interview::models::{MAX_DIFFICULTY, MIN_DIFFICULTY};

const STRONG_SCORE: u8 = 8;
const WEAK_SCORE: u8 = 4;

/// Pure and deterministic: the same inputs always give the same output.
pub fn next_difficulty(current: u8, score: u8) -> u8 {
    let current = current.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);

    let next = if score >= STRONG_SCORE {
        current.saturating_add(2)
    } else if score <= WEAK_SCORE {
        current.saturating_sub(1)
    } else {
        current.saturating_add(1)
    };

    next.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_score_steps_up_two() {
        assert_eq!(next_difficulty(5, 9), 7);
        assert_eq!(next_difficulty(3, 8), 5);
    }

    #[test]
    fn test_strong_score_clamps_at_ceiling() {
        assert_eq!(next_difficulty(10, 9), 10);
        assert_eq!(next_difficulty(9, 10), 10);
    }

    #[test]
    fn test_weak_score_steps_down_one() {
        assert_eq!(next_difficulty(5, 4), 4);
        assert_eq!(next_difficulty(5, 1), 4);
    }

    #[test]
    fn test_weak_score_clamps_at_floor() {
        assert_eq!(next_difficulty(1, 3), 1);
    }

    #[test]
    fn test_middling_score_steps_up_one() {
        assert_eq!(next_difficulty(5, 6), 6);
        assert_eq!(next_difficulty(5, 5), 6);
        assert_eq!(next_difficulty(5, 7), 6);
        assert_eq!(next_difficulty(10, 6), 10);
    }

    #[test]
    fn test_out_of_range_current_is_clamped_first() {
        assert_eq!(next_difficulty(0, 3), 1);
        assert_eq!(next_difficulty(200, 9), 10);
    }

    #[test]
    fn test_output_always_in_range() {
        for current in 1..=10 {
            for score in 1..=10 {
                let next = next_difficulty(current, score);
                assert!((1..=10).contains(&next), "({current}, {score}) -> {next}");
                assert_eq!(next, next_difficulty(current, score));
            }
        }
    }
}
