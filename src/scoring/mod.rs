pub mod interval;
pub mod random;
pub mod selector;
pub mod wilson;
pub mod window;

pub use interval::{min_interval_ms, priority};
pub use random::{RandomSource, ScriptedRandom, SeededRandom, ThreadRandom};
pub use selector::{select_next, Selection};
pub use wilson::wilson_lower_bound;
pub use window::{clue_window_stats, puzzle_weekly_accuracy, window_stats, ClueWindowStats, Window, WindowStats};

use crate::types::{AttemptRecord, AttemptTally, ClueRecord, ScoredClue};

/// Derives the full scoring state of one clue from its attempt log.
pub fn score_clue(
    clue: ClueRecord,
    puzzle_date: impl Into<String>,
    attempts: &[AttemptRecord],
    now: i64,
) -> ScoredClue {
    let tally = AttemptTally::from_attempts(attempts);
    let wilson_lower = wilson_lower_bound(tally.correct(), tally.total());
    let last_attempt_time = attempts.iter().map(|a| a.timestamp).max();
    let min_interval = min_interval_ms(wilson_lower, tally.total());
    let priority = priority(
        wilson_lower,
        tally.total(),
        last_attempt_time.unwrap_or(0),
        now,
    );

    ScoredClue {
        clue,
        puzzle_date: puzzle_date.into(),
        wilson_lower,
        total_attempts: tally.total(),
        correct_attempts: tally.correct(),
        last_attempt_time,
        min_interval,
        priority,
        time_since_last_attempt: last_attempt_time.map(|t| now - t),
    }
}
