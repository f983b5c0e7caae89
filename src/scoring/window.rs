use serde::Serialize;

use crate::types::{AttemptRecord, AttemptTally};

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    LastHour,
    LastDay,
    LastWeek,
    Lifetime,
}

impl Window {
    pub fn duration_ms(&self) -> Option<i64> {
        match self {
            Self::LastHour => Some(HOUR_MS),
            Self::LastDay => Some(DAY_MS),
            Self::LastWeek => Some(WEEK_MS),
            Self::Lifetime => None,
        }
    }

    pub fn contains(&self, timestamp: i64, now: i64) -> bool {
        match self.duration_ms() {
            Some(duration) => timestamp >= now - duration,
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowStats {
    pub total: u32,
    pub correct: u32,
    /// `None` when there were no attempts; never a misleading 0%.
    pub percent: Option<u32>,
}

impl WindowStats {
    pub fn from_tally(tally: AttemptTally) -> Self {
        Self {
            total: tally.total(),
            correct: tally.correct(),
            percent: percent(tally.correct(), tally.total()),
        }
    }

    pub fn empty() -> Self {
        Self {
            total: 0,
            correct: 0,
            percent: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClueWindowStats {
    pub lifetime: WindowStats,
    pub last_hour: WindowStats,
    pub last_day: WindowStats,
    pub last_week: WindowStats,
}

pub fn percent(correct: u32, total: u32) -> Option<u32> {
    if total == 0 {
        return None;
    }
    Some((100.0 * correct as f64 / total as f64).round() as u32)
}

pub fn window_stats(attempts: &[AttemptRecord], now: i64, window: Window) -> WindowStats {
    let tally = AttemptTally::from_attempts(
        attempts
            .iter()
            .filter(|attempt| window.contains(attempt.timestamp, now)),
    );
    WindowStats::from_tally(tally)
}

pub fn clue_window_stats(attempts: &[AttemptRecord], now: i64) -> ClueWindowStats {
    ClueWindowStats {
        lifetime: window_stats(attempts, now, Window::Lifetime),
        last_hour: window_stats(attempts, now, Window::LastHour),
        last_day: window_stats(attempts, now, Window::LastDay),
        last_week: window_stats(attempts, now, Window::LastWeek),
    }
}

/// Puzzle-level weekly accuracy. `percent` is the mean of per-clue weekly
/// accuracy, where a clue with no weekly attempts contributes 0%.
pub fn puzzle_weekly_accuracy<'a, I>(clue_logs: I, now: i64) -> WindowStats
where
    I: IntoIterator<Item = &'a [AttemptRecord]>,
{
    let mut clue_count = 0u32;
    let mut accuracy_sum = 0.0;
    let mut total = 0u32;
    let mut correct = 0u32;

    for log in clue_logs {
        let weekly = window_stats(log, now, Window::LastWeek);
        clue_count += 1;
        total += weekly.total;
        correct += weekly.correct;
        if weekly.total > 0 {
            accuracy_sum += weekly.correct as f64 / weekly.total as f64;
        }
    }

    let percent = if clue_count > 0 {
        Some((accuracy_sum / clue_count as f64 * 100.0).round() as u32)
    } else {
        None
    };

    WindowStats {
        total,
        correct,
        percent,
    }
}
