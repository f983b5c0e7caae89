const BASE_MINUTES: f64 = 1.0;
const MAX_MINUTES: f64 = 240.0;
const ATTEMPT_BONUS_SATURATION: f64 = 10.0;
const MS_PER_MINUTE: f64 = 60_000.0;

pub const UNSEEN_PRIORITY: f64 = -1000.0;
const RESTING_BASE: f64 = 1000.0;
const RESTING_SPAN: f64 = 1000.0;
const MAX_OVERDUE_RATIO: f64 = 5.0;
const OVERDUE_WEIGHT: f64 = 0.1;

/// Minimum time (ms) that must pass after an attempt before the clue is
/// eligible again. Grows quadratically with confidence and is stretched up
/// to 2x by attempt volume.
pub fn min_interval_ms(wilson_lower: f64, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }

    let scale_factor = wilson_lower.powi(2) * MAX_MINUTES + BASE_MINUTES;
    let attempt_bonus = (total as f64 / ATTEMPT_BONUS_SATURATION).min(1.0);
    let minutes = scale_factor * (1.0 + attempt_bonus * wilson_lower);

    minutes * MS_PER_MINUTE
}

/// Scheduling priority, lower is shown sooner.
///
/// Unseen clues get [`UNSEEN_PRIORITY`]. Resting clues land in `[1000, 2000]`
/// by how much rest remains. Eligible clues score their Wilson bound minus a
/// small overdue bonus (at most 0.5).
pub fn priority(wilson_lower: f64, total: u32, last_attempt_time: i64, now: i64) -> f64 {
    if total == 0 {
        return UNSEEN_PRIORITY;
    }

    let interval = min_interval_ms(wilson_lower, total);
    let elapsed = (now - last_attempt_time) as f64;

    if elapsed < interval {
        let remaining = (interval - elapsed) / interval;
        return RESTING_BASE + remaining * RESTING_SPAN;
    }

    let overdue_ratio = elapsed / interval;
    let penalty = (overdue_ratio - 1.0).min(MAX_OVERDUE_RATIO) * OVERDUE_WEIGHT;

    wilson_lower - penalty
}

pub fn is_resting(wilson_lower: f64, total: u32, last_attempt_time: i64, now: i64) -> bool {
    total > 0 && ((now - last_attempt_time) as f64) < min_interval_ms(wilson_lower, total)
}
