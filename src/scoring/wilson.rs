//! Wilson score lower bound for a binomial proportion.
//!
//! A conservative mastery estimate: a clue answered 1-for-1 ranks well below
//! one answered 50-for-50, because the interval around 1/1 is wide.

pub const DEFAULT_Z: f64 = 1.96;

pub fn wilson_lower_bound(successes: u32, total: u32) -> f64 {
    wilson_lower_bound_with_z(successes, total, DEFAULT_Z)
}

pub fn wilson_lower_bound_with_confidence(successes: u32, total: u32, confidence: f64) -> f64 {
    wilson_lower_bound_with_z(successes, total, z_for_confidence(confidence))
}

/// Callers guarantee `successes <= total`; excess successes are clamped.
pub fn wilson_lower_bound_with_z(successes: u32, total: u32, z: f64) -> f64 {
    if total == 0 {
        return 0.0;
    }

    let n = total as f64;
    let p = successes.min(total) as f64 / n;
    let z2 = z * z;

    let numerator = p + z2 / (2.0 * n) - z * ((p * (1.0 - p) + z2 / (4.0 * n)) / n).sqrt();
    let denominator = 1.0 + z2 / n;

    (numerator / denominator).clamp(0.0, 1.0)
}

/// Two-sided standard-normal quantile for the common confidence levels.
pub fn z_for_confidence(confidence: f64) -> f64 {
    const TABLE: [(f64, f64); 5] = [
        (0.80, 1.2816),
        (0.90, 1.6449),
        (0.95, 1.96),
        (0.98, 2.3263),
        (0.99, 2.5758),
    ];

    TABLE
        .iter()
        .find(|(level, _)| (level - confidence).abs() < 1e-9)
        .map(|(_, z)| *z)
        .unwrap_or_else(|| {
            tracing::warn!(confidence, "unsupported confidence level, using 95%");
            DEFAULT_Z
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_attempts_is_zero() {
        assert_eq!(wilson_lower_bound(0, 0), 0.0);
    }

    #[test]
    fn test_more_successes_score_higher() {
        assert!(wilson_lower_bound(8, 10) > wilson_lower_bound(5, 10));
        for total in 1..=30 {
            let mut prev = wilson_lower_bound(0, total);
            for s in 1..=total {
                let cur = wilson_lower_bound(s, total);
                assert!(cur >= prev, "s={s} n={total}");
                prev = cur;
            }
        }
    }

    #[test]
    fn test_more_evidence_narrows_interval() {
        assert!(wilson_lower_bound(50, 50) > wilson_lower_bound(1, 1));
        assert!(wilson_lower_bound(10, 10) > wilson_lower_bound(2, 2));
        assert!(wilson_lower_bound(1000, 1000) > 0.99);
    }

    #[test]
    fn test_single_attempt_stays_in_range() {
        let right = wilson_lower_bound(1, 1);
        let wrong = wilson_lower_bound(0, 1);
        assert!(right > 0.0 && right < 1.0);
        assert!((0.0..=1.0).contains(&wrong));
        assert!(wrong < 1e-9);
    }

    #[test]
    fn test_five_for_five() {
        let score = wilson_lower_bound(5, 5);
        assert!((score - 0.566).abs() < 0.001, "got {score}");
    }

    #[test]
    fn test_confidence_lookup() {
        assert_eq!(z_for_confidence(0.95), 1.96);
        assert_eq!(z_for_confidence(0.42), DEFAULT_Z);
        assert!(
            wilson_lower_bound_with_confidence(8, 10, 0.99)
                < wilson_lower_bound_with_confidence(8, 10, 0.80)
        );
    }
}
