use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform randomness for tie-breaking and weighted draws.
pub trait RandomSource: Send {
    /// Uniform value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `[0, upper)`. `upper` must be non-zero.
    fn below(&mut self, upper: usize) -> usize {
        let scaled = (self.next_f64() * upper as f64) as usize;
        scaled.min(upper.saturating_sub(1))
    }
}

/// Draws from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&mut self) -> f64 {
        rand::rng().random::<f64>()
    }

    fn below(&mut self, upper: usize) -> usize {
        rand::rng().random_range(0..upper)
    }
}

#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn below(&mut self, upper: usize) -> usize {
        self.rng.random_range(0..upper)
    }
}

/// Replays a fixed sequence, then repeats the last value (0.0 if empty).
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: VecDeque<f64>,
    last: f64,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().map(|v| v.clamp(0.0, 0.999_999)).collect(),
            last: 0.0,
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if let Some(value) = self.values.pop_front() {
            self.last = value;
        }
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_replays_then_repeats() {
        let mut rng = ScriptedRandom::new([0.25, 0.5]);
        assert_eq!(rng.next_f64(), 0.25);
        assert_eq!(rng.next_f64(), 0.5);
        assert_eq!(rng.next_f64(), 0.5);
        assert_eq!(rng.below(4), 2);
    }

    #[test]
    fn test_below_stays_in_range() {
        let mut rng = ScriptedRandom::new([1.0]);
        assert_eq!(rng.below(3), 2);

        let mut seeded = SeededRandom::new(7);
        for _ in 0..1000 {
            assert!(seeded.below(5) < 5);
            let v = seeded.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
