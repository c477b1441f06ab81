#![forbid(unsafe_code)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Lower bound (exclusive) of every threshold.
pub const DRAW_LOW: f64 = 1.0;
/// Upper bound (exclusive) of every threshold.
pub const DRAW_HIGH: f64 = 2.0;

/// Anything that can hand out row thresholds.
///
/// Each call is one independent trial. Production sources return values in the
/// open interval (1.0, 2.0); `ScriptedDraws` replays whatever it was given.
pub trait DrawSource {
    /// Next threshold.
    fn next_draw(&mut self) -> f64;
}

impl<D: DrawSource + ?Sized> DrawSource for &mut D {
    fn next_draw(&mut self) -> f64 {
        (**self).next_draw()
    }
}

impl<D: DrawSource + ?Sized> DrawSource for Box<D> {
    fn next_draw(&mut self) -> f64 {
        (**self).next_draw()
    }
}

/// Uniform draw from (1.0, 2.0).
///
/// `gen_range` is half-open, so the lower bound is rejected and redrawn.
pub fn draw_open<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let r: f64 = rng.gen_range(DRAW_LOW..DRAW_HIGH);
        if r > DRAW_LOW {
            return r;
        }
    }
}

/// ChaCha8 generator seeded once, then advanced for every draw.
#[derive(Clone, Debug)]
pub struct SeededDraws {
    rng: ChaCha8Rng,
}

impl SeededDraws {
    /// Reproducible source: the same seed yields the same draw sequence.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Source seeded once from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl DrawSource for SeededDraws {
    fn next_draw(&mut self) -> f64 {
        draw_open(&mut self.rng)
    }
}

/// Builds a fresh entropy-seeded generator for every single draw.
///
/// Draws are independent across rows and calls without any shared state, at
/// the cost of an entropy read per row.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReseedingDraws;

impl DrawSource for ReseedingDraws {
    fn next_draw(&mut self) -> f64 {
        let mut rng = ChaCha8Rng::from_entropy();
        draw_open(&mut rng)
    }
}

/// Replays a fixed sequence of thresholds, wrapping around at the end.
///
/// Values are returned verbatim, without range checks.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptedDraws {
    draws: Vec<f64>,
    consumed: usize,
}

impl ScriptedDraws {
    /// Returns `None` for an empty sequence.
    pub fn new(draws: impl Into<Vec<f64>>) -> Option<Self> {
        let draws = draws.into();
        if draws.is_empty() {
            return None;
        }
        Some(Self { draws, consumed: 0 })
    }

    /// Number of draws handed out so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl DrawSource for ScriptedDraws {
    fn next_draw(&mut self) -> f64 {
        let pos = self.consumed % self.draws.len();
        self.consumed += 1;
        // `new` guarantees a non-empty sequence
        self.draws.get(pos).copied().unwrap_or(DRAW_LOW)
    }
}

/// Source selected by `DrawStrategy::build`.
#[derive(Clone, Debug)]
pub enum ConfiguredDraws {
    /// Seeded once (explicit seed or entropy).
    Seeded(SeededDraws),
    /// Reseeded from entropy on every draw.
    Reseeding(ReseedingDraws),
}

impl DrawSource for ConfiguredDraws {
    fn next_draw(&mut self) -> f64 {
        match self {
            ConfiguredDraws::Seeded(d) => d.next_draw(),
            ConfiguredDraws::Reseeding(d) => d.next_draw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_open_range(d: &mut impl DrawSource, n: usize) {
        for _ in 0..n {
            let r = d.next_draw();
            assert!(r > DRAW_LOW && r < DRAW_HIGH, "draw {r} outside (1, 2)");
        }
    }

    #[test]
    fn seeded_draws_stay_in_open_interval() {
        assert_open_range(&mut SeededDraws::from_seed(7), 10_000);
        assert_open_range(&mut SeededDraws::from_entropy(), 1_000);
    }

    #[test]
    fn reseeding_draws_stay_in_open_interval() {
        assert_open_range(&mut ReseedingDraws, 200);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededDraws::from_seed(42);
        let mut b = SeededDraws::from_seed(42);
        let xs: Vec<f64> = (0..32).map(|_| a.next_draw()).collect();
        let ys: Vec<f64> = (0..32).map(|_| b.next_draw()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SeededDraws::from_seed(1);
        let mut b = SeededDraws::from_seed(2);
        let xs: Vec<f64> = (0..8).map(|_| a.next_draw()).collect();
        let ys: Vec<f64> = (0..8).map(|_| b.next_draw()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn seeded_draws_are_roughly_uniform() {
        let mut d = SeededDraws::from_seed(2024);
        let n = 20_000;
        let mut below_mid = 0usize;
        let mut sum = 0.0;
        for _ in 0..n {
            let r = d.next_draw();
            sum += r;
            if r < 1.5 {
                below_mid += 1;
            }
        }
        let mean = sum / n as f64;
        assert!((mean - 1.5).abs() < 0.01, "mean {mean}");
        let frac = below_mid as f64 / n as f64;
        assert!((frac - 0.5).abs() < 0.02, "fraction below 1.5: {frac}");
    }

    #[test]
    fn scripted_draws_replay_and_wrap() {
        let mut d = ScriptedDraws::new(vec![1.1, 1.5]).unwrap();
        assert_eq!(d.next_draw(), 1.1);
        assert_eq!(d.next_draw(), 1.5);
        assert_eq!(d.next_draw(), 1.1);
        assert_eq!(d.consumed(), 3);
    }

    #[test]
    fn scripted_draws_reject_empty() {
        assert!(ScriptedDraws::new(Vec::<f64>::new()).is_none());
    }

    #[test]
    fn boxed_and_borrowed_sources_forward() {
        let mut boxed: Box<dyn DrawSource> = Box::new(ScriptedDraws::new(vec![1.25]).unwrap());
        assert_eq!(boxed.next_draw(), 1.25);
        fn first<D: DrawSource>(mut d: D) -> f64 {
            d.next_draw()
        }
        let mut s = ScriptedDraws::new(vec![1.75]).unwrap();
        assert_eq!(first(&mut s), 1.75);
        assert_eq!(s.consumed(), 1);
    }
}
