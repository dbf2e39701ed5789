//! Randomness source used by every game.
//!
//! Games never touch a RNG directly, they ask a [`RandomSource`] for a uniform
//! draw. Production code uses [`ThreadRandom`], tests plug a
//! [`MockRandomSource`] to force targets, words and bot choices.

use mockall::automock;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Uniform integer draws.
#[automock]
pub trait RandomSource: Send {
    /// Draws an integer uniformly from `[0, max]` (both bounds included).
    fn draw(&mut self, max: u32) -> u32;
}

/// [`RandomSource`] backed by an OS-seeded [`StdRng`].
pub struct ThreadRandom {
    rng: StdRng,
}

impl ThreadRandom {
    pub fn new() -> Self {
        ThreadRandom {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn draw(&mut self, max: u32) -> u32 {
        self.rng.gen_range(0..=max)
    }
}

/// Picks one element of a non-empty slice uniformly.
///
/// Returns `None` for an empty slice. An out of range draw (only possible with
/// a misconfigured mock) is clamped to the last element.
pub fn choose<'a, T, R: RandomSource>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    let last = items.len().checked_sub(1)?;
    let index = (rng.draw(last as u32) as usize).min(last);
    items.get(index)
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;

    #[test]
    fn test_thread_random_stays_in_bounds() {
        let mut rng = ThreadRandom::new();
        for _ in 0..500 {
            assert!(rng.draw(10) <= 10);
        }
        assert_eq!(rng.draw(0), 0);
    }

    #[test]
    fn test_thread_random_reaches_both_bounds() {
        let mut rng = ThreadRandom::new();
        let draws: Vec<u32> = (0..1000).map(|_| rng.draw(1)).collect();
        assert!(draws.contains(&0));
        assert!(draws.contains(&1));
    }

    #[test]
    fn test_choose_uses_last_index_as_bound() {
        let mut rng = MockRandomSource::new();
        rng.expect_draw().with(eq(2)).times(1).return_const(1u32);

        assert_eq!(choose(&mut rng, &["a", "b", "c"]), Some(&"b"));
    }

    #[test]
    fn test_choose_clamps_out_of_range_draw() {
        let mut rng = MockRandomSource::new();
        rng.expect_draw().return_const(42u32);

        assert_eq!(choose(&mut rng, &["a", "b"]), Some(&"b"));
    }

    #[test]
    fn test_choose_empty_slice() {
        let mut rng = MockRandomSource::new();
        rng.expect_draw().never();

        let empty: [&str; 0] = [];
        assert_eq!(choose(&mut rng, &empty), None);
    }
}
