//! Random source for node selection.
//!
//! Selection is uniform and memoryless: every call picks independently,
//! with no round-robin state.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks an index in `0..len`. Callers guarantee `len > 0`.
pub trait Selector: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}

/// Default selector backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSelector;

impl Selector for ThreadRngSelector {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Deterministic selector for reproducible runs.
#[derive(Debug)]
pub struct SeededSelector {
    rng: Mutex<StdRng>,
}

impl SeededSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Selector for SeededSelector {
    fn pick(&self, len: usize) -> usize {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_range(0..len)
    }
}

/// Pick one element of `items`, or `None` when empty.
pub(crate) fn choose<'a, T>(selector: &dyn Selector, items: &'a [T]) -> Option<&'a T> {
    match items.len() {
        0 => None,
        1 => items.first(),
        len => items.get(selector.pick(len)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_selector_is_reproducible() {
        let a = SeededSelector::new(42);
        let b = SeededSelector::new(42);
        let picks_a: Vec<usize> = (0..32).map(|_| a.pick(10)).collect();
        let picks_b: Vec<usize> = (0..32).map(|_| b.pick(10)).collect();
        assert_eq!(picks_a, picks_b);
    }

    #[test]
    fn picks_stay_in_range() {
        let selector = ThreadRngSelector;
        for len in 1..20 {
            for _ in 0..50 {
                assert!(selector.pick(len) < len);
            }
        }
    }

    #[test]
    fn choose_handles_empty_and_single() {
        let selector = SeededSelector::new(1);
        let empty: [u8; 0] = [];
        assert_eq!(choose(&selector, &empty), None);
        assert_eq!(choose(&selector, &[7]), Some(&7));
    }
}
