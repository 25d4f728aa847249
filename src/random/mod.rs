//! Source of randomness for metadata synthesis.
//!
//! Synthesis never touches a global RNG; callers pass a [RandomSource] in.
//! [Entropy] is the production implementation and can be seeded for
//! reproducible runs.

use rand::{rngs::StdRng, seq::index, Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform index in `0..len`. `len` is never zero.
    fn index(&mut self, len: usize) -> usize;

    /// `amount` distinct indices in `0..len`. `amount <= len`.
    fn distinct_indices(&mut self, len: usize, amount: usize) -> Vec<usize>;

    /// Pick one element uniformly. `None` for an empty slice.
    fn choose_one<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            items.get(self.index(items.len()))
        }
    }

    /// Up to `amount` elements chosen without replacement.
    fn sample<'a, T>(&mut self, items: &'a [T], amount: usize) -> Vec<&'a T> {
        let amount = amount.min(items.len());
        self.distinct_indices(items.len(), amount)
            .into_iter()
            .filter_map(|i| items.get(i))
            .collect()
    }

    /// Fisher-Yates, back to front.
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

/// [RandomSource] backed by a [StdRng].
pub struct Entropy {
    rng: StdRng,
}

impl Entropy {
    /// Seed from the operating system.
    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Same seed, same sequence of choices.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => Self::from_os(),
        }
    }
}

impl RandomSource for Entropy {
    fn index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    fn distinct_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        index::sample(&mut self.rng, len, amount).into_vec()
    }
}
