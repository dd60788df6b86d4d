//! Deterministic shuffling.
//!
//! Deck shuffles are the only randomness in a duel. `GameRng` wraps a seeded
//! ChaCha8 stream; a disabled RNG leaves decks in the order they were given,
//! which tests and replays rely on.
//!
//! ```
//! use netduel::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! let mut x: Vec<u32> = (0..40).collect();
//! let mut y = x.clone();
//! a.shuffle(&mut x);
//! b.shuffle(&mut y);
//! assert_eq!(x, y);
//!
//! let mut off = GameRng::disabled();
//! let mut z: Vec<u32> = (0..5).collect();
//! off.shuffle(&mut z);
//! assert_eq!(z, vec![0, 1, 2, 3, 4]);
//! ```

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeded shuffle source that can be switched off.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    enabled: bool,
}

impl GameRng {
    /// Create a shuffling RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            enabled: true,
        }
    }

    /// An RNG whose `shuffle` is the identity.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(0)
        }
    }

    /// Whether shuffles permute anything.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Shuffle a slice in place. No-op when disabled.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        if self.enabled {
            slice.shuffle(&mut self.inner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_different_seeds() {
        let mut a: Vec<u32> = (0..40).collect();
        let mut b = a.clone();
        GameRng::new(1).shuffle(&mut a);
        GameRng::new(2).shuffle(&mut b);
        assert_ne!(a, b);
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = GameRng::new(42);
        let mut data: Vec<u32> = (0..10).collect();
        rng.shuffle(&mut data);
        data.sort_unstable();
        assert_eq!(data, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_disabled_is_identity() {
        let mut rng = GameRng::disabled();
        assert!(!rng.is_enabled());
        let mut data = vec!['a', 'b', 'c'];
        rng.shuffle(&mut data);
        assert_eq!(data, vec!['a', 'b', 'c']);
    }
}
