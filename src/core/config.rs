//! Duel configuration.
//!
//! `DuelConfig` carries the numbers a ruleset varies on: starting hit
//! points, hand sizes, the turn cap, and whether decks are shuffled. The
//! defaults match the Goat-format ruleset.
//!
//! ```
//! use netduel::core::DuelConfig;
//!
//! let config = DuelConfig::default()
//!     .with_starting_hp(4000)
//!     .without_shuffle();
//! assert_eq!(config.starting_hp, 4000);
//! assert!(!config.shuffle);
//! ```

use serde::{Deserialize, Serialize};

/// Rules parameters for one duel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    /// Hit points each player starts with.
    pub starting_hp: i32,

    /// Cards drawn before the first turn.
    pub opening_hand: usize,

    /// Maximum hand size at the end of a turn.
    pub hand_limit: usize,

    /// The duel is drawn once this many turns have been played.
    pub turn_limit: u32,

    /// Whether the first player draws on turn one.
    pub first_turn_draw: bool,

    /// Shuffle decks at setup. Disable for reproducible tests.
    pub shuffle: bool,

    /// Seed for the shuffle RNG.
    pub seed: u64,

    /// How many times an invalid answer is re-asked before failing.
    pub decision_retries: u32,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            starting_hp: 8000,
            opening_hand: 5,
            hand_limit: 6,
            turn_limit: 200,
            first_turn_draw: true,
            shuffle: true,
            seed: 0,
            decision_retries: 3,
        }
    }
}

impl DuelConfig {
    /// Set starting hit points.
    #[must_use]
    pub fn with_starting_hp(mut self, hp: i32) -> Self {
        self.starting_hp = hp;
        self
    }

    /// Set the opening hand size.
    #[must_use]
    pub fn with_opening_hand(mut self, cards: usize) -> Self {
        self.opening_hand = cards;
        self
    }

    /// Set the end-of-turn hand limit.
    #[must_use]
    pub fn with_hand_limit(mut self, cards: usize) -> Self {
        self.hand_limit = cards;
        self
    }

    /// Set the turn cap.
    #[must_use]
    pub fn with_turn_limit(mut self, turns: u32) -> Self {
        self.turn_limit = turns;
        self
    }

    /// Set whether the first player draws on turn one.
    #[must_use]
    pub fn with_first_turn_draw(mut self, draw: bool) -> Self {
        self.first_turn_draw = draw;
        self
    }

    /// Set the shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Keep decks in the given order.
    #[must_use]
    pub fn without_shuffle(mut self) -> Self {
        self.shuffle = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DuelConfig::default();
        assert_eq!(config.starting_hp, 8000);
        assert_eq!(config.opening_hand, 5);
        assert_eq!(config.hand_limit, 6);
        assert!(config.first_turn_draw);
        assert!(config.shuffle);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DuelConfig = serde_json::from_str(r#"{"starting_hp": 4000, "seed": 9}"#).unwrap();
        assert_eq!(config.starting_hp, 4000);
        assert_eq!(config.seed, 9);
        assert_eq!(config.hand_limit, 6);
    }
}
