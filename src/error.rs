//! Error tiers.
//!
//! - `DuelError`: something went wrong while a duel was running. An
//!   `Invariant` variant is an engine bug and aborts the duel.
//! - `SetupError`: the duel could not be created from the given decks.
//! - `DecisionError`: a decision source could not answer.
//!
//! A duel ending (hit points, deck-out, turn cap, cancellation) is not an
//! error; it is recorded as a `DuelOutcome` on the state.

use crate::core::PlayerId;

/// Failure while running a duel.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DuelError {
    /// Engine bookkeeping is inconsistent (a card in two zones, no free
    /// slot after a legality check passed, and similar).
    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error(transparent)]
    Decision(#[from] DecisionError),

    /// A decision source kept answering outside the offered choices.
    #[error("{player} gave {attempts} invalid answers to: {prompt}")]
    InvalidDecision {
        player: PlayerId,
        prompt: String,
        attempts: u32,
    },
}

impl DuelError {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }
}

/// Failure while building a duel.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("unknown card `{0}`")]
    UnknownCard(String),

    #[error("{player} deck has {have} cards but the opening hand needs {need}")]
    DeckTooSmall {
        player: PlayerId,
        have: usize,
        need: usize,
    },
}

/// Failure of a decision source.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecisionError {
    /// The other end of a decision channel hung up.
    #[error("decision source for {0} disconnected")]
    Disconnected(PlayerId),
}
