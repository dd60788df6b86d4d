//! Decision makers.
//!
//! The engine never decides anything for a player. Every choice goes
//! through a [`DecisionMaker`], which sees only a [`PlayerView`] scoped to
//! that player's visibility and answers from the offered candidates.
//!
//! - [`ScriptedDecider`]: queued replies with a passive fallback, for tests
//!   and replays
//! - [`ChannelDecider`]: forwards each request over a channel so a human,
//!   UI or AI client can answer from another thread
//!
//! Answers outside the offered choices are re-asked (see
//! `DuelConfig::decision_retries`).

mod channel;
mod scripted;

pub use channel::{ChannelDecider, DecisionRequest};
pub use scripted::{Reply, ScriptedDecider};

use crate::core::{Action, DuelEvent, InstanceId, PlayerView};
use crate::error::DecisionError;

/// A source of player decisions.
///
/// Calls block until answered.
pub trait DecisionMaker: Send {
    /// Pick one of `candidates`.
    fn choose_action(&mut self, view: &PlayerView, candidates: &[Action]) -> Result<Action, DecisionError>;

    /// Pick between `min` and `max` distinct cards from `candidates`.
    fn choose_cards(
        &mut self,
        view: &PlayerView,
        prompt: &str,
        candidates: &[InstanceId],
        min: usize,
        max: usize,
    ) -> Result<Vec<InstanceId>, DecisionError>;

    fn choose_yes_no(&mut self, view: &PlayerView, prompt: &str) -> Result<bool, DecisionError>;

    /// Observe a logged event. Called for every event, in log order.
    fn notify(&mut self, _event: &DuelEvent) {}
}
