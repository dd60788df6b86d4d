//! Scripted decisions.

use std::collections::VecDeque;

use tracing::trace;

use super::DecisionMaker;
use crate::core::{Action, DuelEvent, InstanceId, PlayerView};
use crate::error::DecisionError;

/// One queued answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Action(Action),
    Cards(Vec<InstanceId>),
    YesNo(bool),
}

/// Answers from a queue, falling back to passive play.
///
/// The front reply is used only when it fits the question (right kind,
/// and for actions, among the candidates); otherwise it stays queued and
/// the fallback answers:
///
/// - actions: `Pass`, else `EndPhase`, else the first candidate
/// - cards: the first `min` candidates
/// - yes/no: `true` (configurable)
///
/// ```
/// use netduel::agents::{DecisionMaker, Reply, ScriptedDecider};
/// use netduel::core::{Action, GameState, PlayerId, PlayerView};
///
/// let state = GameState::new(8000);
/// let view = PlayerView::build(&state, PlayerId::FIRST);
/// let mut decider = ScriptedDecider::new([Reply::Action(Action::EnterBattle)]);
///
/// let pick = decider.choose_action(&view, &[Action::EndPhase]).unwrap();
/// assert_eq!(pick, Action::EndPhase);
/// let pick = decider.choose_action(&view, &[Action::EnterBattle, Action::EndPhase]).unwrap();
/// assert_eq!(pick, Action::EnterBattle);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedDecider {
    replies: VecDeque<Reply>,
    default_yes: bool,
    events_seen: usize,
}

impl ScriptedDecider {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            default_yes: true,
            events_seen: 0,
        }
    }

    /// No script; always the fallback.
    #[must_use]
    pub fn passive() -> Self {
        Self::new([])
    }

    /// Answer unscripted yes/no questions with `answer`.
    #[must_use]
    pub fn with_default_yes_no(mut self, answer: bool) -> Self {
        self.default_yes = answer;
        self
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.replies.len()
    }

    #[must_use]
    pub fn events_seen(&self) -> usize {
        self.events_seen
    }
}

impl DecisionMaker for ScriptedDecider {
    fn choose_action(&mut self, _view: &PlayerView, candidates: &[Action]) -> Result<Action, DecisionError> {
        if let Some(Reply::Action(action)) = self.replies.front() {
            if candidates.contains(action) {
                let action = *action;
                self.replies.pop_front();
                return Ok(action);
            }
        }
        let fallback = [Action::Pass, Action::EndPhase]
            .into_iter()
            .find(|a| candidates.contains(a))
            .or_else(|| candidates.first().copied())
            .unwrap_or(Action::Pass);
        Ok(fallback)
    }

    fn choose_cards(
        &mut self,
        _view: &PlayerView,
        _prompt: &str,
        candidates: &[InstanceId],
        min: usize,
        max: usize,
    ) -> Result<Vec<InstanceId>, DecisionError> {
        if let Some(Reply::Cards(cards)) = self.replies.front() {
            let fits = (min..=max).contains(&cards.len()) && cards.iter().all(|c| candidates.contains(c));
            if fits {
                let cards = cards.clone();
                self.replies.pop_front();
                return Ok(cards);
            }
        }
        Ok(candidates.iter().copied().take(min).collect())
    }

    fn choose_yes_no(&mut self, _view: &PlayerView, prompt: &str) -> Result<bool, DecisionError> {
        if let Some(Reply::YesNo(answer)) = self.replies.front() {
            let answer = *answer;
            self.replies.pop_front();
            return Ok(answer);
        }
        trace!(prompt, answer = self.default_yes, "unscripted yes/no");
        Ok(self.default_yes)
    }

    fn notify(&mut self, _event: &DuelEvent) {
        self.events_seen += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameState, PlayerId};

    fn view() -> PlayerView {
        PlayerView::build(&GameState::new(8000), PlayerId::FIRST)
    }

    #[test]
    fn test_illegal_reply_stays_queued() {
        let mut decider = ScriptedDecider::new([Reply::Action(Action::EnterBattle)]);
        let pick = decider.choose_action(&view(), &[Action::Pass]).unwrap();
        assert_eq!(pick, Action::Pass);
        assert_eq!(decider.remaining(), 1);
    }

    #[test]
    fn test_cards_fallback_takes_min() {
        let mut decider = ScriptedDecider::passive();
        let cards = [InstanceId(3), InstanceId(4), InstanceId(5)];
        let picked = decider.choose_cards(&view(), "discard", &cards, 2, 3).unwrap();
        assert_eq!(picked, vec![InstanceId(3), InstanceId(4)]);
    }

    #[test]
    fn test_cards_reply_out_of_range_is_skipped() {
        let mut decider = ScriptedDecider::new([Reply::Cards(vec![InstanceId(9)])]);
        let picked = decider.choose_cards(&view(), "target", &[InstanceId(1)], 1, 1).unwrap();
        assert_eq!(picked, vec![InstanceId(1)]);
        assert_eq!(decider.remaining(), 1);
    }

    #[test]
    fn test_yes_no() {
        let mut decider = ScriptedDecider::new([Reply::YesNo(false)]).with_default_yes_no(true);
        assert!(!decider.choose_yes_no(&view(), "activate?").unwrap());
        assert!(decider.choose_yes_no(&view(), "activate?").unwrap());
    }
}
