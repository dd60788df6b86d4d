//! Decisions answered over a channel.
//!
//! The duel runs on one thread; the client (a UI, a network session, an
//! AI worker) receives [`DecisionRequest`]s on another and answers each
//! through its oneshot sender. The engine side blocks on the reply, so the
//! duel loop itself stays synchronous.
//!
//! The blocking receive must not run inside an async runtime; drive the
//! duel from a plain thread (or `spawn_blocking`).
//!
//! ```
//! use netduel::agents::{ChannelDecider, DecisionMaker, DecisionRequest};
//! use netduel::core::{Action, GameState, PlayerId, PlayerView};
//!
//! let (mut decider, mut requests) = ChannelDecider::new(PlayerId::FIRST);
//! let client = std::thread::spawn(move || {
//!     while let Some(request) = requests.blocking_recv() {
//!         if let DecisionRequest::Action { candidates, reply, .. } = request {
//!             let _ = reply.send(candidates[candidates.len() - 1]);
//!         }
//!     }
//! });
//!
//! let view = PlayerView::build(&GameState::new(8000), PlayerId::FIRST);
//! let pick = decider.choose_action(&view, &[Action::Pass, Action::EndPhase]).unwrap();
//! assert_eq!(pick, Action::EndPhase);
//! drop(decider);
//! client.join().unwrap();
//! ```

use tokio::sync::{mpsc, oneshot};

use super::DecisionMaker;
use crate::core::{Action, DuelEvent, InstanceId, PlayerId, PlayerView};
use crate::error::DecisionError;

/// A question (or notification) for a remote decision maker.
#[derive(Debug)]
pub enum DecisionRequest {
    Action {
        view: PlayerView,
        candidates: Vec<Action>,
        reply: oneshot::Sender<Action>,
    },
    Cards {
        view: PlayerView,
        prompt: String,
        candidates: Vec<InstanceId>,
        min: usize,
        max: usize,
        reply: oneshot::Sender<Vec<InstanceId>>,
    },
    YesNo {
        view: PlayerView,
        prompt: String,
        reply: oneshot::Sender<bool>,
    },
    /// Fire-and-forget copy of a logged event.
    Notify(DuelEvent),
}

/// Engine-side end of the bridge.
#[derive(Debug)]
pub struct ChannelDecider {
    player: PlayerId,
    requests: mpsc::UnboundedSender<DecisionRequest>,
}

impl ChannelDecider {
    /// Create the decider and the receiver the client reads from.
    #[must_use]
    pub fn new(player: PlayerId) -> (Self, mpsc::UnboundedReceiver<DecisionRequest>) {
        let (requests, rx) = mpsc::unbounded_channel();
        (Self { player, requests }, rx)
    }

    fn ask<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> DecisionRequest) -> Result<T, DecisionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.requests
            .send(build(reply_tx))
            .map_err(|_| DecisionError::Disconnected(self.player))?;
        reply_rx
            .blocking_recv()
            .map_err(|_| DecisionError::Disconnected(self.player))
    }
}

impl DecisionMaker for ChannelDecider {
    fn choose_action(&mut self, view: &PlayerView, candidates: &[Action]) -> Result<Action, DecisionError> {
        self.ask(|reply| DecisionRequest::Action {
            view: view.clone(),
            candidates: candidates.to_vec(),
            reply,
        })
    }

    fn choose_cards(
        &mut self,
        view: &PlayerView,
        prompt: &str,
        candidates: &[InstanceId],
        min: usize,
        max: usize,
    ) -> Result<Vec<InstanceId>, DecisionError> {
        self.ask(|reply| DecisionRequest::Cards {
            view: view.clone(),
            prompt: prompt.to_string(),
            candidates: candidates.to_vec(),
            min,
            max,
            reply,
        })
    }

    fn choose_yes_no(&mut self, view: &PlayerView, prompt: &str) -> Result<bool, DecisionError> {
        self.ask(|reply| DecisionRequest::YesNo {
            view: view.clone(),
            prompt: prompt.to_string(),
            reply,
        })
    }

    fn notify(&mut self, event: &DuelEvent) {
        // A client that stopped listening still gets asked; the next
        // question reports the disconnect.
        let _ = self.requests.send(DecisionRequest::Notify(event.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameState;

    #[test]
    fn test_dropped_receiver_is_disconnect() {
        let (mut decider, requests) = ChannelDecider::new(PlayerId::SECOND);
        drop(requests);
        let view = PlayerView::build(&GameState::new(8000), PlayerId::SECOND);
        let err = decider.choose_yes_no(&view, "activate?").unwrap_err();
        assert_eq!(err, DecisionError::Disconnected(PlayerId::SECOND));
    }

    #[test]
    fn test_dropped_reply_is_disconnect() {
        let (mut decider, mut requests) = ChannelDecider::new(PlayerId::FIRST);
        let client = std::thread::spawn(move || {
            // answer nothing; dropping the request drops its reply sender
            while let Some(request) = requests.blocking_recv() {
                drop(request);
            }
        });
        let view = PlayerView::build(&GameState::new(8000), PlayerId::FIRST);
        let err = decider.choose_action(&view, &[Action::Pass]).unwrap_err();
        assert_eq!(err, DecisionError::Disconnected(PlayerId::FIRST));
        drop(decider);
        client.join().unwrap();
    }
}
