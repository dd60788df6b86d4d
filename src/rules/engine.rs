//! The duel driver.
//!
//! `Duel` owns the state, the event log, the configuration and both
//! decision makers. Effect hooks receive `&mut Duel`, so everything a card
//! can do goes through the same primitives the rules use.
//!
//! ## Lifecycle
//!
//! 1. `Duel::new`: build decks from the catalog, shuffle (if enabled)
//! 2. `Duel::start`: log the start, deal opening hands
//! 3. `Duel::run`: play turns until an outcome is recorded
//!
//! `run` calls `start` itself; tests that set up a board by hand can call
//! neither and drive individual operations instead.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::agents::DecisionMaker;
use crate::cards::CardCatalog;
use crate::core::{
    Action, DuelConfig, DuelEvent, DuelEventKind, DuelOutcome, EndReason, EventLog, GameRng,
    GameState, InstanceId, PlayerId, PlayerMap, PlayerView,
};
use crate::error::{DuelError, SetupError};
use crate::zones::Zone;

/// Shared flag for stopping a duel from outside.
///
/// Checked once per completed turn.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A running duel.
pub struct Duel {
    pub(crate) state: GameState,
    pub(crate) log: EventLog,
    pub(crate) config: DuelConfig,
    pub(crate) deciders: PlayerMap<Box<dyn DecisionMaker>>,
    pub(crate) cancel: CancelToken,
    /// While non-zero, raised events wait for an explicit flush.
    pub(crate) event_hold: u32,
    started: bool,
}

impl Duel {
    /// Build a duel from two deck lists (first name = top card).
    pub fn new<S: AsRef<str>>(
        catalog: &CardCatalog,
        decks: [&[S]; 2],
        config: DuelConfig,
        first: Box<dyn DecisionMaker>,
        second: Box<dyn DecisionMaker>,
    ) -> Result<Self, SetupError> {
        let mut state = GameState::new(config.starting_hp);
        if config.shuffle {
            state.rng = GameRng::new(config.seed);
        }

        for player in PlayerId::both() {
            let list = decks[player.index()];
            if list.len() < config.opening_hand {
                return Err(SetupError::DeckTooSmall {
                    player,
                    have: list.len(),
                    need: config.opening_hand,
                });
            }
            for name in list.iter().rev() {
                let name = name.as_ref();
                let card = catalog
                    .get(name)
                    .ok_or_else(|| SetupError::UnknownCard(name.to_string()))?;
                state.add_card(Arc::clone(card), player);
            }
            let mut deck = std::mem::take(&mut state.players[player].deck);
            state.rng.shuffle(&mut deck);
            state.players[player].deck = deck;
        }

        Ok(Self {
            state,
            log: EventLog::new(),
            config,
            deciders: PlayerMap::from_pair(first, second),
            cancel: CancelToken::new(),
            event_hold: 0,
            started: false,
        })
    }

    /// Share a cancellation flag with the caller.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for board setup in tests and tools.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    #[must_use]
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    #[must_use]
    pub fn config(&self) -> &DuelConfig {
        &self.config
    }

    #[must_use]
    pub fn outcome(&self) -> Option<DuelOutcome> {
        self.state.outcome
    }

    /// Log the start and deal opening hands. Does nothing the second time.
    pub fn start(&mut self) -> Result<(), DuelError> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        info!(seed = self.config.seed, shuffle = self.config.shuffle, "duel start");
        self.emit(DuelEventKind::DuelStart, None, None, None, "duel start");
        for player in PlayerId::both() {
            self.draw(player, self.config.opening_hand)?;
        }
        Ok(())
    }

    /// Play until the duel ends.
    pub fn run(&mut self) -> Result<DuelOutcome, DuelError> {
        self.start()?;
        while !self.state.is_over() {
            if self.state.turn > self.config.turn_limit {
                self.end_in_draw(EndReason::TurnLimit, "turn limit reached");
                break;
            }
            self.play_turn()?;
            if self.state.is_over() {
                break;
            }
            if self.cancel.is_cancelled() {
                self.end_in_draw(EndReason::Cancelled, "duel cancelled");
                break;
            }
            self.state.turn += 1;
            self.state.turn_player = self.state.turn_player.opponent();
        }
        self.state
            .outcome
            .ok_or_else(|| DuelError::invariant("duel loop ended without an outcome"))
    }

    // === Events ===

    /// Append an event to the log and show it to both players.
    ///
    /// The card name is included only while the card is public (face-up,
    /// scrapheap or purged).
    pub(crate) fn emit(
        &mut self,
        kind: DuelEventKind,
        player: Option<PlayerId>,
        card: Option<InstanceId>,
        amount: Option<i32>,
        detail: impl Into<String>,
    ) {
        let name = card
            .filter(|&id| self.is_public(id))
            .map(|id| self.state.card(id).name().to_string());
        let event = DuelEvent {
            seq: 0,
            turn: self.state.turn,
            phase: self.state.phase,
            player,
            kind,
            card: name,
            amount,
            detail: detail.into(),
        };
        let event = self.log.push(event).clone();
        debug!(seq = event.seq, kind = ?event.kind, card = ?event.card, detail = %event.detail, "duel event");
        for (_, decider) in self.deciders.iter_mut() {
            decider.notify(&event);
        }
    }

    fn is_public(&self, id: InstanceId) -> bool {
        let card = self.state.card(id);
        card.face_up || matches!(card.location.zone, Zone::Scrapheap | Zone::Purged)
    }

    // === Decisions ===

    fn attempts(&self) -> u32 {
        self.config.decision_retries + 1
    }

    /// Ask `player` to pick one of `candidates`.
    pub(crate) fn ask_action(&mut self, player: PlayerId, candidates: &[Action]) -> Result<Action, DuelError> {
        let attempts = self.attempts();
        for attempt in 1..=attempts {
            let view = PlayerView::build(&self.state, player);
            let choice = self.deciders[player].choose_action(&view, candidates)?;
            if candidates.contains(&choice) {
                return Ok(choice);
            }
            warn!(%player, ?choice, attempt, "action outside the offered choices");
        }
        Err(DuelError::InvalidDecision {
            player,
            prompt: "choose an action".to_string(),
            attempts,
        })
    }

    /// Ask `player` for `min..=max` distinct cards out of `candidates`.
    pub(crate) fn ask_cards(
        &mut self,
        player: PlayerId,
        prompt: &str,
        candidates: &[InstanceId],
        min: usize,
        max: usize,
    ) -> Result<Vec<InstanceId>, DuelError> {
        if candidates.len() < min || min > max {
            return Err(DuelError::invariant(format!(
                "cannot pick {min}..={max} of {} cards for: {prompt}",
                candidates.len()
            )));
        }
        let attempts = self.attempts();
        for attempt in 1..=attempts {
            let view = PlayerView::build(&self.state, player);
            let picked = self.deciders[player].choose_cards(&view, prompt, candidates, min, max)?;
            if valid_selection(&picked, candidates, min, max) {
                return Ok(picked);
            }
            warn!(%player, ?picked, attempt, prompt, "card selection rejected");
        }
        Err(DuelError::InvalidDecision {
            player,
            prompt: prompt.to_string(),
            attempts,
        })
    }

    pub(crate) fn ask_yes_no(&mut self, player: PlayerId, prompt: &str) -> Result<bool, DuelError> {
        let view = PlayerView::build(&self.state, player);
        Ok(self.deciders[player].choose_yes_no(&view, prompt)?)
    }

    // === Endings ===

    /// `loser` loses the duel. Ignored when the duel already ended.
    pub fn lose(&mut self, loser: PlayerId, reason: EndReason, detail: &str) {
        let outcome = DuelOutcome {
            winner: Some(loser.opponent()),
            reason,
        };
        if self.state.finish(outcome) {
            info!(winner = %loser.opponent(), ?reason, "duel over");
            self.emit(
                DuelEventKind::DuelEnd,
                Some(loser.opponent()),
                None,
                None,
                format!("{} wins: {detail}", loser.opponent()),
            );
        }
    }

    pub(crate) fn end_in_draw(&mut self, reason: EndReason, detail: &str) {
        if self.state.finish(DuelOutcome { winner: None, reason }) {
            info!(?reason, "duel over without a winner");
            self.emit(DuelEventKind::DuelEnd, None, None, None, detail);
        }
    }
}

fn valid_selection(picked: &[InstanceId], candidates: &[InstanceId], min: usize, max: usize) -> bool {
    if !(min..=max).contains(&picked.len()) {
        return false;
    }
    picked
        .iter()
        .enumerate()
        .all(|(i, id)| candidates.contains(id) && !picked[..i].contains(id))
}
