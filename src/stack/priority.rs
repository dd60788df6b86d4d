//! Response windows.
//!
//! Priority alternates between the two players. The holder either passes
//! or activates one eligible fast effect; two consecutive passes close the
//! window. A successful activation resets the pass count and hands
//! priority to the activator's opponent.
//!
//! An activation whose target or cost step is refused does not use up the
//! holder's priority. That effect is withheld from the holder until
//! priority moves, so the same refusal cannot loop.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::debug;

use crate::cards::{Card, CardKind, ProgramKind};
use crate::core::{Action, DuelEventKind, InstanceId, PlayerId};
use crate::effects::{EffectContext, EffectKind, ExecutionSpeed};
use crate::error::DuelError;
use crate::rules::Duel;
use crate::triggers::effect_usable;
use crate::zones::{Location, Zone};

/// Priority bookkeeping for one window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseWindow {
    holder: PlayerId,
    consecutive_passes: usize,
    withheld: SmallVec<[(InstanceId, usize); 2]>,
}

impl ResponseWindow {
    /// Open with `first` holding priority.
    #[must_use]
    pub fn new(first: PlayerId) -> Self {
        Self {
            holder: first,
            consecutive_passes: 0,
            withheld: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn holder(&self) -> PlayerId {
        self.holder
    }

    #[must_use]
    pub fn consecutive_passes(&self) -> usize {
        self.consecutive_passes
    }

    /// Holder passes. Returns `true` once both players have passed in a
    /// row.
    pub fn pass(&mut self) -> bool {
        self.consecutive_passes += 1;
        if self.consecutive_passes >= 2 {
            return true;
        }
        self.holder = self.holder.opponent();
        self.withheld.clear();
        false
    }

    /// Holder activated something.
    pub fn activated(&mut self) {
        self.consecutive_passes = 0;
        self.holder = self.holder.opponent();
        self.withheld.clear();
    }

    /// Holder's activation was refused at the target or cost step.
    pub fn withhold(&mut self, card: InstanceId, effect: usize) {
        self.withheld.push((card, effect));
    }

    #[must_use]
    pub fn is_withheld(&self, card: InstanceId, effect: usize) -> bool {
        self.withheld.contains(&(card, effect))
    }
}

impl Duel {
    /// Fast effects `player` could activate right now, as `Activate`
    /// actions.
    ///
    /// Sources: set traps and set quick-play programs placed before this
    /// turn; quick-play programs in hand during the player's own turn when
    /// a tech slot is free; quick effects of face-up agents.
    #[must_use]
    pub fn eligible_responses(&self, player: PlayerId) -> Vec<Action> {
        let state = &self.state;
        let top = state.chain_top_speed();
        let mut out = Vec::new();

        let mut offer = |id: InstanceId, allowed: &dyn Fn(EffectKind) -> bool| {
            let instance = state.card(id);
            for (index, effect) in instance.card.effects.iter().enumerate() {
                if !effect.is_manual() || !allowed(effect.kind) {
                    continue;
                }
                if effect.speed < ExecutionSpeed::Quick || !effect.speed.can_respond_to(top) {
                    continue;
                }
                if effect_usable(self, effect, &EffectContext::new(id, index, player)) {
                    out.push(Action::Activate { card: id, effect: index });
                }
            }
        };

        for id in state.players[player].field_techs() {
            let instance = state.card(id);
            let settable = match instance.kind() {
                CardKind::Trap(_) => true,
                CardKind::Program(ProgramKind::QuickPlay) => true,
                _ => false,
            };
            if settable && !instance.face_up && instance.placed_before(state.turn) {
                offer(id, &|kind: EffectKind| kind == EffectKind::Activation);
            }
        }

        if player == state.turn_player && state.players[player].free_tech_slot().is_some() {
            for &id in &state.players[player].hand {
                if state.card(id).kind() == CardKind::Program(ProgramKind::QuickPlay) {
                    offer(id, &|kind: EffectKind| kind == EffectKind::Activation);
                }
            }
        }

        for id in state.players[player].field_agents() {
            if state.card(id).face_up {
                offer(id, &|kind: EffectKind| kind == EffectKind::Quick);
            }
        }
        out
    }

    /// Run a response window starting with `first`. Activations extend
    /// (or start) the chain; nothing is resolved here.
    pub fn open_response_window(&mut self, first: PlayerId) -> Result<(), DuelError> {
        let mut window = ResponseWindow::new(first);
        let was_open = std::mem::replace(&mut self.state.in_response_window, true);
        self.event_hold += 1;

        let result = self.run_window(&mut window);

        self.event_hold -= 1;
        self.state.in_response_window = was_open;
        result
    }

    fn run_window(&mut self, window: &mut ResponseWindow) -> Result<(), DuelError> {
        loop {
            if self.state.is_over() {
                return Ok(());
            }
            let holder = window.holder();
            let options: Vec<Action> = self
                .eligible_responses(holder)
                .into_iter()
                .filter(|action| match *action {
                    Action::Activate { card, effect } => !window.is_withheld(card, effect),
                    _ => true,
                })
                .collect();

            if options.is_empty() {
                debug!(player = %holder, "no responses, passing");
                if window.pass() {
                    return Ok(());
                }
                continue;
            }

            let mut candidates = Vec::with_capacity(options.len() + 1);
            candidates.push(Action::Pass);
            candidates.extend(options);
            let choice = self.ask_action(holder, &candidates)?;
            self.state.record_action(holder, choice);

            match choice {
                Action::Activate { card, effect } => {
                    if self.activate(holder, card, effect)? {
                        window.activated();
                    } else {
                        window.withhold(card, effect);
                    }
                }
                _ => {
                    if window.pass() {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Open a window with `first` holding priority, then resolve whatever
    /// chain it built. Also flushes events when no chain was built.
    pub fn respond_and_resolve(&mut self, first: PlayerId) -> Result<(), DuelError> {
        self.open_response_window(first)?;
        if self.state.chain.is_some() {
            self.resolve_chain()
        } else {
            self.flush_events().map(|_| ())
        }
    }

    /// Activate an effect: targets, then cost, then placement, then the
    /// chain link.
    ///
    /// Returns `Ok(false)` when the target or cost step refuses; nothing
    /// has moved in that case.
    pub fn activate(&mut self, player: PlayerId, card: InstanceId, effect: usize) -> Result<bool, DuelError> {
        let definition: Arc<Card> = Arc::clone(&self.state.card(card).card);
        let Some(descriptor) = definition.effect(effect) else {
            return Err(DuelError::invariant(format!("{} has no effect {effect}", definition.name)));
        };

        let mut ctx = EffectContext::new(card, effect, player);
        if let Some(target) = descriptor.hooks.target {
            if !target(self, &mut ctx)? {
                debug!(card = %definition.name, "activation aborted at targeting");
                return Ok(false);
            }
        }
        if let Some(cost) = descriptor.hooks.cost {
            if !cost(self, &ctx)? {
                debug!(card = %definition.name, "activation aborted at cost");
                return Ok(false);
            }
        }

        self.place_for_activation(player, card)?;
        if descriptor.once_per_turn {
            self.state.card_mut(card).used_effects.push(effect);
        }
        self.push_link(ctx, descriptor.speed)?;
        Ok(true)
    }

    /// Move a program from hand onto the field, or turn a set card
    /// face-up, as part of activating it.
    fn place_for_activation(&mut self, player: PlayerId, card: InstanceId) -> Result<(), DuelError> {
        let instance = self.state.card(card);
        if instance.location.zone == Zone::Hand {
            let zone = if instance.kind() == CardKind::Program(ProgramKind::Os) {
                if let Some(old) = self.state.players[player].os {
                    self.send_to_scrapheap(old)?;
                }
                Zone::Os
            } else {
                let Some(slot) = self.state.players[player].free_tech_slot() else {
                    return Err(DuelError::invariant(format!("{player} has no free tech slot for {card}")));
                };
                Zone::Tech(slot)
            };
            self.state.move_card(card, Location::new(player, zone))?;
            self.state.card_mut(card).placed_turn = Some(self.state.turn);
        }
        self.reveal_for_activation(card)
    }

    /// Turn the card face-up and announce the activation.
    pub(crate) fn reveal_for_activation(&mut self, card: InstanceId) -> Result<(), DuelError> {
        self.state.card_mut(card).face_up = true;
        let controller = self.state.card(card).controller;
        let name = self.state.card(card).name().to_string();
        self.emit(
            DuelEventKind::Activate,
            Some(controller),
            Some(card),
            None,
            format!("activates {name}"),
        );
        Ok(())
    }
}
