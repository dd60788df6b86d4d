//! Trigger scanning and serialization.
//!
//! When events are flushed, the engine looks for every effect that answers
//! them, sorts the hits into a fixed order, asks about the optional ones,
//! and turns the accepted ones into a single chain.
//!
//! ## Sources
//!
//! 1. Pending triggers queued earlier (flip effects, "when destroyed")
//! 2. Set programs and traps that were not placed this turn
//! 3. Face-up effect agents
//! 4. Scrapheap cards whose trigger range is the scrapheap
//!
//! The same (card, effect) pair is only taken once per flush.
//!
//! ## Order
//!
//! | Bucket | Triggers                     |
//! |--------|------------------------------|
//! | 0      | turn player, mandatory       |
//! | 1      | non-turn player, mandatory   |
//! | 2      | turn player, optional        |
//! | 3      | non-turn player, optional    |
//!
//! Within a bucket, scan order is kept.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::cards::Card;
use crate::core::{InstanceId, PlayerId};
use crate::effects::{EffectContext, EffectKind, TriggerRange};
use crate::error::DuelError;
use crate::rules::Duel;

use super::condition::{effect_usable, trigger_fires};
use super::event::{EventKind, GameEvent};

/// A trigger queued outside a scan, waiting for the next flush.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTrigger {
    pub source: InstanceId,
    /// Index into the source card's effect list.
    pub effect: usize,
    pub controller: PlayerId,
    pub event: GameEvent,
}

/// A trigger found by a scan, before ordering and confirmation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerCandidate {
    pub source: InstanceId,
    pub effect: usize,
    pub controller: PlayerId,
    pub mandatory: bool,
    pub event: GameEvent,
}

impl TriggerCandidate {
    /// Sort key: mandatory before optional, turn player before opponent.
    #[must_use]
    pub fn bucket(&self, turn_player: PlayerId) -> u8 {
        let optional = u8::from(!self.mandatory) * 2;
        let opponent = u8::from(self.controller != turn_player);
        optional + opponent
    }
}

/// Sort candidates into chain order. Stable within each bucket.
pub fn order_candidates(candidates: &mut [TriggerCandidate], turn_player: PlayerId) {
    candidates.sort_by_key(|c| c.bucket(turn_player));
}

impl Duel {
    /// Queue a trigger for the next flush.
    pub(crate) fn queue_trigger(&mut self, trigger: PendingTrigger) {
        debug!(source = %trigger.source, effect = trigger.effect, "trigger queued");
        self.state.pending_triggers.push(trigger);
    }

    /// Queue every effect of `card` whose trigger names `kind` exactly.
    /// Used for effects that fire from where the card ended up (flip,
    /// "when this card is destroyed").
    pub(crate) fn queue_self_triggers(&mut self, card: InstanceId, kind: EventKind, event: &GameEvent) {
        let instance = self.state.card(card);
        let controller = instance.controller;
        let hits: Vec<usize> = instance
            .card
            .effects
            .iter()
            .enumerate()
            .filter(|(_, effect)| match kind {
                EventKind::Flipped => effect.kind == EffectKind::Flip,
                _ => effect.trigger.is_some_and(|spec| spec.event == Some(kind)),
            })
            .map(|(index, _)| index)
            .collect();
        for effect in hits {
            self.queue_trigger(PendingTrigger {
                source: card,
                effect,
                controller,
                event: event.clone(),
            });
        }
    }

    /// Record an event. It is processed right away when no chain exists
    /// and nothing holds events back; otherwise it waits for the next
    /// flush. Returns whether a trigger chain was built.
    pub(crate) fn raise(&mut self, event: GameEvent) -> Result<bool, DuelError> {
        debug!(kind = ?event.kind, "event raised");
        self.state.deferred_events.push(event);
        self.flush_events()
    }

    /// Process deferred events and pending triggers until both queues are
    /// empty. Each round collects every answering trigger into one chain,
    /// opens a response window and resolves it.
    ///
    /// Returns whether at least one chain was built.
    pub fn flush_events(&mut self) -> Result<bool, DuelError> {
        let mut chained = false;
        loop {
            if self.state.is_over() || self.state.chain.is_some() || self.event_hold > 0 {
                return Ok(chained);
            }
            if self.state.deferred_events.is_empty() && self.state.pending_triggers.is_empty() {
                return Ok(chained);
            }

            let events = std::mem::take(&mut self.state.deferred_events);
            let pending = std::mem::take(&mut self.state.pending_triggers);

            let mut candidates = self.collect_triggers(&pending, &events);
            order_candidates(&mut candidates, self.state.turn_player);
            chained |= self.run_trigger_chain(candidates)?;
        }
    }

    /// Every trigger answering `events`, plus the usable `pending` ones,
    /// in scan order.
    #[must_use]
    pub fn collect_triggers(&self, pending: &[PendingTrigger], events: &[GameEvent]) -> Vec<TriggerCandidate> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();

        for trigger in pending {
            let card = &self.state.card(trigger.source).card;
            let Some(effect) = card.effect(trigger.effect) else {
                continue;
            };
            let ctx = EffectContext::new(trigger.source, trigger.effect, trigger.controller)
                .with_event(trigger.event.clone());
            if effect_usable(self, effect, &ctx) && seen.insert((trigger.source, trigger.effect)) {
                out.push(TriggerCandidate {
                    source: trigger.source,
                    effect: trigger.effect,
                    controller: trigger.controller,
                    mandatory: effect.mandatory,
                    event: trigger.event.clone(),
                });
            }
        }

        let turn = self.state.turn;
        let field: Vec<InstanceId> = self
            .state
            .field_in_order()
            .into_iter()
            .filter(|&id| {
                let instance = self.state.card(id);
                if instance.kind().is_agent() {
                    instance.face_up && instance.card.is_effect_agent()
                } else {
                    !instance.face_up && instance.placed_before(turn)
                }
            })
            .collect();
        let scrapheaps: Vec<InstanceId> = self
            .state
            .players
            .iter()
            .flat_map(|(_, side)| side.scrapheap.iter().copied())
            .collect();

        for event in events {
            for &id in &field {
                self.scan_card(id, TriggerRange::Field, event, &mut seen, &mut out);
            }
            for &id in &scrapheaps {
                self.scan_card(id, TriggerRange::Scrapheap, event, &mut seen, &mut out);
            }
        }
        out
    }

    fn scan_card(
        &self,
        id: InstanceId,
        range: TriggerRange,
        event: &GameEvent,
        seen: &mut FxHashSet<(InstanceId, usize)>,
        out: &mut Vec<TriggerCandidate>,
    ) {
        let instance = self.state.card(id);
        for (index, effect) in instance.card.effects.iter().enumerate() {
            if effect.kind == EffectKind::Flip || effect.trigger.map(|t| t.range) != Some(range) {
                continue;
            }
            let ctx = EffectContext::new(id, index, instance.controller).with_event(event.clone());
            if trigger_fires(self, effect, &ctx, event) && seen.insert((id, index)) {
                out.push(TriggerCandidate {
                    source: id,
                    effect: index,
                    controller: instance.controller,
                    mandatory: effect.mandatory,
                    event: event.clone(),
                });
            }
        }
    }

    /// Confirm, target and chain the ordered candidates, then let both
    /// players respond and resolve the chain.
    fn run_trigger_chain(&mut self, candidates: Vec<TriggerCandidate>) -> Result<bool, DuelError> {
        let mut last_controller = None;

        for candidate in candidates {
            if self.state.is_over() {
                return Ok(last_controller.is_some());
            }
            let card: Arc<Card> = Arc::clone(&self.state.card(candidate.source).card);
            let Some(effect) = card.effect(candidate.effect) else {
                return Err(DuelError::invariant(format!(
                    "{} has no effect {}",
                    card.name, candidate.effect
                )));
            };

            if !candidate.mandatory {
                let prompt = format!("Activate {} ({})?", card.name, effect.label);
                if !self.ask_yes_no(candidate.controller, &prompt)? {
                    debug!(card = %card.name, "optional trigger declined");
                    continue;
                }
            }

            let mut ctx = EffectContext::new(candidate.source, candidate.effect, candidate.controller)
                .with_event(candidate.event);
            if let Some(target) = effect.hooks.target {
                if !target(self, &mut ctx)? {
                    debug!(card = %card.name, "trigger dropped, no targets");
                    continue;
                }
            }
            if let Some(cost) = effect.hooks.cost {
                if !cost(self, &ctx)? {
                    debug!(card = %card.name, "trigger dropped, cost refused");
                    continue;
                }
            }

            self.reveal_for_activation(candidate.source)?;
            if effect.once_per_turn {
                self.state.card_mut(candidate.source).used_effects.push(candidate.effect);
            }
            self.push_link(ctx, effect.speed)?;
            last_controller = Some(candidate.controller);
        }

        let Some(last) = last_controller else {
            return Ok(false);
        };
        self.open_response_window(last.opponent())?;
        self.resolve_chain()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(source: u32, controller: PlayerId, mandatory: bool) -> TriggerCandidate {
        TriggerCandidate {
            source: InstanceId(source),
            effect: 0,
            controller,
            mandatory,
            event: GameEvent::flipped(InstanceId(source), controller),
        }
    }

    #[test]
    fn test_buckets() {
        let tp = PlayerId::SECOND;
        assert_eq!(candidate(0, tp, true).bucket(tp), 0);
        assert_eq!(candidate(0, tp.opponent(), true).bucket(tp), 1);
        assert_eq!(candidate(0, tp, false).bucket(tp), 2);
        assert_eq!(candidate(0, tp.opponent(), false).bucket(tp), 3);
    }

    #[test]
    fn test_order_is_stable_within_bucket() {
        let tp = PlayerId::FIRST;
        let ntp = PlayerId::SECOND;
        let mut list = vec![
            candidate(1, ntp, false),
            candidate(2, tp, false),
            candidate(3, ntp, true),
            candidate(4, tp, true),
            candidate(5, tp, true),
            candidate(6, ntp, false),
        ];
        order_candidates(&mut list, tp);
        let order: Vec<u32> = list.iter().map(|c| c.source.raw()).collect();
        assert_eq!(order, vec![4, 5, 3, 2, 1, 6]);
    }
}
