//! Rules primitives.
//!
//! Card movement, hit points, control and counters. Effect hooks and the
//! phase/battle code both use these, so every change to the board is
//! logged the same way no matter who caused it.
//!
//! ## Leaving the field
//!
//! A card that leaves the field, for any reason:
//!
//! 1. runs its leave-field hooks (if it was face-up)
//! 2. is unhooked from the agent it equipped
//! 3. moves to its owner's destination pile
//! 4. forgets its field state (modifiers, counters, control, flags)
//! 5. takes any equips attached to it to the scrapheap

use smallvec::SmallVec;
use std::sync::Arc;
use tracing::debug;

use crate::cards::{Card, Position};
use crate::core::{DuelEventKind, EndReason, InstanceId, PlayerId};
use crate::effects::{recalculate, EffectContext, TargetSelector, TargetSpec};
use crate::error::DuelError;
use crate::triggers::GameEvent;
use crate::zones::{Location, Zone};

use super::engine::Duel;

impl Duel {
    /// Recalculate continuous effects unless a chain is open; the chain
    /// recalculates once when it empties.
    pub(crate) fn refresh(&mut self) {
        if self.state.chain.is_none() {
            recalculate(&mut self.state);
        }
    }

    // === Drawing ===

    /// Draw up to `count` cards. Drawing from an empty deck loses the duel.
    /// Returns how many cards were drawn.
    pub fn draw(&mut self, player: PlayerId, count: usize) -> Result<usize, DuelError> {
        let mut drawn = 0;
        for _ in 0..count {
            if self.state.is_over() {
                break;
            }
            let Some(&top) = self.state.players[player].deck.last() else {
                self.lose(player, EndReason::DeckOut, &format!("{player} cannot draw from an empty deck"));
                break;
            };
            self.state.move_card(top, Location::new(player, Zone::Hand))?;
            drawn += 1;
            self.emit(DuelEventKind::Draw, Some(player), Some(top), None, format!("{player} draws"));
        }
        Ok(drawn)
    }

    // === Hit points ===

    /// Inflict damage. Reaching 0 loses the duel.
    pub fn damage(&mut self, player: PlayerId, amount: i32) {
        if amount > 0 {
            self.change_hp(player, -amount, format!("{player} takes {amount} damage"));
        }
    }

    pub fn heal(&mut self, player: PlayerId, amount: i32) {
        if amount > 0 {
            self.change_hp(player, amount, format!("{player} gains {amount} hp"));
        }
    }

    /// Pay hit points as a cost.
    pub fn pay_hp(&mut self, player: PlayerId, amount: i32) {
        if amount > 0 {
            self.change_hp(player, -amount, format!("{player} pays {amount} hp"));
        }
    }

    fn change_hp(&mut self, player: PlayerId, delta: i32, detail: String) {
        let hp = self.state.players[player].hp.saturating_add(delta).max(0);
        self.state.players[player].hp = hp;
        self.emit(DuelEventKind::HpChange, Some(player), None, Some(hp), detail);
        if hp == 0 {
            self.lose(player, EndReason::HpDepleted, &format!("{player} has no hp left"));
        }
    }

    // === Movement ===

    /// Destroy a card on the field by an effect. Returns `false` if it was
    /// not on the field.
    pub fn destroy(&mut self, card: InstanceId, cause: Option<InstanceId>) -> Result<bool, DuelError> {
        self.destroy_with(card, cause, false)
    }

    pub(crate) fn destroy_by_battle(&mut self, card: InstanceId, attacker: InstanceId) -> Result<bool, DuelError> {
        self.destroy_with(card, Some(attacker), true)
    }

    fn destroy_with(&mut self, card: InstanceId, cause: Option<InstanceId>, by_battle: bool) -> Result<bool, DuelError> {
        let instance = self.state.card(card);
        if !instance.is_on_field() {
            return Ok(false);
        }
        let controller = instance.controller;
        let owner = instance.owner;
        let event = GameEvent::destroyed(card, controller, cause, by_battle);
        let detail = if by_battle { "destroyed by battle" } else { "destroyed" };
        self.emit(DuelEventKind::Destroy, Some(controller), Some(card), None, detail);

        self.queue_self_triggers(card, event.kind, &event);
        self.leave_field(card, Location::new(owner, Zone::Scrapheap))?;
        self.raise(event)?;
        Ok(true)
    }

    /// Send a card from anywhere to its owner's scrapheap.
    pub fn send_to_scrapheap(&mut self, card: InstanceId) -> Result<(), DuelError> {
        let to = self.state.scrapheap_of(card);
        if self.state.card(card).is_on_field() {
            return self.leave_field(card, to);
        }
        self.state.move_card(card, to)?;
        self.state.card_mut(card).face_up = true;
        let owner = self.state.card(card).owner;
        self.emit(DuelEventKind::SentToScrapheap, Some(owner), Some(card), None, "sent to the scrapheap");
        Ok(())
    }

    /// Discard a card from `player`'s hand.
    pub fn discard(&mut self, player: PlayerId, card: InstanceId) -> Result<(), DuelError> {
        if self.state.card(card).location != Location::new(player, Zone::Hand) {
            return Err(DuelError::invariant(format!("{card} is not in {player}'s hand")));
        }
        let to = self.state.scrapheap_of(card);
        self.state.move_card(card, to)?;
        self.state.card_mut(card).face_up = true;
        self.emit(DuelEventKind::Discard, Some(player), Some(card), None, format!("{player} discards"));
        Ok(())
    }

    /// Remove a card from play.
    pub fn purge(&mut self, card: InstanceId) -> Result<(), DuelError> {
        let to = Location::new(self.state.card(card).owner, Zone::Purged);
        if self.state.card(card).is_on_field() {
            return self.leave_field(card, to);
        }
        self.state.move_card(card, to)?;
        self.state.card_mut(card).face_up = true;
        self.emit(DuelEventKind::Purge, None, Some(card), None, "purged");
        Ok(())
    }

    /// Return a field card to its owner's hand.
    pub fn return_to_hand(&mut self, card: InstanceId) -> Result<bool, DuelError> {
        if !self.state.card(card).is_on_field() {
            return Ok(false);
        }
        let to = Location::new(self.state.card(card).owner, Zone::Hand);
        self.leave_field(card, to)?;
        Ok(true)
    }

    fn leave_field(&mut self, card: InstanceId, to: Location) -> Result<(), DuelError> {
        let instance = self.state.card(card);
        let definition: Arc<Card> = Arc::clone(&instance.card);
        let controller = instance.controller;

        if instance.face_up {
            for (index, effect) in definition.effects.iter().enumerate() {
                if let Some(hook) = effect.hooks.leave_field {
                    hook(self, &EffectContext::new(card, index, controller))?;
                }
            }
        }

        let equips: SmallVec<[InstanceId; 2]> = self.state.card(card).equips.clone();
        let host = self.state.card(card).equipped_to;
        if let Some(host) = host {
            self.state.card_mut(host).equips.retain(|e| *e != card);
        }

        let (kind, detail) = match to.zone {
            Zone::Hand => (DuelEventKind::ReturnToHand, "returned to hand"),
            Zone::Purged => (DuelEventKind::Purge, "purged"),
            _ => (DuelEventKind::SentToScrapheap, "sent to the scrapheap"),
        };
        self.state.move_card(card, to)?;
        let moved = self.state.card_mut(card);
        moved.reset_field_state();
        moved.face_up = !matches!(to.zone, Zone::Hand | Zone::Deck);
        self.emit(kind, Some(to.side), Some(card), None, detail);

        for equip in equips {
            if self.state.card(equip).is_on_field() {
                self.send_to_scrapheap(equip)?;
            }
        }
        self.refresh();
        Ok(())
    }

    // === Board state ===

    /// Turn a face-down card face-up without summoning it. Flip effects
    /// are queued.
    pub fn flip_face_up(&mut self, card: InstanceId) -> Result<(), DuelError> {
        if self.state.card(card).face_up {
            return Ok(());
        }
        self.state.card_mut(card).face_up = true;
        self.refresh();
        let controller = self.state.card(card).controller;
        self.emit(DuelEventKind::Flip, Some(controller), Some(card), None, "flipped face-up");
        let event = GameEvent::flipped(card, controller);
        self.queue_self_triggers(card, event.kind, &event);
        self.raise(event)?;
        Ok(())
    }

    /// Change a field agent's battle position.
    pub fn set_position(&mut self, card: InstanceId, position: Position) {
        let instance = self.state.card_mut(card);
        if instance.position == position {
            return;
        }
        instance.position = position;
        let controller = instance.controller;
        self.emit(
            DuelEventKind::PositionChange,
            Some(controller),
            Some(card),
            None,
            format!("now in {position:?} position"),
        );
        self.refresh();
    }

    /// Move an agent to `new_controller`'s side. Fails quietly when the
    /// card is not a field agent or there is no free slot.
    pub fn take_control(&mut self, card: InstanceId, new_controller: PlayerId) -> Result<bool, DuelError> {
        let instance = self.state.card(card);
        if !instance.kind().is_agent() || !instance.is_on_field() || instance.controller == new_controller {
            return Ok(false);
        }
        let Some(slot) = self.state.players[new_controller].free_agent_slot() else {
            return Ok(false);
        };
        self.state.move_card(card, Location::new(new_controller, Zone::Agent(slot)))?;
        self.state.card_mut(card).controller = new_controller;
        self.emit(
            DuelEventKind::ControlChange,
            Some(new_controller),
            Some(card),
            None,
            format!("{new_controller} takes control"),
        );
        self.refresh();
        Ok(true)
    }

    /// Attach an equip card to a face-up agent.
    pub fn equip(&mut self, equip: InstanceId, target: InstanceId) -> Result<bool, DuelError> {
        if !self.state.card(equip).is_on_field() || !self.state.card(target).is_face_up_agent() {
            return Ok(false);
        }
        let previous = self.state.card(equip).equipped_to;
        if let Some(old) = previous {
            self.state.card_mut(old).equips.retain(|e| *e != equip);
        }
        self.state.card_mut(equip).equipped_to = Some(target);
        self.state.card_mut(target).equips.push(equip);
        let controller = self.state.card(equip).controller;
        self.emit(DuelEventKind::Equip, Some(controller), Some(target), None, "equipped");
        self.refresh();
        Ok(true)
    }

    pub fn add_counter(&mut self, card: InstanceId, key: &str, delta: i64) {
        self.state.card_mut(card).add_counter(key, delta);
        let value = self.state.card(card).counter(key);
        let controller = self.state.card(card).controller;
        self.emit(
            DuelEventKind::CounterChange,
            Some(controller),
            Some(card),
            Some(i32::try_from(value).unwrap_or(i32::MAX)),
            format!("{key} counter: {value}"),
        );
        self.refresh();
    }

    /// Stop the attack in progress. Returns `false` when there is none.
    pub fn negate_attack(&mut self, source: InstanceId) -> bool {
        let Some(attack) = self.state.attack.as_mut() else {
            return false;
        };
        attack.negated = true;
        let attacker = attack.attacker;
        let controller = self.state.card(source).controller;
        debug!(%attacker, %source, "attack negated");
        self.emit(DuelEventKind::AttackNegated, Some(controller), Some(attacker), None, "attack negated");
        true
    }

    // === Targeting ===

    /// Offer the field cards matching `spec` to the effect's controller and
    /// lock the picks into `ctx`. Returns `false` (no activation) when
    /// fewer than `spec.min` candidates exist.
    pub fn choose_targets(&mut self, ctx: &mut EffectContext, spec: &TargetSpec) -> Result<bool, DuelError> {
        let candidates = TargetSelector::candidates(&self.state, ctx, &spec.filters);
        if candidates.len() < spec.min {
            return Ok(false);
        }
        let max = spec.max.min(candidates.len());
        let name = self.state.card(ctx.source).name().to_string();
        let picked = self.ask_cards(ctx.controller, &format!("{name}: choose targets"), &candidates, spec.min, max)?;
        ctx.targets = picked.into_iter().collect();
        Ok(true)
    }
}
