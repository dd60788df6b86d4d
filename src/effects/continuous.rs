//! Continuous effects.
//!
//! Recalculation throws away every continuous modifier and asks each
//! face-up field card to re-add its own. The pass reads nothing it writes
//! (hooks see base stats and non-continuous modifiers only, plus counters
//! and equip links), so running it twice gives the same result as once.
//!
//! Order: OS slots, tech slots, agent slots; first player's side first
//! within each group.

use std::sync::Arc;

use super::context::EffectContext;
use crate::cards::ModifierLifetime;
use crate::core::{GameState, InstanceId};

/// Strip and re-apply all continuous modifiers.
pub fn recalculate(state: &mut GameState) {
    for card in &mut state.cards {
        card.strip_modifiers(ModifierLifetime::Continuous);
    }

    for id in state.field_in_order() {
        let instance = state.card(id);
        if !instance.face_up {
            continue;
        }
        let card = Arc::clone(&instance.card);
        let controller = instance.controller;
        for (index, effect) in card.effects.iter().enumerate() {
            if let Some(apply) = effect.hooks.continuous {
                apply(state, &EffectContext::new(id, index, controller));
            }
        }
    }
}

/// Whether any face-up field card currently forbids `attacker` from
/// attacking.
#[must_use]
pub fn attack_restricted(state: &GameState, attacker: InstanceId) -> bool {
    state.field_in_order().into_iter().any(|id| {
        let instance = state.card(id);
        instance.face_up
            && instance.card.effects.iter().enumerate().any(|(index, effect)| {
                effect.hooks.attack_restriction.is_some_and(|restricts| {
                    restricts(state, &EffectContext::new(id, index, instance.controller), attacker)
                })
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Element, ProgramKind, StatModifier};
    use crate::core::PlayerId;
    use crate::effects::Effect;
    use crate::zones::{Location, Zone};

    fn boost_all(state: &mut GameState, ctx: &EffectContext) {
        for id in state.all_agents() {
            if state.card(id).face_up {
                state.card_mut(id).add_modifier(StatModifier::continuous(ctx.source, 300, 0));
            }
        }
    }

    fn no_big_attackers(state: &GameState, _: &EffectContext, attacker: InstanceId) -> bool {
        state.card(attacker).atk() >= 1900
    }

    fn setup() -> (GameState, InstanceId, InstanceId) {
        let mut state = GameState::new(8000);
        let agent = Arc::new(Card::agent("Packet Runner", 4, Element::Wind, 1400, 1200));
        let os = Arc::new(
            Card::program("Grid OS", ProgramKind::Os)
                .with_effect(Effect::continuous("boost").with_continuous(boost_all))
                .with_effect(Effect::continuous("limit").with_attack_restriction(no_big_attackers)),
        );
        let a = state.add_card(agent, PlayerId::FIRST);
        let field = state.add_card(os, PlayerId::SECOND);
        state.move_card(a, Location::new(PlayerId::FIRST, Zone::Agent(0))).unwrap();
        state.move_card(field, Location::new(PlayerId::SECOND, Zone::Os)).unwrap();
        state.card_mut(a).face_up = true;
        state.card_mut(field).face_up = true;
        (state, a, field)
    }

    #[test]
    fn test_recalculate_is_idempotent() {
        let (mut state, a, _) = setup();
        state.card_mut(a).add_modifier(StatModifier::permanent(a, 100, 0));

        recalculate(&mut state);
        let once = state.card(a).modifiers.clone();
        recalculate(&mut state);
        assert_eq!(state.card(a).modifiers, once);
        assert_eq!(state.card(a).atk(), 1800);
    }

    #[test]
    fn test_face_down_source_applies_nothing() {
        let (mut state, a, field) = setup();
        state.card_mut(field).face_up = false;
        recalculate(&mut state);
        assert_eq!(state.card(a).atk(), 1400);
    }

    #[test]
    fn test_attack_restriction_reads_effective_atk() {
        let (mut state, a, _) = setup();
        assert!(!attack_restricted(&state, a));
        state.card_mut(a).add_modifier(StatModifier::permanent(a, 500, 0));
        assert!(attack_restricted(&state, a));
    }
}
