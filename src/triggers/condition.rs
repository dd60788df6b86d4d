//! Trigger matching.
//!
//! A trigger effect answers an event when its `TriggerSpec` matches the
//! event (exact kind, or the card's own filter) and the effect is usable
//! right now (condition hook, once-per-turn).

use crate::effects::{Effect, EffectContext, TriggerSpec};
use crate::rules::Duel;

use super::event::GameEvent;

// === Event Matching ===

/// Whether `event` wakes an effect with this trigger spec.
///
/// Exact kind equality is checked first; a filter, when present, is an
/// alternative way to match, so a spec with both accepts either.
#[must_use]
pub fn event_matches(duel: &Duel, spec: &TriggerSpec, ctx: &EffectContext, event: &GameEvent) -> bool {
    if spec.event == Some(event.kind) {
        return true;
    }
    spec.filter.is_some_and(|filter| filter(duel, ctx, event))
}

// === Eligibility ===

/// Whether the effect may be used now, ignoring timing.
#[must_use]
pub fn effect_usable(duel: &Duel, effect: &Effect, ctx: &EffectContext) -> bool {
    if effect.once_per_turn && duel.state().card(ctx.source).effect_used(ctx.effect) {
        return false;
    }
    effect.hooks.condition.map_or(true, |condition| condition(duel, ctx))
}

/// Event match plus eligibility.
#[must_use]
pub fn trigger_fires(duel: &Duel, effect: &Effect, ctx: &EffectContext, event: &GameEvent) -> bool {
    let Some(spec) = effect.trigger.as_ref() else {
        return false;
    };
    event_matches(duel, spec, ctx, event) && effect_usable(duel, effect, ctx)
}
