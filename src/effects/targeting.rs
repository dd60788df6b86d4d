//! Effect targeting.
//!
//! Target hooks describe what they may target with a list of
//! `TargetFilter`s; `TargetSelector` turns that into the candidate list
//! offered through `choose_cards`, and re-checks a locked target when the
//! link resolves.
//!
//! ```
//! use netduel::effects::{TargetFilter, TargetSpec, Side};
//!
//! // "Target 1 face-up agent your opponent controls"
//! let spec = TargetSpec::one(vec![
//!     TargetFilter::Agent,
//!     TargetFilter::FaceUp,
//!     TargetFilter::ControlledBy(Side::Opponent),
//! ]);
//! assert_eq!((spec.min, spec.max), (1, 1));
//! ```

use serde::{Deserialize, Serialize};

use super::context::EffectContext;
use crate::cards::Position;
use crate::core::{GameState, InstanceId};

/// Relative side for control filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Own,
    Opponent,
}

/// One requirement on a target card. All filters must hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetFilter {
    /// Card is an agent on the field.
    Agent,
    /// Card is a program or trap on the field (tech or OS slot).
    Tech,
    ControlledBy(Side),
    FaceUp,
    FaceDown,
    AttackPosition,
    /// Card is not the effect's own source.
    NotSource,
}

/// Target filters plus how many to pick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub filters: Vec<TargetFilter>,
    pub min: usize,
    pub max: usize,
}

impl TargetSpec {
    /// Exactly one target.
    #[must_use]
    pub fn one(filters: Vec<TargetFilter>) -> Self {
        Self { filters, min: 1, max: 1 }
    }

    /// Between one and `max` targets.
    #[must_use]
    pub fn up_to(max: usize, filters: Vec<TargetFilter>) -> Self {
        Self { filters, min: 1, max }
    }
}

/// Finds and validates targets on the field.
pub struct TargetSelector;

impl TargetSelector {
    /// Every field card matching all filters, in recalculation order.
    #[must_use]
    pub fn candidates(
        state: &GameState,
        ctx: &EffectContext,
        filters: &[TargetFilter],
    ) -> Vec<InstanceId> {
        state
            .field_in_order()
            .into_iter()
            .filter(|&id| Self::matches(state, ctx, id, filters))
            .collect()
    }

    /// Whether `id` is on the field and satisfies every filter.
    #[must_use]
    pub fn matches(
        state: &GameState,
        ctx: &EffectContext,
        id: InstanceId,
        filters: &[TargetFilter],
    ) -> bool {
        let card = state.card(id);
        if !card.is_on_field() {
            return false;
        }
        filters.iter().all(|filter| match filter {
            TargetFilter::Agent => card.kind().is_agent(),
            TargetFilter::Tech => card.kind().is_tech(),
            TargetFilter::ControlledBy(Side::Own) => card.controller == ctx.controller,
            TargetFilter::ControlledBy(Side::Opponent) => card.controller != ctx.controller,
            TargetFilter::FaceUp => card.face_up,
            TargetFilter::FaceDown => !card.face_up,
            TargetFilter::AttackPosition => card.position == Position::Attack,
            TargetFilter::NotSource => id != ctx.source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Element, ProgramKind};
    use crate::core::PlayerId;
    use crate::zones::{Location, Zone};
    use std::sync::Arc;

    #[test]
    fn test_candidates_respect_filters() {
        let mut state = GameState::new(8000);
        let agent = Arc::new(Card::agent("Packet Runner", 4, Element::Wind, 1400, 1200));
        let os = Arc::new(Card::program("Grid OS", ProgramKind::Os));

        let mine = state.add_card(agent.clone(), PlayerId::FIRST);
        let theirs = state.add_card(agent, PlayerId::SECOND);
        let field = state.add_card(os, PlayerId::SECOND);
        state.move_card(mine, Location::new(PlayerId::FIRST, Zone::Agent(0))).unwrap();
        state.move_card(theirs, Location::new(PlayerId::SECOND, Zone::Agent(0))).unwrap();
        state.move_card(field, Location::new(PlayerId::SECOND, Zone::Os)).unwrap();
        state.card_mut(theirs).face_up = true;
        state.card_mut(field).face_up = true;

        let ctx = EffectContext::new(mine, 0, PlayerId::FIRST);
        let agents = TargetSelector::candidates(
            &state,
            &ctx,
            &[TargetFilter::Agent, TargetFilter::ControlledBy(Side::Opponent)],
        );
        assert_eq!(agents, vec![theirs]);

        let techs = TargetSelector::candidates(&state, &ctx, &[TargetFilter::Tech]);
        assert_eq!(techs, vec![field]);

        let face_up = TargetSelector::candidates(&state, &ctx, &[TargetFilter::FaceUp]);
        assert_eq!(face_up, vec![field, theirs]);

        let not_self = TargetSelector::candidates(&state, &ctx, &[TargetFilter::NotSource, TargetFilter::Agent]);
        assert_eq!(not_self, vec![theirs]);
    }

    #[test]
    fn test_off_field_never_matches() {
        let mut state = GameState::new(8000);
        let agent = Arc::new(Card::agent("Packet Runner", 4, Element::Wind, 1400, 1200));
        let id = state.add_card(agent, PlayerId::FIRST);
        let ctx = EffectContext::new(id, 0, PlayerId::FIRST);
        assert!(!TargetSelector::matches(&state, &ctx, id, &[]));
    }
}
