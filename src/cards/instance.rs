//! Card instances - runtime card state.
//!
//! `CardInstance` is one physical card in a duel. It is created once at
//! setup and then only moves. It tracks position and facing, per-turn
//! flags, counters, stat modifiers, and equip linkage.
//!
//! ## Effective stats
//!
//! Effective ATK/DEF is the printed value plus every modifier delta,
//! floored at zero. Continuous modifiers are rebuilt by the recalculator;
//! permanent ones stay until the card leaves the field.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

use super::attributes::{Position, ProgramKind};
use super::definition::Card;
use super::CardKind;
use crate::core::entity::InstanceId;
use crate::core::player::PlayerId;
use crate::zones::{Location, Zone};

/// How long a stat modifier lasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierLifetime {
    /// Re-derived on every recalculation.
    Continuous,
    /// Survives its source leaving; cleared when the carrier leaves the field.
    Permanent,
    /// Dropped in the End Phase.
    UntilEndOfTurn,
}

/// An ATK/DEF adjustment carried by an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatModifier {
    pub source: InstanceId,
    pub atk: i32,
    pub def: i32,
    pub lifetime: ModifierLifetime,
}

impl StatModifier {
    #[must_use]
    pub fn continuous(source: InstanceId, atk: i32, def: i32) -> Self {
        Self { source, atk, def, lifetime: ModifierLifetime::Continuous }
    }

    #[must_use]
    pub fn permanent(source: InstanceId, atk: i32, def: i32) -> Self {
        Self { source, atk, def, lifetime: ModifierLifetime::Permanent }
    }

    #[must_use]
    pub fn until_end_of_turn(source: InstanceId, atk: i32, def: i32) -> Self {
        Self { source, atk, def, lifetime: ModifierLifetime::UntilEndOfTurn }
    }
}

/// A card instance in a duel.
#[derive(Clone, Debug)]
pub struct CardInstance {
    pub id: InstanceId,

    /// Shared descriptor.
    pub card: Arc<Card>,

    /// Whose deck it started in. Never changes.
    pub owner: PlayerId,

    /// Who currently controls it. Equals `owner` off the field.
    pub controller: PlayerId,

    pub location: Location,

    pub face_up: bool,

    pub position: Position,

    /// Turn on which the card last arrived on the field.
    pub placed_turn: Option<u32>,

    pub has_attacked: bool,

    pub position_changed: bool,

    /// Indices of once-per-turn effects already used this turn.
    pub used_effects: SmallVec<[usize; 2]>,

    pub counters: FxHashMap<String, i64>,

    pub modifiers: SmallVec<[StatModifier; 4]>,

    /// For equip cards: the agent this card is attached to.
    pub equipped_to: Option<InstanceId>,

    /// For agents: the equip cards attached to it.
    pub equips: SmallVec<[InstanceId; 2]>,
}

impl CardInstance {
    /// Create an instance sitting in its owner's deck.
    #[must_use]
    pub fn new(id: InstanceId, card: Arc<Card>, owner: PlayerId) -> Self {
        Self {
            id,
            card,
            owner,
            controller: owner,
            location: Location::new(owner, Zone::Deck),
            face_up: false,
            position: Position::Attack,
            placed_turn: None,
            has_attacked: false,
            position_changed: false,
            used_effects: SmallVec::new(),
            counters: FxHashMap::default(),
            modifiers: SmallVec::new(),
            equipped_to: None,
            equips: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.card.name
    }

    #[must_use]
    pub fn kind(&self) -> CardKind {
        self.card.kind
    }

    #[must_use]
    pub fn is_on_field(&self) -> bool {
        self.location.zone.is_field()
    }

    /// Face-up agent on the field.
    #[must_use]
    pub fn is_face_up_agent(&self) -> bool {
        self.face_up && matches!(self.location.zone, Zone::Agent(_))
    }

    #[must_use]
    pub fn is_equip(&self) -> bool {
        self.card.kind == CardKind::Program(ProgramKind::Equip)
    }

    /// Arrived on the field on a turn other than `turn`.
    #[must_use]
    pub fn placed_before(&self, turn: u32) -> bool {
        self.placed_turn.is_some_and(|placed| placed < turn)
    }

    /// Effective ATK: printed ATK plus modifiers, floored at 0.
    #[must_use]
    pub fn atk(&self) -> i32 {
        let delta: i32 = self.modifiers.iter().map(|m| m.atk).sum();
        (self.card.atk + delta).max(0)
    }

    /// Effective DEF: printed DEF plus modifiers, floored at 0.
    #[must_use]
    pub fn def(&self) -> i32 {
        let delta: i32 = self.modifiers.iter().map(|m| m.def).sum();
        (self.card.def + delta).max(0)
    }

    pub fn add_modifier(&mut self, modifier: StatModifier) {
        self.modifiers.push(modifier);
    }

    /// Remove every modifier with the given lifetime.
    pub fn strip_modifiers(&mut self, lifetime: ModifierLifetime) {
        self.modifiers.retain(|m| m.lifetime != lifetime);
    }

    /// Get a counter value (0 if never set).
    #[must_use]
    pub fn counter(&self, key: &str) -> i64 {
        self.counters.get(key).copied().unwrap_or(0)
    }

    /// Modify a counter by delta, never going below zero.
    pub fn add_counter(&mut self, key: &str, delta: i64) {
        let next = (self.counter(key) + delta).max(0);
        self.counters.insert(key.to_string(), next);
    }

    /// Whether a once-per-turn effect was already used this turn.
    #[must_use]
    pub fn effect_used(&self, effect: usize) -> bool {
        self.used_effects.contains(&effect)
    }

    /// Clear flags that only last one turn.
    pub fn reset_turn_flags(&mut self) {
        self.has_attacked = false;
        self.position_changed = false;
        self.used_effects.clear();
    }

    /// Forget everything tied to the card's time on the field.
    pub fn reset_field_state(&mut self) {
        self.controller = self.owner;
        self.position = Position::Attack;
        self.placed_turn = None;
        self.reset_turn_flags();
        self.counters.clear();
        self.modifiers.clear();
        self.equipped_to = None;
        self.equips.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Element;

    fn runner() -> CardInstance {
        let card = Arc::new(Card::agent("Packet Runner", 4, Element::Wind, 1400, 1200));
        CardInstance::new(InstanceId(10), card, PlayerId::FIRST)
    }

    #[test]
    fn test_card_instance_new() {
        let instance = runner();
        assert_eq!(instance.owner, PlayerId::FIRST);
        assert_eq!(instance.controller, PlayerId::FIRST);
        assert_eq!(instance.location, Location::new(PlayerId::FIRST, Zone::Deck));
        assert!(!instance.is_on_field());
    }

    #[test]
    fn test_effective_stats_floor_at_zero() {
        let mut instance = runner();
        instance.add_modifier(StatModifier::continuous(InstanceId(1), 300, -100));
        assert_eq!(instance.atk(), 1700);
        assert_eq!(instance.def(), 1100);

        instance.add_modifier(StatModifier::permanent(InstanceId(2), -5000, -5000));
        assert_eq!(instance.atk(), 0);
        assert_eq!(instance.def(), 0);
    }

    #[test]
    fn test_strip_only_matching_lifetime() {
        let mut instance = runner();
        instance.add_modifier(StatModifier::continuous(InstanceId(1), 300, 0));
        instance.add_modifier(StatModifier::permanent(InstanceId(2), 100, 0));
        instance.add_modifier(StatModifier::until_end_of_turn(InstanceId(3), 50, 0));

        instance.strip_modifiers(ModifierLifetime::Continuous);
        assert_eq!(instance.atk(), 1550);
        instance.strip_modifiers(ModifierLifetime::UntilEndOfTurn);
        assert_eq!(instance.atk(), 1500);
    }

    #[test]
    fn test_counters() {
        let mut instance = runner();
        assert_eq!(instance.counter("signal"), 0);
        instance.add_counter("signal", 2);
        instance.add_counter("signal", -5);
        assert_eq!(instance.counter("signal"), 0);
    }

    #[test]
    fn test_reset_field_state() {
        let mut instance = runner();
        instance.controller = PlayerId::SECOND;
        instance.has_attacked = true;
        instance.add_counter("signal", 1);
        instance.add_modifier(StatModifier::permanent(InstanceId(2), 100, 0));

        instance.reset_field_state();
        assert_eq!(instance.controller, PlayerId::FIRST);
        assert!(!instance.has_attacked);
        assert!(instance.counters.is_empty());
        assert!(instance.modifiers.is_empty());
    }

    #[test]
    fn test_placed_before() {
        let mut instance = runner();
        assert!(!instance.placed_before(3));
        instance.placed_turn = Some(2);
        assert!(instance.placed_before(3));
        assert!(!instance.placed_before(2));
    }
}
