//! Card descriptors - static card data.
//!
//! `Card` holds the immutable properties of a card: its kind, printed
//! stats, keywords, and effect descriptors. One `Card` is shared (through
//! `Arc`) by every copy of it in every deck.
//!
//! Instance-specific data (zone, position, modifiers, counters) is stored
//! separately in `CardInstance`.

use serde::{Deserialize, Serialize};

use super::attributes::{AgentTraits, CardKind, Element, ProgramKind, TrapKind};
use crate::effects::Effect;

/// Catalog index of a card descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Static card descriptor.
///
/// ## Example
///
/// ```
/// use netduel::cards::{Card, Element};
///
/// let card = Card::agent("Packet Runner", 4, Element::Wind, 1400, 1200);
/// assert_eq!(card.atk, 1400);
/// assert_eq!(card.tributes_required(), 0);
///
/// let big = Card::agent("Overclock Titan", 7, Element::Light, 2700, 2200);
/// assert_eq!(big.tributes_required(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Card {
    /// Catalog identifier, assigned on registration.
    pub id: CardId,

    pub name: String,

    pub kind: CardKind,

    /// Agent level (0 for programs and traps).
    pub level: u8,

    pub element: Option<Element>,

    /// Printed ATK (0 for programs and traps).
    pub atk: i32,

    /// Printed DEF (0 for programs and traps).
    pub def: i32,

    pub traits: AgentTraits,

    /// Effect descriptors in printed order. `Action::Activate` refers to
    /// these by index.
    pub effects: Vec<Effect>,
}

impl Card {
    fn blank(name: impl Into<String>, kind: CardKind) -> Self {
        Self {
            id: CardId::new(0),
            name: name.into(),
            kind,
            level: 0,
            element: None,
            atk: 0,
            def: 0,
            traits: AgentTraits::empty(),
            effects: Vec::new(),
        }
    }

    /// An agent with printed stats and no effects.
    #[must_use]
    pub fn agent(name: impl Into<String>, level: u8, element: Element, atk: i32, def: i32) -> Self {
        Self {
            level,
            element: Some(element),
            atk,
            def,
            ..Self::blank(name, CardKind::Agent)
        }
    }

    /// A program of the given subtype.
    #[must_use]
    pub fn program(name: impl Into<String>, kind: ProgramKind) -> Self {
        Self::blank(name, CardKind::Program(kind))
    }

    /// A trap of the given subtype.
    #[must_use]
    pub fn trap(name: impl Into<String>, kind: TrapKind) -> Self {
        Self::blank(name, CardKind::Trap(kind))
    }

    /// Add an effect descriptor (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Add battle keywords (builder pattern).
    #[must_use]
    pub fn with_traits(mut self, traits: AgentTraits) -> Self {
        self.traits |= traits;
        self
    }

    /// Tributes a normal summon or set of this agent needs.
    #[must_use]
    pub fn tributes_required(&self) -> usize {
        match self.level {
            0..=4 => 0,
            5 | 6 => 1,
            _ => 2,
        }
    }

    /// Whether the agent carries any effect at all.
    #[must_use]
    pub fn is_effect_agent(&self) -> bool {
        self.kind.is_agent() && !self.effects.is_empty()
    }

    /// Look up an effect by index.
    #[must_use]
    pub fn effect(&self, index: usize) -> Option<&Effect> {
        self.effects.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{Effect, ExecutionSpeed};

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_tributes_by_level() {
        let stats = |level| Card::agent("x", level, Element::Dark, 0, 0).tributes_required();
        assert_eq!(stats(1), 0);
        assert_eq!(stats(4), 0);
        assert_eq!(stats(5), 1);
        assert_eq!(stats(6), 1);
        assert_eq!(stats(7), 2);
        assert_eq!(stats(12), 2);
    }

    #[test]
    fn test_program_builder() {
        let card = Card::program("Restore Point", ProgramKind::Normal)
            .with_effect(Effect::activation("gain hp", ExecutionSpeed::Slow));
        assert!(card.kind.is_program());
        assert_eq!(card.effects.len(), 1);
        assert!(card.effect(1).is_none());
        assert!(!card.is_effect_agent());
    }
}
