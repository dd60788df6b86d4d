//! Printed card properties.
//!
//! ## Card kinds
//!
//! - `Agent`: occupies an agent slot, battles, has level/ATK/DEF
//! - `Program`: normal, quick-play, continuous, equip, or OS
//! - `Trap`: normal, continuous, or counter
//!
//! ## Positions
//!
//! Agents on the field are in attack or defense position, face-up or
//! face-down. Set agents are always face-down defense.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Elemental attribute of an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Light,
    Dark,
    Fire,
    Water,
    Earth,
    Wind,
}

/// Program subtype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgramKind {
    Normal,
    QuickPlay,
    Continuous,
    Equip,
    /// Occupies the single OS slot.
    Os,
}

/// Trap subtype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrapKind {
    Normal,
    Continuous,
    Counter,
}

/// Top-level card category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Agent,
    Program(ProgramKind),
    Trap(TrapKind),
}

impl CardKind {
    #[must_use]
    pub fn is_agent(self) -> bool {
        matches!(self, CardKind::Agent)
    }

    #[must_use]
    pub fn is_program(self) -> bool {
        matches!(self, CardKind::Program(_))
    }

    #[must_use]
    pub fn is_trap(self) -> bool {
        matches!(self, CardKind::Trap(_))
    }

    /// Programs and traps: cards that live in tech slots (or the OS slot).
    #[must_use]
    pub fn is_tech(self) -> bool {
        !self.is_agent()
    }

    /// Cards that leave for the scrapheap once their activation resolves.
    ///
    /// ```
    /// use netduel::cards::{CardKind, ProgramKind, TrapKind};
    ///
    /// assert!(CardKind::Program(ProgramKind::Normal).is_single_use());
    /// assert!(CardKind::Trap(TrapKind::Counter).is_single_use());
    /// assert!(!CardKind::Program(ProgramKind::Equip).is_single_use());
    /// assert!(!CardKind::Agent.is_single_use());
    /// ```
    #[must_use]
    pub fn is_single_use(self) -> bool {
        matches!(
            self,
            CardKind::Program(ProgramKind::Normal | ProgramKind::QuickPlay)
                | CardKind::Trap(TrapKind::Normal | TrapKind::Counter)
        )
    }
}

/// Battle position of an agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[default]
    Attack,
    Defense,
}

impl Position {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Position::Attack => Position::Defense,
            Position::Defense => Position::Attack,
        }
    }
}

bitflags! {
    /// Static battle keywords printed on an agent.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct AgentTraits: u8 {
        /// Inflicts the ATK-over-DEF difference when attacking a defender.
        const PIERCING    = 1 << 0;
        /// May attack directly even while the opponent controls agents.
        const DIRECT      = 1 << 1;
        /// Cannot be chosen as an attack target while face-up.
        const UNTARGETABLE = 1 << 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        assert!(CardKind::Agent.is_agent());
        assert!(CardKind::Trap(TrapKind::Normal).is_tech());
        assert!(CardKind::Program(ProgramKind::Os).is_program());
        assert!(!CardKind::Trap(TrapKind::Continuous).is_single_use());
    }

    #[test]
    fn test_position_flip() {
        assert_eq!(Position::Attack.flipped(), Position::Defense);
        assert_eq!(Position::Defense.flipped(), Position::Attack);
    }

    #[test]
    fn test_traits() {
        let traits = AgentTraits::PIERCING | AgentTraits::DIRECT;
        assert!(traits.contains(AgentTraits::PIERCING));
        assert!(!traits.contains(AgentTraits::UNTARGETABLE));
    }
}
