//! Battle Phase: attack legality, declaration, replay and damage.
//!
//! `calc` holds the pure damage arithmetic; `resolver` drives an attack
//! through the duel.

mod calc;
mod resolver;

pub use calc::{calculate, BattleOutcome, DefenderStance};
pub use resolver::{BattleReport, ReplayChoice};
