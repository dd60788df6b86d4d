//! Card system: descriptors, instances, and the catalog.
//!
//! ## Key Types
//!
//! - `Card`: immutable descriptor (kind, printed stats, effects)
//! - `CardInstance`: runtime card state (location, position, modifiers)
//! - `StatModifier`: an ATK/DEF delta with a lifetime
//! - `CardCatalog`: descriptor lookup, built once per process
//!
//! `starter` holds a small playable card set.

pub mod attributes;
pub mod definition;
pub mod instance;
pub mod registry;
pub mod starter;

pub use attributes::{AgentTraits, CardKind, Element, Position, ProgramKind, TrapKind};
pub use definition::{Card, CardId};
pub use instance::{CardInstance, ModifierLifetime, StatModifier};
pub use registry::CardCatalog;
