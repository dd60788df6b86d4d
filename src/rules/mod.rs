//! The rules engine.
//!
//! - `engine`: [`Duel`], setup, the turn loop, events and decisions
//! - `phases`: the Draw/Standby/Main/Battle/End sequence
//! - `main_phase`: summons, sets and activations
//! - `ops`: board primitives shared by rules and card effects
//!
//! The chain, response windows, triggers and battle live in their own
//! modules (`stack`, `triggers`, `battle`) as further `impl Duel` blocks.

mod engine;
mod main_phase;
mod ops;
mod phases;

pub use engine::{CancelToken, Duel};
