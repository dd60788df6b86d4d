//! # netduel
//!
//! A deterministic rules engine for two-player duels between decks of
//! agents, programs and traps.
//!
//! ## Design Principles
//!
//! 1. **Cards are data**: a card is a descriptor with effect hooks. The
//!    engine reads capabilities and calls hooks; it never matches on card
//!    names.
//!
//! 2. **One decision surface**: every choice a player makes goes through
//!    a [`DecisionMaker`](agents::DecisionMaker), whether it is a test
//!    script, an AI, or a remote client behind a channel.
//!
//! 3. **Reproducible**: with the same catalog, decks, config (seed) and
//!    answers, a duel produces the same event log byte for byte.
//!
//! ## Modules
//!
//! - `core`: ids, players, state, actions, RNG, config, event log, views
//! - `zones`: field slots and piles
//! - `cards`: descriptors, instances, the catalog, the starter set
//! - `effects`: effect descriptors, targeting, continuous recalculation
//! - `triggers`: game events and trigger collection/ordering
//! - `stack`: the chain and response windows
//! - `battle`: attack declaration and damage
//! - `rules`: the [`Duel`] itself and the turn structure
//! - `agents`: decision sources
//!
//! ## Example
//!
//! ```
//! use netduel::agents::ScriptedDecider;
//! use netduel::cards::starter::starter_catalog;
//! use netduel::core::{DuelConfig, EndReason, PlayerId};
//! use netduel::Duel;
//!
//! let catalog = starter_catalog();
//! let big = vec!["Packet Runner"; 20];
//! let small = vec!["Packet Runner"; 6];
//! let mut duel = Duel::new(
//!     &catalog,
//!     [big.as_slice(), small.as_slice()],
//!     DuelConfig::default().without_shuffle(),
//!     Box::new(ScriptedDecider::passive()),
//!     Box::new(ScriptedDecider::passive()),
//! )
//! .unwrap();
//!
//! let outcome = duel.run().unwrap();
//! assert_eq!(outcome.winner, Some(PlayerId::FIRST));
//! assert_eq!(outcome.reason, EndReason::DeckOut);
//! assert_eq!(duel.state().turn, 4);
//! ```

pub mod agents;
pub mod battle;
pub mod cards;
pub mod core;
pub mod effects;
pub mod error;
pub mod rules;
pub mod stack;
pub mod triggers;
pub mod zones;

pub use crate::agents::{DecisionMaker, ScriptedDecider};
pub use crate::cards::{Card, CardCatalog};
pub use crate::core::{Action, DuelConfig, DuelEvent, DuelEventKind, DuelOutcome, EndReason, InstanceId, PlayerId, PlayerView};
pub use crate::error::{DecisionError, DuelError, SetupError};
pub use crate::rules::{CancelToken, Duel};
