//! Zone system for card locations.
//!
//! Each side has a deck, hand, scrapheap, purged pile, five agent slots,
//! five tech slots and one OS slot. A card is in exactly one of them at any
//! time; `GameState::move_card` is the only way to change that.
//!
//! ## Key Types
//!
//! - `Zone`: which pile or slot
//! - `Location`: a zone on a specific player's side

pub mod manager;

pub use manager::{Location, Zone};
