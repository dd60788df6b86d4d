//! Chain and priority.
//!
//! - [`Chain`] / [`ChainLink`]: the LIFO stack of activated effects
//! - [`ResponseWindow`]: alternating priority with a two-pass close
//!
//! ## Speed gating
//!
//! A new link's speed must be at least the top link's speed, and a
//! Counter on top only admits another Counter:
//!
//! | Top of chain | Slow | Quick | Counter |
//! |--------------|------|-------|---------|
//! | empty        | yes  | yes   | yes     |
//! | Slow         | no   | yes   | yes     |
//! | Quick        | no   | yes   | yes     |
//! | Counter      | no   | no    | yes     |
//!
//! Slow effects only ever start a chain; response windows offer speed 2
//! and up.
//!
//! ```
//! use netduel::core::PlayerId;
//! use netduel::stack::ResponseWindow;
//!
//! let mut window = ResponseWindow::new(PlayerId::SECOND);
//! assert!(!window.pass());
//! assert!(window.pass());
//! ```

mod chain;
mod priority;

pub use chain::{Chain, ChainLink, LinkResolution, Negation};
pub use priority::ResponseWindow;
