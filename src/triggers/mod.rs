//! Trigger system.
//!
//! Effects with a `TriggerSpec` answer game events. The engine never keeps
//! a registry of live triggers; it scans the board whenever queued events
//! are flushed, so a card that left the field simply stops being found.
//!
//! ## Key Components
//!
//! - [`EventKind`] / [`GameEvent`]: what happened
//! - [`event_matches`] / [`trigger_fires`]: does an effect answer it
//! - [`PendingTrigger`]: queued outside a scan (flip, destruction)
//! - [`TriggerCandidate`] / [`order_candidates`]: chain order
//!
//! ## Deferred events
//!
//! While a chain exists, events are only recorded. Once the chain has
//! fully resolved they are replayed together, so everything that happened
//! during one chain answers as one batch.
//!
//! ```
//! use netduel::core::{InstanceId, PlayerId};
//! use netduel::triggers::{order_candidates, GameEvent, TriggerCandidate};
//!
//! let make = |source, controller, mandatory| TriggerCandidate {
//!     source: InstanceId(source),
//!     effect: 0,
//!     controller,
//!     mandatory,
//!     event: GameEvent::flipped(InstanceId(source), controller),
//! };
//! let mut list = vec![
//!     make(1, PlayerId::SECOND, false),
//!     make(2, PlayerId::FIRST, true),
//! ];
//! order_candidates(&mut list, PlayerId::FIRST);
//! assert_eq!(list[0].source, InstanceId(2));
//! ```

mod condition;
mod event;
mod registry;

pub use condition::{effect_usable, event_matches, trigger_fires};
pub use event::{EventKind, GameEvent};
pub use registry::{order_candidates, PendingTrigger, TriggerCandidate};
