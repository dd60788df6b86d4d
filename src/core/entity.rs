//! Card instance identification.
//!
//! Every physical card in a duel gets one `InstanceId` at setup. The id is
//! an index into the state's card arena and never changes while the card
//! moves between zones, so equip links and chain targets can hold plain ids
//! instead of references.
//!
//! ```
//! use netduel::core::InstanceId;
//!
//! let id = InstanceId::new(7);
//! assert_eq!(id.index(), 7);
//! assert_eq!(id.to_string(), "Instance(7)");
//! ```

use serde::{Deserialize, Serialize};

/// Arena index of a card instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Create an instance ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Position in the card arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for InstanceId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}
