//! Per-activation context passed to effect hooks.

use smallvec::SmallVec;

use crate::core::{InstanceId, PlayerId};
use crate::triggers::GameEvent;

/// Who is using which effect, on what.
///
/// Built when an effect is activated or queued as a trigger. Targets chosen
/// by the target hook are stored here and copied into the chain link, so
/// the resolve hook sees the same targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectContext {
    pub source: InstanceId,
    /// Index into the source card's effect list.
    pub effect: usize,
    pub controller: PlayerId,
    pub targets: SmallVec<[InstanceId; 2]>,
    /// Chain position (0-based) of the link this effect occupies.
    pub link: Option<usize>,
    /// The event that woke a trigger effect.
    pub event: Option<GameEvent>,
}

impl EffectContext {
    #[must_use]
    pub fn new(source: InstanceId, effect: usize, controller: PlayerId) -> Self {
        Self {
            source,
            effect,
            controller,
            targets: SmallVec::new(),
            link: None,
            event: None,
        }
    }

    #[must_use]
    pub fn with_event(mut self, event: GameEvent) -> Self {
        self.event = Some(event);
        self
    }

    /// First locked target.
    #[must_use]
    pub fn target(&self) -> Option<InstanceId> {
        self.targets.first().copied()
    }

    /// The opponent of the effect's controller.
    #[must_use]
    pub fn opponent(&self) -> PlayerId {
        self.controller.opponent()
    }
}
