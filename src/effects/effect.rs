//! Effect descriptors.
//!
//! An `Effect` is data: what kind of effect it is, how fast it is, what
//! (if anything) triggers it, and a set of optional hook functions. The
//! engine never asks "which card is this"; it reads the descriptor's
//! `Capabilities` and calls whichever hooks are present.
//!
//! ## Hooks
//!
//! | Hook                 | Called                                          |
//! |----------------------|-------------------------------------------------|
//! | `condition`          | before offering or queueing the effect          |
//! | `target`             | at activation, locks targets into the link      |
//! | `cost`               | at activation, after targets; `false` = refused |
//! | `resolve`            | when the chain link resolves                    |
//! | `continuous`         | on every continuous recalculation               |
//! | `leave_field`        | when the card leaves the field face-up          |
//! | `battle_damage`      | after this agent inflicts battle damage         |
//! | `battle_destroy`     | after this agent destroys an agent by battle    |
//! | `attack_restriction` | while face-up; `true` forbids an attacker       |
//!
//! ## Example
//!
//! ```
//! use netduel::effects::{Capabilities, Effect, ExecutionSpeed};
//! use netduel::rules::Duel;
//! use netduel::effects::EffectContext;
//! use netduel::DuelError;
//!
//! fn heal(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
//!     duel.heal(ctx.controller, 1000);
//!     Ok(())
//! }
//!
//! let effect = Effect::activation("gain 1000 hp", ExecutionSpeed::Slow).with_resolve(heal);
//! assert!(effect.capabilities().contains(Capabilities::RESOLVE));
//! assert!(!effect.capabilities().contains(Capabilities::COST));
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::context::EffectContext;
use crate::battle::BattleReport;
use crate::core::{GameState, InstanceId};
use crate::error::DuelError;
use crate::rules::Duel;
use crate::triggers::{EventKind, GameEvent};

/// Chain speed tier. Higher tiers may respond to lower ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExecutionSpeed {
    /// Programs, ignition effects, most triggers. Never a response.
    Slow = 1,
    /// Traps, quick-play programs, quick effects.
    Quick = 2,
    /// Counter traps. Only counters may respond to a counter.
    Counter = 3,
}

impl ExecutionSpeed {
    /// The top tier.
    pub const MAX: ExecutionSpeed = ExecutionSpeed::Counter;

    /// Whether an effect of this speed may be chained onto a link of
    /// speed `top` (`None` when the chain is empty).
    ///
    /// ```
    /// use netduel::effects::ExecutionSpeed::*;
    ///
    /// assert!(Quick.can_respond_to(Some(Slow)));
    /// assert!(Quick.can_respond_to(Some(Quick)));
    /// assert!(!Quick.can_respond_to(Some(Counter)));
    /// assert!(Counter.can_respond_to(Some(Counter)));
    /// assert!(Slow.can_respond_to(None));
    /// ```
    #[must_use]
    pub fn can_respond_to(self, top: Option<ExecutionSpeed>) -> bool {
        match top {
            None => true,
            Some(ExecutionSpeed::MAX) => self == ExecutionSpeed::MAX,
            Some(top) => self >= top,
        }
    }
}

/// How an effect is used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Activating a program or trap card.
    Activation,
    /// An agent effect started manually in a main phase.
    Ignition,
    /// An agent effect usable in response windows.
    Quick,
    /// Fires in response to a game event.
    Trigger,
    /// Fires when the card is flipped face-up.
    Flip,
    /// Always on while face-up; never starts a chain.
    Continuous,
}

/// Where a trigger effect's card must be to be found by a trigger scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerRange {
    #[default]
    Field,
    Scrapheap,
}

pub type ConditionFn = fn(&Duel, &EffectContext) -> bool;
pub type CostFn = fn(&mut Duel, &EffectContext) -> Result<bool, DuelError>;
pub type TargetFn = fn(&mut Duel, &mut EffectContext) -> Result<bool, DuelError>;
pub type ResolveFn = fn(&mut Duel, &EffectContext) -> Result<(), DuelError>;
pub type ContinuousFn = fn(&mut GameState, &EffectContext);
pub type LeaveFieldFn = fn(&mut Duel, &EffectContext) -> Result<(), DuelError>;
pub type TriggerFilterFn = fn(&Duel, &EffectContext, &GameEvent) -> bool;
pub type BattleHookFn = fn(&mut Duel, &EffectContext, &BattleReport) -> Result<(), DuelError>;
pub type AttackRestrictionFn = fn(&GameState, &EffectContext, InstanceId) -> bool;

/// What wakes a trigger effect up.
///
/// An event matches when its kind equals `event`, or when `filter`
/// accepts it.
#[derive(Clone, Copy)]
pub struct TriggerSpec {
    pub event: Option<EventKind>,
    pub filter: Option<TriggerFilterFn>,
    pub range: TriggerRange,
}

impl TriggerSpec {
    /// Match one event kind exactly.
    #[must_use]
    pub fn on(event: EventKind) -> Self {
        Self { event: Some(event), filter: None, range: TriggerRange::Field }
    }

    /// Match whatever the predicate accepts.
    #[must_use]
    pub fn when(filter: TriggerFilterFn) -> Self {
        Self { event: None, filter: Some(filter), range: TriggerRange::Field }
    }

    /// Scan the scrapheap instead of the field.
    #[must_use]
    pub fn from_scrapheap(mut self) -> Self {
        self.range = TriggerRange::Scrapheap;
        self
    }
}

impl std::fmt::Debug for TriggerSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerSpec")
            .field("event", &self.event)
            .field("filter", &self.filter.is_some())
            .field("range", &self.range)
            .finish()
    }
}

bitflags! {
    /// Which hooks an effect provides.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u16 {
        const CONDITION          = 1 << 0;
        const COST               = 1 << 1;
        const TARGET             = 1 << 2;
        const RESOLVE            = 1 << 3;
        const CONTINUOUS         = 1 << 4;
        const LEAVE_FIELD        = 1 << 5;
        const TRIGGER_FILTER     = 1 << 6;
        const BATTLE_DAMAGE      = 1 << 7;
        const BATTLE_DESTROY     = 1 << 8;
        const ATTACK_RESTRICTION = 1 << 9;
    }
}

/// The optional behavior of an effect.
#[derive(Clone, Copy, Default)]
pub struct EffectHooks {
    pub condition: Option<ConditionFn>,
    pub cost: Option<CostFn>,
    pub target: Option<TargetFn>,
    pub resolve: Option<ResolveFn>,
    pub continuous: Option<ContinuousFn>,
    pub leave_field: Option<LeaveFieldFn>,
    pub battle_damage: Option<BattleHookFn>,
    pub battle_destroy: Option<BattleHookFn>,
    pub attack_restriction: Option<AttackRestrictionFn>,
}

/// A single effect printed on a card.
#[derive(Clone, Debug)]
pub struct Effect {
    /// Short description for logs.
    pub label: &'static str,
    pub kind: EffectKind,
    pub speed: ExecutionSpeed,
    pub trigger: Option<TriggerSpec>,
    /// Triggers only: fires without asking.
    pub mandatory: bool,
    pub once_per_turn: bool,
    pub hooks: EffectHooks,
}

impl Effect {
    fn base(label: &'static str, kind: EffectKind, speed: ExecutionSpeed) -> Self {
        Self {
            label,
            kind,
            speed,
            trigger: None,
            mandatory: false,
            once_per_turn: false,
            hooks: EffectHooks::default(),
        }
    }

    /// Card activation of a program or trap.
    #[must_use]
    pub fn activation(label: &'static str, speed: ExecutionSpeed) -> Self {
        Self::base(label, EffectKind::Activation, speed)
    }

    /// Main-phase agent effect.
    #[must_use]
    pub fn ignition(label: &'static str) -> Self {
        Self::base(label, EffectKind::Ignition, ExecutionSpeed::Slow)
    }

    /// Agent effect usable in response windows.
    #[must_use]
    pub fn quick(label: &'static str) -> Self {
        Self::base(label, EffectKind::Quick, ExecutionSpeed::Quick)
    }

    /// Optional trigger effect.
    #[must_use]
    pub fn trigger(label: &'static str, spec: TriggerSpec) -> Self {
        Self {
            trigger: Some(spec),
            ..Self::base(label, EffectKind::Trigger, ExecutionSpeed::Slow)
        }
    }

    /// Flip effect. Always mandatory.
    #[must_use]
    pub fn flip(label: &'static str) -> Self {
        Self {
            mandatory: true,
            ..Self::base(label, EffectKind::Flip, ExecutionSpeed::Slow)
        }
    }

    /// Static effect.
    #[must_use]
    pub fn continuous(label: &'static str) -> Self {
        Self::base(label, EffectKind::Continuous, ExecutionSpeed::Slow)
    }

    #[must_use]
    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    #[must_use]
    pub fn once_per_turn(mut self) -> Self {
        self.once_per_turn = true;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: ExecutionSpeed) -> Self {
        self.speed = speed;
        self
    }

    /// Attach a trigger to a non-trigger effect (trap cards that activate
    /// in answer to an event).
    #[must_use]
    pub fn with_trigger(mut self, spec: TriggerSpec) -> Self {
        self.trigger = Some(spec);
        self
    }

    #[must_use]
    pub fn with_condition(mut self, f: ConditionFn) -> Self {
        self.hooks.condition = Some(f);
        self
    }

    #[must_use]
    pub fn with_cost(mut self, f: CostFn) -> Self {
        self.hooks.cost = Some(f);
        self
    }

    #[must_use]
    pub fn with_target(mut self, f: TargetFn) -> Self {
        self.hooks.target = Some(f);
        self
    }

    #[must_use]
    pub fn with_resolve(mut self, f: ResolveFn) -> Self {
        self.hooks.resolve = Some(f);
        self
    }

    #[must_use]
    pub fn with_continuous(mut self, f: ContinuousFn) -> Self {
        self.hooks.continuous = Some(f);
        self
    }

    #[must_use]
    pub fn with_leave_field(mut self, f: LeaveFieldFn) -> Self {
        self.hooks.leave_field = Some(f);
        self
    }

    #[must_use]
    pub fn with_battle_damage(mut self, f: BattleHookFn) -> Self {
        self.hooks.battle_damage = Some(f);
        self
    }

    #[must_use]
    pub fn with_battle_destroy(mut self, f: BattleHookFn) -> Self {
        self.hooks.battle_destroy = Some(f);
        self
    }

    #[must_use]
    pub fn with_attack_restriction(mut self, f: AttackRestrictionFn) -> Self {
        self.hooks.attack_restriction = Some(f);
        self
    }

    /// Which hooks are present.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        let h = &self.hooks;
        let mut caps = Capabilities::empty();
        caps.set(Capabilities::CONDITION, h.condition.is_some());
        caps.set(Capabilities::COST, h.cost.is_some());
        caps.set(Capabilities::TARGET, h.target.is_some());
        caps.set(Capabilities::RESOLVE, h.resolve.is_some());
        caps.set(Capabilities::CONTINUOUS, h.continuous.is_some());
        caps.set(Capabilities::LEAVE_FIELD, h.leave_field.is_some());
        caps.set(
            Capabilities::TRIGGER_FILTER,
            self.trigger.is_some_and(|t| t.filter.is_some()),
        );
        caps.set(Capabilities::BATTLE_DAMAGE, h.battle_damage.is_some());
        caps.set(Capabilities::BATTLE_DESTROY, h.battle_destroy.is_some());
        caps.set(Capabilities::ATTACK_RESTRICTION, h.attack_restriction.is_some());
        caps
    }

    /// Started by a player through `Action::Activate`.
    #[must_use]
    pub fn is_manual(&self) -> bool {
        self.trigger.is_none()
            && matches!(
                self.kind,
                EffectKind::Activation | EffectKind::Ignition | EffectKind::Quick
            )
    }
}

impl std::fmt::Debug for EffectHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let effect = Effect {
            hooks: *self,
            ..Effect::base("", EffectKind::Continuous, ExecutionSpeed::Slow)
        };
        write!(f, "EffectHooks({:?})", effect.capabilities())
    }
}
