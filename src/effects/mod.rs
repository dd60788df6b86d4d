//! Effect system.
//!
//! - `Effect`: descriptor (kind, speed, trigger, hooks, capabilities)
//! - `EffectContext`: who activated what, with which targets
//! - `TargetSpec` / `TargetSelector`: target candidate lists
//! - `continuous`: the continuous-effect recalculator
//!
//! ## Design
//!
//! Cards are data. Behavior lives in plain functions referenced by the
//! descriptor, and the engine dispatches on which hooks are present, never
//! on card identity.

mod effect;
mod context;
mod targeting;
pub mod continuous;

pub use effect::{
    AttackRestrictionFn, BattleHookFn, Capabilities, ConditionFn, ContinuousFn, CostFn, Effect,
    EffectHooks, EffectKind, ExecutionSpeed, LeaveFieldFn, ResolveFn, TargetFn, TriggerFilterFn,
    TriggerRange, TriggerSpec,
};
pub use context::EffectContext;
pub use targeting::{Side, TargetFilter, TargetSelector, TargetSpec};
pub use continuous::{attack_restricted, recalculate};
