//! Core duel types: ids, players, state, actions, RNG, configuration,
//! the event log, and player views.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;
pub mod log;
pub mod view;

pub use entity::InstanceId;
pub use player::{Player, PlayerId, PlayerMap, FIELD_SLOTS};
pub use rng::GameRng;
pub use config::DuelConfig;
pub use action::{Action, ActionRecord};
pub use state::{
    AttackState, BattleStep, DuelOutcome, EndReason, GameState, Phase, SummonMethod,
    SummonRecord,
};
pub use log::{DuelEvent, DuelEventKind, EventLog};
pub use view::{CardView, LinkView, PlayerView, SideView};
