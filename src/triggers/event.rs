//! Game events that wake trigger effects.
//!
//! These are rules-level events, distinct from the `DuelEvent` log stream:
//! a `GameEvent` is matched against `TriggerSpec`s, while a `DuelEvent` is
//! what observers are told happened.

use serde::{Deserialize, Serialize};

use crate::core::{InstanceId, Phase, PlayerId, SummonMethod};

/// Event category, matched exactly by `TriggerSpec::on`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// An agent was summoned (normal, tribute, flip or special).
    Summoned,
    /// A face-down card was turned face-up.
    Flipped,
    /// A phase began.
    PhaseStart(Phase),
    AttackDeclared,
    /// A card was destroyed by an effect.
    Destroyed,
    /// An agent was destroyed by battle.
    BattleDestroyed,
    /// A player took battle damage.
    BattleDamage,
}

/// A rules-level event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub kind: EventKind,
    /// The player the event happened to or for.
    pub player: Option<PlayerId>,
    /// The card the event is about.
    pub card: Option<InstanceId>,
    /// The card that caused it (attacker, destroying effect).
    pub cause: Option<InstanceId>,
    pub summon: Option<SummonMethod>,
    pub amount: i32,
}

impl GameEvent {
    fn base(kind: EventKind) -> Self {
        Self {
            kind,
            player: None,
            card: None,
            cause: None,
            summon: None,
            amount: 0,
        }
    }

    /// `card` was summoned by `player`.
    #[must_use]
    pub fn summoned(card: InstanceId, player: PlayerId, method: SummonMethod) -> Self {
        Self {
            player: Some(player),
            card: Some(card),
            summon: Some(method),
            ..Self::base(EventKind::Summoned)
        }
    }

    #[must_use]
    pub fn flipped(card: InstanceId, controller: PlayerId) -> Self {
        Self {
            player: Some(controller),
            card: Some(card),
            ..Self::base(EventKind::Flipped)
        }
    }

    /// `phase` began on `turn_player`'s turn.
    #[must_use]
    pub fn phase_start(phase: Phase, turn_player: PlayerId) -> Self {
        Self {
            player: Some(turn_player),
            ..Self::base(EventKind::PhaseStart(phase))
        }
    }

    /// `attacker`, controlled by `player`, declared an attack on `target`
    /// (`None` for direct).
    #[must_use]
    pub fn attack_declared(attacker: InstanceId, player: PlayerId, target: Option<InstanceId>) -> Self {
        Self {
            player: Some(player),
            card: target,
            cause: Some(attacker),
            ..Self::base(EventKind::AttackDeclared)
        }
    }

    /// `card`, controlled by `controller`, was destroyed.
    #[must_use]
    pub fn destroyed(card: InstanceId, controller: PlayerId, cause: Option<InstanceId>, by_battle: bool) -> Self {
        let kind = if by_battle {
            EventKind::BattleDestroyed
        } else {
            EventKind::Destroyed
        };
        Self {
            player: Some(controller),
            card: Some(card),
            cause,
            ..Self::base(kind)
        }
    }

    /// `player` took `amount` battle damage from `attacker`.
    #[must_use]
    pub fn battle_damage(player: PlayerId, amount: i32, attacker: InstanceId) -> Self {
        Self {
            player: Some(player),
            cause: Some(attacker),
            amount,
            ..Self::base(EventKind::BattleDamage)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroyed_kind_follows_reason() {
        let card = InstanceId(3);
        assert_eq!(
            GameEvent::destroyed(card, PlayerId::FIRST, None, false).kind,
            EventKind::Destroyed
        );
        assert_eq!(
            GameEvent::destroyed(card, PlayerId::FIRST, None, true).kind,
            EventKind::BattleDestroyed
        );
    }

    #[test]
    fn test_phase_start_distinguishes_phases() {
        let standby = GameEvent::phase_start(Phase::Standby, PlayerId::SECOND);
        assert_eq!(standby.kind, EventKind::PhaseStart(Phase::Standby));
        assert_ne!(standby.kind, EventKind::PhaseStart(Phase::End));
        assert_eq!(standby.player, Some(PlayerId::SECOND));
    }

    #[test]
    fn test_event_serialization() {
        let event = GameEvent::summoned(InstanceId(7), PlayerId::FIRST, SummonMethod::Tribute);
        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
