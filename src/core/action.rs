//! Player actions.
//!
//! Every `choose_action` prompt offers a list of `Action`s and the decision
//! maker answers with one of them. The same enum covers open-game-state
//! moves (summons, sets, activations, phase changes), attack declarations,
//! and priority answers in a response window (`Pass` or `Activate`).

use serde::{Deserialize, Serialize};

use super::entity::InstanceId;
use super::player::PlayerId;

/// A single choice offered to a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Decline: pass priority, or cancel an attack replay.
    Pass,
    /// Normal summon an agent from hand in attack position.
    NormalSummon { card: InstanceId },
    /// Set an agent from hand face-down in defense position.
    SetAgent { card: InstanceId },
    /// Flip a face-down agent face-up in attack position.
    FlipSummon { card: InstanceId },
    /// Switch a face-up agent between attack and defense.
    ChangePosition { card: InstanceId },
    /// Set a program or trap from hand face-down in a tech slot.
    SetTech { card: InstanceId },
    /// Activate effect `effect` of `card`.
    Activate { card: InstanceId, effect: usize },
    /// Leave Main Phase 1 for the Battle Phase.
    EnterBattle,
    /// Declare an attack. `target: None` is a direct attack.
    Attack {
        attacker: InstanceId,
        target: Option<InstanceId>,
    },
    /// Leave the current phase.
    EndPhase,
}

impl Action {
    /// The card this action is about, if any.
    #[must_use]
    pub fn card(&self) -> Option<InstanceId> {
        match *self {
            Action::NormalSummon { card }
            | Action::SetAgent { card }
            | Action::FlipSummon { card }
            | Action::ChangePosition { card }
            | Action::SetTech { card }
            | Action::Activate { card, .. } => Some(card),
            Action::Attack { attacker, .. } => Some(attacker),
            Action::Pass | Action::EnterBattle | Action::EndPhase => None,
        }
    }
}

/// A performed action with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Turn number when action was taken.
    pub turn: u32,

    /// Sequence number within the duel.
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            turn,
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_card() {
        assert_eq!(Action::Pass.card(), None);
        assert_eq!(
            Action::Activate { card: InstanceId(3), effect: 0 }.card(),
            Some(InstanceId(3))
        );
        assert_eq!(
            Action::Attack { attacker: InstanceId(1), target: None }.card(),
            Some(InstanceId(1))
        );
    }

    #[test]
    fn test_action_equality() {
        let a = Action::Attack { attacker: InstanceId(1), target: Some(InstanceId(2)) };
        let b = Action::Attack { attacker: InstanceId(1), target: Some(InstanceId(2)) };
        let c = Action::Attack { attacker: InstanceId(1), target: None };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_action_record_serialization() {
        let record = ActionRecord::new(
            PlayerId::FIRST,
            Action::NormalSummon { card: InstanceId(5) },
            3,
            12,
        );
        let json = serde_json::to_string(&record).unwrap();
        let back: ActionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
