//! Duel state.
//!
//! `GameState` is the single mutable record of a duel: the card arena,
//! both sides of the board, turn/phase bookkeeping, the active chain, the
//! trigger queue, and the terminal outcome. Everything the rules engine
//! does is a transformation of this struct; decision makers only ever see
//! a `PlayerView` derived from it.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::action::{Action, ActionRecord};
use super::entity::InstanceId;
use super::player::{Player, PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::{Card, CardInstance};
use crate::effects::ExecutionSpeed;
use crate::stack::Chain;
use crate::triggers::{GameEvent, PendingTrigger};
use crate::zones::{Location, Zone};

/// Turn phases in order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Draw,
    Standby,
    Main1,
    Battle,
    Main2,
    End,
}

impl Phase {
    #[must_use]
    pub fn is_main(self) -> bool {
        matches!(self, Phase::Main1 | Phase::Main2)
    }
}

/// Sub-step of the Battle Phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleStep {
    Start,
    Declare,
    Damage,
    End,
}

/// The attack currently being resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackState {
    pub attacker: InstanceId,
    /// `None` for a direct attack.
    pub target: Option<InstanceId>,
    /// Set by effects that stop the attack outright.
    pub negated: bool,
}

/// How an agent arrived face-up on the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SummonMethod {
    Normal,
    Tribute,
    Flip,
    Special,
}

/// The most recent summon, for trigger matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummonRecord {
    pub card: InstanceId,
    pub player: PlayerId,
    pub method: SummonMethod,
    pub turn: u32,
}

/// Why the duel ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// The loser's hit points reached zero.
    HpDepleted,
    /// The loser had to draw from an empty deck.
    DeckOut,
    /// The turn cap was reached; no winner.
    TurnLimit,
    /// Stopped from outside; no winner.
    Cancelled,
}

/// Terminal result of a duel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelOutcome {
    pub winner: Option<PlayerId>,
    pub reason: EndReason,
}

/// Complete duel state.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Card arena, indexed by `InstanceId`.
    pub cards: Vec<CardInstance>,

    pub players: PlayerMap<Player>,

    /// Turn number (starts at 1).
    pub turn: u32,

    pub turn_player: PlayerId,

    pub phase: Phase,

    pub battle_step: Option<BattleStep>,

    pub attack: Option<AttackState>,

    /// Chain being built or resolved.
    pub chain: Option<Chain>,

    /// Triggers queued for the next trigger scan.
    pub pending_triggers: Vec<PendingTrigger>,

    /// Events raised while a chain existed, replayed once it resolves.
    pub deferred_events: Vec<GameEvent>,

    pub last_summon: Option<SummonRecord>,

    pub in_response_window: bool,

    pub outcome: Option<DuelOutcome>,

    pub history: Vec<ActionRecord>,

    pub rng: GameRng,
}

impl GameState {
    /// Empty two-player state with shuffling disabled.
    #[must_use]
    pub fn new(starting_hp: i32) -> Self {
        Self {
            cards: Vec::new(),
            players: PlayerMap::new(|p| Player::new(p, starting_hp)),
            turn: 1,
            turn_player: PlayerId::FIRST,
            phase: Phase::Draw,
            battle_step: None,
            attack: None,
            chain: None,
            pending_triggers: Vec::new(),
            deferred_events: Vec::new(),
            last_summon: None,
            in_response_window: false,
            outcome: None,
            history: Vec::new(),
            rng: GameRng::disabled(),
        }
    }

    /// Create an instance on top of `owner`'s deck.
    pub fn add_card(&mut self, card: Arc<Card>, owner: PlayerId) -> InstanceId {
        let id = InstanceId::new(self.cards.len() as u32);
        self.cards.push(CardInstance::new(id, card, owner));
        self.players[owner].deck.push(id);
        id
    }

    /// Look up an instance.
    ///
    /// Ids are only minted by `add_card`, so every id handed out by this
    /// state indexes a live instance.
    #[must_use]
    pub fn card(&self, id: InstanceId) -> &CardInstance {
        &self.cards[id.index()]
    }

    pub fn card_mut(&mut self, id: InstanceId) -> &mut CardInstance {
        &mut self.cards[id.index()]
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    /// Agents on a side, slot order.
    #[must_use]
    pub fn agents_of(&self, player: PlayerId) -> Vec<InstanceId> {
        self.players[player].field_agents().collect()
    }

    /// Agents on both sides, turn player's first.
    #[must_use]
    pub fn all_agents(&self) -> Vec<InstanceId> {
        let tp = self.turn_player;
        let mut out = self.agents_of(tp);
        out.extend(self.agents_of(tp.opponent()));
        out
    }

    /// Tech and OS cards on a side, tech slots first.
    #[must_use]
    pub fn techs_of(&self, player: PlayerId) -> Vec<InstanceId> {
        let side = &self.players[player];
        side.field_techs().chain(side.os).collect()
    }

    /// Every card on the field in recalculation order: OS slots, then tech
    /// slots, then agent slots, each first-player side first.
    #[must_use]
    pub fn field_in_order(&self) -> Vec<InstanceId> {
        let mut out = Vec::new();
        for (_, side) in self.players.iter() {
            out.extend(side.os);
        }
        for (_, side) in self.players.iter() {
            out.extend(side.field_techs());
        }
        for (_, side) in self.players.iter() {
            out.extend(side.field_agents());
        }
        out
    }

    /// Whether `card` is at `location` right now.
    #[must_use]
    pub fn is_at(&self, card: InstanceId, location: Location) -> bool {
        self.card(card).location == location
    }

    /// Face-up card on the field.
    #[must_use]
    pub fn is_face_up_on_field(&self, card: InstanceId) -> bool {
        let instance = self.card(card);
        instance.face_up && instance.is_on_field()
    }

    /// Speed of the chain's most recent link.
    #[must_use]
    pub fn chain_top_speed(&self) -> Option<ExecutionSpeed> {
        self.chain.as_ref().and_then(|c| c.top()).map(|link| link.speed)
    }

    #[must_use]
    pub fn chain_len(&self) -> usize {
        self.chain.as_ref().map_or(0, Chain::len)
    }

    /// Where a card belongs when it is sent off the field or discarded.
    #[must_use]
    pub fn scrapheap_of(&self, card: InstanceId) -> Location {
        Location::new(self.card(card).owner, Zone::Scrapheap)
    }

    /// Reset per-turn flags on both players and every instance.
    pub fn reset_turn_flags(&mut self) {
        for (_, side) in self.players.iter_mut() {
            side.normal_summon_used = false;
        }
        for card in &mut self.cards {
            card.reset_turn_flags();
        }
    }

    pub fn record_action(&mut self, player: PlayerId, action: Action) {
        let sequence = self.history.len() as u32;
        self.history
            .push(ActionRecord::new(player, action, self.turn, sequence));
    }

    /// Set the terminal outcome unless one is already recorded.
    pub fn finish(&mut self, outcome: DuelOutcome) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.outcome = Some(outcome);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Element;

    fn state() -> GameState {
        let card = Arc::new(Card::agent("Packet Runner", 4, Element::Wind, 1400, 1200));
        let mut state = GameState::new(8000);
        for _ in 0..3 {
            state.add_card(card.clone(), PlayerId::FIRST);
            state.add_card(card.clone(), PlayerId::SECOND);
        }
        state
    }

    #[test]
    fn test_add_card_places_in_deck() {
        let state = state();
        assert_eq!(state.cards.len(), 6);
        assert_eq!(state.players[PlayerId::FIRST].deck.len(), 3);
        assert_eq!(state.card(InstanceId(1)).owner, PlayerId::SECOND);
        state.check_zone_integrity().unwrap();
    }

    #[test]
    fn test_field_order() {
        let mut state = state();
        let a = InstanceId(0);
        let b = InstanceId(1);
        state.move_card(a, Location::new(PlayerId::FIRST, Zone::Agent(2))).unwrap();
        state.move_card(b, Location::new(PlayerId::SECOND, Zone::Agent(0))).unwrap();
        assert_eq!(state.field_in_order(), vec![a, b]);
        assert_eq!(state.all_agents(), vec![a, b]);

        state.turn_player = PlayerId::SECOND;
        assert_eq!(state.all_agents(), vec![b, a]);
    }

    #[test]
    fn test_finish_keeps_first_outcome() {
        let mut state = state();
        assert!(state.finish(DuelOutcome { winner: Some(PlayerId::FIRST), reason: EndReason::HpDepleted }));
        assert!(!state.finish(DuelOutcome { winner: None, reason: EndReason::Cancelled }));
        assert_eq!(state.outcome.unwrap().winner, Some(PlayerId::FIRST));
    }

    #[test]
    fn test_reset_turn_flags() {
        let mut state = state();
        state.players[PlayerId::FIRST].normal_summon_used = true;
        state.card_mut(InstanceId(0)).has_attacked = true;
        state.reset_turn_flags();
        assert!(!state.players[PlayerId::FIRST].normal_summon_used);
        assert!(!state.card(InstanceId(0)).has_attacked);
    }
}
