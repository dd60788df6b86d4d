//! Visibility-scoped snapshots for decision makers.
//!
//! A `PlayerView` is what one player is allowed to know at a decision
//! point. Face-down cards and the opponent's hand show up with their
//! identity hidden; deck order is never exposed. Views are built with `im`
//! vectors so a decision maker can keep old snapshots around cheaply.
//!
//! ## Hidden information
//!
//! | Card                          | Owner sees | Opponent sees |
//! |-------------------------------|------------|---------------|
//! | In hand                       | yes        | no            |
//! | Face-down on field            | yes        | no            |
//! | Face-up, scrapheap, purged    | yes        | yes           |

use im::Vector;
use serde::{Deserialize, Serialize};

use super::entity::InstanceId;
use super::player::PlayerId;
use super::state::{GameState, Phase};
use crate::cards::{CardKind, Position};
use crate::effects::ExecutionSpeed;

/// A card as seen by the viewer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub id: InstanceId,
    /// `None` when hidden from the viewer.
    pub name: Option<String>,
    pub kind: Option<CardKind>,
    pub face_up: bool,
    pub position: Position,
    /// Effective stats, only for visible agents.
    pub atk: Option<i32>,
    pub def: Option<i32>,
    pub controller: PlayerId,
}

/// One side of the board as seen by the viewer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideView {
    pub player: PlayerId,
    pub hp: i32,
    pub deck_count: usize,
    pub hand: Vector<CardView>,
    pub agents: Vector<Option<CardView>>,
    pub techs: Vector<Option<CardView>>,
    pub os: Option<CardView>,
    pub scrapheap: Vector<CardView>,
    pub purged: Vector<CardView>,
}

/// A link on the chain as seen by the viewer. Chain links are public.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkView {
    pub card: InstanceId,
    pub name: String,
    pub controller: PlayerId,
    pub speed: ExecutionSpeed,
    pub targets: Vector<InstanceId>,
    pub negated: bool,
}

/// Everything one player may know at a decision point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub viewer: PlayerId,
    pub turn: u32,
    pub turn_player: PlayerId,
    pub phase: Phase,
    pub me: SideView,
    pub opponent: SideView,
    pub chain: Vector<LinkView>,
    /// Current attack: (attacker, target).
    pub attack: Option<(InstanceId, Option<InstanceId>)>,
}

impl PlayerView {
    /// Build the snapshot `viewer` is entitled to.
    #[must_use]
    pub fn build(state: &GameState, viewer: PlayerId) -> Self {
        let chain = state
            .chain
            .iter()
            .flat_map(|chain| chain.links())
            .map(|link| LinkView {
                card: link.card,
                name: state.card(link.card).name().to_string(),
                controller: link.controller,
                speed: link.speed,
                targets: link.targets.iter().copied().collect(),
                negated: link.is_negated(),
            })
            .collect();

        Self {
            viewer,
            turn: state.turn,
            turn_player: state.turn_player,
            phase: state.phase,
            me: side_view(state, viewer, viewer),
            opponent: side_view(state, viewer, viewer.opponent()),
            chain,
            attack: state.attack.map(|a| (a.attacker, a.target)),
        }
    }

    /// Find a visible card anywhere in the view.
    #[must_use]
    pub fn find(&self, id: InstanceId) -> Option<&CardView> {
        [&self.me, &self.opponent].into_iter().find_map(|side| {
            side.hand
                .iter()
                .chain(side.agents.iter().flatten())
                .chain(side.techs.iter().flatten())
                .chain(side.os.iter())
                .chain(side.scrapheap.iter())
                .chain(side.purged.iter())
                .find(|c| c.id == id)
        })
    }
}

fn side_view(state: &GameState, viewer: PlayerId, side: PlayerId) -> SideView {
    let player = state.player(side);
    let card = |id: InstanceId| card_view(state, viewer, id);
    SideView {
        player: side,
        hp: player.hp,
        deck_count: player.deck.len(),
        hand: player.hand.iter().map(|&id| card(id)).collect(),
        agents: player.agents.iter().map(|slot| slot.map(card)).collect(),
        techs: player.techs.iter().map(|slot| slot.map(card)).collect(),
        os: player.os.map(card),
        scrapheap: player.scrapheap.iter().map(|&id| card(id)).collect(),
        purged: player.purged.iter().map(|&id| card(id)).collect(),
    }
}

fn card_view(state: &GameState, viewer: PlayerId, id: InstanceId) -> CardView {
    let instance = state.card(id);
    let public = instance.face_up || (!instance.is_on_field() && !in_hand(state, id));
    let visible = public || instance.controller == viewer;
    let agent_stats = visible && instance.kind().is_agent() && instance.is_on_field();
    CardView {
        id,
        name: visible.then(|| instance.name().to_string()),
        kind: visible.then(|| instance.kind()),
        face_up: instance.face_up,
        position: instance.position,
        atk: agent_stats.then(|| instance.atk()),
        def: agent_stats.then(|| instance.def()),
        controller: instance.controller,
    }
}

fn in_hand(state: &GameState, id: InstanceId) -> bool {
    matches!(state.card(id).location.zone, crate::zones::Zone::Hand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Element};
    use crate::zones::{Location, Zone};
    use std::sync::Arc;

    fn state() -> (GameState, InstanceId, InstanceId) {
        let card = Arc::new(Card::agent("Packet Runner", 4, Element::Wind, 1400, 1200));
        let mut state = GameState::new(8000);
        let mine = state.add_card(card.clone(), PlayerId::FIRST);
        let theirs = state.add_card(card, PlayerId::SECOND);
        (state, mine, theirs)
    }

    #[test]
    fn test_opponent_hand_hidden() {
        let (mut state, mine, theirs) = state();
        state.move_card(mine, Location::new(PlayerId::FIRST, Zone::Hand)).unwrap();
        state.move_card(theirs, Location::new(PlayerId::SECOND, Zone::Hand)).unwrap();

        let view = PlayerView::build(&state, PlayerId::FIRST);
        assert_eq!(view.me.hand[0].name.as_deref(), Some("Packet Runner"));
        assert_eq!(view.opponent.hand[0].name, None);
        assert_eq!(view.opponent.hand.len(), 1);
    }

    #[test]
    fn test_face_down_visible_only_to_controller() {
        let (mut state, _, theirs) = state();
        state.move_card(theirs, Location::new(PlayerId::SECOND, Zone::Agent(0))).unwrap();
        state.card_mut(theirs).position = Position::Defense;

        let mine = PlayerView::build(&state, PlayerId::FIRST);
        let hidden = mine.opponent.agents[0].as_ref().unwrap();
        assert_eq!(hidden.name, None);
        assert_eq!(hidden.atk, None);

        let owner = PlayerView::build(&state, PlayerId::SECOND);
        let seen = owner.me.agents[0].as_ref().unwrap();
        assert_eq!(seen.name.as_deref(), Some("Packet Runner"));
        assert_eq!(seen.def, Some(1200));
    }

    #[test]
    fn test_scrapheap_public() {
        let (mut state, _, theirs) = state();
        state.move_card(theirs, Location::new(PlayerId::SECOND, Zone::Scrapheap)).unwrap();
        let view = PlayerView::build(&state, PlayerId::FIRST);
        assert_eq!(view.opponent.scrapheap[0].name.as_deref(), Some("Packet Runner"));
        assert!(view.find(theirs).is_some());
    }

    #[test]
    fn test_view_serializes() {
        let (state, _, _) = state();
        let view = PlayerView::build(&state, PlayerId::SECOND);
        let json = serde_json::to_string(&view).unwrap();
        let back: PlayerView = serde_json::from_str(&json).unwrap();
        assert_eq!(view, back);
    }
}
