//! Shared setup for integration tests.
//!
//! Duels are built from the starter catalog with shuffling off and an
//! empty opening hand, then arranged directly through `state_mut`.

#![allow(dead_code)]

use netduel::agents::ScriptedDecider;
use netduel::cards::starter::starter_catalog;
use netduel::cards::Position;
use netduel::core::{DuelConfig, DuelEventKind, InstanceId, Phase, PlayerId};
use netduel::effects::recalculate;
use netduel::zones::{Location, Zone};
use netduel::Duel;

pub const P1: PlayerId = PlayerId::FIRST;
pub const P2: PlayerId = PlayerId::SECOND;

/// Cards at the bottom of every test deck so draws never run dry.
const FILLER: &str = "Restore Point";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn config() -> DuelConfig {
    DuelConfig::default().without_shuffle().with_opening_hand(0)
}

fn with_filler(cards: &[&'static str]) -> Vec<&'static str> {
    let mut deck = cards.to_vec();
    deck.extend(std::iter::repeat(FILLER).take(10));
    deck
}

/// A duel on turn 1, before anything has happened.
pub fn fresh_duel(
    p1: &[&'static str],
    p2: &[&'static str],
    config: DuelConfig,
    first: ScriptedDecider,
    second: ScriptedDecider,
) -> Duel {
    init_tracing();
    let catalog = starter_catalog();
    let (a, b) = (with_filler(p1), with_filler(p2));
    Duel::new(&catalog, [a.as_slice(), b.as_slice()], config, Box::new(first), Box::new(second))
        .expect("starter decks are valid")
}

/// A duel in the first player's Main Phase 1 of turn 3.
pub fn main_phase_duel(
    p1: &[&'static str],
    p2: &[&'static str],
    first: ScriptedDecider,
    second: ScriptedDecider,
) -> Duel {
    let mut duel = fresh_duel(p1, p2, config(), first, second);
    let state = duel.state_mut();
    state.turn = 3;
    state.turn_player = P1;
    state.phase = Phase::Main1;
    duel
}

/// The first copy of `name` still in `player`'s deck.
pub fn from_deck(duel: &Duel, player: PlayerId, name: &str) -> InstanceId {
    duel.state()
        .cards
        .iter()
        .find(|c| c.owner == player && c.name() == name && c.location.zone == Zone::Deck)
        .map(|c| c.id)
        .unwrap_or_else(|| panic!("{name} not in {player} deck"))
}

pub fn to_hand(duel: &mut Duel, player: PlayerId, name: &str) -> InstanceId {
    let id = from_deck(duel, player, name);
    duel.state_mut().move_card(id, Location::new(player, Zone::Hand)).unwrap();
    id
}

/// Put an agent on the field as if it arrived on turn 1.
pub fn put_agent(duel: &mut Duel, player: PlayerId, name: &str, face_up: bool, position: Position) -> InstanceId {
    let id = from_deck(duel, player, name);
    let state = duel.state_mut();
    let slot = state.players[player].free_agent_slot().expect("free agent slot");
    state.move_card(id, Location::new(player, Zone::Agent(slot))).unwrap();
    let card = state.card_mut(id);
    card.face_up = face_up;
    card.position = position;
    card.controller = player;
    card.placed_turn = Some(1);
    recalculate(state);
    id
}

pub fn attacker(duel: &mut Duel, player: PlayerId, name: &str) -> InstanceId {
    put_agent(duel, player, name, true, Position::Attack)
}

/// Set a program or trap face-down as if on turn 1.
pub fn set_tech(duel: &mut Duel, player: PlayerId, name: &str) -> InstanceId {
    let id = from_deck(duel, player, name);
    let state = duel.state_mut();
    let slot = state.players[player].free_tech_slot().expect("free tech slot");
    state.move_card(id, Location::new(player, Zone::Tech(slot))).unwrap();
    let card = state.card_mut(id);
    card.face_up = false;
    card.placed_turn = Some(1);
    id
}

pub fn send_to_scrapheap(duel: &mut Duel, player: PlayerId, name: &str) -> InstanceId {
    let id = from_deck(duel, player, name);
    duel.state_mut().move_card(id, Location::new(player, Zone::Scrapheap)).unwrap();
    id
}

pub fn hp(duel: &Duel, player: PlayerId) -> i32 {
    duel.state().players[player].hp
}

pub fn zone(duel: &Duel, card: InstanceId) -> Zone {
    duel.state().card(card).location.zone
}

pub fn count(duel: &Duel, kind: DuelEventKind) -> usize {
    duel.log().of_kind(kind).count()
}

/// `(player, card name)` of each event of `kind`, in log order.
pub fn events(duel: &Duel, kind: DuelEventKind) -> Vec<(Option<PlayerId>, Option<String>)> {
    duel.log().of_kind(kind).map(|e| (e.player, e.card.clone())).collect()
}

/// Build a Main Phase duel whose scripts need the ids `setup` creates.
///
/// Instance ids depend only on the deck lists, so `setup` is run on a
/// probe duel first, the scripts are written against its ids, and then
/// the same setup is replayed on the real duel.
pub fn scripted<T: PartialEq + std::fmt::Debug>(
    p1: &[&'static str],
    p2: &[&'static str],
    setup: impl Fn(&mut Duel) -> T,
    scripts: impl FnOnce(&T) -> (ScriptedDecider, ScriptedDecider),
) -> (Duel, T) {
    let mut probe = main_phase_duel(p1, p2, ScriptedDecider::passive(), ScriptedDecider::passive());
    let ids = setup(&mut probe);
    let (first, second) = scripts(&ids);
    let mut duel = main_phase_duel(p1, p2, first, second);
    let replayed = setup(&mut duel);
    assert_eq!(replayed, ids);
    (duel, ids)
}
