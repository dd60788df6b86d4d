//! Whole-duel integration tests: turn loop, endings, determinism and
//! remote decision sources.

mod common;

use common::*;
use netduel::agents::{ChannelDecider, DecisionMaker, DecisionRequest, Reply, ScriptedDecider};
use netduel::cards::starter::{starter_catalog, starter_deck};
use netduel::core::{Action, DuelConfig, DuelEventKind, EndReason, EventLog, PlayerView};
use netduel::{CancelToken, DecisionError, Duel, DuelError, InstanceId, SetupError};
use proptest::prelude::*;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn starter_duel(config: DuelConfig, first: ScriptedDecider, second: ScriptedDecider) -> Duel {
    init_tracing();
    let catalog = starter_catalog();
    let deck = starter_deck();
    Duel::new(&catalog, [deck.as_slice(), deck.as_slice()], config, Box::new(first), Box::new(second))
        .unwrap()
}

// =============================================================================
// Setup
// =============================================================================

#[test]
fn test_unknown_card_rejected() {
    let catalog = starter_catalog();
    let result = Duel::new(
        &catalog,
        [["Packet Runner", "Blue Screen"].as_slice(), ["Packet Runner"].as_slice()],
        DuelConfig::default().with_opening_hand(0),
        Box::new(ScriptedDecider::passive()),
        Box::new(ScriptedDecider::passive()),
    );
    assert_eq!(result.err(), Some(SetupError::UnknownCard("Blue Screen".to_string())));
}

#[test]
fn test_deck_smaller_than_opening_hand() {
    let catalog = starter_catalog();
    let result = Duel::new(
        &catalog,
        [vec!["Packet Runner"; 10].as_slice(), vec!["Packet Runner"; 3].as_slice()],
        DuelConfig::default(),
        Box::new(ScriptedDecider::passive()),
        Box::new(ScriptedDecider::passive()),
    );
    assert!(matches!(result.err(), Some(SetupError::DeckTooSmall { have: 3, need: 5, .. })));
}

// =============================================================================
// Endings
// =============================================================================

/// Six cards: five in the opening hand, one drawn on turn 2, nothing left
/// for turn 4.
#[test]
fn test_deck_out() {
    init_tracing();
    let catalog = starter_catalog();
    let big = vec!["Packet Runner"; 20];
    let small = vec!["Packet Runner"; 6];
    let mut duel = Duel::new(
        &catalog,
        [big.as_slice(), small.as_slice()],
        DuelConfig::default().without_shuffle(),
        Box::new(ScriptedDecider::passive()),
        Box::new(ScriptedDecider::passive()),
    )
    .unwrap();

    let outcome = duel.run().unwrap();
    assert_eq!(outcome.winner, Some(P1));
    assert_eq!(outcome.reason, EndReason::DeckOut);
    assert_eq!(duel.state().turn, 4);
    assert!(duel.state().players[P2].deck.is_empty());
    assert_eq!(count(&duel, DuelEventKind::DuelEnd), 1);
}

#[test]
fn test_effect_draw_from_empty_deck_loses() {
    let catalog = starter_catalog();
    let deck = ["Patch Cycle", "Restore Point"];
    let other = vec!["Packet Runner"; 10];
    let build = |first: ScriptedDecider| {
        Duel::new(
            &catalog,
            [deck.as_slice(), other.as_slice()],
            config(),
            Box::new(first),
            Box::new(ScriptedDecider::passive()),
        )
        .unwrap()
    };
    let patch = from_deck(&build(ScriptedDecider::passive()), P1, "Patch Cycle");

    let mut duel = build(ScriptedDecider::new([Reply::Action(Action::Activate { card: patch, effect: 0 })]));
    let outcome = duel.run().unwrap();
    assert_eq!(outcome.winner, Some(P2));
    assert_eq!(outcome.reason, EndReason::DeckOut);
    assert_eq!(duel.state().turn, 1);
}

#[test]
fn test_turn_limit_is_a_draw() {
    let mut duel = fresh_duel(&[], &[], config().with_turn_limit(3), ScriptedDecider::passive(), ScriptedDecider::passive());
    let outcome = duel.run().unwrap();
    assert_eq!(outcome.winner, None);
    assert_eq!(outcome.reason, EndReason::TurnLimit);
    assert_eq!(duel.state().turn, 4);
}

#[test]
fn test_cancelled_after_current_turn() {
    let token = CancelToken::new();
    let mut duel = fresh_duel(&[], &[], config(), ScriptedDecider::passive(), ScriptedDecider::passive())
        .with_cancel_token(token.clone());
    token.cancel();

    let outcome = duel.run().unwrap();
    assert_eq!(outcome.winner, None);
    assert_eq!(outcome.reason, EndReason::Cancelled);
    assert_eq!(duel.state().turn, 1);
    assert_eq!(count(&duel, DuelEventKind::TurnStart), 1);
}

#[test]
fn test_outcome_recorded_once() {
    let mut duel = fresh_duel(&[], &[], config(), ScriptedDecider::passive(), ScriptedDecider::passive());
    duel.lose(P2, EndReason::HpDepleted, "test");
    duel.lose(P1, EndReason::HpDepleted, "test");
    assert_eq!(duel.outcome().unwrap().winner, Some(P1));
    assert_eq!(count(&duel, DuelEventKind::DuelEnd), 1);
}

#[test]
fn test_huge_heal_saturates() {
    let mut duel = fresh_duel(&[], &[], config(), ScriptedDecider::passive(), ScriptedDecider::passive());
    duel.heal(P1, i32::MAX);
    assert_eq!(hp(&duel, P1), i32::MAX);

    duel.damage(P1, 1000);
    assert_eq!(hp(&duel, P1), i32::MAX - 1000);
    assert!(duel.outcome().is_none());
}

// =============================================================================
// Turn structure
// =============================================================================

#[test]
fn test_hand_limit_discards_at_end_phase() {
    let mut duel = fresh_duel(
        &[],
        &[],
        config().with_opening_hand(5).with_hand_limit(2).with_turn_limit(1),
        ScriptedDecider::passive(),
        ScriptedDecider::passive(),
    );
    duel.run().unwrap();

    assert_eq!(duel.state().players[P1].hand.len(), 2);
    assert_eq!(duel.state().players[P1].scrapheap.len(), 4);
    assert_eq!(count(&duel, DuelEventKind::Discard), 4);
    // Only the turn player discards.
    assert_eq!(duel.state().players[P2].hand.len(), 5);
}

#[test]
fn test_first_turn_draw_toggle() {
    let mut duel = fresh_duel(
        &[],
        &[],
        config().with_first_turn_draw(false).with_turn_limit(2),
        ScriptedDecider::passive(),
        ScriptedDecider::passive(),
    );
    duel.run().unwrap();

    let draws = events(&duel, DuelEventKind::Draw);
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].0, Some(P2));
}

#[test]
fn test_per_turn_flags_reset() {
    let mut duel = fresh_duel(
        &["Packet Runner", "Packet Runner"],
        &[],
        config().with_turn_limit(3),
        ScriptedDecider::passive(),
        ScriptedDecider::passive(),
    );
    let runner = attacker(&mut duel, P1, "Packet Runner");
    {
        let state = duel.state_mut();
        state.card_mut(runner).has_attacked = true;
        state.card_mut(runner).position_changed = true;
        state.players[P1].normal_summon_used = true;
    }
    duel.run().unwrap();

    let state = duel.state();
    assert!(!state.card(runner).has_attacked);
    assert!(!state.card(runner).position_changed);
    assert!(!state.players[P1].normal_summon_used);
}

/// Every turn emits its phases in order; Battle only appears when the
/// turn player enters it.
#[test]
fn test_phase_order() {
    let mut duel = fresh_duel(&[], &[], config().with_turn_limit(1), ScriptedDecider::passive(), ScriptedDecider::passive());
    duel.run().unwrap();

    let phases: Vec<String> = duel
        .log()
        .of_kind(DuelEventKind::PhaseChange)
        .map(|e| e.detail.clone())
        .collect();
    assert_eq!(phases, ["Draw phase", "Standby phase", "Main1 phase", "End phase"]);
}

// =============================================================================
// Determinism
// =============================================================================

fn seeded_log(seed: u64) -> Vec<u8> {
    let mut duel = starter_duel(
        DuelConfig::default().with_seed(seed).with_turn_limit(6),
        ScriptedDecider::passive(),
        ScriptedDecider::passive(),
    );
    duel.run().unwrap();
    duel.state().check_zone_integrity().unwrap();
    duel.log().to_bytes().unwrap()
}

#[test]
fn test_same_seed_same_log() {
    let a = seeded_log(42);
    let b = seeded_log(42);
    assert_eq!(a, b);

    let restored = EventLog::from_bytes(&a).unwrap();
    assert_eq!(restored.to_bytes().unwrap(), a);
}

#[test]
fn test_different_seed_different_hands() {
    let hand = |seed: u64| {
        let mut duel = starter_duel(
            DuelConfig::default().with_seed(seed),
            ScriptedDecider::passive(),
            ScriptedDecider::passive(),
        );
        duel.start().unwrap();
        duel.state().players[P1].hand.clone()
    };
    assert_eq!(hand(1), hand(1));
    assert_ne!(hand(1), hand(2));
}

#[test]
fn test_unshuffled_deck_keeps_list_order() {
    let mut duel = fresh_duel(
        &["Kernel Warden", "Packet Runner"],
        &[],
        config().with_opening_hand(2),
        ScriptedDecider::passive(),
        ScriptedDecider::passive(),
    );
    duel.start().unwrap();

    let names: Vec<&str> = duel.state().players[P1]
        .hand
        .iter()
        .map(|&id| duel.state().card(id).name())
        .collect();
    assert_eq!(names, ["Kernel Warden", "Packet Runner"]);
}

// =============================================================================
// Views and remote deciders
// =============================================================================

#[test]
fn test_views_hide_set_cards_from_opponent() {
    let mut duel = fresh_duel(&["Kernel Panic"], &[], config(), ScriptedDecider::passive(), ScriptedDecider::passive());
    let panic = set_tech(&mut duel, P1, "Kernel Panic");

    let own = PlayerView::build(duel.state(), P1);
    let other = PlayerView::build(duel.state(), P2);
    assert_eq!(own.find(panic).and_then(|c| c.name.clone()).as_deref(), Some("Kernel Panic"));
    assert_eq!(other.find(panic).and_then(|c| c.name.clone()), None);
}

#[test]
fn test_channel_decider_plays_a_duel() {
    let (decider, mut requests) = ChannelDecider::new(P2);
    let client = std::thread::spawn(move || {
        let mut notified = 0;
        while let Some(request) = requests.blocking_recv() {
            match request {
                DecisionRequest::Action { candidates, reply, .. } => {
                    let pick = [Action::Pass, Action::EndPhase]
                        .into_iter()
                        .find(|a| candidates.contains(a))
                        .unwrap_or(candidates[0]);
                    let _ = reply.send(pick);
                }
                DecisionRequest::Cards { candidates, min, reply, .. } => {
                    let _ = reply.send(candidates[..min].to_vec());
                }
                DecisionRequest::YesNo { reply, .. } => {
                    let _ = reply.send(true);
                }
                DecisionRequest::Notify(_) => notified += 1,
            }
        }
        notified
    });

    let catalog = starter_catalog();
    let deck = starter_deck();
    let mut duel = Duel::new(
        &catalog,
        [deck.as_slice(), deck.as_slice()],
        DuelConfig::default().with_seed(3).with_turn_limit(4),
        Box::new(ScriptedDecider::passive()),
        Box::new(decider),
    )
    .unwrap();
    let outcome = duel.run().unwrap();
    duel.state().check_zone_integrity().unwrap();
    let logged = duel.log().len();
    drop(duel);

    assert_eq!(outcome.reason, EndReason::TurnLimit);
    assert_eq!(client.join().unwrap(), logged);
}

/// The second player is first asked something in their turn-2 Main Phase.
#[test]
fn test_disconnected_client_aborts_duel() {
    let (decider, requests) = ChannelDecider::new(P2);
    drop(requests);
    let mut duel = Duel::new(
        &starter_catalog(),
        [vec!["Restore Point"; 10].as_slice(), vec!["Restore Point"; 10].as_slice()],
        config(),
        Box::new(ScriptedDecider::passive()),
        Box::new(decider),
    )
    .unwrap();

    let err = duel.run().unwrap_err();
    assert_eq!(err, DuelError::Decision(DecisionError::Disconnected(P2)));
    assert!(duel.outcome().is_none());
}

// =============================================================================
// Random play
// =============================================================================

/// Picks uniformly among whatever the engine offers.
struct RandomDecider {
    rng: ChaCha8Rng,
}

impl RandomDecider {
    fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl DecisionMaker for RandomDecider {
    fn choose_action(&mut self, _: &PlayerView, candidates: &[Action]) -> Result<Action, DecisionError> {
        Ok(*candidates.choose(&mut self.rng).unwrap_or(&Action::Pass))
    }

    fn choose_cards(
        &mut self,
        _: &PlayerView,
        _: &str,
        candidates: &[InstanceId],
        min: usize,
        max: usize,
    ) -> Result<Vec<InstanceId>, DecisionError> {
        let take = self.rng.gen_range(min..=max.max(min));
        let mut picks = candidates.to_vec();
        picks.shuffle(&mut self.rng);
        picks.truncate(take);
        Ok(picks)
    }

    fn choose_yes_no(&mut self, _: &PlayerView, _: &str) -> Result<bool, DecisionError> {
        Ok(self.rng.gen_bool(0.5))
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Whatever the players do, every card stays in exactly one place and
    /// the duel ends cleanly.
    #[test]
    fn prop_random_duels_keep_zones_consistent(seed in any::<u64>()) {
        let catalog = starter_catalog();
        let deck = starter_deck();
        let mut duel = Duel::new(
            &catalog,
            [deck.as_slice(), deck.as_slice()],
            DuelConfig::default().with_seed(seed).with_turn_limit(12),
            Box::new(RandomDecider::new(seed)),
            Box::new(RandomDecider::new(seed.wrapping_add(1))),
        )
        .unwrap();

        let outcome = duel.run().unwrap();
        prop_assert!(duel.state().check_zone_integrity().is_ok());
        prop_assert_eq!(duel.outcome(), Some(outcome));
        for (_, player) in duel.state().players.iter() {
            prop_assert!(player.hp >= 0);
        }
        prop_assert_eq!(count(&duel, DuelEventKind::DuelEnd), 1);
    }
}
