//! The starter card set.
//!
//! A small catalog that touches every hook the engine offers: targets,
//! costs, negation, equips, an OS, flip effects, battle hooks, counters,
//! attack restrictions and scrapheap triggers.
//!
//! ```
//! use netduel::cards::starter::{starter_catalog, starter_deck};
//!
//! let catalog = starter_catalog();
//! assert!(catalog.contains("Kernel Panic"));
//! assert!(starter_deck().iter().all(|name| catalog.contains(name)));
//! ```

use super::attributes::{AgentTraits, Element, ProgramKind, TrapKind};
use super::definition::Card;
use super::instance::StatModifier;
use super::registry::CardCatalog;
use crate::battle::BattleReport;
use crate::core::{GameState, InstanceId, Phase};
use crate::effects::{
    Effect, EffectContext, ExecutionSpeed, Side, TargetFilter, TargetSelector, TargetSpec, TriggerSpec,
};
use crate::error::DuelError;
use crate::rules::Duel;
use crate::triggers::{EventKind, GameEvent};

const SIGNAL: &str = "signal";

// === Shared helpers ===

fn pick(duel: &mut Duel, ctx: &mut EffectContext, filters: &[TargetFilter]) -> Result<bool, DuelError> {
    duel.choose_targets(ctx, &TargetSpec::one(filters.to_vec()))
}

/// The locked target, if it still satisfies `filters`.
fn still_valid(duel: &Duel, ctx: &EffectContext, filters: &[TargetFilter]) -> Option<InstanceId> {
    ctx.target()
        .filter(|&id| TargetSelector::matches(duel.state(), ctx, id, filters))
}

fn opponent_attacking(duel: &Duel, ctx: &EffectContext) -> bool {
    duel.state()
        .attack
        .is_some_and(|a| duel.state().card(a.attacker).controller != ctx.controller)
}

fn summoned_by_opponent(ctx: &EffectContext) -> bool {
    ctx.event.as_ref().is_some_and(|e| e.player == Some(ctx.opponent()))
}

const OPPONENT_AGENT: [TargetFilter; 2] = [TargetFilter::Agent, TargetFilter::ControlledBy(Side::Opponent)];
const ANY_OTHER_AGENT: [TargetFilter; 2] = [TargetFilter::Agent, TargetFilter::NotSource];
const OWN_FACE_UP_AGENT: [TargetFilter; 3] = [
    TargetFilter::Agent,
    TargetFilter::FaceUp,
    TargetFilter::ControlledBy(Side::Own),
];
const FACE_UP_AGENT: [TargetFilter; 2] = [TargetFilter::Agent, TargetFilter::FaceUp];
const OTHER_TECH: [TargetFilter; 2] = [TargetFilter::Tech, TargetFilter::NotSource];

// === Agents ===

fn target_other_agent(duel: &mut Duel, ctx: &mut EffectContext) -> Result<bool, DuelError> {
    pick(duel, ctx, &ANY_OTHER_AGENT)
}

fn destroy_other_agent(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    if let Some(target) = still_valid(duel, ctx, &ANY_OTHER_AGENT) {
        duel.destroy(target, Some(ctx.source))?;
    }
    Ok(())
}

fn destroyed_itself(_: &Duel, ctx: &EffectContext) -> bool {
    ctx.event.as_ref().is_some_and(|e| e.card == Some(ctx.source))
}

fn draw_one(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    duel.draw(ctx.controller, 1)?;
    Ok(())
}

fn other_agent_summoned(_: &Duel, ctx: &EffectContext) -> bool {
    ctx.event.as_ref().is_some_and(|e| e.card != Some(ctx.source))
}

fn add_signal(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    if duel.state().is_face_up_on_field(ctx.source) {
        duel.add_counter(ctx.source, SIGNAL, 1);
    }
    Ok(())
}

fn signal_boost(state: &mut GameState, ctx: &EffectContext) {
    let counters = state.card(ctx.source).counter(SIGNAL);
    let boost = i32::try_from(counters * 100).unwrap_or(i32::MAX);
    if boost > 0 {
        state.card_mut(ctx.source).add_modifier(StatModifier::continuous(ctx.source, boost, 0));
    }
}

fn spend_two_signals(duel: &mut Duel, ctx: &EffectContext) -> Result<bool, DuelError> {
    if duel.state().card(ctx.source).counter(SIGNAL) < 2 {
        return Ok(false);
    }
    duel.add_counter(ctx.source, SIGNAL, -2);
    Ok(true)
}

fn own_standby(duel: &Duel, ctx: &EffectContext) -> bool {
    duel.state().turn_player == ctx.controller
}

fn heal_500(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    duel.heal(ctx.controller, 500);
    Ok(())
}

fn alarm_condition(_: &Duel, ctx: &EffectContext) -> bool {
    summoned_by_opponent(ctx)
}

fn alarm(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    duel.damage(ctx.opponent(), 200);
    Ok(())
}

fn audit(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    duel.heal(ctx.controller, 300);
    Ok(())
}

fn breach(duel: &mut Duel, ctx: &EffectContext, _: &BattleReport) -> Result<(), DuelError> {
    duel.damage(ctx.opponent(), 500);
    Ok(())
}

fn courier_draw(duel: &mut Duel, ctx: &EffectContext, _: &BattleReport) -> Result<(), DuelError> {
    duel.draw(ctx.controller, 1)?;
    Ok(())
}

fn target_attacker(duel: &mut Duel, ctx: &mut EffectContext) -> Result<bool, DuelError> {
    let Some(attack) = duel.state().attack else {
        return Ok(false);
    };
    ctx.targets.push(attack.attacker);
    Ok(true)
}

fn weaken_attacker(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    if let Some(target) = still_valid(duel, ctx, &FACE_UP_AGENT) {
        duel.state_mut()
            .card_mut(target)
            .add_modifier(StatModifier::until_end_of_turn(ctx.source, -500, 0));
        duel.refresh();
    }
    Ok(())
}

fn agents(catalog: &mut CardCatalog) {
    catalog.register(Card::agent("Packet Runner", 4, Element::Wind, 1400, 1200));
    catalog.register(Card::agent("Firewall Golem", 4, Element::Earth, 1000, 2000));
    catalog.register(Card::agent("Kernel Warden", 4, Element::Light, 1800, 1000));
    catalog.register(Card::agent("Relay Colossus", 5, Element::Earth, 2200, 1500));
    catalog.register(Card::agent("Overclock Titan", 7, Element::Light, 2700, 2200));
    catalog.register(
        Card::agent("Lance Daemon", 4, Element::Fire, 1600, 800).with_traits(AgentTraits::PIERCING),
    );
    catalog.register(
        Card::agent("Ghost Courier", 3, Element::Dark, 1000, 600)
            .with_traits(AgentTraits::DIRECT)
            .with_effect(Effect::continuous("draw 1 after battle damage").with_battle_damage(courier_draw)),
    );
    catalog.register(
        Card::agent("Sentinel Node", 4, Element::Water, 1500, 1700)
            .with_traits(AgentTraits::UNTARGETABLE)
            .with_effect(
                Effect::quick("attacker loses 500 ATK")
                    .once_per_turn()
                    .with_condition(opponent_attacking)
                    .with_target(target_attacker)
                    .with_resolve(weaken_attacker),
            ),
    );
    catalog.register(
        Card::agent("Breach Hound", 4, Element::Dark, 1700, 1000)
            .with_effect(Effect::continuous("500 damage after a battle kill").with_battle_destroy(breach)),
    );
    catalog.register(
        Card::agent("Trojan Mimic", 3, Element::Dark, 800, 1300).with_effect(
            Effect::flip("destroy 1 agent")
                .with_target(target_other_agent)
                .with_resolve(destroy_other_agent),
        ),
    );
    catalog.register(
        Card::agent("Scrap Reclaimer", 3, Element::Earth, 1200, 800).with_effect(
            Effect::trigger("draw 1 when destroyed by battle", TriggerSpec::on(EventKind::BattleDestroyed))
                .mandatory()
                .with_condition(destroyed_itself)
                .with_resolve(draw_one),
        ),
    );
    catalog.register(
        Card::agent("Echo Drone", 4, Element::Water, 1300, 1000)
            .with_effect(
                Effect::trigger("signal counter on summon", TriggerSpec::on(EventKind::Summoned))
                    .mandatory()
                    .with_condition(other_agent_summoned)
                    .with_resolve(add_signal),
            )
            .with_effect(Effect::continuous("+100 ATK per signal counter").with_continuous(signal_boost))
            .with_effect(
                Effect::ignition("remove 2 signal counters, draw 1")
                    .once_per_turn()
                    .with_cost(spend_two_signals)
                    .with_resolve(draw_one),
            ),
    );
    catalog.register(
        Card::agent("Recovery Daemon", 2, Element::Light, 500, 500).with_effect(
            Effect::trigger(
                "heal 500 from the scrapheap",
                TriggerSpec::on(EventKind::PhaseStart(Phase::Standby)).from_scrapheap(),
            )
            .once_per_turn()
            .with_condition(own_standby)
            .with_resolve(heal_500),
        ),
    );
    catalog.register(
        Card::agent("Alarm Node", 2, Element::Fire, 600, 400).with_effect(
            Effect::trigger("200 damage on opponent summon", TriggerSpec::on(EventKind::Summoned))
                .mandatory()
                .with_condition(alarm_condition)
                .with_resolve(alarm),
        ),
    );
    catalog.register(
        Card::agent("Audit Node", 3, Element::Light, 1100, 900).with_effect(
            Effect::trigger("heal 300 on summon", TriggerSpec::on(EventKind::Summoned))
                .with_condition(other_agent_summoned)
                .with_resolve(audit),
        ),
    );
}

// === Programs ===

fn target_opponent_agent(duel: &mut Duel, ctx: &mut EffectContext) -> Result<bool, DuelError> {
    pick(duel, ctx, &OPPONENT_AGENT)
}

fn purge(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    if let Some(target) = still_valid(duel, ctx, &OPPONENT_AGENT) {
        duel.destroy(target, Some(ctx.source))?;
    }
    Ok(())
}

fn target_face_up_agent(duel: &mut Duel, ctx: &mut EffectContext) -> Result<bool, DuelError> {
    pick(duel, ctx, &FACE_UP_AGENT)
}

fn null_pointer(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    if let Some(target) = still_valid(duel, ctx, &FACE_UP_AGENT) {
        duel.state_mut()
            .card_mut(target)
            .add_modifier(StatModifier::until_end_of_turn(ctx.source, -1000, 0));
        duel.refresh();
    }
    Ok(())
}

fn target_own_agent(duel: &mut Duel, ctx: &mut EffectContext) -> Result<bool, DuelError> {
    pick(duel, ctx, &OWN_FACE_UP_AGENT)
}

fn attach_surge(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    if let Some(target) = still_valid(duel, ctx, &OWN_FACE_UP_AGENT) {
        duel.equip(ctx.source, target)?;
    }
    Ok(())
}

fn surge_boost(state: &mut GameState, ctx: &EffectContext) {
    if let Some(host) = state.card(ctx.source).equipped_to {
        state.card_mut(host).add_modifier(StatModifier::continuous(ctx.source, 500, 0));
    }
}

fn grid_boost(state: &mut GameState, ctx: &EffectContext) {
    for id in state.all_agents() {
        let card = state.card(id);
        if card.face_up && card.card.element == Some(Element::Light) {
            state.card_mut(id).add_modifier(StatModifier::continuous(ctx.source, 300, 0));
        }
    }
}

fn bastion_boost(state: &mut GameState, ctx: &EffectContext) {
    for id in state.all_agents() {
        if state.card(id).face_up {
            state.card_mut(id).add_modifier(StatModifier::continuous(ctx.source, 0, 1000));
        }
    }
}

fn format_sweep(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    let programs: Vec<InstanceId> = duel
        .state()
        .field_in_order()
        .into_iter()
        .filter(|&id| id != ctx.source && duel.state().card(id).kind().is_program())
        .collect();
    for id in programs {
        duel.destroy(id, Some(ctx.source))?;
    }
    Ok(())
}

fn draw_two(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    duel.draw(ctx.controller, 2)?;
    Ok(())
}

fn pay_1000(duel: &mut Duel, ctx: &EffectContext) -> Result<bool, DuelError> {
    if duel.state().players[ctx.controller].hp <= 1000 {
        return Ok(false);
    }
    duel.pay_hp(ctx.controller, 1000);
    Ok(true)
}

fn hijack(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    if let Some(target) = still_valid(duel, ctx, &OPPONENT_AGENT) {
        duel.take_control(target, ctx.controller)?;
    }
    Ok(())
}

fn heal_1000(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    duel.heal(ctx.controller, 1000);
    Ok(())
}

fn programs(catalog: &mut CardCatalog) {
    catalog.register(
        Card::program("Purge Protocol", ProgramKind::Normal).with_effect(
            Effect::activation("destroy 1 opponent agent", ExecutionSpeed::Slow)
                .with_target(target_opponent_agent)
                .with_resolve(purge),
        ),
    );
    catalog.register(
        Card::program("Null Pointer", ProgramKind::QuickPlay).with_effect(
            Effect::activation("-1000 ATK until end of turn", ExecutionSpeed::Quick)
                .with_target(target_face_up_agent)
                .with_resolve(null_pointer),
        ),
    );
    catalog.register(
        Card::program("Power Surge", ProgramKind::Equip)
            .with_effect(
                Effect::activation("equip to 1 own agent", ExecutionSpeed::Slow)
                    .with_target(target_own_agent)
                    .with_resolve(attach_surge),
            )
            .with_effect(Effect::continuous("equipped agent +500 ATK").with_continuous(surge_boost)),
    );
    catalog.register(
        Card::program("Grid OS", ProgramKind::Os)
            .with_effect(Effect::activation("activate", ExecutionSpeed::Slow))
            .with_effect(Effect::continuous("light agents +300 ATK").with_continuous(grid_boost)),
    );
    catalog.register(
        Card::program("Bastion OS", ProgramKind::Os)
            .with_effect(Effect::activation("activate", ExecutionSpeed::Slow))
            .with_effect(Effect::continuous("face-up agents +1000 DEF").with_continuous(bastion_boost)),
    );
    catalog.register(
        Card::program("Format Sweep", ProgramKind::Normal).with_effect(
            Effect::activation("destroy every other program on the field", ExecutionSpeed::Slow)
                .with_resolve(format_sweep),
        ),
    );
    catalog.register(
        Card::program("Patch Cycle", ProgramKind::Normal)
            .with_effect(Effect::activation("draw 2", ExecutionSpeed::Slow).with_resolve(draw_two)),
    );
    catalog.register(
        Card::program("Hijack", ProgramKind::Normal).with_effect(
            Effect::activation("pay 1000, take 1 opponent agent", ExecutionSpeed::Slow)
                .with_target(target_opponent_agent)
                .with_cost(pay_1000)
                .with_resolve(hijack),
        ),
    );
    catalog.register(
        Card::program("Restore Point", ProgramKind::Normal)
            .with_effect(Effect::activation("gain 1000 hp", ExecutionSpeed::Slow).with_resolve(heal_1000)),
    );
}

// === Traps ===

fn target_other_tech(duel: &mut Duel, ctx: &mut EffectContext) -> Result<bool, DuelError> {
    pick(duel, ctx, &OTHER_TECH)
}

fn cut_wire(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    if let Some(target) = still_valid(duel, ctx, &OTHER_TECH) {
        duel.destroy(target, Some(ctx.source))?;
    }
    Ok(())
}

fn honeypot(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    if let Some(attack) = duel.state().attack {
        if duel.state().is_face_up_on_field(attack.attacker) {
            duel.destroy(attack.attacker, Some(ctx.source))?;
        }
    }
    Ok(())
}

fn packet_drop(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    duel.negate_attack(ctx.source);
    Ok(())
}

fn big_summon_by_opponent(duel: &Duel, ctx: &EffectContext, event: &GameEvent) -> bool {
    event.kind == EventKind::Summoned
        && event.player == Some(ctx.opponent())
        && event.card.is_some_and(|card| duel.state().card(card).atk() >= 1500)
}

fn sinkhole(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    let Some(card) = ctx.event.as_ref().and_then(|e| e.card) else {
        return Ok(());
    };
    if duel.state().is_face_up_on_field(card) {
        duel.destroy(card, Some(ctx.source))?;
    }
    Ok(())
}

fn chain_open(duel: &Duel, _: &EffectContext) -> bool {
    duel.state().chain_len() > 0
}

fn pay_half(duel: &mut Duel, ctx: &EffectContext) -> Result<bool, DuelError> {
    let hp = duel.state().players[ctx.controller].hp;
    if hp < 2 {
        return Ok(false);
    }
    duel.pay_hp(ctx.controller, hp / 2);
    Ok(true)
}

fn kernel_panic(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    if let Some(link) = ctx.link.filter(|&l| l > 0) {
        duel.negate_link(link - 1, ctx.source, true)?;
    }
    Ok(())
}

fn rollback(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    if let Some(target) = still_valid(duel, ctx, &ANY_OTHER_AGENT) {
        duel.return_to_hand(target)?;
    }
    Ok(())
}

fn too_strong(state: &GameState, _: &EffectContext, attacker: InstanceId) -> bool {
    state.card(attacker).atk() >= 2000
}

fn draw_on_leave(duel: &mut Duel, ctx: &EffectContext) -> Result<(), DuelError> {
    duel.draw(ctx.controller, 1)?;
    Ok(())
}

fn traps(catalog: &mut CardCatalog) {
    catalog.register(
        Card::trap("Cut Wire", TrapKind::Normal).with_effect(
            Effect::activation("destroy 1 program or trap", ExecutionSpeed::Quick)
                .with_target(target_other_tech)
                .with_resolve(cut_wire),
        ),
    );
    catalog.register(
        Card::trap("Honeypot", TrapKind::Normal).with_effect(
            Effect::activation("destroy the attacking agent", ExecutionSpeed::Quick)
                .with_condition(opponent_attacking)
                .with_resolve(honeypot),
        ),
    );
    catalog.register(
        Card::trap("Packet Drop", TrapKind::Normal).with_effect(
            Effect::activation("negate an attack", ExecutionSpeed::Quick)
                .with_condition(opponent_attacking)
                .with_resolve(packet_drop),
        ),
    );
    catalog.register(
        Card::trap("Sinkhole", TrapKind::Normal).with_effect(
            Effect::activation("destroy a summoned agent with 1500+ ATK", ExecutionSpeed::Quick)
                .with_trigger(TriggerSpec::when(big_summon_by_opponent))
                .with_resolve(sinkhole),
        ),
    );
    catalog.register(
        Card::trap("Kernel Panic", TrapKind::Counter).with_effect(
            Effect::activation("pay half hp, negate and destroy", ExecutionSpeed::Counter)
                .with_condition(chain_open)
                .with_cost(pay_half)
                .with_resolve(kernel_panic),
        ),
    );
    catalog.register(
        Card::trap("Rollback", TrapKind::Normal).with_effect(
            Effect::activation("return 1 agent to hand", ExecutionSpeed::Quick)
                .with_target(target_other_agent)
                .with_resolve(rollback),
        ),
    );
    catalog.register(
        Card::trap("Recall Signal", TrapKind::Normal)
            .with_effect(Effect::activation("draw 1", ExecutionSpeed::Quick).with_resolve(draw_one)),
    );
    catalog.register(
        Card::trap("Rate Limiter", TrapKind::Continuous)
            .with_effect(Effect::activation("activate", ExecutionSpeed::Quick))
            .with_effect(
                Effect::continuous("agents with 2000+ ATK cannot attack")
                    .with_attack_restriction(too_strong)
                    .with_leave_field(draw_on_leave),
            ),
    );
}

/// Build the starter catalog.
#[must_use]
pub fn starter_catalog() -> CardCatalog {
    let mut catalog = CardCatalog::new();
    agents(&mut catalog);
    programs(&mut catalog);
    traps(&mut catalog);
    catalog
}

/// A 40-card list built from the starter catalog, top card first.
#[must_use]
pub fn starter_deck() -> Vec<&'static str> {
    const COPIES: [(&str, usize); 20] = [
        ("Packet Runner", 3),
        ("Firewall Golem", 2),
        ("Kernel Warden", 3),
        ("Relay Colossus", 1),
        ("Lance Daemon", 2),
        ("Ghost Courier", 2),
        ("Sentinel Node", 2),
        ("Breach Hound", 2),
        ("Trojan Mimic", 2),
        ("Scrap Reclaimer", 2),
        ("Echo Drone", 2),
        ("Alarm Node", 1),
        ("Purge Protocol", 2),
        ("Null Pointer", 2),
        ("Power Surge", 2),
        ("Patch Cycle", 2),
        ("Cut Wire", 2),
        ("Packet Drop", 2),
        ("Sinkhole", 2),
        ("Kernel Panic", 2),
    ];
    COPIES
        .iter()
        .flat_map(|&(name, copies)| std::iter::repeat(name).take(copies))
        .collect()
}
