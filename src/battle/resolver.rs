//! Attack declaration and resolution.
//!
//! An attack goes through:
//!
//! 1. declaration: the attacker is marked as having attacked, triggers
//!    answer the declaration, then the defending player gets a response
//!    window
//! 2. checks after the window: attacker gone (abort), attack negated,
//!    a restriction now applies (stop and roll back the attack flag),
//!    target gone (replay)
//! 3. damage step: flip a face-down target, calculate, apply damage,
//!    destroy, run battle hooks
//! 4. battle-destruction triggers
//!
//! A replay lets the attacking player pick a new target, attack directly
//! or cancel. It is a fresh declaration, so step 1 runs again.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::calc::{calculate, BattleOutcome, DefenderStance};
use crate::cards::{AgentTraits, Card, Position};
use crate::core::{Action, AttackState, BattleStep, DuelEventKind, InstanceId, Phase, PlayerId};
use crate::effects::{attack_restricted, EffectContext};
use crate::error::DuelError;
use crate::rules::Duel;
use crate::triggers::GameEvent;

/// What happened in one damage step. Passed to battle hooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReport {
    pub attacker: InstanceId,
    pub target: Option<InstanceId>,
    pub attacking_player: PlayerId,
    pub defending_player: PlayerId,
    pub outcome: BattleOutcome,
}

/// The attacking player's answer to a replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplayChoice {
    Retarget(InstanceId),
    Direct,
    Cancel,
}

#[derive(Clone, Copy)]
enum HookKind {
    Damage,
    Destroy,
}

impl Duel {
    /// Face-up attack-position agents of the turn player that have not
    /// attacked and are not restricted.
    #[must_use]
    pub fn legal_attackers(&self) -> Vec<InstanceId> {
        let state = &self.state;
        state
            .agents_of(state.turn_player)
            .into_iter()
            .filter(|&id| {
                let card = state.card(id);
                card.face_up
                    && card.position == Position::Attack
                    && !card.has_attacked
                    && !attack_restricted(state, id)
            })
            .collect()
    }

    /// Opponent agents `attacker` may attack. Face-up agents with the
    /// untargetable trait are excluded.
    #[must_use]
    pub fn legal_targets(&self, attacker: InstanceId) -> Vec<InstanceId> {
        let opponent = self.state.card(attacker).controller.opponent();
        self.state
            .agents_of(opponent)
            .into_iter()
            .filter(|&id| {
                let card = self.state.card(id);
                !(card.face_up && card.card.traits.contains(AgentTraits::UNTARGETABLE))
            })
            .collect()
    }

    /// Direct attacks are allowed when nothing can be targeted, or always
    /// for agents with the direct-attack trait.
    #[must_use]
    pub fn can_attack_directly(&self, attacker: InstanceId) -> bool {
        self.state.card(attacker).card.traits.contains(AgentTraits::DIRECT)
            || self.legal_targets(attacker).is_empty()
    }

    /// Every attack the turn player may declare, then `Pass` (end the
    /// Battle Phase).
    #[must_use]
    pub fn attack_options(&self) -> Vec<Action> {
        let mut options = Vec::new();
        for attacker in self.legal_attackers() {
            for target in self.legal_targets(attacker) {
                options.push(Action::Attack { attacker, target: Some(target) });
            }
            if self.can_attack_directly(attacker) {
                options.push(Action::Attack { attacker, target: None });
            }
        }
        options.push(Action::Pass);
        options
    }

    pub(crate) fn run_battle_phase(&mut self) -> Result<(), DuelError> {
        self.enter_phase(Phase::Battle);
        self.state.battle_step = Some(BattleStep::Start);
        let player = self.state.turn_player;
        loop {
            if self.state.is_over() {
                break;
            }
            let options = self.attack_options();
            let choice = self.ask_action(player, &options)?;
            self.state.record_action(player, choice);
            match choice {
                Action::Attack { attacker, target } => self.execute_attack(attacker, target)?,
                _ => break,
            }
        }
        self.state.battle_step = None;
        Ok(())
    }

    /// Declare and resolve one attack.
    pub fn execute_attack(&mut self, attacker: InstanceId, target: Option<InstanceId>) -> Result<(), DuelError> {
        let controller = self.state.card(attacker).controller;
        let defender = controller.opponent();
        self.state.card_mut(attacker).has_attacked = true;

        let mut target = target;
        loop {
            self.declare_attack(attacker, controller, target)?;
            if self.state.is_over() {
                return self.clear_attack();
            }

            let card = self.state.card(attacker);
            if !card.is_on_field() || card.controller != controller {
                debug!(%attacker, "attacker left the field, attack aborted");
                return self.clear_attack();
            }
            if self.state.attack.is_some_and(|a| a.negated) {
                return self.clear_attack();
            }
            if attack_restricted(&self.state, attacker) {
                self.state.card_mut(attacker).has_attacked = false;
                self.emit(
                    DuelEventKind::AttackStopped,
                    Some(controller),
                    Some(attacker),
                    None,
                    "attack stopped by a restriction",
                );
                return self.clear_attack();
            }

            let Some(current) = target else { break };
            let still_there = {
                let t = self.state.card(current);
                t.is_on_field() && t.kind().is_agent() && t.controller == defender
            };
            if still_there {
                break;
            }

            self.emit(DuelEventKind::Replay, Some(controller), Some(attacker), None, "attack target is gone");
            match self.choose_replay(attacker, controller)? {
                ReplayChoice::Retarget(new_target) => target = Some(new_target),
                ReplayChoice::Direct => target = None,
                ReplayChoice::Cancel => {
                    self.emit(DuelEventKind::AttackStopped, Some(controller), Some(attacker), None, "attack cancelled");
                    return self.clear_attack();
                }
            }
        }

        self.state.battle_step = Some(BattleStep::Damage);
        self.event_hold += 1;
        let report = self.damage_step(attacker, controller, target);
        self.event_hold -= 1;
        report?;

        self.clear_attack()?;
        self.flush_events()?;
        self.refresh();
        Ok(())
    }

    fn declare_attack(
        &mut self,
        attacker: InstanceId,
        controller: PlayerId,
        target: Option<InstanceId>,
    ) -> Result<(), DuelError> {
        self.state.attack = Some(AttackState { attacker, target, negated: false });
        self.state.battle_step = Some(BattleStep::Declare);
        let detail = match target {
            Some(t) => format!("attacks {t}"),
            None => "attacks directly".to_string(),
        };
        self.emit(DuelEventKind::AttackDeclared, Some(controller), Some(attacker), None, detail);
        if !self.raise(GameEvent::attack_declared(attacker, controller, target))? {
            self.respond_and_resolve(controller.opponent())?;
        }
        Ok(())
    }

    fn clear_attack(&mut self) -> Result<(), DuelError> {
        self.state.attack = None;
        self.state.battle_step = Some(BattleStep::End);
        Ok(())
    }

    /// Ask the attacking player how to continue after the target vanished.
    fn choose_replay(&mut self, attacker: InstanceId, controller: PlayerId) -> Result<ReplayChoice, DuelError> {
        let targets = self.legal_targets(attacker);
        if targets.is_empty() {
            let direct = self.ask_yes_no(controller, "The attack target is gone. Attack directly?")?;
            return Ok(if direct { ReplayChoice::Direct } else { ReplayChoice::Cancel });
        }

        let mut options: Vec<Action> = targets
            .into_iter()
            .map(|t| Action::Attack { attacker, target: Some(t) })
            .collect();
        if self.state.card(attacker).card.traits.contains(AgentTraits::DIRECT) {
            options.push(Action::Attack { attacker, target: None });
        }
        options.push(Action::Pass);

        Ok(match self.ask_action(controller, &options)? {
            Action::Attack { target: Some(t), .. } => ReplayChoice::Retarget(t),
            Action::Attack { target: None, .. } => ReplayChoice::Direct,
            _ => ReplayChoice::Cancel,
        })
    }

    fn damage_step(
        &mut self,
        attacker: InstanceId,
        controller: PlayerId,
        target: Option<InstanceId>,
    ) -> Result<BattleReport, DuelError> {
        if let Some(t) = target {
            self.flip_face_up(t)?;
        }

        let stance = match target {
            None => DefenderStance::Direct,
            Some(t) => {
                let card = self.state.card(t);
                match card.position {
                    Position::Attack => DefenderStance::Attack(card.atk()),
                    Position::Defense => DefenderStance::Defense(card.def()),
                }
            }
        };
        let attacking = self.state.card(attacker);
        let piercing = attacking.card.traits.contains(AgentTraits::PIERCING);
        let outcome = calculate(attacking.atk(), stance, piercing);
        let report = BattleReport {
            attacker,
            target,
            attacking_player: controller,
            defending_player: controller.opponent(),
            outcome,
        };

        for (player, amount) in [
            (report.defending_player, outcome.damage_to_defender),
            (report.attacking_player, outcome.damage_to_attacker),
        ] {
            if amount > 0 && !self.state.is_over() {
                self.emit(
                    DuelEventKind::BattleDamage,
                    Some(player),
                    Some(attacker),
                    Some(amount),
                    format!("{player} takes {amount} battle damage"),
                );
                self.damage(player, amount);
                self.raise(GameEvent::battle_damage(player, amount, attacker))?;
            }
        }
        if self.state.is_over() {
            return Ok(report);
        }

        if let Some(t) = target {
            if outcome.destroy_defender {
                self.destroy_by_battle(t, attacker)?;
            }
            if outcome.destroy_attacker {
                self.destroy_by_battle(attacker, t)?;
            }
        }

        self.run_battle_hooks(&report)?;
        Ok(report)
    }

    /// "Deals battle damage" and "destroys by battle" hooks, for cards
    /// still face-up on the field.
    fn run_battle_hooks(&mut self, report: &BattleReport) -> Result<(), DuelError> {
        let outcome = report.outcome;
        let mut calls: Vec<(InstanceId, HookKind)> = Vec::new();
        if outcome.damage_to_defender > 0 {
            calls.push((report.attacker, HookKind::Damage));
        }
        if let Some(t) = report.target {
            if outcome.destroy_defender {
                calls.push((report.attacker, HookKind::Destroy));
            }
            if outcome.damage_to_attacker > 0 {
                calls.push((t, HookKind::Damage));
            }
            if outcome.destroy_attacker {
                calls.push((t, HookKind::Destroy));
            }
        }

        for (card, kind) in calls {
            if self.state.is_over() || !self.state.is_face_up_on_field(card) {
                continue;
            }
            let definition: Arc<Card> = Arc::clone(&self.state.card(card).card);
            let controller = self.state.card(card).controller;
            for (index, effect) in definition.effects.iter().enumerate() {
                let hook = match kind {
                    HookKind::Damage => effect.hooks.battle_damage,
                    HookKind::Destroy => effect.hooks.battle_destroy,
                };
                if let Some(hook) = hook {
                    hook(self, &EffectContext::new(card, index, controller), report)?;
                }
            }
        }
        Ok(())
    }
}
