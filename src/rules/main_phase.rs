//! Main phase actions.
//!
//! | Action           | Legal when                                                  |
//! |------------------|-------------------------------------------------------------|
//! | `NormalSummon`   | agent in hand, summon unused, enough tributes or a free slot |
//! | `SetAgent`       | as `NormalSummon`; placed face-down in defense               |
//! | `FlipSummon`     | own face-down agent placed before this turn                  |
//! | `ChangePosition` | own face-up agent placed before this turn, not yet changed   |
//! | `SetTech`        | program (not OS) or trap in hand, free tech slot             |
//! | `Activate`       | program from hand, set card, or agent ignition effect        |
//! | `EnterBattle`    | Main 1 after turn 1                                          |
//! | `EndPhase`       | always                                                       |
//!
//! Levels 5-6 need one tribute and 7+ two.

use tracing::debug;

use crate::cards::{CardKind, Position, ProgramKind};
use crate::core::{Action, DuelEventKind, InstanceId, Phase, PlayerId, SummonMethod, SummonRecord};
use crate::effects::{EffectContext, EffectKind};
use crate::error::DuelError;
use crate::triggers::{effect_usable, GameEvent};
use crate::zones::{Location, Zone};

use super::engine::Duel;

impl Duel {
    /// Everything the turn player may do right now in a main phase.
    #[must_use]
    pub fn main_phase_actions(&self) -> Vec<Action> {
        let state = &self.state;
        let player = state.turn_player;
        let side = &state.players[player];
        let free_tech = side.free_tech_slot().is_some();
        let mut actions = Vec::new();

        for &id in &side.hand {
            let card = &state.card(id).card;
            match card.kind {
                CardKind::Agent => {
                    if self.can_normal_summon(player, id) {
                        actions.push(Action::NormalSummon { card: id });
                        actions.push(Action::SetAgent { card: id });
                    }
                }
                CardKind::Program(kind) => {
                    if free_tech && kind != ProgramKind::Os {
                        actions.push(Action::SetTech { card: id });
                    }
                    if free_tech || kind == ProgramKind::Os {
                        self.push_activations(&mut actions, id, EffectKind::Activation);
                    }
                }
                CardKind::Trap(_) => {
                    if free_tech {
                        actions.push(Action::SetTech { card: id });
                    }
                }
            }
        }

        for id in side.field_agents() {
            let instance = state.card(id);
            if !instance.placed_before(state.turn) {
                continue;
            }
            if !instance.face_up {
                actions.push(Action::FlipSummon { card: id });
            } else if !instance.position_changed {
                actions.push(Action::ChangePosition { card: id });
            }
        }

        for id in side.field_techs() {
            let instance = state.card(id);
            if instance.face_up {
                continue;
            }
            let ready = match instance.kind() {
                CardKind::Trap(_) | CardKind::Program(ProgramKind::QuickPlay) => instance.placed_before(state.turn),
                CardKind::Program(_) => true,
                CardKind::Agent => false,
            };
            if ready {
                self.push_activations(&mut actions, id, EffectKind::Activation);
            }
        }

        for id in side.field_agents() {
            if state.card(id).face_up {
                self.push_activations(&mut actions, id, EffectKind::Ignition);
            }
        }

        if state.phase == Phase::Main1 && state.turn > 1 {
            actions.push(Action::EnterBattle);
        }
        actions.push(Action::EndPhase);
        actions
    }

    fn can_normal_summon(&self, player: PlayerId, card: InstanceId) -> bool {
        let side = &self.state.players[player];
        if side.normal_summon_used {
            return false;
        }
        match self.state.card(card).card.tributes_required() {
            0 => side.free_agent_slot().is_some(),
            tributes => side.agent_count() >= tributes,
        }
    }

    fn push_activations(&self, actions: &mut Vec<Action>, card: InstanceId, kind: EffectKind) {
        let instance = self.state.card(card);
        let controller = instance.controller;
        for (index, effect) in instance.card.effects.iter().enumerate() {
            if effect.kind == kind
                && effect.is_manual()
                && effect_usable(self, effect, &EffectContext::new(card, index, controller))
            {
                actions.push(Action::Activate { card, effect: index });
            }
        }
    }

    /// Carry out one main phase action for the turn player. `EnterBattle`
    /// and `EndPhase` are handled by the phase loop and do nothing here.
    pub fn perform_main_action(&mut self, action: Action) -> Result<(), DuelError> {
        let player = self.state.turn_player;
        match action {
            Action::NormalSummon { card } => self.normal_summon(player, card, false),
            Action::SetAgent { card } => self.normal_summon(player, card, true),
            Action::FlipSummon { card } => self.flip_summon(player, card),
            Action::ChangePosition { card } => {
                let position = self.state.card(card).position.flipped();
                self.state.card_mut(card).position_changed = true;
                self.set_position(card, position);
                Ok(())
            }
            Action::SetTech { card } => self.set_tech(player, card),
            Action::Activate { card, effect } => {
                if self.activate(player, card, effect)? {
                    self.respond_and_resolve(player.opponent())?;
                }
                Ok(())
            }
            Action::Pass | Action::EnterBattle | Action::EndPhase | Action::Attack { .. } => Ok(()),
        }
    }

    fn normal_summon(&mut self, player: PlayerId, card: InstanceId, set: bool) -> Result<(), DuelError> {
        let tributes = self.state.card(card).card.tributes_required();
        let method = if tributes > 0 {
            let candidates = self.state.agents_of(player);
            let name = self.state.card(card).name().to_string();
            let chosen = self.ask_cards(player, &format!("Tribute for {name}"), &candidates, tributes, tributes)?;
            for tribute in chosen {
                self.send_to_scrapheap(tribute)?;
            }
            SummonMethod::Tribute
        } else {
            SummonMethod::Normal
        };

        let Some(slot) = self.state.players[player].free_agent_slot() else {
            return Err(DuelError::invariant(format!("{player} has no free agent slot for {card}")));
        };
        self.state.players[player].normal_summon_used = true;
        self.state.move_card(card, Location::new(player, Zone::Agent(slot)))?;
        let turn = self.state.turn;
        let instance = self.state.card_mut(card);
        instance.placed_turn = Some(turn);
        instance.controller = player;

        if set {
            instance.face_up = false;
            instance.position = Position::Defense;
            self.emit(DuelEventKind::Set, Some(player), Some(card), None, format!("{player} sets an agent"));
            self.refresh();
            return Ok(());
        }

        instance.face_up = true;
        instance.position = Position::Attack;
        self.emit(DuelEventKind::Summon, Some(player), Some(card), None, format!("{method:?} summon"));
        self.after_summon(player, card, method)
    }

    fn flip_summon(&mut self, player: PlayerId, card: InstanceId) -> Result<(), DuelError> {
        self.state.card_mut(card).position = Position::Attack;
        self.state.card_mut(card).position_changed = true;
        self.event_hold += 1;
        let flipped = self.flip_face_up(card);
        self.event_hold -= 1;
        flipped?;
        self.emit(DuelEventKind::FlipSummon, Some(player), Some(card), None, "flip summon");
        self.after_summon(player, card, SummonMethod::Flip)
    }

    /// Recalculate, answer the summon with triggers, and give the opponent
    /// a response window if no trigger chain formed.
    fn after_summon(&mut self, player: PlayerId, card: InstanceId, method: SummonMethod) -> Result<(), DuelError> {
        self.state.last_summon = Some(SummonRecord {
            card,
            player,
            method,
            turn: self.state.turn,
        });
        self.refresh();
        if !self.raise(GameEvent::summoned(card, player, method))? {
            debug!(%card, "no trigger chain after summon, opening response window");
            self.respond_and_resolve(player.opponent())?;
        }
        Ok(())
    }

    fn set_tech(&mut self, player: PlayerId, card: InstanceId) -> Result<(), DuelError> {
        let Some(slot) = self.state.players[player].free_tech_slot() else {
            return Err(DuelError::invariant(format!("{player} has no free tech slot for {card}")));
        };
        self.state.move_card(card, Location::new(player, Zone::Tech(slot)))?;
        let turn = self.state.turn;
        let instance = self.state.card_mut(card);
        instance.face_up = false;
        instance.placed_turn = Some(turn);
        self.emit(DuelEventKind::Set, Some(player), Some(card), None, format!("{player} sets a card"));
        Ok(())
    }

    /// Main phase loop. Returns `true` when the turn player chose to enter
    /// the Battle Phase.
    pub(crate) fn run_main_phase(&mut self) -> Result<bool, DuelError> {
        let player = self.state.turn_player;
        loop {
            if self.state.is_over() {
                return Ok(false);
            }
            let actions = self.main_phase_actions();
            let choice = self.ask_action(player, &actions)?;
            self.state.record_action(player, choice);
            match choice {
                Action::EnterBattle => return Ok(true),
                Action::EndPhase => return Ok(false),
                other => self.perform_main_action(other)?,
            }
        }
    }
}
