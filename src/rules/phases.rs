//! Turn structure.
//!
//! ```text
//! Draw -> Standby -> Main 1 -> [Battle -> Main 2] -> End
//! ```
//!
//! Battle is skipped on turn 1 and whenever the turn player ends Main 1
//! without entering it; Main 2 only follows a Battle Phase.

use tracing::debug;

use crate::cards::ModifierLifetime;
use crate::core::{DuelEventKind, Phase};
use crate::error::DuelError;
use crate::triggers::GameEvent;

use super::engine::Duel;

impl Duel {
    /// Play the current turn from the Draw Phase through the End Phase.
    pub(crate) fn play_turn(&mut self) -> Result<(), DuelError> {
        let player = self.state.turn_player;
        self.state.reset_turn_flags();
        self.emit(
            DuelEventKind::TurnStart,
            Some(player),
            None,
            Some(self.state.turn as i32),
            format!("turn {} ({player})", self.state.turn),
        );

        self.enter_phase(Phase::Draw);
        let skip_draw = self.state.turn == 1 && !self.config.first_turn_draw;
        if !skip_draw {
            self.draw(player, 1)?;
        }
        if self.state.is_over() {
            return Ok(());
        }

        self.enter_phase(Phase::Standby);
        self.raise(GameEvent::phase_start(Phase::Standby, player))?;
        if self.state.is_over() {
            return Ok(());
        }

        self.enter_phase(Phase::Main1);
        let battle = self.run_main_phase()?;
        if self.state.is_over() {
            return Ok(());
        }

        if battle && self.state.turn > 1 {
            self.run_battle_phase()?;
            if self.state.is_over() {
                return Ok(());
            }
            self.enter_phase(Phase::Main2);
            self.run_main_phase()?;
            if self.state.is_over() {
                return Ok(());
            }
        }

        self.enter_phase(Phase::End);
        self.raise(GameEvent::phase_start(Phase::End, player))?;
        if self.state.is_over() {
            return Ok(());
        }
        self.enforce_hand_limit()?;
        for card in &mut self.state.cards {
            card.strip_modifiers(ModifierLifetime::UntilEndOfTurn);
        }
        self.refresh();
        Ok(())
    }

    pub(crate) fn enter_phase(&mut self, phase: Phase) {
        self.state.phase = phase;
        debug!(turn = self.state.turn, ?phase, "phase");
        self.emit(
            DuelEventKind::PhaseChange,
            Some(self.state.turn_player),
            None,
            None,
            format!("{phase:?} phase"),
        );
    }

    /// Discard one card at a time until the turn player's hand fits.
    fn enforce_hand_limit(&mut self) -> Result<(), DuelError> {
        let player = self.state.turn_player;
        while self.state.players[player].hand.len() > self.config.hand_limit {
            let hand = self.state.players[player].hand.clone();
            let picked = self.ask_cards(player, "Discard down to the hand limit", &hand, 1, 1)?;
            for card in picked {
                self.discard(player, card)?;
            }
        }
        Ok(())
    }
}
