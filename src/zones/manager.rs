//! Card locations and movement.
//!
//! A card's `Location` on its instance is authoritative; the per-player
//! piles and slots mirror it. `GameState::move_card` keeps both in step by
//! removing the card from its current location before placing it in the
//! new one. Finding a card missing from where its instance says it is, or
//! a slot already occupied, is an invariant violation.

use serde::{Deserialize, Serialize};

use crate::core::entity::InstanceId;
use crate::core::player::{PlayerId, FIELD_SLOTS};
use crate::core::state::GameState;
use crate::error::DuelError;

/// A pile or slot on one side of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Hand,
    /// Agent slot 0..5.
    Agent(u8),
    /// Tech slot 0..5.
    Tech(u8),
    Os,
    Scrapheap,
    Purged,
}

impl Zone {
    /// Agent, tech, and OS slots.
    #[must_use]
    pub fn is_field(self) -> bool {
        matches!(self, Zone::Agent(_) | Zone::Tech(_) | Zone::Os)
    }
}

/// A zone on a particular side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub side: PlayerId,
    pub zone: Zone,
}

impl Location {
    #[must_use]
    pub const fn new(side: PlayerId, zone: Zone) -> Self {
        Self { side, zone }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} of {}", self.zone, self.side)
    }
}

impl GameState {
    /// Move a card: remove it from its current location, then place it on
    /// top of the destination pile or in the destination slot.
    pub fn move_card(&mut self, id: InstanceId, to: Location) -> Result<(), DuelError> {
        let from = self.card(id).location;
        self.detach(id, from)?;
        self.attach(id, to)?;
        self.card_mut(id).location = to;
        Ok(())
    }

    fn detach(&mut self, id: InstanceId, from: Location) -> Result<(), DuelError> {
        let player = &mut self.players[from.side];
        let removed = match from.zone {
            Zone::Deck => remove_from(&mut player.deck, id),
            Zone::Hand => remove_from(&mut player.hand, id),
            Zone::Scrapheap => remove_from(&mut player.scrapheap, id),
            Zone::Purged => remove_from(&mut player.purged, id),
            Zone::Agent(slot) => take_slot(&mut player.agents, slot, id),
            Zone::Tech(slot) => take_slot(&mut player.techs, slot, id),
            Zone::Os => {
                if player.os == Some(id) {
                    player.os = None;
                    true
                } else {
                    false
                }
            }
        };
        if removed {
            Ok(())
        } else {
            Err(DuelError::invariant(format!("{id} is not in {from}")))
        }
    }

    fn attach(&mut self, id: InstanceId, to: Location) -> Result<(), DuelError> {
        let player = &mut self.players[to.side];
        let slot = match to.zone {
            Zone::Deck => {
                player.deck.push(id);
                return Ok(());
            }
            Zone::Hand => {
                player.hand.push(id);
                return Ok(());
            }
            Zone::Scrapheap => {
                player.scrapheap.push(id);
                return Ok(());
            }
            Zone::Purged => {
                player.purged.push(id);
                return Ok(());
            }
            Zone::Agent(index) => slot_mut(&mut player.agents, index),
            Zone::Tech(index) => slot_mut(&mut player.techs, index),
            Zone::Os => Some(&mut player.os),
        };
        let Some(slot) = slot else {
            return Err(DuelError::invariant(format!("{to} does not exist")));
        };
        if let Some(occupant) = *slot {
            return Err(DuelError::invariant(format!(
                "{to} is occupied by {occupant}, cannot place {id}"
            )));
        }
        *slot = Some(id);
        Ok(())
    }

    /// Count how many piles or slots currently hold `id`.
    #[must_use]
    pub fn occurrences(&self, id: InstanceId) -> usize {
        self.players
            .iter()
            .map(|(_, p)| {
                let piles = [&p.deck, &p.hand, &p.scrapheap, &p.purged]
                    .iter()
                    .map(|pile| pile.iter().filter(|&&c| c == id).count())
                    .sum::<usize>();
                let slots = p
                    .agents
                    .iter()
                    .chain(p.techs.iter())
                    .chain(std::iter::once(&p.os))
                    .filter(|s| **s == Some(id))
                    .count();
                piles + slots
            })
            .sum()
    }

    /// Verify every card is in exactly one place, and that place is the one
    /// its instance records.
    pub fn check_zone_integrity(&self) -> Result<(), DuelError> {
        for card in &self.cards {
            let count = self.occurrences(card.id);
            if count != 1 {
                return Err(DuelError::invariant(format!(
                    "{} ({}) found in {count} places",
                    card.id,
                    card.name()
                )));
            }
            if !self.location_holds(card.location, card.id) {
                return Err(DuelError::invariant(format!(
                    "{} is recorded at {} but is not there",
                    card.id, card.location
                )));
            }
        }
        Ok(())
    }

    fn location_holds(&self, location: Location, id: InstanceId) -> bool {
        let p = &self.players[location.side];
        match location.zone {
            Zone::Deck => p.deck.contains(&id),
            Zone::Hand => p.hand.contains(&id),
            Zone::Scrapheap => p.scrapheap.contains(&id),
            Zone::Purged => p.purged.contains(&id),
            Zone::Agent(i) => p.agents.get(i as usize) == Some(&Some(id)),
            Zone::Tech(i) => p.techs.get(i as usize) == Some(&Some(id)),
            Zone::Os => p.os == Some(id),
        }
    }
}

fn remove_from(pile: &mut Vec<InstanceId>, id: InstanceId) -> bool {
    match pile.iter().position(|&c| c == id) {
        Some(index) => {
            pile.remove(index);
            true
        }
        None => false,
    }
}

fn take_slot(slots: &mut [Option<InstanceId>; FIELD_SLOTS], index: u8, id: InstanceId) -> bool {
    match slots.get_mut(index as usize) {
        Some(slot) if *slot == Some(id) => {
            *slot = None;
            true
        }
        _ => false,
    }
}

fn slot_mut(
    slots: &mut [Option<InstanceId>; FIELD_SLOTS],
    index: u8,
) -> Option<&mut Option<InstanceId>> {
    slots.get_mut(index as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardCatalog, Element};

    fn state_with_deck(n: usize) -> GameState {
        let mut catalog = CardCatalog::new();
        catalog.register(Card::agent("Packet Runner", 4, Element::Wind, 1400, 1200));
        let card = catalog.get("Packet Runner").unwrap().clone();
        let mut state = GameState::new(8000);
        for _ in 0..n {
            state.add_card(card.clone(), PlayerId::FIRST);
        }
        state
    }

    #[test]
    fn test_move_keeps_single_location() {
        let mut state = state_with_deck(3);
        let id = state.players[PlayerId::FIRST].deck[2];

        state.move_card(id, Location::new(PlayerId::FIRST, Zone::Hand)).unwrap();
        assert_eq!(state.occurrences(id), 1);
        assert_eq!(state.players[PlayerId::FIRST].deck.len(), 2);

        state.move_card(id, Location::new(PlayerId::FIRST, Zone::Agent(3))).unwrap();
        assert_eq!(state.players[PlayerId::FIRST].agents[3], Some(id));
        assert!(state.players[PlayerId::FIRST].hand.is_empty());
        state.check_zone_integrity().unwrap();
    }

    #[test]
    fn test_occupied_slot_is_invariant_violation() {
        let mut state = state_with_deck(2);
        let a = state.players[PlayerId::FIRST].deck[0];
        let b = state.players[PlayerId::FIRST].deck[1];
        let slot = Location::new(PlayerId::FIRST, Zone::Agent(0));

        state.move_card(a, slot).unwrap();
        let err = state.move_card(b, slot).unwrap_err();
        assert!(matches!(err, DuelError::Invariant(_)));
    }

    #[test]
    fn test_move_to_opponent_side() {
        let mut state = state_with_deck(1);
        let id = state.players[PlayerId::FIRST].deck[0];
        state.move_card(id, Location::new(PlayerId::FIRST, Zone::Agent(0))).unwrap();
        state.move_card(id, Location::new(PlayerId::SECOND, Zone::Agent(4))).unwrap();

        assert_eq!(state.players[PlayerId::FIRST].agents[0], None);
        assert_eq!(state.players[PlayerId::SECOND].agents[4], Some(id));
        state.check_zone_integrity().unwrap();
    }
}
