//! Players and per-player storage.
//!
//! ## PlayerId
//!
//! A duel always has exactly two players, `PlayerId::FIRST` (who takes turn
//! one) and `PlayerId::SECOND`. `opponent()` flips between them.
//!
//! ## PlayerMap
//!
//! Fixed two-slot storage indexed by `PlayerId`.
//!
//! ## Player
//!
//! One side of the board: hit points, ordered piles and fixed slots.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::entity::InstanceId;

/// Number of agent slots and tech slots on each side.
pub const FIELD_SLOTS: usize = 5;

/// Player identifier, 0 or 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// The player who takes the first turn.
    pub const FIRST: PlayerId = PlayerId(0);
    /// The player who takes the second turn.
    pub const SECOND: PlayerId = PlayerId(1);

    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }

    /// Both players in seat order.
    ///
    /// ```
    /// use netduel::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::both(), [PlayerId::FIRST, PlayerId::SECOND]);
    /// assert_eq!(PlayerId::FIRST.opponent(), PlayerId::SECOND);
    /// ```
    #[must_use]
    pub const fn both() -> [PlayerId; 2] {
        [Self::FIRST, Self::SECOND]
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0 + 1)
    }
}

/// Per-player data storage with O(1) access.
///
/// ```
/// use netduel::core::{PlayerId, PlayerMap};
///
/// let mut hp: PlayerMap<i32> = PlayerMap::new(|_| 8000);
/// hp[PlayerId::SECOND] -= 500;
/// assert_eq!(hp[PlayerId::FIRST], 8000);
/// assert_eq!(hp[PlayerId::SECOND], 7500);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; 2],
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId::FIRST), factory(PlayerId::SECOND)],
        }
    }

    /// Build a map from a pair already in seat order.
    pub fn from_pair(first: T, second: T) -> Self {
        Self {
            data: [first, second],
        }
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs in seat order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

/// One side of the board.
///
/// The deck's top card is the last element. Slots are `None` when empty.
/// The authoritative position of a card is its instance's `Location`; these
/// collections mirror it and are only changed through the zone operations
/// in `crate::zones`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub hp: i32,
    pub deck: Vec<InstanceId>,
    pub hand: Vec<InstanceId>,
    pub scrapheap: Vec<InstanceId>,
    pub purged: Vec<InstanceId>,
    pub agents: [Option<InstanceId>; FIELD_SLOTS],
    pub techs: [Option<InstanceId>; FIELD_SLOTS],
    pub os: Option<InstanceId>,
    /// Normal summon or agent set already used this turn.
    pub normal_summon_used: bool,
}

impl Player {
    /// Empty side with the given hit points.
    #[must_use]
    pub fn new(id: PlayerId, hp: i32) -> Self {
        Self {
            id,
            hp,
            deck: Vec::new(),
            hand: Vec::new(),
            scrapheap: Vec::new(),
            purged: Vec::new(),
            agents: [None; FIELD_SLOTS],
            techs: [None; FIELD_SLOTS],
            os: None,
            normal_summon_used: false,
        }
    }

    /// First empty agent slot.
    #[must_use]
    pub fn free_agent_slot(&self) -> Option<u8> {
        self.agents.iter().position(Option::is_none).map(|i| i as u8)
    }

    /// First empty tech slot.
    #[must_use]
    pub fn free_tech_slot(&self) -> Option<u8> {
        self.techs.iter().position(Option::is_none).map(|i| i as u8)
    }

    /// Agents on this side in slot order.
    pub fn field_agents(&self) -> impl Iterator<Item = InstanceId> + '_ {
        self.agents.iter().flatten().copied()
    }

    /// Tech cards on this side in slot order.
    pub fn field_techs(&self) -> impl Iterator<Item = InstanceId> + '_ {
        self.techs.iter().flatten().copied()
    }

    /// Number of agents on this side.
    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.agents.iter().flatten().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        assert_eq!(PlayerId::FIRST.index(), 0);
        assert_eq!(PlayerId::SECOND.index(), 1);
        assert_eq!(PlayerId::SECOND.opponent(), PlayerId::FIRST);
        assert_eq!(format!("{}", PlayerId::FIRST), "Player 1");
    }

    #[test]
    fn test_player_map_new() {
        let map: PlayerMap<i32> = PlayerMap::new(|p| p.index() as i32 * 10);
        assert_eq!(map[PlayerId::FIRST], 0);
        assert_eq!(map[PlayerId::SECOND], 10);
    }

    #[test]
    fn test_player_map_iter() {
        let map = PlayerMap::from_pair("a", "b");
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(PlayerId::FIRST, &"a"), (PlayerId::SECOND, &"b")]);
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<i32> = PlayerMap::new(|p| p.index() as i32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    fn test_free_slots() {
        let mut player = Player::new(PlayerId::FIRST, 8000);
        assert_eq!(player.free_agent_slot(), Some(0));
        player.agents[0] = Some(InstanceId(4));
        player.agents[1] = Some(InstanceId(5));
        assert_eq!(player.free_agent_slot(), Some(2));
        assert_eq!(player.agent_count(), 2);

        player.techs = [Some(InstanceId(9)); FIELD_SLOTS];
        assert_eq!(player.free_tech_slot(), None);
    }
}
