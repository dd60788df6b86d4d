//! Duel event stream.
//!
//! Every observable rules transition appends one `DuelEvent` to the
//! `EventLog` and is pushed to both decision makers in the same order. The
//! log is append-only; two duels with the same decks, seed and decisions
//! produce byte-identical logs (see `EventLog::to_bytes`).

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use super::state::Phase;

/// What happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DuelEventKind {
    DuelStart,
    TurnStart,
    PhaseChange,
    Draw,
    Discard,
    Summon,
    Set,
    FlipSummon,
    Flip,
    PositionChange,
    Activate,
    ChainLink,
    ChainResolve,
    Negate,
    Destroy,
    SentToScrapheap,
    Purge,
    ReturnToHand,
    ControlChange,
    Equip,
    HpChange,
    CounterChange,
    AttackDeclared,
    AttackStopped,
    AttackNegated,
    Replay,
    BattleDamage,
    DuelEnd,
}

/// One entry in the event stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelEvent {
    /// Position in the log, starting at 0.
    pub seq: u32,
    pub turn: u32,
    pub phase: Phase,
    /// The acting or affected player.
    pub player: Option<PlayerId>,
    pub kind: DuelEventKind,
    /// Name of the card involved, when it is public.
    pub card: Option<String>,
    /// Numeric payload: damage, hit points after a change, link number.
    pub amount: Option<i32>,
    pub detail: String,
}

/// Append-only list of events.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<DuelEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, stamping its sequence number.
    pub fn push(&mut self, mut event: DuelEvent) -> &DuelEvent {
        event.seq = self.events.len() as u32;
        self.events.push(event);
        &self.events[self.events.len() - 1]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DuelEvent> {
        self.events.iter()
    }

    /// Events of one kind, in order.
    pub fn of_kind(&self, kind: DuelEventKind) -> impl Iterator<Item = &DuelEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    #[must_use]
    pub fn last(&self) -> Option<&DuelEvent> {
        self.events.last()
    }

    /// Compact binary encoding for replay comparison.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(&self.events)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        Ok(Self {
            events: bincode::deserialize(bytes)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: DuelEventKind) -> DuelEvent {
        DuelEvent {
            seq: 99,
            turn: 1,
            phase: Phase::Main1,
            player: Some(PlayerId::FIRST),
            kind,
            card: Some("Packet Runner".into()),
            amount: None,
            detail: String::new(),
        }
    }

    #[test]
    fn test_push_stamps_sequence() {
        let mut log = EventLog::new();
        log.push(event(DuelEventKind::Summon));
        log.push(event(DuelEventKind::Destroy));
        let seqs: Vec<_> = log.iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![0, 1]);
        assert_eq!(log.of_kind(DuelEventKind::Destroy).count(), 1);
    }

    #[test]
    fn test_bytes_roundtrip() {
        let mut log = EventLog::new();
        log.push(event(DuelEventKind::HpChange));
        let bytes = log.to_bytes().unwrap();
        assert_eq!(EventLog::from_bytes(&bytes).unwrap(), log);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(event(DuelEventKind::Summon)).unwrap();
        assert_eq!(json["kind"], "Summon");
        assert_eq!(json["card"], "Packet Runner");
    }
}
