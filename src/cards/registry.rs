//! Card catalog for descriptor lookup.
//!
//! The `CardCatalog` is built once before any duel starts and is then only
//! read. Decks are given as card names; `Duel::new` resolves them through
//! the catalog and shares the descriptors with the instances it creates.

use rustc_hash::FxHashMap;
use std::sync::Arc;

use super::definition::{Card, CardId};

/// Immutable registry of card descriptors keyed by name.
///
/// ## Example
///
/// ```
/// use netduel::cards::{Card, CardCatalog, Element};
///
/// let mut catalog = CardCatalog::new();
/// catalog.register(Card::agent("Packet Runner", 4, Element::Wind, 1400, 1200));
///
/// let found = catalog.get("Packet Runner").unwrap();
/// assert_eq!(found.atk, 1400);
/// assert!(catalog.get("Missing").is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: Vec<Arc<Card>>,
    by_name: FxHashMap<String, CardId>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card, assigning its ID.
    ///
    /// Panics if a card with the same name already exists; catalogs are
    /// assembled from static content, so a duplicate is a content bug.
    pub fn register(&mut self, mut card: Card) -> CardId {
        if self.by_name.contains_key(&card.name) {
            panic!("Card named {:?} already registered", card.name);
        }
        let id = CardId::new(self.cards.len() as u32);
        card.id = id;
        self.by_name.insert(card.name.clone(), id);
        self.cards.push(Arc::new(card));
        id
    }

    /// Look up a card by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Card>> {
        self.by_name.get(name).map(|id| &self.cards[id.raw() as usize])
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Card>> {
        self.cards.iter()
    }
}
