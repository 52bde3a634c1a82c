//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores all card definitions for a battle and
//! provides lookup by `CardId`. Missing lookups return `None` — the
//! engine logs and skips rather than crashing on bad catalog data.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use etherline::cards::{CardRegistry, CardDefinition, CardId, CardKind};
///
/// let mut registry = CardRegistry::new();
///
/// let slash = CardDefinition::new(CardId::new(1), "베기", CardKind::Attack)
///     .with_costs(1, 2)
///     .with_damage(6);
///
/// registry.register(slash);
///
/// assert_eq!(registry.get(CardId::new(1)).unwrap().name, "베기");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same ID already exists — duplicate
    /// registration is a setup-time programming error.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {:?} already registered", card.id);
        }
        self.cards.insert(card.id, card);
    }

    /// Look up a definition. `None` for unknown ids.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }
}
