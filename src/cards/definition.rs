//! Card definitions - static catalog data.
//!
//! `CardDefinition` holds the immutable properties of a card: costs,
//! stats, traits, the special-effect dispatch key, and tokens granted on
//! play. Instance-specific data (ghost flag, enhancement, growth traits)
//! is stored separately in `CardInstance`.
//!
//! The stat schema of this game is fixed, so stats are typed fields. The
//! special effect stays a raw string key here — the resolver parses it,
//! and an unknown key degrades to a logged no-op instead of failing the
//! catalog load.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::tokens::TokenGrant;

/// Unique identifier for a card definition.
///
/// Identifies the catalog entry, not a specific copy in a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Card category. Drives flush detection and mode-weighted AI picks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Attack,
    Defense,
    Support,
    /// Character sub-specialty cards; placed on top on reshuffle.
    Special,
}

/// Card traits consulted by the combo detector, deck operations, and
/// bonus application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraitId {
    /// Never counts toward combo detection.
    Outcast,
    /// Diverted to discard when drawn while banned.
    Escape,
    /// Gains bonus effect when part of a matched combo.
    Cooperation,
    /// Inserts at the front of the timeline regardless of chosen order.
    Opener,
}

/// Static card definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,

    /// Display name.
    pub name: String,

    pub kind: CardKind,

    /// Hand-submission budget consumed ("energy").
    pub action_cost: i32,

    /// Timeline-position cost; determines queue ordering.
    pub speed_cost: i32,

    /// Damage per hit, before strength and multipliers.
    pub damage: i32,

    /// Block granted to the actor.
    pub block: i32,

    /// Number of hits; damage math runs per hit, specials once.
    pub hits: u32,

    pub traits: SmallVec<[TraitId; 2]>,

    /// Special-effect dispatch key, parsed by the resolver.
    pub special: Option<String>,

    /// Tokens granted when the card's action executes.
    pub applied_tokens: Vec<TokenGrant>,
}

impl CardDefinition {
    /// Create a new definition with zeroed stats.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, kind: CardKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            action_cost: 0,
            speed_cost: 0,
            damage: 0,
            block: 0,
            hits: 1,
            traits: SmallVec::new(),
            special: None,
            applied_tokens: Vec::new(),
        }
    }

    /// Set action and speed costs (builder pattern).
    #[must_use]
    pub fn with_costs(mut self, action_cost: i32, speed_cost: i32) -> Self {
        self.action_cost = action_cost;
        self.speed_cost = speed_cost;
        self
    }

    /// Set damage per hit.
    #[must_use]
    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = damage;
        self
    }

    /// Set block granted.
    #[must_use]
    pub fn with_block(mut self, block: i32) -> Self {
        self.block = block;
        self
    }

    /// Set hit count.
    #[must_use]
    pub fn with_hits(mut self, hits: u32) -> Self {
        self.hits = hits.max(1);
        self
    }

    /// Add a trait.
    #[must_use]
    pub fn with_trait(mut self, t: TraitId) -> Self {
        self.traits.push(t);
        self
    }

    /// Set the special-effect dispatch key.
    #[must_use]
    pub fn with_special(mut self, key: impl Into<String>) -> Self {
        self.special = Some(key.into());
        self
    }

    /// Add a token grant.
    #[must_use]
    pub fn with_token(mut self, grant: TokenGrant) -> Self {
        self.applied_tokens.push(grant);
        self
    }

    /// Whether the definition carries a trait.
    #[must_use]
    pub fn has_trait(&self, t: TraitId) -> bool {
        self.traits.contains(&t)
    }
}
