//! Combatants: the player and individual enemy units.
//!
//! An `Entity` is one combatant's battle-relevant state. The stat set of
//! this game is closed, so stats are typed fields rather than a generic
//! key/value bag. Derived budgets (`max_speed`, `max_energy`) are
//! recomputed at every turn start from the base stats plus passive and
//! token bonuses.
//!
//! All HP/block arithmetic clamps defensively: a negative number on
//! screen is a bug, but a crashed battle is worse.

use serde::{Deserialize, Serialize};

use crate::tokens::TokenStore;

/// Addresses one combatant inside a battle.
///
/// `Enemy(i)` indexes into the enemy group's unit list. Resolving an
/// action against a dead or missing unit is a logged skip, not a panic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorRef {
    Player,
    Enemy(usize),
}

impl ActorRef {
    /// The opposing side for targeting purposes.
    ///
    /// Enemy actions always target the player; player actions default to
    /// the first living enemy unit (index resolved by the executor).
    #[must_use]
    pub fn is_player(self) -> bool {
        matches!(self, ActorRef::Player)
    }
}

impl std::fmt::Display for ActorRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorRef::Player => write!(f, "플레이어"),
            ActorRef::Enemy(i) => write!(f, "적 {}", i + 1),
        }
    }
}

/// One combatant: the player or a single enemy unit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entity {
    /// Display name.
    pub name: String,

    pub hp: i32,
    pub max_hp: i32,

    /// Incoming-damage absorption; resets at turn end unless retained.
    pub block: i32,

    /// Added to every damage stat before multipliers.
    pub strength: i32,

    /// Counterattack damage dealt back when hit; per-turn transient.
    pub counter: i32,

    /// Ether points; depletion to zero loses the battle for this side.
    pub ether_pts: i32,

    /// Base timeline budget before bonuses.
    pub base_speed: i32,
    /// Base hand-submission budget before bonuses.
    pub base_energy: i32,

    /// Derived timeline budget, recomputed every turn start.
    pub max_speed: i32,
    /// Derived submission budget, recomputed every turn start.
    pub max_energy: i32,

    /// Incoming damage percentage (100 = normal); per-turn transient.
    pub damage_taken_pct: i32,

    /// Three-scope status-token store.
    pub tokens: TokenStore,
}

impl Entity {
    /// Create a combatant with full HP and no modifiers.
    #[must_use]
    pub fn new(name: impl Into<String>, max_hp: i32, base_speed: i32, base_energy: i32) -> Self {
        Self {
            name: name.into(),
            hp: max_hp,
            max_hp,
            block: 0,
            strength: 0,
            counter: 0,
            ether_pts: 0,
            base_speed,
            base_energy,
            max_speed: base_speed,
            max_energy: base_energy,
            damage_taken_pct: 100,
            tokens: TokenStore::new(),
        }
    }

    /// Set starting ether (builder style).
    #[must_use]
    pub fn with_ether(mut self, pts: i32) -> Self {
        self.ether_pts = pts;
        self
    }

    /// Set starting strength (builder style).
    #[must_use]
    pub fn with_strength(mut self, strength: i32) -> Self {
        self.strength = strength;
        self
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Remove HP directly (block already resolved by the caller).
    ///
    /// Returns the actual HP lost after clamping at zero.
    pub fn damage_hp(&mut self, amount: i32) -> i32 {
        let amount = amount.max(0);
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Heal up to max HP. Returns the actual amount healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let amount = amount.max(0);
        let healed = amount.min(self.max_hp - self.hp);
        self.hp += healed;
        healed
    }

    /// Gain block (never negative).
    pub fn gain_block(&mut self, amount: i32) {
        self.block = (self.block + amount.max(0)).max(0);
    }

    /// Spend block against incoming damage. Returns the damage absorbed.
    pub fn absorb_block(&mut self, damage: i32) -> i32 {
        let absorbed = damage.max(0).min(self.block);
        self.block -= absorbed;
        absorbed
    }

    /// Reset the per-turn transient fields (block, counter, vulnerability).
    ///
    /// `retain_block` is set when a vigilance-class token keeps block
    /// across the turn boundary.
    pub fn reset_transients(&mut self, retain_block: bool) {
        if !retain_block {
            self.block = 0;
        }
        self.counter = 0;
        self.damage_taken_pct = 100;
    }
}
