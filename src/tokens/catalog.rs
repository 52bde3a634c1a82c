//! Status-token catalog: the closed set of token kinds and their scopes.
//!
//! Tokens are stacked modifiers owned by one combatant. The set is closed
//! (an enum, not strings) so effect dispatch is checked at compile time.

use serde::{Deserialize, Serialize};

/// A status-token kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenId {
    /// Retains block across the turn boundary.
    Vigilance,
    /// Outgoing damage reduced to 75%.
    Weak,
    /// Incoming damage increased to 150%.
    Vulnerable,
    /// Negates one incoming hit, then is consumed.
    Barrier,
    /// +1 max speed per stack on the next derived-stat recompute.
    Focus,
    /// Gains block as the timeline cursor advances past its anchor.
    GrowingDefense,
    /// Reflects damage to the attacker per hit taken.
    Thorns,
}

impl TokenId {
    /// User-visible display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TokenId::Vigilance => "경계",
            TokenId::Weak => "약화",
            TokenId::Vulnerable => "취약",
            TokenId::Barrier => "결계",
            TokenId::Focus => "집중",
            TokenId::GrowingDefense => "성장 방어",
            TokenId::Thorns => "가시",
        }
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifetime scope of a token stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenScope {
    /// Consumed the instant its trigger fires; removed by the resolver.
    Usage,
    /// Cleared at the resolve-exit of its granting turn.
    Turn,
    /// Never auto-expires; removed only explicitly.
    Permanent,
}

/// A token grant carried by a card definition.
///
/// Applied when the card's action executes. `to_self` grants to the
/// actor; otherwise the target receives the stacks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub token: TokenId,
    pub stacks: u32,
    pub scope: TokenScope,
    pub to_self: bool,
}

impl TokenGrant {
    /// Grant to the card's target.
    #[must_use]
    pub fn on_target(token: TokenId, stacks: u32, scope: TokenScope) -> Self {
        Self { token, stacks, scope, to_self: false }
    }

    /// Grant to the card's actor.
    #[must_use]
    pub fn on_self(token: TokenId, stacks: u32, scope: TokenScope) -> Self {
        Self { token, stacks, scope, to_self: true }
    }
}
