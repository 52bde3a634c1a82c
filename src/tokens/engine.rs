//! The stacked-token engine: apply, merge, and expire status tokens
//! across the three lifetime scopes.
//!
//! Every operation is pure: it takes the store by reference and returns
//! the updated store plus the human-readable log lines describing what
//! changed. Callers (the executor, the phase engine) commit the store and
//! merge the lines into the battle log. Nothing here touches shared
//! state, which keeps the whole engine testable in isolation.
//!
//! ## Scope rules
//!
//! - `Usage` stacks are consumed at the instant their trigger fires, by
//!   the consumer (`consume` below), never by `expire`.
//! - `Turn` stacks clear at the resolve-exit of their granting turn —
//!   except stacks granted mid-resolve, which must survive until the
//!   *next* turn boundary (the granting turn had already started when
//!   they appeared).
//! - `Permanent` stacks never auto-expire.
//!
//! ## Invariant
//!
//! Stacks are always positive. A token at zero stacks is absent from the
//! store, never stored as a zero entry.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::catalog::{TokenId, TokenScope};

/// Sentinel stack amount meaning "remove every stack".
pub const REMOVE_ALL: u32 = 99;

/// One stack entry inside a scope list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStack {
    pub token: TokenId,
    pub stacks: u32,
    /// Turn the stacks were granted on.
    pub granted_turn: u32,
    /// Whether the grant happened while the timeline was executing.
    pub granted_mid_resolve: bool,
    /// Timeline position of the granting action, for position-keyed
    /// tokens (growing defense).
    pub anchor_sp: Option<i32>,
}

/// Grant-time context recorded on each stack entry.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct GrantCtx {
    pub turn_number: u32,
    pub mid_resolve: bool,
    pub current_sp: Option<i32>,
}

impl GrantCtx {
    /// Context for a grant during the select phase.
    #[must_use]
    pub fn at_select(turn_number: u32) -> Self {
        Self { turn_number, mid_resolve: false, current_sp: None }
    }

    /// Context for a grant while the timeline is executing.
    #[must_use]
    pub fn mid_resolve(turn_number: u32, sp: i32) -> Self {
        Self { turn_number, mid_resolve: true, current_sp: Some(sp) }
    }
}

/// Result of a pure token operation: the new store plus log lines.
#[derive(Clone, Debug)]
pub struct TokenApplication {
    pub store: TokenStore,
    pub log: Vec<String>,
}

/// Flattened view of one stack entry, for UI and resolver consumption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenView {
    pub token: TokenId,
    pub scope: TokenScope,
    pub stacks: u32,
}

/// Per-entity token storage: three disjoint stack lists by scope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStore {
    usage: SmallVec<[TokenStack; 4]>,
    turn: SmallVec<[TokenStack; 4]>,
    permanent: SmallVec<[TokenStack; 4]>,
}

impl TokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&self, scope: TokenScope) -> &SmallVec<[TokenStack; 4]> {
        match scope {
            TokenScope::Usage => &self.usage,
            TokenScope::Turn => &self.turn,
            TokenScope::Permanent => &self.permanent,
        }
    }

    fn list_mut(&mut self, scope: TokenScope) -> &mut SmallVec<[TokenStack; 4]> {
        match scope {
            TokenScope::Usage => &mut self.usage,
            TokenScope::Turn => &mut self.turn,
            TokenScope::Permanent => &mut self.permanent,
        }
    }

    /// Add stacks, merging into an existing same-scope entry.
    ///
    /// Merging refreshes the grant window: the entry takes the later
    /// grant's turn and mid-resolve flag, so a refreshed token survives
    /// as long as its newest stacks would.
    #[must_use]
    pub fn add(
        &self,
        token: TokenId,
        scope: TokenScope,
        stacks: u32,
        ctx: GrantCtx,
        owner: &str,
    ) -> TokenApplication {
        let mut store = self.clone();
        let mut log = Vec::new();

        if stacks == 0 {
            return TokenApplication { store, log };
        }

        let list = store.list_mut(scope);
        if let Some(entry) = list.iter_mut().find(|s| s.token == token) {
            entry.stacks += stacks;
            entry.granted_turn = ctx.turn_number;
            entry.granted_mid_resolve = ctx.mid_resolve;
            if entry.anchor_sp.is_none() {
                entry.anchor_sp = ctx.current_sp;
            }
        } else {
            list.push(TokenStack {
                token,
                stacks,
                granted_turn: ctx.turn_number,
                granted_mid_resolve: ctx.mid_resolve,
                anchor_sp: ctx.current_sp,
            });
        }

        log.push(format!("{owner}: {} +{stacks}", token.name()));
        TokenApplication { store, log }
    }

    /// Remove stacks from one scope. `REMOVE_ALL` clears the entry.
    #[must_use]
    pub fn remove(
        &self,
        token: TokenId,
        scope: TokenScope,
        amount: u32,
        owner: &str,
    ) -> TokenApplication {
        let mut store = self.clone();
        let mut log = Vec::new();

        let list = store.list_mut(scope);
        if let Some(pos) = list.iter().position(|s| s.token == token) {
            let entry = &mut list[pos];
            let removed = if amount >= REMOVE_ALL { entry.stacks } else { amount.min(entry.stacks) };
            entry.stacks -= removed;
            if removed > 0 {
                log.push(format!("{owner}: {} -{removed}", token.name()));
            }
            if entry.stacks == 0 {
                list.remove(pos);
            }
        }

        TokenApplication { store, log }
    }

    /// Flatten the three scope lists into a unified view.
    #[must_use]
    pub fn get_all(&self) -> Vec<TokenView> {
        let mut all = Vec::with_capacity(self.usage.len() + self.turn.len() + self.permanent.len());
        for (scope, list) in [
            (TokenScope::Usage, &self.usage),
            (TokenScope::Turn, &self.turn),
            (TokenScope::Permanent, &self.permanent),
        ] {
            for entry in list {
                all.push(TokenView { token: entry.token, scope, stacks: entry.stacks });
            }
        }
        all
    }

    /// Turn-boundary expiration at resolve-exit of `turn_number`.
    ///
    /// `Turn` stacks granted before resolve clear now; stacks granted
    /// mid-resolve this same turn survive one more boundary. `Usage`
    /// stacks are untouched and `Permanent` stacks never expire.
    /// `current_sp` is the final cursor position of the ending resolve;
    /// the next turn's timeline restarts at zero, so surviving
    /// position-anchored stacks re-anchor to the origin.
    #[must_use]
    pub fn expire(&self, turn_number: u32, current_sp: i32, owner: &str) -> TokenApplication {
        let mut store = self.clone();
        let mut log = Vec::new();

        store.turn.retain(|entry| {
            let survives = entry.granted_mid_resolve && entry.granted_turn == turn_number;
            if !survives {
                log.push(format!("{owner}: {} 소멸", entry.token.name()));
            }
            survives
        });

        // Survivors measure the fresh timeline from its origin. An
        // anchor the cursor never reached paid nothing and must not
        // start paying retroactively, so it keeps its position.
        for entry in store.turn.iter_mut().chain(store.permanent.iter_mut()) {
            entry.granted_mid_resolve = false;
            if let Some(anchor) = entry.anchor_sp {
                if anchor <= current_sp {
                    entry.anchor_sp = Some(0);
                }
            }
        }

        TokenApplication { store, log }
    }

    /// Total stacks of a token across all scopes.
    #[must_use]
    pub fn stacks_of(&self, token: TokenId) -> u32 {
        [TokenScope::Usage, TokenScope::Turn, TokenScope::Permanent]
            .iter()
            .map(|&scope| self.stacks_in(token, scope))
            .sum()
    }

    /// Stacks of a token within one scope.
    #[must_use]
    pub fn stacks_in(&self, token: TokenId, scope: TokenScope) -> u32 {
        self.list(scope)
            .iter()
            .find(|s| s.token == token)
            .map_or(0, |s| s.stacks)
    }

    #[must_use]
    pub fn has(&self, token: TokenId) -> bool {
        self.stacks_of(token) > 0
    }

    /// Max-speed bonus from focus stacks (turn + permanent scopes).
    #[must_use]
    pub fn speed_bonus(&self) -> i32 {
        (self.stacks_in(TokenId::Focus, TokenScope::Turn)
            + self.stacks_in(TokenId::Focus, TokenScope::Permanent)) as i32
    }

    /// Whether block is retained across the turn boundary.
    #[must_use]
    pub fn retains_block(&self) -> bool {
        self.has(TokenId::Vigilance)
    }

    /// Block gained from growing-defense stacks as the timeline cursor
    /// moves from `prev_sp` to `new_sp`.
    ///
    /// Growth only counts cursor distance past each stack's anchor, so a
    /// stack granted mid-resolve does not retroactively pay out for the
    /// portion of the timeline already executed.
    #[must_use]
    pub fn growth_block(&self, prev_sp: i32, new_sp: i32) -> i32 {
        let mut gain = 0i32;
        for list in [&self.turn, &self.permanent] {
            for entry in list.iter().filter(|s| s.token == TokenId::GrowingDefense) {
                let from = prev_sp.max(entry.anchor_sp.unwrap_or(0));
                let advanced = (new_sp - from).max(0);
                gain += entry.stacks as i32 * advanced;
            }
        }
        gain
    }
}
