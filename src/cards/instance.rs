//! Card instances - per-battle card state.
//!
//! A `CardInstance` is one copy of a catalog card inside a battle. The
//! `CardHandle` is its identity tag: it survives draw, discard, timeline
//! placement, and mid-resolve repositioning, so the combo detector and
//! the UI can track one physical card through the whole turn.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::{CardDefinition, CardId, TraitId};

/// Unique per-battle identity of one card copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardHandle(pub u32);

impl std::fmt::Display for CardHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Allocates battle-unique card handles.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HandleAllocator {
    next: u32,
}

impl HandleAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next handle.
    pub fn alloc(&mut self) -> CardHandle {
        let handle = CardHandle(self.next);
        self.next += 1;
        handle
    }
}

/// One copy of a card inside a battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardInstance {
    /// Battle-unique identity tag.
    pub handle: CardHandle,

    /// The catalog entry this copy refers to.
    pub card_id: CardId,

    /// Scheduler-created mid-resolve, rather than chosen during select.
    /// Ghost cards never count toward combos and win ordering ties.
    pub is_ghost: bool,

    /// Enhancement level; each level adds flat damage/block.
    pub enhancement: u8,

    /// Growth-applied traits on top of the definition's.
    pub granted_traits: SmallVec<[TraitId; 2]>,
}

impl CardInstance {
    /// Create a normal (non-ghost) instance.
    #[must_use]
    pub fn new(handle: CardHandle, card_id: CardId) -> Self {
        Self {
            handle,
            card_id,
            is_ghost: false,
            enhancement: 0,
            granted_traits: SmallVec::new(),
        }
    }

    /// Create a ghost instance (scheduler-spawned mid-resolve).
    #[must_use]
    pub fn ghost(handle: CardHandle, card_id: CardId) -> Self {
        Self {
            handle,
            card_id,
            is_ghost: true,
            enhancement: 0,
            granted_traits: SmallVec::new(),
        }
    }

    /// Grant a growth trait (builder style).
    #[must_use]
    pub fn with_granted_trait(mut self, t: TraitId) -> Self {
        if !self.granted_traits.contains(&t) {
            self.granted_traits.push(t);
        }
        self
    }

    /// Instance-level trait lookup: definition traits plus granted ones.
    #[must_use]
    pub fn has_trait(&self, def: &CardDefinition, t: TraitId) -> bool {
        def.has_trait(t) || self.granted_traits.contains(&t)
    }
}
