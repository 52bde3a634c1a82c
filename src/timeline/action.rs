//! Timeline actions: one scheduled card execution.

use serde::{Deserialize, Serialize};

use crate::cards::CardInstance;
use crate::core::ActorRef;

/// One action on the merged timeline.
///
/// Built once per turn by the scheduler. Read-only during execution,
/// except for `sp` mutations from the small set of repositioning effects
/// (push / advance / freeze), which only ever touch the unexecuted tail.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimelineAction {
    pub actor: ActorRef,
    pub card: CardInstance,
    /// Absolute timeline position at which the action fires.
    pub sp: i32,
}

impl TimelineAction {
    #[must_use]
    pub fn new(actor: ActorRef, card: CardInstance, sp: i32) -> Self {
        Self { actor, card, sp }
    }

    /// Sort key: ascending position, ghosts before non-ghosts on ties.
    #[must_use]
    pub fn order_key(&self) -> (i32, bool) {
        (self.sp, !self.card.is_ghost)
    }
}
