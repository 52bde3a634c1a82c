//! Timeline construction: merging player and enemy actions into one
//! ascending-position queue.
//!
//! Player cards take a cumulative position equal to the running sum of
//! speed costs in the chosen order; `Opener`-trait cards insert at the
//! front instead. Enemy actions arrive with positions assigned at
//! planning time. The merge is a stable sort by position with one
//! tie-break: ghost actions fire before non-ghost actions at the same
//! position.
//!
//! Mid-resolve insertions (`splice`) and repositioning only ever re-sort
//! the unexecuted tail — the executed prefix is immutable history.

use crate::cards::{CardInstance, CardRegistry, TraitId};
use crate::core::ActorRef;
use crate::enemy::EnemyPlan;

use super::action::TimelineAction;

/// Assign cumulative timeline positions to the player's submission.
///
/// Cards missing from the registry are skipped here and logged by the
/// executor if they somehow reach the queue.
#[must_use]
pub fn assign_player_sp(
    selected: &[CardInstance],
    registry: &CardRegistry,
) -> Vec<TimelineAction> {
    let mut actions = Vec::with_capacity(selected.len());
    let mut cursor = 0;

    for inst in selected {
        let Some(def) = registry.get(inst.card_id) else {
            continue;
        };
        let sp = if inst.has_trait(def, TraitId::Opener) {
            0
        } else {
            cursor += def.speed_cost;
            cursor
        };
        actions.push(TimelineAction::new(ActorRef::Player, inst.clone(), sp));
    }

    actions
}

/// Merge the player's submission with the enemy plan into one queue.
#[must_use]
pub fn build_queue(
    selected: &[CardInstance],
    registry: &CardRegistry,
    plan: Option<&EnemyPlan>,
) -> Vec<TimelineAction> {
    let mut queue = assign_player_sp(selected, registry);

    if let Some(plan) = plan {
        for planned in &plan.actions {
            queue.push(TimelineAction::new(
                ActorRef::Enemy(planned.unit),
                planned.card.clone(),
                planned.sp,
            ));
        }
    }

    sort_queue(&mut queue);
    queue
}

/// Stable sort by position with the ghost-first tie-break.
pub fn sort_queue(queue: &mut [TimelineAction]) {
    queue.sort_by_key(TimelineAction::order_key);
}

/// Re-sort only the unexecuted tail starting at `q_index`.
pub fn resort_tail(queue: &mut [TimelineAction], q_index: usize) {
    if q_index < queue.len() {
        queue[q_index..].sort_by_key(TimelineAction::order_key);
    }
}

/// Insert mid-resolve actions into the unexecuted tail.
pub fn splice(
    queue: &mut Vec<TimelineAction>,
    q_index: usize,
    new: impl IntoIterator<Item = TimelineAction>,
) {
    queue.extend(new);
    resort_tail(queue, q_index);
}
