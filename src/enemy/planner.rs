//! Enemy action planning.
//!
//! Each turn the enemy picks a behavioral mode by weighted draw, converts
//! its ether pool to a slot count, and plans that many actions from its
//! deck with mode-dependent card weighting. The plan freezes for the
//! turn; a plan flagged `manually_modified` is reused verbatim instead of
//! regenerated, because silently replacing a locked-in plan is a
//! correctness bug, not a feature.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardInstance, CardKind, CardRegistry, HandleAllocator};
use crate::core::rng::BattleRng;
use crate::ether;

use super::EnemyGroup;

/// Behavioral mode, sticky for the turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyMode {
    /// Favors attacks.
    Aggressive,
    /// Favors defenses.
    Defensive,
    /// Uniform picks.
    Tactical,
}

impl EnemyMode {
    /// User-visible display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            EnemyMode::Aggressive => "공세",
            EnemyMode::Defensive => "수세",
            EnemyMode::Tactical => "책략",
        }
    }

    /// Card-pick weight under this mode.
    fn card_weight(self, kind: CardKind) -> f32 {
        match (self, kind) {
            (EnemyMode::Aggressive, CardKind::Attack) => 3.0,
            (EnemyMode::Defensive, CardKind::Defense) => 3.0,
            _ => 1.0,
        }
    }
}

/// Relative mode weights configured per enemy.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ModeWeights {
    pub aggressive: f32,
    pub defensive: f32,
    pub tactical: f32,
}

impl Default for ModeWeights {
    fn default() -> Self {
        Self { aggressive: 1.0, defensive: 1.0, tactical: 1.0 }
    }
}

/// One planned enemy action.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlannedAction {
    /// Unit index inside the group.
    pub unit: usize,
    pub card: CardInstance,
    /// Timeline position, assigned at planning time.
    pub sp: i32,
}

/// The enemy's frozen plan for one turn.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnemyPlan {
    pub mode: EnemyMode,
    pub actions: Vec<PlannedAction>,
    /// When set, re-planning reuses these actions verbatim.
    pub manually_modified: bool,
}

/// Plan the enemy turn.
///
/// Action count = ether-derived slot count, clamped to
/// `1..=cards_per_turn`. Each pick is weighted by the mode; cumulative
/// speed cost stops at the group's max speed. In multi-unit groups the
/// lead unit carries the real action and every other living unit gets a
/// synchronized ghost copy at the same position.
pub fn plan_turn(
    group: &EnemyGroup,
    registry: &CardRegistry,
    rng: &mut BattleRng,
    handles: &mut HandleAllocator,
) -> EnemyPlan {
    let mode = pick_mode(&group.config.mode_weights, rng);

    let slots = ether::calculate_slots(group.ether_pts);
    let budget = slots.clamp(1, group.config.cards_per_turn.max(1));

    let max_speed = group.max_speed();
    let mut actions = Vec::new();
    let mut cursor_sp = 0;

    for _ in 0..budget {
        let Some(card_id) = pick_card(&group.config.deck, mode, registry, rng) else {
            break;
        };
        let Some(def) = registry.get(card_id) else {
            continue;
        };

        if cursor_sp + def.speed_cost > max_speed {
            break;
        }
        cursor_sp += def.speed_cost;

        actions.push(PlannedAction {
            unit: 0,
            card: CardInstance::new(handles.alloc(), card_id),
            sp: cursor_sp,
        });

        // Synchronized ghost copies so the whole group acts together.
        for (idx, unit) in group.units.iter().enumerate().skip(1) {
            if unit.is_alive() {
                actions.push(PlannedAction {
                    unit: idx,
                    card: CardInstance::ghost(handles.alloc(), card_id),
                    sp: cursor_sp,
                });
            }
        }
    }

    EnemyPlan { mode, actions, manually_modified: false }
}

fn pick_mode(weights: &ModeWeights, rng: &mut BattleRng) -> EnemyMode {
    let table = [
        (EnemyMode::Aggressive, weights.aggressive),
        (EnemyMode::Defensive, weights.defensive),
        (EnemyMode::Tactical, weights.tactical),
    ];
    let raw: Vec<f32> = table.iter().map(|(_, w)| *w).collect();
    match rng.choose_weighted(&raw) {
        Some(i) => table[i].0,
        None => EnemyMode::Tactical,
    }
}

fn pick_card(
    deck: &[CardId],
    mode: EnemyMode,
    registry: &CardRegistry,
    rng: &mut BattleRng,
) -> Option<CardId> {
    if deck.is_empty() {
        return None;
    }
    let weights: Vec<f32> = deck
        .iter()
        .map(|&id| registry.get(id).map_or(0.0, |def| mode.card_weight(def.kind)))
        .collect();
    rng.choose_weighted(&weights).map(|i| deck[i])
}
