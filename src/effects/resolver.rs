//! Special-effect resolution.
//!
//! Dispatch is split in two because some specials change the damage
//! math itself while the rest react to it:
//!
//! - [`damage_plan`] is consulted by the executor *before* the damage
//!   roll (solo-attack doubling, unused-attack repeats, block bypass).
//! - [`resolve_special`] runs *after* the damage step and performs the
//!   stateful part: repositioning, conjuring, executes, block theft.
//!
//! Each handler fires exactly once per action execution, never per hit.
//! A conjure with more than one option suspends resolution by returning
//! a `ChoiceRequest`; the engine parks it on the state and the executor
//! refuses to step until the choice arrives.

use crate::battle::state::{BattleState, ChoiceRequest};
use crate::cards::{CardId, CardInstance, CardKind, CardRegistry};
use crate::core::ActorRef;
use crate::timeline::{scheduler, TimelineAction};

use super::special::SpecialEffect;

/// Damage-math adjustments contributed by a special.
#[derive(Clone, Copy, Debug)]
pub struct DamagePlan {
    pub multiplier: f64,
    pub extra_hits: u32,
    pub ignore_block: bool,
}

impl Default for DamagePlan {
    fn default() -> Self {
        Self { multiplier: 1.0, extra_hits: 0, ignore_block: false }
    }
}

/// Compute the damage-plan contribution of a special, if any.
#[must_use]
pub fn damage_plan(
    effect: Option<&SpecialEffect>,
    state: &BattleState,
    registry: &CardRegistry,
) -> DamagePlan {
    let mut plan = DamagePlan::default();
    let Some(effect) = effect else {
        return plan;
    };

    match effect {
        SpecialEffect::DoubleIfSoloAttack => {
            let attacks = count_attacks(&state.selected, registry);
            if attacks == 1 {
                plan.multiplier = 2.0;
            }
        }
        SpecialEffect::RepeatPerUnusedAttack => {
            plan.extra_hits = count_attacks(&state.hand, registry);
        }
        SpecialEffect::IgnoreBlock => {
            plan.ignore_block = true;
        }
        _ => {}
    }

    plan
}

fn count_attacks(cards: &[CardInstance], registry: &CardRegistry) -> u32 {
    cards
        .iter()
        .filter(|c| {
            !c.is_ghost
                && registry.get(c.card_id).map_or(false, |def| def.kind == CardKind::Attack)
        })
        .count() as u32
}

/// Result of the stateful dispatch.
#[derive(Clone, Debug)]
pub enum SpecialOutcome {
    Done,
    /// Resolution must pause until the player chooses.
    Awaiting(ChoiceRequest),
}

/// Run the stateful part of a special effect.
///
/// `current_sp` is the timeline position of the triggering action;
/// conjured ghosts splice in there. Repositioning only ever touches the
/// unexecuted tail of the queue.
pub fn resolve_special(
    state: &mut BattleState,
    registry: &CardRegistry,
    actor: ActorRef,
    target: ActorRef,
    effect: &SpecialEffect,
    current_sp: i32,
) -> SpecialOutcome {
    match effect {
        SpecialEffect::Push { amount } => {
            reposition_next(state, registry, actor, false, |sp, max| (sp + amount).clamp(0, max));
            SpecialOutcome::Done
        }
        SpecialEffect::Advance { amount } => {
            reposition_next(state, registry, actor, true, |sp, max| (sp - amount).clamp(0, max));
            SpecialOutcome::Done
        }
        SpecialEffect::Freeze => {
            reposition_next(state, registry, actor, false, |_, max| max);
            SpecialOutcome::Done
        }
        SpecialEffect::Conjure { choices, copies } => {
            if choices.len() == 1 {
                spawn_ghosts(state, registry, actor, choices[0], *copies, current_sp);
                SpecialOutcome::Done
            } else {
                SpecialOutcome::Awaiting(ChoiceRequest {
                    actor,
                    options: choices.clone(),
                    copies: *copies,
                    at_sp: current_sp,
                })
            }
        }
        SpecialEffect::ExecuteBelow { pct } => {
            let Some(entity) = state.entity_mut(target) else {
                return SpecialOutcome::Done;
            };
            let threshold = entity.max_hp * (*pct as i32) / 100;
            if entity.is_alive() && entity.hp <= threshold {
                let name = entity.name.clone();
                entity.damage_hp(entity.hp);
                state.log.push(format!("{name} 처형!"));
            }
            SpecialOutcome::Done
        }
        SpecialEffect::StealBlock => {
            let stolen = match state.entity_mut(target) {
                Some(entity) => {
                    let b = entity.block;
                    entity.block = 0;
                    b
                }
                None => 0,
            };
            if stolen > 0 {
                if let Some(entity) = state.entity_mut(actor) {
                    entity.gain_block(stolen);
                    let name = entity.name.clone();
                    state.log.push(format!("{name}: 막기 {stolen} 강탈"));
                }
            }
            SpecialOutcome::Done
        }
        SpecialEffect::ClearBlock => {
            match target {
                ActorRef::Player => state.player.block = 0,
                ActorRef::Enemy(_) => {
                    for unit in &mut state.enemy.units {
                        unit.block = 0;
                    }
                }
            }
            state.log.push("방어 분쇄!".to_string());
            SpecialOutcome::Done
        }
        SpecialEffect::GainCounter { amount } => {
            if let Some(entity) = state.entity_mut(actor) {
                entity.counter += (*amount).max(0);
                let name = entity.name.clone();
                let total = entity.counter;
                state.log.push(format!("{name}: 반격 {total}"));
            }
            SpecialOutcome::Done
        }
        SpecialEffect::Rend { pct } => {
            if let Some(entity) = state.entity_mut(target) {
                entity.damage_taken_pct = entity.damage_taken_pct.max((*pct).max(100));
                let name = entity.name.clone();
                state.log.push(format!("{name}: 상처 깊어짐 ({pct}%)"));
            }
            SpecialOutcome::Done
        }
        // Folded into the damage plan; nothing stateful to do here.
        SpecialEffect::DoubleIfSoloAttack
        | SpecialEffect::RepeatPerUnusedAttack
        | SpecialEffect::IgnoreBlock => SpecialOutcome::Done,
    }
}

/// Spawn `copies` ghost actions of `card_id` at `at_sp` and splice them
/// into the unexecuted tail. Also used by the engine when a suspended
/// choice resumes.
pub fn spawn_ghosts(
    state: &mut BattleState,
    registry: &CardRegistry,
    actor: ActorRef,
    card_id: CardId,
    copies: u32,
    at_sp: i32,
) {
    let Some(def) = registry.get(card_id) else {
        state.log.push(format!("알 수 없는 카드: {card_id}"));
        return;
    };
    let name = def.name.clone();

    let ghosts: Vec<TimelineAction> = (0..copies.max(1))
        .map(|_| {
            let instance = CardInstance::ghost(state.handles.alloc(), card_id);
            TimelineAction::new(actor, instance, at_sp)
        })
        .collect();
    let spawned = ghosts.len();

    let q_index = state.q_index;
    scheduler::splice(&mut state.queue, q_index, ghosts);
    state.log.push(format!("{name} x{spawned} 생성"));
}

/// Reposition the next unexecuted action on the actor's own side
/// (`own == true`) or the opposing side, clamped to the owning side's
/// timeline budget.
fn reposition_next(
    state: &mut BattleState,
    registry: &CardRegistry,
    actor: ActorRef,
    own: bool,
    new_sp: impl Fn(i32, i32) -> i32,
) {
    let want_player_action = actor.is_player() == own;
    let from = state.q_index;
    let found = state.queue[from..]
        .iter()
        .position(|a| a.actor.is_player() == want_player_action);

    if let Some(offset) = found {
        let idx = from + offset;
        let side = state.queue[idx].actor;
        let max = state.side_max_speed(side);
        let old = state.queue[idx].sp;
        let new = new_sp(old, max);
        state.queue[idx].sp = new;

        let card_id = state.queue[idx].card.card_id;
        let card_name = registry
            .get(card_id)
            .map_or_else(|| card_id.to_string(), |def| def.name.clone());
        state.log.push(format!("{card_name}: {old} → {new}"));

        let q_index = state.q_index;
        scheduler::resort_tail(&mut state.queue, q_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::Phase;
    use crate::cards::catalog::{ids, starter_registry};
    use crate::cards::HandleAllocator;
    use crate::core::Entity;
    use crate::enemy::{EnemyConfig, EnemyGroup, ModeWeights};

    fn test_state() -> BattleState {
        let player = Entity::new("플레이어", 80, 10, 6).with_ether(100);
        let enemy = EnemyGroup::new(
            vec![Entity::new("적", 30, 8, 3)],
            EnemyConfig {
                mode_weights: ModeWeights::default(),
                cards_per_turn: 2,
                deck: vec![],
                ether_regen: 10,
            },
        )
        .with_ether(100);
        let mut state = BattleState::new(player, enemy);
        state.phase = Phase::Resolve;
        state
    }

    fn enemy_action(state: &mut BattleState, sp: i32) -> TimelineAction {
        let card = CardInstance::new(state.handles.alloc(), ids::ENEMY_STRIKE);
        TimelineAction::new(ActorRef::Enemy(0), card, sp)
    }

    #[test]
    fn test_push_delays_opposing_action() {
        let registry = starter_registry();
        let mut state = test_state();
        let action = enemy_action(&mut state, 4);
        state.queue.push(action);

        resolve_special(
            &mut state,
            &registry,
            ActorRef::Player,
            ActorRef::Enemy(0),
            &SpecialEffect::Push { amount: 2 },
            3,
        );

        assert_eq!(state.queue[0].sp, 6);
    }

    #[test]
    fn test_push_clamps_to_side_max_speed() {
        let registry = starter_registry();
        let mut state = test_state();
        let action = enemy_action(&mut state, 7);
        state.queue.push(action);

        resolve_special(
            &mut state,
            &registry,
            ActorRef::Player,
            ActorRef::Enemy(0),
            &SpecialEffect::Push { amount: 10 },
            3,
        );

        // Enemy max speed is 8.
        assert_eq!(state.queue[0].sp, 8);
    }

    #[test]
    fn test_advance_hastens_own_action() {
        let registry = starter_registry();
        let mut state = test_state();
        let card = CardInstance::new(state.handles.alloc(), ids::SLASH);
        state.queue.push(TimelineAction::new(ActorRef::Player, card, 5));

        resolve_special(
            &mut state,
            &registry,
            ActorRef::Player,
            ActorRef::Enemy(0),
            &SpecialEffect::Advance { amount: 2 },
            3,
        );

        assert_eq!(state.queue[0].sp, 3);
    }

    #[test]
    fn test_freeze_moves_to_timeline_end() {
        let registry = starter_registry();
        let mut state = test_state();
        let action = enemy_action(&mut state, 2);
        state.queue.push(action);

        resolve_special(
            &mut state,
            &registry,
            ActorRef::Player,
            ActorRef::Enemy(0),
            &SpecialEffect::Freeze,
            1,
        );

        assert_eq!(state.queue[0].sp, 8);
    }

    #[test]
    fn test_executed_prefix_is_never_repositioned() {
        let registry = starter_registry();
        let mut state = test_state();
        let first = enemy_action(&mut state, 1);
        let second = enemy_action(&mut state, 5);
        state.queue.push(first);
        state.queue.push(second);
        state.q_index = 1; // first already executed

        resolve_special(
            &mut state,
            &registry,
            ActorRef::Player,
            ActorRef::Enemy(0),
            &SpecialEffect::Push { amount: 2 },
            3,
        );

        assert_eq!(state.queue[0].sp, 1);
        assert_eq!(state.queue[1].sp, 7);
    }

    #[test]
    fn test_single_option_conjure_spawns_immediately() {
        let registry = starter_registry();
        let mut state = test_state();

        let outcome = resolve_special(
            &mut state,
            &registry,
            ActorRef::Player,
            ActorRef::Enemy(0),
            &SpecialEffect::Conjure { choices: vec![ids::PHANTOM_SLASH], copies: 2 },
            4,
        );

        assert!(matches!(outcome, SpecialOutcome::Done));
        assert_eq!(state.queue.len(), 2);
        assert!(state.queue.iter().all(|a| a.card.is_ghost && a.sp == 4));
    }

    #[test]
    fn test_multi_option_conjure_awaits_choice() {
        let registry = starter_registry();
        let mut state = test_state();

        let outcome = resolve_special(
            &mut state,
            &registry,
            ActorRef::Player,
            ActorRef::Enemy(0),
            &SpecialEffect::Conjure {
                choices: vec![ids::PHANTOM_SLASH, ids::PHANTOM_THRUST],
                copies: 2,
            },
            4,
        );

        match outcome {
            SpecialOutcome::Awaiting(req) => {
                assert_eq!(req.options.len(), 2);
                assert_eq!(req.copies, 2);
                assert_eq!(req.at_sp, 4);
            }
            SpecialOutcome::Done => panic!("expected a pending choice"),
        }
        assert!(state.queue.is_empty());
    }

    #[test]
    fn test_execute_below_threshold() {
        let registry = starter_registry();
        let mut state = test_state();
        // 30 max HP, 30% threshold = 9.
        state.enemy.units[0].hp = 9;

        resolve_special(
            &mut state,
            &registry,
            ActorRef::Player,
            ActorRef::Enemy(0),
            &SpecialEffect::ExecuteBelow { pct: 30 },
            0,
        );

        assert_eq!(state.enemy.units[0].hp, 0);
        assert!(state.log.contains("처형"));
    }

    #[test]
    fn test_execute_above_threshold_is_noop() {
        let registry = starter_registry();
        let mut state = test_state();
        state.enemy.units[0].hp = 10;

        resolve_special(
            &mut state,
            &registry,
            ActorRef::Player,
            ActorRef::Enemy(0),
            &SpecialEffect::ExecuteBelow { pct: 30 },
            0,
        );

        assert_eq!(state.enemy.units[0].hp, 10);
    }

    #[test]
    fn test_steal_block() {
        let registry = starter_registry();
        let mut state = test_state();
        state.enemy.units[0].gain_block(7);

        resolve_special(
            &mut state,
            &registry,
            ActorRef::Player,
            ActorRef::Enemy(0),
            &SpecialEffect::StealBlock,
            0,
        );

        assert_eq!(state.enemy.units[0].block, 0);
        assert_eq!(state.player.block, 7);
    }

    #[test]
    fn test_clear_block_hits_whole_side() {
        let registry = starter_registry();
        let mut state = test_state();
        state.enemy.units.push(Entity::new("적 2", 30, 8, 3));
        state.enemy.units[0].gain_block(4);
        state.enemy.units[1].gain_block(9);

        resolve_special(
            &mut state,
            &registry,
            ActorRef::Player,
            ActorRef::Enemy(0),
            &SpecialEffect::ClearBlock,
            0,
        );

        assert_eq!(state.enemy.units[0].block, 0);
        assert_eq!(state.enemy.units[1].block, 0);
    }

    #[test]
    fn test_gain_counter_accumulates_on_actor() {
        let registry = starter_registry();
        let mut state = test_state();

        for _ in 0..2 {
            resolve_special(
                &mut state,
                &registry,
                ActorRef::Player,
                ActorRef::Enemy(0),
                &SpecialEffect::GainCounter { amount: 4 },
                0,
            );
        }

        assert_eq!(state.player.counter, 8);
    }

    #[test]
    fn test_rend_raises_damage_taken_pct() {
        let registry = starter_registry();
        let mut state = test_state();

        resolve_special(
            &mut state,
            &registry,
            ActorRef::Player,
            ActorRef::Enemy(0),
            &SpecialEffect::Rend { pct: 150 },
            0,
        );
        assert_eq!(state.enemy.units[0].damage_taken_pct, 150);

        // A weaker rend never lowers an existing one.
        resolve_special(
            &mut state,
            &registry,
            ActorRef::Player,
            ActorRef::Enemy(0),
            &SpecialEffect::Rend { pct: 120 },
            0,
        );
        assert_eq!(state.enemy.units[0].damage_taken_pct, 150);
    }

    #[test]
    fn test_damage_plan_solo_attack_doubles() {
        let registry = starter_registry();
        let mut state = test_state();
        let mut alloc = HandleAllocator::new();
        state.selected = vec![CardInstance::new(alloc.alloc(), ids::DUEL)];

        let plan = damage_plan(Some(&SpecialEffect::DoubleIfSoloAttack), &state, &registry);
        assert_eq!(plan.multiplier, 2.0);

        // A second attack in the submission cancels the bonus.
        state.selected.push(CardInstance::new(alloc.alloc(), ids::SLASH));
        let plan = damage_plan(Some(&SpecialEffect::DoubleIfSoloAttack), &state, &registry);
        assert_eq!(plan.multiplier, 1.0);
    }

    #[test]
    fn test_damage_plan_relay_counts_unused_attacks() {
        let registry = starter_registry();
        let mut state = test_state();
        let mut alloc = HandleAllocator::new();
        state.hand = vec![
            CardInstance::new(alloc.alloc(), ids::SLASH),
            CardInstance::new(alloc.alloc(), ids::HEAVY_BLOW),
            CardInstance::new(alloc.alloc(), ids::GUARD),
        ];

        let plan = damage_plan(Some(&SpecialEffect::RepeatPerUnusedAttack), &state, &registry);
        assert_eq!(plan.extra_hits, 2);
        assert_eq!(plan.multiplier, 1.0);
    }
}
