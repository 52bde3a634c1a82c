//! Queue execution: one timeline step at a time.
//!
//! `step` advances the cursor past the next action and resolves it in
//! full: damage math with strength, combo, and token modifiers; block
//! absorption; card token grants; the special effect (exactly once, even
//! for multi-hit cards); position-keyed token payouts; and the victory
//! check. Damage math is the shared formula
//!
//! ```text
//! base       = stat + strength + bonus
//! multiplied = floor(base * multiplier)
//! final      = multiplied + flat
//! ```
//!
//! with block absorbing `min(damage, block)` before HP. HP damage dealt
//! transfers ether from the defender's pool to the attacker's, which is
//! what makes ether depletion an alternate way to win or lose.
//!
//! Unknown card ids and dead actors skip their action with a log line —
//! data-driven content must never crash an in-progress battle.

use crate::battle::state::{BattleState, Phase};
use crate::cards::{CardDefinition, CardKind, CardRegistry, TraitId};
use crate::core::ActorRef;
use crate::effects::{self, SpecialEffect, SpecialOutcome};
use crate::ether;
use crate::timeline::TimelineAction;
use crate::tokens::{GrantCtx, TokenId, TokenScope};

/// How a finished battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BattleOutcome {
    VictoryByHp,
    VictoryByEther,
    DefeatByHp,
    DefeatByEther,
}

impl BattleOutcome {
    #[must_use]
    pub fn is_victory(self) -> bool {
        matches!(self, BattleOutcome::VictoryByHp | BattleOutcome::VictoryByEther)
    }
}

/// Result of one executor step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Action resolved; more remain.
    Continue,
    /// A card-creation choice is pending; stepping resumes after
    /// `resume_choice`.
    AwaitingChoice,
    /// The queue is exhausted.
    ResolveComplete,
    /// A side ran out of HP or ether.
    BattleOver(BattleOutcome),
}

/// Flat damage granted to cooperation cards inside a matched combo.
pub const COOPERATION_BONUS: i32 = 3;

/// The shared attack formula.
#[must_use]
pub fn attack_damage(stat: i32, strength: i32, bonus: i32, multiplier: f64, flat: i32) -> i32 {
    let base = stat + strength + bonus;
    let multiplied = ((base as f64) * multiplier).floor() as i32;
    (multiplied + flat).max(0)
}

/// Evaluate the end conditions. Defeat is checked before victory so a
/// simultaneous wipe counts against the player.
#[must_use]
pub fn check_outcome(state: &BattleState) -> Option<BattleOutcome> {
    if !state.player.is_alive() {
        return Some(BattleOutcome::DefeatByHp);
    }
    if state.player.ether_pts <= 0 {
        return Some(BattleOutcome::DefeatByEther);
    }
    if !state.enemy.any_alive() {
        return Some(BattleOutcome::VictoryByHp);
    }
    if state.enemy.ether_pts <= 0 {
        return Some(BattleOutcome::VictoryByEther);
    }
    None
}

/// Execute one timeline step.
pub fn step(state: &mut BattleState, registry: &CardRegistry) -> StepOutcome {
    if state.pending_choice.is_some() {
        return StepOutcome::AwaitingChoice;
    }
    if state.q_index >= state.queue.len() {
        return StepOutcome::ResolveComplete;
    }

    let prev_sp = if state.q_index == 0 { 0 } else { state.queue[state.q_index - 1].sp };
    let action = state.queue[state.q_index].clone();
    state.q_index += 1;

    let Some(def) = registry.get(action.card.card_id).cloned() else {
        state.log.push(format!("알 수 없는 카드: {} — 행동 생략", action.card.card_id));
        return StepOutcome::Continue;
    };

    if !state.entity(action.actor).map_or(false, |e| e.is_alive()) {
        state.log.push(format!("{}의 {} 생략 (전투 불능)", action.actor, def.name));
        return StepOutcome::Continue;
    }

    let target = state.default_target(action.actor);

    let special = match def.special.as_deref() {
        Some(key) => {
            let parsed = SpecialEffect::parse(key);
            if parsed.is_none() {
                state.log.push(format!("알 수 없는 특수 효과: {key}"));
            }
            parsed
        }
        None => None,
    };

    if def.damage > 0 {
        if let Some(target) = target {
            perform_attack(state, registry, &action, &def, special.as_ref(), target);
        }
    }

    if def.block > 0 {
        let gain = def.block + i32::from(action.card.enhancement);
        if let Some(entity) = state.entity_mut(action.actor) {
            entity.gain_block(gain);
            let name = entity.name.clone();
            state.log.push(format!("{name}: 막기 +{gain}"));
        }
    }

    apply_card_tokens(state, &action, &def);

    let mut awaiting = false;
    if let (Some(effect), Some(target)) = (special.as_ref(), target) {
        match effects::resolve_special(state, registry, action.actor, target, effect, action.sp) {
            SpecialOutcome::Awaiting(request) => {
                state.pending_choice = Some(request);
                awaiting = true;
            }
            SpecialOutcome::Done => {}
        }
    }

    apply_positional_growth(state, prev_sp, action.sp);

    if let Some(outcome) = check_outcome(state) {
        finish_battle(state, outcome);
        return StepOutcome::BattleOver(outcome);
    }

    if awaiting {
        StepOutcome::AwaitingChoice
    } else {
        StepOutcome::Continue
    }
}

/// Mark the terminal phase and log the result.
pub fn finish_battle(state: &mut BattleState, outcome: BattleOutcome) {
    state.phase = if outcome.is_victory() { Phase::Victory } else { Phase::Defeat };
    let line = match outcome {
        BattleOutcome::VictoryByHp => "승리!",
        BattleOutcome::VictoryByEther => "승리! (에테르 고갈)",
        BattleOutcome::DefeatByHp => "패배…",
        BattleOutcome::DefeatByEther => "패배… (에테르 고갈)",
    };
    state.log.push(line.to_string());
}

fn perform_attack(
    state: &mut BattleState,
    registry: &CardRegistry,
    action: &TimelineAction,
    def: &CardDefinition,
    special: Option<&SpecialEffect>,
    target_ref: ActorRef,
) {
    let plan = effects::damage_plan(special, state, registry);

    let (strength, attacker_name, attacker_weak) = match state.entity(action.actor) {
        Some(a) => (a.strength, a.name.clone(), a.tokens.has(TokenId::Weak)),
        None => return,
    };
    let (taken_pct, target_vulnerable, target_name) = match state.entity(target_ref) {
        Some(t) => (t.damage_taken_pct, t.tokens.has(TokenId::Vulnerable), t.name.clone()),
        None => return,
    };

    let mut multiplier = plan.multiplier;

    // The combo multiplier is consumed by the first matched attack of
    // the resolve. Exactly once, not per matched card.
    let combo_hit = state
        .combo
        .as_ref()
        .filter(|c| c.rank > 0 && c.includes(action.card.handle))
        .map(|c| (c.multiplier, c.kind));
    if def.kind == CardKind::Attack && !state.combo_bonus_spent {
        if let Some((combo_mult, combo_kind)) = combo_hit {
            multiplier *= combo_mult;
            state.combo_bonus_spent = true;
            state.log.push(format!("콤보 보너스: {} x{combo_mult}", combo_kind.name()));
        }
    }

    if attacker_weak {
        multiplier *= 0.75;
    }
    if target_vulnerable {
        multiplier *= 1.5;
    }

    // Cooperation cards strike harder inside a matched combo.
    let in_combo = state.combo.as_ref().map_or(false, |c| c.includes(action.card.handle));
    let flat = if in_combo && action.card.has_trait(def, TraitId::Cooperation) {
        COOPERATION_BONUS
    } else {
        0
    };

    let enhancement = i32::from(action.card.enhancement);
    let per_hit = attack_damage(def.damage, strength, enhancement, multiplier, flat);
    let per_hit = per_hit * taken_pct / 100;

    let hits = def.hits + plan.extra_hits;
    let mut total_hp_loss = 0;
    let mut total_blocked = 0;
    let mut hits_landed = 0u32;

    for _ in 0..hits {
        // A usage-scope barrier consumes itself on the hit it negates.
        let mut negated_lines = None;
        if let Some(t) = state.entity_mut(target_ref) {
            if t.tokens.stacks_in(TokenId::Barrier, TokenScope::Usage) > 0 {
                let name = t.name.clone();
                let applied = t.tokens.remove(TokenId::Barrier, TokenScope::Usage, 1, &name);
                t.tokens = applied.store;
                negated_lines = Some(applied.log);
            }
        }
        if let Some(lines) = negated_lines {
            state.log.extend(lines);
            state.log.push(format!("{target_name}: 결계가 공격을 흘려냈다"));
            continue;
        }

        if let Some(t) = state.entity_mut(target_ref) {
            let blocked = if plan.ignore_block { 0 } else { t.absorb_block(per_hit) };
            let lost = t.damage_hp(per_hit - blocked);
            total_blocked += blocked;
            total_hp_loss += lost;
            hits_landed += 1;
        }
    }

    state.log.push(format!(
        "{attacker_name}: {} → {target_name} {total_hp_loss} 피해 (막기 {total_blocked})",
        def.name
    ));

    // HP damage moves ether from the defender's pool to the attacker's.
    if total_hp_loss > 0 {
        let before = state.ether_of(action.actor);
        state.add_ether(action.actor, total_hp_loss);
        state.add_ether(target_ref, -total_hp_loss);
        if !ether::overdrive(before) && state.overdrive_of(action.actor) {
            state.log.push(format!("{attacker_name}: 오버드라이브!"));
        }
    }

    // Thorns reflect per landed hit; the attacker's block applies.
    let thorns = state.entity(target_ref).map_or(0, |t| t.tokens.stacks_of(TokenId::Thorns) as i32);
    if thorns > 0 && hits_landed > 0 {
        let reflect = thorns * hits_landed as i32;
        if let Some(a) = state.entity_mut(action.actor) {
            let blocked = a.absorb_block(reflect);
            let lost = a.damage_hp(reflect - blocked);
            if lost > 0 {
                state.log.push(format!("{attacker_name}: 가시 피해 {lost}"));
            }
        }
    }

    // Counterattack fires once per action, not per hit.
    let counter = state
        .entity(target_ref)
        .map_or(0, |t| if t.is_alive() { t.counter } else { 0 });
    if counter > 0 && hits_landed > 0 {
        if let Some(a) = state.entity_mut(action.actor) {
            let blocked = a.absorb_block(counter);
            let lost = a.damage_hp(counter - blocked);
            if lost > 0 {
                state.log.push(format!("{target_name}: 반격 {lost}"));
            }
        }
    }
}

fn apply_card_tokens(state: &mut BattleState, action: &TimelineAction, def: &CardDefinition) {
    for grant in &def.applied_tokens {
        let recipient = if grant.to_self {
            Some(action.actor)
        } else {
            state.default_target(action.actor)
        };
        let Some(recipient) = recipient else {
            continue;
        };

        let ctx = GrantCtx::mid_resolve(state.turn_number, action.sp);
        let lines = match state.entity_mut(recipient) {
            Some(entity) => {
                let name = entity.name.clone();
                let applied = entity.tokens.add(grant.token, grant.scope, grant.stacks, ctx, &name);
                entity.tokens = applied.store;
                applied.log
            }
            None => Vec::new(),
        };
        state.log.extend(lines);
    }
}

/// Pay out position-keyed tokens for the cursor moving `prev_sp → new_sp`.
fn apply_positional_growth(state: &mut BattleState, prev_sp: i32, new_sp: i32) {
    let mut actors = vec![ActorRef::Player];
    actors.extend((0..state.enemy.units.len()).map(ActorRef::Enemy));

    for actor in actors {
        let gain = state
            .entity(actor)
            .map_or(0, |e| e.tokens.growth_block(prev_sp, new_sp));
        if gain > 0 {
            if let Some(entity) = state.entity_mut(actor) {
                entity.gain_block(gain);
                let name = entity.name.clone();
                state.log.push(format!("{name}: 성장 방어 +{gain}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::catalog::{ids, starter_registry};
    use crate::cards::{CardId, CardInstance};
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

    fn push_player_action(state: &mut BattleState, card_id: CardId, sp: i32) {
        let card = CardInstance::new(state.handles.alloc(), card_id);
        state.queue.push(TimelineAction::new(ActorRef::Player, card, sp));
    }

    #[test]
    fn test_attack_damage_formula() {
        // base = 6 + 2 + 1 = 9; floor(9 * 1.5) = 13; +2 flat = 15
        assert_eq!(attack_damage(6, 2, 1, 1.5, 2), 15);
        // Never negative.
        assert_eq!(attack_damage(0, 0, 0, 1.0, -5), 0);
    }

    #[test]
    fn test_step_deals_damage_and_advances_cursor() {
        let registry = starter_registry();
        let mut state = test_state();
        push_player_action(&mut state, ids::SLASH, 2);

        let outcome = step(&mut state, &registry);

        assert_eq!(outcome, StepOutcome::Continue);
        assert_eq!(state.q_index, 1);
        assert_eq!(state.enemy.units[0].hp, 24); // 30 - 6
    }

    #[test]
    fn test_block_absorbs_before_hp() {
        let registry = starter_registry();
        let mut state = test_state();
        state.enemy.units[0].gain_block(4);
        push_player_action(&mut state, ids::SLASH, 2);

        step(&mut state, &registry);

        assert_eq!(state.enemy.units[0].block, 0);
        assert_eq!(state.enemy.units[0].hp, 28); // 6 dmg - 4 block
    }

    #[test]
    fn test_pierce_ignores_block() {
        let registry = starter_registry();
        let mut state = test_state();
        state.enemy.units[0].gain_block(10);
        push_player_action(&mut state, ids::PIERCE, 2);

        step(&mut state, &registry);

        assert_eq!(state.enemy.units[0].block, 10);
        assert_eq!(state.enemy.units[0].hp, 23); // 7 straight through
    }

    #[test]
    fn test_multi_hit_runs_damage_per_hit() {
        let registry = starter_registry();
        let mut state = test_state();
        state.enemy.units[0].gain_block(4);
        push_player_action(&mut state, ids::RAPID_THRUST, 2);

        step(&mut state, &registry);

        // 3 hits of 3: first eats 3 block, second eats 1 block + 2 hp, third 3 hp.
        assert_eq!(state.enemy.units[0].block, 0);
        assert_eq!(state.enemy.units[0].hp, 25);
    }

    #[test]
    fn test_hp_damage_transfers_ether() {
        let registry = starter_registry();
        let mut state = test_state();
        push_player_action(&mut state, ids::SLASH, 2);

        step(&mut state, &registry);

        assert_eq!(state.player.ether_pts, 106);
        assert_eq!(state.enemy.ether_pts, 94);
    }

    #[test]
    fn test_lethal_damage_ends_battle() {
        let registry = starter_registry();
        let mut state = test_state();
        state.enemy.units[0].hp = 5;
        push_player_action(&mut state, ids::SLASH, 2);

        let outcome = step(&mut state, &registry);

        assert_eq!(outcome, StepOutcome::BattleOver(BattleOutcome::VictoryByHp));
        assert_eq!(state.phase, Phase::Victory);
    }

    #[test]
    fn test_ether_depletion_ends_battle() {
        let registry = starter_registry();
        let mut state = test_state();
        state.enemy.ether_pts = 4;
        push_player_action(&mut state, ids::SLASH, 2);

        let outcome = step(&mut state, &registry);

        assert_eq!(outcome, StepOutcome::BattleOver(BattleOutcome::VictoryByEther));
        assert_eq!(state.phase, Phase::Victory);
    }

    #[test]
    fn test_unknown_card_skips_without_crash() {
        let registry = starter_registry();
        let mut state = test_state();
        push_player_action(&mut state, CardId::new(9999), 1);
        push_player_action(&mut state, ids::SLASH, 2);

        assert_eq!(step(&mut state, &registry), StepOutcome::Continue);
        assert!(state.log.contains("알 수 없는 카드"));
        assert_eq!(state.enemy.units[0].hp, 30);

        step(&mut state, &registry);
        assert_eq!(state.enemy.units[0].hp, 24);
    }

    #[test]
    fn test_dead_actor_skips_action() {
        let registry = starter_registry();
        let mut state = test_state();
        state.player.hp = 0;
        state.player.ether_pts = 1; // keep the outcome check off ether
        push_player_action(&mut state, ids::SLASH, 2);

        // Skip happens before the outcome check sees the dead player on
        // this step's exit; the action itself must not fire.
        let _ = step(&mut state, &registry);
        assert_eq!(state.enemy.units[0].hp, 30);
    }

    #[test]
    fn test_barrier_negates_hit_and_is_consumed() {
        let registry = starter_registry();
        let mut state = test_state();
        let applied = state.enemy.units[0].tokens.add(
            TokenId::Barrier,
            TokenScope::Usage,
            1,
            GrantCtx::at_select(1),
            "적",
        );
        state.enemy.units[0].tokens = applied.store;
        push_player_action(&mut state, ids::SLASH, 2);

        step(&mut state, &registry);

        assert_eq!(state.enemy.units[0].hp, 30);
        assert!(!state.enemy.units[0].tokens.has(TokenId::Barrier));
    }

    #[test]
    fn test_combo_bonus_applies_exactly_once() {
        let registry = starter_registry();
        let mut state = test_state();
        state.enemy.units[0].hp = 100;
        state.enemy.units[0].max_hp = 100;

        let a = CardInstance::new(state.handles.alloc(), ids::SLASH);
        let b = CardInstance::new(state.handles.alloc(), ids::SLASH);
        state.combo = Some(crate::combo::ComboResult {
            kind: crate::combo::ComboKind::Pair,
            multiplier: 2.0,
            rank: 1,
            matched: vec![a.handle, b.handle],
        });
        state.queue.push(TimelineAction::new(ActorRef::Player, a, 2));
        state.queue.push(TimelineAction::new(ActorRef::Player, b, 4));

        step(&mut state, &registry);
        // First matched attack: floor(6 * 2.0) = 12.
        assert_eq!(state.enemy.units[0].hp, 88);
        assert!(state.combo_bonus_spent);

        step(&mut state, &registry);
        // Second matched attack: plain 6.
        assert_eq!(state.enemy.units[0].hp, 82);
    }

    #[test]
    fn test_weak_and_vulnerable_modify_damage() {
        let registry = starter_registry();
        let mut state = test_state();
        let applied = state.enemy.units[0].tokens.add(
            TokenId::Vulnerable,
            TokenScope::Turn,
            1,
            GrantCtx::at_select(1),
            "적",
        );
        state.enemy.units[0].tokens = applied.store;
        push_player_action(&mut state, ids::SLASH, 2);

        step(&mut state, &registry);

        // floor(6 * 1.5) = 9
        assert_eq!(state.enemy.units[0].hp, 21);
    }

    #[test]
    fn test_counter_damages_attacker_once_per_action() {
        let registry = starter_registry();
        let mut state = test_state();
        state.player.counter = 4;
        let card = CardInstance::new(state.handles.alloc(), ids::ENEMY_GNASH);
        state.queue.push(TimelineAction::new(ActorRef::Enemy(0), card, 2));

        step(&mut state, &registry);

        // Two gnash hits land (4 each), the counter fires once.
        assert_eq!(state.player.hp, 72);
        assert_eq!(state.enemy.units[0].hp, 26);
    }

    #[test]
    fn test_rend_amplifies_incoming_damage() {
        let registry = starter_registry();
        let mut state = test_state();
        state.enemy.units[0].damage_taken_pct = 150;
        push_player_action(&mut state, ids::SLASH, 2);

        step(&mut state, &registry);

        // floor(6 * 150 / 100) = 9
        assert_eq!(state.enemy.units[0].hp, 21);
    }

    #[test]
    fn test_growing_defense_pays_out_with_cursor() {
        let registry = starter_registry();
        let mut state = test_state();
        let applied = state.player.tokens.add(
            TokenId::GrowingDefense,
            TokenScope::Turn,
            2,
            GrantCtx::mid_resolve(1, 0),
            "플레이어",
        );
        state.player.tokens = applied.store;
        push_player_action(&mut state, ids::SLASH, 3);

        step(&mut state, &registry);

        // Cursor moved 0 -> 3 with 2 stacks anchored at 0.
        assert_eq!(state.player.block, 6);
    }
}
