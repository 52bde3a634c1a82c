//! End-to-end battle scenarios through the public engine API.
//!
//! These walk full turns: select → respond → resolve → post, plus the
//! terminal phases and the two suspension points (respond confirmation
//! and conjure choices).

use etherline::cards::catalog::{ids, starter_registry};
use etherline::{
    BattleConfig, BattleEngine, BattleOutcome, BattleSetup, BattleState, CardHandle, CardId,
    CharacterBuild, Entity, EnemyConfig, EnemyGroup, GrowthState, ModeWeights, PassiveDeltas,
    Phase, StepOutcome, ValidationError,
};

fn engine() -> BattleEngine {
    BattleEngine::new(starter_registry(), BattleConfig::default())
}

/// A single-unit enemy that only ever plans one strike per turn.
fn striker(hp: i32, ether: i32) -> EnemyGroup {
    EnemyGroup::new(
        vec![Entity::new("적", hp, 8, 3)],
        EnemyConfig {
            mode_weights: ModeWeights { aggressive: 1.0, defensive: 0.0, tactical: 0.0 },
            cards_per_turn: 1,
            deck: vec![ids::ENEMY_STRIKE],
            ether_regen: 10,
        },
    )
    .with_ether(ether)
}

/// A single-unit enemy that only ever blocks.
fn turtle(hp: i32, ether: i32) -> EnemyGroup {
    EnemyGroup::new(
        vec![Entity::new("적", hp, 8, 3)],
        EnemyConfig {
            mode_weights: ModeWeights { aggressive: 0.0, defensive: 1.0, tactical: 0.0 },
            cards_per_turn: 1,
            deck: vec![ids::ENEMY_GUARD],
            ether_regen: 10,
        },
    )
    .with_ether(ether)
}

/// Six build cards + one opening special = the whole build in hand on
/// turn 1 (hand size 7), so tests can pick cards deterministically.
fn setup_with(build_cards: Vec<CardId>, enemy: EnemyGroup) -> BattleSetup {
    assert!(build_cards.len() <= 6);
    BattleSetup {
        player: Entity::new("플레이어", 80, 10, 6).with_ether(100),
        enemy,
        build: CharacterBuild { cards: build_cards, main_specials: vec![ids::ARCANE_STRIKE] },
        vanished: vec![],
        growth: GrowthState::default(),
    }
}

fn default_build() -> Vec<CardId> {
    vec![ids::SLASH, ids::COORDINATED, ids::GUARD, ids::HEAVY_BLOW, ids::FOCUS, ids::EXPOSE]
}

fn handle_of(state: &BattleState, id: CardId) -> CardHandle {
    state
        .hand
        .iter()
        .find(|c| c.card_id == id)
        .map(|c| c.handle)
        .expect("card should be in hand")
}

#[test]
fn test_lethal_attack_wins_by_hp() {
    let engine = engine();
    let mut state = engine.start_battle(setup_with(default_build(), striker(10, 100)), 42, &PassiveDeltas::none());

    let heavy = handle_of(&state, ids::HEAVY_BLOW);
    engine.submit_hand(&mut state, &[heavy]).unwrap();
    engine.confirm_respond(&mut state).unwrap();

    let outcome = engine.run_resolve(&mut state);

    assert_eq!(outcome, StepOutcome::BattleOver(BattleOutcome::VictoryByHp));
    assert_eq!(state.phase, Phase::Victory);
    assert_eq!(state.enemy.units[0].hp, 0);
}

#[test]
fn test_pair_combo_bonus_applies_exactly_once() {
    let engine = engine();
    let mut state =
        engine.start_battle(setup_with(default_build(), striker(100, 200)), 42, &PassiveDeltas::none());

    let slash = handle_of(&state, ids::SLASH);
    let coordinated = handle_of(&state, ids::COORDINATED);
    engine.submit_hand(&mut state, &[slash, coordinated]).unwrap();

    let combo = state.combo.as_ref().expect("combo detected");
    assert_eq!(combo.kind.name(), "페어");
    assert_eq!(combo.multiplier, 2.0);
    assert!(state.log.contains("페어"));

    engine.confirm_respond(&mut state).unwrap();
    let outcome = engine.run_resolve(&mut state);

    assert_eq!(outcome, StepOutcome::ResolveComplete);
    // Slash fires first and consumes the pair bonus: floor(6 * 2) = 12.
    // Coordinated lands unmultiplied at 5 + 3 cooperation flat = 8.
    // Doubling both would read 22 lost instead.
    assert_eq!(state.enemy.units[0].hp, 100 - 12 - 8);
}

#[test]
fn test_ether_depletion_wins() {
    let engine = engine();
    let mut state =
        engine.start_battle(setup_with(default_build(), striker(100, 5)), 42, &PassiveDeltas::none());

    let slash = handle_of(&state, ids::SLASH);
    engine.submit_hand(&mut state, &[slash]).unwrap();
    engine.confirm_respond(&mut state).unwrap();

    let outcome = engine.run_resolve(&mut state);

    assert_eq!(outcome, StepOutcome::BattleOver(BattleOutcome::VictoryByEther));
    assert_eq!(state.phase, Phase::Victory);
    assert!(state.enemy.ether_pts <= 0);
    assert!(state.enemy.units[0].is_alive());
}

#[test]
fn test_conjure_choice_suspends_and_resumes() {
    let engine = engine();
    let build = vec![ids::BREACH, ids::SLASH, ids::GUARD, ids::FOCUS, ids::EXPOSE, ids::COORDINATED];
    let mut state = engine.start_battle(setup_with(build, striker(100, 500)), 42, &PassiveDeltas::none());

    let breach = handle_of(&state, ids::BREACH);
    engine.submit_hand(&mut state, &[breach]).unwrap();
    engine.confirm_respond(&mut state).unwrap();

    let outcome = engine.run_resolve(&mut state);
    assert_eq!(outcome, StepOutcome::AwaitingChoice);
    assert!(state.pending_choice.is_some());

    // Stepping while suspended stays suspended.
    assert_eq!(engine.step_resolve(&mut state), StepOutcome::AwaitingChoice);

    // An invalid pick keeps the request parked.
    engine.resume_choice(&mut state, ids::GUARD);
    assert!(state.pending_choice.is_some());
    assert!(state.log.contains("잘못된 선택"));

    engine.resume_choice(&mut state, ids::PHANTOM_SLASH);
    assert!(state.pending_choice.is_none());

    let outcome = engine.run_resolve(&mut state);
    assert_eq!(outcome, StepOutcome::ResolveComplete);
    // Breach 5 + two phantom slashes at 4 each.
    assert_eq!(state.enemy.units[0].hp, 100 - 5 - 4 - 4);
}

#[test]
fn test_respond_window_repositions_player_actions() {
    let engine = engine();
    let mut state =
        engine.start_battle(setup_with(default_build(), turtle(100, 500)), 42, &PassiveDeltas::none());

    let slash = handle_of(&state, ids::SLASH);
    let guard = handle_of(&state, ids::GUARD);
    engine.submit_hand(&mut state, &[slash, guard]).unwrap();
    assert_eq!(state.phase, Phase::Respond);

    // Guard sits after slash (sp 3 vs 2); pull it to the front.
    engine.reposition(&mut state, guard, 0).unwrap();
    let player_cards: Vec<_> = state
        .queue
        .iter()
        .filter(|a| a.actor.is_player())
        .map(|a| a.card.handle)
        .collect();
    assert_eq!(player_cards, vec![guard, slash]);

    // Out of range clamps into the timeline budget.
    engine.reposition(&mut state, guard, 99).unwrap();
    let guard_sp = state
        .queue
        .iter()
        .find(|a| a.card.handle == guard)
        .map(|a| a.sp)
        .unwrap();
    assert_eq!(guard_sp, state.player.max_speed);

    // Repositioning is a respond-window operation only.
    engine.confirm_respond(&mut state).unwrap();
    assert_eq!(engine.reposition(&mut state, guard, 1), Err(ValidationError::WrongPhase));
}

#[test]
fn test_submission_rejections_leave_select_untouched() {
    let engine = engine();
    let mut state =
        engine.start_battle(setup_with(default_build(), striker(100, 500)), 42, &PassiveDeltas::none());

    // Empty selection.
    assert_eq!(engine.submit_hand(&mut state, &[]), Err(ValidationError::EmptySelection));

    // Speed budget.
    state.player.max_speed = 2;
    let heavy = handle_of(&state, ids::HEAVY_BLOW);
    let err = engine.submit_hand(&mut state, &[heavy]).unwrap_err();
    assert_eq!(err, ValidationError::SpeedExceeded { limit: 2, submitted: 3 });
    assert_eq!(err.to_string(), "속도 초과 (3/2)");
    state.player.max_speed = 10;

    // Energy budget.
    state.player.max_energy = 1;
    let err = engine.submit_hand(&mut state, &[heavy]).unwrap_err();
    assert!(matches!(err, ValidationError::EnergyExceeded { .. }));
    state.player.max_energy = 6;

    // Card-count cap.
    let handles: Vec<_> = state.hand.iter().map(|c| c.handle).collect();
    assert!(handles.len() > 5);
    let err = engine.submit_hand(&mut state, &handles).unwrap_err();
    assert!(matches!(err, ValidationError::TooManyCards { .. }));

    // Every rejection left the phase and zones alone.
    assert_eq!(state.phase, Phase::Select);
    assert_eq!(state.hand.len(), 7);
    assert!(state.selected.is_empty());
}

#[test]
fn test_manually_modified_plan_is_reused() {
    let engine = engine();
    let mut state =
        engine.start_battle(setup_with(default_build(), striker(100, 500)), 42, &PassiveDeltas::none());

    let frozen: Vec<_> = {
        let plan = state.enemy_plan.as_mut().expect("plan exists");
        plan.manually_modified = true;
        plan.actions.iter().map(|a| (a.card.card_id, a.sp)).collect()
    };

    engine.plan_enemy(&mut state);

    let current: Vec<_> = state
        .enemy_plan
        .as_ref()
        .unwrap()
        .actions
        .iter()
        .map(|a| (a.card.card_id, a.sp))
        .collect();
    assert_eq!(frozen, current);
    assert!(state.log.contains("적 계획 유지"));
}

#[test]
fn test_snapshot_roundtrip_resumes_identically() {
    let engine = engine();
    let start = || {
        let mut state = engine.start_battle(
            setup_with(default_build(), striker(100, 500)),
            42,
            &PassiveDeltas::none(),
        );
        let slash = handle_of(&state, ids::SLASH);
        let guard = handle_of(&state, ids::GUARD);
        engine.submit_hand(&mut state, &[slash, guard]).unwrap();
        engine.confirm_respond(&mut state).unwrap();
        engine.step_resolve(&mut state);
        state
    };

    let mut original = start();
    let bytes = bincode::serialize(&original).unwrap();
    let mut restored: BattleState = bincode::deserialize(&bytes).unwrap();

    assert_eq!(restored.q_index, original.q_index);

    let a = engine.run_resolve(&mut original);
    let b = engine.run_resolve(&mut restored);

    assert_eq!(a, b);
    assert_eq!(original.q_index, restored.q_index);
    assert_eq!(original.player.hp, restored.player.hp);
    assert_eq!(original.enemy.units[0].hp, restored.enemy.units[0].hp);
    assert_eq!(original.player.ether_pts, restored.player.ether_pts);
    assert_eq!(original.enemy.ether_pts, restored.enemy.ether_pts);
}

#[test]
fn test_vigilance_retains_block_across_turns() {
    let engine = engine();
    let build = vec![ids::VIGILANT_STANCE, ids::SLASH, ids::GUARD, ids::FOCUS, ids::EXPOSE, ids::COORDINATED];
    let mut state = engine.start_battle(setup_with(build, turtle(100, 500)), 42, &PassiveDeltas::none());

    let stance = handle_of(&state, ids::VIGILANT_STANCE);
    engine.submit_hand(&mut state, &[stance]).unwrap();
    engine.confirm_respond(&mut state).unwrap();
    assert_eq!(engine.run_resolve(&mut state), StepOutcome::ResolveComplete);

    // Vigilance kept the 4 block through the resolve-exit reset.
    assert_eq!(state.phase, Phase::Post);
    assert_eq!(state.player.block, 4);

    engine.finish_post(&mut state, &PassiveDeltas::none()).unwrap();
    assert_eq!(state.turn_number, 2);
    assert_eq!(state.phase, Phase::Select);
    assert_eq!(state.player.block, 4);
    // Hand refilled back to full, reshuffling the played card in.
    assert_eq!(state.hand.len(), 7);
}

#[test]
fn test_block_resets_without_vigilance() {
    let engine = engine();
    let mut state =
        engine.start_battle(setup_with(default_build(), turtle(100, 500)), 42, &PassiveDeltas::none());

    let guard = handle_of(&state, ids::GUARD);
    engine.submit_hand(&mut state, &[guard]).unwrap();
    engine.confirm_respond(&mut state).unwrap();
    engine.run_resolve(&mut state);

    assert_eq!(state.phase, Phase::Post);
    assert_eq!(state.player.block, 0);
}

#[test]
fn test_multi_unit_group_acts_in_sync() {
    let engine = engine();
    let enemy = EnemyGroup::new(
        vec![Entity::new("적 대장", 100, 8, 3), Entity::new("적 졸개", 100, 8, 3)],
        EnemyConfig {
            mode_weights: ModeWeights { aggressive: 1.0, defensive: 0.0, tactical: 0.0 },
            cards_per_turn: 1,
            deck: vec![ids::ENEMY_STRIKE],
            ether_regen: 10,
        },
    )
    .with_ether(500);
    let mut state = engine.start_battle(setup_with(default_build(), enemy), 42, &PassiveDeltas::none());

    let plan = state.enemy_plan.as_ref().expect("plan exists");
    assert_eq!(plan.actions.len(), 2);
    assert!(!plan.actions[0].card.is_ghost);
    assert!(plan.actions[1].card.is_ghost);
    assert_eq!(plan.actions[0].sp, plan.actions[1].sp);

    let guard = handle_of(&state, ids::GUARD);
    engine.submit_hand(&mut state, &[guard]).unwrap();
    engine.confirm_respond(&mut state).unwrap();
    engine.run_resolve(&mut state);

    // Guard's 5 block ate into the first strike; both units hit.
    assert_eq!(state.player.hp, 80 - (8 - 5) - 8);
}

#[test]
fn test_turn_cycle_regenerates_enemy_plan_and_ether() {
    let engine = engine();
    let mut state =
        engine.start_battle(setup_with(default_build(), turtle(100, 100)), 42, &PassiveDeltas::none());

    let guard = handle_of(&state, ids::GUARD);
    engine.submit_hand(&mut state, &[guard]).unwrap();
    engine.confirm_respond(&mut state).unwrap();
    engine.run_resolve(&mut state);

    let ether_before = state.enemy.ether_pts;
    engine.finish_post(&mut state, &PassiveDeltas::none()).unwrap();

    assert_eq!(state.turn_number, 2);
    assert_eq!(state.enemy.ether_pts, ether_before + 10);
    assert!(state.enemy_plan.is_some());
    assert!(!state.enemy_plan.as_ref().unwrap().manually_modified);
}

#[test]
fn test_turn_start_passives_apply() {
    let engine = engine();
    let mut state =
        engine.start_battle(setup_with(default_build(), turtle(100, 500)), 42, &PassiveDeltas::none());
    state.player.hp = 50;

    let guard = handle_of(&state, ids::GUARD);
    engine.submit_hand(&mut state, &[guard]).unwrap();
    engine.confirm_respond(&mut state).unwrap();
    engine.run_resolve(&mut state);

    let passives = PassiveDeltas { heal: 5, block: 3, energy_bonus: 1, speed_bonus: 2, ..PassiveDeltas::none() };
    engine.finish_post(&mut state, &passives).unwrap();

    assert_eq!(state.player.hp, 55);
    assert_eq!(state.player.block, 3);
    assert_eq!(state.player.max_energy, 7);
    assert_eq!(state.player.max_speed, 12);
}
