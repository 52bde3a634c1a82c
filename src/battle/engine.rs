//! The turn-phase state machine.
//!
//! `BattleEngine` owns the immutable context (registry, configuration)
//! and operates on a `BattleState` passed explicitly into every call —
//! there is no hidden current-battle reference. Phases cycle
//! `select → respond → resolve → post` until a terminal victory or
//! defeat.
//!
//! Suspension is a state, never a timer: the respond window waits for
//! `confirm_respond`, and a conjure choice parks a `ChoiceRequest` that
//! `resume_choice` answers before stepping continues.

use crate::cards::{CardHandle, CardId, CardRegistry};
use crate::combo;
use crate::core::{ActorRef, BattleRng, ValidationError};
use crate::effects;
use crate::enemy::planner;
use crate::ether;
use crate::timeline::{executor, scheduler, StepOutcome};

use super::deck::{self, CharacterBuild, GrowthState};
use super::passives::PassiveDeltas;
use super::state::{BattleState, Phase};

/// Engine configuration.
#[derive(Clone, Debug)]
pub struct BattleConfig {
    /// Hand refill target at each turn start.
    pub hand_size: usize,
    /// Cap on cards submitted per turn.
    pub max_submit: usize,
    /// Base ether awarded at turn end, scaled by the combo multiplier.
    pub turn_ether_base: i32,
    /// Escape-trait card ids currently banned from being drawn.
    pub escape_ban: Vec<CardId>,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self { hand_size: 7, max_submit: 5, turn_ether_base: 10, escape_ban: Vec::new() }
    }
}

/// Everything needed to open a battle.
#[derive(Clone, Debug)]
pub struct BattleSetup {
    pub player: crate::core::Entity,
    pub enemy: crate::enemy::EnemyGroup,
    pub build: CharacterBuild,
    pub vanished: Vec<CardId>,
    pub growth: GrowthState,
}

/// The battle resolution engine.
pub struct BattleEngine {
    registry: CardRegistry,
    config: BattleConfig,
}

impl BattleEngine {
    #[must_use]
    pub fn new(registry: CardRegistry, config: BattleConfig) -> Self {
        Self { registry, config }
    }

    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Open a battle: seed the RNG, build the deck, apply combat-start
    /// passives, and run the first turn start.
    #[must_use]
    pub fn start_battle(&self, setup: BattleSetup, seed: u64, passives: &PassiveDeltas) -> BattleState {
        let mut rng = BattleRng::new(seed);
        let mut state = BattleState::new(setup.player, setup.enemy);

        // Strength from passives applies once, at combat start.
        state.player.strength += passives.strength_bonus;

        let init =
            deck::initialize_deck(&setup.build, &setup.vanished, &setup.growth, &mut rng, &mut state.handles);
        state.deck = init.deck;
        // The opening hand starts as the main sub-specialty cards and is
        // topped up by the turn-start draw.
        state.hand = init.main_specials;

        state.rng_state = rng.state();
        self.begin_turn(&mut state, passives);
        state
    }

    /// Move from `Post` into the next turn's `Select`.
    pub fn finish_post(&self, state: &mut BattleState, passives: &PassiveDeltas) -> Result<(), ValidationError> {
        if state.phase != Phase::Post {
            return Err(ValidationError::WrongPhase);
        }
        state.turn_number += 1;
        self.begin_turn(state, passives);
        Ok(())
    }

    fn begin_turn(&self, state: &mut BattleState, passives: &PassiveDeltas) {
        let mut rng = BattleRng::from_state(&state.rng_state);

        // Turn-start passive deltas.
        if passives.heal > 0 {
            let healed = state.player.heal(passives.heal);
            if healed > 0 {
                state.log.push(format!("회복 +{healed}"));
            }
        }
        if passives.block > 0 {
            state.player.gain_block(passives.block);
            state.log.push(format!("막기 +{}", passives.block));
        }
        if passives.ether_gain != 0 {
            state.player.ether_pts += passives.ether_gain;
        }

        // Derived budgets recompute from base + passives + tokens.
        state.player.max_speed =
            state.player.base_speed + passives.speed_bonus + state.player.tokens.speed_bonus();
        state.player.max_energy = state.player.base_energy + passives.energy_bonus;
        for unit in &mut state.enemy.units {
            unit.max_speed = unit.base_speed + unit.tokens.speed_bonus();
            unit.max_energy = unit.base_energy;
        }

        if state.turn_number > 1 {
            state.enemy.ether_pts += state.enemy.config.ether_regen;
        }

        // Refill the hand; turn 1 keeps the opening specials and tops up.
        let need = self.config.hand_size.saturating_sub(state.hand.len());
        if need > 0 {
            let result = deck::draw_from_deck(
                std::mem::take(&mut state.deck),
                std::mem::take(&mut state.discard_pile),
                need,
                &self.config.escape_ban,
                &self.registry,
                &mut rng,
            );
            state.deck = result.deck;
            state.discard_pile = result.discard;
            if result.reshuffled {
                state.log.push("덱을 다시 섞었다".to_string());
            }
            let drawn = result.drawn.len();
            state.hand.extend(result.drawn);
            state.log.push(format!("카드 {drawn}장 드로우"));
        }

        // A new turn always plans fresh; manual freezes only hold
        // within a turn.
        state.enemy_plan = None;
        self.plan_enemy_with_rng(state, &mut rng);

        state.phase = Phase::Select;
        state.combo = None;
        state.combo_bonus_spent = false;
        state.rng_state = rng.state();
        state.log.push(format!("{}턴 시작", state.turn_number));
    }

    /// Recompute the enemy plan (UI re-render hook).
    ///
    /// A plan flagged `manually_modified` is reused verbatim —
    /// regenerating would silently change a locked-in plan.
    pub fn plan_enemy(&self, state: &mut BattleState) {
        let mut rng = BattleRng::from_state(&state.rng_state);
        self.plan_enemy_with_rng(state, &mut rng);
        state.rng_state = rng.state();
    }

    fn plan_enemy_with_rng(&self, state: &mut BattleState, rng: &mut BattleRng) {
        if let Some(plan) = &state.enemy_plan {
            if plan.manually_modified {
                state.log.push("적 계획 유지 (수동 수정)".to_string());
                return;
            }
        }

        let mut planner_rng = rng.fork();
        let plan = planner::plan_turn(&state.enemy, &self.registry, &mut planner_rng, &mut state.handles);
        state.log.push(format!("적의 태세: {}", plan.mode.name()));
        state.enemy_plan = Some(plan);
    }

    /// Validate and commit the player's card selection.
    ///
    /// On rejection the phase stays `Select` and the error carries the
    /// user-visible reason.
    pub fn submit_hand(
        &self,
        state: &mut BattleState,
        submission: &[CardHandle],
    ) -> Result<(), ValidationError> {
        if state.phase != Phase::Select {
            return Err(ValidationError::WrongPhase);
        }
        if submission.is_empty() {
            return Err(ValidationError::EmptySelection);
        }
        if submission.len() > self.config.max_submit {
            return Err(ValidationError::TooManyCards {
                limit: self.config.max_submit,
                submitted: submission.len(),
            });
        }

        let mut cards = Vec::with_capacity(submission.len());
        for (i, &handle) in submission.iter().enumerate() {
            if submission[..i].contains(&handle) {
                return Err(ValidationError::UnknownCard);
            }
            let Some(card) = state.hand_card(handle) else {
                return Err(ValidationError::UnknownCard);
            };
            cards.push(card.clone());
        }

        let mut speed = 0;
        let mut energy = 0;
        for card in &cards {
            if let Some(def) = self.registry.get(card.card_id) {
                speed += def.speed_cost;
                energy += def.action_cost;
            }
        }
        if speed > state.player.max_speed {
            return Err(ValidationError::SpeedExceeded {
                limit: state.player.max_speed,
                submitted: speed,
            });
        }
        if energy > state.player.max_energy {
            return Err(ValidationError::EnergyExceeded {
                limit: state.player.max_energy,
                submitted: energy,
            });
        }

        for card in &cards {
            if let Some(pos) = state.hand.iter().position(|c| c.handle == card.handle) {
                state.hand.remove(pos);
            }
        }
        state.selected = cards;

        let combo = combo::detect(&state.selected, &self.registry);
        if combo.rank > 0 {
            state.log.push(format!("콤보: {} x{}", combo.kind.name(), combo.multiplier));
        }
        state.combo = Some(combo);
        state.combo_bonus_spent = false;

        state.queue = scheduler::build_queue(&state.selected, &self.registry, state.enemy_plan.as_ref());
        state.q_index = 0;
        state.phase = Phase::Respond;
        Ok(())
    }

    /// Reposition one of the player's own queued actions during the
    /// respond window. The position clamps into the timeline budget.
    pub fn reposition(
        &self,
        state: &mut BattleState,
        handle: CardHandle,
        new_sp: i32,
    ) -> Result<(), ValidationError> {
        if state.phase != Phase::Respond {
            return Err(ValidationError::WrongPhase);
        }
        let Some(idx) = state
            .queue
            .iter()
            .position(|a| a.actor.is_player() && a.card.handle == handle)
        else {
            return Err(ValidationError::UnknownCard);
        };

        state.queue[idx].sp = new_sp.clamp(0, state.player.max_speed);
        scheduler::sort_queue(&mut state.queue);
        Ok(())
    }

    /// Close the respond window and start executing.
    pub fn confirm_respond(&self, state: &mut BattleState) -> Result<(), ValidationError> {
        if state.phase != Phase::Respond {
            return Err(ValidationError::WrongPhase);
        }
        state.phase = Phase::Resolve;
        state.log.push("타임라인 실행".to_string());
        Ok(())
    }

    /// Execute one timeline step. On queue exhaustion the turn wraps up
    /// and the phase moves to `Post` (or a terminal phase).
    pub fn step_resolve(&self, state: &mut BattleState) -> StepOutcome {
        if state.phase != Phase::Resolve {
            return StepOutcome::ResolveComplete;
        }

        match executor::step(state, &self.registry) {
            StepOutcome::ResolveComplete => {
                self.end_turn(state);
                StepOutcome::ResolveComplete
            }
            other => other,
        }
    }

    /// Step until the resolve suspends or finishes.
    pub fn run_resolve(&self, state: &mut BattleState) -> StepOutcome {
        loop {
            match self.step_resolve(state) {
                StepOutcome::Continue => continue,
                other => return other,
            }
        }
    }

    /// Answer a pending conjure choice; stepping may then continue.
    ///
    /// An invalid choice is logged and the request stays parked.
    pub fn resume_choice(&self, state: &mut BattleState, chosen: CardId) {
        let Some(request) = state.pending_choice.take() else {
            state.log.push("대기 중인 선택이 없습니다".to_string());
            return;
        };
        if !request.options.contains(&chosen) {
            state.log.push("잘못된 선택입니다".to_string());
            state.pending_choice = Some(request);
            return;
        }

        effects::spawn_ghosts(state, &self.registry, request.actor, chosen, request.copies, request.at_sp);
    }

    /// Resolve-exit housekeeping: token expiry, transient resets, ether
    /// accrual, hand discard.
    fn end_turn(&self, state: &mut BattleState) {
        let final_sp = state.queue.last().map_or(0, |a| a.sp);
        let turn = state.turn_number;

        let mut actors = vec![ActorRef::Player];
        actors.extend((0..state.enemy.units.len()).map(ActorRef::Enemy));
        for actor in actors {
            let lines = match state.entity_mut(actor) {
                Some(entity) => {
                    let name = entity.name.clone();
                    // Retention is decided by the tokens active this
                    // turn, before they expire.
                    let retains = entity.tokens.retains_block();
                    let applied = entity.tokens.expire(turn, final_sp, &name);
                    entity.tokens = applied.store;
                    entity.reset_transients(retains);
                    applied.log
                }
                None => Vec::new(),
            };
            state.log.extend(lines);
        }

        // Turn ether: base scaled by the combo multiplier.
        let combo_mult = state.combo.as_ref().map_or(1.0, |c| c.multiplier);
        let gain = ((self.config.turn_ether_base as f64) * combo_mult).floor() as i32;
        let before = state.player.ether_pts;
        state.player.ether_pts += gain;
        state.log.push(format!("에테르 +{gain}"));
        if !ether::overdrive(before) && ether::overdrive(state.player.ether_pts) {
            state.log.push("오버드라이브!".to_string());
        }

        let played: Vec<_> = state.selected.drain(..).collect();
        state.discard_pile.extend(played);
        state.queue.clear();
        state.q_index = 0;

        if let Some(outcome) = executor::check_outcome(state) {
            executor::finish_battle(state, outcome);
            return;
        }

        state.phase = Phase::Post;
        state.log.push(format!("{turn}턴 종료"));
    }
}
